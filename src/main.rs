use anyhow::{bail, Result};
use clap::Parser;
use movierec::{init_tracing, AppState, Config};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Directory holding movies.csv and ratings.csv
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[arg(long)]
    max_ratings: Option<usize>,

    /// Movie id to recommend for; repeatable
    #[arg(short, long)]
    movie: Vec<u32>,

    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Print the movies recommendations can be requested for
    #[arg(long)]
    list: bool,

    #[arg(long)]
    json: bool,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = if std::path::Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, using default configuration");
        Config::default()
    };

    if let Some(dir) = &args.data_dir {
        config.data.data_dir = dir.clone();
    }
    if let Some(max) = args.max_ratings {
        config.data.max_ratings = max;
    }
    if let Some(k) = args.top_k {
        config.similarity.top_k = k;
    }
    if args.seed.is_some() {
        config.training.seed = args.seed;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    if args.movie.is_empty() && !args.list {
        bail!("nothing to do: pass --movie <id> or --list");
    }

    let config = load_config(&args)?;
    info!("Training configuration: {:?}", config.training);

    let state = AppState::new(config).await?;
    let service = &state.recommendation_service;

    if let Some(fit) = state.training_fit() {
        info!("Training fit: rmse {:.4}, mae {:.4} over {} ratings", fit.rmse, fit.mae, fit.count);
    }
    info!("Recommendations served by {:?}", service.source());

    if args.list {
        for movie in service.available_movies() {
            println!("{}\t{}", movie.id, movie.title);
        }
    }

    let k = state.config.similarity.top_k;
    for &movie_id in &args.movie {
        let recommendations = service.recommend_for(movie_id, k);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&recommendations)?);
            continue;
        }

        let title = service.catalog().title(movie_id).unwrap_or("unknown movie");
        println!("Because you liked {} ({}):", title, movie_id);
        if recommendations.is_empty() {
            println!("  no recommendation available");
        }
        for (rank, rec) in recommendations.iter().enumerate() {
            println!("  {}. {} ({:.3})", rank + 1, rec.title, rec.score);
        }
    }

    Ok(())
}
