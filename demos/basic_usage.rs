use movierec::algorithms::scheduler::TokioYielder;
use movierec::services::loader::Catalog;
use movierec::services::recommendation::RecommendationService;
use movierec::services::training::TrainingService;
use movierec::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    println!("MovieRec basic usage");

    // 1. A tiny catalog and some ratings
    let catalog = Catalog::new(vec![
        Movie::new(1, "The Matrix (1999)"),
        Movie::new(2, "Blade Runner (1982)"),
        Movie::new(3, "Notting Hill (1999)"),
        Movie::new(4, "Love Actually (2003)"),
        Movie::new(5, "Alien (1979)"),
    ]);

    let mut ratings = Vec::new();
    for user in 1..=6u32 {
        let likes_scifi = user % 2 == 0;
        for movie in 1..=5u32 {
            let scifi = matches!(movie, 1 | 2 | 5);
            let rating = if scifi == likes_scifi { 4.5 } else { 1.5 };
            ratings.push(RatingEvent::new(user, movie, rating));
        }
    }
    println!("{} movies, {} ratings", catalog.len(), ratings.len());

    // 2. Train, printing status the way a page would
    let mut config = Config::default();
    config.training.seed = Some(2024);
    config.training.epochs = 40;

    let service = TrainingService::new(config.training.clone());
    let run = service
        .train_with(&ratings, &mut TokioYielder, &mut |p: &TrainingProgress| println!("  {}", p))
        .await;

    // 3. Query
    let recommender = RecommendationService::from_training_outcome(catalog, run.assignment.items, &run.outcome, &ratings);
    println!("\nServing from {:?}", recommender.source());

    for movie in recommender.available_movies() {
        println!("\nBecause you liked {}:", movie.title);
        for rec in recommender.recommend_for(movie.id, 2) {
            println!("  {} ({:.3})", rec.title, rec.score);
        }
    }

    Ok(())
}
