//! MovieLens-style CSV loading for the movie catalog and rating events.
//!
//! - `movies.csv`: `movieId,title,genres`, titles may be double-quoted and
//!   contain commas, genres are `|`-separated
//! - `ratings.csv`: `userId,movieId,rating[,timestamp]`
//!
//! A leading header line is skipped when its first field is not numeric.

pub mod index;

use crate::error::{DataLoadError, LoadResult};
use crate::models::{Movie, RatingEvent};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use tracing::{debug, info};

/// Movies keyed by id, in file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
    by_id: HashMap<u32, usize>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        let mut catalog = Catalog::default();
        for movie in movies {
            catalog.insert(movie);
        }
        catalog
    }

    /// Adds `movie`, replacing an earlier entry with the same id.
    pub fn insert(&mut self, movie: Movie) {
        match self.by_id.get(&movie.id) {
            Some(&slot) => self.movies[slot] = movie,
            None => {
                self.by_id.insert(movie.id, self.movies.len());
                self.movies.push(movie);
            }
        }
    }

    pub fn get(&self, id: u32) -> Option<&Movie> {
        self.by_id.get(&id).map(|&slot| &self.movies[slot])
    }

    pub fn title(&self, id: u32) -> Option<&str> {
        self.get(id).map(|m| m.title.as_str())
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Splits one CSV record, honoring double quotes and `""` escapes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

fn parse_field<T: std::str::FromStr>(file: &str, line: usize, name: &str, raw: &str) -> LoadResult<T> {
    raw.trim().parse().map_err(|_| DataLoadError::Parse {
        file: file.to_string(),
        line,
        reason: format!("invalid {}: {:?}", name, raw),
    })
}

fn is_header(fields: &[String]) -> bool {
    fields
        .first()
        .map(|f| f.trim().parse::<u32>().is_err())
        .unwrap_or(false)
}

fn open(path: &Path) -> LoadResult<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(DataLoadError::MissingFile {
            path: path.display().to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn parse_catalog<R: BufRead>(reader: R, file: &str) -> LoadResult<Catalog> {
    let mut catalog = Catalog::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_record(line.trim_end_matches('\r'));
        if line_no == 1 && is_header(&fields) {
            continue;
        }
        if fields.len() < 2 {
            return Err(DataLoadError::Parse {
                file: file.to_string(),
                line: line_no,
                reason: format!("expected at least 2 fields, found {}", fields.len()),
            });
        }

        let id = parse_field(file, line_no, "movieId", &fields[0])?;
        let genres: Vec<String> = fields
            .get(2)
            .map(|g| {
                g.split('|')
                    .map(str::trim)
                    .filter(|g| !g.is_empty() && *g != "(no genres listed)")
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        catalog.insert(Movie::new(id, fields[1].trim()).with_genres(genres));
    }

    Ok(catalog)
}

/// Reads at most `max_ratings` rating events from `reader`.
pub fn parse_ratings<R: BufRead>(reader: R, file: &str, max_ratings: usize) -> LoadResult<Vec<RatingEvent>> {
    let mut ratings = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        if ratings.len() >= max_ratings {
            debug!("Rating cap of {} reached in {}", max_ratings, file);
            break;
        }

        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_record(line.trim_end_matches('\r'));
        if line_no == 1 && is_header(&fields) {
            continue;
        }
        if fields.len() < 3 {
            return Err(DataLoadError::Parse {
                file: file.to_string(),
                line: line_no,
                reason: format!("expected at least 3 fields, found {}", fields.len()),
            });
        }

        let rating: f32 = parse_field(file, line_no, "rating", &fields[2])?;
        if !rating.is_finite() {
            return Err(DataLoadError::Parse {
                file: file.to_string(),
                line: line_no,
                reason: format!("rating is not a finite number: {}", rating),
            });
        }

        ratings.push(RatingEvent {
            user_id: parse_field(file, line_no, "userId", &fields[0])?,
            item_id: parse_field(file, line_no, "movieId", &fields[1])?,
            rating,
        });
    }

    Ok(ratings)
}

pub fn load_catalog(path: &Path) -> LoadResult<Catalog> {
    let catalog = parse_catalog(open(path)?, &path.display().to_string())?;
    info!("Loaded {} movies from {:?}", catalog.len(), path);
    Ok(catalog)
}

pub fn load_ratings(path: &Path, max_ratings: usize) -> LoadResult<Vec<RatingEvent>> {
    let ratings = parse_ratings(open(path)?, &path.display().to_string(), max_ratings)?;
    info!("Loaded {} ratings from {:?}", ratings.len(), path);
    Ok(ratings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_split_record_quotes() {
        assert_eq!(split_record("1,Heat (1995),Action"), vec!["1", "Heat (1995)", "Action"]);
        assert_eq!(
            split_record(r#"11,"American President, The (1995)",Comedy|Drama"#),
            vec!["11", "American President, The (1995)", "Comedy|Drama"]
        );
        assert_eq!(split_record(r#"5,"Say ""Hi""",x"#), vec!["5", "Say \"Hi\"", "x"]);
    }

    #[test]
    fn test_parse_catalog() {
        let csv = "movieId,title,genres\n\
                   1,Toy Story (1995),Adventure|Animation|Children\n\
                   \n\
                   11,\"American President, The (1995)\",Comedy|Drama|Romance\n\
                   99,Untitled,(no genres listed)\n";
        let catalog = parse_catalog(Cursor::new(csv), "movies.csv").unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.title(11), Some("American President, The (1995)"));
        assert_eq!(catalog.get(1).unwrap().genres, vec!["Adventure", "Animation", "Children"]);
        assert!(catalog.get(99).unwrap().genres.is_empty());
        assert!(catalog.get(2).is_none());
    }

    #[test]
    fn test_parse_ratings_with_cap() {
        let csv = "userId,movieId,rating,timestamp\n1,1,4.0,964982703\n1,3,4.5,964981247\n2,1,3.0,964982224\n";
        let all = parse_ratings(Cursor::new(csv), "ratings.csv", usize::MAX).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1], RatingEvent::new(1, 3, 4.5));

        let capped = parse_ratings(Cursor::new(csv), "ratings.csv", 2).unwrap();
        assert_eq!(capped.len(), 2);
        assert!(parse_ratings(Cursor::new(csv), "ratings.csv", 0).unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let err = parse_ratings(Cursor::new("1,1,4.0\n1,x,3.0\n"), "ratings.csv", 10).unwrap_err();
        match err {
            DataLoadError::Parse { line, file, .. } => {
                assert_eq!(line, 2);
                assert_eq!(file, "ratings.csv");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(parse_ratings(Cursor::new("1,1\n"), "ratings.csv", 10).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_ratings(Path::new("/nonexistent/ratings.csv"), 10).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingFile { .. }));
    }

    #[test]
    fn test_directory_is_not_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(dir.path()).unwrap_err();
        assert!(!matches!(err, DataLoadError::MissingFile { .. }));

        let missing = dir.path().join("movies.csv");
        match load_catalog(&missing).unwrap_err() {
            DataLoadError::MissingFile { path } => assert_eq!(path, missing.display().to_string()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
