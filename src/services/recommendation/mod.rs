use crate::algorithms::popularity::PopularityRanking;
use crate::algorithms::retriever::SimilarityIndex;
use crate::algorithms::TrainedModel;
use crate::error::TrainingError;
use crate::models::{Movie, RatingEvent, Recommendation, RecommendationSource};
use crate::services::loader::index::IdIndex;
use crate::services::loader::Catalog;
use tracing::{debug, info, warn};

/// Where recommendations come from.
#[derive(Debug, Clone)]
pub enum Strategy {
    Model(SimilarityIndex),
    Popularity(PopularityRanking),
}

/// Answers "movies like this one" queries against a catalog.
///
/// Every query is read-only; an unknown movie yields an empty list.
#[derive(Debug, Clone)]
pub struct RecommendationService {
    catalog: Catalog,
    items: IdIndex,
    strategy: Strategy,
}

impl RecommendationService {
    pub fn with_model(catalog: Catalog, items: IdIndex, model: &TrainedModel) -> Self {
        let index = model.similarity_index();
        info!("Similarity index ready over {} movies", index.len());
        Self {
            catalog,
            items,
            strategy: Strategy::Model(index),
        }
    }

    pub fn with_popularity(catalog: Catalog, items: IdIndex, ratings: &[RatingEvent]) -> Self {
        Self {
            catalog,
            items,
            strategy: Strategy::Popularity(PopularityRanking::from_ratings(ratings)),
        }
    }

    /// Uses the trained model when there is one and the popularity ranking
    /// otherwise.
    pub fn from_training_outcome(
        catalog: Catalog,
        items: IdIndex,
        outcome: &Result<TrainedModel, TrainingError>,
        ratings: &[RatingEvent],
    ) -> Self {
        match outcome {
            Ok(model) => Self::with_model(catalog, items, model),
            Err(e) => {
                warn!("Falling back to popularity ranking: {}", e);
                Self::with_popularity(catalog, items, ratings)
            }
        }
    }

    pub fn source(&self) -> RecommendationSource {
        match self.strategy {
            Strategy::Model(_) => RecommendationSource::LatentSimilarity,
            Strategy::Popularity(_) => RecommendationSource::Popularity,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Catalog movies that appear in the rating data, sorted by title.
    pub fn available_movies(&self) -> Vec<&Movie> {
        let mut movies: Vec<&Movie> = self
            .items
            .ids()
            .iter()
            .filter_map(|&id| self.catalog.get(id))
            .collect();
        movies.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        movies
    }

    pub fn recommend_for(&self, movie_id: u32, k: usize) -> Vec<Recommendation> {
        let Some(item) = self.items.index_of(movie_id) else {
            debug!("Movie {} has no ratings, nothing to recommend", movie_id);
            return Vec::new();
        };

        let scored: Vec<(u32, f32)> = match &self.strategy {
            Strategy::Model(index) => index
                .top_k_similar(item, k)
                .into_iter()
                .filter_map(|s| self.items.id_of(s.item).map(|id| (id, s.score)))
                .collect(),
            Strategy::Popularity(ranking) => ranking
                .top(k, Some(movie_id))
                .into_iter()
                .map(|p| (p.item_id, p.rating_count as f32))
                .collect(),
        };

        let source = self.source();
        scored
            .into_iter()
            .map(|(movie_id, score)| Recommendation {
                movie_id,
                title: self
                    .catalog
                    .title(movie_id)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Movie {}", movie_id)),
                score,
                source,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Movie::new(1, "Heat (1995)"),
            Movie::new(2, "Casino (1995)"),
            Movie::new(3, "Babe (1995)"),
            Movie::new(4, "Unrated (1999)"),
        ])
    }

    fn ratings() -> Vec<RatingEvent> {
        vec![
            RatingEvent::new(1, 1, 5.0),
            RatingEvent::new(2, 1, 4.0),
            RatingEvent::new(1, 2, 4.0),
            RatingEvent::new(1, 3, 2.0),
            RatingEvent::new(3, 3, 3.0),
            RatingEvent::new(4, 3, 1.0),
        ]
    }

    #[test]
    fn test_popularity_fallback() {
        let ratings = ratings();
        let items = IdIndex::from_ids(ratings.iter().map(|r| r.item_id));
        let outcome = Err(TrainingError::EmptyDataset {
            ratings: 0,
            num_users: 0,
            num_items: 0,
        });
        let service = RecommendationService::from_training_outcome(catalog(), items, &outcome, &ratings);

        assert_eq!(service.source(), RecommendationSource::Popularity);
        let recs = service.recommend_for(2, 5);
        let ids: Vec<u32> = recs.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(recs[0].title, "Babe (1995)");
        assert_eq!(recs[0].score, 3.0);
    }

    #[test]
    fn test_unknown_movie_is_empty() {
        let ratings = ratings();
        let items = IdIndex::from_ids(ratings.iter().map(|r| r.item_id));
        let service = RecommendationService::with_popularity(catalog(), items, &ratings);

        assert!(service.recommend_for(4, 5).is_empty());
        assert!(service.recommend_for(404, 5).is_empty());
    }

    #[test]
    fn test_available_movies_sorted_by_title() {
        let ratings = ratings();
        let items = IdIndex::from_ids(ratings.iter().map(|r| r.item_id));
        let service = RecommendationService::with_popularity(catalog(), items, &ratings);

        let titles: Vec<&str> = service.available_movies().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Babe (1995)", "Casino (1995)", "Heat (1995)"]);
    }
}
