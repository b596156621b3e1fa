//! Genres controller

use crate::db::{Database, GenreRecord};
use crate::error::AppError;

pub struct GenresController {
    db: Database,
}

impl GenresController {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn all_genres(&self, limit: i64, page: i64) -> Result<Vec<GenreRecord>, AppError> {
        self.db.genres().all(limit, page).await.map_err(|e| {
            tracing::error!(error = %e, "Error getting musical genres");
            AppError::internal()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_db;

    #[tokio::test]
    async fn seeded_genres_listed() {
        let db = memory_db().await;
        let controller = GenresController::new(db);

        let genres = controller.all_genres(50, 0).await.unwrap();
        assert!(!genres.is_empty());
        assert!(genres.iter().any(|g| g.name == "Pop"));
    }
}
