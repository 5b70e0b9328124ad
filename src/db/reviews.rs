use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::{error, info};

use super::StoreError;
use crate::models::{NewReview, Review};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "reseñas" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    id_pagina INTEGER NOT NULL,
    nombre TEXT NOT NULL,
    "reseña" TEXT NOT NULL,
    valoracion REAL CHECK(valoracion >= 0 AND valoracion <= 5)
);"#;

pub const MAX_RATING: f64 = 5.0;

/// Reviews live in their own SQLite file, independent of the products one.
#[derive(Debug)]
pub struct ReviewsDb {
    path: PathBuf,
}

impl ReviewsDb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_existing(&self) -> Result<Connection, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::Unavailable(self.path.clone()));
        }
        Ok(Connection::open(&self.path)?)
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(SCHEMA_SQL).map_err(|e| {
            error!("[DB] Failed creating reviews table: {}", e);
            e
        })?;
        info!("[DB] Reviews schema ready at {}", self.path.display());
        Ok(())
    }

    pub async fn insert(&self, review: &NewReview) -> Result<i64, StoreError> {
        let conn = self.open_existing()?;
        conn.execute(
            r#"INSERT INTO "reseñas" (id_pagina, nombre, "reseña", valoracion)
               VALUES (?, ?, ?, ?)"#,
            params![review.id_pagina, &review.nombre, &review.resena, review.valoracion],
        )?;
        let id = conn.last_insert_rowid();
        info!("[DB] Stored review {} for product {}", id, review.id_pagina);
        Ok(id)
    }

    /// Reviews of one product, newest first.
    pub async fn list_for(&self, product_id: i64) -> Result<Vec<Review>, StoreError> {
        let conn = self.open_existing()?;
        let mut stmt = conn.prepare(
            r#"SELECT id, id_pagina, nombre, "reseña", valoracion FROM "reseñas"
               WHERE id_pagina = ? ORDER BY id DESC"#,
        )?;
        let rows = stmt.query_map([product_id], |row| {
            Ok(Review {
                id: row.get(0)?,
                id_pagina: row.get(1)?,
                nombre: row.get(2)?,
                resena: row.get(3)?,
                valoracion: row.get(4)?,
            })
        })?;
        let mut reviews = Vec::new();
        for review in rows {
            reviews.push(review?);
        }
        Ok(reviews)
    }
}

/// Rating typed in the review form. Anything that is not a number counts as
/// 0; numbers are clamped to the 0–5 range the table accepts.
pub fn parse_rating(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value.clamp(0.0, MAX_RATING),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(product: i64, nombre: &str, valoracion: f64) -> NewReview {
        NewReview {
            id_pagina: product,
            nombre: nombre.into(),
            resena: "Muy buena calidad".into(),
            valoracion,
        }
    }

    #[tokio::test]
    async fn test_reviews_are_listed_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let db = ReviewsDb::new(dir.path().join("reseñasDB.db"));
        db.init_schema().await.unwrap();

        db.insert(&review(1, "Ana", 4.0)).await.unwrap();
        db.insert(&review(1, "Luis", 5.0)).await.unwrap();
        db.insert(&review(2, "Marta", 3.5)).await.unwrap();

        let listed = db.list_for(1).await.unwrap();
        let names: Vec<_> = listed.iter().map(|r| r.nombre.as_str()).collect();
        assert_eq!(names, vec!["Luis", "Ana"]);
        assert_eq!(listed[0].valoracion, Some(5.0));
        assert!(db.list_for(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_rating_is_rejected_by_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db = ReviewsDb::new(dir.path().join("reseñasDB.db"));
        db.init_schema().await.unwrap();
        assert!(db.insert(&review(1, "Ana", 9.0)).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let db = ReviewsDb::new(dir.path().join("none.db"));
        assert!(matches!(db.list_for(1).await, Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("4.5"), 4.5);
        assert_eq!(parse_rating(" 3 "), 3.0);
        assert_eq!(parse_rating("abc"), 0.0);
        assert_eq!(parse_rating("NaN"), 0.0);
        assert_eq!(parse_rating("12"), 5.0);
        assert_eq!(parse_rating("-1"), 0.0);
    }
}
