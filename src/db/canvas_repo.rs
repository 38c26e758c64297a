use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::models::{
    CanvasSnapshot, ChangeBatch, Identity, Image, Line, Point, TextBox,
};

/// Errors surfaced by canvas storage operations.
#[derive(Debug)]
pub enum CanvasError {
    /// The batch is shaped in a way that can never apply (e.g. a modified
    /// element without an id). Nothing was written.
    BadRequest(String),
    /// A modified element names a row that does not exist. The batch was
    /// rolled back.
    NotFound(String),
    /// The underlying store failed. The batch was rolled back.
    Storage(sqlx::Error),
}

impl std::fmt::Display for CanvasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanvasError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            CanvasError::NotFound(msg) => write!(f, "not found: {}", msg),
            CanvasError::Storage(e) => write!(f, "storage error: {}", e),
        }
    }
}

impl std::error::Error for CanvasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CanvasError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for CanvasError {
    fn from(e: sqlx::Error) -> Self {
        CanvasError::Storage(e)
    }
}

// Row types for database queries
#[derive(sqlx::FromRow)]
struct PointRow {
    x: f64,
    y: f64,
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    image_url: String,
}

#[derive(sqlx::FromRow)]
struct TextBoxRow {
    id: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    content: String,
}

/// Storage access for the single logical canvas.
///
/// `apply_batch` is the write half (one transaction per change batch);
/// `snapshot` is the read half. Both take their connections from the shared
/// pool, so concurrent requests are coordinated by SQLite's own transaction
/// isolation and nothing else.
pub struct CanvasRepository {
    pool: SqlitePool,
}

impl CanvasRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Applies one change batch as a single all-or-nothing transaction.
    ///
    /// Commits only if every statement succeeds. Any failure returns early,
    /// which drops the transaction and rolls everything back, so storage
    /// never shows a partially applied diff. Resubmitting a committed batch
    /// of additions creates duplicates; there is no idempotency key.
    pub async fn apply_batch(&self, batch: &ChangeBatch) -> Result<(), CanvasError> {
        // Reject inconsistent input before opening a transaction.
        Self::validate(batch)?;

        let mut tx = self.pool.begin().await?;

        for line in &batch.added_lines {
            let id = line.id.resolve();
            sqlx::query("INSERT INTO lines (id) VALUES (?)")
                .bind(id.to_string())
                .execute(&mut *tx)
                .await?;
            Self::insert_points(&mut tx, id, &line.points).await?;
        }

        for line in &batch.modified_lines {
            let id = Self::require_existing(&line.id, "line")?;
            let found: Option<(String,)> = sqlx::query_as("SELECT id FROM lines WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await?;
            if found.is_none() {
                return Err(CanvasError::NotFound(format!("line {}", id)));
            }

            // Replace the point set in place, keeping the line id stable
            sqlx::query("DELETE FROM points WHERE line_id = ?")
                .bind(id.to_string())
                .execute(&mut *tx)
                .await?;
            Self::insert_points(&mut tx, id, &line.points).await?;
        }

        for id in &batch.deleted_lines {
            // Points go with the line via ON DELETE CASCADE. Deleting an
            // absent line is a no-op: the requested end state already holds.
            sqlx::query("DELETE FROM lines WHERE id = ?")
                .bind(id.to_string())
                .execute(&mut *tx)
                .await?;
        }

        for image in &batch.added_images {
            sqlx::query(
                "INSERT INTO images (id, x, y, width, height, image_url) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(image.id.resolve().to_string())
            .bind(image.x)
            .bind(image.y)
            .bind(image.width)
            .bind(image.height)
            .bind(&image.url)
            .execute(&mut *tx)
            .await?;
        }

        for image in &batch.modified_images {
            let id = Self::require_existing(&image.id, "image")?;
            let result = sqlx::query(
                "UPDATE images SET x = ?, y = ?, width = ?, height = ?, image_url = ? WHERE id = ?",
            )
            .bind(image.x)
            .bind(image.y)
            .bind(image.width)
            .bind(image.height)
            .bind(&image.url)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                return Err(CanvasError::NotFound(format!("image {}", id)));
            }
        }

        for id in &batch.deleted_images {
            sqlx::query("DELETE FROM images WHERE id = ?")
                .bind(id.to_string())
                .execute(&mut *tx)
                .await?;
        }

        for text_box in &batch.added_text_boxes {
            sqlx::query(
                "INSERT INTO text_boxes (id, x, y, width, height, content) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(text_box.id.resolve().to_string())
            .bind(text_box.x)
            .bind(text_box.y)
            .bind(text_box.width)
            .bind(text_box.height)
            .bind(&text_box.content)
            .execute(&mut *tx)
            .await?;
        }

        for text_box in &batch.modified_text_boxes {
            let id = Self::require_existing(&text_box.id, "text box")?;
            let result = sqlx::query(
                "UPDATE text_boxes SET x = ?, y = ?, width = ?, height = ?, content = ? WHERE id = ?",
            )
            .bind(text_box.x)
            .bind(text_box.y)
            .bind(text_box.width)
            .bind(text_box.height)
            .bind(&text_box.content)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                return Err(CanvasError::NotFound(format!("text box {}", id)));
            }
        }

        tx.commit().await?;

        tracing::debug!(
            "applied canvas batch: +{} ~{} -{} lines, +{} ~{} -{} images, +{} ~{} -{} text boxes",
            batch.added_lines.len(),
            batch.modified_lines.len(),
            batch.deleted_lines.len(),
            batch.added_images.len(),
            batch.modified_images.len(),
            batch.deleted_images.len(),
            batch.added_text_boxes.len(),
            batch.modified_text_boxes.len(),
            batch.deleted_text_boxes.len(),
        );

        Ok(())
    }

    /// Reads the full current canvas state.
    ///
    /// A plain multi-query read, not a transaction: under a concurrent save
    /// the snapshot may mix states that never coexisted. Acceptable for a
    /// single-editor tool. Empty storage yields an empty aggregate.
    pub async fn snapshot(&self) -> Result<CanvasSnapshot, CanvasError> {
        let line_ids: Vec<(String,)> = sqlx::query_as("SELECT id FROM lines ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;

        let mut lines = Vec::with_capacity(line_ids.len());
        for (id,) in line_ids {
            let points: Vec<PointRow> =
                sqlx::query_as("SELECT x, y FROM points WHERE line_id = ? ORDER BY seq")
                    .bind(&id)
                    .fetch_all(&self.pool)
                    .await?;

            lines.push(Line {
                id: parse_stored_id(&id)?,
                points: points.into_iter().map(|p| Point { x: p.x, y: p.y }).collect(),
            });
        }

        let image_rows: Vec<ImageRow> = sqlx::query_as(
            "SELECT id, x, y, width, height, image_url FROM images ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut images = Vec::with_capacity(image_rows.len());
        for row in image_rows {
            images.push(Image {
                id: parse_stored_id(&row.id)?,
                x: row.x,
                y: row.y,
                width: row.width,
                height: row.height,
                url: row.image_url,
            });
        }

        let text_box_rows: Vec<TextBoxRow> = sqlx::query_as(
            "SELECT id, x, y, width, height, content FROM text_boxes ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut text_boxes = Vec::with_capacity(text_box_rows.len());
        for row in text_box_rows {
            text_boxes.push(TextBox {
                id: parse_stored_id(&row.id)?,
                x: row.x,
                y: row.y,
                width: row.width,
                height: row.height,
                content: row.content,
            });
        }

        Ok(CanvasSnapshot {
            lines,
            images,
            text_boxes,
        })
    }

    /// Checks modified elements up front so bad input never opens a
    /// transaction.
    fn validate(batch: &ChangeBatch) -> Result<(), CanvasError> {
        for line in &batch.modified_lines {
            Self::require_existing(&line.id, "line")?;
        }
        for image in &batch.modified_images {
            Self::require_existing(&image.id, "image")?;
        }
        for text_box in &batch.modified_text_boxes {
            Self::require_existing(&text_box.id, "text box")?;
        }
        Ok(())
    }

    fn require_existing(id: &Identity, kind: &str) -> Result<Uuid, CanvasError> {
        id.existing().ok_or_else(|| {
            CanvasError::BadRequest(format!("modified {} is missing an id", kind))
        })
    }

    async fn insert_points(
        tx: &mut Transaction<'_, Sqlite>,
        line_id: Uuid,
        points: &[Point],
    ) -> Result<(), CanvasError> {
        for (seq, point) in points.iter().enumerate() {
            sqlx::query("INSERT INTO points (line_id, seq, x, y) VALUES (?, ?, ?, ?)")
                .bind(line_id.to_string())
                .bind(seq as i64)
                .bind(point.x)
                .bind(point.y)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}

fn parse_stored_id(raw: &str) -> Result<Uuid, CanvasError> {
    Uuid::parse_str(raw)
        .map_err(|e| CanvasError::Storage(sqlx::Error::Decode(Box::new(e))))
}
