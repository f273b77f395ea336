use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::{Document, Page, Repository, Result};

/// PostgreSQL-backed document repository.
///
/// All kinds share the `documents` table; each repository only reads and
/// writes rows of its own kind.
pub struct PostgresRepository<D: Document> {
    pool: PgPool,
    _phantom: PhantomData<fn() -> D>,
}

impl<D: Document> Clone for PostgresRepository<D> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<D: Document> PostgresRepository<D> {
    /// Creates a new repository over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl<D: Document> Repository<D> for PostgresRepository<D> {
    async fn get(&self, id: D::Id) -> Result<Option<D>> {
        let id: Uuid = id.into();
        let row = sqlx::query("SELECT body FROM documents WHERE kind = $1 AND id = $2")
            .bind(D::kind())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let body: serde_json::Value = row.try_get("body")?;
                Ok(Some(serde_json::from_value(body)?))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self, document), fields(kind = D::kind(), id = %document.id()))]
    async fn save(&self, document: &D) -> Result<()> {
        let id: Uuid = document.id().into();
        let body = serde_json::to_value(document)?;

        sqlx::query(
            r#"
            INSERT INTO documents (kind, id, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (kind, id)
            DO UPDATE SET body = EXCLUDED.body, updated_at = NOW()
            "#,
        )
        .bind(D::kind())
        .bind(id)
        .bind(body)
        .bind(document.created_at())
        .execute(&self.pool)
        .await?;

        metrics::counter!("document_writes_total", "kind" => D::kind()).increment(1);
        Ok(())
    }

    async fn find_where(&self, field: &str, value: &str, page: Page) -> Result<Vec<D>> {
        let rows = sqlx::query(
            r#"
            SELECT body FROM documents
            WHERE kind = $1 AND body ->> $2 = $3
            ORDER BY created_at ASC, id ASC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(D::kind())
        .bind(field)
        .bind(value)
        .bind(page.offset() as i64)
        .bind(page.limit() as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let body: serde_json::Value = row.try_get("body")?;
                Ok(serde_json::from_value(body)?)
            })
            .collect()
    }
}
