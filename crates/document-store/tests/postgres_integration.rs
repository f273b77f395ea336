//! PostgreSQL integration tests
//!
//! These tests share one PostgreSQL container and truncate the documents
//! table before each test, so they run serially.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use document_store::{Document, Page, PostgresRepository, Repository};
use serde::{Deserialize, Serialize};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_documents_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Parcel {
    id: Uuid,
    owner: String,
    weight: f64,
    created_at: DateTime<Utc>,
}

impl Document for Parcel {
    type Id = Uuid;

    fn kind() -> &'static str {
        "Parcel"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Crate {
    id: Uuid,
    owner: String,
    created_at: DateTime<Utc>,
}

impl Document for Crate {
    type Id = Uuid;

    fn kind() -> &'static str {
        "Crate"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

async fn pool() -> PgPool {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE documents")
        .execute(&pool)
        .await
        .unwrap();

    pool
}

fn parcel(owner: &str, age_secs: i64) -> Parcel {
    Parcel {
        id: Uuid::new_v4(),
        owner: owner.to_string(),
        weight: 1.5,
        // Postgres keeps microseconds only.
        created_at: DateTime::from_timestamp(Utc::now().timestamp() - age_secs, 0).unwrap(),
    }
}

#[tokio::test]
#[serial]
async fn save_and_get_roundtrip() {
    let repo = PostgresRepository::<Parcel>::new(pool().await);
    let p = parcel("alice", 0);

    repo.save(&p).await.unwrap();

    assert_eq!(repo.get(p.id).await.unwrap(), Some(p));
}

#[tokio::test]
#[serial]
async fn get_missing_returns_none() {
    let repo = PostgresRepository::<Parcel>::new(pool().await);
    assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn save_is_an_upsert() {
    let repo = PostgresRepository::<Parcel>::new(pool().await);
    let mut p = parcel("alice", 0);
    repo.save(&p).await.unwrap();

    p.weight = 9.0;
    repo.save(&p).await.unwrap();

    assert_eq!(repo.get(p.id).await.unwrap().unwrap().weight, 9.0);
    let owned = repo
        .find_where("owner", "alice", Page::new(0, 10))
        .await
        .unwrap();
    assert_eq!(owned.len(), 1);
}

#[tokio::test]
#[serial]
async fn kinds_are_isolated() {
    let pool = pool().await;
    let parcels = PostgresRepository::<Parcel>::new(pool.clone());
    let crates = PostgresRepository::<Crate>::new(pool);

    let p = parcel("alice", 0);
    parcels.save(&p).await.unwrap();

    assert!(crates.get(p.id).await.unwrap().is_none());
    assert!(parcels.get(p.id).await.unwrap().is_some());
    let page = Page::new(0, 10);
    assert!(crates.find_where("owner", "alice", page).await.unwrap().is_empty());
    assert_eq!(parcels.find_where("owner", "alice", page).await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn find_where_filters_and_pages_by_creation_time() {
    let repo = PostgresRepository::<Parcel>::new(pool().await);
    let oldest = parcel("alice", 300);
    let middle = parcel("alice", 200);
    let newest = parcel("alice", 100);
    for p in [&newest, &oldest, &middle] {
        repo.save(p).await.unwrap();
    }
    repo.save(&parcel("bob", 50)).await.unwrap();

    let first = repo
        .find_where("owner", "alice", Page::new(0, 2))
        .await
        .unwrap();
    assert_eq!(first, vec![oldest, middle]);

    let second = repo
        .find_where("owner", "alice", Page::new(1, 2))
        .await
        .unwrap();
    assert_eq!(second, vec![newest]);
}

#[tokio::test]
#[serial]
async fn migrations_are_idempotent() {
    let repo = PostgresRepository::<Parcel>::new(pool().await);
    repo.run_migrations().await.unwrap();
    repo.run_migrations().await.unwrap();
}

#[tokio::test]
#[serial]
async fn stale_created_at_is_not_rewritten_on_update() {
    let repo = PostgresRepository::<Parcel>::new(pool().await);
    let mut p = parcel("alice", 1000);
    repo.save(&p).await.unwrap();

    p.created_at = p.created_at + Duration::seconds(1);
    repo.save(&p).await.unwrap();

    // The body is replaced wholesale; created_at in the row is kept.
    let created_at: DateTime<Utc> =
        sqlx::query_scalar("SELECT created_at FROM documents WHERE id = $1")
            .bind(p.id)
            .fetch_one(repo.pool())
            .await
            .unwrap();
    assert_eq!(created_at, p.created_at - Duration::seconds(1));
}
