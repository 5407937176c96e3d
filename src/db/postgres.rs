use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::db::models::{LikeOutcome, LikedTrack, NewTrack, Track, User};
use crate::db::repository::{Store, TrackRepository, UserRepository};
use crate::error::{has_sqlstate, AppError, AuthError, FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};
use crate::Result;

/// Idempotent schema bootstrap, run once at startup.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        phone TEXT NOT NULL,
        hashed_password TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        CONSTRAINT uq_users_phone UNIQUE (phone)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tracks (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        artist TEXT NOT NULL,
        duration INTEGER NOT NULL CHECK (duration >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS liked_tracks (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users (id),
        track_id BIGINT NOT NULL REFERENCES tracks (id),
        CONSTRAINT uq_liked_tracks_user_track UNIQUE (user_id, track_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_liked_tracks_user_id ON liked_tracks (user_id)",
];

pub struct PgStore {
    pool: Arc<PgPool>,
}

impl PgStore {
    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(self.pool.as_ref()).await?;
        }
        info!("Database schema ready");
        Ok(())
    }

    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }

    pub async fn create_user_with_transaction(
        &self,
        phone: &str,
        password_hash: &str,
        transaction: &mut Transaction<'_, Postgres>,
    ) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (phone, hashed_password, is_active)
            VALUES ($1, $2, TRUE)
            RETURNING id, phone, hashed_password, is_active
            "#,
        )
        .bind(phone)
        .bind(password_hash)
        .fetch_one(&mut **transaction)
        .await
        .map_err(|e| -> AppError {
            if has_sqlstate(&e, UNIQUE_VIOLATION) {
                AuthError::DuplicatePhone.into()
            } else {
                e.into()
            }
        })
    }

    pub async fn like_with_transaction(
        &self,
        user_id: i64,
        track_id: i64,
        transaction: &mut Transaction<'_, Postgres>,
    ) -> Result<LikeOutcome> {
        let like = sqlx::query_as::<_, LikedTrack>(
            r#"
            INSERT INTO liked_tracks (user_id, track_id)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT uq_liked_tracks_user_track DO NOTHING
            RETURNING id, user_id, track_id
            "#,
        )
        .bind(user_id)
        .bind(track_id)
        .fetch_optional(&mut **transaction)
        .await
        .map_err(|e| -> AppError {
            if has_sqlstate(&e, FOREIGN_KEY_VIOLATION) {
                AppError::NotFound(format!("Track {} not found", track_id))
            } else {
                e.into()
            }
        })?;

        Ok(match like {
            Some(like) => LikeOutcome::Created(like),
            None => LikeOutcome::AlreadyLiked,
        })
    }
}

/// Commits on success, rolls back on failure, and hands back the original result.
async fn finish<T>(transaction: Transaction<'static, Postgres>, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            transaction.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = transaction.rollback().await {
                warn!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(e)
        }
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, phone, hashed_password, is_active FROM users WHERE phone = $1",
        )
        .bind(phone)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn create_user(&self, phone: &str, password_hash: &str) -> Result<User> {
        let mut transaction = self.begin_transaction().await?;
        let result = self
            .create_user_with_transaction(phone, password_hash, &mut transaction)
            .await;
        finish(transaction, result).await
    }
}

#[async_trait]
impl TrackRepository for PgStore {
    async fn create_track(&self, track: &NewTrack) -> Result<Track> {
        track.validate().map_err(AppError::ValidationError)?;

        let mut transaction = self.begin_transaction().await?;
        let result = sqlx::query_as::<_, Track>(
            r#"
            INSERT INTO tracks (title, artist, duration)
            VALUES ($1, $2, $3)
            RETURNING id, title, artist, duration
            "#,
        )
        .bind(&track.title)
        .bind(&track.artist)
        .bind(track.duration)
        .fetch_one(&mut *transaction)
        .await
        .map_err(AppError::from);
        finish(transaction, result).await
    }

    async fn like(&self, user_id: i64, track_id: i64) -> Result<LikeOutcome> {
        let mut transaction = self.begin_transaction().await?;
        let result = self.like_with_transaction(user_id, track_id, &mut transaction).await;
        finish(transaction, result).await
    }

    async fn list_liked(&self, user_id: i64) -> Result<Vec<Track>> {
        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT t.id, t.title, t.artist, t.duration
            FROM tracks t
            JOIN liked_tracks l ON l.track_id = t.id
            WHERE l.user_id = $1
            ORDER BY l.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(tracks)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn close(&self) {
        self.pool.close().await;
    }
}
