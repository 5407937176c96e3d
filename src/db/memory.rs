use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::models::{LikeOutcome, LikedTrack, NewTrack, Track, User};
use crate::db::repository::{Store, TrackRepository, UserRepository};
use crate::error::{AppError, AuthError};
use crate::Result;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    tracks: Vec<Track>,
    liked_tracks: Vec<LikedTrack>,
}

impl Tables {
    fn next_id(len: usize) -> i64 {
        len as i64 + 1
    }
}

/// In-process store with the same constraints as the Postgres schema.
///
/// Every write holds the table lock across its check and its insert, so the
/// phone and (user, track) uniqueness rules hold under concurrent callers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of like rows for a pair; anything above one is a broken invariant.
    pub async fn like_count(&self, user_id: i64, track_id: i64) -> usize {
        let tables = self.tables.read().await;
        tables
            .liked_tracks
            .iter()
            .filter(|l| l.user_id == user_id && l.track_id == track_id)
            .count()
    }

    pub async fn user_count(&self, phone: &str) -> usize {
        let tables = self.tables.read().await;
        tables.users.iter().filter(|u| u.phone == phone).count()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.phone == phone).cloned())
    }

    async fn create_user(&self, phone: &str, password_hash: &str) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.phone == phone) {
            return Err(AuthError::DuplicatePhone.into());
        }

        let user = User {
            id: Tables::next_id(tables.users.len()),
            phone: phone.to_string(),
            hashed_password: password_hash.to_string(),
            is_active: true,
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TrackRepository for MemoryStore {
    async fn create_track(&self, track: &NewTrack) -> Result<Track> {
        track.validate().map_err(AppError::ValidationError)?;

        let mut tables = self.tables.write().await;
        let track = Track {
            id: Tables::next_id(tables.tracks.len()),
            title: track.title.clone(),
            artist: track.artist.clone(),
            duration: track.duration,
        };
        tables.tracks.push(track.clone());
        Ok(track)
    }

    async fn like(&self, user_id: i64, track_id: i64) -> Result<LikeOutcome> {
        let mut tables = self.tables.write().await;
        if !tables.tracks.iter().any(|t| t.id == track_id) {
            return Err(AppError::NotFound(format!("Track {} not found", track_id)));
        }
        if tables
            .liked_tracks
            .iter()
            .any(|l| l.user_id == user_id && l.track_id == track_id)
        {
            return Ok(LikeOutcome::AlreadyLiked);
        }

        let like = LikedTrack {
            id: Tables::next_id(tables.liked_tracks.len()),
            user_id,
            track_id,
        };
        tables.liked_tracks.push(like.clone());
        Ok(LikeOutcome::Created(like))
    }

    async fn list_liked(&self, user_id: i64) -> Result<Vec<Track>> {
        let tables = self.tables.read().await;
        let tracks = tables
            .liked_tracks
            .iter()
            .filter(|l| l.user_id == user_id)
            .filter_map(|l| tables.tracks.iter().find(|t| t.id == l.track_id).cloned())
            .collect();
        Ok(tracks)
    }
}

impl Store for MemoryStore {}
