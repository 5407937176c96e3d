use async_trait::async_trait;

use crate::db::models::{LikeOutcome, NewTrack, Track, User};
use crate::Result;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Exact-match lookup; the phone is used as given.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>>;

    /// Fails with `AuthError::DuplicatePhone` if the phone is taken, including
    /// when a concurrent call won the race.
    async fn create_user(&self, phone: &str, password_hash: &str) -> Result<User>;
}

#[async_trait]
pub trait TrackRepository: Send + Sync {
    async fn create_track(&self, track: &NewTrack) -> Result<Track>;

    /// Records that `user_id` likes `track_id`, at most once per pair.
    async fn like(&self, user_id: i64, track_id: i64) -> Result<LikeOutcome>;

    /// Tracks liked by `user_id`, in the order they were liked.
    async fn list_liked(&self, user_id: i64) -> Result<Vec<Track>>;
}

/// Everything the request handlers need from persistence.
#[async_trait]
pub trait Store: UserRepository + TrackRepository {
    async fn close(&self) {}
}
