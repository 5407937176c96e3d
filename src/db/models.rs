use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub phone: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Track {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub duration: i32,
}

/// Fields supplied when submitting a track.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    pub duration: i32,
}

impl NewTrack {
    pub fn validate(&self) -> Result<(), String> {
        if self.duration < 0 {
            return Err(format!("duration must be non-negative, got {}", self.duration));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct LikedTrack {
    pub id: i64,
    pub user_id: i64,
    pub track_id: i64,
}

/// Result of a like request. A repeated like is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeOutcome {
    Created(LikedTrack),
    AlreadyLiked,
}

impl LikeOutcome {
    pub fn into_created(self) -> Option<LikedTrack> {
        match self {
            LikeOutcome::Created(like) => Some(like),
            LikeOutcome::AlreadyLiked => None,
        }
    }
}
