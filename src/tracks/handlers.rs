use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{debug, info};

use crate::auth::handlers::current_user;
use crate::db::models::{LikeOutcome, NewTrack};
use crate::db::repository::TrackRepository;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub track_id: i64,
}

pub async fn create_track(
    req: web::Json<NewTrack>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let track = req.into_inner();
    track.validate().map_err(AppError::ValidationError)?;

    let track = state.store.create_track(&track).await?;
    info!(track_id = track.id, "Created track");
    Ok(HttpResponse::Ok().json(track))
}

/// Responds with the new like record, or `null` when the track was already liked.
pub async fn like_track(
    http_req: HttpRequest,
    req: web::Json<LikeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&http_req, &state).await?;

    let outcome = state.store.like(user.id, req.track_id).await?;
    match &outcome {
        LikeOutcome::Created(like) => {
            info!(user_id = user.id, track_id = like.track_id, "Liked track")
        }
        LikeOutcome::AlreadyLiked => {
            debug!(user_id = user.id, track_id = req.track_id, "Track already liked")
        }
    }

    Ok(HttpResponse::Ok().json(outcome.into_created()))
}

pub async fn liked_tracks(
    http_req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = current_user(&http_req, &state).await?;
    let tracks = state.store.list_liked(user.id).await?;
    Ok(HttpResponse::Ok().json(tracks))
}
