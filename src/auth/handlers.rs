use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::db::models::User;
use crate::error::{AppError, AuthError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

pub async fn register(
    req: web::Json<Credentials>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for phone: {}", req.phone);
    match state.auth_service.register(&req.phone, &req.password).await {
        Ok(user) => Ok(HttpResponse::Created().json(user)),
        Err(e) => {
            error!("Registration failed for phone: {}: {}", req.phone, e);
            Err(e)
        }
    }
}

pub async fn login(
    req: web::Json<Credentials>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for phone: {}", req.phone);
    match state.auth_service.login(&req.phone, &req.password).await {
        Ok(access_token) => {
            info!("Login successful for phone: {}", req.phone);
            Ok(HttpResponse::Ok().json(TokenResponse {
                access_token,
                token_type: "bearer",
            }))
        }
        Err(e) => {
            error!("Login failed for phone: {}: {}", req.phone, e);
            Err(e)
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidToken.into())
}

/// Resolves the request's bearer token to the calling user.
pub async fn current_user(req: &HttpRequest, state: &AppState) -> Result<User, AppError> {
    let token = bearer_token(req)?;
    state.auth_service.authenticate(token).await
}
