#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{web, App};
use tracklike_server::{configure, AppState, MemoryStore, Settings, Store};

pub fn test_state() -> AppState {
    test_state_with(Arc::new(MemoryStore::new()))
}

pub fn test_state_with(store: Arc<dyn Store>) -> AppState {
    let config = Settings::new_for_test().expect("Failed to load test config");
    AppState::with_store(config, store)
}

/// The application as `main` wires it, minus CORS.
pub fn test_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(configure)
}
