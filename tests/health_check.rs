mod common;

use actix_web::test;
use chrono::DateTime;

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(common::test_app(common::test_state())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "healthy");
    assert!(DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
}

#[actix_web::test]
async fn test_cors_allows_configured_origin_only() {
    let state = common::test_state();
    let cors_config = state.config.cors.clone();
    let app = test::init_service(
        common::test_app(state).wrap(tracklike_server::cors(&cors_config)),
    )
    .await;

    let resp = test::TestRequest::get()
        .uri("/health")
        .insert_header(("Origin", "http://localhost:8000"))
        .send_request(&app)
        .await;
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:8000"
    );

    let resp = test::TestRequest::get()
        .uri("/health")
        .insert_header(("Origin", "http://evil.example"))
        .send_request(&app)
        .await;
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}
