mod common;

#[tokio::test]
async fn test_health_endpoint_success() {
    let state = common::create_test_state();
    common::create_test_redirect(&state, "Zebra Facts", None, None).await;
    let server = common::make_server(state);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["store"]["message"], "memory, 1 records");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let server = common::make_server(common::create_test_state());

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("checks").is_some());
    assert!(json["checks"].get("store").is_some());
    assert!(json["checks"].get("cache").is_some());
}

#[tokio::test]
async fn test_health_is_public_when_token_configured() {
    let server = common::make_server(common::create_protected_state());

    server.get("/health").await.assert_status_ok();
}
