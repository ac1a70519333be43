//! Integration tests that boot the full application over TCP.

use std::time::Duration;

async fn spawn_app() -> u16 {
    // Override configuration through environment variables
    std::env::set_var("APP_SERVER__PORT", "0");
    std::env::set_var("APP_SERVER__SESSION_SECRET", "test-session-secret");
    std::env::set_var("APP_OPENAI__API_KEY", "sk-test");
    let artifact_dir =
        std::env::temp_dir().join(format!("studio-artifacts-{}", uuid::Uuid::new_v4()));
    std::env::set_var("APP_ARTIFACTS__DIR", &artifact_dir);

    studio_frontend::services::metrics::init_metrics();

    let configuration =
        studio_frontend::config::get_configuration().expect("Failed to read configuration");
    let application = studio_frontend::startup::Application::build(configuration)
        .await
        .expect("Failed to build application");
    let port = application.port();

    tokio::spawn(async move {
        let _ = application.run_until_stopped().await;
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    port
}

#[tokio::test]
async fn health_check_works() {
    let port = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn index_page_lists_the_tools() {
    let port = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/", port))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("AI Content Studio"));
    assert!(body.contains("/essay"));
    assert!(body.contains("/image"));
    assert!(body.contains("/chatbot"));
    assert!(body.contains("/audio"));
    assert!(body.contains("/summary"));
}

#[tokio::test]
async fn metrics_endpoint_reports_http_requests() {
    let port = spawn_app().await;
    let client = reqwest::Client::new();

    // Generate at least one observation before scraping.
    client
        .get(format!("http://127.0.0.1:{}/health", port))
        .send()
        .await
        .expect("Failed to execute request");

    let response = client
        .get(format!("http://127.0.0.1:{}/metrics", port))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("http_requests_total"));
    assert!(body.contains("http_request_duration_seconds"));
}
