use crate::common::{fast_polling, recording_polling, test_client, API_KEY, AUTH_HEADER};
use serde_json::json;
use std::time::Duration;
use webcrawlerapi::{JobResult, ScrapeRequest, WebcrawlerClient, WebcrawlerError};
use wiremock::matchers::{body_json, header, headers, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> ScrapeRequest {
    ScrapeRequest::new("webcrawler/url-to-md", json!({"url": "https://example.com"}))
}

async fn mount_submit(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(header("authorization", AUTH_HEADER))
        .and(body_json(json!({
            "input": {"url": "https://example.com"},
            "crawler_id": "webcrawler/url-to-md"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_status_once(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/scrape/s-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_scrape_polls_until_done_and_keeps_every_field() {
    let server = MockServer::start().await;
    mount_submit(&server, json!({"id": "s-1"})).await;

    let final_status = json!({
        "id": "s-1",
        "url": "https://example.com",
        "status": "done",
        "page_status_code": 200,
        "created_at": "2024-05-01T10:00:00Z",
        "structured_data": {"markdown": "# Example Domain"},
        "recommended_pull_delay_ms": 0,
        "cost": 0.002,
        "finished_at": "2024-05-01T10:00:03Z"
    });

    mount_status_once(&server, json!({"id": "s-1", "status": "new"})).await;
    mount_status_once(&server, json!({"id": "s-1", "status": "in_progress"})).await;
    mount_status_once(&server, final_status.clone()).await;

    let result = test_client(&server).scrape_with_meta(&request()).await.unwrap();

    let response = match result {
        JobResult::Done(response) => response,
        other => panic!("expected done, got {:?}", other),
    };
    assert_eq!(serde_json::to_value(&response).unwrap(), final_status);
}

#[tokio::test]
async fn test_null_fields_in_pending_poll_keep_polling() {
    let server = MockServer::start().await;
    mount_submit(&server, json!({"id": "s-1"})).await;

    mount_status_once(
        &server,
        json!({
            "id": "s-1",
            "status": "in_progress",
            "url": null,
            "page_status_code": null,
            "created_at": null,
            "structured_data": null,
            "recommended_pull_delay_ms": null
        }),
    )
    .await;
    mount_status_once(&server, json!({"id": "s-1", "status": "done", "page_status_code": 200})).await;

    let result = test_client(&server).scrape_with_meta(&request()).await.unwrap();

    let response = result.into_done().unwrap();
    assert_eq!(response.page_status_code(), Some(200));
}

#[tokio::test]
async fn test_partial_final_status_round_trips_exactly() {
    let server = MockServer::start().await;
    mount_submit(&server, json!({"id": "s-1"})).await;

    let final_status = json!({
        "error_code": null,
        "error_message": "boom",
        "id": "s-1",
        "status": "error"
    });
    mount_status_once(&server, final_status.clone()).await;

    let result = test_client(&server).scrape_with_meta(&request()).await.unwrap();

    match result {
        JobResult::Failed {
            error_code,
            error_message,
            payload,
        } => {
            assert_eq!(error_code, "unknown_error");
            assert_eq!(error_message, "boom");
            assert_eq!(serde_json::to_value(&payload).unwrap(), final_status);
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_scrape_returns_structured_data() {
    let server = MockServer::start().await;
    mount_submit(&server, json!({"id": "s-1"})).await;
    mount_status_once(
        &server,
        json!({"id": "s-1", "status": "done", "structured_data": {"title": "Example"}}),
    )
    .await;

    let data = test_client(&server).scrape(&request()).await.unwrap();

    assert_eq!(data, json!({"title": "Example"}));
}

#[tokio::test]
async fn test_empty_id_is_invalid_response_without_polling() {
    let server = MockServer::start().await;
    mount_submit(&server, json!({"id": ""})).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "done"})))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_client(&server)
        .scrape_with_meta(&request())
        .await
        .unwrap_err();

    assert!(matches!(err, WebcrawlerError::InvalidResponse(_)));
    assert_eq!(err.error_code(), "invalid_response");
}

#[tokio::test]
async fn test_never_finishing_scrape_times_out_after_max_attempts() {
    let server = MockServer::start().await;
    mount_submit(&server, json!({"id": "s-1"})).await;

    Mock::given(method("GET"))
        .and(path("/v1/scrape/s-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "s-1", "status": "in_progress"})),
        )
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server).with_poll_options(fast_polling(3));
    let err = client.scrape_with_meta(&request()).await.unwrap_err();

    assert!(matches!(err, WebcrawlerError::Timeout { attempts: 3, .. }));
    assert_eq!(err.error_code(), "timeout");
}

#[tokio::test]
async fn test_recommended_delay_is_used_for_next_poll() {
    let server = MockServer::start().await;
    mount_submit(&server, json!({"id": "s-1"})).await;
    mount_status_once(
        &server,
        json!({"id": "s-1", "status": "new", "recommended_pull_delay_ms": 40}),
    )
    .await;
    mount_status_once(&server, json!({"id": "s-1", "status": "done"})).await;

    let (options, events) = recording_polling(5);
    let result = test_client(&server)
        .scrape_with_options(&request(), &options)
        .await
        .unwrap();

    assert!(result.is_done());
    let delays: Vec<Duration> = events.lock().unwrap().iter().map(|e| e.delay).collect();
    assert_eq!(
        delays,
        vec![Duration::from_millis(10), Duration::from_millis(40)]
    );
}

#[tokio::test]
async fn test_error_status_is_reported_as_failed_job() {
    let server = MockServer::start().await;
    mount_submit(&server, json!({"id": "s-1"})).await;
    Mock::given(method("GET"))
        .and(path("/v1/scrape/s-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "s-1",
            "status": "error",
            "error_code": "blocked_by_robots_txt",
            "error_message": "Page is blocked by robots.txt"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    match client.scrape_with_meta(&request()).await.unwrap() {
        JobResult::Failed {
            error_code,
            error_message,
            payload,
        } => {
            assert_eq!(error_code, "blocked_by_robots_txt");
            assert_eq!(error_message, "Page is blocked by robots.txt");
            assert_eq!(payload.id(), Some("s-1"));
        }
        other => panic!("expected failure, got {:?}", other),
    }

    let err = client.scrape(&request()).await.unwrap_err();
    assert!(matches!(err, WebcrawlerError::JobFailed { .. }));
    assert_eq!(err.error_code(), "blocked_by_robots_txt");
}

#[tokio::test]
async fn test_remote_error_carries_api_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error_code": "unauthorized",
            "error_message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server).scrape_async(&request()).await.unwrap_err();

    match &err {
        WebcrawlerError::Remote {
            status,
            error_code,
            error_message,
        } => {
            assert_eq!(*status, 401);
            assert_eq!(error_code, "unauthorized");
            assert_eq!(error_message, "Invalid API key");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_remote_error_falls_back_to_legacy_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/scrape/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .get_scrape_result("missing")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.error_code(), "unknown_error");
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn test_unparseable_error_body_uses_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server).scrape_async(&request()).await.unwrap_err();

    match err {
        WebcrawlerError::Remote {
            status,
            error_code,
            error_message,
        } => {
            assert_eq!(status, 502);
            assert_eq!(error_code, "unknown_error");
            assert_eq!(error_message, "Unknown error");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_success_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_client(&server).scrape_async(&request()).await.unwrap_err();

    assert!(matches!(err, WebcrawlerError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_status_poll_disables_caching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/scrape/s-1"))
        .and(header("authorization", AUTH_HEADER))
        .and(headers(
            "cache-control",
            vec!["no-cache", "no-store", "must-revalidate"],
        ))
        .and(header("pragma", "no-cache"))
        .and(header("expires", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "s-1", "status": "new"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = test_client(&server).get_scrape_result("s-1").await.unwrap();

    assert_eq!(response.status(), "new");
}

#[tokio::test]
async fn test_v2_scrape_is_async_and_uses_simple_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/scrape"))
        .and(query_param("async", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "s-2"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/scrape/s-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "s-2", "status": "queued"})))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/scrape/s-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "s-2", "status": "done"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server).with_api_version("v2");
    let result = client.scrape_with_meta(&request()).await.unwrap();

    assert!(result.is_done());
}

#[tokio::test]
async fn test_wait_for_previously_submitted_scrape() {
    let server = MockServer::start().await;
    mount_status_once(&server, json!({"id": "s-1", "status": "in_progress"})).await;
    mount_status_once(&server, json!({"id": "s-1", "status": "done"})).await;

    let result = test_client(&server)
        .wait_for_scrape(&webcrawlerapi::JobId::new("s-1"))
        .await
        .unwrap();

    assert_eq!(result.payload().and_then(|r| r.id()), Some("s-1"));
}

#[tokio::test]
async fn test_unreachable_api_is_network_error() {
    let client = WebcrawlerClient::with_client(API_KEY, "http://127.0.0.1:1", reqwest::Client::new());

    let err = client.scrape_async(&request()).await.unwrap_err();

    assert!(matches!(err, WebcrawlerError::Network { .. }));
    assert_eq!(err.error_code(), "network_error");
}
