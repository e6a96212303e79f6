use std::time::Duration;

use serde_json::json;
use sticker_core::models::{
    AiCredentialsRequest, DraftUpdateRequest, JobStatus, ProjectCreateRequest, StickerCount,
};
use sticker_core::GatewayErrorKind;
use sticker_gateway::{HttpGateway, StickerGateway};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn gateway_for(server: &MockServer) -> HttpGateway {
    HttpGateway::new(&format!("{}/api/v1", server.uri()), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_create_project_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/projects"))
        .and(body_json(json!({ "title": "LINE Sticker Project", "stickerCount": 8 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "proj_123",
            "title": "LINE Sticker Project",
            "stickerCount": 8,
            "status": "DRAFT"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server).await;
    let project = gateway
        .create_project(&ProjectCreateRequest {
            title: Some("LINE Sticker Project".to_string()),
            sticker_count: StickerCount::Eight,
        })
        .await
        .unwrap();
    assert_eq!(project.id, "proj_123");
    assert_eq!(project.status.to_string(), "DRAFT");
}

#[tokio::test]
async fn test_non_success_status_maps_to_gateway_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/providers"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server).await;
    let err = gateway.list_providers().await.unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::Unavailable);
    assert_eq!(err.status, Some(503));
    assert_eq!(err.endpoint, "GET /providers");
    assert!(err.message.contains("API 503"));
}

#[tokio::test]
async fn test_void_endpoints_ignore_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/projects/proj_123/ai-credentials"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/projects/proj_123/ai-verify"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server).await;
    gateway
        .set_ai_credentials(
            "proj_123",
            &AiCredentialsRequest {
                ai_provider: "openai".to_string(),
                api_key: "sk-test".to_string(),
                api_base: None,
            },
        )
        .await
        .unwrap();
    gateway.verify_ai_credentials("proj_123").await.unwrap();
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs/job_1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\":"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server).await;
    let err = gateway.get_job("job_1").await.unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::Decode);
}

#[tokio::test]
async fn test_path_ids_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/stickers/stk%201:regenerate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job_9",
            "type": "GENERATE_IMAGE",
            "status": "QUEUED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server).await;
    let job = gateway.regenerate_sticker("stk 1").await.unwrap();
    assert_eq!(job.id, "job_9");
    assert_eq!(job.status, JobStatus::Queued);
}

#[tokio::test]
async fn test_update_draft_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/drafts/draft_1"))
        .and(body_json(json!({ "caption": "お疲れさま" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "draft_1",
            "projectId": "proj_123",
            "index": 1,
            "caption": "お疲れさま",
            "imagePrompt": "cat bowing",
            "status": "DRAFT"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server).await;
    let draft = gateway
        .update_draft(
            "draft_1",
            &DraftUpdateRequest {
                caption: Some("お疲れさま".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(draft.caption, "お疲れさま");
}

#[tokio::test]
async fn test_suggest_theme_without_seed_sends_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/projects/proj_123/theme:suggest"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "suggestions": ["Office Life", "Rainy Day"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server).await;
    let response = gateway.suggest_theme("proj_123", None).await.unwrap();
    assert_eq!(response.suggestions.len(), 2);
}

#[tokio::test]
async fn test_export_without_warnings_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/projects/proj_123/export"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "downloadUrl": "https://example.com/export.zip"
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server).await;
    let result = gateway.export_project("proj_123").await.unwrap();
    assert_eq!(result.download_url, "https://example.com/export.zip");
    assert!(result.warnings.is_empty());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/projects/proj_123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "proj_123", "stickerCount": 8 }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let gateway =
        HttpGateway::new(&format!("{}/api/v1", server.uri()), Duration::from_millis(300)).unwrap();
    let err = gateway.get_project("proj_123").await.unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::Timeout);
}
