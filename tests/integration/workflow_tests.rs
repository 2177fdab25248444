/*!
 * Integration tests for the per-video enhancement workflow
 */

use serde_json::json;
use podenhance::catalog::{EnhancementStore, InMemoryEnhancementStore, StaticDisciplineCatalog};
use podenhance::enhancement::EnhancementRequest;
use podenhance::errors::{AppError, EnhancementError};
use podenhance::workflow::{EnhancementWorkflow, RequestOutcome};
use crate::common::mock_api::MockEnhancementApi;
use crate::common::MockServer;

fn sample_request() -> EnhancementRequest {
    EnhancementRequest::new("https://pod.example.org/media/v.mp4", "user-1", "https://pod.example.org/hook")
        .media_type("video/mp4")
}

#[tokio::test]
async fn test_requestForVideo_firstTime_shouldCreateAndRecordId() {
    let api = MockEnhancementApi::new();
    let workflow = EnhancementWorkflow::new(api.clone(), InMemoryEnhancementStore::new());
    let catalog = StaticDisciplineCatalog::new(["Physics", "Chemistry"]);

    let outcome = workflow.request_for_video("video-1", &sample_request(), &catalog).await.unwrap();

    assert_eq!(outcome, RequestOutcome::Requested(Some(json!({ "status": "OK", "id": "enh-1" }))));
    assert!(workflow.is_requested("video-1"));
    assert!(!workflow.is_ready("video-1"));
    assert_eq!(
        workflow.store().get("video-1").unwrap().enhancement_id.as_deref(),
        Some("enh-1")
    );
    assert_eq!(api.tracker.lock().unwrap().last_disciplines, vec!["Physics", "Chemistry"]);
}

#[tokio::test]
async fn test_requestForVideo_secondTime_shouldNotCallApi() {
    let api = MockEnhancementApi::new();
    let workflow = EnhancementWorkflow::new(api.clone(), InMemoryEnhancementStore::new());
    let catalog = StaticDisciplineCatalog::new(["Physics"]);

    workflow.request_for_video("video-1", &sample_request(), &catalog).await.unwrap();
    let outcome = workflow.request_for_video("video-1", &sample_request(), &catalog).await.unwrap();

    assert_eq!(outcome, RequestOutcome::AlreadyRequested);
    assert_eq!(api.call_count(), 1);
}

#[tokio::test]
async fn test_requestForVideo_emptyBody_shouldRecordWithoutId() {
    let api = MockEnhancementApi::new().with_empty_creation();
    let workflow = EnhancementWorkflow::new(api, InMemoryEnhancementStore::new());
    let catalog = StaticDisciplineCatalog::new(["Physics"]);

    let outcome = workflow.request_for_video("video-1", &sample_request(), &catalog).await.unwrap();

    assert_eq!(outcome, RequestOutcome::Requested(None));
    assert_eq!(workflow.store().get("video-1").unwrap().enhancement_id, None);
}

#[tokio::test]
async fn test_requestForVideo_noDiscipline_shouldFailAndRecordNothing() {
    let api = MockEnhancementApi::new();
    let workflow = EnhancementWorkflow::new(api.clone(), InMemoryEnhancementStore::new());

    let result = workflow
        .request_for_video("video-1", &sample_request(), &StaticDisciplineCatalog::default())
        .await;

    assert!(matches!(
        result,
        Err(AppError::Enhancement(EnhancementError::NoDisciplineConfigured))
    ));
    assert!(!workflow.is_requested("video-1"));
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_requestForVideo_apiFailure_shouldRecordNothing() {
    let api = MockEnhancementApi::new().failing(503);
    let workflow = EnhancementWorkflow::new(api, InMemoryEnhancementStore::new());
    let catalog = StaticDisciplineCatalog::new(["Physics"]);

    let result = workflow.request_for_video("video-1", &sample_request(), &catalog).await;

    assert!(result.is_err());
    assert!(!workflow.is_requested("video-1"));
}

#[tokio::test]
async fn test_captionsForVideo_shouldClipTrackAndMarkReady() {
    let api = MockEnhancementApi::new();
    let store = InMemoryEnhancementStore::new();
    store.mark_requested("video-1", Some("enh-1".to_string()));
    let workflow = EnhancementWorkflow::new(api.clone(), store);

    let track = workflow.captions_for_video("video-1", "enh-1", 12.0).await.unwrap();

    assert_eq!(track.len(), 3);
    assert_eq!(track.captions[1].start, "00:04.500");
    assert_eq!(track.captions[2].end, "00:12.000");
    assert!(workflow.is_ready("video-1"));
    assert_eq!(api.calls(), vec!["get_latest_version"]);
}

#[tokio::test]
async fn test_captionsForVideo_apiFailure_shouldNotMarkReady() {
    let api = MockEnhancementApi::new().failing(404);
    let workflow = EnhancementWorkflow::new(api, InMemoryEnhancementStore::new());

    let result = workflow.captions_for_video("video-1", "enh-1", 12.0).await;

    assert!(result.is_err());
    assert!(!workflow.store().is_ready("video-1"));
}

#[tokio::test]
async fn test_workflow_withRealClient_shouldRunEndToEnd() {
    let server = MockServer::start().await;
    server.respond_token("tok-1");
    server.respond("POST", "/v1/enhancements/url", 200, r#"{"status":"OK","id":"enh-7"}"#);
    server.respond(
        "GET",
        "/v1/enhancements/enh-7/versions/latest",
        200,
        json!({
            "id": "v1",
            "transcript": { "sentences": [
                { "start": 0.0, "end": 3.0, "text": "Intro" },
                { "start": 30.0, "end": 33.0, "text": "After the end" }
            ]}
        })
        .to_string(),
    );

    let workflow = EnhancementWorkflow::new(server.client(), InMemoryEnhancementStore::new());
    let catalog = StaticDisciplineCatalog::new(["Physics"]);

    workflow.request_for_video("video-7", &sample_request(), &catalog).await.unwrap();
    let enhancement_id = workflow.store().get("video-7").unwrap().enhancement_id.unwrap();
    let track = workflow.captions_for_video("video-7", &enhancement_id, 20.0).await.unwrap();

    assert_eq!(track.len(), 1);
    assert_eq!(track.to_string(), "WEBVTT\n\n00:00.000 --> 00:03.000\nIntro\n");
    assert!(workflow.is_ready("video-7"));
    assert_eq!(server.count("POST", "/token"), 1);
}

#[test]
fn test_predicates_shouldDelegateToStore() {
    let store = InMemoryEnhancementStore::new();
    store.mark_requested("video-1", None);
    let workflow = EnhancementWorkflow::new(MockEnhancementApi::new(), store);
    let catalog = StaticDisciplineCatalog::new(["Physics"]);

    let outcome = tokio_test::block_on(workflow.request_for_video("video-1", &sample_request(), &catalog));

    let outcome = tokio_test::assert_ok!(outcome);
    assert_eq!(outcome, RequestOutcome::AlreadyRequested);
    assert!(workflow.is_requested("video-1"));
    assert!(!workflow.is_ready("video-1"));
    assert_eq!(workflow.api().call_count(), 0);
}
