use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, SlideRun};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_runs_empty() {
    let resp = app().oneshot(empty_request("GET", "/slideruns")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let runs: Vec<SlideRun> = body_json(resp).await;
    assert!(runs.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_run_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/slideruns",
            r#"{ "SnaggerId": "416", "OccurredOn": "3/1/2014 10:00:00 AM", "TimeInMs": "5000" }"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let run: SlideRun = body_json(resp).await;
    assert_eq!(run.snagger_id, "416");
    assert_eq!(run.time_in_ms, "5000");
}

#[tokio::test]
async fn create_run_missing_snagger_is_422() {
    let resp = app()
        .oneshot(json_request("POST", "/slideruns", r#"{"TimeInMs":"5000"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get ---

#[tokio::test]
async fn get_run_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/slideruns/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_run_bad_uuid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/slideruns/416"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update / delete ---

#[tokio::test]
async fn update_run_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/slideruns/00000000-0000-0000-0000-000000000000",
            r#"{"TimeInMs":"1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_run_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/slideruns/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn slide_run_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/slideruns", r#"{"SnaggerId":"416","TimeInMs":"5000"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: SlideRun = body_json(resp).await;
    let id = created.id;

    // list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/slideruns"))
        .await
        .unwrap();
    let runs: Vec<SlideRun> = body_json(resp).await;
    assert_eq!(runs, vec![created.clone()]);

    // update, partial
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/slideruns/{id}"), r#"{"TimeInMs":"4800"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: SlideRun = body_json(resp).await;
    assert_eq!(updated.snagger_id, "416");
    assert_eq!(updated.time_in_ms, "4800");

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/slideruns/{id}")))
        .await
        .unwrap();
    let fetched: SlideRun = body_json(resp).await;
    assert_eq!(fetched, updated);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/slideruns/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/slideruns/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
