//! HTTP-level tests for the farmer quality review.

mod common;

use axum::http::{Method, StatusCode};

use common::{
    body_json, build_test_app, get_auth, multipart_auth, post_auth, MockUpstream, Part,
};

const DETECT: &str = "/quality/impurity_detection";

#[tokio::test]
async fn mount_lists_samples() {
    let mock = MockUpstream::start().await;
    let response = post_auth(build_test_app(&mock), "/api/v1/quality/G001/mount").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["farmer_id"], "G001");
    assert_eq!(json["data"]["total"], 3);
    assert!(json["data"]["rows"][0]["impurity"].is_null());
    assert_eq!(json["data"]["rows"][0]["predicted_class"], "RSS4");
}

#[tokio::test]
async fn view_filters_by_grade_and_dates() {
    let mock = MockUpstream::start().await;
    let app = build_test_app(&mock);
    post_auth(app.clone(), "/api/v1/quality/G001/mount").await;

    let json = body_json(get_auth(app.clone(), "/api/v1/quality/G001?grade=RSS5").await).await;
    assert_eq!(json["data"]["rows"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["rows"][0]["index"], 1);

    let json = body_json(
        get_auth(app, "/api/v1/quality/G001?from=2026-10-05&to=2026-10-07").await,
    )
    .await;
    let indexes: Vec<u64> = json["data"]["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indexes, vec![1, 2]);
}

#[tokio::test]
async fn view_of_unmounted_farmer_is_409() {
    let mock = MockUpstream::start().await;
    let app = build_test_app(&mock);
    post_auth(app.clone(), "/api/v1/quality/G001/mount").await;

    let response = get_auth(app, "/api/v1/quality/G002").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "PAGE_NOT_MOUNTED");
}

#[tokio::test]
async fn detect_caches_result() {
    let mock = MockUpstream::start().await;
    let app = build_test_app(&mock);
    post_auth(app.clone(), "/api/v1/quality/G001/mount").await;

    let response = post_auth(app.clone(), "/api/v1/quality/G001/samples/0/detect").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["rows"][0]["impurity"]["impurity_percentage"], 3.5);
    assert_eq!(
        json["data"]["rows"][0]["impurity"]["masked_image_path"],
        "/masks/1.png"
    );

    post_auth(app, "/api/v1/quality/G001/samples/0/detect").await;
    assert_eq!(mock.calls_to(DETECT).len(), 1);
}

#[tokio::test]
async fn detect_of_missing_photo_is_502() {
    let mock = MockUpstream::start().await;
    let app = build_test_app(&mock);
    post_auth(app.clone(), "/api/v1/quality/G001/mount").await;

    let response = post_auth(app, "/api/v1/quality/G001/samples/2/detect").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(mock.calls_to(DETECT).is_empty());
}

#[tokio::test]
async fn detect_all_runs_over_filtered_samples() {
    let mock = MockUpstream::start().await;
    let app = build_test_app(&mock);
    post_auth(app.clone(), "/api/v1/quality/G001/mount").await;

    let response = post_auth(app, "/api/v1/quality/G001/detect-all?grade=RSS5").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["rows"][0]["impurity"]["impurity_percentage"], 3.5);
    assert_eq!(mock.calls_to(DETECT).len(), 1);
}

#[tokio::test]
async fn upload_without_image_is_400() {
    let mock = MockUpstream::start().await;
    let app = build_test_app(&mock);
    post_auth(app.clone(), "/api/v1/quality/G001/mount").await;

    let response = multipart_auth(
        app,
        Method::POST,
        "/api/v1/quality/G001/upload",
        &[Part::Text("rubber_grade", "2")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["image_file"].is_string());
    assert!(mock.calls_to("/quality/upload").is_empty());
}

#[tokio::test]
async fn upload_sends_sample_and_reloads() {
    let mock = MockUpstream::start().await;
    let app = build_test_app(&mock);
    post_auth(app.clone(), "/api/v1/quality/G001/mount").await;

    let response = multipart_auth(
        app,
        Method::POST,
        "/api/v1/quality/G001/upload",
        &[
            Part::Text("rubber_grade", "3 after"),
            Part::File {
                name: "image_file",
                file_name: "sheet.jpg",
                content_type: "image/jpeg",
                bytes: b"\xff\xd8\xff",
            },
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["total"], 3);
    let call = &mock.calls_to("/quality/upload")[0];
    assert!(call.is_multipart());
    assert!(call.body.contains("3 after"));
    assert_eq!(
        mock.calls_to("/quality/get_rubber_sheet_quality").len(),
        2
    );
}
