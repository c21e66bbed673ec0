mod common;

use axum::http::StatusCode;
use common::{admin_cookie, body_json, json_request, test_app, StubModel};
use serde_json::json;
use tower::ServiceExt;

const ENDPOINT: &str = "/api/admin/parse-announcement";

#[tokio::test]
async fn test_requires_session() -> anyhow::Result<()> {
    let app = test_app(StubModel::replying("{}")).await?;

    let response = app.router.clone()
        .oneshot(json_request("POST", ENDPOINT, None, json!({"text": "UPCAT opens soon"})))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_missing_input_is_bad_request() -> anyhow::Result<()> {
    let model = StubModel::replying("{}");
    let app = test_app(model.clone()).await?;
    let cookie = admin_cookie(&app.ctx).await?;

    let response = app.router.clone()
        .oneshot(json_request("POST", ENDPOINT, Some(&cookie), json!({})))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await?["error"], "Either image or text is required");

    let response = app.router.clone()
        .oneshot(json_request("POST", ENDPOINT, Some(&cookie), json!("just a string")))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing reached the model
    assert!(model.prompts.lock().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_fenced_model_output_is_parsed() -> anyhow::Result<()> {
    let reply = "```json\n{\"application_start\": \"August 1, 2025\", \"exam_fee\": null, \"exam_dates\": [{\"date\": \"October 5, 2025\", \"note\": \"Main campus\"}], \"confidence\": 0.9}\n```";
    let model = StubModel::replying(reply);
    let app = test_app(model.clone()).await?;
    let cookie = admin_cookie(&app.ctx).await?;

    let response = app.router.clone()
        .oneshot(json_request(
            "POST",
            ENDPOINT,
            Some(&cookie),
            json!({"text": "ACET applications open August 1"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await?,
        json!({
            "application_start": "August 1, 2025",
            "exam_fee": null,
            "exam_dates": [{"date": "October 5, 2025", "note": "Main campus"}],
        })
    );

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].image_url.is_none());
    assert!(prompts[0].text.ends_with("ACET applications open August 1"));

    Ok(())
}

#[tokio::test]
async fn test_unusable_model_output_is_server_error() -> anyhow::Result<()> {
    for reply in ["I could not find any dates.", "[\"August 1\"]"] {
        let app = test_app(StubModel::replying(reply)).await?;
        let cookie = admin_cookie(&app.ctx).await?;

        let response = app.router.clone()
            .oneshot(json_request("POST", ENDPOINT, Some(&cookie), json!({"text": "DCAT"})))
            .await?;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await?["error"], "Failed to extract admission details");
    }

    Ok(())
}

#[tokio::test]
async fn test_provider_failure_is_hidden() -> anyhow::Result<()> {
    let app = test_app(StubModel::failing("429 rate limited, key sk-secret")).await?;
    let cookie = admin_cookie(&app.ctx).await?;

    let response = app.router.clone()
        .oneshot(json_request("POST", ENDPOINT, Some(&cookie), json!({"text": "UPCAT"})))
        .await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await?;
    assert_eq!(body, json!({"error": "Failed to extract admission details"}));

    Ok(())
}

#[tokio::test]
async fn test_image_takes_precedence_over_text() -> anyhow::Result<()> {
    let model = StubModel::replying("{\"results_release\": \"March 2026\"}");
    let app = test_app(model.clone()).await?;
    let cookie = admin_cookie(&app.ctx).await?;

    let image = "data:image/jpeg;base64,aGVsbG8=";
    let response = app.router.clone()
        .oneshot(json_request(
            "POST",
            ENDPOINT,
            Some(&cookie),
            json!({"image": image, "text": "Posted on the DLSU page"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?, json!({"results_release": "March 2026"}));

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts[0].image_url.as_deref(), Some(image));
    assert!(prompts[0].text.contains("Additional context:\nPosted on the DLSU page"));

    Ok(())
}
