mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.client.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let app = common::spawn_app().await?;

    let body = app
        .client
        .get(app.url("/"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(body["name"], "tenant-gateway");
    assert!(body["endpoints"]["logs"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_page_is_public() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.client.get(app.url("/login")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["authServiceUrl"], app.backends.auth.uri());
    Ok(())
}
