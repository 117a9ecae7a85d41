mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::NoHeader;

fn set_cookie(res: &reqwest::Response) -> String {
    res.headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn change_password_requires_both_fields() -> Result<()> {
    let app = common::spawn_app().await?;

    Mock::given(method("POST"))
        .and(path("/api/auth/change-password"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backends.auth)
        .await;

    for body in [json!({ "oldPassword": "", "newPassword": "x" }), json!({ "newPassword": "x" }), json!({})] {
        let res = app
            .client
            .post(app.url("/api/auth/change-password"))
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.json::<Value>().await?, json!({ "error": "Missing required fields" }));
    }
    Ok(())
}

#[tokio::test]
async fn change_password_forwards_credentials() -> Result<()> {
    let app = common::spawn_app().await?;

    Mock::given(method("POST"))
        .and(path("/api/auth/change-password"))
        .and(header("authorization", "Bearer tok-1"))
        .and(header("X-Tenant-ID", "default"))
        .and(body_json(json!({ "oldPassword": "old", "newPassword": "new" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.backends.auth)
        .await;

    let res = app
        .client
        .post(app.url("/api/auth/change-password"))
        .header("Cookie", "auth_token=tok-1")
        .json(&json!({ "oldPassword": "old", "newPassword": "new" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "success": true }));
    Ok(())
}

#[tokio::test]
async fn change_password_without_token_is_dispatched_without_bearer() -> Result<()> {
    let app = common::spawn_app().await?;

    Mock::given(method("POST"))
        .and(path("/api/auth/change-password"))
        .and(NoHeader("authorization"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt missing" })))
        .expect(1)
        .mount(&app.backends.auth)
        .await;

    let res = app
        .client
        .post(app.url("/api/auth/change-password"))
        .json(&json!({ "oldPassword": "old", "newPassword": "new" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = res.text().await?;
    assert!(!body.contains("jwt missing"));
    assert_eq!(serde_json::from_str::<Value>(&body)?, json!({ "error": "Failed to change password" }));
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .post(app.url("/api/auth/change-password"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "Invalid JSON body" }));
    Ok(())
}

#[tokio::test]
async fn logout_without_session_still_clears_cookie() -> Result<()> {
    let app = common::spawn_app().await?;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backends.auth)
        .await;

    let res = app.client.post(app.url("/api/auth/logout")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = set_cookie(&res);
    assert!(cookie.starts_with("auth_token=;"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(cookie.contains("Path=/"));
    Ok(())
}

#[tokio::test]
async fn logout_succeeds_even_if_revocation_fails() -> Result<()> {
    let app = common::spawn_app().await?;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&app.backends.auth)
        .await;

    let res = app
        .client
        .post(app.url("/api/auth/logout"))
        .header("Cookie", "auth_token=tok-1")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(set_cookie(&res).contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn login_sets_cookie_with_same_attributes_as_logout() -> Result<()> {
    let app = common::spawn_app().await?;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "tok-abc" })))
        .expect(1)
        .mount(&app.backends.auth)
        .await;

    let login = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "ada@example.com", "password": "hunter2" }))
        .send()
        .await?;
    assert_eq!(login.status(), StatusCode::OK);
    let issued = set_cookie(&login);
    assert!(issued.starts_with("auth_token=tok-abc;"));

    let logout = app.client.post(app.url("/api/auth/logout")).send().await?;
    let cleared = set_cookie(&logout);

    let attributes = |cookie: &str| -> Vec<String> {
        cookie
            .split("; ")
            .skip(1)
            .filter(|a| !a.starts_with("Max-Age") && !a.starts_with("Expires"))
            .map(str::to_string)
            .collect()
    };
    assert_eq!(attributes(&issued), attributes(&cleared));
    Ok(())
}

#[tokio::test]
async fn login_with_bad_credentials_is_unauthorized() -> Result<()> {
    let app = common::spawn_app().await?;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.backends.auth)
        .await;

    let res = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "ada@example.com", "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get("set-cookie").is_none());
    assert_eq!(res.json::<Value>().await?, json!({ "error": "Invalid credentials" }));
    Ok(())
}

#[tokio::test]
async fn invitation_use_is_acknowledged() -> Result<()> {
    let app = common::spawn_app().await?;

    Mock::given(method("POST"))
        .and(path("/api/invitations/inv-42/use"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tenantId": "acme" })))
        .expect(1)
        .mount(&app.backends.auth)
        .await;

    let res = app.client.post(app.url("/api/invitations/inv-42/use")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "success": true }));
    Ok(())
}

#[tokio::test]
async fn expired_invitation_is_a_bad_request() -> Result<()> {
    let app = common::spawn_app().await?;

    Mock::given(method("POST"))
        .and(path("/api/invitations/inv-old/use"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&app.backends.auth)
        .await;

    let res = app.client.post(app.url("/api/invitations/inv-old/use")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "Invalid or expired invitation" }));
    Ok(())
}

#[tokio::test]
async fn invitation_backend_failure_is_internal_error() -> Result<()> {
    let app = common::spawn_app().await?;

    Mock::given(method("POST"))
        .and(path("/api/invitations/inv-42/use"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.backends.auth)
        .await;

    let res = app.client.post(app.url("/api/invitations/inv-42/use")).send().await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "Failed to use invitation" }));
    Ok(())
}
