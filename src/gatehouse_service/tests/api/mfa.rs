use gatehouse_core::Group;
use serde_json::{Value, json};

use crate::helpers::{PASSWORD, TestApp, error_message};

/// Associates, verifies and activates a software token for `username`.
async fn enable_mfa(app: &TestApp, username: &str) {
    let token = app.access_token(username).await;

    let response = app.post_with_token("/auth/mfa", &token, &json!({})).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(!body["secretCode"].as_str().unwrap().is_empty());

    let code = app.provider.mfa_code(username).await.unwrap();
    let response = app
        .post_with_token("/auth/mfa/verify", &token, &json!({ "code": code }))
        .await;
    assert_eq!(response.status().as_u16(), 204);

    let response = app
        .post_with_token("/auth/mfa/activate", &token, &json!({}))
        .await;
    assert_eq!(response.status().as_u16(), 204);
}

#[tokio::test]
async fn login_with_mfa_challenge() {
    let app = TestApp::new().await;
    let username = app.seed_user(&[Group::User]).await;
    enable_mfa(&app, &username).await;

    let challenge: Value = app
        .post("/auth/login", &json!({ "username": username, "password": PASSWORD }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(challenge["status"], "challengeRequired");
    assert_eq!(challenge["challenge"], "SOFTWARE_TOKEN_MFA");

    let response = app
        .post(
            "/auth/login/mfa",
            &json!({ "username": username, "code": "wrong-code", "session": challenge["session"] }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "Invalid MFA code");

    let code = app.provider.mfa_code(&username).await.unwrap();
    let response = app
        .post(
            "/auth/login/mfa",
            &json!({ "username": username, "code": code, "session": challenge["session"] }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "authenticated");
}

#[tokio::test]
async fn verify_with_wrong_code() {
    let app = TestApp::new().await;
    let username = app.seed_user(&[Group::User]).await;
    let token = app.access_token(&username).await;

    app.post_with_token("/auth/mfa", &token, &json!({})).await;
    let response = app
        .post_with_token("/auth/mfa/verify", &token, &json!({ "code": "wrong-code" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Invalid MFA code");
}

#[tokio::test]
async fn activate_before_verification() {
    let app = TestApp::new().await;
    let username = app.seed_user(&[Group::User]).await;
    let token = app.access_token(&username).await;

    let response = app
        .post_with_token("/auth/mfa/activate", &token, &json!({}))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "MFA is not configured");
}

#[tokio::test]
async fn user_removes_own_mfa() {
    let app = TestApp::new().await;
    let username = app.seed_user(&[Group::User]).await;
    enable_mfa(&app, &username).await;

    let code = app.provider.mfa_code(&username).await.unwrap();
    let challenge: Value = app
        .post("/auth/login", &json!({ "username": username, "password": PASSWORD }))
        .await
        .json()
        .await
        .unwrap();
    let tokens: Value = app
        .post(
            "/auth/login/mfa",
            &json!({ "username": username, "code": code, "session": challenge["session"] }),
        )
        .await
        .json()
        .await
        .unwrap();
    let token = tokens["accessToken"].as_str().unwrap();

    let response = app.delete_with_token("/auth/mfa", token, &json!({})).await;
    assert_eq!(response.status().as_u16(), 204);

    app.access_token(&username).await;
}

#[tokio::test]
async fn admin_removes_user_mfa() {
    let app = TestApp::new().await;
    let admin_token = app.admin_token().await;
    let username = app.seed_user(&[Group::User]).await;
    enable_mfa(&app, &username).await;

    let response = app
        .delete_with_token("/auth/admin/mfa", &admin_token, &json!({ "username": username }))
        .await;
    assert_eq!(response.status().as_u16(), 204);

    app.access_token(&username).await;
}
