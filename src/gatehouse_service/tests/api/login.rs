use gatehouse_core::Group;
use serde_json::{Value, json};

use crate::helpers::{PASSWORD, TestApp, error_message, random_name, random_username};

#[tokio::test]
async fn login_returns_session_tokens() {
    let app = TestApp::new().await;
    let username = app.seed_user(&[Group::User]).await;

    let response = app
        .post(
            "/auth/login",
            &json!({ "username": username.to_uppercase(), "password": PASSWORD }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "authenticated");
    assert!(body["accessToken"].is_string());
    assert!(body["idToken"].is_string());
    assert!(body["refreshToken"].is_string());
}

#[tokio::test]
async fn login_with_wrong_password() {
    let app = TestApp::new().await;
    let username = app.seed_user(&[Group::User]).await;

    let response = app
        .post("/auth/login", &json!({ "username": username, "password": "wrong-password" }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "Invalid username or password");
}

#[tokio::test]
async fn refresh_issues_new_tokens() {
    let app = TestApp::new().await;
    let username = app.seed_user(&[Group::User]).await;
    let login: Value = app
        .post("/auth/login", &json!({ "username": username, "password": PASSWORD }))
        .await
        .json()
        .await
        .unwrap();

    let response = app
        .post("/auth/refresh", &json!({ "refreshToken": login["refreshToken"] }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["accessToken"].is_string());
    assert!(body["idToken"].is_string());
    assert!(body.get("refreshToken").is_none());

    let response = app
        .post("/auth/refresh", &json!({ "refreshToken": "not-a-refresh-token" }))
        .await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "Invalid refresh token");
}

#[tokio::test]
async fn profile_requires_valid_bearer_token() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .get(format!("{}/auth/user", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "Missing token");

    let response = app.get_with_token("/auth/user", "garbage").await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "Invalid token");
}

#[tokio::test]
async fn profile_requires_membership() {
    let app = TestApp::new().await;
    let username = app.seed_user(&[]).await;
    let token = app.access_token(&username).await;

    let response = app.get_with_token("/auth/user", &token).await;

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "Insufficient permissions");
}

#[tokio::test]
async fn logout_revokes_access_token() {
    let app = TestApp::new().await;
    let username = app.seed_user(&[Group::User]).await;
    let token = app.access_token(&username).await;

    let response = app.post_with_token("/auth/logout", &token, &json!({})).await;
    assert_eq!(response.status().as_u16(), 204);

    let response = app.get_with_token("/auth/user", &token).await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "Invalid access token");
}

#[tokio::test]
async fn new_password_challenge_for_created_admin() {
    let app = TestApp::new().await;
    let admin_token = app.admin_token().await;
    let username = random_username();

    let response = app
        .post_with_token(
            "/auth/admin/register",
            &admin_token,
            &json!({
                "username": username,
                "temporaryPassword": "temporary-pass",
                "name": random_name(),
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let challenge: Value = app
        .post(
            "/auth/login",
            &json!({ "username": username, "password": "temporary-pass" }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(challenge["status"], "challengeRequired");
    assert_eq!(challenge["challenge"], "NEW_PASSWORD_REQUIRED");

    let response = app
        .post(
            "/auth/login/new-password",
            &json!({
                "username": username,
                "newPassword": PASSWORD,
                "session": "stale-session",
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "Invalid session");

    let response = app
        .post(
            "/auth/login/new-password",
            &json!({
                "username": username,
                "newPassword": PASSWORD,
                "session": challenge["session"],
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "authenticated");

    app.access_token(&username).await;
}
