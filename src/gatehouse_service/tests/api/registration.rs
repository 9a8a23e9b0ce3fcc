use serde_json::{Value, json};

use crate::helpers::{PASSWORD, TestApp, error_message, random_name, random_username};

#[tokio::test]
async fn sign_up_confirm_and_fetch_profile() {
    let app = TestApp::new().await;
    let username = random_username();
    let name = random_name();

    let response = app
        .post(
            "/auth/user/register",
            &json!({ "username": username, "password": PASSWORD, "name": name }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "isConfirmed": false }));

    let response = app
        .post("/auth/login", &json!({ "username": username, "password": PASSWORD }))
        .await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "User not confirmed");

    let code = app.provider.confirmation_code(&username).await.unwrap();
    let response = app
        .post("/auth/confirm", &json!({ "username": username, "code": code }))
        .await;
    assert_eq!(response.status().as_u16(), 204);

    let token = app.access_token(&username).await;
    let response = app.get_with_token("/auth/user", &token).await;
    assert_eq!(response.status().as_u16(), 200);
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile, json!({ "username": username, "name": name }));
}

#[tokio::test]
async fn sign_up_puts_user_in_user_group() {
    let app = TestApp::new().await;
    let username = random_username();

    app.post(
        "/auth/user/register",
        &json!({ "username": username, "password": PASSWORD, "name": random_name() }),
    )
    .await;

    let groups = app.provider.groups_of(&username).await.unwrap();
    assert!(groups.contains("User"));
    assert!(!groups.contains("Admin"));
}

#[tokio::test]
async fn duplicate_sign_up_is_a_conflict() {
    let app = TestApp::new().await;
    let username = app.seed_user(&[]).await;

    let response = app
        .post(
            "/auth/user/register",
            &json!({ "username": username, "password": PASSWORD, "name": random_name() }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 409);
    assert_eq!(error_message(response).await, "Username already exists");
}

#[tokio::test]
async fn sign_up_rejects_bad_input() {
    let app = TestApp::new().await;

    let test_cases = [
        (
            json!({ "username": random_username(), "password": "short", "name": "Kim" }),
            "Password does not meet requirements",
        ),
        (
            json!({ "username": "not-an-email", "password": PASSWORD, "name": "Kim" }),
            "Username must be a valid email address",
        ),
        (
            json!({ "username": random_username(), "password": PASSWORD, "name": " " }),
            "Name is required",
        ),
    ];

    for (body, expected) in test_cases {
        let response = app.post("/auth/user/register", &body).await;
        assert_eq!(response.status().as_u16(), 400, "{body}");
        assert_eq!(error_message(response).await, expected);
    }
}

#[tokio::test]
async fn malformed_body_is_rendered_as_error_json() {
    let app = TestApp::new().await;

    let response = app
        .post("/auth/user/register", &json!({ "username": random_username() }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(!error_message(response).await.is_empty());
}

#[tokio::test]
async fn wrong_confirmation_code() {
    let app = TestApp::new().await;
    let username = random_username();
    app.post(
        "/auth/user/register",
        &json!({ "username": username, "password": PASSWORD, "name": random_name() }),
    )
    .await;

    let response = app
        .post("/auth/confirm", &json!({ "username": username, "code": "wrong-code" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Invalid confirmation code");
}

#[tokio::test]
async fn resend_confirmation_code() {
    let app = TestApp::new().await;
    let username = random_username();
    app.post(
        "/auth/user/register",
        &json!({ "username": username, "password": PASSWORD, "name": random_name() }),
    )
    .await;

    let response = app
        .post("/auth/confirm/resend", &json!({ "username": username }))
        .await;
    assert_eq!(response.status().as_u16(), 204);

    let response = app
        .post("/auth/confirm/resend", &json!({ "username": random_username() }))
        .await;
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(error_message(response).await, "User not found");

    let confirmed = app.seed_user(&[]).await;
    let response = app
        .post("/auth/confirm/resend", &json!({ "username": confirmed }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "User already confirmed");
}
