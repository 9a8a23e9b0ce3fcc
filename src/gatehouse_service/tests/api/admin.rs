use gatehouse_core::Group;
use serde_json::{Value, json};

use crate::helpers::{TestApp, error_message, random_name, random_username};

#[tokio::test]
async fn admin_routes_reject_non_admins() {
    let app = TestApp::new().await;
    let username = app.seed_user(&[Group::User]).await;
    let token = app.access_token(&username).await;

    let response = app
        .post_with_token(
            "/auth/admin/groups/add",
            &token,
            &json!({ "username": username, "group": "Admin" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(error_message(response).await, "Insufficient permissions");

    // The guard runs before the body is read.
    let response = app
        .post_with_token("/auth/admin/register", &token, &json!({}))
        .await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .post_with_token("/auth/admin/reconcile", &token, &json!({}))
        .await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn admin_adds_and_removes_groups() {
    let app = TestApp::new().await;
    let admin_token = app.admin_token().await;
    let username = app.seed_user(&[Group::User]).await;

    let response = app
        .post_with_token(
            "/auth/admin/groups/add",
            &admin_token,
            &json!({ "username": username, "group": "admin" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 204);
    assert!(app.provider.groups_of(&username).await.unwrap().contains("Admin"));

    let response = app
        .post_with_token(
            "/auth/admin/groups/remove",
            &admin_token,
            &json!({ "username": username, "group": "User" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 204);
    assert!(!app.provider.groups_of(&username).await.unwrap().contains("User"));
}

#[tokio::test]
async fn add_group_errors() {
    let app = TestApp::new().await;
    let admin_token = app.admin_token().await;

    let response = app
        .post_with_token(
            "/auth/admin/groups/add",
            &admin_token,
            &json!({ "username": random_username(), "group": "User" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(error_message(response).await, "User not found");

    let username = app.seed_user(&[]).await;
    let response = app
        .post_with_token(
            "/auth/admin/groups/add",
            &admin_token,
            &json!({ "username": username, "group": "Auditors" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(error_message(response).await, "Unknown group: Auditors");
}

#[tokio::test]
async fn create_admin_conflicts_with_existing_user() {
    let app = TestApp::new().await;
    let admin_token = app.admin_token().await;
    let username = app.seed_user(&[Group::User]).await;

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

    assert_eq!(response.status().as_u16(), 409);
    assert_eq!(error_message(response).await, "Username already exists");
}

#[tokio::test]
async fn create_admin_returns_username_and_grants_admin() {
    let app = TestApp::new().await;
    let admin_token = app.admin_token().await;
    let username = random_username();

    let response = app
        .post_with_token(
            "/auth/admin/register",
            &admin_token,
            &json!({
                "username": username.to_uppercase(),
                "temporaryPassword": "temporary-pass",
                "name": random_name(),
            }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "username": username }));
    assert!(app.provider.groups_of(&username).await.unwrap().contains("Admin"));
}

#[tokio::test]
async fn reconcile_with_nothing_pending() {
    let app = TestApp::new().await;
    let admin_token = app.admin_token().await;

    let response = app
        .post_with_token("/auth/admin/reconcile", &admin_token, &json!({}))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "resolved": 0, "remaining": 0 }));
}
