use std::{sync::Arc, time::Duration};

use fake::{
    Fake,
    faker::{internet::en::SafeEmail, name::en::Name},
};
use gatehouse_adapters::{
    HashMapPendingGroupStore, InMemoryIdentityProvider, InMemoryIdentityProviderConfig,
    JwtTokenVerifier, JwtVerifierConfig, config::test,
};
use gatehouse_application::{AuthService, AuthServiceConfig};
use gatehouse_axum::AppState;
use gatehouse_core::{Group, Password, Username};
use gatehouse_service::GatehouseService;
use secrecy::Secret;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub provider: InMemoryIdentityProvider,
}

impl TestApp {
    pub async fn new() -> Self {
        let secret = Secret::new(test::TOKEN_SECRET.to_owned());
        let provider = InMemoryIdentityProvider::new(InMemoryIdentityProviderConfig {
            token_secret: secret.clone(),
            token_ttl_seconds: 3600,
            auto_confirm: false,
        });
        let verifier = JwtTokenVerifier::with_shared_secret(&secret, &JwtVerifierConfig::default());
        let auth = AuthService::new(
            provider.clone(),
            verifier,
            HashMapPendingGroupStore::new(),
            AuthServiceConfig::default(),
        );
        let service = GatehouseService::new(AppState::new(Arc::new(auth), Duration::from_secs(5)));

        let listener = TcpListener::bind(test::APP_ADDRESS).await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());

        let _ = tokio::spawn(service.run_standalone(listener, None));

        Self {
            address,
            http_client: reqwest::Client::new(),
            provider,
        }
    }

    /// A confirmed user that already belongs to `groups`.
    pub async fn seed_user(&self, groups: &[Group]) -> String {
        let username = random_username();
        self.provider
            .seed_user(
                &Username::parse(&username).unwrap(),
                &Password::try_from(Secret::new(PASSWORD.to_owned())).unwrap(),
                &random_name(),
                groups,
            )
            .await;
        username
    }

    /// Logs in and returns the access token.
    pub async fn access_token(&self, username: &str) -> String {
        let response = self
            .post("/auth/login", &json!({ "username": username, "password": PASSWORD }))
            .await;
        assert_eq!(response.status().as_u16(), 200);

        let body: Value = response.json().await.unwrap();
        body["accessToken"].as_str().unwrap().to_owned()
    }

    pub async fn admin_token(&self) -> String {
        let admin = self.seed_user(&[Group::Admin, Group::User]).await;
        self.access_token(&admin).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_with_token(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.http_client
            .post(format!("{}{}", &self.address, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}{}", &self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_with_token(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.http_client
            .delete(format!("{}{}", &self.address, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub fn random_username() -> String {
    SafeEmail().fake::<String>().to_lowercase()
}

pub fn random_name() -> String {
    Name().fake()
}

pub async fn error_message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["error"].as_str().unwrap().to_owned()
}
