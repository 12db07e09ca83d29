//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, making HTTP requests and
//! provisioning accounts that cannot self-register.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use ngo_api::{create_app, create_app_state};
use ngo_common::{hash_password, AppConfig};
use ngo_core::entities::{Role, User};
use ngo_core::{SnowflakeGenerator, UserRepository};
use ngo_db::{create_pool, PgUserRepository, PoolConfig};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{unique_email, AuthResponse, LoginRequest};

/// Worker id reserved for ids minted by the tests themselves
const TEST_WORKER_ID: u16 = 1000;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    config: AppConfig,
    _handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config.clone()).await?;
        let app = create_app(state);

        // Ephemeral port, so tests can run in parallel
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            config,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn patch_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Register a self-service account and return its session
    pub async fn register(&self, role: Role) -> Result<AuthResponse> {
        let request = crate::fixtures::RegisterRequest::unique(role);
        let response = self.post("/api/auth/register", &request).await?;
        assert_json(response, StatusCode::CREATED).await
    }

    /// Insert an administrator directly and log in as it
    pub async fn admin_session(&self) -> Result<AuthResponse> {
        let pool = create_pool(&PoolConfig::from(&self.config.database)).await?;
        let users = PgUserRepository::new(pool);

        let email = unique_email("admin");
        let password = "admin-pass-1";
        let admin = User::new(
            SnowflakeGenerator::new(TEST_WORKER_ID).generate(),
            "Test Admin".to_string(),
            email.clone(),
            Role::Admin,
        );
        users.create(&admin, &hash_password(password)?).await?;

        let login = LoginRequest {
            email,
            password: password.to_string(),
        };
        let response = self.post("/api/auth/login", &login).await?;
        assert_json(response, StatusCode::OK).await
    }
}

/// Configuration from the environment, with rate limiting off
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config =
        AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    config.rate_limit.requests_per_second = 0;

    Ok(config)
}

/// Whether the backing services are configured
pub async fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    for var in ["DATABASE_URL", "REDIS_URL", "JWT_SECRET", "API_PORT"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
