//! HTTP client for the SessionGate API

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use sg_shared::{
    ApiResponse, AuthResponse, ErrorBody, LoginRequest, RefreshTokenRequest,
    RefreshTokenResponse, RegisterRequest, UserDto,
};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Calls the session manager makes against the server
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/register`
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError>;

    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError>;

    /// `POST /auth/refresh`
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshTokenResponse, ClientError>;

    /// `GET /auth/me`
    async fn me(&self, access_token: &str) -> Result<UserDto, ClientError>;

    /// `GET /users`
    async fn list_users(&self, access_token: &str) -> Result<Vec<UserDto>, ClientError>;

    /// `GET /users/{id}`
    async fn get_user(&self, access_token: &str, id: Uuid) -> Result<UserDto, ClientError>;
}

/// reqwest implementation of [`AuthApi`]
#[derive(Clone)]
pub struct HttpAuthApi {
    client: Client,
    config: ClientConfig,
}

impl HttpAuthApi {
    /// Creates a new API client
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // Helper methods

    async fn get<T: DeserializeOwned>(&self, path: &str, access_token: &str) -> Result<T, ClientError> {
        let request = self
            .client
            .get(self.config.url(path))
            .bearer_auth(access_token);

        self.send(request).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        let request = self.client.post(self.config.url(path)).json(body);

        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        handle_response(response).await
    }
}

/// Unwraps the `{data}` envelope, or classifies the error body
async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)?;
        return Ok(envelope.into_data());
    }

    let error = match serde_json::from_slice::<ErrorBody>(&bytes) {
        Ok(body) => ClientError::from_error_body(status.as_u16(), body),
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            code: "UNKNOWN".to_string(),
            message: String::from_utf8_lossy(&bytes).into_owned(),
        },
    };
    tracing::debug!(status = status.as_u16(), error = %error, "API request failed");

    Err(error)
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        self.post("/auth/register", request).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.post("/auth/login", request).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshTokenResponse, ClientError> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.post("/auth/refresh", &body).await
    }

    async fn me(&self, access_token: &str) -> Result<UserDto, ClientError> {
        self.get("/auth/me", access_token).await
    }

    async fn list_users(&self, access_token: &str) -> Result<Vec<UserDto>, ClientError> {
        self.get("/users", access_token).await
    }

    async fn get_user(&self, access_token: &str, id: Uuid) -> Result<UserDto, ClientError> {
        self.get(&format!("/users/{id}"), access_token).await
    }
}
