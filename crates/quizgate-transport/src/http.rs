//! JSON-over-HTTP [`AuthApi`] implementation using `reqwest`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use quizgate_protocol::{
    AuthResponse, ChangePasswordRequest, LoginRequest, ProfileResponse, ProfileUpdate,
    RegisterRequest, User,
};

use crate::{ApiConfig, AuthApi, Endpoint, TransportError, error_message};

/// Talks to the Auth API over HTTP.
///
/// Cloning is cheap: `reqwest::Client` is an `Arc` around a connection pool.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    http: reqwest::Client,
    config: ApiConfig,
}

impl HttpAuthApi {
    /// Builds a client with the configured timeouts.
    ///
    /// # Errors
    /// Returns [`TransportError::ClientBuild`] if the TLS backend can't be
    /// initialized.
    pub fn new(config: ApiConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        tracing::debug!(base_url = %config.base_url, "auth API client ready");
        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Sends one request and returns the raw body of a 2xx response.
    async fn send<B>(
        &self,
        endpoint: Endpoint,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<(u16, String), TransportError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = format!("{}{}", self.config.base_url, endpoint.path());
        let method = match endpoint {
            Endpoint::Login | Endpoint::Register | Endpoint::ChangePassword => {
                reqwest::Method::POST
            }
            Endpoint::UpdateProfile => reqwest::Method::PUT,
            Endpoint::FetchProfile => reqwest::Method::GET,
        };

        let mut request = self.http.request(method, url);
        if let Some(token) = token.filter(|_| endpoint.requires_token()) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.classify(endpoint, &e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(endpoint, &e))?;

        if !status.is_success() {
            tracing::debug!(%endpoint, status = status.as_u16(), "auth API rejected request");
            return Err(TransportError::Api {
                endpoint,
                status: status.as_u16(),
                message: error_message(endpoint, &text),
            });
        }
        Ok((status.as_u16(), text))
    }

    /// Sends a request and parses the 2xx body as `T`.
    async fn send_for<B, T>(
        &self,
        endpoint: Endpoint,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, TransportError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let (status, text) = self.send(endpoint, token, body).await?;
        parse(endpoint, status, &text)
    }

    /// Login and register: a 2xx must carry a non-empty token.
    async fn send_auth<B>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<AuthResponse, TransportError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let (status, text) = self.send(endpoint, None, Some(body)).await?;
        let response: AuthResponse = parse(endpoint, status, &text)?;
        if response.token.is_empty() {
            return Err(TransportError::InvalidResponse {
                endpoint,
                status,
                message: "response carried an empty token".to_string(),
            });
        }
        Ok(response)
    }

    fn classify(&self, endpoint: Endpoint, err: &reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                endpoint,
                after: self.config.request_timeout,
            }
        } else {
            TransportError::Network {
                endpoint,
                message: err.to_string(),
            }
        }
    }
}

fn parse<T: DeserializeOwned>(
    endpoint: Endpoint,
    status: u16,
    text: &str,
) -> Result<T, TransportError> {
    serde_json::from_str(text).map_err(|e| TransportError::InvalidResponse {
        endpoint,
        status,
        message: e.to_string(),
    })
}

impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, TransportError> {
        self.send_auth(Endpoint::Login, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, TransportError> {
        self.send_auth(Endpoint::Register, request).await
    }

    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<(), TransportError> {
        self.send(Endpoint::UpdateProfile, Some(token), Some(update))
            .await
            .map(|_| ())
    }

    async fn change_password(
        &self,
        token: &str,
        request: &ChangePasswordRequest,
    ) -> Result<(), TransportError> {
        self.send(Endpoint::ChangePassword, Some(token), Some(request))
            .await
            .map(|_| ())
    }

    async fn fetch_profile(&self, token: &str) -> Result<User, TransportError> {
        self.send_for::<(), ProfileResponse>(Endpoint::FetchProfile, Some(token), None)
            .await
            .map(ProfileResponse::into_user)
    }
}
