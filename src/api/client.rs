//! The single HTTP client every remote call goes through.
//!
//! Request interceptor: cache-busting `_t` parameter, bearer token when a
//! session is present, and a fresh `x-request-id`. Response interceptor: maps
//! failures to [`ApiError`], clears the session on `401` and queues a notice for
//! the operator. Retries are a plain counter over retryable failures.

use super::{
    config::ApiConfig, errors::ApiError, routes, session::SessionToken, types::ApiResponse,
};
use crate::{notify::Notifier, APP_USER_AGENT};
use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, RequestBuilder, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, info_span, warn, Instrument};
use ulid::Ulid;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const CACHE_BUST_PARAM: &str = "_t";

/// Pause before the next attempt, multiplied by the attempt number.
const RETRY_PAUSE: Duration = Duration::from_millis(200);

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    session: SessionToken,
    notifier: Notifier,
}

impl HttpClient {
    /// # Errors
    /// Returns an error if the API key is not a valid header value or the
    /// underlying client cannot be built.
    pub fn new(
        config: &ApiConfig,
        session: SessionToken,
        notifier: Notifier,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&config.api_key)
                .map_err(|err| ApiError::Request(format!("invalid API key header: {err}")))?,
        );

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| ApiError::Request(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            session,
            notifier,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn session(&self) -> &SessionToken {
        &self.session
    }

    /// `GET` a JSON document.
    ///
    /// # Errors
    /// Returns the mapped error once retries are exhausted.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        retries: u32,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = self.execute(Method::GET, path, query, None, retries).await?;
        self.decode(path, response).await
    }

    /// Sends a JSON body and decodes a JSON response.
    ///
    /// # Errors
    /// Returns the mapped error once retries are exhausted.
    pub async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        retries: u32,
    ) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|err| ApiError::Request(format!("Failed to encode request: {err}")))?;
        let response = self
            .execute(method, path, &[], Some(payload), retries)
            .await?;
        self.decode(path, response).await
    }

    /// Sends a request whose response body is ignored.
    ///
    /// # Errors
    /// Returns the mapped error once retries are exhausted.
    pub async fn send_empty(
        &self,
        method: Method,
        path: &str,
        retries: u32,
    ) -> Result<ApiResponse<()>, ApiError> {
        let response = self.execute(method, path, &[], None, retries).await?;
        Ok(ApiResponse::new((), response.status().as_u16(), status_text(response.status())))
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        payload: Option<Vec<u8>>,
        retries: u32,
    ) -> Result<Response, ApiError> {
        let url = routes::build_url(&self.base_url, path);
        let mut attempt = 0;

        loop {
            let request_id = Ulid::new().to_string();
            let mut builder = self.client.request(method.clone(), &url).query(query);
            if let Some(payload) = &payload {
                builder = builder.body(payload.clone());
            }
            let builder = self.intercept_request(builder, &request_id);

            debug!("API Request: {} {}", method, path);

            let span = info_span!(
                "api.request",
                http.method = %method,
                url = %url,
                request_id = %request_id,
                attempt
            );
            let result = builder.send().instrument(span).await;

            match self.intercept_response(&method, path, result).await {
                Ok(response) => return Ok(response),
                Err(err) if attempt < retries && err.is_retryable() => {
                    attempt += 1;
                    warn!("{} {} failed ({}), retrying {}/{}", method, path, err, attempt, retries);
                    tokio::time::sleep(RETRY_PAUSE * attempt).await;
                }
                Err(err) => {
                    self.report(&err);
                    return Err(err);
                }
            }
        }
    }

    fn intercept_request(&self, builder: RequestBuilder, request_id: &str) -> RequestBuilder {
        let builder = builder
            .query(&[(CACHE_BUST_PARAM, Utc::now().timestamp_millis().to_string())])
            .header(REQUEST_ID_HEADER, request_id);

        match self.session.bearer() {
            Some(bearer) => builder.header(AUTHORIZATION, bearer),
            None => builder,
        }
    }

    async fn intercept_response(
        &self,
        method: &Method,
        path: &str,
        result: Result<Response, reqwest::Error>,
    ) -> Result<Response, ApiError> {
        let response = result.map_err(ApiError::from)?;
        let status = response.status();

        if status.is_success() {
            debug!("API Response: {} {} {}", status.as_u16(), method, path);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &body);

        if status == StatusCode::UNAUTHORIZED {
            self.session.clear();
        }

        Err(err)
    }

    fn report(&self, err: &ApiError) {
        warn!(code = err.code(), status = err.status(), "{}", err);
        self.notifier.error(err.notice_message());
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        path: &str,
        response: Response,
    ) -> Result<ApiResponse<T>, ApiError> {
        let status = response.status();
        let result = match response.text().await {
            Ok(body) => serde_json::from_str::<T>(&body)
                .map_err(|err| ApiError::Parse(format!("Failed to decode {path}: {err}"))),
            Err(err) => Err(ApiError::from(err)),
        };

        match result {
            Ok(data) => Ok(ApiResponse::new(data, status.as_u16(), status_text(status))),
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }
}

fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}
