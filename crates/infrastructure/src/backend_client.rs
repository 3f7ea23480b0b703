use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;
use warden_core::{AppError, AppResult, TenantDomain};

/// Authenticated client for tenant-scoped backend endpoints.
#[derive(Clone)]
pub struct BackendClient {
    http_client: reqwest::Client,
    base_url: Url,
    access_token: String,
    tenant: TenantDomain,
}

impl BackendClient {
    /// Creates a backend client. `server_url` must be an absolute http(s) URL.
    pub fn new(
        http_client: reqwest::Client,
        server_url: &str,
        access_token: impl Into<String>,
        tenant: TenantDomain,
    ) -> AppResult<Self> {
        let base_url = Url::parse(server_url.trim().trim_end_matches('/')).map_err(|error| {
            AppError::Validation(format!("invalid backend server url '{server_url}': {error}"))
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "backend server url '{server_url}' must use http or https"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
            access_token: access_token.into(),
            tenant,
        })
    }

    /// Returns the tenant every request is scoped to.
    #[must_use]
    pub fn tenant(&self) -> &TenantDomain {
        &self.tenant
    }

    /// Resolves `path` below the tenant prefix, e.g. `/t/carbon.super/scim2/Roles`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> Url {
        let base_path = self.base_url.path().trim_end_matches('/');
        let full_path = format!(
            "{base_path}{}/{}",
            self.tenant.path_prefix(),
            path.trim_start_matches('/')
        );

        let mut url = self.base_url.clone();
        url.set_path(full_path.as_str());
        url.set_query(None);
        url
    }

    /// Starts an authenticated request.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .bearer_auth(self.access_token.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Sends a request and decodes its JSON body.
    pub async fn send_json<T>(&self, builder: RequestBuilder, context: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(builder, context).await?;
        response.json::<T>().await.map_err(|error| {
            AppError::Internal(format!("failed to decode {context} response: {error}"))
        })
    }

    /// Sends a request and discards its body.
    pub async fn send_empty(&self, builder: RequestBuilder, context: &str) -> AppResult<()> {
        self.send(builder, context).await.map(|_| ())
    }

    async fn send(&self, builder: RequestBuilder, context: &str) -> AppResult<Response> {
        let response = builder.send().await.map_err(|error| {
            AppError::Internal(format!("{context} request failed: {error}"))
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());
        Err(status_error(status, context, body.as_str()))
    }
}

/// Checks that a resource identifier is a single plain path segment.
pub(crate) fn path_segment<'a>(value: &'a str, resource: &str) -> AppResult<&'a str> {
    let value = value.trim();
    let is_dot_segment = matches!(value, "." | "..");
    if value.is_empty() || is_dot_segment || value.contains(['/', '\\', '?', '#', '%']) {
        return Err(AppError::Validation(format!(
            "invalid {resource} id '{value}'"
        )));
    }

    Ok(value)
}

/// Maps a non-success backend status to an application error.
pub(crate) fn status_error(status: StatusCode, context: &str, body: &str) -> AppError {
    let message = format!("{context} failed with status {status}: {body}");
    match status {
        StatusCode::BAD_REQUEST => AppError::Validation(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Internal(message),
    }
}
