use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Credential strategy applied to outgoing requests.
#[derive(Clone, PartialEq, Eq)]
pub enum HttpAuth {
    None,
    /// Credential sent as a query parameter, e.g. `apiKey=...`.
    QueryParam { name: String, value: String },
}

impl std::fmt::Debug for HttpAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::QueryParam { name, .. } => f
                .debug_struct("QueryParam")
                .field("name", name)
                .field("value", &"<redacted>")
                .finish(),
        }
    }
}

/// GET request issued by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub auth: HttpAuth,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            auth: HttpAuth::None,
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_auth(mut self, auth: &HttpAuth) -> Self {
        self.auth = auth.clone();
        self
    }

    /// First value of a query parameter, credential included.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.credential_param()
            .into_iter()
            .chain(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// URL sent on the wire: credential first, then the remaining parameters in order.
    pub fn full_url(&self) -> String {
        let params = self
            .credential_param()
            .into_iter()
            .chain(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        append_query(&self.url, params)
    }

    /// URL safe for logs: the credential parameter is left out.
    pub fn display_url(&self) -> String {
        append_query(
            &self.url,
            self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    fn credential_param(&self) -> Option<(&str, &str)> {
        match &self.auth {
            HttpAuth::None => None,
            HttpAuth::QueryParam { name, value } => Some((name.as_str(), value.as_str())),
        }
    }
}

fn append_query<'a>(base: &str, params: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let encoded = params
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>();

    if encoded.is_empty() {
        base.to_owned()
    } else {
        format!("{base}?{}", encoded.join("&"))
    }
}

/// HTTP response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level failure: the request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Async transport contract used by the gateway.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent(concat!("polyfetch/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            // reqwest error text embeds the URL, which carries the credential.
            let response = self.client.get(request.full_url()).send().await.map_err(|e| {
                let e = e.without_url();
                if e.is_timeout() {
                    HttpError::new(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    HttpError::new(format!("connection failed: {e}"))
                } else {
                    HttpError::new(format!("request failed: {e}"))
                }
            })?;

            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| {
                HttpError::new(format!("failed to read response body: {}", e.without_url()))
            })?;

            Ok(HttpResponse { status, body })
        })
    }
}
