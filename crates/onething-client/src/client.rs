//! HTTP client every backend call funnels through

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::header::{CONTENT_TYPE, HeaderName};
use onething_core::{ApiConfig, SliceEnvelope};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::classifier::{LoginRedirectClassifier, ResponseClassifier, ResponseOutcome};
use crate::endpoints::Endpoints;
use crate::error::{ClientError, ClientResult};

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Per-call request options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Send the payload form-encoded instead of as JSON
    pub is_form_data: bool,
}

impl RequestOptions {
    /// JSON payload (the default)
    pub const fn json() -> Self {
        Self {
            is_form_data: false,
        }
    }

    /// `application/x-www-form-urlencoded` payload
    pub const fn form() -> Self {
        Self { is_form_data: true }
    }

    const fn content_type(self) -> &'static str {
        if self.is_form_data {
            FORM_CONTENT_TYPE
        } else {
            JSON_CONTENT_TYPE
        }
    }
}

/// Session-cookie API client with CSRF protection
///
/// Cloning is cheap; clones share the connection pool and the cookie jar, so
/// a login through one clone authenticates all of them.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    jar: Arc<Jar>,
    endpoints: Endpoints,
    csrf_cookie: String,
    csrf_header: HeaderName,
    classifier: Arc<dyn ResponseClassifier>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoints", &self.endpoints)
            .field("csrf_cookie", &self.csrf_cookie)
            .field("csrf_header", &self.csrf_header)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client for the configured backend with the login-redirect classifier
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL, paths or CSRF header name are invalid,
    /// or the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let endpoints = Endpoints::from_config(config)?;
        let classifier = LoginRedirectClassifier::new(
            endpoints.site_root().clone(),
            config.login_error_marker.clone(),
        );
        let csrf_header =
            HeaderName::from_bytes(config.csrf_header.as_bytes()).map_err(|e| {
                ClientError::Configuration {
                    message: format!("invalid CSRF header '{}': {e}", config.csrf_header),
                }
            })?;

        let jar = Arc::new(Jar::default());
        let mut builder = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| ClientError::Configuration {
            message: e.to_string(),
        })?;

        Ok(Self {
            http,
            jar,
            endpoints,
            csrf_cookie: config.csrf_cookie.clone(),
            csrf_header,
            classifier: Arc::new(classifier),
        })
    }

    /// Replace the response classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl ResponseClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Resolved backend endpoints
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Cookie jar shared by every request of this client
    pub const fn cookie_jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    /// CSRF token currently held for the backend root, URL-decoded
    pub fn csrf_token(&self) -> Option<String> {
        self.csrf_token_for(self.endpoints.site_root())
    }

    fn csrf_token_for(&self, url: &Url) -> Option<String> {
        let header = self.jar.cookies(url)?;
        let cookies = header.to_str().ok()?;
        find_cookie(cookies, &self.csrf_cookie)
    }

    /// Issue one request and classify its response
    ///
    /// `url` is either absolute or a path relative to the configured base.
    /// The payload is ignored for `GET`. Redirects are followed; the final
    /// URL and status then decide the outcome through the classifier.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Authentication`] when the request ended on the login-error page
    /// - [`ClientError::Request`] for a non-success status, carrying the body text
    /// - [`ClientError::Transport`] when no response was received
    /// - [`ClientError::Serialization`] when the payload cannot be encoded
    pub async fn call<P>(
        &self,
        method: Method,
        url: &str,
        payload: Option<&P>,
        options: RequestOptions,
    ) -> ClientResult<Response>
    where
        P: Serialize + ?Sized,
    {
        let url = self.endpoints.resolve(url)?;
        let csrf_token = self.csrf_token_for(&url);

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, options.content_type());

        if let Some(token) = &csrf_token {
            request = request.header(self.csrf_header.clone(), token.as_str());
        }

        if let Some(payload) = payload
            && method != Method::GET
        {
            let body = if options.is_form_data {
                serde_urlencoded::to_string(payload)?
            } else {
                serde_json::to_string(payload)?
            };
            request = request.body(body);
        }

        debug!(%method, %url, csrf = csrf_token.is_some(), "sending request");
        let response = request.send().await?;

        let final_url = response.url().clone();
        let status = response.status();
        if final_url != url {
            debug!(from = %url, to = %final_url, "request was redirected");
        }

        match self.classifier.classify(&final_url, status) {
            ResponseOutcome::AuthError => {
                warn!(%final_url, "login rejected by backend");
                Err(ClientError::login_failed())
            }
            ResponseOutcome::Success => {
                if final_url != url && final_url == *self.endpoints.site_root() {
                    info!(%url, "redirect to site root treated as login success");
                }
                Ok(response)
            }
            ResponseOutcome::GenericError => {
                let body = response.text().await?;
                warn!(%method, %url, status = status.as_u16(), "request failed");
                Err(ClientError::from_status(status, &body))
            }
        }
    }

    /// `call` without a payload
    ///
    /// # Errors
    ///
    /// See [`Self::call`].
    pub async fn send(&self, method: Method, url: &str) -> ClientResult<Response> {
        self.call::<()>(method, url, None, RequestOptions::default())
            .await
    }

    /// `GET url`
    ///
    /// # Errors
    ///
    /// See [`Self::call`].
    pub async fn get(&self, url: &str) -> ClientResult<Response> {
        self.send(Method::GET, url).await
    }

    /// `call`, then decode the body as JSON
    ///
    /// # Errors
    ///
    /// See [`Self::call`]; additionally [`ClientError::Serialization`] if the
    /// body is not valid JSON for `T`.
    pub async fn call_json<T, P>(
        &self,
        method: Method,
        url: &str,
        payload: Option<&P>,
        options: RequestOptions,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let response = self.call(method, url, payload, options).await?;
        decode_json(response).await
    }

    /// Fetch page `page` of the slice-paginated list at `path`
    ///
    /// # Errors
    ///
    /// See [`Self::call_json`].
    pub async fn fetch_slice<T, K, V>(
        &self,
        path: &str,
        page: u32,
        query: &[(K, V)],
    ) -> ClientResult<SliceEnvelope<T>>
    where
        T: DeserializeOwned,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.endpoints.slice_page(path, page, query)?;
        let response = self.get(url.as_str()).await?;
        decode_json(response).await
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Value of cookie `name` in a `Cookie` header, URL-decoded; empty values count as absent
fn find_cookie(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            urlencoding::decode(value).map_or_else(|_| value.to_string(), Cow::into_owned)
        })
        .filter(|value| !value.is_empty())
}
