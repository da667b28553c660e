//! Response classification for the session-cookie backend
//!
//! Form login does not report its outcome through a status code: the backend
//! redirects to the site root on success and to a login-error page on
//! failure. Classification therefore looks at the final URL before the status.

use http::StatusCode;
use onething_core::ApiConfig;
use reqwest::Url;

use crate::error::{ClientError, ClientResult};

/// How a finished exchange should be surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Hand the response to the caller
    Success,
    /// Raise [`ClientError::Authentication`]
    AuthError,
    /// Raise [`ClientError::Request`] with the body text
    GenericError,
}

/// Decides the outcome of a response from its final URL and status
///
/// Closures of the same shape implement this trait, so one-off rules can be
/// plugged in without a named type.
pub trait ResponseClassifier: Send + Sync {
    /// Classify the response that ended at `final_url` with `status`
    fn classify(&self, final_url: &Url, status: StatusCode) -> ResponseOutcome;
}

impl<F> ResponseClassifier for F
where
    F: Fn(&Url, StatusCode) -> ResponseOutcome + Send + Sync,
{
    fn classify(&self, final_url: &Url, status: StatusCode) -> ResponseOutcome {
        self(final_url, status)
    }
}

/// Rules for a Spring form-login backend
#[derive(Debug, Clone)]
pub struct LoginRedirectClassifier {
    site_root: Url,
    error_marker: String,
}

impl LoginRedirectClassifier {
    /// Classifier treating `site_root` as login success and URLs containing `error_marker` as failure
    pub fn new(site_root: Url, error_marker: impl Into<String>) -> Self {
        Self {
            site_root,
            error_marker: error_marker.into(),
        }
    }

    /// Build from the configured base URL and login-error marker
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the base URL does not parse.
    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        let site_root = site_root(&config.base_url)?;
        Ok(Self::new(site_root, config.login_error_marker.clone()))
    }

    /// URL whose arrival signals a successful login
    pub const fn site_root(&self) -> &Url {
        &self.site_root
    }

    fn is_login_error(&self, url: &Url) -> bool {
        let mut target = url.path().to_string();
        if let Some(query) = url.query() {
            target.push('?');
            target.push_str(query);
        }
        target.contains(&self.error_marker)
    }
}

impl ResponseClassifier for LoginRedirectClassifier {
    fn classify(&self, final_url: &Url, status: StatusCode) -> ResponseOutcome {
        if self.is_login_error(final_url) {
            ResponseOutcome::AuthError
        } else if *final_url == self.site_root || status.is_success() {
            ResponseOutcome::Success
        } else {
            ResponseOutcome::GenericError
        }
    }
}

/// `base_url` with exactly one trailing slash, e.g. `http://localhost:8080/`
///
/// A context path is kept: `https://admin.example.com/backend` has the root
/// `https://admin.example.com/backend/`, where the backend lands a login.
///
/// # Errors
///
/// Returns [`ClientError::InvalidUrl`] if `base_url` does not parse.
pub fn site_root(base_url: &str) -> ClientResult<Url> {
    let root = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&root).map_err(|e| ClientError::InvalidUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })
}
