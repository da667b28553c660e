//! Form-login session handling

use std::fmt;

use reqwest::{Method, Response};
use serde::Serialize;
use tracing::info;

use crate::client::{ApiClient, RequestOptions};
use crate::error::ClientResult;

/// Staff login form fields
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Login form for `username` / `password`
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ApiClient {
    /// Load the login page so the backend issues its CSRF cookie
    ///
    /// Returns the token now held in the jar, if the backend set one.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn fetch_csrf_token(&self) -> ClientResult<Option<String>> {
        let login = self.endpoints().login().clone();
        self.get(login.as_str()).await?;
        Ok(self.csrf_token())
    }

    /// Submit the login form
    ///
    /// The backend answers with a redirect; landing on the site root is a
    /// success and landing on the login-error page fails with
    /// [`crate::ClientError::Authentication`].
    ///
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<Response> {
        let login = self.endpoints().login().clone();
        let response = self
            .call(Method::POST, login.as_str(), Some(credentials), RequestOptions::form())
            .await?;
        info!(username = %credentials.username, "logged in");
        Ok(response)
    }

    /// End the session
    ///
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn logout(&self) -> ClientResult<Response> {
        let logout = self.endpoints().logout().clone();
        self.send(Method::POST, logout.as_str()).await
    }
}
