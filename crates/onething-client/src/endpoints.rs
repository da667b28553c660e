//! Backend endpoint resolution

use onething_core::ApiConfig;
use reqwest::Url;

use crate::classifier::site_root;
use crate::error::{ClientError, ClientResult};

/// Resolved URLs of the backend the client talks to
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
    site_root: Url,
    login: Url,
    logout: Url,
}

impl Endpoints {
    /// Resolve the configured base URL and auth paths
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if any of them fails to parse.
    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        let base = config.base_url.trim_end_matches('/').to_string();
        let site_root = site_root(&base)?;
        let login = join(&base, &config.login_path)?;
        let logout = join(&base, &config.logout_path)?;

        Ok(Self {
            base,
            site_root,
            login,
            logout,
        })
    }

    /// Configured base URL without a trailing slash
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Base URL with a trailing slash, where a successful form login lands
    pub const fn site_root(&self) -> &Url {
        &self.site_root
    }

    /// Form-login endpoint
    pub const fn login(&self) -> &Url {
        &self.login
    }

    /// Logout endpoint
    pub const fn logout(&self) -> &Url {
        &self.logout
    }

    /// Absolute http(s) URLs pass through; anything else is appended to the base
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the result does not parse.
    pub fn resolve(&self, path_or_url: &str) -> ClientResult<Url> {
        if let Ok(url) = Url::parse(path_or_url)
            && matches!(url.scheme(), "http" | "https")
        {
            return Ok(url);
        }
        join(&self.base, path_or_url)
    }

    /// `{path}/{page}?{query}`, the shape of every slice-paginated list endpoint
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the result does not parse.
    pub fn slice_page<K, V>(&self, path: &str, page: u32, query: &[(K, V)]) -> ClientResult<Url>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.resolve(&format!("{}/{page}", path.trim_end_matches('/')))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));
        }
        Ok(url)
    }
}

fn join(base: &str, path: &str) -> ClientResult<Url> {
    let joined = format!("{base}/{}", path.trim_start_matches('/'));
    Url::parse(&joined).map_err(|e| ClientError::InvalidUrl {
        url: joined,
        message: e.to_string(),
    })
}
