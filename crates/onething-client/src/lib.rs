//! API client for the Onething admin backend
//!
//! Every backend call goes through [`ApiClient::call`], which attaches the
//! CSRF token from the session cookie jar, encodes the payload as JSON or a
//! form, follows redirects and classifies the outcome. List endpoints return
//! slices that [`onething_core::SliceView`] turns into pagination state.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod classifier;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod session;

pub use classifier::{LoginRedirectClassifier, ResponseClassifier, ResponseOutcome};
pub use client::{ApiClient, RequestOptions};
pub use endpoints::Endpoints;
pub use error::{ClientError, ClientResult, LOGIN_FAILED_MESSAGE};
pub use session::Credentials;

pub use reqwest::{Method, Response, Url};
