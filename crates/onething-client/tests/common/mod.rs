//! Common test utilities for client integration tests

#![allow(dead_code, unreachable_pub, clippy::panic)]

use onething_client::ApiClient;
use onething_core::ApiConfig;
use serde::{Deserialize, Serialize};
use wiremock::MockServer;

/// Mock backend plus a client pointed at it
pub struct TestBackend {
    pub server: MockServer,
    pub client: ApiClient,
}

impl TestBackend {
    /// Start a mock backend with default client settings
    pub async fn start() -> Self {
        Self::start_at("").await
    }

    /// Start a mock backend whose client base URL carries `context_path`, e.g. `/backend`
    pub async fn start_at(context_path: &str) -> Self {
        let server = MockServer::start().await;
        let base_url = format!("{}{context_path}", server.uri());
        let client = ApiClient::new(&ApiConfig::with_base_url(base_url))
            .unwrap_or_else(|e| panic!("client should build: {e}"));
        Self { server, client }
    }

    /// Absolute URL of `path` on the mock backend
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.server.uri())
    }
}

/// Stand-in list item; list screens never inspect item fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingRow {
    pub matching_id: u64,
    pub district: String,
}

/// Spring-style slice body with `len` rows
pub fn slice_body(page_number: u32, page_size: u32, len: u64, last: bool) -> serde_json::Value {
    let content: Vec<MeetingRow> = (0..len)
        .map(|i| MeetingRow {
            matching_id: u64::from(page_number) * u64::from(page_size) + i + 1,
            district: "강남구".to_string(),
        })
        .collect();

    serde_json::json!({
        "content": content,
        "pageable": {
            "pageNumber": page_number,
            "pageSize": page_size,
            "sort": {"empty": true, "sorted": false, "unsorted": true},
            "offset": u64::from(page_number) * u64::from(page_size),
            "paged": true,
            "unpaged": false
        },
        "first": page_number == 0,
        "last": last,
        "size": page_size,
        "number": page_number,
        "numberOfElements": len,
        "empty": len == 0
    })
}
