use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::ArcStr;

/// Mock implementation of the Net actor for testing purposes.
///
/// Maps URLs to canned response bodies so tests run without making actual
/// network requests. Unknown URLs fail like an unreachable host would.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    responses: Arc<Mutex<HashMap<ArcStr, ArcStr>>>,
}

impl Mock {
    pub fn new(responses: HashMap<ArcStr, ArcStr>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
        }
    }

    /// Registers (or replaces) the body returned for `url`.
    pub async fn insert(&self, url: ArcStr, body: ArcStr) {
        self.responses.lock().await.insert(url, body);
    }

    /// Looks up the canned body for `url`; headers are ignored.
    pub async fn get(
        &self,
        url: ArcStr,
        _headers: Option<HashMap<ArcStr, ArcStr>>,
    ) -> anyhow::Result<ArcStr> {
        self.responses
            .lock()
            .await
            .get(&url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("GET request not found in mock responses: {}", url))
    }
}
