//! Product name suggestions for the item entry field.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::gateway::BillingApi;

/// Queries shorter than this, counted as typed, never hit the network.
pub const MIN_QUERY_CHARS: usize = 2;

/// Thin adapter over the suggestion endpoint.
///
/// Suggestions are a convenience: every failure degrades to an empty list.
#[derive(Clone)]
pub struct ProductLookup {
    api: Arc<dyn BillingApi>,
}

impl ProductLookup {
    pub fn new(api: Arc<dyn BillingApi>) -> Self {
        ProductLookup { api }
    }

    pub async fn suggest(&self, query: &str) -> Vec<String> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        match self.api.suggest_products(query).await {
            Ok(names) => {
                debug!(query, count = names.len(), "Product suggestions loaded");
                names
            }
            Err(e) => {
                warn!(query, error = %e, "Product suggestions unavailable");
                Vec::new()
            }
        }
    }
}
