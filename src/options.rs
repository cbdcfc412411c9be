// Pagination options for list endpoints.
// Fields are sent as query parameters only when the caller sets them.

use serde::Serialize;

use crate::error::Result;

/// Pagination for list calls. Zero fields are left out of the query
/// string entirely, so the server's defaults apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListOptions {
    /// Page of results to fetch, 1-based.
    #[serde(skip_serializing_if = "is_zero")]
    pub page: u32,
    /// Number of results per page.
    #[serde(skip_serializing_if = "is_zero")]
    pub per_page: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl ListOptions {
    /// Encode as a query string, or `None` when every field is defaulted.
    pub(crate) fn to_query(&self) -> Result<Option<String>> {
        let query = serde_urlencoded::to_string(self)?;
        if query.is_empty() {
            Ok(None)
        } else {
            Ok(Some(query))
        }
    }
}
