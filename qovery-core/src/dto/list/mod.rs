//! Listing envelope

use serde::{Deserialize, Serialize};

/// Listings are wrapped as `{"results": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn into_results(self) -> Vec<T> {
        self.results
    }
}
