// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Restaurant search trait over the suggestion index.

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::traits::adapter::ComponentAdapter;
use crate::types::Restaurant;

/// Adapter for querying the restaurant index.
#[async_trait]
pub trait RestaurantSearch: ComponentAdapter {
    /// Searches for restaurants matching the cuisine and, when given, the
    /// location. Results are ordered by rating, best first, and capped at
    /// `limit`.
    async fn search(
        &self,
        cuisine: &str,
        location: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Restaurant>, ConciergeError>;
}
