//! Rate limit information.

/// Rate limit information for the core API.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp when the rate limit resets.
    pub reset: u64,

    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// Returns true once no requests remain in the current window.
    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.remaining == 0
    }
}
