//! Page/limit handling for road listings.

/// Clamped pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number.
    pub page: i64,

    /// Rows per page, in [1, 100].
    pub limit: i64,
}

impl PageParams {
    /// Default rows per page.
    pub const DEFAULT_LIMIT: i64 = 25;

    /// Maximum rows per page.
    pub const MAX_LIMIT: i64 = 100;

    /// Build parameters from raw query values, applying defaults and
    /// clamping out-of-range inputs instead of rejecting them.
    #[must_use]
    pub fn clamped(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Row offset for this page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::clamped(None, None)
    }
}
