use crate::ApiResult;

/// Source of installed extension names, consumed read-only and in reported order.
pub trait ExtensionRegistry: Send + Sync {
    /// Registry name (for logging/debugging)
    fn name(&self) -> &str;

    /// Installed extension names in registry order.
    fn extensions(&self) -> ApiResult<Vec<String>>;
}
