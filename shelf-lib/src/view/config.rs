//! View configuration

/// Sizing and paging settings for a collection view.
///
/// # Example
///
/// ```
/// use shelf_lib::ViewConfig;
///
/// let config = ViewConfig::default()
///     .with_page_size(50)
///     .with_viewport_height(400);
/// assert_eq!(config.page_size, 50);
/// assert_eq!(config.row_height, 40);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Items requested per page.
    ///
    /// Default: 20
    pub page_size: usize,

    /// Fixed height of every row, in pixels.
    ///
    /// Default: 40
    pub row_height: u32,

    /// Height of the visible area, in pixels.
    ///
    /// Default: 600
    pub viewport_height: u32,

    /// Extra rows materialized above and below the visible area.
    ///
    /// Default: 3
    pub overscan: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            row_height: 40,
            viewport_height: 600,
            overscan: 3,
        }
    }
}

impl ViewConfig {
    /// Creates a new view config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size. Zero is bumped to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the row height. Zero is bumped to one.
    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height.max(1);
        self
    }

    /// Sets the viewport height.
    pub fn with_viewport_height(mut self, viewport_height: u32) -> Self {
        self.viewport_height = viewport_height;
        self
    }

    /// Sets the overscan row count.
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }
}
