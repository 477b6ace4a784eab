//! Fixed-row-height windowing
//!
//! Long result lists are never rendered in full. Given the scroll position,
//! the viewport works out which rows are on screen (plus a few rows of
//! overscan either side) so only that slice needs to be materialized.

use crate::config::ViewConfig;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Height of one row, in the same unit as `height`
    row_height: usize,

    /// Height of the visible area
    height: usize,

    /// Rows rendered beyond each edge of the visible area
    overscan: usize,
}

impl Viewport {
    pub fn new(row_height: usize, height: usize, overscan: usize) -> Self {
        Self {
            row_height: row_height.max(1),
            height,
            overscan,
        }
    }

    /// Height of one row, never zero
    pub fn row_height(&self) -> usize {
        self.row_height
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Number of rows that fit in the visible area, at least one
    pub fn rows_per_page(&self) -> usize {
        self.height.div_ceil(self.row_height).max(1)
    }

    /// Rows to render when scrolled to `scroll_offset`, clamped to `0..total_rows`
    ///
    /// # Examples
    /// ```
    /// # use candidate_directory::app::services::viewport::Viewport;
    /// let viewport = Viewport::new(1, 10, 2);
    /// assert_eq!(viewport.visible_range(100, 50), 48..62);
    /// assert_eq!(viewport.visible_range(100, 0), 0..12);
    /// ```
    pub fn visible_range(&self, total_rows: usize, scroll_offset: usize) -> Range<usize> {
        let first = scroll_offset / self.row_height;
        let start = first.saturating_sub(self.overscan).min(total_rows);
        let end = first
            .saturating_add(self.rows_per_page())
            .saturating_add(self.overscan)
            .min(total_rows);
        start..end.max(start)
    }

    /// Rows on the zero-based `page`, without overscan
    pub fn page_range(&self, total_rows: usize, page: usize) -> Range<usize> {
        let per_page = self.rows_per_page();
        let start = page.saturating_mul(per_page).min(total_rows);
        let end = start.saturating_add(per_page).min(total_rows);
        start..end
    }

    /// Number of pages needed for `total_rows`
    pub fn page_count(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.rows_per_page())
    }

    /// Height of the full list if every row were rendered
    pub fn total_height(&self, total_rows: usize) -> usize {
        total_rows.saturating_mul(self.row_height)
    }

    /// Slice of `items` covered by `range`, clamped to the slice length
    pub fn page<'a, T>(&self, items: &'a [T], range: Range<usize>) -> &'a [T] {
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }
}

impl From<&ViewConfig> for Viewport {
    fn from(config: &ViewConfig) -> Self {
        Self::new(config.row_height, config.viewport_height, config.overscan)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from(&ViewConfig::default())
    }
}
