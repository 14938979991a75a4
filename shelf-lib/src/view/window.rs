//! Fixed-height row windowing and the scroll-driven prefetch policy.

use std::ops::Range;

/// Direction of the last scroll movement.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Towards the end of the list.
    Forward,
    /// Towards the start of the list.
    Backward,
    /// Offset did not change.
    #[default]
    Idle,
}

/// Emitted on every scroll update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollProgress {
    pub offset: u32,
    pub direction: ScrollDirection,
}

/// Scroll window over a list of fixed-height rows.
///
/// Row `i` spans `[i * row_height, (i + 1) * row_height)`. A row is visible when
/// its span intersects `[offset, offset + viewport_height)`; `overscan` extra
/// rows on each side are materialized as well.
#[derive(Debug, Clone)]
pub struct Window {
    row_height: u32,
    viewport_height: u32,
    overscan: usize,
    offset: u32,
}

impl Window {
    pub fn new(row_height: u32, viewport_height: u32, overscan: usize) -> Self {
        Self {
            row_height: row_height.max(1),
            viewport_height,
            overscan,
            offset: 0,
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// Total height of `row_count` rows.
    pub fn content_height(&self, row_count: usize) -> u64 {
        row_count as u64 * self.row_height as u64
    }

    /// Largest offset that still fills the viewport.
    pub fn max_offset(&self, row_count: usize) -> u32 {
        let max = self
            .content_height(row_count)
            .saturating_sub(self.viewport_height as u64);
        max.min(u32::MAX as u64) as u32
    }

    /// Top edge of row `index`.
    pub fn row_top(&self, index: usize) -> u64 {
        index as u64 * self.row_height as u64
    }

    /// Moves the window, clamping to the content, and reports the movement.
    pub fn scroll_to(&mut self, offset: u32, row_count: usize) -> ScrollProgress {
        let offset = offset.min(self.max_offset(row_count));
        let direction = if offset > self.offset {
            ScrollDirection::Forward
        } else if offset < self.offset {
            ScrollDirection::Backward
        } else {
            ScrollDirection::Idle
        };
        self.offset = offset;
        ScrollProgress { offset, direction }
    }

    /// Resizes the viewport and re-clamps the offset.
    pub fn set_viewport_height(&mut self, viewport_height: u32, row_count: usize) {
        self.viewport_height = viewport_height;
        self.offset = self.offset.min(self.max_offset(row_count));
    }

    /// Back to the top.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Rows intersecting the viewport, without overscan.
    pub fn visible_range(&self, row_count: usize) -> Range<usize> {
        if row_count == 0 || self.viewport_height == 0 {
            return 0..0;
        }
        let row_height = self.row_height as u64;
        let top = self.offset as u64;
        let bottom = top + self.viewport_height as u64;
        let start = (top / row_height) as usize;
        let end = (bottom.div_ceil(row_height) as usize).min(row_count);
        start.min(end)..end
    }

    /// Rows to materialize: the visible range widened by `overscan` on both sides.
    pub fn materialized_range(&self, row_count: usize) -> Range<usize> {
        let visible = self.visible_range(row_count);
        if visible.is_empty() {
            return visible;
        }
        let start = visible.start.saturating_sub(self.overscan);
        let end = (visible.end + self.overscan).min(row_count);
        start..end
    }
}

/// Decides when scrolling should load the next page.
///
/// Fires only on forward movement, once the unrendered distance below the
/// viewport drops under about one page of rows minus the overscan budget.
/// Scrolling back up never triggers a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchPolicy {
    pub row_height: u32,
    pub page_size: usize,
    pub overscan: usize,
}

impl PrefetchPolicy {
    pub fn new(row_height: u32, page_size: usize, overscan: usize) -> Self {
        Self {
            row_height,
            page_size,
            overscan,
        }
    }

    /// Remaining distance, in pixels, under which a prefetch fires.
    pub fn threshold(&self) -> u64 {
        let row_height = self.row_height as u64;
        let page = row_height * self.page_size as u64;
        let overscan_budget = row_height * self.overscan as u64;
        page.saturating_sub(overscan_budget)
    }

    pub fn should_prefetch(
        &self,
        progress: ScrollProgress,
        row_count: usize,
        viewport_height: u32,
    ) -> bool {
        if progress.direction != ScrollDirection::Forward {
            return false;
        }
        let content = row_count as u64 * self.row_height as u64;
        let seen = progress.offset as u64 + viewport_height as u64;
        content.saturating_sub(seen) < self.threshold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Window {
        Window::new(40, 600, 3)
    }

    #[test]
    fn test_visible_range_at_top() {
        let w = window();
        assert_eq!(w.visible_range(1000), 0..15);
        assert_eq!(w.materialized_range(1000), 0..18);
    }

    #[test]
    fn test_partial_rows_are_visible() {
        let mut w = window();
        w.scroll_to(50, 1000);
        // Row 1 spans 40..80 and row 16 spans 640..680; viewport is 50..650.
        assert_eq!(w.visible_range(1000), 1..17);
        assert_eq!(w.materialized_range(1000), 0..20);
    }

    #[test]
    fn test_materialized_rows_are_bounded() {
        let mut w = window();
        for offset in [0, 1234, 20_000, 39_400] {
            w.scroll_to(offset, 1000);
            assert!(w.materialized_range(1000).len() <= 15 + 1 + 2 * 3);
        }
    }

    #[test]
    fn test_short_list() {
        let w = window();
        assert_eq!(w.visible_range(4), 0..4);
        assert_eq!(w.materialized_range(4), 0..4);
        assert_eq!(w.visible_range(0), 0..0);
        assert_eq!(Window::new(40, 0, 3).materialized_range(10), 0..0);
    }

    #[test]
    fn test_scroll_is_clamped_and_reports_direction() {
        let mut w = window();
        let p = w.scroll_to(10_000, 20);
        assert_eq!(p, ScrollProgress { offset: 200, direction: ScrollDirection::Forward });
        assert_eq!(w.scroll_to(200, 20).direction, ScrollDirection::Idle);
        assert_eq!(w.scroll_to(80, 20).direction, ScrollDirection::Backward);
        assert_eq!(w.visible_range(20), 2..17);
    }

    #[test]
    fn test_viewport_resize_reclamps() {
        let mut w = window();
        w.scroll_to(200, 20);
        w.set_viewport_height(800, 20);
        assert_eq!(w.offset(), 0);
    }

    #[test]
    fn test_prefetch_threshold() {
        let policy = PrefetchPolicy::new(40, 20, 3);
        assert_eq!(policy.threshold(), 680);
        assert_eq!(PrefetchPolicy::new(40, 2, 5).threshold(), 0);
    }

    #[test]
    fn test_prefetch_only_near_end_going_forward() {
        let policy = PrefetchPolicy::new(40, 20, 3);
        let forward = |offset| ScrollProgress { offset, direction: ScrollDirection::Forward };
        let backward = |offset| ScrollProgress { offset, direction: ScrollDirection::Backward };

        // 100 rows = 4000px of content.
        assert!(!policy.should_prefetch(forward(2000), 100, 600));
        assert!(policy.should_prefetch(forward(2800), 100, 600));
        assert!(!policy.should_prefetch(backward(2800), 100, 600));
        assert!(!policy.should_prefetch(
            ScrollProgress { offset: 3400, direction: ScrollDirection::Idle },
            100,
            600
        ));
    }
}
