//! Pagination engine shared by the results table, the table directory and
//! the example catalog.
//!
//! `paginate` is a pure windowing function over a slice. The mutable page
//! index lives in a caller-owned [`PageCursor`].

/// Navigation request against a paginated view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    /// Jump to page 1.
    First,
    /// One page back, clamped at 1.
    Prev,
    /// One page forward, clamped at the last page.
    Next,
    /// Jump to the last page.
    Last,
}

/// Returns the number of pages needed for `total_items`.
///
/// An empty set still reports one page. A `page_size` of zero is treated as 1.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Applies a navigation request to a page index, clamping into `1..=total_pages`.
pub fn navigate(page_index: usize, total_pages: usize, nav: Nav) -> usize {
    let last = total_pages.max(1);
    let target = match nav {
        Nav::First => 1,
        Nav::Prev => page_index.saturating_sub(1).max(1),
        Nav::Next => page_index.saturating_add(1).min(last),
        Nav::Last => last,
    };
    target.clamp(1, last)
}

/// Position of one page inside an ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page_index: usize,
    page_size: usize,
    total_items: usize,
}

impl PageWindow {
    /// Creates a window, clamping `page_index` into `1..=total_pages`.
    pub fn new(page_index: usize, page_size: usize, total_items: usize) -> Self {
        let page_size = page_size.max(1);
        let page_index = page_index.clamp(1, total_pages(total_items, page_size));
        Self {
            page_index,
            page_size,
            total_items,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    /// Zero-based index of the first item on this page.
    pub fn start_index(&self) -> usize {
        ((self.page_index - 1) * self.page_size).min(self.total_items)
    }

    /// Zero-based exclusive end of this page.
    pub fn end_index(&self) -> usize {
        (self.start_index() + self.page_size).min(self.total_items)
    }
}

/// One page of items together with its navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items visible on this page.
    pub items: &'a [T],
    /// The window these items were cut from.
    pub window: PageWindow,
    /// Whether a previous page exists.
    pub can_prev: bool,
    /// Whether a next page exists.
    pub can_next: bool,
}

impl<T> Page<'_, T> {
    pub fn page_index(&self) -> usize {
        self.window.page_index()
    }

    pub fn total_pages(&self) -> usize {
        self.window.total_pages()
    }

    /// Human readable range such as `"1 to 10 of 42"`.
    pub fn range_label(&self) -> String {
        let total = self.window.total_items();
        if total == 0 {
            return "0 to 0 of 0".to_string();
        }
        format!(
            "{} to {} of {}",
            self.window.start_index() + 1,
            self.window.end_index(),
            total
        )
    }
}

/// Cuts the page at `page_index` (1-based) out of `items`.
pub fn paginate<T>(items: &[T], page_size: usize, page_index: usize) -> Page<'_, T> {
    let window = PageWindow::new(page_index, page_size, items.len());
    Page {
        items: &items[window.start_index()..window.end_index()],
        can_prev: window.page_index() > 1,
        can_next: window.page_index() < window.total_pages(),
        window,
    }
}

/// Caller-owned page index for one view.
///
/// The cursor remembers the generation of the data source it was last
/// positioned against; [`PageCursor::sync_source`] snaps back to page 1 when
/// the source has been replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    page_index: usize,
    page_size: usize,
    source_generation: u64,
}

impl PageCursor {
    /// Creates a cursor on page 1 with the given page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 1,
            page_size: page_size.max(1),
            source_generation: 0,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Moves the cursor. Returns `false` when the request lands on the current page.
    pub fn go(&mut self, nav: Nav, total_items: usize) -> bool {
        let pages = total_pages(total_items, self.page_size);
        let current = self.page_index.clamp(1, pages);
        let target = navigate(current, pages, nav);
        if target == self.page_index {
            return false;
        }
        self.page_index = target;
        true
    }

    /// Jumps to a specific page, clamped into range.
    pub fn go_to(&mut self, page_index: usize, total_items: usize) -> bool {
        let target = page_index.clamp(1, total_pages(total_items, self.page_size));
        if target == self.page_index {
            return false;
        }
        self.page_index = target;
        true
    }

    /// Returns to page 1.
    pub fn reset(&mut self) {
        self.page_index = 1;
    }

    /// Resets to page 1 if `generation` differs from the last seen source.
    pub fn sync_source(&mut self, generation: u64) {
        if self.source_generation != generation {
            self.source_generation = generation;
            self.reset();
        }
    }

    /// Returns the current page of `items`.
    pub fn page<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        paginate(items, self.page_size, self.page_index)
    }
}
