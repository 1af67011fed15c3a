use serde::{Deserialize, Serialize};

use crate::data::Row;

/// Page sizes offered by the paged policy.
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [1, 10, 100];

/// Absolute cursor jumps offered by the single-row policy.
pub const SINGLE_ROW_JUMPS: [u64; 3] = [1, 10, 100];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// The cursor is a 1-based row index; one row is visible.
    SingleRow,
    /// The cursor is a 1-based page number of `page_size` rows.
    #[default]
    Paged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub policy: WindowPolicy,
    page_size: usize,
    pub clamp_next: bool,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(WindowPolicy::Paged, 10)
    }
}

impl Pager {
    pub fn new(policy: WindowPolicy, page_size: usize) -> Self {
        Self {
            policy,
            page_size: page_size.max(1),
            clamp_next: false,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
    }

    /// Rows covered by one cursor step under the active policy.
    pub fn step(&self) -> usize {
        match self.policy {
            WindowPolicy::SingleRow => 1,
            WindowPolicy::Paged => self.page_size,
        }
    }

    pub fn visible<'a>(&self, rows: &'a [Row], page: u64) -> &'a [Row] {
        match self.policy {
            WindowPolicy::SingleRow => single_row_window(rows, page),
            WindowPolicy::Paged => paged_window(rows, page, self.page_size),
        }
    }

    pub fn previous_page(&self, page: u64) -> u64 {
        page.saturating_sub(1).max(1)
    }

    /// Unbounded unless `clamp_next` is set, in which case it stops at the last page.
    pub fn next_page(&self, page: u64, total_rows: usize) -> u64 {
        let next = page.saturating_add(1);
        if self.clamp_next {
            next.min(self.last_page(total_rows).max(1))
        } else {
            next
        }
    }

    pub fn last_page(&self, total_rows: usize) -> u64 {
        last_page(total_rows, self.step())
    }
}

pub fn single_row_window(rows: &[Row], page: u64) -> &[Row] {
    let Some(index) = cursor_index(page, 1) else {
        return &[];
    };
    match rows.get(index..=index) {
        Some(window) => window,
        None => &[],
    }
}

pub fn paged_window(rows: &[Row], page: u64, page_size: usize) -> &[Row] {
    let Some(start) = cursor_index(page, page_size) else {
        return &[];
    };
    if start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}

/// `ceil(total_rows / page_size)`, with a zero page size treated as 1.
pub fn last_page(total_rows: usize, page_size: usize) -> u64 {
    let size = page_size.max(1);
    total_rows.div_ceil(size) as u64
}

/// 0-based index of the first row under `page`, or `None` past `usize`.
fn cursor_index(page: u64, page_size: usize) -> Option<usize> {
    let offset = usize::try_from(page.max(1) - 1).ok()?;
    offset.checked_mul(page_size)
}

/// What the presentation layer renders for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RowWindow<'a> {
    pub rows: &'a [Row],
    /// 1-based number of the first visible row.
    pub first_row_number: usize,
    pub total_rows: usize,
    pub page: u64,
    pub last_page: u64,
    pub databases_loading: bool,
    pub tables_loading: bool,
    pub table_data_loading: bool,
}

impl RowWindow<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_past_end(&self) -> bool {
        self.total_rows > 0 && self.page > self.last_page
    }
}
