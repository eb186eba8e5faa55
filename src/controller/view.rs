use crate::fetcher::Record;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Filter text and page position over a loaded record set.
///
/// `page_index` is 1-based and always within
/// `[1, max(1, ceil(filtered_count / page_size))]`.
#[derive(Clone, Debug)]
pub struct ViewState {
    all_records: Vec<Record>,
    filter_text: String,
    page_index: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    /// A zero page size is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            all_records: Vec::new(),
            filter_text: String::new(),
            page_index: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn all_records(&self) -> &[Record] {
        &self.all_records
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replaces the record set and pulls the page index back into range.
    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.all_records = records;
        self.clamp_page_index();
    }

    /// Replaces the filter. Empty text matches everything.
    pub fn set_filter(&mut self, text: &str) {
        self.filter_text = text.to_string();
        self.page_index = 1;
    }

    /// Records whose name contains the filter text, ignoring case, in
    /// load order.
    pub fn filtered(&self) -> Vec<&Record> {
        let needle = self.filter_text.to_lowercase();
        self.all_records
            .iter()
            .filter(|r| needle.is_empty() || r.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    /// `ceil(filtered_count / page_size)`, which is 0 for an empty result.
    pub fn max_pages(&self) -> usize {
        self.filtered_count().div_ceil(self.page_size)
    }

    pub fn compute_visible_slice(&self) -> Vec<&Record> {
        let filtered = self.filtered();
        let start = (self.page_index - 1).saturating_mul(self.page_size);
        if start >= filtered.len() {
            return Vec::new();
        }
        let end = start.saturating_add(self.page_size).min(filtered.len());
        filtered[start..end].to_vec()
    }

    pub fn has_next_page(&self) -> bool {
        self.page_index < self.max_pages()
    }

    pub fn has_prev_page(&self) -> bool {
        self.page_index > 1 && self.max_pages() > 0
    }

    /// Returns whether the page changed.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Returns whether the page changed.
    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev_page() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Jumps to `page`, clamped into the valid range.
    pub fn go_to_page(&mut self, page: usize) {
        self.page_index = page.clamp(1, self.max_pages().max(1));
    }

    fn clamp_page_index(&mut self) {
        let last = self.max_pages().max(1);
        if self.page_index > last {
            self.page_index = last;
        }
        if self.page_index == 0 {
            self.page_index = 1;
        }
    }
}
