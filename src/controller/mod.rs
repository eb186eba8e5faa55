mod view;

use crate::fetcher::{self, FetchError, IndexPage, Record, RecordFetcher};
use crate::utils::log;

pub use view::{ViewState, DEFAULT_PAGE_SIZE};

pub const DEFAULT_LIMIT: usize = 151;
pub const DEFAULT_CONCURRENCY: usize = 10;

/// How pages are produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginationMode {
    /// The API pages; navigation follows its `next`/`previous` cursors.
    Cursor,
    /// The whole (limited) collection is fetched once and paged locally.
    Client,
}

impl PaginationMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "cursor" | "server" => Some(Self::Cursor),
            "client" | "full" | "local" => Some(Self::Client),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cursor => "cursor",
            Self::Client => "client",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was started before this one finished; its result was dropped.
    Superseded,
}

/// Identifies one load. Only the most recently issued ticket may apply its
/// result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    url: String,
}

impl LoadTicket {
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Everything one load brought back.
#[derive(Clone, Debug)]
pub struct Fetched {
    pub page: IndexPage,
    pub records: Vec<Record>,
}

#[derive(Clone, Debug)]
pub struct ControllerOptions {
    pub endpoint: String,
    pub mode: PaginationMode,
    pub page_size: usize,
    /// Collection size limit for `PaginationMode::Client`.
    pub limit: Option<usize>,
    pub concurrency: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            endpoint: fetcher::DEFAULT_ENDPOINT.to_string(),
            mode: PaginationMode::Cursor,
            page_size: DEFAULT_PAGE_SIZE,
            limit: Some(DEFAULT_LIMIT),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

pub struct Controller<F> {
    fetcher: F,
    options: ControllerOptions,
    view: ViewState,
    current: String,
    next: Option<String>,
    previous: Option<String>,
    count: Option<u64>,
    load_state: LoadState,
    issued: u64,
}

impl<F: RecordFetcher> Controller<F> {
    pub fn new(fetcher: F, options: ControllerOptions) -> Result<Self, FetchError> {
        let limit = match options.mode {
            PaginationMode::Cursor => Some(options.page_size.max(1)),
            PaginationMode::Client => options.limit,
        };
        let current = fetcher::collection_url(&options.endpoint, limit)?;
        let view = ViewState::new(options.page_size);
        Ok(Self {
            fetcher,
            options,
            view,
            current,
            next: None,
            previous: None,
            count: None,
            load_state: LoadState::Idle,
            issued: 0,
        })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn mode(&self) -> PaginationMode {
        self.options.mode
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn current_locator(&self) -> &str {
        &self.current
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn prev_cursor(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn set_filter(&mut self, text: &str) {
        log::debug(&format!("filter set to {text:?}"));
        self.view.set_filter(text);
    }

    pub fn compute_visible_slice(&self) -> Vec<&Record> {
        self.view.compute_visible_slice()
    }

    pub fn has_next_page(&self) -> bool {
        match self.options.mode {
            PaginationMode::Client => self.view.has_next_page(),
            PaginationMode::Cursor => self.next.is_some() && !self.nothing_visible(),
        }
    }

    pub fn has_prev_page(&self) -> bool {
        match self.options.mode {
            PaginationMode::Client => self.view.has_prev_page(),
            PaginationMode::Cursor => self.previous.is_some() && !self.nothing_visible(),
        }
    }

    // nothing to show freezes navigation in both modes
    fn nothing_visible(&self) -> bool {
        self.view.filtered_count() == 0
    }

    /// `(page, total_pages)` for the page indicator.
    pub fn page_label(&self) -> (usize, usize) {
        match self.options.mode {
            PaginationMode::Client => (self.view.page_index(), self.view.max_pages().max(1)),
            PaginationMode::Cursor => {
                let page_size = self.options.page_size.max(1);
                let page = page_from_locator(&self.current, page_size);
                let total = self
                    .count
                    .map(|c| (c as usize).div_ceil(page_size))
                    .unwrap_or(page);
                (page, total.max(page))
            }
        }
    }

    /// Client mode only; cursor mode has no random access.
    pub fn go_to_page(&mut self, page: usize) {
        if self.options.mode == PaginationMode::Client {
            self.view.go_to_page(page);
        }
    }

    /// Marks a load of `url` as in flight and supersedes any earlier ticket.
    pub fn begin_load(&mut self, url: &str) -> LoadTicket {
        self.issued += 1;
        self.load_state = LoadState::Loading;
        log::debug(&format!("load #{} started: {url}", self.issued));
        LoadTicket {
            generation: self.issued,
            url: url.to_string(),
        }
    }

    /// Runs the fetch for `ticket` without touching controller state.
    pub async fn fetch(&self, ticket: &LoadTicket) -> Result<Fetched, FetchError> {
        let mut page = self.fetcher.fetch_index(&ticket.url).await?;
        let refs = std::mem::take(&mut page.results);
        let records = fetcher::resolve_all(&self.fetcher, &refs, self.options.concurrency).await?;
        Ok(Fetched { page, records })
    }

    /// Applies the result of `ticket` if it is still the newest load.
    ///
    /// Failures leave the records and cursors untouched and are returned to
    /// the caller after being logged.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Fetched, FetchError>,
    ) -> Result<LoadOutcome, FetchError> {
        if ticket.generation != self.issued {
            log::debug(&format!(
                "load #{} superseded by #{}, dropping result",
                ticket.generation, self.issued
            ));
            return Ok(LoadOutcome::Superseded);
        }
        match result {
            Ok(fetched) => {
                log::info(&format!(
                    "loaded {} records from {}",
                    fetched.records.len(),
                    ticket.url
                ));
                self.current = ticket.url;
                self.next = fetched.page.next;
                self.previous = fetched.page.previous;
                self.count = fetched.page.count;
                self.view.replace_records(fetched.records);
                self.load_state = LoadState::Idle;
                Ok(LoadOutcome::Applied)
            }
            Err(e) => {
                log::warn(&format!("error loading records: {e}"));
                self.load_state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// (Re)loads the current locator.
    pub async fn load_records(&mut self) -> Result<LoadOutcome, FetchError> {
        let url = self.current.clone();
        self.load_from(&url).await
    }

    /// Returns whether the visible page changed.
    pub async fn go_to_next_page(&mut self) -> Result<bool, FetchError> {
        match self.options.mode {
            PaginationMode::Client => Ok(self.view.next_page()),
            PaginationMode::Cursor if self.nothing_visible() => Ok(false),
            PaginationMode::Cursor => match self.next.clone() {
                Some(url) => Ok(self.load_from(&url).await? == LoadOutcome::Applied),
                None => Ok(false),
            },
        }
    }

    /// Returns whether the visible page changed.
    pub async fn go_to_prev_page(&mut self) -> Result<bool, FetchError> {
        match self.options.mode {
            PaginationMode::Client => Ok(self.view.prev_page()),
            PaginationMode::Cursor if self.nothing_visible() => Ok(false),
            PaginationMode::Cursor => match self.previous.clone() {
                Some(url) => Ok(self.load_from(&url).await? == LoadOutcome::Applied),
                None => Ok(false),
            },
        }
    }

    async fn load_from(&mut self, url: &str) -> Result<LoadOutcome, FetchError> {
        let ticket = self.begin_load(url);
        let result = self.fetch(&ticket).await;
        self.finish_load(ticket, result)
    }
}

/// 1-based page of a cursor locator, from its `offset` and `limit` query
/// parameters.
pub fn page_from_locator(url: &str, default_limit: usize) -> usize {
    let parsed = match reqwest::Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return 1,
    };
    let mut offset = 0usize;
    let mut limit = default_limit.max(1);
    for (k, v) in parsed.query_pairs() {
        match k.as_ref() {
            "offset" => offset = v.parse().unwrap_or(0),
            "limit" => limit = v.parse::<usize>().ok().filter(|l| *l > 0).unwrap_or(limit),
            _ => {}
        }
    }
    offset / limit + 1
}
