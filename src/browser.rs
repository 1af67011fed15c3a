//! The selection state machine: URL → database → table → rows.
//!
//! Every mutation recomputes the three dependency keys and returns the
//! [`PendingFetches`] the caller must run. Results come back through the
//! `resolve_*` methods together with the ticket they were issued for.

use crate::catalog::FetchError;
use crate::config::AppConfig;
use crate::data::{TablePayload, TableReference};
use crate::pagination::{Pager, RowWindow, WindowPolicy};
use crate::resource::{FetchResource, FetchTicket, ResourceState};
use crate::selection::{DatabasesKey, PayloadKey, Selection, TablesKey};

pub type DatabasesTicket = FetchTicket<DatabasesKey>;
pub type TablesTicket = FetchTicket<TablesKey>;
pub type PayloadTicket = FetchTicket<PayloadKey>;

/// Fetches a mutation made necessary. Empty when no key changed.
#[derive(Debug, Default, PartialEq)]
#[must_use]
pub struct PendingFetches {
    pub databases: Option<DatabasesTicket>,
    pub tables: Option<TablesTicket>,
    pub payload: Option<PayloadTicket>,
}

impl PendingFetches {
    pub fn is_empty(&self) -> bool {
        self.databases.is_none() && self.tables.is_none() && self.payload.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Browser {
    selection: Selection,
    pager: Pager,
    reset_page_on_date_filter: bool,
    databases: FetchResource<DatabasesKey, Vec<String>>,
    tables: FetchResource<TablesKey, Vec<TableReference>>,
    payload: FetchResource<PayloadKey, TablePayload>,
}

impl Default for Browser {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl Browser {
    pub fn new(config: &AppConfig) -> Self {
        let mut pager = Pager::new(config.window_policy, config.page_size);
        pager.clamp_next = config.clamp_next_page;

        Self {
            selection: Selection::new(&config.default_endpoint),
            pager,
            reset_page_on_date_filter: config.reset_page_on_date_filter,
            databases: FetchResource::new(),
            tables: FetchResource::new(),
            payload: FetchResource::new(),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Recompute every dependency key and collect tickets for the changed ones.
    pub fn sync(&mut self) -> PendingFetches {
        let pending = PendingFetches {
            databases: self.databases.track(self.selection.databases_key()),
            tables: self.tables.track(self.selection.tables_key()),
            payload: self.payload.track(self.selection.payload_key()),
        };
        if !pending.is_empty() {
            log::debug!(
                "Issuing fetches: databases={} tables={} payload={}",
                pending.databases.is_some(),
                pending.tables.is_some(),
                pending.payload.is_some()
            );
        }
        pending
    }

    /// Force every resource that has a key to fetch again.
    pub fn reload(&mut self) -> PendingFetches {
        log::info!("Reloading from {}", self.selection.endpoint());
        PendingFetches {
            databases: self.databases.invalidate(),
            tables: self.tables.invalidate(),
            payload: self.payload.invalidate(),
        }
    }

    pub fn set_endpoint(&mut self, url: &str) -> PendingFetches {
        self.selection.set_endpoint(url);
        log::info!("Endpoint set to {}", self.selection.endpoint());
        self.sync()
    }

    pub fn set_database(&mut self, name: &str) -> PendingFetches {
        if name != self.selection.database() {
            log::info!("Database selected: '{}'", name);
        }
        self.selection.set_database(name);
        self.sync()
    }

    pub fn set_table(&mut self, name: &str) -> PendingFetches {
        if self.selection.set_table(name) {
            log::info!("Table selected: '{}'", self.selection.table());
        }
        self.sync()
    }

    /// Page moves never change a fetch key.
    pub fn set_page_input(&mut self, input: &str) {
        self.selection.set_page_input(input);
    }

    pub fn set_date_filter(&mut self, iso: &str) -> Result<PendingFetches, chrono::ParseError> {
        let before = self.selection.date_filter();
        self.selection.set_date_filter(iso).map_err(|e| {
            log::warn!("Rejected date filter '{}': {}", iso, e);
            e
        })?;
        if self.reset_page_on_date_filter && before != self.selection.date_filter() {
            self.selection.set_page(1.0);
        }
        Ok(self.sync())
    }

    pub fn set_window_policy(&mut self, policy: WindowPolicy) {
        self.pager.policy = policy;
        self.selection.set_page(1.0);
    }

    pub fn go_to_page(&mut self, n: f64) {
        self.selection.set_page(n);
    }

    pub fn first_page(&mut self) {
        self.selection.set_page(1.0);
    }

    pub fn previous_page(&mut self) {
        let page = self.pager.previous_page(self.selection.page());
        self.selection.set_page(page as f64);
    }

    pub fn next_page(&mut self) {
        let page = self.pager.next_page(self.selection.page(), self.total_rows());
        self.selection.set_page(page as f64);
    }

    pub fn last_page(&mut self) {
        let page = self.pager.last_page(self.total_rows());
        self.selection.set_page(page as f64);
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.pager.set_page_size(size);
        self.selection.set_page(1.0);
    }

    pub fn resolve_databases(
        &mut self,
        ticket: &DatabasesTicket,
        result: Result<Vec<String>, FetchError>,
    ) -> bool {
        log_outcome("databases", &result);
        self.databases.resolve(ticket, result)
    }

    pub fn resolve_tables(
        &mut self,
        ticket: &TablesTicket,
        result: Result<Vec<TableReference>, FetchError>,
    ) -> bool {
        log_outcome("tables", &result);
        self.tables.resolve(ticket, result)
    }

    pub fn resolve_payload(
        &mut self,
        ticket: &PayloadTicket,
        result: Result<TablePayload, FetchError>,
    ) -> bool {
        log_outcome("table data", &result);
        self.payload.resolve(ticket, result)
    }

    /// Databases, or an empty list while loading or after a failure.
    pub fn databases(&self) -> &[String] {
        self.databases.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tables(&self) -> &[TableReference] {
        self.tables.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn payload(&self) -> Option<&TablePayload> {
        self.payload.value()
    }

    pub fn databases_state(&self) -> &ResourceState<Vec<String>> {
        self.databases.state()
    }

    pub fn databases_error(&self) -> Option<&FetchError> {
        self.databases.error()
    }

    pub fn tables_error(&self) -> Option<&FetchError> {
        self.tables.error()
    }

    pub fn payload_error(&self) -> Option<&FetchError> {
        self.payload.error()
    }

    fn total_rows(&self) -> usize {
        self.payload().map(TablePayload::row_count).unwrap_or(0)
    }

    pub fn window(&self) -> RowWindow<'_> {
        let page = self.selection.page();
        let rows = self
            .payload()
            .map(|payload| self.pager.visible(&payload.rows, page))
            .unwrap_or(&[]);
        let total_rows = self.total_rows();
        let first_row_number = usize::try_from(page - 1)
            .ok()
            .and_then(|offset| offset.checked_mul(self.pager.step()))
            .map_or(usize::MAX, |offset| offset.saturating_add(1));

        RowWindow {
            rows,
            first_row_number,
            total_rows,
            page,
            last_page: self.pager.last_page(total_rows),
            databases_loading: self.databases.is_loading(),
            tables_loading: self.tables.is_loading(),
            table_data_loading: self.payload.is_loading(),
        }
    }
}

fn log_outcome<T>(what: &str, result: &Result<T, FetchError>) {
    if let Err(e) = result {
        log::error!("Failed to fetch {}: {}", what, e);
    }
}
