use chrono::NaiveDate;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8001/";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trim surrounding whitespace and make sure the base ends with `/`.
pub fn normalize_endpoint(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabasesKey {
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablesKey {
    pub endpoint: String,
    pub database: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadKey {
    pub endpoint: String,
    pub database: String,
    pub table: String,
    pub created: Option<String>,
}

/// The user-selectable inputs of the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    endpoint: String,
    database: String,
    table: String,
    page: u64,
    date_filter: Option<NaiveDate>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl Selection {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint),
            database: String::new(),
            table: String::new(),
            page: 1,
            date_filter: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn date_filter(&self) -> Option<NaiveDate> {
        self.date_filter
    }

    /// Downstream selections are left alone; only the databases key changes.
    pub fn set_endpoint(&mut self, url: &str) {
        self.endpoint = normalize_endpoint(url);
    }

    pub fn set_database(&mut self, name: &str) {
        self.database = name.to_string();
        self.table.clear();
        self.page = 1;
    }

    /// Returns false, leaving the selection untouched, while no database is
    /// selected.
    pub fn set_table(&mut self, name: &str) -> bool {
        if self.database.is_empty() {
            log::warn!("Ignoring table '{}' with no database selected", name);
            return false;
        }
        self.table = name.to_string();
        self.page = 1;
        true
    }

    /// `max(1, floor(n))`; non-finite input leaves the cursor untouched.
    pub fn set_page(&mut self, n: f64) {
        if !n.is_finite() {
            return;
        }
        let floored = n.floor();
        self.page = if floored < 1.0 { 1 } else { floored as u64 };
    }

    pub fn set_page_input(&mut self, input: &str) {
        match input.trim().parse::<f64>() {
            Ok(n) => self.set_page(n),
            Err(_) => log::debug!("Ignoring non-numeric page input: '{}'", input),
        }
    }

    /// Empty input clears the filter. An invalid date leaves state unchanged.
    pub fn set_date_filter(&mut self, iso: &str) -> Result<(), chrono::ParseError> {
        let trimmed = iso.trim();
        if trimmed.is_empty() {
            self.date_filter = None;
            return Ok(());
        }
        self.date_filter = Some(NaiveDate::parse_from_str(trimmed, DATE_FORMAT)?);
        Ok(())
    }

    pub fn date_filter_iso(&self) -> Option<String> {
        self.date_filter
            .map(|date| date.format(DATE_FORMAT).to_string())
    }

    pub fn databases_key(&self) -> Option<DatabasesKey> {
        Some(DatabasesKey {
            endpoint: self.endpoint.clone(),
        })
    }

    pub fn tables_key(&self) -> Option<TablesKey> {
        if self.database.is_empty() {
            return None;
        }
        Some(TablesKey {
            endpoint: self.endpoint.clone(),
            database: self.database.clone(),
        })
    }

    pub fn payload_key(&self) -> Option<PayloadKey> {
        if self.database.is_empty() || self.table.is_empty() {
            return None;
        }
        Some(PayloadKey {
            endpoint: self.endpoint.clone(),
            database: self.database.clone(),
            table: self.table.clone(),
            created: self.date_filter_iso(),
        })
    }
}
