use serde_json::Value;
use url::Url;

use crate::data::{TablePayload, TableReference};
use crate::payload_adapter;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    InvalidUrl(String),
    NetworkFailure(String),
    HttpStatusFailure { status: u16, reason: String },
    ParseFailure(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            FetchError::NetworkFailure(msg) => write!(f, "Network error: {}", msg),
            FetchError::HttpStatusFailure { status, reason } => {
                write!(f, "Server responded {} {}", status, reason)
            }
            FetchError::ParseFailure(msg) => write!(f, "Unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Anything that can turn a URL into parsed JSON.
#[allow(async_fn_in_trait)]
pub trait JsonFetcher {
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatusFailure {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::ParseFailure(e.to_string()))
    }
}

fn parse_base(base: &str) -> Result<Url, FetchError> {
    let url = Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))?;
    if url.cannot_be_a_base() {
        return Err(FetchError::InvalidUrl(format!("{} cannot be a base", base)));
    }
    Ok(url)
}

/// Replace the trailing empty segment of `base` with `segments`, the last of
/// which receives the `.json` suffix.
fn json_url(base: &str, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = parse_base(base)?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(format!("{} cannot be a base", base)))?;
        path.pop_if_empty();
        match segments.split_last() {
            Some((last, parents)) => {
                path.extend(parents.iter().copied());
                path.push(&format!("{}.json", last));
            }
            None => {
                path.push(".json");
            }
        }
    }
    Ok(url)
}

pub fn databases_url(base: &str) -> Result<Url, FetchError> {
    json_url(base, &[])
}

pub fn tables_url(base: &str, database: &str) -> Result<Url, FetchError> {
    json_url(base, &[database])
}

pub fn table_url(
    base: &str,
    database: &str,
    table: &str,
    created: Option<&str>,
) -> Result<Url, FetchError> {
    let mut url = json_url(base, &[database, table])?;
    if let Some(date) = created {
        url.query_pairs_mut().append_pair("created", date);
    }
    Ok(url)
}

pub type Client = CatalogClient<HttpFetcher>;

#[derive(Debug, Clone, Default)]
pub struct CatalogClient<F> {
    fetcher: F,
}

impl<F: JsonFetcher> CatalogClient<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub async fn list_databases(&self, base: &str) -> Result<Vec<String>, FetchError> {
        log::info!("Listing databases at: '{}'", base);

        let url = databases_url(base)?;
        let json = self.fetcher.fetch_json(&url).await.map_err(|e| {
            log::error!("Failed to list databases at {}: {}", url, e);
            e
        })?;

        let databases = payload_adapter::convert_databases(&json)?;
        log::info!("Returning {} databases", databases.len());
        Ok(databases)
    }

    pub async fn list_tables(
        &self,
        base: &str,
        database: &str,
    ) -> Result<Vec<TableReference>, FetchError> {
        log::info!("Listing tables for database: '{}'", database);

        let url = tables_url(base, database)?;
        let json = self.fetcher.fetch_json(&url).await.map_err(|e| {
            log::error!("Failed to list tables in database '{}': {}", database, e);
            e
        })?;

        let tables = payload_adapter::convert_tables(&json)?;
        log::info!("Returning {} tables for '{}'", tables.len(), database);
        Ok(tables)
    }

    pub async fn load_table(
        &self,
        base: &str,
        database: &str,
        table: &str,
        created: Option<&str>,
    ) -> Result<TablePayload, FetchError> {
        log::info!(
            "Loading table: database='{}', table='{}', created={:?}",
            database,
            table,
            created
        );

        let url = table_url(base, database, table, created)?;
        let json = self.fetcher.fetch_json(&url).await.map_err(|e| {
            log::error!("Failed to load table '{}.{}': {}", database, table, e);
            e
        })?;

        let payload = payload_adapter::convert_table(&json)?;
        log::info!(
            "Table loaded: {} columns, {} rows",
            payload.columns.len(),
            payload.rows.len()
        );
        Ok(payload)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::CellValue;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned responses keyed by full URL and records every request.
    #[derive(Clone, Default)]
    pub(crate) struct StaticFetcher {
        responses: HashMap<String, Result<Value, FetchError>>,
        pub(crate) requests: RefCell<Vec<String>>,
    }

    impl StaticFetcher {
        pub(crate) fn with(mut self, url: &str, response: Result<Value, FetchError>) -> Self {
            self.responses.insert(url.to_string(), response);
            self
        }
    }

    impl JsonFetcher for StaticFetcher {
        async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            self.responses
                .get(url.as_str())
                .cloned()
                .unwrap_or_else(|| {
                    Err(FetchError::HttpStatusFailure {
                        status: 404,
                        reason: "Not Found".to_string(),
                    })
                })
        }
    }

    const BASE: &str = "http://127.0.0.1:8001/";

    #[test]
    fn test_url_composition() {
        assert_eq!(
            databases_url(BASE).unwrap().as_str(),
            "http://127.0.0.1:8001/.json"
        );
        assert_eq!(
            tables_url(BASE, "fixtures").unwrap().as_str(),
            "http://127.0.0.1:8001/fixtures.json"
        );
        assert_eq!(
            table_url(BASE, "fixtures", "facets", None).unwrap().as_str(),
            "http://127.0.0.1:8001/fixtures/facets.json"
        );
        assert_eq!(
            table_url(BASE, "fixtures", "facets", Some("2024-01-31"))
                .unwrap()
                .as_str(),
            "http://127.0.0.1:8001/fixtures/facets.json?created=2024-01-31"
        );
    }

    #[test]
    fn test_url_keeps_base_path_and_encodes_names() {
        let base = "http://example.com/data/";
        assert_eq!(
            databases_url(base).unwrap().as_str(),
            "http://example.com/data/.json"
        );
        assert_eq!(
            table_url(base, "my db", "a/b", None).unwrap().as_str(),
            "http://example.com/data/my%20db/a%2Fb.json"
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(
            databases_url("not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            tables_url("mailto:someone@example.com", "db"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_error_display() {
        let error = FetchError::HttpStatusFailure {
            status: 500,
            reason: "Internal Server Error".to_string(),
        };
        assert_eq!(error.to_string(), "Server responded 500 Internal Server Error");
        assert_eq!(
            FetchError::NetworkFailure("refused".to_string()).to_string(),
            "Network error: refused"
        );
    }

    #[tokio::test]
    async fn test_list_databases() {
        let fetcher = StaticFetcher::default().with(
            "http://127.0.0.1:8001/.json",
            Ok(json!({ "fixtures": {}, "content": {} })),
        );
        let client = CatalogClient::new(fetcher);

        let databases = client.list_databases(BASE).await.unwrap();
        assert_eq!(databases, vec!["fixtures", "content"]);
        assert_eq!(
            *client.fetcher.requests.borrow(),
            vec!["http://127.0.0.1:8001/.json".to_string()]
        );
    }

    #[tokio::test]
    async fn test_list_tables() {
        let fetcher = StaticFetcher::default().with(
            "http://127.0.0.1:8001/fixtures.json",
            Ok(json!({ "database": "fixtures", "tables": [
                { "name": "facets", "count": 3 },
                { "name": "people" }
            ]})),
        );
        let client = CatalogClient::new(fetcher);

        let tables = client.list_tables(BASE, "fixtures").await.unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "facets");
        assert_eq!(tables[0].count, Some(3));
        assert_eq!(tables[1].count, None);
    }

    #[tokio::test]
    async fn test_load_table_with_date_filter() {
        let fetcher = StaticFetcher::default().with(
            "http://127.0.0.1:8001/fixtures/events.json?created=2024-02-01",
            Ok(json!({
                "columns": ["id", "title"],
                "rows": [[1, "launch"], [2, null]]
            })),
        );
        let client = CatalogClient::new(fetcher);

        let payload = client
            .load_table(BASE, "fixtures", "events", Some("2024-02-01"))
            .await
            .unwrap();
        assert_eq!(payload.columns, vec!["id", "title"]);
        assert_eq!(payload.rows[0][1], CellValue::Text("launch".to_string()));
        assert!(payload.rows[1][1].is_null());
    }

    #[tokio::test]
    async fn test_failures_propagate() {
        let fetcher = StaticFetcher::default().with(
            "http://127.0.0.1:8001/fixtures.json",
            Err(FetchError::NetworkFailure("connection refused".to_string())),
        );
        let client = CatalogClient::new(fetcher);

        assert_eq!(
            client.list_tables(BASE, "fixtures").await,
            Err(FetchError::NetworkFailure("connection refused".to_string()))
        );
        assert!(matches!(
            client.list_databases(BASE).await,
            Err(FetchError::HttpStatusFailure { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_parse_failure() {
        let fetcher = StaticFetcher::default().with(
            "http://127.0.0.1:8001/fixtures.json",
            Ok(json!({ "tables": "nope" })),
        );
        let client = CatalogClient::new(fetcher);

        assert!(matches!(
            client.list_tables(BASE, "fixtures").await,
            Err(FetchError::ParseFailure(_))
        ));
    }
}
