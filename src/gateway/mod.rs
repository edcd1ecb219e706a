pub mod dto;
pub mod memory;

use async_trait::async_trait;
use reqwest::header::{CONTENT_RANGE, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::AppError;
use crate::models::RecordId;
use crate::state::SessionContext;

pub use dto::{AuthUser, Session};
pub use memory::MemoryGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// Table-scoped read: columns, equality filters, ordering and limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub columns: String,
    pub filters: Vec<(String, Value)>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }
}

impl Query {
    pub fn columns(columns: &str) -> Self {
        Self {
            columns: columns.to_string(),
            ..Self::default()
        }
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            direction,
        });
        self
    }

    /// Newest first, the order every list page uses.
    pub fn newest_first(self) -> Self {
        self.order("created_at", Direction::Descending)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Count,
    Insert,
    Update,
    Delete,
}

/// The hosted backend: table-scoped CRUD plus the auth sub-API.
///
/// Calls are independent and non-transactional; concurrent writers
/// simply overwrite each other.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, AppError>;
    async fn count(&self, table: &str) -> Result<u64, AppError>;
    async fn insert(&self, table: &str, row: Value) -> Result<(), AppError>;
    async fn update(&self, table: &str, patch: Value, id: RecordId) -> Result<(), AppError>;
    async fn delete(&self, table: &str, id: RecordId) -> Result<(), AppError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError>;
    async fn sign_out(&self, session: &Session) -> Result<(), AppError>;
}

/// PostgREST + GoTrue over HTTPS.
pub struct SupabaseHttpClient {
    client: Client,
    config: GatewayConfig,
    session: SessionContext,
}

impl SupabaseHttpClient {
    pub fn new(config: GatewayConfig, session: SessionContext) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            config,
            session,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        let raw = format!("{}/{}", self.config.url, path);
        Url::parse(&raw).map_err(|e| AppError::Config(format!("Invalid gateway url {}: {}", raw, e)))
    }

    fn table_url(&self, table: &str) -> Result<Url, AppError> {
        self.endpoint(&format!("rest/v1/{}", table))
    }

    /// Signed-in requests carry the user's token, everything else the anon key.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .session
            .access_token()
            .unwrap_or_else(|| self.config.anon_key.clone());
        request.header("apikey", &self.config.anon_key).bearer_auth(token)
    }

    async fn send(&self, table: &str, operation: Operation, request: RequestBuilder) -> Result<Response, AppError> {
        debug!(table, ?operation, "gateway request");
        dispatch(self.authorize(request)).await.inspect_err(|e| {
            warn!(table, ?operation, "gateway error: {}", e);
        })
    }

    /// Auth endpoints authenticate with the anon key, or the caller's own bearer.
    async fn send_auth(&self, endpoint: &str, request: RequestBuilder) -> Result<Response, AppError> {
        debug!(endpoint, "auth request");
        dispatch(request.header("apikey", &self.config.anon_key))
            .await
            .inspect_err(|e| {
                warn!(endpoint, "auth error: {}", e);
            })
    }
}

async fn dispatch(request: RequestBuilder) -> Result<Response, AppError> {
    match request.send().await {
        Ok(response) => check(response).await,
        Err(err) => Err(AppError::from(err)),
    }
}

async fn check(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<dto::ErrorBody>(&body)
        .ok()
        .and_then(dto::ErrorBody::into_message)
        .unwrap_or_else(|| format!("Request failed with status {}", status));
    Err(AppError::gateway(message))
}

fn filter_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("eq.{}", s),
        other => format!("eq.{}", other),
    }
}

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`.
fn parse_content_range(header: Option<&HeaderValue>) -> Result<u64, AppError> {
    header
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.rsplit('/').next())
        .and_then(|total| total.parse::<u64>().ok())
        .ok_or_else(|| AppError::gateway("Count response is missing Content-Range"))
}

#[async_trait]
impl Gateway for SupabaseHttpClient {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, AppError> {
        let mut url = self.table_url(table)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", &query.columns);
            for (column, value) in &query.filters {
                pairs.append_pair(column, &filter_value(value));
            }
            if let Some(order) = &query.order {
                let direction = match order.direction {
                    Direction::Ascending => "asc",
                    Direction::Descending => "desc",
                };
                pairs.append_pair("order", &format!("{}.{}", order.column, direction));
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }

        let response = self.send(table, Operation::Select, self.client.get(url)).await?;
        Ok(response.json::<Vec<Value>>().await?)
    }

    async fn count(&self, table: &str) -> Result<u64, AppError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("select", "*");
        let request = self.client.head(url).header("Prefer", "count=exact");
        let response = self.send(table, Operation::Count, request).await?;
        parse_content_range(response.headers().get(CONTENT_RANGE))
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), AppError> {
        let url = self.table_url(table)?;
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(&Value::Array(vec![row]));
        self.send(table, Operation::Insert, request).await?;
        Ok(())
    }

    async fn update(&self, table: &str, patch: Value, id: RecordId) -> Result<(), AppError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        let request = self
            .client
            .patch(url)
            .header("Prefer", "return=minimal")
            .json(&patch);
        self.send(table, Operation::Update, request).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, id: RecordId) -> Result<(), AppError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        self.send(table, Operation::Delete, self.client.delete(url)).await?;
        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let url = self.endpoint("auth/v1/signup")?;
        let request = self.client.post(url).json(&dto::Credentials { email, password });
        let response = self.send_auth("signup", request).await?;
        let body = response.json::<dto::SignUpResponse>().await?;
        Ok(body.into_user())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let request = self.client.post(url).json(&dto::Credentials { email, password });
        let response = self.send_auth("token", request).await?;
        Ok(response.json::<Session>().await?)
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AppError> {
        let url = self.endpoint("auth/v1/logout")?;
        let request = self.client.post(url).bearer_auth(&session.access_token);
        self.send_auth("logout", request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
        }
    }

    #[test]
    fn test_content_range_total_is_parsed() {
        let header = HeaderValue::from_static("0-24/3573");
        assert_eq!(parse_content_range(Some(&header)).expect("total"), 3573);

        let empty = HeaderValue::from_static("*/0");
        assert_eq!(parse_content_range(Some(&empty)).expect("total"), 0);

        assert!(parse_content_range(None).is_err());
    }

    #[test]
    fn test_filter_values_use_eq_operator() {
        assert_eq!(filter_value(&Value::from(5)), "eq.5");
        assert_eq!(filter_value(&Value::from("Ganjil")), "eq.Ganjil");
    }

    #[test]
    fn test_table_url_is_rooted_at_rest_api() {
        let client = SupabaseHttpClient::new(
            GatewayConfig::new("https://abc.supabase.co/", "anon"),
            SessionContext::default(),
        )
        .expect("client");
        let url = client.table_url("Mahasiswa").expect("url");
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/Mahasiswa");
    }

    #[tokio::test]
    async fn test_auth_calls_are_logged() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        // Nothing listens on the discard port, so the request fails at connect.
        let client = SupabaseHttpClient::new(
            GatewayConfig::new("http://127.0.0.1:9", "anon"),
            SessionContext::default(),
        )
        .expect("client");
        assert!(client.sign_in("dewi@kampus.ac.id", "rahasia123").await.is_err());

        let logs = captured.text();
        assert!(logs.contains("auth request"), "{}", logs);
        assert!(logs.contains("auth error"), "{}", logs);
        assert!(logs.contains("token"), "{}", logs);
    }
}
