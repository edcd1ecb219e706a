use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::{AuthUser, Direction, Gateway, Operation, Query, Session};
use crate::error::AppError;
use crate::models::RecordId;

type Row = Map<String, Value>;

/// Foreign key `column` on `from` pointing at `to.id`.
#[derive(Debug, Clone)]
struct Relation {
    from: String,
    column: String,
    to: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Column {
    All,
    Plain(String),
    Embed { table: String, columns: Vec<String> },
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Row>>,
    relations: Vec<Relation>,
    failures: HashMap<(String, Operation), String>,
    users: HashMap<String, (AuthUser, String)>,
    next_id: RecordId,
    last_stamp: Option<DateTime<Utc>>,
    calls: usize,
    tokens: usize,
}

impl MemoryState {
    fn begin(&mut self, table: &str, operation: Operation) -> Result<(), AppError> {
        self.calls += 1;
        match self.failures.get(&(table.to_string(), operation)) {
            Some(message) => Err(AppError::gateway(message.clone())),
            None => Ok(()),
        }
    }

    fn stamp(&mut self) -> String {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn push(&mut self, table: &str, row: Value) -> Result<RecordId, AppError> {
        let Value::Object(mut row) = row else {
            return Err(AppError::gateway("Row must be a JSON object"));
        };
        self.next_id += 1;
        let id = self.next_id;
        row.insert("id".to_string(), Value::from(id));
        row.insert("created_at".to_string(), Value::from(self.stamp()));
        self.tables.entry(table.to_string()).or_default().push(row);
        Ok(id)
    }

    fn project(&self, table: &str, row: &Row, columns: &[Column]) -> Row {
        let mut out = Row::new();
        for column in columns {
            match column {
                Column::All => out.extend(row.iter().map(|(k, v)| (k.clone(), v.clone()))),
                Column::Plain(name) => {
                    out.insert(name.clone(), row.get(name).cloned().unwrap_or(Value::Null));
                }
                Column::Embed { table: target, columns } => {
                    let embedded = self.embed(table, row, target, columns);
                    out.insert(target.clone(), embedded);
                }
            }
        }
        out
    }

    fn embed(&self, table: &str, row: &Row, target: &str, columns: &[String]) -> Value {
        let Some(relation) = self
            .relations
            .iter()
            .find(|r| r.from == table && r.to == target)
        else {
            return Value::Null;
        };
        let Some(key) = row.get(&relation.column) else {
            return Value::Null;
        };
        let found = self
            .tables
            .get(target)
            .and_then(|rows| rows.iter().find(|candidate| candidate.get("id") == Some(key)));
        match found {
            Some(parent) => {
                let columns: Vec<Column> = columns.iter().map(|c| parse_column(c)).collect();
                Value::Object(self.project(target, parent, &columns))
            }
            None => Value::Null,
        }
    }
}

/// In-process stand-in for the hosted backend, used by tests.
///
/// Supports the same nested-select syntax as the real service for the
/// relations registered with [`MemoryGateway::relate`], and can be told
/// to fail a given table operation with a backend message.
#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store with the academic schema's foreign keys registered.
    pub fn academic() -> Self {
        Self::new()
            .relate("module_class", "kelas_id", "Kelas")
            .relate("module_class", "matakuliah_id", "Mata_Kuliah")
            .relate("mahasiswa_module", "mahasiswa_id", "Mahasiswa")
            .relate("mahasiswa_module", "matakuliah_id", "Mata_Kuliah")
    }

    pub fn relate(self, from: &str, column: &str, to: &str) -> Self {
        self.state().relations.push(Relation {
            from: from.to_string(),
            column: column.to_string(),
            to: to.to_string(),
        });
        self
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts a row directly, without counting a call. Returns its id.
    pub fn seed(&self, table: &str, row: Value) -> RecordId {
        self.state()
            .push(table, row)
            .unwrap_or_else(|e| panic!("seed row for {} must be an object: {}", table, e))
    }

    /// Raw rows of a table, oldest first.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state()
            .tables
            .get(table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    pub fn fail(&self, table: &str, operation: Operation, message: &str) {
        self.state()
            .failures
            .insert((table.to_string(), operation), message.to_string());
    }

    /// Number of table operations received so far.
    pub fn calls(&self) -> usize {
        self.state().calls
    }
}

fn split_top_level(columns: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in columns.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => parts.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    parts.push(current);
    parts
        .into_iter()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_column(token: &str) -> Column {
    let token = token.trim();
    if token == "*" {
        return Column::All;
    }
    match (token.find('('), token.ends_with(')')) {
        (Some(open), true) => Column::Embed {
            table: token[..open].trim().to_string(),
            columns: split_top_level(&token[open + 1..token.len() - 1]),
        },
        _ => Column::Plain(token.to_string()),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Null) | None, Some(Value::Null) | None) => Ordering::Equal,
        (Some(Value::Null) | None, _) => Ordering::Greater,
        (_, Some(Value::Null) | None) => Ordering::Less,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, AppError> {
        let mut state = self.state();
        state.begin(table, Operation::Select)?;

        let mut rows: Vec<Row> = state
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query
                            .filters
                            .iter()
                            .all(|(column, value)| row.get(column) == Some(value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(&order.column), b.get(&order.column))
                    .then_with(|| compare(a.get("id"), b.get("id")));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        let columns: Vec<Column> = split_top_level(&query.columns)
            .iter()
            .map(|token| parse_column(token))
            .collect();
        Ok(rows
            .iter()
            .map(|row| Value::Object(state.project(table, row, &columns)))
            .collect())
    }

    async fn count(&self, table: &str) -> Result<u64, AppError> {
        let mut state = self.state();
        state.begin(table, Operation::Count)?;
        Ok(state.tables.get(table).map_or(0, |rows| rows.len() as u64))
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), AppError> {
        let mut state = self.state();
        state.begin(table, Operation::Insert)?;
        state.push(table, row)?;
        Ok(())
    }

    async fn update(&self, table: &str, patch: Value, id: RecordId) -> Result<(), AppError> {
        let mut state = self.state();
        state.begin(table, Operation::Update)?;
        let Value::Object(patch) = patch else {
            return Err(AppError::gateway("Patch must be a JSON object"));
        };
        let key = Value::from(id);
        if let Some(row) = state
            .tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| row.get("id") == Some(&key)))
        {
            for (column, value) in patch {
                if column != "id" && column != "created_at" {
                    row.insert(column, value);
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: RecordId) -> Result<(), AppError> {
        let mut state = self.state();
        state.begin(table, Operation::Delete)?;
        let key = Value::from(id);
        if let Some(rows) = state.tables.get_mut(table) {
            rows.retain(|row| row.get("id") != Some(&key));
        }
        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let mut state = self.state();
        if state.users.contains_key(email) {
            return Err(AppError::gateway("User already registered"));
        }
        let user = AuthUser {
            id: format!("user-{}", state.users.len() + 1),
            email: Some(email.to_string()),
        };
        state
            .users
            .insert(email.to_string(), (user.clone(), password.to_string()));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let mut state = self.state();
        let user = match state.users.get(email) {
            Some((user, stored)) if stored == password => user.clone(),
            _ => return Err(AppError::gateway("Invalid login credentials")),
        };
        state.tokens += 1;
        Ok(Session {
            access_token: format!("memory-token-{}", state.tokens),
            refresh_token: None,
            expires_in: Some(3600),
            user,
        })
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), AppError> {
        Ok(())
    }
}
