//! In-memory indexing service for tests.
//!
//! [`FakeSubgraph`] evaluates `where` inputs, sort keys and skip/first windows
//! of [`SubgraphRequest`]s over rows inserted in the wire format, so the
//! whole query path including normalization is exercised without a network.
//!
//! Time-travel (`block`) is not simulated, rows are always the latest state.

pub mod fixtures;

use std::{
    cmp::Ordering,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
    },
};

use dashmap::DashMap;
use serde_json::{Map, Value};

use crate::{
    entity::EntityKind,
    error::SubgraphError,
    query::{OrderDirection, OrderKey, SubgraphClient, SubgraphRequest},
    types::BigNumber,
};

#[derive(Default)]
pub struct FakeSubgraph {
    collections: DashMap<&'static str, Vec<Value>>,
    requests: AtomicUsize,
    last_request: Mutex<Option<SubgraphRequest>>,
    failure: Mutex<Option<String>>,
}

impl FakeSubgraph {
    pub fn new() -> Self { Self::default() }

    pub fn with_rows(self, kind: EntityKind, rows: impl IntoIterator<Item = Value>) -> Self {
        self.collections.entry(kind.collection()).or_default().extend(rows);
        self
    }

    pub fn insert(&self, kind: EntityKind, row: Value) {
        self.collections.entry(kind.collection()).or_default().push(row);
    }

    /// Number of requests executed so far, failed ones included.
    pub fn requests(&self) -> usize { self.requests.load(AtomicOrdering::SeqCst) }

    pub fn last_request(&self) -> Option<SubgraphRequest> {
        self.last_request.lock().unwrap().clone()
    }

    /// Makes every following request fail with a transport error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    pub fn recover(&self) { *self.failure.lock().unwrap() = None; }

    fn query(&self, request: &SubgraphRequest) -> Vec<Value> {
        let mut rows: Vec<Value> = self
            .collections
            .get(request.collection)
            .map(|rows| rows.iter().filter(|row| matches(row, &request.filter)).cloned().collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| compare_rows(a, b, &request.order));
        rows.into_iter().skip(request.skip as usize).take(request.first as usize).collect()
    }
}

impl SubgraphClient for FakeSubgraph {
    async fn execute(&self, request: &SubgraphRequest) -> Result<Value, SubgraphError> {
        self.requests.fetch_add(1, AtomicOrdering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(SubgraphError::transport(std::io::Error::other(message)));
        }
        let mut data = Map::new();
        data.insert(request.collection.to_string(), Value::Array(self.query(request)));
        Ok(Value::Object(data))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Eq,
    Not,
    In,
    NotIn,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Splits `where` key into field and operator, longest suffix first.
fn parse_key(key: &str) -> (&str, Op) {
    const SUFFIXES: [(&str, Op); 7] = [
        ("_not_in", Op::NotIn),
        ("_in", Op::In),
        ("_not", Op::Not),
        ("_gte", Op::Gte),
        ("_lte", Op::Lte),
        ("_gt", Op::Gt),
        ("_lt", Op::Lt),
    ];
    SUFFIXES
        .iter()
        .find_map(|(suffix, op)| key.strip_suffix(suffix).map(|field| (field, *op)))
        .unwrap_or((key, Op::Eq))
}

fn matches(row: &Value, filter: &Map<String, Value>) -> bool {
    filter.iter().all(|(key, expected)| {
        let (field, op) = parse_key(key);
        let actual = field_value(row, field);
        let any_equal = || expected.as_array().is_some_and(|values| values.iter().any(|v| equal(actual, v)));
        match op {
            Op::Eq => equal(actual, expected),
            Op::Not => !equal(actual, expected),
            Op::In => any_equal(),
            Op::NotIn => !any_equal(),
            Op::Gt => compare(field, actual, expected) == Some(Ordering::Greater),
            Op::Gte => matches!(compare(field, actual, expected), Some(Ordering::Greater | Ordering::Equal)),
            Op::Lt => compare(field, actual, expected) == Some(Ordering::Less),
            Op::Lte => matches!(compare(field, actual, expected), Some(Ordering::Less | Ordering::Equal)),
        }
    })
}

/// Field of the row, nested references resolved to their ID.
fn field_value<'a>(row: &'a Value, field: &str) -> &'a Value {
    match row.get(field) {
        Some(Value::Object(nested)) => nested.get("id").unwrap_or(&Value::Null),
        Some(value) => value,
        None => &Value::Null,
    }
}

fn equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        // Bytes are compared by value, whatever the hex case
        (Value::String(a), Value::String(b)) if a.starts_with("0x") && b.starts_with("0x") => {
            a.eq_ignore_ascii_case(b)
        },
        (Value::String(a), Value::Number(b)) | (Value::Number(b), Value::String(a)) => {
            *a == b.to_string()
        },
        _ => actual == expected,
    }
}

/// IDs compare as strings, integers stored as strings numerically.
fn compare(field: &str, a: &Value, b: &Value) -> Option<Ordering> {
    if field != "id" {
        if let (Some(a), Some(b)) = (as_number(a), as_number(b)) {
            return Some(a.cmp(&b));
        }
    }
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<BigNumber> {
    match value {
        Value::String(s) => BigNumber::from_dec_str(s).ok(),
        Value::Number(n) => BigNumber::from_dec_str(&n.to_string()).ok(),
        _ => None,
    }
}

fn compare_rows(a: &Value, b: &Value, order: &[OrderKey]) -> Ordering {
    order
        .iter()
        .map(|key| {
            let (a, b) = (field_value(a, key.field), field_value(b, key.field));
            // Nulls first
            let ordering = match (a.is_null(), b.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => compare(key.field, a, b).unwrap_or(Ordering::Equal),
            };
            match key.direction {
                OrderDirection::Asc => ordering,
                OrderDirection::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
