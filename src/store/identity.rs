//! Multi-strategy identifier resolution.
//!
//! Records created by different code paths carry different identity
//! encodings: client-generated `Date.now()` numbers, legacy string ids, and
//! store-native UUID keys all coexist in one collection, with no migration to
//! unify them. A caller-supplied token (an HTTP path segment or JSON field)
//! is therefore expanded into an ordered list of candidate queries, and the
//! whole collection is scanned one strategy at a time. The order is a policy,
//! not an accident: a literal `id` match always beats a numeric coercion,
//! which always beats a native-key match.

use serde_json::Value;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::StoredRecord;

/// One candidate lookup produced by a resolution strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityQuery {
    /// Match the stored `id` field verbatim as a string.
    Literal(String),
    /// Match the stored `id` field as a number.
    Numeric(f64),
    /// Match the store-native key.
    NativeKey(Uuid),
}

/// A resolved identifier: the raw token plus its candidate queries in
/// priority order.
#[derive(Debug, Clone)]
pub struct Identity {
    raw: String,
    queries: Vec<IdentityQuery>,
}

fn literal_strategy(raw: &str) -> Option<IdentityQuery> {
    Some(IdentityQuery::Literal(raw.to_string()))
}

fn numeric_strategy(raw: &str) -> Option<IdentityQuery> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite()).map(IdentityQuery::Numeric)
}

fn native_key_strategy(raw: &str) -> Option<IdentityQuery> {
    Uuid::parse_str(raw).ok().map(IdentityQuery::NativeKey)
}

impl Identity {
    /// Build the ordered candidate queries for a raw token.
    ///
    /// An empty (or all-whitespace) token fits no strategy and is rejected as
    /// malformed before any backend is consulted.
    pub fn resolve(raw: &str) -> StoreResult<Identity> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StoreError::MalformedIdentifier(raw.to_string()));
        }

        let strategies: [fn(&str) -> Option<IdentityQuery>; 3] =
            [literal_strategy, numeric_strategy, native_key_strategy];

        let queries = strategies.iter().filter_map(|s| s(trimmed)).collect();
        Ok(Identity { raw: trimmed.to_string(), queries })
    }

    /// Resolve an identifier that arrived as a JSON value (string or number).
    pub fn resolve_value(value: &Value) -> StoreResult<Identity> {
        match value {
            Value::String(s) => Identity::resolve(s),
            Value::Number(n) => Identity::resolve(&n.to_string()),
            other => Err(StoreError::MalformedIdentifier(other.to_string())),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// First record matching any strategy, strategies tried in priority order
    /// across the whole collection before falling to the next.
    pub fn locate<'a>(&self, records: &'a [StoredRecord]) -> Option<&'a StoredRecord> {
        for query in &self.queries {
            if let Some(hit) = records.iter().find(|r| query_matches(query, r)) {
                return Some(hit);
            }
        }
        None
    }
}

fn query_matches(query: &IdentityQuery, record: &StoredRecord) -> bool {
    match query {
        IdentityQuery::Literal(s) => {
            matches!(record.doc.get("id"), Some(Value::String(id)) if id == s)
        }
        IdentityQuery::Numeric(n) => match record.doc.get("id") {
            Some(Value::Number(id)) => numbers_equal(id, *n),
            _ => false,
        },
        IdentityQuery::NativeKey(key) => record.native_id == key.to_string(),
    }
}

/// Ids are whole milliseconds, well inside f64's exact-integer range, so the
/// i64 path is exact and the f64 path only covers documents that re-parsed as
/// floats.
fn numbers_equal(stored: &serde_json::Number, wanted: f64) -> bool {
    if let (Some(a), Some(b)) = (stored.as_i64(), (wanted.fract() == 0.0).then_some(wanted as i64))
    {
        return a == b;
    }
    stored.as_f64() == Some(wanted)
}
