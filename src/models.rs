// Core data structures for the boatsync service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field carrying the remote-assigned identifier
pub const BOAT_ID_FIELD: &str = "BoatID";

/// Remote-assigned boat identifier
///
/// The catalog uses either strings or numbers; the two are kept apart so
/// `5` and `"5"` never collapse into one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoatId {
    Number(String),
    Text(String),
}

impl BoatId {
    /// Extract an identifier from a JSON value
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.to_string())),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for BoatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A boat listing as returned by the catalog
///
/// Only the identifier (and a couple of numeric fields for stats) are
/// interpreted; everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Boat(Map<String, Value>);

impl Boat {
    /// Wrap a raw JSON object
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Identifier, if present and usable
    pub fn id(&self) -> Option<BoatId> {
        self.0.get(BOAT_ID_FIELD).and_then(BoatId::from_value)
    }

    /// Raw field access
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Asking price, ignoring missing, zero and non-numeric values
    pub fn sell_price(&self) -> Option<f64> {
        self.get("SellPrice")
            .and_then(Value::as_f64)
            .filter(|p| *p != 0.0)
    }

    /// Build year, ignoring non-integer values
    pub fn year_built(&self) -> Option<i64> {
        self.get("YearBuilt").and_then(Value::as_i64)
    }

    /// Whether the record carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the underlying fields
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Boat {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// One page of catalog results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Items on this page
    #[serde(rename = "Results", default)]
    pub items: Vec<Boat>,

    /// Total reported by the catalog at the time of this request
    #[serde(rename = "TotalResults", default)]
    pub total_count: usize,
}

/// Search filters forwarded to the catalog as query parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_from: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_to: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_from: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_to: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_to: Option<f64>,
}

impl CatalogFilters {
    /// Whether no filter is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check that every range has `from <= to`
    pub fn validate(&self) -> Result<(), String> {
        fn check<T: PartialOrd>(name: &str, from: Option<T>, to: Option<T>) -> Result<(), String> {
            match (from, to) {
                (Some(from), Some(to)) if from > to => {
                    Err(format!("{name} range is inverted"))
                }
                _ => Ok(()),
            }
        }

        check("price", self.price_from, self.price_to)?;
        check("year", self.year_from, self.year_to)?;
        check("length", self.length_from, self.length_to)?;
        Ok(())
    }
}

/// Point-in-time view of the sync state
///
/// Field names match what the dashboard frontend reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Items fetched so far by the current (or last) run
    #[serde(rename = "total_fetched")]
    pub fetched_count: usize,

    /// Epoch total of the current (or last) run
    #[serde(rename = "total_estimated")]
    pub estimated_total: usize,

    /// Whether a run is active
    pub is_loading: bool,

    /// Number of boats in the cache
    #[serde(rename = "boat_count")]
    pub cache_size: usize,

    /// Last time the state changed
    pub last_updated: Option<DateTime<Utc>>,
}
