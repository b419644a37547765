//! Typed cell values produced by column accessors.
//!
//! Accessors read an opaque row record and return a [`CellValue`]; the engine
//! sorts and renders rows only through these values, never through the row
//! record itself.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// A single cell value read from a row record by a column accessor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing or null value. Sorts after all defined values.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// True for values that sort after every defined value regardless of
    /// sort direction: `Null` and non-finite floats.
    pub fn is_undefined(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value, if it has one.
    fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Type class for cross-type ordering: Null < Bool < numeric < Text.
    /// Int and Float share a class so they compare numerically.
    fn type_rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Text(_) => 3,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Default comparison between two cell values. A total order.
///
/// Values of different type classes order by the class (Null < Bool <
/// numeric < Text); mixing classes within one comparison would be cyclic
/// across a column, and `sort_by` requires consistency. Within a class:
/// numerics compare numerically (so `Int(2)` < `Float(2.5)`), booleans
/// false-before-true, text lexicographically. Callers route undefined values
/// (see [`CellValue::is_undefined`]) around this function, so NaN never
/// reaches the numeric comparison during a sort.
pub fn compare(a: &CellValue, b: &CellValue) -> Ordering {
    match a.type_rank().cmp(&b.type_rank()) {
        Ordering::Equal => match (a, b) {
            (CellValue::Int(x), CellValue::Int(y)) => x.cmp(y),
            (CellValue::Bool(x), CellValue::Bool(y)) => x.cmp(y),
            (CellValue::Text(x), CellValue::Text(y)) => x.cmp(y),
            _ => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            },
        },
        rank => rank,
    }
}
