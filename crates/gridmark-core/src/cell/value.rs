//! Cell value types

use std::fmt;
use std::sync::Arc;

/// A value read from a spreadsheet range
///
/// Values API responses are untyped text, so most cells arrive as
/// [`CellValue::String`]; readers that infer types may produce numbers and
/// booleans. [`CellValue::Empty`] stands for a cell the source did not return.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Nothing returned for this position
    #[default]
    Empty,
    Boolean(bool),
    Number(f64),
    /// Text as returned, possibly numeric such as "3.0"
    String(SharedString),
}

impl CellValue {
    pub fn string(s: impl AsRef<str>) -> Self {
        CellValue::String(SharedString::new(s))
    }

    /// Whether the source returned nothing here
    ///
    /// An empty string is a present value and is not absent.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Whether the cell shows nothing: absent, or text with no characters
    ///
    /// A values API leaves such cells out at the end of a row.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.as_str().is_empty(),
            CellValue::Boolean(_) | CellValue::Number(_) => false,
        }
    }

    /// Text as a spreadsheet would display it
    ///
    /// Integral numbers print without a fractional part and absent cells
    /// print as the empty string.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                (*n as i64).to_string()
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::String(s) => s.as_str().to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::string(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::string(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

/// Immutable text shared between grid copies without reallocating
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SharedString(Arc<str>);

impl SharedString {
    pub fn new(s: impl AsRef<str>) -> Self {
        SharedString(Arc::from(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
