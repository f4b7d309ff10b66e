//! Key and value extraction
//!
//! [`LineDecoder`] is the one place positional column access happens: it turns
//! a [`Record`] into a [`DecodedLine`] or a [`LineParseError`].

use crate::error::{AggregateError, LineParseError};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Grouping key: numeric or textual, caller's choice.
///
/// Ordering puts every number before every text key; numbers use IEEE total
/// order, text compares lexicographically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupKey {
    /// Numeric key
    Number(f64),
    /// Text key, kept verbatim
    Text(String),
}

impl GroupKey {
    /// Numeric key, with `-0.0` folded into `0.0`
    pub fn number(value: f64) -> Self {
        GroupKey::Number(value + 0.0)
    }

    /// Text key
    pub fn text(value: impl Into<String>) -> Self {
        GroupKey::Text(value.into())
    }

    /// Parse a key the way the CLI receives it: numeric when asked and possible
    pub fn parse(raw: &str, numeric: bool) -> Self {
        match raw.parse::<f64>() {
            Ok(value) if numeric && value.is_finite() => GroupKey::number(value),
            _ => GroupKey::text(raw),
        }
    }

    /// The numeric value, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GroupKey::Number(n) => Some(*n),
            GroupKey::Text(_) => None,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Number(n) => write!(f, "{}", n),
            GroupKey::Text(s) => f.write_str(s),
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
            (GroupKey::Number(_), GroupKey::Text(_)) => Ordering::Less,
            (GroupKey::Text(_), GroupKey::Number(_)) => Ordering::Greater,
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            GroupKey::Number(n) => {
                0u8.hash(state);
                n.to_bits().hash(state);
            }
            GroupKey::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl From<f64> for GroupKey {
    fn from(value: f64) -> Self {
        GroupKey::number(value)
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        GroupKey::text(value)
    }
}

/// Maps an extracted key to its final group (e.g. time bucketing)
pub trait KeyTransform: Send + Sync {
    /// Map `key`, or fail the line
    fn apply(&self, key: GroupKey) -> Result<GroupKey, LineParseError>;
}

impl<F> KeyTransform for F
where
    F: Fn(GroupKey) -> Result<GroupKey, LineParseError> + Send + Sync,
{
    fn apply(&self, key: GroupKey) -> Result<GroupKey, LineParseError> {
        self(key)
    }
}

/// Quantize a numeric key into fixed-width buckets: `floor(key / width)`.
///
/// For integral timestamps this is integer division, e.g. a width of 1000
/// turns millisecond timestamps into per-second buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBucket {
    width: f64,
}

impl TimeBucket {
    /// Bucket width must be finite and positive
    pub fn new(width: f64) -> Result<Self, AggregateError> {
        if width.is_finite() && width > 0.0 {
            Ok(Self { width })
        } else {
            Err(AggregateError::InvalidConfig(format!(
                "bucket width must be positive, got {}",
                width
            )))
        }
    }

    /// Configured width
    pub fn width(&self) -> f64 {
        self.width
    }
}

impl KeyTransform for TimeBucket {
    fn apply(&self, key: GroupKey) -> Result<GroupKey, LineParseError> {
        match key {
            GroupKey::Number(n) => Ok(GroupKey::number((n / self.width).floor())),
            GroupKey::Text(s) => Err(LineParseError::Transform(format!(
                "time bucket needs a numeric key, got {:?}",
                s
            ))),
        }
    }
}

/// Where and how to read the group key
pub struct KeySpec {
    /// Column index
    pub column: usize,
    /// Parse the key as a number
    pub numeric: bool,
    /// Applied to the parsed key
    pub transform: Option<Box<dyn KeyTransform>>,
}

impl KeySpec {
    /// Raw string key from `column`
    pub fn text(column: usize) -> Self {
        Self {
            column,
            numeric: false,
            transform: None,
        }
    }

    /// Numeric key from `column`
    pub fn numeric(column: usize) -> Self {
        Self {
            column,
            numeric: true,
            transform: None,
        }
    }

    /// Attach a key transform
    pub fn with_transform(mut self, transform: impl KeyTransform + 'static) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Extract the key from `record`
    pub fn extract(&self, record: &Record<'_>) -> Result<GroupKey, LineParseError> {
        let key = if self.numeric {
            GroupKey::number(record.numeric_column(self.column)?)
        } else {
            GroupKey::text(record.column(self.column)?)
        };

        match &self.transform {
            Some(transform) => transform.apply(key),
            None => Ok(key),
        }
    }
}

impl fmt::Debug for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySpec")
            .field("column", &self.column)
            .field("numeric", &self.numeric)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// Where to read the numeric sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSpec {
    /// Column index
    pub column: usize,
}

impl ValueSpec {
    /// Sample from `column`
    pub fn new(column: usize) -> Self {
        Self { column }
    }

    /// Parse the sample from `record`
    pub fn extract(&self, record: &Record<'_>) -> Result<f64, LineParseError> {
        record.numeric_column(self.column)
    }
}

/// A successfully decoded line
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLine {
    /// Group key
    pub key: GroupKey,
    /// Sample value
    pub value: f64,
}

/// Validated line decoding: key and value extraction in one step
#[derive(Debug)]
pub struct LineDecoder {
    /// Key extraction
    pub key: KeySpec,
    /// Value extraction
    pub value: ValueSpec,
}

impl LineDecoder {
    /// Combine a key and a value spec
    pub fn new(key: KeySpec, value: ValueSpec) -> Self {
        Self { key, value }
    }

    /// Decode `record`; the value is checked first so a missing value column
    /// is reported even when the key transform would also fail
    pub fn decode(&self, record: &Record<'_>) -> Result<DecodedLine, LineParseError> {
        let value = self.value.extract(record)?;
        let key = self.key.extract(record)?;
        Ok(DecodedLine { key, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ordering() {
        let mut keys = vec![
            GroupKey::text("b"),
            GroupKey::number(10.0),
            GroupKey::text("a"),
            GroupKey::number(-2.0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                GroupKey::number(-2.0),
                GroupKey::number(10.0),
                GroupKey::text("a"),
                GroupKey::text("b"),
            ]
        );
    }

    #[test]
    fn test_negative_zero_folds() {
        assert_eq!(GroupKey::number(-0.0), GroupKey::number(0.0));
        assert_eq!(GroupKey::parse("-0", true), GroupKey::number(0.0));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(GroupKey::number(3.0).to_string(), "3");
        assert_eq!(GroupKey::number(2.5).to_string(), "2.5");
        assert_eq!(GroupKey::text("lns-1").to_string(), "lns-1");
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(GroupKey::parse("12", true), GroupKey::number(12.0));
        assert_eq!(GroupKey::parse("12", false), GroupKey::text("12"));
        assert_eq!(GroupKey::parse("host", true), GroupKey::text("host"));
    }

    #[test]
    fn test_text_key_extraction() {
        let record = Record::parse(1, "a 1 10");
        assert_eq!(KeySpec::text(0).extract(&record), Ok(GroupKey::text("a")));
    }

    #[test]
    fn test_numeric_key_extraction() {
        let record = Record::parse(1, "a 7 10");
        assert_eq!(KeySpec::numeric(1).extract(&record), Ok(GroupKey::number(7.0)));
        assert!(matches!(
            KeySpec::numeric(0).extract(&record),
            Err(LineParseError::NotNumeric { column: 0, .. })
        ));
    }

    #[test]
    fn test_time_bucket() {
        let bucket = TimeBucket::new(1000.0).unwrap();
        assert_eq!(bucket.apply(GroupKey::number(2999.0)), Ok(GroupKey::number(2.0)));
        assert_eq!(bucket.apply(GroupKey::number(3000.0)), Ok(GroupKey::number(3.0)));
        assert!(bucket.apply(GroupKey::text("x")).is_err());
        assert!(TimeBucket::new(0.0).is_err());
        assert!(TimeBucket::new(f64::NAN).is_err());
    }

    #[test]
    fn test_closure_transform() {
        let spec = KeySpec::text(0).with_transform(
            |key: GroupKey| -> Result<GroupKey, LineParseError> {
                Ok(GroupKey::text(key.to_string().to_uppercase()))
            },
        );
        let record = Record::parse(1, "read 5");
        assert_eq!(spec.extract(&record), Ok(GroupKey::text("READ")));
    }

    #[test]
    fn test_decoder() {
        let decoder = LineDecoder::new(KeySpec::text(0), ValueSpec::new(2));
        assert_eq!(
            decoder.decode(&Record::parse(1, "a 1 10")),
            Ok(DecodedLine {
                key: GroupKey::text("a"),
                value: 10.0
            })
        );
        assert_eq!(
            decoder.decode(&Record::parse(2, "a 1")),
            Err(LineParseError::MissingColumn { column: 2, len: 2 })
        );
        assert!(decoder.decode(&Record::parse(3, "a 1 slow")).is_err());
    }
}
