//! Line Filters
//!
//! A filter decides whether a tokenized line takes part in the aggregation.
//! Any `Fn(&[&str]) -> bool` closure is a filter; the built-ins cover the
//! common experiment cases:
//! - [`ColumnEquals`]: a column holds a target identifier
//! - [`ColumnMatches`]: a column matches a regex
//! - [`ExprFilter`]: a boolean expression over `c0`, `c1`, ... and `ntokens`
//! - [`AllOf`]: conjunction

use crate::error::LineParseError;
use crate::record::Record;
use evalexpr::{
    ContextWithMutableVariables, EvalexprError, HashMapContext, Node, Value, build_operator_tree,
};
use regex::Regex;

/// Accept/reject decision for one line
pub trait LineFilter: Send + Sync {
    /// `Ok(false)` rejects the line, `Err` counts it as malformed
    fn accept(&self, record: &Record<'_>) -> Result<bool, LineParseError>;
}

impl<F> LineFilter for F
where
    F: Fn(&[&str]) -> bool + Send + Sync,
{
    fn accept(&self, record: &Record<'_>) -> Result<bool, LineParseError> {
        Ok(self(record.tokens()))
    }
}

/// Accepts every line
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl LineFilter for AcceptAll {
    fn accept(&self, _record: &Record<'_>) -> Result<bool, LineParseError> {
        Ok(true)
    }
}

/// Accepts lines whose `column` equals `value`.
/// Lines too short to have the column are rejected, not errors.
#[derive(Debug, Clone)]
pub struct ColumnEquals {
    /// Column index
    pub column: usize,
    /// Required token
    pub value: String,
}

impl ColumnEquals {
    /// Match `column` against `value`
    pub fn new(column: usize, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

impl LineFilter for ColumnEquals {
    fn accept(&self, record: &Record<'_>) -> Result<bool, LineParseError> {
        Ok(record
            .tokens()
            .get(self.column)
            .is_some_and(|t| *t == self.value))
    }
}

/// Accepts lines whose `column` matches a regex
#[derive(Debug, Clone)]
pub struct ColumnMatches {
    /// Column index
    pub column: usize,
    /// Pattern the token must match
    pub regex: Regex,
}

impl ColumnMatches {
    /// Match `column` against `regex`
    pub fn new(column: usize, regex: Regex) -> Self {
        Self { column, regex }
    }
}

impl LineFilter for ColumnMatches {
    fn accept(&self, record: &Record<'_>) -> Result<bool, LineParseError> {
        Ok(record
            .tokens()
            .get(self.column)
            .is_some_and(|t| self.regex.is_match(t)))
    }
}

/// Boolean expression filter.
///
/// Each token is bound as `c<index>`: an integer when it parses as one, else a
/// float, else a string. `ntokens` holds the token count.
///
/// ```
/// # use logagg_core::{ExprFilter, LineFilter, Record};
/// let filter = ExprFilter::new("c1 == \"read\" && c2 < 100").unwrap();
/// assert!(filter.accept(&Record::parse(1, "lns3 read 42.5")).unwrap());
/// assert!(!filter.accept(&Record::parse(2, "lns3 write 42.5")).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ExprFilter {
    expression: String,
    tree: Node,
}

impl ExprFilter {
    /// Compile `expression` once up front
    pub fn new(expression: &str) -> Result<Self, EvalexprError> {
        Ok(Self {
            expression: expression.to_string(),
            tree: build_operator_tree(expression)?,
        })
    }

    /// Source text of the expression
    pub fn expression(&self) -> &str {
        &self.expression
    }

    fn bind(record: &Record<'_>) -> Result<HashMapContext, EvalexprError> {
        let mut ctx = HashMapContext::new();
        ctx.set_value("ntokens".to_string(), Value::Int(record.token_count() as i64))?;
        for (i, token) in record.tokens().iter().enumerate() {
            let value = if let Ok(int) = token.parse::<i64>() {
                Value::Int(int)
            } else if let Ok(float) = token.parse::<f64>() {
                Value::Float(float)
            } else {
                Value::String(token.to_string())
            };
            ctx.set_value(format!("c{}", i), value)?;
        }
        Ok(ctx)
    }
}

impl LineFilter for ExprFilter {
    fn accept(&self, record: &Record<'_>) -> Result<bool, LineParseError> {
        let ctx = Self::bind(record).map_err(|e| LineParseError::Filter(e.to_string()))?;
        self.tree
            .eval_boolean_with_context(&ctx)
            .map_err(|e| LineParseError::Filter(e.to_string()))
    }
}

/// Accepts a line only when every inner filter does
#[derive(Default)]
pub struct AllOf {
    filters: Vec<Box<dyn LineFilter>>,
}

impl AllOf {
    /// Empty conjunction (accepts everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter
    pub fn with(mut self, filter: impl LineFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Add an already boxed filter
    pub fn push(&mut self, filter: Box<dyn LineFilter>) {
        self.filters.push(filter);
    }

    /// Number of inner filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// True when no filter has been added
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl LineFilter for AllOf {
    fn accept(&self, record: &Record<'_>) -> Result<bool, LineParseError> {
        for filter in &self.filters {
            if !filter.accept(record)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
