//! Line tokenizer

use crate::error::LineParseError;

/// Split a line into its non-empty whitespace-delimited tokens.
///
/// ```
/// # use logagg_core::tokenize;
/// assert_eq!(tokenize("  a\t1   10 \r"), vec!["a", "1", "10"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// One input line, tokenized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    /// 1-based line number within its file
    pub line_number: usize,
    tokens: Vec<&'a str>,
}

impl<'a> Record<'a> {
    /// Tokenize `line`
    pub fn parse(line_number: usize, line: &'a str) -> Self {
        Self {
            line_number,
            tokens: tokenize(line),
        }
    }

    /// All tokens in order
    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens
    }

    /// Number of tokens
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// True for a line with no tokens at all
    pub fn is_blank(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `column`, or `MissingColumn`
    pub fn column(&self, column: usize) -> Result<&'a str, LineParseError> {
        self.tokens
            .get(column)
            .copied()
            .ok_or(LineParseError::MissingColumn {
                column,
                len: self.tokens.len(),
            })
    }

    /// Token at `column` parsed as a finite float
    pub fn numeric_column(&self, column: usize) -> Result<f64, LineParseError> {
        let token = self.column(column)?;
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(LineParseError::NotNumeric {
                column,
                token: token.to_string(),
            }),
        }
    }
}
