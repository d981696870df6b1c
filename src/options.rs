//! Configuration options for reading and writing records.
//!
//! This module provides types to customize a serializer session:
//!
//! - [`Options`]: Main configuration struct
//! - [`Delimiter`]: Field delimiter of the tabular format
//! - [`HeaderTransform`]: Normalization applied to header names
//! - [`Culture`]: Number and date formatting threaded through every field conversion
//!
//! ## Examples
//!
//! ```rust
//! use dataio::{Delimiter, HeaderTransform, Options};
//!
//! let options = Options::new()
//!     .with_delimiter(Delimiter::Semicolon)
//!     .with_header_transform(HeaderTransform::Lowercase)
//!     .with_nesting_delimiter(".")
//!     .with_throw_on_failed_decode(true);
//!
//! assert!(options.throw_if_no_converter);
//! assert_eq!(options.nesting_delimiter, ".");
//! ```

use crate::csv::{AnyCsvConverter, CsvConverter};
use crate::json::{AnyJsonConverter, JsonConverter};
use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Field delimiter for the tabular format.
///
/// # Examples
///
/// ```rust
/// use dataio::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_str(), ",");
/// assert_eq!(Delimiter::Tab.as_str(), "\t");
/// assert_eq!(Delimiter::Pipe.as_byte(), b'|');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    /// Returns the string representation of this delimiter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
            Delimiter::Semicolon => ";",
        }
    }

    #[must_use]
    pub const fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
            Delimiter::Semicolon => b';',
        }
    }
}

/// Normalization applied to every header name, both when names are generated and
/// when a header row is matched on read.
#[derive(Clone, Default)]
pub enum HeaderTransform {
    #[default]
    Preserve,
    Lowercase,
    Uppercase,
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl HeaderTransform {
    /// Wraps a custom normalization function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        HeaderTransform::Custom(Arc::new(f))
    }

    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        match self {
            HeaderTransform::Preserve => name.to_string(),
            HeaderTransform::Lowercase => name.to_lowercase(),
            HeaderTransform::Uppercase => name.to_uppercase(),
            HeaderTransform::Custom(f) => f(name),
        }
    }
}

impl fmt::Debug for HeaderTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderTransform::Preserve => f.write_str("Preserve"),
            HeaderTransform::Lowercase => f.write_str("Lowercase"),
            HeaderTransform::Uppercase => f.write_str("Uppercase"),
            HeaderTransform::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Number and date formatting used by tabular field conversions.
///
/// The default is the invariant culture: `.` as decimal separator and RFC 3339 dates.
///
/// ```rust
/// use dataio::Culture;
///
/// let culture = Culture::invariant().with_decimal_separator(',');
/// assert_eq!(culture.format_number(4.5f64.to_string()), "4,5");
/// assert_eq!(culture.normalize_number(" 4,5 "), "4.5");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Culture {
    pub decimal_separator: char,
    /// `chrono` format string for date-times; RFC 3339 when `None`.
    pub datetime_format: Option<String>,
}

impl Default for Culture {
    fn default() -> Self {
        Culture::invariant()
    }
}

impl Culture {
    #[must_use]
    pub fn invariant() -> Self {
        Culture {
            decimal_separator: '.',
            datetime_format: None,
        }
    }

    #[must_use]
    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    #[must_use]
    pub fn with_datetime_format(mut self, format: &str) -> Self {
        self.datetime_format = Some(format.to_string());
        self
    }

    /// Rewrites a number printed by Rust into this culture.
    #[must_use]
    pub fn format_number(&self, printed: String) -> String {
        if self.decimal_separator == '.' {
            printed
        } else {
            printed.replace('.', &self.decimal_separator.to_string())
        }
    }

    /// Rewrites a number written in this culture into Rust's notation.
    #[must_use]
    pub fn normalize_number(&self, field: &str) -> String {
        let field = field.trim();
        if self.decimal_separator == '.' {
            field.to_string()
        } else {
            field.replace(self.decimal_separator, ".")
        }
    }
}

/// Extra converters supplied per call, appended after the factory's own.
#[derive(Clone, Default)]
pub struct Converters {
    csv: Vec<Arc<dyn AnyCsvConverter>>,
    json: Vec<Arc<dyn AnyJsonConverter>>,
}

impl Converters {
    pub fn csv(&self) -> &[Arc<dyn AnyCsvConverter>] {
        &self.csv
    }

    pub fn json(&self) -> &[Arc<dyn AnyJsonConverter>] {
        &self.json
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.csv.is_empty() && self.json.is_empty()
    }
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converters")
            .field(
                "csv",
                &self.csv.iter().map(|c| c.type_name()).collect::<Vec<_>>(),
            )
            .field(
                "json",
                &self.json.iter().map(|c| c.type_name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Configuration options for a serializer session.
///
/// # Examples
///
/// ```rust
/// use dataio::Options;
///
/// let options = Options::new();
/// assert!(options.throw_if_no_converter);
/// assert!(!options.throw_on_failed_decode);
/// assert_eq!(options.nesting_delimiter, "");
/// ```
#[derive(Clone, Debug)]
pub struct Options {
    pub delimiter: Delimiter,
    pub header_transform: HeaderTransform,
    pub nesting_delimiter: String,
    /// Fail when no converter is registered for a type; otherwise substitute its default.
    pub throw_if_no_converter: bool,
    /// Fail when a non-nullable value cannot be read; otherwise substitute its default.
    pub throw_on_failed_decode: bool,
    pub culture: Culture,
    pub pretty: bool,
    pub converters: Converters,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            delimiter: Delimiter::default(),
            header_transform: HeaderTransform::default(),
            nesting_delimiter: String::new(),
            throw_if_no_converter: true,
            throw_on_failed_decode: false,
            culture: Culture::default(),
            pretty: false,
            converters: Converters::default(),
        }
    }
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_header_transform(mut self, transform: HeaderTransform) -> Self {
        self.header_transform = transform;
        self
    }

    /// Sets the delimiter joining a member's name to its nested field names.
    ///
    /// ```rust
    /// use dataio::Options;
    ///
    /// let options = Options::new().with_nesting_delimiter(".");
    /// assert_eq!(options.nesting_delimiter, ".");
    /// ```
    #[must_use]
    pub fn with_nesting_delimiter(mut self, delimiter: &str) -> Self {
        self.nesting_delimiter = delimiter.to_string();
        self
    }

    #[must_use]
    pub fn with_throw_if_no_converter(mut self, throw: bool) -> Self {
        self.throw_if_no_converter = throw;
        self
    }

    #[must_use]
    pub fn with_throw_on_failed_decode(mut self, throw: bool) -> Self {
        self.throw_on_failed_decode = throw;
        self
    }

    #[must_use]
    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }

    /// Pretty-prints JSON output, one array element per line.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Registers an extra tabular converter for this call.
    #[must_use]
    pub fn with_csv_converter<C: CsvConverter>(mut self, converter: C) -> Self {
        self.converters.csv.push(crate::csv::erase(converter));
        self
    }

    /// Registers an extra document converter for this call.
    #[must_use]
    pub fn with_json_converter<C: JsonConverter>(mut self, converter: C) -> Self {
        self.converters.json.push(crate::json::erase(converter));
        self
    }

    /// Checks the options for values that would corrupt the output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the nesting delimiter contains a line
    /// break or a quote, or if the decimal separator is not a single visible character.
    pub fn validate(&self) -> Result<()> {
        if self
            .nesting_delimiter
            .chars()
            .any(|c| matches!(c, '\n' | '\r' | '"'))
        {
            return Err(Error::configuration(
                "nesting delimiter must not contain line breaks or quotes",
            ));
        }
        let separator = self.culture.decimal_separator;
        if separator.is_whitespace() || separator.is_ascii_digit() || separator == '-' {
            return Err(Error::configuration(&format!(
                "'{}' cannot be used as a decimal separator",
                separator
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_transform() {
        assert_eq!(HeaderTransform::Preserve.apply("Id"), "Id");
        assert_eq!(HeaderTransform::Lowercase.apply("Id"), "id");
        assert_eq!(HeaderTransform::Uppercase.apply("Id"), "ID");
        assert_eq!(
            HeaderTransform::custom(|name| format!("_{}", name)).apply("Id"),
            "_Id"
        );
    }

    #[test]
    fn test_validate_rejects_line_break_delimiter() {
        let options = Options::new().with_nesting_delimiter("\n");
        assert!(matches!(options.validate(), Err(Error::Configuration(_))));
        assert!(Options::new().with_nesting_delimiter("_").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_digit_separator() {
        let options = Options::new().with_culture(Culture::invariant().with_decimal_separator('1'));
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_culture_roundtrip_notation() {
        let culture = Culture::invariant().with_decimal_separator(',');
        let printed = culture.format_number((-12.25f64).to_string());
        assert_eq!(printed, "-12,25");
        assert_eq!(culture.normalize_number(&printed), "-12.25");
    }
}
