//! Qualified field names for nested members.
//!
//! A [`NamingContext`] is created per nesting level. The root has no prefix; each
//! [`NamingContext::descend`] produces a child whose prefix is the qualified name of
//! the member being entered, so leaf fields of arbitrarily deep structures end up with
//! flat, delimiter-joined names:
//!
//! ```rust
//! use dataio::{HeaderTransform, NamingContext};
//!
//! let root = NamingContext::new(HeaderTransform::Preserve);
//! let position = root.descend_with("Position", ".").unwrap();
//!
//! assert_eq!(position.get("X").unwrap(), "Position.X");
//! assert_eq!(position.descend("Delta").unwrap().get("X").unwrap(), "Position.Delta.X");
//!
//! // A converter contributing one unnamed field inherits its container's name.
//! assert_eq!(position.get_default("Value").unwrap(), "Position");
//! assert_eq!(root.get_default("Value").unwrap(), "Value");
//! ```

use crate::{Error, HeaderTransform, Result};

/// A qualified field name: prefix, delimiter and local name joined together.
pub type FieldName = String;

/// Immutable helper computing field names at one nesting level.
#[derive(Clone, Debug, Default)]
pub struct NamingContext {
    prefix: String,
    delimiter: String,
    transform: HeaderTransform,
}

impl NamingContext {
    /// Creates a root context with no prefix and no delimiter.
    #[must_use]
    pub fn new(transform: HeaderTransform) -> Self {
        NamingContext {
            prefix: String::new(),
            delimiter: String::new(),
            transform,
        }
    }

    /// Creates a context with an explicit prefix and delimiter, both trimmed.
    #[must_use]
    pub fn with_prefix(prefix: &str, delimiter: &str, transform: HeaderTransform) -> Self {
        NamingContext {
            prefix: prefix.trim().to_string(),
            delimiter: delimiter.trim().to_string(),
            transform,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn transform(&self) -> &HeaderTransform {
        &self.transform
    }

    /// Qualified name of the member `name` at this level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `name` is empty or whitespace.
    pub fn get(&self, name: &str) -> Result<FieldName> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_argument(
                "name",
                "property name cannot be empty nor whitespace",
            ));
        }

        let mut qualified = String::with_capacity(self.prefix.len() + self.delimiter.len() + name.len());
        if !self.prefix.is_empty() {
            qualified.push_str(&self.prefix);
            qualified.push_str(&self.delimiter);
        }
        qualified.push_str(&self.transform.apply(name));
        Ok(qualified)
    }

    /// Name of a converter's only field: the prefix alone when nested, otherwise
    /// `get(default_name)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `default_name` is empty or whitespace,
    /// even when it would not be used.
    pub fn get_default(&self, default_name: &str) -> Result<FieldName> {
        if default_name.trim().is_empty() {
            return Err(Error::invalid_argument(
                "default_name",
                "default name cannot be empty nor whitespace",
            ));
        }

        if self.prefix.is_empty() {
            self.get(default_name)
        } else {
            Ok(self.prefix.clone())
        }
    }

    /// Context for the members of `name`, inheriting this level's delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `name` is empty or whitespace.
    pub fn descend(&self, name: &str) -> Result<NamingContext> {
        let delimiter = self.delimiter.clone();
        self.descend_with(name, &delimiter)
    }

    /// Context for the members of `name`, joined with an explicit delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `name` is empty or whitespace.
    pub fn descend_with(&self, name: &str, delimiter: &str) -> Result<NamingContext> {
        Ok(NamingContext::with_prefix(
            &self.get(name)?,
            delimiter,
            self.transform.clone(),
        ))
    }
}
