//! Error types for record reading and writing.
//!
//! ## Error Categories
//!
//! - **Configuration errors**: unsupported formats and malformed options. Always fatal.
//! - **Converter errors**: no converter for a type, failed decodes, failed encodes and
//!   values of the wrong runtime type.
//! - **Transport errors**: I/O, CSV tokenizer and JSON tokenizer failures.
//!
//! Only two paths are ever suppressed, both gated by the serializer policy:
//! a missing converter when `throw_if_no_converter` is off, and a failed decode
//! when `throw_on_failed_decode` is off (or the converter opts out). Every other
//! error aborts the current stream.
//!
//! ## Examples
//!
//! ```rust
//! use dataio::{DataIO, Error, FileFormat, Options};
//!
//! let io = DataIO::empty();
//! let result = io.reader("a,b\n".as_bytes(), FileFormat::Csv, dataio::DataType::of::<i32>(), &Options::default());
//! assert!(matches!(result, Err(Error::UnsupportedFormat(FileFormat::Csv))));
//! ```

use crate::{DataAccess, FileFormat};
use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while reading or writing records.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Fault reported by the CSV tokenizer
    #[error("CSV error: {0}")]
    Csv(String),

    /// Fault reported by the JSON tokenizer
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed options or serializer configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// No serialization factory is registered for the format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(FileFormat),

    /// Invalid argument passed to a naming or lookup operation
    #[error("Invalid argument `{name}`: {msg}")]
    InvalidArgument { name: &'static str, msg: String },

    /// No converter is registered for the requested type and access
    #[error("No converter defined for the requested type [{type_name}] to {access}")]
    NoConverter {
        type_name: &'static str,
        access: DataAccess,
    },

    /// The converter could not read a non-nullable value in strict mode
    #[error("Failed to read the data of type [{type_name}] with the converter for type [{converter}]")]
    Decode {
        type_name: &'static str,
        converter: &'static str,
    },

    /// The converter failed while writing a value
    #[error("Failed to write data of type [{type_name}]: {source}")]
    Encode {
        type_name: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// The value passed does not match the type supported by the converter
    #[error("Type mismatch: the passed value is not of the type [{expected}] supported by the converter")]
    TypeMismatch { expected: &'static str },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an invalid argument error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dataio::Error;
    ///
    /// let err = Error::invalid_argument("name", "must not be empty");
    /// assert!(err.to_string().contains("`name`"));
    /// ```
    pub fn invalid_argument(name: &'static str, msg: &str) -> Self {
        Error::InvalidArgument {
            name,
            msg: msg.to_string(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(msg: &str) -> Self {
        Error::Configuration(msg.to_string())
    }

    pub fn no_converter(type_name: &'static str, access: DataAccess) -> Self {
        Error::NoConverter { type_name, access }
    }

    pub fn decode(type_name: &'static str, converter: &'static str) -> Self {
        Error::Decode {
            type_name,
            converter,
        }
    }

    /// Wraps a converter failure raised while writing a value of `type_name`.
    pub fn encode(type_name: &'static str, source: Error) -> Self {
        Error::Encode {
            type_name,
            source: Box::new(source),
        }
    }

    pub fn type_mismatch(expected: &'static str) -> Self {
        Error::TypeMismatch { expected }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dataio::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for errors raised by configuration rather than by data.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_) | Error::UnsupportedFormat(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<::csv::Error> for Error {
    fn from(e: ::csv::Error) -> Self {
        Error::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_keeps_source() {
        use std::error::Error as _;

        let err = Error::encode("Point", Error::custom("boom"));
        assert!(err.to_string().contains("Point"));
        assert!(err.source().unwrap().to_string().contains("boom"));
    }

    #[test]
    fn test_configuration_classification() {
        assert!(Error::configuration("bad").is_configuration());
        assert!(Error::UnsupportedFormat(FileFormat::Json).is_configuration());
        assert!(!Error::decode("i32", "i32").is_configuration());
    }

    #[test]
    fn test_no_converter_message() {
        let err = Error::no_converter("Point", DataAccess::Read);
        assert_eq!(
            err.to_string(),
            "No converter defined for the requested type [Point] to read"
        );
    }
}
