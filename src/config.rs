//! Factory-level configuration pipeline.
//!
//! A factory keeps an ordered list of [`Configuration`] steps and applies each of them
//! to every serializer it creates. Each step names the serializer kind it applies to;
//! steps for another kind are skipped.
//!
//! ```rust
//! use dataio::{Configuration, CsvSerializationFactory, DataAccess, SerializerMut};
//!
//! let factory = CsvSerializationFactory::new()
//!     .with_configuration(Configuration::HeaderToLowerCase)
//!     .with_configuration(Configuration::relay(|serializer, access, _, _| {
//!         if let (SerializerMut::Csv(csv), DataAccess::Write) = (serializer, access) {
//!             csv.nesting_delimiter = "_".to_string();
//!         }
//!         Ok(())
//!     }));
//! ```

use crate::csv::{AnyCsvConverter, CsvConverter, CsvSerializerContext};
use crate::json::{AnyJsonConverter, JsonConverter, JsonSerializerContext};
use crate::{DataAccess, DataType, HeaderTransform, Options, Result};
use std::fmt;
use std::sync::Arc;

/// Mutable access to the serializer under configuration.
pub enum SerializerMut<'a> {
    Csv(&'a mut CsvSerializerContext),
    Json(&'a mut JsonSerializerContext),
}

type RelayFn = dyn Fn(SerializerMut<'_>, DataAccess, &DataType, &Options) -> Result<()> + Send + Sync;

/// One step of a factory's configuration pipeline.
#[derive(Clone)]
pub enum Configuration {
    /// Appends tabular converters, keeping only those serving the access direction.
    CsvConverters(Vec<Arc<dyn AnyCsvConverter>>),
    /// Appends document converters, keeping only those serving the access direction.
    JsonConverters(Vec<Arc<dyn AnyJsonConverter>>),
    /// Lower-cases tabular header names on write and on header matching.
    HeaderToLowerCase,
    /// Arbitrary adjustment of the serializer.
    Relay(Arc<RelayFn>),
}

impl Configuration {
    pub fn csv_converter<C: CsvConverter>(converter: C) -> Self {
        Configuration::CsvConverters(vec![crate::csv::erase(converter)])
    }

    pub fn json_converter<C: JsonConverter>(converter: C) -> Self {
        Configuration::JsonConverters(vec![crate::json::erase(converter)])
    }

    pub fn relay<F>(f: F) -> Self
    where
        F: Fn(SerializerMut<'_>, DataAccess, &DataType, &Options) -> Result<()>
            + Send
            + Sync
            + 'static,
    {
        Configuration::Relay(Arc::new(f))
    }

    /// Applies this step to `serializer`.
    ///
    /// # Errors
    ///
    /// Returns whatever a [`Configuration::Relay`] step returns.
    pub fn apply(
        &self,
        serializer: SerializerMut<'_>,
        access: DataAccess,
        data_type: &DataType,
        options: &Options,
    ) -> Result<()> {
        match (self, serializer) {
            (Configuration::CsvConverters(converters), SerializerMut::Csv(csv)) => {
                for converter in converters
                    .iter()
                    .filter(|c| access.permits(c.can_read(), c.can_write()))
                {
                    csv.add_shared(Arc::clone(converter));
                }
            }
            (Configuration::JsonConverters(converters), SerializerMut::Json(json)) => {
                for converter in converters
                    .iter()
                    .filter(|c| access.permits(c.can_read(), c.can_write()))
                {
                    json.add_shared(Arc::clone(converter));
                }
            }
            (Configuration::HeaderToLowerCase, SerializerMut::Csv(csv)) => {
                csv.header_transform = HeaderTransform::Lowercase;
            }
            (Configuration::Relay(relay), serializer) => relay(serializer, access, data_type, options)?,
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Configuration::CsvConverters(c) => write!(f, "CsvConverters({})", c.len()),
            Configuration::JsonConverters(c) => write!(f, "JsonConverters({})", c.len()),
            Configuration::HeaderToLowerCase => f.write_str("HeaderToLowerCase"),
            Configuration::Relay(_) => f.write_str("Relay(..)"),
        }
    }
}
