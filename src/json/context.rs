//! The document converter registry.

use crate::json::converter::{erase, AnyJsonConverter, JsonConverter};
use crate::types::{unbox_nullable, unbox_or_default, DataType, Decoded};
use crate::{DataAccess, Error, Options, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Ordered converter registry plus the settings of one document serializer.
///
/// Converters reading objects use [`value_or_default`](Self::value_or_default) and
/// [`value_or_none`](Self::value_or_none) to fetch properties. Property names match
/// exactly first, then ignoring ASCII case.
///
/// ```rust
/// use dataio::JsonSerializerContext;
/// use serde_json::json;
///
/// let ctx = JsonSerializerContext::new();
/// let object = json!({ "Id": 7, "name": null });
///
/// assert_eq!(ctx.value_or_default::<i64>(&object, "id").unwrap(), 7);
/// assert_eq!(ctx.value_or_none::<String>(&object, "Name").unwrap(), None);
/// assert_eq!(ctx.value_or_default::<f64>(&object, "missing").unwrap(), 0.0);
/// ```
pub struct JsonSerializerContext {
    converters: Vec<Arc<dyn AnyJsonConverter>>,
    pub throw_if_no_converter: bool,
    pub throw_on_failed_decode: bool,
    pub pretty: bool,
}

impl Default for JsonSerializerContext {
    fn default() -> Self {
        JsonSerializerContext::from_options(&Options::default())
    }
}

impl fmt::Debug for JsonSerializerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSerializerContext")
            .field(
                "converters",
                &self.converters.iter().map(|c| c.type_name()).collect::<Vec<_>>(),
            )
            .field("throw_if_no_converter", &self.throw_if_no_converter)
            .field("throw_on_failed_decode", &self.throw_on_failed_decode)
            .field("pretty", &self.pretty)
            .finish()
    }
}

impl JsonSerializerContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        JsonSerializerContext {
            converters: Vec::new(),
            throw_if_no_converter: options.throw_if_no_converter,
            throw_on_failed_decode: options.throw_on_failed_decode,
            pretty: options.pretty,
        }
    }

    pub fn add_converter<C: JsonConverter>(&mut self, converter: C) {
        self.add_shared(erase(converter));
    }

    pub fn add_shared(&mut self, converter: Arc<dyn AnyJsonConverter>) {
        self.converters.push(converter);
    }

    pub fn converters(&self) -> &[Arc<dyn AnyJsonConverter>] {
        &self.converters
    }

    pub fn find(&self, data_type: &DataType, access: DataAccess) -> Option<&Arc<dyn AnyJsonConverter>> {
        self.converters
            .iter()
            .find(|c| c.can_convert(data_type) && access.permits(c.can_read(), c.can_write()))
    }

    /// Decodes `value` as `data_type`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoConverter`] when no converter matches and the registry is
    /// strict, [`Error::Decode`] for strict read failures, and hard converter errors.
    pub fn decode(&self, value: &Value, data_type: &DataType) -> Result<Decoded> {
        match self.find(data_type, DataAccess::Read) {
            Some(converter) => converter.read_json(value, self, data_type),
            None if self.throw_if_no_converter => {
                Err(Error::no_converter(data_type.name(), DataAccess::Read))
            }
            None => {
                debug!(data_type = data_type.name(), "no converter, default value used");
                Ok(data_type.default_value())
            }
        }
    }

    /// Encodes `value` as `data_type`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoConverter`] when no converter matches and the registry is
    /// strict, [`Error::TypeMismatch`] for a value of another type, and
    /// [`Error::Encode`] wrapping any converter failure.
    pub fn encode(&self, value: Option<&dyn Any>, data_type: &DataType) -> Result<Value> {
        match self.find(data_type, DataAccess::Write) {
            Some(converter) => converter.write_json(value, self),
            None if self.throw_if_no_converter => {
                Err(Error::no_converter(data_type.name(), DataAccess::Write))
            }
            None => {
                debug!(data_type = data_type.name(), "no converter, null written");
                Ok(Value::Null)
            }
        }
    }

    /// The property `name` of `object`, matched exactly or else ignoring ASCII case.
    pub fn member<'v>(&self, object: &'v Value, name: &str) -> Option<&'v Value> {
        let object = object.as_object()?;
        object.get(name).or_else(|| {
            object
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
    }

    /// Reads the property `name` as a `T`; missing, null and unreadable values give
    /// `T::default()` unless decoding is strict.
    ///
    /// # Errors
    ///
    /// See [`to_value`](Self::to_value).
    pub fn value_or_default<T>(&self, object: &Value, name: &str) -> Result<T>
    where
        T: Default + DeserializeOwned + 'static,
    {
        match self.member(object, name) {
            Some(value) => self.to_value(value),
            None => Ok(T::default()),
        }
    }

    /// Reads the property `name` as an optional `T`; missing, null and unreadable
    /// values give `None`.
    ///
    /// # Errors
    ///
    /// Returns hard converter errors.
    pub fn value_or_none<T>(&self, object: &Value, name: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + 'static,
    {
        let Some(value) = self.member(object, name) else {
            return Ok(None);
        };
        let data_type = DataType::nullable::<T>();
        if self.find(&data_type, DataAccess::Read).is_some() {
            return unbox_nullable(self.decode(value, &data_type)?);
        }
        if value.is_null() {
            return Ok(None);
        }
        Ok(serde_json::from_value(value.clone()).ok())
    }

    /// Converts `value` into a `T` with the registered converter, or with serde when
    /// none is registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the value cannot be read and decoding is strict,
    /// and hard converter errors.
    pub fn to_value<T>(&self, value: &Value) -> Result<T>
    where
        T: Default + DeserializeOwned + 'static,
    {
        let data_type = DataType::of::<T>();
        if self.find(&data_type, DataAccess::Read).is_some() {
            return unbox_or_default(self.decode(value, &data_type)?);
        }
        if value.is_null() {
            return Ok(T::default());
        }

        match serde_json::from_value(value.clone()) {
            Ok(converted) => Ok(converted),
            Err(_) if self.throw_on_failed_decode => {
                Err(Error::decode(data_type.name(), type_name::<T>()))
            }
            Err(e) => {
                debug!(data_type = data_type.name(), error = %e, "failed read replaced by default value");
                Ok(T::default())
            }
        }
    }
}
