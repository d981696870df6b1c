//! Document converters and their type-erased form.

use crate::json::context::JsonSerializerContext;
use crate::types::{DataType, Decoded};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::{type_name, Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Converts values of one type from and to JSON values.
///
/// Converters are read-only unless they override [`can_write`](Self::can_write) and
/// [`convert_back`](Self::convert_back).
pub trait JsonConverter: Send + Sync + 'static {
    type Target: 'static;

    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        false
    }

    /// Per-converter override of strict decoding; `Some(false)` never fails a read.
    fn throw_on_failed_read(&self) -> Option<bool> {
        None
    }

    /// Converts a non-null JSON value. `Ok(None)` reports a read failure.
    ///
    /// # Errors
    ///
    /// Errors are hard failures and bypass the failed-read policy.
    fn convert(&self, value: &Value, ctx: &JsonSerializerContext) -> Result<Option<Self::Target>>;

    /// Converts a value back into JSON.
    ///
    /// # Errors
    ///
    /// The default implementation always fails.
    fn convert_back(&self, _data: &Self::Target, _ctx: &JsonSerializerContext) -> Result<Value> {
        Err(Error::custom(format!(
            "the converter for [{}] does not support writing",
            type_name::<Self::Target>()
        )))
    }
}

/// Object-safe view of a [`JsonConverter`].
pub trait AnyJsonConverter: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn target_id(&self) -> TypeId;

    fn can_convert(&self, data_type: &DataType) -> bool {
        data_type.id() == self.target_id()
    }

    fn can_read(&self) -> bool;

    fn can_write(&self) -> bool;

    /// Reads a value, mapping `null` and failed reads to the default of `data_type`.
    fn read_json(&self, value: &Value, ctx: &JsonSerializerContext, data_type: &DataType) -> Result<Decoded>;

    /// Writes `data`; `None` becomes `null`.
    fn write_json(&self, data: Option<&dyn Any>, ctx: &JsonSerializerContext) -> Result<Value>;
}

struct Erased<C>(C);

/// Wraps a typed converter for storage in a registry.
pub fn erase<C: JsonConverter>(converter: C) -> Arc<dyn AnyJsonConverter> {
    Arc::new(Erased(converter))
}

impl<C: JsonConverter> AnyJsonConverter for Erased<C> {
    fn type_name(&self) -> &'static str {
        type_name::<C::Target>()
    }

    fn target_id(&self) -> TypeId {
        TypeId::of::<C::Target>()
    }

    fn can_read(&self) -> bool {
        self.0.can_read()
    }

    fn can_write(&self) -> bool {
        self.0.can_write()
    }

    fn read_json(&self, value: &Value, ctx: &JsonSerializerContext, data_type: &DataType) -> Result<Decoded> {
        if value.is_null() {
            return Ok(data_type.default_value());
        }
        if let Some(converted) = self.0.convert(value, ctx)? {
            return Ok(Some(Box::new(converted)));
        }

        let strict = !data_type.is_nullable()
            && ctx.throw_on_failed_decode
            && self.0.throw_on_failed_read() != Some(false);
        if strict {
            return Err(Error::decode(data_type.name(), self.type_name()));
        }

        debug!(data_type = data_type.name(), "failed read replaced by default value");
        Ok(data_type.default_value())
    }

    fn write_json(&self, data: Option<&dyn Any>, ctx: &JsonSerializerContext) -> Result<Value> {
        let Some(data) = data else {
            return Ok(Value::Null);
        };
        let data = data
            .downcast_ref::<C::Target>()
            .ok_or_else(|| Error::type_mismatch(self.type_name()))?;
        self.0
            .convert_back(data, ctx)
            .map_err(|e| Error::encode(self.type_name(), e))
    }
}

/// Reads and writes any serde type.
///
/// A value serde cannot deserialize is a read failure, not a hard error.
///
/// ```rust
/// use dataio::{DataIO, FileFormat, JsonSerializationFactory, Options, SerdeConverter};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
/// struct Point { x: i32, y: i32 }
///
/// let io = DataIO::empty().with_factory(
///     JsonSerializationFactory::new().with_converter(SerdeConverter::<Point>::new()),
/// );
/// let points: Vec<Point> = io
///     .read_input(r#"[{"x":1,"y":2},null]"#.as_bytes(), FileFormat::Json, &Options::default())
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(points, vec![Point { x: 1, y: 2 }, Point::default()]);
/// ```
pub struct SerdeConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeConverter<T> {
    #[must_use]
    pub fn new() -> Self {
        SerdeConverter {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JsonConverter for SerdeConverter<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    type Target = T;

    fn can_write(&self) -> bool {
        true
    }

    fn convert(&self, value: &Value, _ctx: &JsonSerializerContext) -> Result<Option<T>> {
        match serde_json::from_value::<T>(value.clone()) {
            Ok(converted) => Ok(Some(converted)),
            Err(e) => {
                debug!(target_type = type_name::<T>(), error = %e, "value rejected by serde");
                Ok(None)
            }
        }
    }

    fn convert_back(&self, data: &T, _ctx: &JsonSerializerContext) -> Result<Value> {
        Ok(serde_json::to_value(data)?)
    }
}
