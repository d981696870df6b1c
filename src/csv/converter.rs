//! Tabular converters and their type-erased form.
//!
//! Implement [`CsvConverter`] for a concrete target type; the registry stores it as an
//! [`AnyCsvConverter`] obtained through [`erase`]. The erased layer owns the parts of
//! the contract every converter shares: type dispatch, the failed-read policy, null
//! alignment and error wrapping.

use crate::csv::context::CsvSerializerContext;
use crate::csv::field::CsvField;
use crate::csv::row::{CsvRecord, CsvRow};
use crate::naming::NamingContext;
use crate::types::{DataType, Decoded};
use crate::{Error, Result};
use std::any::{type_name, Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Reads and writes values of one type as a fixed group of columns.
pub trait CsvConverter: Send + Sync + 'static {
    type Target: 'static;

    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        true
    }

    /// Per-converter override of strict decoding; `Some(false)` never fails a read.
    fn throw_on_failed_read(&self) -> Option<bool> {
        None
    }

    /// Consumes the header row. The default adopts it as-is.
    ///
    /// # Errors
    ///
    /// Implementations validating the header may reject it.
    fn read_header(&self, row: &mut CsvRow, _ctx: &CsvSerializerContext) -> Result<()> {
        row.read_header();
        Ok(())
    }

    /// Appends the header names of every column this converter writes.
    ///
    /// # Errors
    ///
    /// Returns naming errors and errors of nested converters.
    fn write_header(
        &self,
        record: &mut CsvRecord,
        ctx: &CsvSerializerContext,
        naming: &NamingContext,
    ) -> Result<()>;

    /// Reads a value from the current row. `Ok(None)` reports a read failure.
    ///
    /// # Errors
    ///
    /// Errors are hard failures and bypass the failed-read policy.
    fn try_read(
        &self,
        row: &CsvRow,
        ctx: &CsvSerializerContext,
        naming: &NamingContext,
    ) -> Result<Option<Self::Target>>;

    /// Appends the fields of `data`.
    ///
    /// # Errors
    ///
    /// Returns errors of nested converters.
    fn write(&self, data: &Self::Target, record: &mut CsvRecord, ctx: &CsvSerializerContext) -> Result<()>;

    /// Appends the fields standing in for a null value.
    fn write_empty_fields(&self, record: &mut CsvRecord, columns: usize) {
        for _ in 0..columns {
            record.write_empty();
        }
    }
}

/// Object-safe view of a [`CsvConverter`].
pub trait AnyCsvConverter: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn target_id(&self) -> TypeId;

    /// Holds for the target type and its nullable form.
    fn can_convert(&self, data_type: &DataType) -> bool {
        data_type.id() == self.target_id()
    }

    fn can_read(&self) -> bool;

    fn can_write(&self) -> bool;

    fn read_csv_header(&self, row: &mut CsvRow, ctx: &CsvSerializerContext) -> Result<()>;

    fn write_csv_header(
        &self,
        record: &mut CsvRecord,
        ctx: &CsvSerializerContext,
        naming: &NamingContext,
    ) -> Result<()>;

    /// Reads a value, applying the failed-read policy for `data_type`.
    fn read_csv(
        &self,
        row: &CsvRow,
        ctx: &CsvSerializerContext,
        naming: &NamingContext,
        data_type: &DataType,
    ) -> Result<Decoded>;

    /// Writes `data`, or `columns` empty fields when it is null.
    fn write_csv(
        &self,
        data: Option<&dyn Any>,
        record: &mut CsvRecord,
        ctx: &CsvSerializerContext,
        columns: usize,
    ) -> Result<()>;
}

struct Erased<C>(C);

/// Wraps a typed converter for storage in a registry.
pub fn erase<C: CsvConverter>(converter: C) -> Arc<dyn AnyCsvConverter> {
    Arc::new(Erased(converter))
}

impl<C: CsvConverter> AnyCsvConverter for Erased<C> {
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

    fn read_csv_header(&self, row: &mut CsvRow, ctx: &CsvSerializerContext) -> Result<()> {
        self.0.read_header(row, ctx)
    }

    fn write_csv_header(
        &self,
        record: &mut CsvRecord,
        ctx: &CsvSerializerContext,
        naming: &NamingContext,
    ) -> Result<()> {
        self.0.write_header(record, ctx, naming)
    }

    fn read_csv(
        &self,
        row: &CsvRow,
        ctx: &CsvSerializerContext,
        naming: &NamingContext,
        data_type: &DataType,
    ) -> Result<Decoded> {
        if let Some(value) = self.0.try_read(row, ctx, naming)? {
            return Ok(Some(Box::new(value)));
        }

        let strict = !data_type.is_nullable()
            && ctx.throw_on_failed_decode
            && self.0.throw_on_failed_read() != Some(false);
        if strict {
            return Err(Error::decode(data_type.name(), self.type_name()));
        }

        debug!(
            data_type = data_type.name(),
            prefix = naming.prefix(),
            "failed read replaced by default value"
        );
        Ok(data_type.default_value())
    }

    fn write_csv(
        &self,
        data: Option<&dyn Any>,
        record: &mut CsvRecord,
        ctx: &CsvSerializerContext,
        columns: usize,
    ) -> Result<()> {
        match data {
            Some(value) => {
                let value = value
                    .downcast_ref::<C::Target>()
                    .ok_or_else(|| Error::type_mismatch(self.type_name()))?;
                self.0
                    .write(value, record, ctx)
                    .map_err(|e| Error::encode(self.type_name(), e))
            }
            None => {
                self.0.write_empty_fields(record, columns);
                Ok(())
            }
        }
    }
}

/// Converter storing a [`CsvField`] value in a single column.
///
/// Nested under a member, the column takes the member's name; at the root it
/// is called after `default_name`.
///
/// ```rust
/// use dataio::{CsvSerializationFactory, DataIO, FieldConverter, FileFormat, Options};
///
/// let io = DataIO::empty().with_factory(
///     CsvSerializationFactory::new().with_converter(FieldConverter::<i32>::new("Value")),
/// );
/// let mut out = Vec::new();
/// io.write_output(vec![3, 4], &mut out, FileFormat::Csv, &Options::default()).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "Value\n3\n4\n");
/// ```
pub struct FieldConverter<T> {
    default_name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FieldConverter<T> {
    pub fn new(default_name: &str) -> Self {
        FieldConverter {
            default_name: default_name.to_string(),
            _marker: PhantomData,
        }
    }
}

impl<T: CsvField + 'static> CsvConverter for FieldConverter<T> {
    type Target = T;

    fn write_header(
        &self,
        record: &mut CsvRecord,
        _ctx: &CsvSerializerContext,
        naming: &NamingContext,
    ) -> Result<()> {
        record.write_raw(naming.get_default(&self.default_name)?);
        Ok(())
    }

    fn try_read(
        &self,
        row: &CsvRow,
        _ctx: &CsvSerializerContext,
        naming: &NamingContext,
    ) -> Result<Option<T>> {
        Ok(row.get_field(&naming.get_default(&self.default_name)?))
    }

    fn write(&self, data: &T, record: &mut CsvRecord, _ctx: &CsvSerializerContext) -> Result<()> {
        record.write_field(data);
        Ok(())
    }
}
