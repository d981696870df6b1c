//! The tabular converter registry.

use crate::csv::converter::{erase, AnyCsvConverter, CsvConverter};
use crate::csv::row::{CsvRecord, CsvRow};
use crate::naming::NamingContext;
use crate::types::{unbox_nullable, unbox_or_default, DataType, Decoded};
use crate::{Culture, DataAccess, Delimiter, Error, HeaderTransform, Options, Result};
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Ordered converter registry plus the settings of one tabular serializer.
///
/// Lookups pick the first registered converter accepting the requested type.
/// Each converter slot remembers how many columns its header spanned, so a null
/// value can be written as the same number of empty fields.
///
/// Composite converters call back into the context for their members:
///
/// ```rust
/// use dataio::{CsvConverter, CsvRecord, CsvRow, CsvSerializerContext, FieldConverter, NamingContext, Result};
///
/// #[derive(Default)]
/// struct Range {
///     start: i32,
///     end: i32,
/// }
///
/// struct RangeConverter;
///
/// impl CsvConverter for RangeConverter {
///     type Target = Range;
///
///     fn write_header(&self, record: &mut CsvRecord, ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
///         ctx.write_member_header::<i32>(record, naming, "Start")?;
///         ctx.write_member_header::<i32>(record, naming, "End")
///     }
///
///     fn try_read(&self, row: &CsvRow, ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<Option<Range>> {
///         Ok(Some(Range {
///             start: ctx.deserialize_member(row, naming, "Start")?,
///             end: ctx.deserialize_member(row, naming, "End")?,
///         }))
///     }
///
///     fn write(&self, data: &Range, record: &mut CsvRecord, ctx: &CsvSerializerContext) -> Result<()> {
///         ctx.serialize(record, &data.start)?;
///         ctx.serialize(record, &data.end)
///     }
/// }
///
/// let mut ctx = CsvSerializerContext::new();
/// ctx.nesting_delimiter = ".".to_string();
/// ctx.add_converter(FieldConverter::<i32>::new("Value"));
/// ctx.add_converter(RangeConverter);
///
/// let mut header = CsvRecord::default();
/// let root = ctx.root_naming().descend_with("Range", ".").unwrap();
/// ctx.write_header_for::<Range>(&mut header, &root).unwrap();
/// assert_eq!(header.fields(), &["Range.Start", "Range.End"]);
/// ```
pub struct CsvSerializerContext {
    converters: Vec<Arc<dyn AnyCsvConverter>>,
    columns: Vec<AtomicUsize>,
    pub header_transform: HeaderTransform,
    pub nesting_delimiter: String,
    pub throw_if_no_converter: bool,
    pub throw_on_failed_decode: bool,
    pub culture: Culture,
    pub delimiter: Delimiter,
}

impl Default for CsvSerializerContext {
    fn default() -> Self {
        CsvSerializerContext::from_options(&Options::default())
    }
}

impl fmt::Debug for CsvSerializerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvSerializerContext")
            .field(
                "converters",
                &self.converters.iter().map(|c| c.type_name()).collect::<Vec<_>>(),
            )
            .field("header_transform", &self.header_transform)
            .field("nesting_delimiter", &self.nesting_delimiter)
            .field("throw_if_no_converter", &self.throw_if_no_converter)
            .field("throw_on_failed_decode", &self.throw_on_failed_decode)
            .finish()
    }
}

impl CsvSerializerContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry carrying the settings of `options`.
    ///
    /// The converters listed in `options` are not registered here; factories
    /// append them after their own configuration.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        CsvSerializerContext {
            converters: Vec::new(),
            columns: Vec::new(),
            header_transform: options.header_transform.clone(),
            nesting_delimiter: options.nesting_delimiter.clone(),
            throw_if_no_converter: options.throw_if_no_converter,
            throw_on_failed_decode: options.throw_on_failed_decode,
            culture: options.culture.clone(),
            delimiter: options.delimiter,
        }
    }

    pub fn add_converter<C: CsvConverter>(&mut self, converter: C) {
        self.add_shared(erase(converter));
    }

    pub fn add_shared(&mut self, converter: Arc<dyn AnyCsvConverter>) {
        self.converters.push(converter);
        self.columns.push(AtomicUsize::new(0));
    }

    pub fn converters(&self) -> &[Arc<dyn AnyCsvConverter>] {
        &self.converters
    }

    /// Naming context of top-level fields.
    #[must_use]
    pub fn root_naming(&self) -> NamingContext {
        NamingContext::new(self.header_transform.clone())
    }

    /// Index of the first converter serving `data_type` for `access`.
    pub fn find(&self, data_type: &DataType, access: DataAccess) -> Option<usize> {
        self.converters.iter().position(|c| {
            c.can_convert(data_type) && access.permits(c.can_read(), c.can_write())
        })
    }

    /// Number of columns the header of `data_type` spanned, 0 before any header write.
    pub fn columns(&self, data_type: &DataType) -> usize {
        self.find(data_type, DataAccess::Write)
            .map_or(0, |index| self.columns[index].load(Ordering::Relaxed))
    }

    /// Lets the converter of `data_type` consume the header row in `row`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoConverter`] when no converter matches and the registry is strict.
    pub fn read_header(&self, row: &mut CsvRow, data_type: &DataType) -> Result<()> {
        match self.find(data_type, DataAccess::Read) {
            Some(index) => self.converters[index].read_csv_header(row, self),
            None if self.throw_if_no_converter => {
                Err(Error::no_converter(data_type.name(), DataAccess::Read))
            }
            None => {
                row.read_header();
                Ok(())
            }
        }?;
        trace!(header = ?row.header().collect::<Vec<_>>(), "read header");
        Ok(())
    }

    /// Appends the header of `data_type` and records how many columns it spans.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoConverter`] when no converter matches and the registry is
    /// strict, and any error of the converter.
    pub fn write_header(
        &self,
        record: &mut CsvRecord,
        data_type: &DataType,
        naming: &NamingContext,
    ) -> Result<()> {
        let Some(index) = self.find(data_type, DataAccess::Write) else {
            if self.throw_if_no_converter {
                return Err(Error::no_converter(data_type.name(), DataAccess::Write));
            }
            debug!(data_type = data_type.name(), "no converter, header skipped");
            return Ok(());
        };

        let before = record.len();
        self.converters[index].write_csv_header(record, self, naming)?;
        self.columns[index].store(record.len().saturating_sub(before), Ordering::Relaxed);
        Ok(())
    }

    /// Decodes a value of `data_type` from the current row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoConverter`] when no converter matches and the registry is
    /// strict, [`Error::Decode`] for strict read failures, and hard converter errors.
    pub fn decode(&self, row: &CsvRow, data_type: &DataType, naming: &NamingContext) -> Result<Decoded> {
        match self.find(data_type, DataAccess::Read) {
            Some(index) => self.converters[index].read_csv(row, self, naming, data_type),
            None if self.throw_if_no_converter => {
                Err(Error::no_converter(data_type.name(), DataAccess::Read))
            }
            None => {
                debug!(data_type = data_type.name(), "no converter, default value used");
                Ok(data_type.default_value())
            }
        }
    }

    /// Encodes `value` as `data_type`; `None` writes the recorded number of empty fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoConverter`] when no converter matches and the registry is
    /// strict, [`Error::TypeMismatch`] for a value of another type, and
    /// [`Error::Encode`] wrapping any converter failure.
    pub fn encode(&self, record: &mut CsvRecord, value: Option<&dyn Any>, data_type: &DataType) -> Result<()> {
        match self.find(data_type, DataAccess::Write) {
            Some(index) => {
                let columns = self.columns[index].load(Ordering::Relaxed);
                self.converters[index].write_csv(value, record, self, columns)
            }
            None if self.throw_if_no_converter => {
                Err(Error::no_converter(data_type.name(), DataAccess::Write))
            }
            None => {
                debug!(data_type = data_type.name(), "no converter, value skipped");
                Ok(())
            }
        }
    }

    /// Reads a `T`, substituting `T::default()` for a failed read.
    ///
    /// # Errors
    ///
    /// See [`decode`](Self::decode).
    pub fn deserialize<T: Default + 'static>(&self, row: &CsvRow, naming: &NamingContext) -> Result<T> {
        unbox_or_default(self.decode(row, &DataType::of::<T>(), naming)?)
    }

    pub fn deserialize_nullable<T: 'static>(&self, row: &CsvRow, naming: &NamingContext) -> Result<Option<T>> {
        unbox_nullable(self.decode(row, &DataType::nullable::<T>(), naming)?)
    }

    /// Reads the member `name` of the value described by `naming`.
    ///
    /// # Errors
    ///
    /// See [`decode`](Self::decode); also fails on a blank member name.
    pub fn deserialize_member<T: Default + 'static>(
        &self,
        row: &CsvRow,
        naming: &NamingContext,
        name: &str,
    ) -> Result<T> {
        let member = naming.descend_with(name, &self.nesting_delimiter)?;
        self.deserialize(row, &member)
    }

    pub fn deserialize_nullable_member<T: 'static>(
        &self,
        row: &CsvRow,
        naming: &NamingContext,
        name: &str,
    ) -> Result<Option<T>> {
        let member = naming.descend_with(name, &self.nesting_delimiter)?;
        self.deserialize_nullable(row, &member)
    }

    pub fn serialize<T: 'static>(&self, record: &mut CsvRecord, value: &T) -> Result<()> {
        self.encode(record, Some(value), &DataType::nullable::<T>())
    }

    pub fn serialize_nullable<T: 'static>(&self, record: &mut CsvRecord, value: Option<&T>) -> Result<()> {
        self.encode(
            record,
            value.map(|v| v as &dyn Any),
            &DataType::nullable::<T>(),
        )
    }

    pub fn write_header_for<T: 'static>(&self, record: &mut CsvRecord, naming: &NamingContext) -> Result<()> {
        self.write_header(record, &DataType::nullable::<T>(), naming)
    }

    /// Appends the header of the member `name` of the value described by `naming`.
    ///
    /// # Errors
    ///
    /// See [`write_header`](Self::write_header); also fails on a blank member name.
    pub fn write_member_header<T: 'static>(
        &self,
        record: &mut CsvRecord,
        naming: &NamingContext,
        name: &str,
    ) -> Result<()> {
        let member = naming.descend_with(name, &self.nesting_delimiter)?;
        self.write_header_for::<T>(record, &member)
    }
}
