//! # dataio
//!
//! Typed record exchange over textual container formats.
//!
//! ## What is it?
//!
//! `dataio` reads and writes streams of typed records as CSV or JSON through one
//! interface. Each record type is handled by a *converter* registered with the
//! format's factory; the same reader and writer machinery then works for every
//! record type and every format.
//!
//! ## Key Features
//!
//! - **Converter registries**: ordered, first-match converter lookup per format, with
//!   a configurable policy for missing converters and unreadable values
//! - **Nested CSV columns**: composite records flatten into qualified column names
//!   such as `Composite.Id`
//! - **Streaming JSON**: records are written as they come; a single record is written
//!   bare and two or more are wrapped in an array
//! - **Format routing**: the file extension picks the format when it names one
//!
//! ## Quick Start
//!
//! ```rust
//! use dataio::{
//!     CsvConverter, CsvRecord, CsvRow, CsvSerializationFactory, CsvSerializerContext, DataIO,
//!     FileFormat, NamingContext, Options, Result,
//! };
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Reading {
//!     sensor: String,
//!     value: f64,
//! }
//!
//! struct ReadingConverter;
//!
//! impl CsvConverter for ReadingConverter {
//!     type Target = Reading;
//!
//!     fn write_header(&self, record: &mut CsvRecord, _: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
//!         record.write_raw(naming.get("Sensor")?);
//!         record.write_raw(naming.get("Value")?);
//!         Ok(())
//!     }
//!
//!     fn try_read(&self, row: &CsvRow, _: &CsvSerializerContext, naming: &NamingContext) -> Result<Option<Reading>> {
//!         Ok(Some(Reading {
//!             sensor: row.get_field(&naming.get("Sensor")?).unwrap_or_default(),
//!             value: match row.get_field(&naming.get("Value")?) {
//!                 Some(value) => value,
//!                 None => return Ok(None),
//!             },
//!         }))
//!     }
//!
//!     fn write(&self, data: &Reading, record: &mut CsvRecord, _: &CsvSerializerContext) -> Result<()> {
//!         record.write_field(&data.sensor);
//!         record.write_field(&data.value);
//!         Ok(())
//!     }
//! }
//!
//! let io = DataIO::empty()
//!     .with_factory(CsvSerializationFactory::new().with_converter(ReadingConverter));
//!
//! let readings = vec![
//!     Reading { sensor: "a".to_string(), value: 1.5 },
//!     Reading { sensor: "b".to_string(), value: -2.0 },
//! ];
//! let mut csv = Vec::new();
//! io.write_output(readings, &mut csv, FileFormat::Csv, &Options::default()).unwrap();
//! assert_eq!(String::from_utf8(csv.clone()).unwrap(), "Sensor,Value\na,1.5\nb,-2\n");
//!
//! let back: Vec<Reading> = io
//!     .read_input(csv.as_slice(), FileFormat::Csv, &Options::default())
//!     .unwrap()
//!     .collect::<Result<_>>()
//!     .unwrap();
//! assert_eq!(back[1], Reading { sensor: "b".to_string(), value: -2.0 });
//! ```
//!
//! ## Error Policy
//!
//! By default a missing converter is an error and an unreadable value is replaced by
//! the default of the requested type (`T::default()`, or `None` for nullable
//! requests). Both are switched through [`Options`].
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`csv_roundtrip.rs`** - Nested records through CSV
//! - **`json_framing.rs`** - Streaming records into one JSON document
//!
//! Run any example with: `cargo run --example <name>`

pub mod config;
pub mod csv;
pub mod data;
pub mod error;
pub mod format;
pub mod io;
pub mod json;
pub mod naming;
pub mod observe;
pub mod options;
pub mod types;

pub use crate::config::{Configuration, SerializerMut};
pub use crate::csv::{
    AnyCsvConverter, CsvConverter, CsvDataReader, CsvDataWriter, CsvField, CsvRecord, CsvRow,
    CsvSerializationFactory, CsvSerializerContext, FieldConverter,
};
pub use crate::data::{DataReader, DataWriter, Records, SerializationFactory, StreamState};
pub use crate::error::{Error, Result};
pub use crate::format::FileFormat;
pub use crate::io::DataIO;
pub use crate::json::{
    AnyJsonConverter, JsonConverter, JsonDataReader, JsonDataWriter, JsonSerializationFactory,
    JsonSerializerContext, SerdeConverter, StreamingFramer,
};
pub use crate::naming::{FieldName, NamingContext};
pub use crate::observe::{Observer, WriterObserver};
pub use crate::options::{Converters, Culture, Delimiter, HeaderTransform, Options};
pub use crate::types::{DataAccess, DataType, Decoded};

use std::io::{Read, Write};

/// Reads every record of `source` with the CSV and JSON factories and the converters
/// carried by `options`.
///
/// # Examples
///
/// ```rust
/// use dataio::{FileFormat, Options, SerdeConverter};
///
/// let options = Options::new().with_json_converter(SerdeConverter::<String>::new());
/// let names: Vec<String> = dataio::read(r#"["ada","grace"]"#.as_bytes(), FileFormat::Json, &options).unwrap();
/// assert_eq!(names, vec!["ada", "grace"]);
/// ```
///
/// # Errors
///
/// Returns the first error of the stream.
pub fn read<T>(source: impl Read, format: FileFormat, options: &Options) -> Result<Vec<T>>
where
    T: Default + 'static,
{
    DataIO::default()
        .read_input(source, format, options)?
        .collect()
}

/// Writes `items` with the CSV and JSON factories and the converters carried by `options`.
///
/// # Examples
///
/// ```rust
/// use dataio::{FileFormat, Options, SerdeConverter};
///
/// let options = Options::new().with_json_converter(SerdeConverter::<bool>::new());
/// let mut out = Vec::new();
/// dataio::write(vec![true], &mut out, FileFormat::Json, &options).unwrap();
/// assert_eq!(out, b"true");
/// ```
///
/// # Errors
///
/// Returns the first error of the stream.
pub fn write<T>(items: impl IntoIterator<Item = T>, sink: impl Write, format: FileFormat, options: &Options) -> Result<()>
where
    T: 'static,
{
    DataIO::default().write_output(items, sink, format, options)
}

/// Resolves the format of `file_name` against the CSV and JSON factories.
///
/// ```rust
/// use dataio::FileFormat;
///
/// assert_eq!(dataio::resolve_format("out.csv", FileFormat::Json), FileFormat::Csv);
/// ```
#[must_use]
pub fn resolve_format(file_name: &str, requested: FileFormat) -> FileFormat {
    DataIO::default().resolve_format(file_name, requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_roundtrip_through_options_converters() {
        let options = Options::new()
            .with_json_converter(SerdeConverter::<Vec<u8>>::new())
            .with_csv_converter(FieldConverter::<u8>::new("Byte"));

        let mut json = Vec::new();
        write(vec![vec![1u8, 2], vec![]], &mut json, FileFormat::Json, &options).unwrap();
        assert_eq!(json, b"[[1,2],[]]");
        let back: Vec<Vec<u8>> = read(json.as_slice(), FileFormat::Json, &options).unwrap();
        assert_eq!(back, vec![vec![1, 2], vec![]]);

        let mut csv = Vec::new();
        write(vec![7u8, 8], &mut csv, FileFormat::Csv, &options).unwrap();
        assert_eq!(csv, b"Byte\n7\n8\n");
    }

    #[test]
    fn test_default_io_has_no_converters() {
        let result = read::<i32>("1".as_bytes(), FileFormat::Json, &Options::default());
        assert!(matches!(result, Err(Error::NoConverter { .. })));
    }
}
