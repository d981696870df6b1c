//! Format routing.
//!
//! [`DataIO`] keeps one [`SerializationFactory`] per [`FileFormat`] and hands out
//! readers and writers for whichever format a call names, correcting the format
//! from a file name's extension when the extension names a registered format.
//!
//! ```rust
//! use dataio::{DataIO, FileFormat, JsonSerializationFactory, Options, SerdeConverter};
//!
//! let io = DataIO::empty()
//!     .with_factory(JsonSerializationFactory::new().with_converter(SerdeConverter::<u32>::new()));
//!
//! let mut out = Vec::new();
//! io.write_output(vec![1u32, 2, 3], &mut out, FileFormat::Json, &Options::default()).unwrap();
//! assert_eq!(out, b"[1,2,3]");
//!
//! let back: Vec<u32> = io
//!     .read_input(out.as_slice(), FileFormat::Json, &Options::default())
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(back, vec![1, 2, 3]);
//! ```

use crate::csv::CsvSerializationFactory;
use crate::data::{DataReader, DataWriter, Records, SerializationFactory};
use crate::json::JsonSerializationFactory;
use crate::types::DataType;
use crate::{Error, FileFormat, Options, Result};
use indexmap::IndexMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Registry of serialization factories keyed by format.
pub struct DataIO {
    factories: IndexMap<FileFormat, Box<dyn SerializationFactory>>,
}

/// Registers the CSV and JSON factories with no converters.
impl Default for DataIO {
    fn default() -> Self {
        DataIO::empty()
            .with_factory(CsvSerializationFactory::new())
            .with_factory(JsonSerializationFactory::new())
    }
}

impl fmt::Debug for DataIO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataIO")
            .field("formats", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DataIO {
    /// A router without any factory.
    #[must_use]
    pub fn empty() -> Self {
        DataIO {
            factories: IndexMap::new(),
        }
    }

    /// A router over `factories`; a later factory replaces an earlier one for the same format.
    pub fn new<I>(factories: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SerializationFactory>>,
    {
        let mut io = DataIO::empty();
        for factory in factories {
            io.factories.insert(factory.format(), factory);
        }
        io
    }

    #[must_use]
    pub fn with_factory<F: SerializationFactory + 'static>(mut self, factory: F) -> Self {
        self.factories.insert(factory.format(), Box::new(factory));
        self
    }

    /// Registered formats, in registration order.
    pub fn formats(&self) -> impl Iterator<Item = FileFormat> + '_ {
        self.factories.keys().copied()
    }

    pub fn supports(&self, format: FileFormat) -> bool {
        self.factories.contains_key(&format)
    }

    /// The factory registered for `format`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if there is none.
    pub fn factory(&self, format: FileFormat) -> Result<&dyn SerializationFactory> {
        self.factories
            .get(&format)
            .map(|factory| factory.as_ref())
            .ok_or(Error::UnsupportedFormat(format))
    }

    /// The format to use for `file_name`.
    ///
    /// The extension, the text after the last `.` of the file name, selects the
    /// registered format whose name it equals ignoring ASCII case. Otherwise
    /// `requested` is kept.
    ///
    /// ```rust
    /// use dataio::{DataIO, FileFormat};
    ///
    /// let io = DataIO::default();
    /// assert_eq!(io.resolve_format("data/items.CSV", FileFormat::Json), FileFormat::Csv);
    /// assert_eq!(io.resolve_format("items.txt", FileFormat::Json), FileFormat::Json);
    /// assert_eq!(io.resolve_format("items", FileFormat::Csv), FileFormat::Csv);
    /// ```
    pub fn resolve_format(&self, file_name: &str, requested: FileFormat) -> FileFormat {
        let name = Path::new(file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(file_name);
        let extension = match name.rsplit_once('.') {
            Some((_, extension)) if !extension.is_empty() => extension,
            _ => return requested,
        };

        match self
            .formats()
            .find(|format| format.matches_extension(extension))
        {
            Some(format) => {
                if format != requested {
                    debug!(file_name, %requested, resolved = %format, "format corrected from extension");
                }
                format
            }
            None => requested,
        }
    }

    /// Creates a reader of `data_type` records over `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] when no factory serves `format`, and
    /// configuration errors of the factory.
    pub fn reader<'a>(
        &self,
        source: impl Read + 'a,
        format: FileFormat,
        data_type: DataType,
        options: &Options,
    ) -> Result<Box<dyn DataReader + 'a>> {
        self.factory(format)?
            .create_reader(Box::new(source), data_type, options)
    }

    /// Creates a writer of `data_type` records into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] when no factory serves `format`, and
    /// configuration errors of the factory.
    pub fn writer<'a>(
        &self,
        sink: impl Write + 'a,
        format: FileFormat,
        data_type: DataType,
        options: &Options,
    ) -> Result<Box<dyn DataWriter + 'a>> {
        self.factory(format)?
            .create_writer(Box::new(sink), data_type, options)
    }

    /// Lazily reads records of `T`; null and unreadable records become `T::default()`
    /// unless the options make decoding strict.
    ///
    /// # Errors
    ///
    /// Fails up front like [`reader`](Self::reader); each item carries the errors of
    /// its record, and iteration ends after the first one.
    pub fn read_input<'a, T: Default + 'static>(
        &self,
        source: impl Read + 'a,
        format: FileFormat,
        options: &Options,
    ) -> Result<impl Iterator<Item = Result<T>> + 'a> {
        let reader = self.reader(source, format, DataType::of::<T>(), options)?;
        Ok(Records::<T>::new(reader).map(|record| record.map(Option::unwrap_or_default)))
    }

    /// Lazily reads records of `Option<T>`, keeping null records as `None`.
    ///
    /// # Errors
    ///
    /// Fails up front like [`reader`](Self::reader).
    pub fn read_input_nullable<'a, T: 'static>(
        &self,
        source: impl Read + 'a,
        format: FileFormat,
        options: &Options,
    ) -> Result<Records<'a, T>> {
        let reader = self.reader(source, format, DataType::nullable::<T>(), options)?;
        Ok(Records::new(reader))
    }

    /// Reads the file at `path`, whose extension overrides `format`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be opened, then fails like
    /// [`read_input`](Self::read_input).
    pub fn read_file<T: Default + 'static>(
        &self,
        path: impl AsRef<Path>,
        format: FileFormat,
        options: &Options,
    ) -> Result<impl Iterator<Item = Result<T>>> {
        let path = path.as_ref();
        let format = self.resolve_format(&path.to_string_lossy(), format);
        let file = File::open(path)?;
        self.read_input(BufReader::new(file), format, options)
    }

    /// Writes every item of `items` and closes the stream.
    ///
    /// # Errors
    ///
    /// Fails like [`writer`](Self::writer), then with the first error of a record
    /// or of closing the stream.
    pub fn write_output<T: 'static>(
        &self,
        items: impl IntoIterator<Item = T>,
        sink: impl Write,
        format: FileFormat,
        options: &Options,
    ) -> Result<()> {
        let mut writer = self.writer(sink, format, DataType::nullable::<T>(), options)?;
        for item in items {
            writer.write(Some(&item))?;
        }
        writer.close()
    }

    /// Like [`write_output`](Self::write_output), writing `None` items as null records.
    ///
    /// # Errors
    ///
    /// See [`write_output`](Self::write_output).
    pub fn write_output_nullable<T: 'static>(
        &self,
        items: impl IntoIterator<Item = Option<T>>,
        sink: impl Write,
        format: FileFormat,
        options: &Options,
    ) -> Result<()> {
        let mut writer = self.writer(sink, format, DataType::nullable::<T>(), options)?;
        for item in items {
            match &item {
                Some(value) => writer.write(Some(value))?,
                None => writer.write(None)?,
            }
        }
        writer.close()
    }

    /// Writes `items` to the file at `path`, whose extension overrides `format`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be created, then fails like
    /// [`write_output`](Self::write_output).
    pub fn write_file<T: 'static>(
        &self,
        path: impl AsRef<Path>,
        items: impl IntoIterator<Item = T>,
        format: FileFormat,
        options: &Options,
    ) -> Result<()> {
        let path = path.as_ref();
        let format = self.resolve_format(&path.to_string_lossy(), format);
        let file = File::create(path)?;
        self.write_output(items, BufWriter::new(file), format, options)
    }
}
