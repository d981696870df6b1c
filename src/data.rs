//! Format-independent reader, writer and factory interfaces.
//!
//! Every format provides a [`SerializationFactory`] that binds a source or sink to a
//! [`DataReader`] or [`DataWriter`] for one [`DataType`]. Readers and writers own their
//! source/sink for their whole lifetime and release it on drop, whether the stream
//! completed, failed, or was abandoned by the caller.

use crate::config::Configuration;
use crate::types::{unbox_nullable, DataType, Decoded};
use crate::{FileFormat, Options, Result};
use std::any::Any;
use std::io::{Read, Write};
use std::marker::PhantomData;

/// Lifecycle of a record stream. The header is handled exactly once, on the first
/// data operation (or on close for writers that never saw data).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamState {
    HeaderPending,
    Streaming,
    Closed,
}

/// Pull-based reader of records of one data type.
pub trait DataReader {
    /// The type every record is decoded as.
    fn data_type(&self) -> &DataType;

    /// Returns `true` if records of this reader can be read as `data_type`.
    fn can_read(&self, data_type: &DataType) -> bool {
        self.data_type().id() == data_type.id()
    }

    /// Reads the next record.
    ///
    /// Returns `Ok(None)` once the input is exhausted, and `Ok(Some(None))` for a
    /// record decoded as null.
    ///
    /// # Errors
    ///
    /// Propagates tokenizer faults and converter errors not suppressed by the policy.
    fn try_read(&mut self) -> Result<Option<Decoded>>;
}

/// Push-based writer of records of one data type.
pub trait DataWriter {
    fn data_type(&self) -> &DataType;

    /// Returns `true` while the writer is open and `data_type` matches its type.
    fn can_write(&self, data_type: &DataType) -> bool;

    /// Writes one record; `None` writes a null record. Ignored after [`close`](Self::close).
    ///
    /// # Errors
    ///
    /// Returns converter or transport errors; these abort the stream.
    fn write(&mut self, data: Option<&dyn Any>) -> Result<()>;

    /// Finishes the stream. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns transport errors raised while flushing.
    fn close(&mut self) -> Result<()>;
}

/// Builds readers and writers for one format.
pub trait SerializationFactory: Send + Sync {
    fn format(&self) -> FileFormat;

    /// The configuration pipeline applied, in order, to every new serializer.
    fn configurations(&self) -> &[Configuration];

    /// Creates a reader decoding `data_type` records from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] if the options are malformed or a
    /// configuration step fails.
    fn create_reader<'a>(
        &self,
        source: Box<dyn Read + 'a>,
        data_type: DataType,
        options: &Options,
    ) -> Result<Box<dyn DataReader + 'a>>;

    /// Creates a writer encoding `data_type` records into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] if the options are malformed or a
    /// configuration step fails.
    fn create_writer<'a>(
        &self,
        sink: Box<dyn Write + 'a>,
        data_type: DataType,
        options: &Options,
    ) -> Result<Box<dyn DataWriter + 'a>>;
}

/// Typed iterator over the records of a [`DataReader`].
///
/// Yields `Ok(None)` for null records. Iteration ends after the first error.
pub struct Records<'a, T> {
    reader: Box<dyn DataReader + 'a>,
    done: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: 'static> Records<'a, T> {
    pub fn new(reader: Box<dyn DataReader + 'a>) -> Self {
        Records {
            reader,
            done: false,
            _marker: PhantomData,
        }
    }

    /// Gives back the underlying reader.
    pub fn into_inner(self) -> Box<dyn DataReader + 'a> {
        self.reader
    }
}

impl<'a, T: 'static> Iterator for Records<'a, T> {
    type Item = Result<Option<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.try_read() {
            Ok(Some(decoded)) => {
                let item = unbox_nullable::<T>(decoded);
                self.done = item.is_err();
                Some(item)
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
