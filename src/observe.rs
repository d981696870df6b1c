//! Push-based adaptation of readers and writers.
//!
//! [`DataIO::read_into`] drives an [`Observer`] from a reader: records arrive in input
//! order, and the first error ends the sequence. [`WriterObserver`] goes the other way
//! and feeds pushed records into a writer.
//!
//! ```rust
//! use dataio::{DataIO, FileFormat, JsonSerializationFactory, Observer, Options, SerdeConverter};
//!
//! #[derive(Default)]
//! struct Sum {
//!     total: i64,
//!     done: bool,
//! }
//!
//! impl Observer<i64> for Sum {
//!     fn on_next(&mut self, item: i64) {
//!         self.total += item;
//!     }
//!     fn on_error(&mut self, _error: dataio::Error) {}
//!     fn on_completed(&mut self) {
//!         self.done = true;
//!     }
//! }
//!
//! let io = DataIO::empty()
//!     .with_factory(JsonSerializationFactory::new().with_converter(SerdeConverter::<i64>::new()));
//! let mut sum = Sum::default();
//! io.read_into::<i64, _>("[1,2,3]".as_bytes(), FileFormat::Json, &Options::default(), &mut sum);
//! assert_eq!(sum.total, 6);
//! assert!(sum.done);
//! ```

use crate::data::DataWriter;
use crate::io::DataIO;
use crate::{Error, FileFormat, Options, Result};
use std::io::{Read, Write};
use std::marker::PhantomData;
use tracing::debug;

/// Receiver of a pushed record sequence.
///
/// A sequence is any number of `on_next` calls followed by at most one of
/// `on_error` or `on_completed`.
pub trait Observer<T> {
    fn on_next(&mut self, item: T);

    fn on_error(&mut self, error: Error);

    fn on_completed(&mut self);
}

impl DataIO {
    /// Reads every record of `source` and pushes it into `observer`.
    pub fn read_into<T, O>(&self, source: impl Read, format: FileFormat, options: &Options, observer: &mut O)
    where
        T: Default + 'static,
        O: Observer<T> + ?Sized,
    {
        let records = match self.read_input::<T>(source, format, options) {
            Ok(records) => records,
            Err(e) => return observer.on_error(e),
        };

        for record in records {
            match record {
                Ok(item) => observer.on_next(item),
                Err(e) => return observer.on_error(e),
            }
        }
        observer.on_completed();
    }

    /// An observer writing every pushed record into `sink`.
    ///
    /// # Errors
    ///
    /// Fails like [`DataIO::writer`].
    pub fn writer_observer<'a, T: 'static>(
        &self,
        sink: impl Write + 'a,
        format: FileFormat,
        options: &Options,
    ) -> Result<WriterObserver<'a, T>> {
        let writer = self.writer(sink, format, crate::DataType::nullable::<T>(), options)?;
        Ok(WriterObserver::new(writer))
    }
}

/// Writes pushed records into a [`DataWriter`].
///
/// The writer is closed when the sequence completes or fails, or when a write fails;
/// records pushed after that are dropped. The first failure is kept for
/// [`finish`](Self::finish).
pub struct WriterObserver<'a, T> {
    writer: Box<dyn DataWriter + 'a>,
    error: Option<Error>,
    closed: bool,
    _marker: PhantomData<fn(T)>,
}

impl<'a, T: 'static> WriterObserver<'a, T> {
    pub fn new(writer: Box<dyn DataWriter + 'a>) -> Self {
        WriterObserver {
            writer,
            error: None,
            closed: false,
            _marker: PhantomData,
        }
    }

    fn fail(&mut self, error: Error) {
        debug!(error = %error, "writer observer failed");
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.close();
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.writer.close() {
            if self.error.is_none() {
                self.error = Some(e);
            }
        }
    }

    /// Closes the writer and reports the first failure of the sequence.
    ///
    /// # Errors
    ///
    /// Returns the error pushed through `on_error`, or the first write or close error.
    pub fn finish(mut self) -> Result<()> {
        self.close();
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<'a, T: 'static> Observer<T> for WriterObserver<'a, T> {
    fn on_next(&mut self, item: T) {
        if self.closed {
            return;
        }
        if let Err(e) = self.writer.write(Some(&item)) {
            self.fail(e);
        }
    }

    fn on_error(&mut self, error: Error) {
        self.fail(error);
    }

    fn on_completed(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonSerializationFactory, SerdeConverter};

    #[derive(Default)]
    struct Collect {
        items: Vec<i32>,
        error: Option<Error>,
        completed: bool,
    }

    impl Observer<i32> for Collect {
        fn on_next(&mut self, item: i32) {
            self.items.push(item);
        }

        fn on_error(&mut self, error: Error) {
            self.error = Some(error);
        }

        fn on_completed(&mut self) {
            self.completed = true;
        }
    }

    fn io() -> DataIO {
        DataIO::empty()
            .with_factory(JsonSerializationFactory::new().with_converter(SerdeConverter::<i32>::new()))
    }

    #[test]
    fn test_read_into_preserves_order() {
        let mut collect = Collect::default();
        io().read_into::<i32, _>("[3,1,2]".as_bytes(), FileFormat::Json, &Options::default(), &mut collect);
        assert_eq!(collect.items, vec![3, 1, 2]);
        assert!(collect.completed);
        assert!(collect.error.is_none());
    }

    #[test]
    fn test_read_into_stops_at_first_error() {
        let mut collect = Collect::default();
        let options = Options::new().with_throw_on_failed_decode(true);
        io().read_into::<i32, _>(r#"[1,"x",2]"#.as_bytes(), FileFormat::Json, &options, &mut collect);
        assert_eq!(collect.items, vec![1]);
        assert!(matches!(collect.error, Some(Error::Decode { .. })));
        assert!(!collect.completed);
    }

    #[test]
    fn test_read_into_unsupported_format() {
        let mut collect = Collect::default();
        io().read_into::<i32, _>("".as_bytes(), FileFormat::Csv, &Options::default(), &mut collect);
        assert!(matches!(collect.error, Some(Error::UnsupportedFormat(FileFormat::Csv))));
    }

    #[test]
    fn test_writer_observer() {
        let mut out = Vec::new();
        {
            let mut observer = io()
                .writer_observer::<i32>(&mut out, FileFormat::Json, &Options::default())
                .unwrap();
            observer.on_next(1);
            observer.on_next(2);
            observer.on_completed();
            observer.on_next(3);
            observer.finish().unwrap();
        }
        assert_eq!(out, b"[1,2]");
    }

    #[test]
    fn test_writer_observer_keeps_pushed_error() {
        let mut out = Vec::new();
        let mut observer = io()
            .writer_observer::<i32>(&mut out, FileFormat::Json, &Options::default())
            .unwrap();
        observer.on_next(1);
        observer.on_error(Error::custom("upstream"));
        assert!(matches!(observer.finish(), Err(Error::Custom(_))));
    }
}
