//! Array framing for streamed documents.
//!
//! The number of items is unknown until the stream ends, so the first item is held
//! back: a single item is written as the document root, while a second item opens
//! an array around both.
//!
//! ```rust
//! use dataio::StreamingFramer;
//! use serde_json::json;
//!
//! let mut one = StreamingFramer::new(Vec::new(), false);
//! one.write(json!({"id": 1})).unwrap();
//! assert_eq!(one.finish().unwrap(), br#"{"id":1}"#);
//!
//! let mut two = StreamingFramer::new(Vec::new(), false);
//! two.write(json!(1)).unwrap();
//! two.write(json!(2)).unwrap();
//! assert_eq!(two.finish().unwrap(), b"[1,2]");
//! ```

use crate::Result;
use serde_json::Value;
use std::io::Write;
use std::mem;
use tracing::trace;

enum Frame {
    Empty,
    Pending(Value),
    Started,
}

/// Writes JSON values to a sink, wrapping them in an array only when there are two
/// or more.
pub struct StreamingFramer<W: Write> {
    sink: W,
    frame: Frame,
    pretty: bool,
}

impl<W: Write> StreamingFramer<W> {
    /// With `pretty`, array elements are written one per line.
    pub fn new(sink: W, pretty: bool) -> Self {
        StreamingFramer {
            sink,
            frame: Frame::Empty,
            pretty,
        }
    }

    /// Returns `true` once an array has been opened.
    pub fn is_started(&self) -> bool {
        matches!(self.frame, Frame::Started)
    }

    /// Writes one item.
    ///
    /// # Errors
    ///
    /// Returns transport errors of the sink.
    pub fn write(&mut self, item: Value) -> Result<()> {
        match mem::replace(&mut self.frame, Frame::Started) {
            Frame::Empty => {
                self.frame = Frame::Pending(item);
            }
            Frame::Pending(first) => {
                trace!("second item, opening array");
                let open: &[u8] = if self.pretty { b"[\n" } else { b"[" };
                self.sink.write_all(open)?;
                self.write_value(&first)?;
                self.write_separator()?;
                self.write_value(&item)?;
            }
            Frame::Started => {
                self.write_separator()?;
                self.write_value(&item)?;
            }
        }
        Ok(())
    }

    /// Writes whatever framing is still owed, flushes and gives back the sink.
    ///
    /// # Errors
    ///
    /// Returns transport errors of the sink.
    pub fn finish(mut self) -> Result<W> {
        match mem::replace(&mut self.frame, Frame::Empty) {
            Frame::Empty => {}
            Frame::Pending(item) => self.write_value(&item)?,
            Frame::Started => {
                let close: &[u8] = if self.pretty { b"\n]" } else { b"]" };
                self.sink.write_all(close)?;
            }
        }
        self.sink.flush()?;
        Ok(self.sink)
    }

    fn write_separator(&mut self) -> Result<()> {
        let separator: &[u8] = if self.pretty { b",\n" } else { b"," };
        self.sink.write_all(separator)?;
        Ok(())
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        serde_json::to_writer(&mut self.sink, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn framed(items: Vec<Value>, pretty: bool) -> String {
        let mut framer = StreamingFramer::new(Vec::new(), pretty);
        for item in items {
            framer.write(item).unwrap();
        }
        String::from_utf8(framer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_no_items_writes_nothing() {
        assert_eq!(framed(vec![], false), "");
    }

    #[test]
    fn test_single_item_is_unwrapped() {
        assert_eq!(framed(vec![json!({"a": 1})], false), r#"{"a":1}"#);
        assert_eq!(framed(vec![json!([1, 2])], false), "[1,2]");
    }

    #[test]
    fn test_many_items_are_wrapped() {
        assert_eq!(
            framed(vec![json!({"a": 1}), json!({"a": 2}), json!(null)], false),
            r#"[{"a":1},{"a":2},null]"#
        );
    }

    #[test]
    fn test_pretty_puts_elements_on_lines() {
        assert_eq!(framed(vec![json!(1), json!(2)], true), "[\n1,\n2\n]");
        assert_eq!(framed(vec![json!(1)], true), "1");
    }

    #[test]
    fn test_nothing_written_before_second_item() {
        let mut framer = StreamingFramer::new(Vec::new(), false);
        framer.write(json!(1)).unwrap();
        assert!(!framer.is_started());
        assert!(framer.sink.is_empty());
        framer.write(json!(2)).unwrap();
        assert!(framer.is_started());
    }
}
