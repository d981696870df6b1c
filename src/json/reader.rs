use crate::data::DataReader;
use crate::json::context::JsonSerializerContext;
use crate::types::{DataType, Decoded};
use crate::{Error, Result};
use serde_json::Value;
use std::io::{BufRead, BufReader, Read};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Start,
    Elements,
    Tail,
    Done,
}

/// Reads the records of one JSON document.
///
/// An array root yields its elements, any other root is a single record and an
/// empty document yields none. Array elements are parsed one per read, so the
/// records before a malformed element or a failing source still arrive.
///
/// A writer emits a lone record as the bare document root. When the record type
/// is itself a sequence, such as `Vec<u8>` through a `SerdeConverter`, a one-record
/// stream is therefore written as `[1,2]` and reads back as one record per element.
pub struct JsonDataReader<R: Read> {
    source: BufReader<R>,
    context: JsonSerializerContext,
    data_type: DataType,
    cursor: Cursor,
    read: usize,
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

impl<R: Read> JsonDataReader<R> {
    pub fn new(source: R, context: JsonSerializerContext, data_type: DataType) -> Self {
        JsonDataReader {
            source: BufReader::new(source),
            context,
            data_type,
            cursor: Cursor::Start,
            read: 0,
        }
    }

    pub fn context(&self) -> &JsonSerializerContext {
        &self.context
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        Ok(self.source.fill_buf()?.first().copied())
    }

    fn skip_whitespace(&mut self) -> Result<Option<u8>> {
        loop {
            match self.peek()? {
                Some(byte) if is_whitespace(byte) => self.source.consume(1),
                other => return Ok(other),
            }
        }
    }

    /// Collects the bytes of the next array element and consumes the `,` or `]`
    /// after it. The flag is set when the array closed.
    fn next_element(&mut self) -> Result<(Vec<u8>, bool)> {
        let mut element = Vec::new();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        loop {
            let Some(byte) = self.peek()? else {
                return Err(Error::Json(format!(
                    "EOF while parsing element {} of the root array",
                    self.read + 1
                )));
            };
            self.source.consume(1);

            if in_string {
                if escaped {
                    escaped = false;
                } else if byte == b'\\' {
                    escaped = true;
                } else if byte == b'"' {
                    in_string = false;
                }
                element.push(byte);
                continue;
            }

            match byte {
                b',' | b']' if depth == 0 => return Ok((element, byte == b']')),
                b'[' | b'{' => depth += 1,
                b']' | b'}' => depth = depth.saturating_sub(1),
                b'"' => in_string = true,
                _ => {}
            }
            element.push(byte);
        }
    }

    fn advance(&mut self) -> Result<Option<Value>> {
        loop {
            match self.cursor {
                Cursor::Start => match self.skip_whitespace()? {
                    None => self.cursor = Cursor::Done,
                    Some(b'[') => {
                        self.source.consume(1);
                        if self.skip_whitespace()? == Some(b']') {
                            self.source.consume(1);
                            self.cursor = Cursor::Tail;
                        } else {
                            self.cursor = Cursor::Elements;
                        }
                        debug!(data_type = self.data_type.name(), "json root array opened");
                    }
                    Some(_) => {
                        let root = serde_json::from_reader::<_, Value>(&mut self.source)?;
                        self.cursor = Cursor::Done;
                        return Ok(Some(root));
                    }
                },
                Cursor::Elements => {
                    let (bytes, last) = self.next_element()?;
                    let item = serde_json::from_slice::<Value>(&bytes)?;
                    if last {
                        self.cursor = Cursor::Tail;
                    }
                    trace!(element = self.read, "json element parsed");
                    return Ok(Some(item));
                }
                Cursor::Tail => {
                    if self.skip_whitespace()?.is_some() {
                        return Err(Error::Json(
                            "trailing characters after the root array".to_string(),
                        ));
                    }
                    self.cursor = Cursor::Done;
                }
                Cursor::Done => return Ok(None),
            }
        }
    }
}

impl<R: Read> DataReader for JsonDataReader<R> {
    fn data_type(&self) -> &DataType {
        &self.data_type
    }

    fn try_read(&mut self) -> Result<Option<Decoded>> {
        let item = match self.advance() {
            Ok(Some(item)) => item,
            Ok(None) => {
                if self.read > 0 {
                    debug!(
                        data_type = self.data_type.name(),
                        items = self.read,
                        "json document finished"
                    );
                }
                return Ok(None);
            }
            Err(e) => {
                self.cursor = Cursor::Done;
                return Err(e);
            }
        };

        self.read += 1;
        Ok(Some(self.context.decode(&item, &self.data_type)?))
    }
}
