use crate::csv::context::CsvSerializerContext;
use crate::csv::row::CsvRow;
use crate::data::{DataReader, StreamState};
use crate::naming::NamingContext;
use crate::types::{DataType, Decoded};
use crate::Result;
use ::csv::ReaderBuilder;
use std::io::Read;
use tracing::trace;

/// Reads one record per row; the first row is the header.
pub struct CsvDataReader<R: Read> {
    reader: ::csv::Reader<R>,
    context: CsvSerializerContext,
    data_type: DataType,
    row: CsvRow,
    naming: NamingContext,
    state: StreamState,
}

impl<R: Read> CsvDataReader<R> {
    pub fn new(source: R, context: CsvSerializerContext, data_type: DataType) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(context.delimiter.as_byte())
            .from_reader(source);
        let row = CsvRow::new(context.header_transform.clone(), context.culture.clone());
        let naming = context.root_naming();

        CsvDataReader {
            reader,
            context,
            data_type,
            row,
            naming,
            state: StreamState::HeaderPending,
        }
    }

    pub fn context(&self) -> &CsvSerializerContext {
        &self.context
    }

    fn next_row(&mut self) -> Result<bool> {
        let more = self.reader.read_record(self.row.record_mut())?;
        if !more {
            self.state = StreamState::Closed;
        }
        Ok(more)
    }
}

impl<R: Read> DataReader for CsvDataReader<R> {
    fn data_type(&self) -> &DataType {
        &self.data_type
    }

    fn try_read(&mut self) -> Result<Option<Decoded>> {
        if self.state == StreamState::HeaderPending {
            if !self.next_row()? {
                return Ok(None);
            }
            self.context.read_header(&mut self.row, &self.data_type)?;
            self.state = StreamState::Streaming;
        }

        if self.state == StreamState::Closed || !self.next_row()? {
            return Ok(None);
        }

        trace!(line = ?self.row.record().position().map(|p| p.line()), "decoding row");
        let decoded = self
            .context
            .decode(&self.row, &self.data_type, &self.naming)?;
        Ok(Some(decoded))
    }
}
