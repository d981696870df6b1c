use crate::csv::context::CsvSerializerContext;
use crate::csv::row::CsvRecord;
use crate::data::{DataWriter, StreamState};
use crate::naming::NamingContext;
use crate::types::DataType;
use crate::Result;
use ::csv::{Terminator, WriterBuilder};
use std::any::Any;
use std::io::Write;
use tracing::{debug, trace};

/// Writes one record per row after a header derived from the data type.
///
/// The header is written on the first record, or on close when no record was
/// written, so an empty stream still produces a header line. Dropping the writer
/// closes it.
pub struct CsvDataWriter<W: Write> {
    writer: Option<::csv::Writer<W>>,
    context: CsvSerializerContext,
    data_type: DataType,
    record: CsvRecord,
    naming: NamingContext,
    state: StreamState,
}

impl<W: Write> CsvDataWriter<W> {
    pub fn new(sink: W, context: CsvSerializerContext, data_type: DataType) -> Self {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .delimiter(context.delimiter.as_byte())
            .terminator(Terminator::Any(b'\n'))
            .from_writer(sink);
        let record = CsvRecord::new(context.culture.clone());
        let naming = context.root_naming();

        CsvDataWriter {
            writer: Some(writer),
            context,
            data_type,
            record,
            naming,
            state: StreamState::HeaderPending,
        }
    }

    pub fn context(&self) -> &CsvSerializerContext {
        &self.context
    }

    fn write_header(&mut self) -> Result<()> {
        self.state = StreamState::Streaming;
        self.record.clear();
        self.context
            .write_header(&mut self.record, &self.data_type, &self.naming)?;
        trace!(header = ?self.record.fields(), "writing header");
        self.flush_record()
    }

    fn flush_record(&mut self) -> Result<()> {
        if self.record.is_empty() {
            return Ok(());
        }
        if let Some(writer) = self.writer.as_mut() {
            writer.write_record(self.record.fields())?;
        }
        Ok(())
    }
}

impl<W: Write> DataWriter for CsvDataWriter<W> {
    fn data_type(&self) -> &DataType {
        &self.data_type
    }

    fn can_write(&self, data_type: &DataType) -> bool {
        self.state != StreamState::Closed && self.data_type.id() == data_type.id()
    }

    fn write(&mut self, data: Option<&dyn Any>) -> Result<()> {
        match self.state {
            StreamState::Closed => return Ok(()),
            StreamState::HeaderPending => self.write_header()?,
            StreamState::Streaming => {}
        }

        self.record.clear();
        self.context.encode(&mut self.record, data, &self.data_type)?;
        self.flush_record()
    }

    fn close(&mut self) -> Result<()> {
        let header = if self.state == StreamState::HeaderPending {
            self.write_header()
        } else {
            Ok(())
        };
        self.state = StreamState::Closed;

        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            debug!(data_type = self.data_type.name(), "csv stream closed");
        }
        header
    }
}

impl<W: Write> Drop for CsvDataWriter<W> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            debug!(error = %e, "csv stream failed to close");
        }
    }
}
