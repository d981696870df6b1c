use crate::data::DataWriter;
use crate::json::context::JsonSerializerContext;
use crate::json::framer::StreamingFramer;
use crate::types::DataType;
use crate::Result;
use std::any::Any;
use std::io::Write;
use tracing::debug;

/// Streams records into one JSON document through a [`StreamingFramer`].
///
/// Dropping the writer closes it.
pub struct JsonDataWriter<W: Write> {
    framer: Option<StreamingFramer<W>>,
    context: JsonSerializerContext,
    data_type: DataType,
}

impl<W: Write> JsonDataWriter<W> {
    pub fn new(sink: W, context: JsonSerializerContext, data_type: DataType) -> Self {
        let framer = StreamingFramer::new(sink, context.pretty);
        JsonDataWriter {
            framer: Some(framer),
            context,
            data_type,
        }
    }

    pub fn context(&self) -> &JsonSerializerContext {
        &self.context
    }
}

impl<W: Write> DataWriter for JsonDataWriter<W> {
    fn data_type(&self) -> &DataType {
        &self.data_type
    }

    fn can_write(&self, data_type: &DataType) -> bool {
        self.framer.is_some() && self.data_type.id() == data_type.id()
    }

    fn write(&mut self, data: Option<&dyn Any>) -> Result<()> {
        let Some(framer) = self.framer.as_mut() else {
            return Ok(());
        };
        let value = self.context.encode(data, &self.data_type)?;
        framer.write(value)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(framer) = self.framer.take() {
            framer.finish()?;
            debug!(data_type = self.data_type.name(), "json stream closed");
        }
        Ok(())
    }
}

impl<W: Write> Drop for JsonDataWriter<W> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            debug!(error = %e, "json stream failed to close");
        }
    }
}
