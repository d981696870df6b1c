use crate::config::{Configuration, SerializerMut};
use crate::data::{DataReader, DataWriter, SerializationFactory};
use crate::json::context::JsonSerializerContext;
use crate::json::converter::JsonConverter;
use crate::json::reader::JsonDataReader;
use crate::json::writer::JsonDataWriter;
use crate::{DataAccess, DataType, FileFormat, Options, Result};
use std::io::{Read, Write};
use tracing::debug;

/// Builds JSON readers and writers.
///
/// Every serializer starts from the settings in [`Options`], then runs the factory's
/// configuration steps in order, then appends the converters carried by the options.
#[derive(Clone, Debug, Default)]
pub struct JsonSerializationFactory {
    configurations: Vec<Configuration>,
}

impl JsonSerializationFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configurations.push(configuration);
        self
    }

    #[must_use]
    pub fn with_converter<C: JsonConverter>(self, converter: C) -> Self {
        self.with_configuration(Configuration::json_converter(converter))
    }

    /// Builds the registry for one serializer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] for invalid options, and any error of a
    /// configuration step.
    pub fn create_serializer(
        &self,
        access: DataAccess,
        data_type: &DataType,
        options: &Options,
    ) -> Result<JsonSerializerContext> {
        options.validate()?;

        let mut context = JsonSerializerContext::from_options(options);
        for configuration in &self.configurations {
            configuration.apply(SerializerMut::Json(&mut context), access, data_type, options)?;
        }
        for converter in options
            .converters
            .json()
            .iter()
            .filter(|c| access.permits(c.can_read(), c.can_write()))
        {
            context.add_shared(converter.clone());
        }

        debug!(
            %access,
            data_type = data_type.name(),
            converters = context.converters().len(),
            "json serializer created"
        );
        Ok(context)
    }
}

impl SerializationFactory for JsonSerializationFactory {
    fn format(&self) -> FileFormat {
        FileFormat::Json
    }

    fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    fn create_reader<'a>(
        &self,
        source: Box<dyn Read + 'a>,
        data_type: DataType,
        options: &Options,
    ) -> Result<Box<dyn DataReader + 'a>> {
        let context = self.create_serializer(DataAccess::Read, &data_type, options)?;
        Ok(Box::new(JsonDataReader::new(source, context, data_type)))
    }

    fn create_writer<'a>(
        &self,
        sink: Box<dyn Write + 'a>,
        data_type: DataType,
        options: &Options,
    ) -> Result<Box<dyn DataWriter + 'a>> {
        let context = self.create_serializer(DataAccess::Write, &data_type, options)?;
        Ok(Box::new(JsonDataWriter::new(sink, context, data_type)))
    }
}
