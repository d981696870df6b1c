//! Record types and converters shared by the integration tests.

#![allow(dead_code)]

use dataio::{
    CsvConverter, CsvRecord, CsvRow, CsvSerializationFactory, CsvSerializerContext, DataIO,
    JsonConverter, JsonSerializationFactory, JsonSerializerContext, NamingContext, Result,
};
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleIntValue {
    pub value: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleNullableIntValue {
    pub value: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleStringValue {
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipleValues {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompositeStruct {
    pub id: i32,
    pub duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeObject {
    pub single: Option<SingleIntValue>,
    pub composite: Option<MultipleValues>,
    pub double: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SingleNullableStructValue {
    pub value: Option<CompositeStruct>,
}

pub struct SingleIntValueConverter;

impl CsvConverter for SingleIntValueConverter {
    type Target = SingleIntValue;

    fn write_header(&self, record: &mut CsvRecord, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
        record.write_raw(naming.get_default("Value")?);
        Ok(())
    }

    fn try_read(&self, row: &CsvRow, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<Option<SingleIntValue>> {
        Ok(row
            .get_field(&naming.get_default("Value")?)
            .map(|value| SingleIntValue { value }))
    }

    fn write(&self, data: &SingleIntValue, record: &mut CsvRecord, _ctx: &CsvSerializerContext) -> Result<()> {
        record.write_field(&data.value);
        Ok(())
    }
}

pub struct SingleNullableIntValueConverter;

impl CsvConverter for SingleNullableIntValueConverter {
    type Target = SingleNullableIntValue;

    fn write_header(&self, record: &mut CsvRecord, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
        record.write_raw(naming.get_default("Value")?);
        Ok(())
    }

    fn try_read(
        &self,
        row: &CsvRow,
        _ctx: &CsvSerializerContext,
        naming: &NamingContext,
    ) -> Result<Option<SingleNullableIntValue>> {
        Ok(row
            .get_field(&naming.get_default("Value")?)
            .map(|value| SingleNullableIntValue { value }))
    }

    fn write(&self, data: &SingleNullableIntValue, record: &mut CsvRecord, _ctx: &CsvSerializerContext) -> Result<()> {
        record.write_field(&data.value);
        Ok(())
    }
}

pub struct SingleStringValueConverter;

impl CsvConverter for SingleStringValueConverter {
    type Target = SingleStringValue;

    fn write_header(&self, record: &mut CsvRecord, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
        record.write_raw(naming.get_default("Value")?);
        Ok(())
    }

    fn try_read(&self, row: &CsvRow, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<Option<SingleStringValue>> {
        Ok(row
            .get_field(&naming.get_default("Value")?)
            .map(|value| SingleStringValue { value }))
    }

    fn write(&self, data: &SingleStringValue, record: &mut CsvRecord, _ctx: &CsvSerializerContext) -> Result<()> {
        record.write_field(&data.value);
        Ok(())
    }
}

pub struct MultipleValuesConverter;

impl CsvConverter for MultipleValuesConverter {
    type Target = MultipleValues;

    fn write_header(&self, record: &mut CsvRecord, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
        record.write_raw(naming.get("Id")?);
        record.write_raw(naming.get("Name")?);
        Ok(())
    }

    fn try_read(&self, row: &CsvRow, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<Option<MultipleValues>> {
        let id = row.get_field(&naming.get("Id")?);
        let name = row.get_field(&naming.get("Name")?);
        Ok(id.zip(name).map(|(id, name)| MultipleValues { id, name }))
    }

    fn write(&self, data: &MultipleValues, record: &mut CsvRecord, _ctx: &CsvSerializerContext) -> Result<()> {
        record.write_field(&data.id);
        record.write_field(&data.name);
        Ok(())
    }
}

pub struct CompositeStructConverter;

impl CsvConverter for CompositeStructConverter {
    type Target = CompositeStruct;

    fn write_header(&self, record: &mut CsvRecord, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
        record.write_raw(naming.get("Id")?);
        record.write_raw(naming.get("Duration")?);
        Ok(())
    }

    fn try_read(&self, row: &CsvRow, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<Option<CompositeStruct>> {
        let id = row.get_field(&naming.get("Id")?);
        let duration = row.get_field(&naming.get("Duration")?);
        Ok(id.zip(duration).map(|(id, duration)| CompositeStruct { id, duration }))
    }

    fn write(&self, data: &CompositeStruct, record: &mut CsvRecord, _ctx: &CsvSerializerContext) -> Result<()> {
        record.write_field(&data.id);
        record.write_field(&data.duration);
        Ok(())
    }
}

pub struct CompositeObjectConverter;

impl CsvConverter for CompositeObjectConverter {
    type Target = CompositeObject;

    fn write_header(&self, record: &mut CsvRecord, ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
        ctx.write_member_header::<SingleIntValue>(record, naming, "Single")?;
        ctx.write_member_header::<MultipleValues>(record, naming, "Composite")?;
        record.write_raw(naming.get("Double")?);
        Ok(())
    }

    fn try_read(&self, row: &CsvRow, ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<Option<CompositeObject>> {
        let single = ctx.deserialize_nullable_member::<SingleIntValue>(row, naming, "Single")?;
        let composite = ctx.deserialize_nullable_member::<MultipleValues>(row, naming, "Composite")?;
        let Some(double) = row.get_field::<f64>(&naming.get("Double")?) else {
            return Ok(None);
        };
        Ok(Some(CompositeObject {
            single,
            composite,
            double,
        }))
    }

    fn write(&self, data: &CompositeObject, record: &mut CsvRecord, ctx: &CsvSerializerContext) -> Result<()> {
        ctx.serialize_nullable(record, data.single.as_ref())?;
        ctx.serialize_nullable(record, data.composite.as_ref())?;
        record.write_field(&data.double);
        Ok(())
    }
}

pub struct SingleNullableStructValueConverter;

impl CsvConverter for SingleNullableStructValueConverter {
    type Target = SingleNullableStructValue;

    fn write_header(&self, record: &mut CsvRecord, ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
        ctx.write_member_header::<CompositeStruct>(record, naming, "Value")
    }

    fn try_read(
        &self,
        row: &CsvRow,
        ctx: &CsvSerializerContext,
        naming: &NamingContext,
    ) -> Result<Option<SingleNullableStructValue>> {
        let value = ctx.deserialize_nullable_member::<CompositeStruct>(row, naming, "Value")?;
        Ok(Some(SingleNullableStructValue { value }))
    }

    fn write(&self, data: &SingleNullableStructValue, record: &mut CsvRecord, ctx: &CsvSerializerContext) -> Result<()> {
        ctx.serialize_nullable(record, data.value.as_ref())
    }
}

pub struct CompositeStructJsonConverter;

impl JsonConverter for CompositeStructJsonConverter {
    type Target = CompositeStruct;

    fn can_write(&self) -> bool {
        true
    }

    fn convert(&self, value: &Value, ctx: &JsonSerializerContext) -> Result<Option<CompositeStruct>> {
        if !value.is_object() {
            return Ok(None);
        }
        Ok(Some(CompositeStruct {
            id: ctx.value_or_default(value, "Id")?,
            duration: ctx.value_or_default(value, "Duration")?,
        }))
    }

    fn convert_back(&self, data: &CompositeStruct, _ctx: &JsonSerializerContext) -> Result<Value> {
        Ok(json!({ "Id": data.id, "Duration": data.duration }))
    }
}

/// A CSV factory with every fake converter registered.
pub fn csv_factory() -> CsvSerializationFactory {
    CsvSerializationFactory::new()
        .with_converter(SingleIntValueConverter)
        .with_converter(SingleNullableIntValueConverter)
        .with_converter(SingleStringValueConverter)
        .with_converter(MultipleValuesConverter)
        .with_converter(CompositeStructConverter)
        .with_converter(CompositeObjectConverter)
        .with_converter(SingleNullableStructValueConverter)
}

pub fn json_factory() -> JsonSerializationFactory {
    JsonSerializationFactory::new().with_converter(CompositeStructJsonConverter)
}

pub fn io() -> DataIO {
    DataIO::empty()
        .with_factory(csv_factory())
        .with_factory(json_factory())
}

pub fn lines(lines: &[&str]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}
