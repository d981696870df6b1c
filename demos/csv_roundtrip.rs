//! Writing and reading nested records as CSV.
//!
//! Run with: cargo run --example csv_roundtrip

use dataio::{
    CsvConverter, CsvRecord, CsvRow, CsvSerializationFactory, CsvSerializerContext, DataIO,
    Delimiter, FileFormat, NamingContext, Options, Result,
};
use std::error::Error;

#[derive(Debug, Default, Clone, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Sample {
    label: String,
    position: Option<Point>,
    weight: f64,
}

struct PointConverter;

impl CsvConverter for PointConverter {
    type Target = Point;

    fn write_header(&self, record: &mut CsvRecord, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
        record.write_raw(naming.get("X")?);
        record.write_raw(naming.get("Y")?);
        Ok(())
    }

    fn try_read(&self, row: &CsvRow, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<Option<Point>> {
        let x = row.get_field(&naming.get("X")?);
        let y = row.get_field(&naming.get("Y")?);
        Ok(x.zip(y).map(|(x, y)| Point { x, y }))
    }

    fn write(&self, data: &Point, record: &mut CsvRecord, _ctx: &CsvSerializerContext) -> Result<()> {
        record.write_field(&data.x);
        record.write_field(&data.y);
        Ok(())
    }
}

struct SampleConverter;

impl CsvConverter for SampleConverter {
    type Target = Sample;

    fn write_header(&self, record: &mut CsvRecord, ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
        record.write_raw(naming.get("Label")?);
        ctx.write_member_header::<Point>(record, naming, "Position")?;
        record.write_raw(naming.get("Weight")?);
        Ok(())
    }

    fn try_read(&self, row: &CsvRow, ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<Option<Sample>> {
        let Some(label) = row.get_field(&naming.get("Label")?) else {
            return Ok(None);
        };
        Ok(Some(Sample {
            label,
            position: ctx.deserialize_nullable_member::<Point>(row, naming, "Position")?,
            weight: row.get_field(&naming.get("Weight")?).unwrap_or_default(),
        }))
    }

    fn write(&self, data: &Sample, record: &mut CsvRecord, ctx: &CsvSerializerContext) -> Result<()> {
        record.write_field(&data.label);
        ctx.serialize_nullable(record, data.position.as_ref())?;
        record.write_field(&data.weight);
        Ok(())
    }
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let io = DataIO::empty().with_factory(
        CsvSerializationFactory::new()
            .with_converter(PointConverter)
            .with_converter(SampleConverter),
    );

    let samples = vec![
        Sample {
            label: "origin".to_string(),
            position: Some(Point { x: 0.0, y: 0.0 }),
            weight: 1.0,
        },
        Sample {
            label: "unplaced".to_string(),
            position: None,
            weight: 0.25,
        },
        Sample {
            label: "far, far away".to_string(),
            position: Some(Point { x: 120.5, y: -3.75 }),
            weight: 2.5,
        },
    ];

    // Nested members are flattened into prefixed columns
    println!("Default options:");
    let mut out = Vec::new();
    io.write_output(samples.clone(), &mut out, FileFormat::Csv, &Options::default())?;
    println!("{}", String::from_utf8(out)?);

    // A nesting delimiter and a tab-separated layout
    println!("Dotted names, tab delimiter:");
    let options = Options::new()
        .with_nesting_delimiter(".")
        .with_delimiter(Delimiter::Tab);
    let mut out = Vec::new();
    io.write_output(samples.clone(), &mut out, FileFormat::Csv, &options)?;
    println!("{}", String::from_utf8(out.clone())?);

    let back: Vec<Sample> = io
        .read_input(out.as_slice(), FileFormat::Csv, &options)?
        .collect::<Result<_>>()?;
    println!("Read back {} samples, identical: {}", back.len(), back == samples);

    Ok(())
}
