use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dataio::{
    CsvConverter, CsvRecord, CsvRow, CsvSerializationFactory, CsvSerializerContext, DataIO,
    FileFormat, JsonSerializationFactory, NamingContext, Options, Result, SerdeConverter,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Default)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Clone, Default)]
struct Shipment {
    id: u32,
    product: Option<Product>,
    weight: f64,
}

struct ProductConverter;

impl CsvConverter for ProductConverter {
    type Target = Product;

    fn write_header(&self, record: &mut CsvRecord, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
        for name in ["Sku", "Name", "Price", "Quantity"] {
            record.write_raw(naming.get(name)?);
        }
        Ok(())
    }

    fn try_read(&self, row: &CsvRow, _ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<Option<Product>> {
        let (Some(sku), Some(name), Some(price), Some(quantity)) = (
            row.get_field(&naming.get("Sku")?),
            row.get_field(&naming.get("Name")?),
            row.get_field(&naming.get("Price")?),
            row.get_field(&naming.get("Quantity")?),
        ) else {
            return Ok(None);
        };
        Ok(Some(Product {
            sku,
            name,
            price,
            quantity,
        }))
    }

    fn write(&self, data: &Product, record: &mut CsvRecord, _ctx: &CsvSerializerContext) -> Result<()> {
        record.write_field(&data.sku);
        record.write_field(&data.name);
        record.write_field(&data.price);
        record.write_field(&data.quantity);
        Ok(())
    }
}

struct ShipmentConverter;

impl CsvConverter for ShipmentConverter {
    type Target = Shipment;

    fn write_header(&self, record: &mut CsvRecord, ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<()> {
        record.write_raw(naming.get("Id")?);
        ctx.write_member_header::<Product>(record, naming, "Product")?;
        record.write_raw(naming.get("Weight")?);
        Ok(())
    }

    fn try_read(&self, row: &CsvRow, ctx: &CsvSerializerContext, naming: &NamingContext) -> Result<Option<Shipment>> {
        let Some(id) = row.get_field(&naming.get("Id")?) else {
            return Ok(None);
        };
        Ok(Some(Shipment {
            id,
            product: ctx.deserialize_nullable_member::<Product>(row, naming, "Product")?,
            weight: row.get_field(&naming.get("Weight")?).unwrap_or_default(),
        }))
    }

    fn write(&self, data: &Shipment, record: &mut CsvRecord, ctx: &CsvSerializerContext) -> Result<()> {
        record.write_field(&data.id);
        ctx.serialize_nullable(record, data.product.as_ref())?;
        record.write_field(&data.weight);
        Ok(())
    }
}

fn io() -> DataIO {
    DataIO::empty()
        .with_factory(
            CsvSerializationFactory::new()
                .with_converter(ProductConverter)
                .with_converter(ShipmentConverter),
        )
        .with_factory(
            JsonSerializationFactory::new()
                .with_converter(SerdeConverter::<Product>::new())
                .with_converter(SerdeConverter::<Shipment>::new()),
        )
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn shipments(size: u32) -> Vec<Shipment> {
    products(size)
        .into_iter()
        .enumerate()
        .map(|(i, product)| Shipment {
            id: i as u32,
            product: (i % 3 != 0).then_some(product),
            weight: i as f64 * 0.5,
        })
        .collect()
}

fn encode<T: Clone + 'static>(io: &DataIO, items: &[T], format: FileFormat) -> Vec<u8> {
    let mut out = Vec::new();
    io.write_output(items.to_vec(), &mut out, format, &Options::default())
        .unwrap();
    out
}

fn decode<T: Default + 'static>(io: &DataIO, input: &[u8], format: FileFormat) -> Vec<T> {
    io.read_input(input, format, &Options::default())
        .unwrap()
        .collect::<Result<_>>()
        .unwrap()
}

fn benchmark_write(c: &mut Criterion) {
    let io = io();

    for format in FileFormat::ALL {
        let mut group = c.benchmark_group(format!("write_products_{}", format.name().to_lowercase()));
        for size in [10, 100, 1000] {
            let items = products(size);
            group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
                b.iter(|| encode(&io, black_box(items), format))
            });
        }
        group.finish();
    }
}

fn benchmark_read(c: &mut Criterion) {
    let io = io();

    for format in FileFormat::ALL {
        let mut group = c.benchmark_group(format!("read_products_{}", format.name().to_lowercase()));
        for size in [10, 100, 1000] {
            let input = encode(&io, &products(size), format);
            group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
                b.iter(|| decode::<Product>(&io, black_box(input), format))
            });
        }
        group.finish();
    }
}

fn benchmark_nested(c: &mut Criterion) {
    let io = io();
    let items = shipments(500);
    let mut group = c.benchmark_group("nested_shipments");

    for format in FileFormat::ALL {
        let input = encode(&io, &items, format);
        let name = format.name().to_lowercase();

        group.bench_function(format!("{}_write", name), |b| {
            b.iter(|| encode(&io, black_box(&items), format))
        });
        group.bench_function(format!("{}_read", name), |b| {
            b.iter(|| decode::<Shipment>(&io, black_box(&input), format))
        });
    }
    group.finish();
}

fn benchmark_pretty_json(c: &mut Criterion) {
    let io = io();
    let items = products(500);
    let pretty = Options::new().with_pretty(true);

    c.bench_function("write_products_json_pretty", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            io.write_output(black_box(items.clone()), &mut out, FileFormat::Json, &pretty)
                .unwrap();
            out
        })
    });
}

criterion_group!(
    benches,
    benchmark_write,
    benchmark_read,
    benchmark_nested,
    benchmark_pretty_json
);
criterion_main!(benches);
