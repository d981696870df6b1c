//! Tabular format: a header line of qualified field names followed by one record per line.

mod context;
mod converter;
mod factory;
mod field;
mod reader;
mod row;
mod writer;

pub use context::CsvSerializerContext;
pub use converter::{erase, AnyCsvConverter, CsvConverter, FieldConverter};
pub use factory::CsvSerializationFactory;
pub use field::CsvField;
pub use reader::CsvDataReader;
pub use row::{CsvRecord, CsvRow};
pub use writer::CsvDataWriter;
