//! JSON format: one value, or an array of values once a stream holds two or more.

mod context;
mod converter;
mod factory;
mod framer;
mod reader;
mod writer;

pub use context::JsonSerializerContext;
pub use converter::{erase, AnyJsonConverter, JsonConverter, SerdeConverter};
pub use factory::JsonSerializationFactory;
pub use framer::StreamingFramer;
pub use reader::JsonDataReader;
pub use writer::JsonDataWriter;
