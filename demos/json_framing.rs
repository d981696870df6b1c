//! Streaming records into one JSON document.
//!
//! Run with: cargo run --example json_framing

use dataio::{
    DataIO, DataType, FileFormat, JsonSerializationFactory, Observer, Options, SerdeConverter,
};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Event {
    id: u32,
    kind: String,
    #[serde(default)]
    tags: Vec<String>,
}

fn event(id: u32, kind: &str) -> Event {
    Event {
        id,
        kind: kind.to_string(),
        tags: Vec::new(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let io = DataIO::empty().with_factory(
        JsonSerializationFactory::new().with_converter(SerdeConverter::<Event>::new()),
    );

    // The framing depends on how many records the stream carries
    for count in 0..3 {
        let events: Vec<Event> = (0..count).map(|id| event(id, "click")).collect();
        let mut out = Vec::new();
        io.write_output(events, &mut out, FileFormat::Json, &Options::default())?;
        println!("{} record(s): {:?}", count, String::from_utf8(out)?);
    }

    // Records pushed one at a time, null records included
    println!("\nPretty, pushed through a writer:");
    let mut out = Vec::new();
    {
        let mut writer = io.writer(
            &mut out,
            FileFormat::Json,
            DataType::nullable::<Event>(),
            &Options::new().with_pretty(true),
        )?;
        writer.write(Some(&event(1, "open")))?;
        writer.write(None)?;
        writer.write(Some(&event(2, "close")))?;
        writer.close()?;
    }
    println!("{}", String::from_utf8(out.clone())?);

    // Reading back: null elements become `None`
    let back = io
        .read_input_nullable::<Event>(out.as_slice(), FileFormat::Json, &Options::default())?
        .collect::<Result<Vec<_>, _>>()?;
    println!("\nRead back: {:?}", back);

    // An observer receiving every record of a document
    struct Counter(usize);

    impl Observer<Event> for Counter {
        fn on_next(&mut self, _item: Event) {
            self.0 += 1;
        }
        fn on_error(&mut self, error: dataio::Error) {
            eprintln!("stream failed: {}", error);
        }
        fn on_completed(&mut self) {
            println!("Observed {} events", self.0);
        }
    }

    let mut counter = Counter(0);
    io.read_into::<Event, _>(out.as_slice(), FileFormat::Json, &Options::default(), &mut counter);

    Ok(())
}
