//! Property-based tests over generated records and names
//!
//! These complement the integration tests by checking the roundtrip and naming
//! guarantees across a wide range of inputs.

mod common;

use common::*;
use dataio::{FileFormat, HeaderTransform, NamingContext, Options, Result, StreamingFramer};
use proptest::prelude::*;
use serde_json::{json, Value};

fn csv_roundtrip<T: Clone + 'static>(items: &[Option<T>], options: &Options) -> Result<Vec<Option<T>>> {
    let mut out = Vec::new();
    io().write_output_nullable(items.to_vec(), &mut out, FileFormat::Csv, options)?;
    let result = io().read_input_nullable(out.as_slice(), FileFormat::Csv, options)?
        .collect();
    result
}

fn multiple_values() -> impl Strategy<Value = MultipleValues> {
    (any::<i32>(), "[^\r\n]{0,16}").prop_map(|(id, name)| MultipleValues { id, name })
}

// Quarter steps are exact in binary, so both formats print and parse them losslessly.
fn composite_struct() -> impl Strategy<Value = CompositeStruct> {
    (any::<i32>(), -4_000_000i32..4_000_000).prop_map(|(id, quarters)| CompositeStruct {
        id,
        duration: f64::from(quarters) / 4.0,
    })
}

proptest! {
    #[test]
    fn prop_root_names_are_trimmed(name in "[A-Za-z][A-Za-z0-9_]{0,12}", pad in " {0,3}") {
        let root = NamingContext::new(HeaderTransform::Preserve);
        let padded = format!("{}{}{}", pad, name, pad);
        prop_assert_eq!(root.get(&padded).unwrap(), name);
    }

    #[test]
    fn prop_nested_names_join_with_delimiter(
        outer in "[A-Za-z]{1,8}",
        inner in "[A-Za-z]{1,8}",
        leaf in "[A-Za-z]{1,8}",
        delimiter in prop::sample::select(vec!["", ".", "_", "::"]),
    ) {
        let root = NamingContext::new(HeaderTransform::Preserve);
        let nested = root
            .descend_with(&outer, delimiter)
            .unwrap()
            .descend(&inner)
            .unwrap();

        prop_assert_eq!(
            nested.get(&leaf).unwrap(),
            format!("{}{d}{}{d}{}", outer, inner, leaf, d = delimiter)
        );
        prop_assert_eq!(
            nested.get_default(&leaf).unwrap(),
            format!("{}{}{}", outer, delimiter, inner)
        );
    }

    #[test]
    fn prop_blank_names_are_rejected(blank in " {0,4}") {
        let root = NamingContext::new(HeaderTransform::Preserve);
        prop_assert!(root.get(&blank).is_err());
        prop_assert!(root.get_default(&blank).is_err());
        prop_assert!(root.descend(&blank).is_err());
    }

    #[test]
    fn prop_csv_roundtrip_multiple_values(
        items in prop::collection::vec(proptest::option::of(multiple_values()), 0..20)
    ) {
        prop_assert_eq!(csv_roundtrip(&items, &Options::default()).unwrap(), items);
    }

    #[test]
    fn prop_csv_roundtrip_with_semicolons(
        items in prop::collection::vec(proptest::option::of(composite_struct()), 0..20)
    ) {
        let options = Options::new()
            .with_delimiter(dataio::Delimiter::Semicolon)
            .with_culture(dataio::Culture::invariant().with_decimal_separator(','));
        prop_assert_eq!(csv_roundtrip(&items, &options).unwrap(), items);
    }

    #[test]
    fn prop_json_roundtrip(items in prop::collection::vec(composite_struct(), 0..20)) {
        let mut out = Vec::new();
        io().write_output(items.clone(), &mut out, FileFormat::Json, &Options::default()).unwrap();
        let back: Vec<CompositeStruct> = io()
            .read_input(out.as_slice(), FileFormat::Json, &Options::default())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        prop_assert_eq!(back, items);
    }

    #[test]
    fn prop_framer_wraps_only_many(values in prop::collection::vec(any::<i64>(), 0..10), pretty in any::<bool>()) {
        let mut framer = StreamingFramer::new(Vec::new(), pretty);
        for value in &values {
            framer.write(json!(value)).unwrap();
        }
        let text = String::from_utf8(framer.finish().unwrap()).unwrap();

        match values.len() {
            0 => prop_assert_eq!(text, ""),
            1 => prop_assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), json!(values[0])),
            _ => prop_assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), json!(values)),
        }
    }

    #[test]
    fn prop_extension_wins(stem in "[a-z0-9_]{1,10}", upper in any::<bool>()) {
        let extension = if upper { "CSV" } else { "csv" };
        let name = format!("{}.{}", stem, extension);
        prop_assert_eq!(io().resolve_format(&name, FileFormat::Json), FileFormat::Csv);
        prop_assert_eq!(io().resolve_format(&stem, FileFormat::Json), FileFormat::Json);
    }
}
