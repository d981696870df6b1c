//! Row cursors handed to tabular converters.

use crate::csv::field::CsvField;
use crate::{Culture, HeaderTransform};
use ::csv::StringRecord;
use indexmap::IndexMap;

/// The current input row together with the header it is matched against.
#[derive(Debug, Clone, Default)]
pub struct CsvRow {
    record: StringRecord,
    header: IndexMap<String, usize>,
    transform: HeaderTransform,
    culture: Culture,
}

impl CsvRow {
    pub fn new(transform: HeaderTransform, culture: Culture) -> Self {
        CsvRow {
            record: StringRecord::new(),
            header: IndexMap::new(),
            transform,
            culture,
        }
    }

    /// Adopts the current row as the header.
    ///
    /// Names are trimmed and normalized with the header transform. When a name
    /// repeats, the first column keeps it.
    pub fn read_header(&mut self) {
        self.header.clear();
        for (index, name) in self.record.iter().enumerate() {
            self.header
                .entry(self.transform.apply(name.trim()))
                .or_insert(index);
        }
    }

    /// Header names in column order.
    pub fn header(&self) -> impl Iterator<Item = &str> {
        self.header.keys().map(String::as_str)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.header.contains_key(name)
    }

    /// Raw text of the field called `name`, if the header has it and the row reaches it.
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.header
            .get(name)
            .and_then(|&index| self.record.get(index))
    }

    /// Parses the field called `name`; `None` if it is missing or malformed.
    pub fn get_field<T: CsvField>(&self, name: &str) -> Option<T> {
        self.get_raw(name)
            .and_then(|field| T::from_field(field, &self.culture))
    }

    pub fn record(&self) -> &StringRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut StringRecord {
        &mut self.record
    }

    pub fn culture(&self) -> &Culture {
        &self.culture
    }
}

/// Fields of the output row being assembled.
#[derive(Debug, Clone, Default)]
pub struct CsvRecord {
    fields: Vec<String>,
    culture: Culture,
}

impl CsvRecord {
    pub fn new(culture: Culture) -> Self {
        CsvRecord {
            fields: Vec::new(),
            culture,
        }
    }

    pub fn write_field<T: CsvField>(&mut self, value: &T) {
        let field = value.to_field(&self.culture);
        self.fields.push(field);
    }

    pub fn write_raw(&mut self, field: impl Into<String>) {
        self.fields.push(field.into());
    }

    pub fn write_empty(&mut self) {
        self.fields.push(String::new());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn culture(&self) -> &Culture {
        &self.culture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(header: &[&str], values: &[&str], transform: HeaderTransform) -> CsvRow {
        let mut row = CsvRow::new(transform, Culture::invariant());
        *row.record_mut() = StringRecord::from(header.to_vec());
        row.read_header();
        *row.record_mut() = StringRecord::from(values.to_vec());
        row
    }

    #[test]
    fn test_lookup_by_header_name() {
        let row = row(&["Id", " Name "], &["1", "Apple"], HeaderTransform::Preserve);
        assert_eq!(row.get_field::<i32>("Id"), Some(1));
        assert_eq!(row.get_raw("Name"), Some("Apple"));
        assert_eq!(row.get_raw("Missing"), None);
    }

    #[test]
    fn test_duplicate_header_keeps_first() {
        let row = row(&["A", "A"], &["1", "2"], HeaderTransform::Preserve);
        assert_eq!(row.get_field::<i32>("A"), Some(1));
        assert_eq!(row.header().count(), 1);
    }

    #[test]
    fn test_header_transform_on_match() {
        let row = row(&["VALUE"], &["3"], HeaderTransform::Lowercase);
        assert!(row.has_field("value"));
        assert!(!row.has_field("VALUE"));
    }

    #[test]
    fn test_short_row() {
        let row = row(&["A", "B"], &["1"], HeaderTransform::Preserve);
        assert_eq!(row.get_raw("B"), None);
    }

    #[test]
    fn test_record_fields() {
        let mut record = CsvRecord::new(Culture::invariant().with_decimal_separator(','));
        record.write_field(&1.5f64);
        record.write_empty();
        record.write_raw("x");
        assert_eq!(record.fields(), &["1,5", "", "x"]);
        record.clear();
        assert!(record.is_empty());
    }
}
