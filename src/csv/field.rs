//! Text codecs for single tabular fields.

use crate::Culture;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use num_bigint::BigInt;

/// A value stored in exactly one field.
///
/// `from_field` returns `None` when the text does not hold a valid value; callers
/// turn that into a read failure subject to the decode policy.
///
/// ```rust
/// use dataio::{CsvField, Culture};
///
/// let culture = Culture::invariant().with_decimal_separator(',');
/// assert_eq!(52.1f64.to_field(&culture), "52,1");
/// assert_eq!(f64::from_field("52,1", &culture), Some(52.1));
/// assert_eq!(i32::from_field("", &culture), None);
/// assert_eq!(Option::<i32>::from_field("", &culture), Some(None));
/// ```
pub trait CsvField: Sized {
    fn to_field(&self, culture: &Culture) -> String;

    fn from_field(field: &str, culture: &Culture) -> Option<Self>;
}

macro_rules! impl_integer_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CsvField for $ty {
                fn to_field(&self, _culture: &Culture) -> String {
                    self.to_string()
                }

                fn from_field(field: &str, _culture: &Culture) -> Option<Self> {
                    field.trim().parse().ok()
                }
            }
        )*
    };
}

impl_integer_field!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_float_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CsvField for $ty {
                fn to_field(&self, culture: &Culture) -> String {
                    culture.format_number(self.to_string())
                }

                fn from_field(field: &str, culture: &Culture) -> Option<Self> {
                    culture.normalize_number(field).parse().ok()
                }
            }
        )*
    };
}

impl_float_field!(f32, f64);

impl CsvField for bool {
    fn to_field(&self, _culture: &Culture) -> String {
        self.to_string()
    }

    fn from_field(field: &str, _culture: &Culture) -> Option<Self> {
        let field = field.trim();
        if field.eq_ignore_ascii_case("true") {
            Some(true)
        } else if field.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl CsvField for char {
    fn to_field(&self, _culture: &Culture) -> String {
        self.to_string()
    }

    fn from_field(field: &str, _culture: &Culture) -> Option<Self> {
        let mut chars = field.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl CsvField for String {
    fn to_field(&self, _culture: &Culture) -> String {
        self.clone()
    }

    fn from_field(field: &str, _culture: &Culture) -> Option<Self> {
        Some(field.to_string())
    }
}

impl CsvField for DateTime<Utc> {
    fn to_field(&self, culture: &Culture) -> String {
        match &culture.datetime_format {
            Some(format) => self.format(format).to_string(),
            None => self.to_rfc3339(),
        }
    }

    fn from_field(field: &str, culture: &Culture) -> Option<Self> {
        let field = field.trim();
        match &culture.datetime_format {
            Some(format) => NaiveDateTime::parse_from_str(field, format)
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive)),
            None => DateTime::parse_from_rfc3339(field)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl CsvField for NaiveDate {
    fn to_field(&self, _culture: &Culture) -> String {
        self.format("%Y-%m-%d").to_string()
    }

    fn from_field(field: &str, _culture: &Culture) -> Option<Self> {
        NaiveDate::parse_from_str(field.trim(), "%Y-%m-%d").ok()
    }
}

impl CsvField for BigInt {
    fn to_field(&self, _culture: &Culture) -> String {
        self.to_string()
    }

    fn from_field(field: &str, _culture: &Culture) -> Option<Self> {
        field.trim().parse().ok()
    }
}

/// An empty field is null.
impl<T: CsvField> CsvField for Option<T> {
    fn to_field(&self, culture: &Culture) -> String {
        match self {
            Some(value) => value.to_field(culture),
            None => String::new(),
        }
    }

    fn from_field(field: &str, culture: &Culture) -> Option<Self> {
        if field.trim().is_empty() {
            Some(None)
        } else {
            T::from_field(field, culture).map(Some)
        }
    }
}
