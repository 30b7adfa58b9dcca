//! Best-effort conversion of column values
//!
//! Every accessor on [`TypedValue`] is total. A value that cannot be read as
//! the requested type degrades to that type's default (`0`, `""`, or the zero
//! timestamp) instead of failing the row.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;

use crate::config::{CoercionConfig, TimeZoneSetting};
use crate::value::Scalar;

static DEFAULT_CONFIG: Lazy<CoercionConfig> = Lazy::new(CoercionConfig::default);

/// The timestamp returned when no timestamp can be read
pub fn zero_timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// A borrowed column value with typed views over it
#[derive(Debug, Clone, Copy)]
pub struct TypedValue<'a> {
    value: &'a Scalar,
    config: &'a CoercionConfig,
}

impl<'a> TypedValue<'a> {
    /// Wrap a value using the default coercion configuration
    pub fn new(value: &'a Scalar) -> Self {
        Self {
            value,
            config: &DEFAULT_CONFIG,
        }
    }

    pub fn with_config(value: &'a Scalar, config: &'a CoercionConfig) -> Self {
        Self { value, config }
    }

    /// True for NULL, empty bytes and empty text. Numeric zero is not empty.
    pub fn is_empty(&self) -> bool {
        match self.value {
            Scalar::Null => true,
            Scalar::Bytes(b) => b.is_empty(),
            Scalar::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_string(&self) -> String {
        match self.value {
            Scalar::I8(i) => i.to_string(),
            Scalar::I16(i) => i.to_string(),
            Scalar::I32(i) => i.to_string(),
            Scalar::I64(i) => i.to_string(),
            Scalar::U8(u) => u.to_string(),
            Scalar::U16(u) => u.to_string(),
            Scalar::U32(u) => u.to_string(),
            Scalar::U64(u) => u.to_string(),
            Scalar::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
            Scalar::Text(s) => s.clone(),
            Scalar::Null | Scalar::Timestamp(_) => String::new(),
        }
    }

    /// Integer view. Unsigned values above `i64::MAX` wrap; unparsable text
    /// yields 0.
    pub fn as_i64(&self) -> i64 {
        match self.value {
            Scalar::I8(i) => i64::from(*i),
            Scalar::I16(i) => i64::from(*i),
            Scalar::I32(i) => i64::from(*i),
            Scalar::I64(i) => *i,
            Scalar::U8(u) => i64::from(*u),
            Scalar::U16(u) => i64::from(*u),
            Scalar::U32(u) => i64::from(*u),
            Scalar::U64(u) => *u as i64,
            Scalar::Text(s) => parse_i64_or_zero(s),
            Scalar::Bytes(b) => parse_i64_or_zero(&String::from_utf8_lossy(b)),
            Scalar::Null | Scalar::Timestamp(_) => 0,
        }
    }

    /// Strict integer view: `None` when the value does not fit in an `i64`
    /// or is not an integer at all
    pub fn try_as_i64(&self) -> Option<i64> {
        match self.value {
            Scalar::U64(u) => i64::try_from(*u).ok(),
            Scalar::Text(s) => s.parse().ok(),
            Scalar::Bytes(b) => std::str::from_utf8(b).ok()?.parse().ok(),
            Scalar::Null | Scalar::Timestamp(_) => None,
            _ => Some(self.as_i64()),
        }
    }

    /// Timestamp view. Text and bytes are parsed with the configured layout
    /// in the configured zone.
    pub fn as_timestamp(&self) -> DateTime<Utc> {
        match self.value {
            Scalar::Timestamp(dt) => *dt,
            Scalar::Text(s) => self.parse_timestamp(s),
            Scalar::Bytes(b) => self.parse_timestamp(&String::from_utf8_lossy(b)),
            _ => zero_timestamp(),
        }
    }

    /// The wrapped value, untouched
    pub fn raw(&self) -> &'a Scalar {
        self.value
    }

    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    pub fn config(&self) -> &'a CoercionConfig {
        self.config
    }

    fn parse_timestamp(&self, text: &str) -> DateTime<Utc> {
        match parse_in_zone(text, &self.config.time_layout, self.config.time_zone) {
            Some(dt) => dt,
            None => {
                tracing::trace!(
                    "Cannot read '{}' with layout '{}', using zero timestamp",
                    text,
                    self.config.time_layout
                );
                zero_timestamp()
            }
        }
    }
}

fn parse_i64_or_zero(text: &str) -> i64 {
    text.parse::<i64>().unwrap_or_else(|e| {
        tracing::trace!("Cannot read '{}' as an integer ({}), using 0", text, e);
        0
    })
}

/// Parse `text` with `layout`. An offset in the layout wins over `zone`; a
/// date-only layout reads as midnight.
fn parse_in_zone(text: &str, layout: &str, zone: TimeZoneSetting) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_str(text, layout) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(text, layout)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, layout)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    zone.resolve(&naive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn utc_config() -> CoercionConfig {
        CoercionConfig::new().with_time_zone(TimeZoneSetting::Utc)
    }

    #[test]
    fn test_is_empty() {
        assert!(TypedValue::new(&Scalar::Null).is_empty());
        assert!(TypedValue::new(&Scalar::Bytes(Vec::new())).is_empty());
        assert!(TypedValue::new(&Scalar::Text(String::new())).is_empty());

        assert!(!TypedValue::new(&Scalar::I64(0)).is_empty());
        assert!(!TypedValue::new(&Scalar::U8(0)).is_empty());
        assert!(!TypedValue::new(&Scalar::Text("0".into())).is_empty());
        assert!(!TypedValue::new(&Scalar::Timestamp(zero_timestamp())).is_empty());
    }

    #[test]
    fn test_as_i64_width_round_trip() {
        let cases = [
            (Scalar::I8(i8::MIN), i8::MIN as i64),
            (Scalar::I16(i16::MIN), i16::MIN as i64),
            (Scalar::I32(-7), -7),
            (Scalar::I64(i64::MAX), i64::MAX),
            (Scalar::U8(u8::MAX), 255),
            (Scalar::U16(u16::MAX), 65_535),
            (Scalar::U32(u32::MAX), 4_294_967_295),
            (Scalar::U64(42), 42),
        ];
        for (scalar, expected) in cases {
            assert_eq!(TypedValue::new(&scalar).as_i64(), expected, "{scalar:?}");
        }
    }

    #[test]
    fn test_as_i64_wraps_large_unsigned() {
        let v = Scalar::U64(u64::MAX);
        assert_eq!(TypedValue::new(&v).as_i64(), -1);
        assert_eq!(TypedValue::new(&v).try_as_i64(), None);
    }

    #[test]
    fn test_as_i64_soft_fails() {
        assert_eq!(TypedValue::new(&Scalar::Text("42x".into())).as_i64(), 0);
        assert_eq!(TypedValue::new(&Scalar::Text("-42".into())).as_i64(), -42);
        assert_eq!(TypedValue::new(&Scalar::Bytes(b"1234".to_vec())).as_i64(), 1234);
        assert_eq!(TypedValue::new(&Scalar::Null).as_i64(), 0);
        assert_eq!(TypedValue::new(&Scalar::Timestamp(zero_timestamp())).as_i64(), 0);

        assert_eq!(TypedValue::new(&Scalar::Text("42x".into())).try_as_i64(), None);
        assert_eq!(TypedValue::new(&Scalar::I16(-3)).try_as_i64(), Some(-3));
    }

    #[test]
    fn test_as_string() {
        assert_eq!(TypedValue::new(&Scalar::I8(-5)).as_string(), "-5");
        assert_eq!(TypedValue::new(&Scalar::U64(u64::MAX)).as_string(), "18446744073709551615");
        assert_eq!(TypedValue::new(&Scalar::Bytes(b"ada".to_vec())).as_string(), "ada");
        assert_eq!(TypedValue::new(&Scalar::Text("lovelace".into())).as_string(), "lovelace");
        assert_eq!(TypedValue::new(&Scalar::Null).as_string(), "");
        assert_eq!(TypedValue::new(&Scalar::Timestamp(zero_timestamp())).as_string(), "");
    }

    #[test]
    fn test_as_timestamp_from_text() {
        let config = utc_config();
        let text = Scalar::Text("2024-03-01 12:30:45".into());
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap();

        assert_eq!(TypedValue::with_config(&text, &config).as_timestamp(), expected);

        let bytes = Scalar::Bytes(b"2024-03-01 12:30:45".to_vec());
        assert_eq!(TypedValue::with_config(&bytes, &config).as_timestamp(), expected);
    }

    #[test]
    fn test_as_timestamp_in_fixed_zone() {
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let config = CoercionConfig::new().with_time_zone(TimeZoneSetting::Fixed(offset));
        let text = Scalar::Text("2024-03-01 08:00:00".into());

        assert_eq!(
            TypedValue::with_config(&text, &config).as_timestamp(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_as_timestamp_date_only_layout() {
        let config = utc_config().with_time_layout("%Y-%m-%d");
        let text = Scalar::Text("1815-12-10".into());

        assert_eq!(
            TypedValue::with_config(&text, &config).as_timestamp(),
            Utc.with_ymd_and_hms(1815, 12, 10, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_as_timestamp_layout_with_offset() {
        let config = utc_config().with_time_layout("%Y-%m-%d %H:%M:%S %z");
        let text = Scalar::Text("2024-03-01 08:00:00 +0800".into());

        assert_eq!(
            TypedValue::with_config(&text, &config).as_timestamp(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_as_timestamp_soft_fails() {
        let config = utc_config();
        let garbage = Scalar::Text("yesterday".into());
        assert_eq!(TypedValue::with_config(&garbage, &config).as_timestamp(), zero_timestamp());
        assert_eq!(TypedValue::new(&Scalar::I64(1_700_000_000)).as_timestamp(), zero_timestamp());
        assert_eq!(TypedValue::new(&Scalar::Null).as_timestamp(), zero_timestamp());
    }

    #[test]
    fn test_native_timestamp_is_verbatim() {
        let at = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap();
        let v = Scalar::Timestamp(at);
        assert_eq!(TypedValue::new(&v).as_timestamp(), at);
    }

    #[test]
    fn test_raw_and_type_name() {
        let v = Scalar::U32(9);
        let typed = TypedValue::new(&v);
        assert_eq!(typed.raw(), &Scalar::U32(9));
        assert_eq!(typed.type_name(), "u32");
    }
}
