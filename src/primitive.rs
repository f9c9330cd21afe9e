//! # Primitive Conversion
//!
//! Best-effort conversion between scalar kinds: checked integer narrowing,
//! float rounding, string parsing and the bool/char special cases. Every
//! failure is `None`.

use chrono::{NaiveDate, NaiveDateTime};

use crate::metadata::PrimitiveKind;
use crate::value::{Value, DATETIME_FORMAT};

const DATETIME_INPUT_FORMATS: [&str; 2] = [DATETIME_FORMAT, "%Y-%m-%dT%H:%M:%S"];

/// Intermediate numeric form of a source value
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i128),
    Float(f64),
}

fn as_number(value: &Value) -> Option<Number> {
    let number = match value {
        Value::I8(n) => Number::Int(i128::from(*n)),
        Value::I16(n) => Number::Int(i128::from(*n)),
        Value::I32(n) => Number::Int(i128::from(*n)),
        Value::I64(n) => Number::Int(i128::from(*n)),
        Value::U8(n) => Number::Int(i128::from(*n)),
        Value::U16(n) => Number::Int(i128::from(*n)),
        Value::U32(n) => Number::Int(i128::from(*n)),
        Value::U64(n) => Number::Int(i128::from(*n)),
        Value::F32(n) => Number::Float(f64::from(*n)),
        Value::F64(n) => Number::Float(*n),
        Value::Bool(b) => Number::Int(i128::from(*b)),
        Value::Enum(e) => Number::Int(i128::from(e.discriminant)),
        _ => return None,
    };
    Some(number)
}

/// Integer part used when a number lands in an integer kind
fn to_integer(number: Number) -> Option<i128> {
    match number {
        Number::Int(n) => Some(n),
        Number::Float(f) if f.is_finite() => {
            let rounded = f.round_ties_even();
            // Bounds of i128 are far outside every target kind
            if rounded.abs() < 1e30 {
                Some(rounded as i128)
            } else {
                None
            }
        }
        Number::Float(_) => None,
    }
}

fn to_float(number: Number) -> f64 {
    match number {
        Number::Int(n) => n as f64,
        Number::Float(f) => f,
    }
}

fn integer_value(n: i128, kind: PrimitiveKind) -> Option<Value> {
    let value = match kind {
        PrimitiveKind::I8 => Value::I8(i8::try_from(n).ok()?),
        PrimitiveKind::I16 => Value::I16(i16::try_from(n).ok()?),
        PrimitiveKind::I32 => Value::I32(i32::try_from(n).ok()?),
        PrimitiveKind::I64 => Value::I64(i64::try_from(n).ok()?),
        PrimitiveKind::U8 => Value::U8(u8::try_from(n).ok()?),
        PrimitiveKind::U16 => Value::U16(u16::try_from(n).ok()?),
        PrimitiveKind::U32 => Value::U32(u32::try_from(n).ok()?),
        PrimitiveKind::U64 => Value::U64(u64::try_from(n).ok()?),
        _ => return None,
    };
    Some(value)
}

fn number_to_kind(number: Number, kind: PrimitiveKind) -> Option<Value> {
    match kind {
        k if k.is_integer() => integer_value(to_integer(number)?, k),
        PrimitiveKind::F32 => Some(Value::F32(to_float(number) as f32)),
        PrimitiveKind::F64 => Some(Value::F64(to_float(number))),
        PrimitiveKind::Bool => Some(Value::Bool(match number {
            Number::Int(n) => n != 0,
            Number::Float(f) => f != 0.0,
        })),
        PrimitiveKind::Char => match number {
            Number::Int(n) => u32::try_from(n).ok().and_then(char::from_u32).map(Value::Char),
            Number::Float(_) => None,
        },
        _ => None,
    }
}

pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_to_kind(text: &str, kind: PrimitiveKind) -> Option<Value> {
    let trimmed = text.trim();
    match kind {
        k if k.is_integer() => integer_value(trimmed.parse::<i128>().ok()?, k),
        PrimitiveKind::F32 => trimmed.parse::<f32>().ok().map(Value::F32),
        PrimitiveKind::F64 => trimmed.parse::<f64>().ok().map(Value::F64),
        PrimitiveKind::Bool => {
            if trimmed.eq_ignore_ascii_case("true") {
                Some(Value::Bool(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Some(Value::Bool(false))
            } else {
                None
            }
        }
        PrimitiveKind::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        PrimitiveKind::DateTime => parse_datetime(trimmed).map(Value::DateTime),
        _ => None,
    }
}

/// Convert `value` to `kind`
pub fn convert_primitive(value: &Value, kind: PrimitiveKind) -> Option<Value> {
    if value.primitive_kind() == Some(kind) {
        return Some(value.clone());
    }

    match value {
        Value::String(text) => parse_to_kind(text, kind),
        Value::Char(c) if kind.is_integer() => integer_value(i128::from(u32::from(*c)), kind),
        Value::Char(_) | Value::DateTime(_) => None,
        other => number_to_kind(as_number(other)?, kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_and_checked_narrowing() {
        assert_eq!(convert_primitive(&Value::I32(30), PrimitiveKind::I64), Some(Value::I64(30)));
        assert_eq!(convert_primitive(&Value::I64(300), PrimitiveKind::U8), None);
        assert_eq!(convert_primitive(&Value::I32(-1), PrimitiveKind::U32), None);
        assert_eq!(
            convert_primitive(&Value::U64(u64::MAX), PrimitiveKind::I64),
            None
        );
    }

    #[test]
    fn floats_round_half_to_even() {
        assert_eq!(convert_primitive(&Value::F64(2.5), PrimitiveKind::I32), Some(Value::I32(2)));
        assert_eq!(convert_primitive(&Value::F64(3.5), PrimitiveKind::I32), Some(Value::I32(4)));
        assert_eq!(convert_primitive(&Value::F64(f64::NAN), PrimitiveKind::I32), None);
        assert_eq!(convert_primitive(&Value::F64(1e20), PrimitiveKind::I32), None);
    }

    #[test]
    fn strings_parse_into_scalars() {
        assert_eq!(convert_primitive(&Value::from(" 42 "), PrimitiveKind::I32), Some(Value::I32(42)));
        assert_eq!(convert_primitive(&Value::from("1.5"), PrimitiveKind::I32), None);
        assert_eq!(convert_primitive(&Value::from("1.5"), PrimitiveKind::F64), Some(Value::F64(1.5)));
        assert_eq!(convert_primitive(&Value::from("TRUE"), PrimitiveKind::Bool), Some(Value::Bool(true)));
        assert_eq!(convert_primitive(&Value::from("yes"), PrimitiveKind::Bool), None);
        assert_eq!(convert_primitive(&Value::from("x"), PrimitiveKind::Char), Some(Value::Char('x')));
        assert_eq!(convert_primitive(&Value::from("xy"), PrimitiveKind::Char), None);
    }

    #[test]
    fn datetime_accepts_date_only_and_iso_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .unwrap();
        assert_eq!(
            convert_primitive(&Value::from("2024-03-01T12:30:00"), PrimitiveKind::DateTime),
            Some(Value::DateTime(expected))
        );
        assert_eq!(
            convert_primitive(&Value::from("2024-03-01 12:30:00"), PrimitiveKind::DateTime),
            Some(Value::DateTime(expected))
        );
        assert!(convert_primitive(&Value::from("2024-03-01"), PrimitiveKind::DateTime).is_some());
        assert_eq!(convert_primitive(&Value::I64(0), PrimitiveKind::DateTime), None);
    }

    #[test]
    fn bool_and_char_special_cases() {
        assert_eq!(convert_primitive(&Value::Bool(true), PrimitiveKind::I32), Some(Value::I32(1)));
        assert_eq!(convert_primitive(&Value::I32(0), PrimitiveKind::Bool), Some(Value::Bool(false)));
        assert_eq!(convert_primitive(&Value::Char('A'), PrimitiveKind::U8), Some(Value::U8(65)));
        assert_eq!(convert_primitive(&Value::I32(97), PrimitiveKind::Char), Some(Value::Char('a')));
        assert_eq!(convert_primitive(&Value::Char('A'), PrimitiveKind::F64), None);
    }

    #[test]
    fn null_and_objects_never_convert() {
        assert_eq!(convert_primitive(&Value::Null, PrimitiveKind::I32), None);
    }
}
