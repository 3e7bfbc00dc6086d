//! Type classifier: maps a type descriptor to a JSON Schema `(type, format)` pair.

use crate::reflect::{Kind, TypeInfo};
use crate::schema::{Format, SchemaType};

/// Classify a type descriptor.
///
/// Total: kinds without a JSON shape fall back to `(string, string)`.
pub fn classify(info: &TypeInfo) -> (SchemaType, Format) {
    match info.kind {
        Kind::DateTime => return (SchemaType::String, Format::DateTime),
        Kind::Uuid => return (SchemaType::String, Format::Uuid),
        _ => {}
    }

    if info.enumerable {
        return (SchemaType::Object, Format::Enum);
    }

    match info.kind {
        Kind::I8 | Kind::I16 | Kind::I32 | Kind::U8 | Kind::U16 | Kind::U32 => {
            (SchemaType::Integer, Format::Int32)
        }
        Kind::I64 | Kind::Isize | Kind::U64 | Kind::Usize => (SchemaType::Integer, Format::Int64),
        Kind::F32 => (SchemaType::Number, Format::Float),
        Kind::F64 => (SchemaType::Number, Format::Double),
        Kind::String => (SchemaType::String, Format::String),
        Kind::Bool => (SchemaType::Boolean, Format::Boolean),
        Kind::Struct => (SchemaType::Object, Format::Object),
        Kind::Map => (SchemaType::Object, Format::Map),
        Kind::Seq => (SchemaType::Array, Format::Array),
        Kind::Optional => match info.elem() {
            Some(elem) => classify(&elem),
            None => (SchemaType::String, Format::String),
        },
        Kind::DateTime | Kind::Uuid | Kind::Other => (SchemaType::String, Format::String),
    }
}

/// Whether a value of this type can be documented as a schema at all.
pub fn is_valid_schema(info: &TypeInfo) -> bool {
    match info.kind {
        Kind::Other => false,
        Kind::Seq | Kind::Map | Kind::Optional => {
            info.elem().is_some_and(|elem| is_valid_schema(&elem))
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(kind: Kind) -> TypeInfo {
        TypeInfo::new("T", kind)
    }

    fn string_info() -> TypeInfo {
        info(Kind::String)
    }

    #[test]
    fn integer_widths() {
        assert_eq!(classify(&info(Kind::I16)), (SchemaType::Integer, Format::Int32));
        assert_eq!(classify(&info(Kind::U32)), (SchemaType::Integer, Format::Int32));
        assert_eq!(classify(&info(Kind::I64)), (SchemaType::Integer, Format::Int64));
        assert_eq!(classify(&info(Kind::Usize)), (SchemaType::Integer, Format::Int64));
    }

    #[test]
    fn floats() {
        assert_eq!(classify(&info(Kind::F32)), (SchemaType::Number, Format::Float));
        assert_eq!(classify(&info(Kind::F64)), (SchemaType::Number, Format::Double));
    }

    #[test]
    fn special_types_ignore_enumerable() {
        let dt = info(Kind::DateTime).enumerable();
        assert_eq!(classify(&dt), (SchemaType::String, Format::DateTime));
        assert_eq!(classify(&info(Kind::Uuid)), (SchemaType::String, Format::Uuid));
    }

    #[test]
    fn enumerable_marker() {
        let status = info(Kind::String).enumerable();
        assert_eq!(classify(&status), (SchemaType::Object, Format::Enum));
    }

    #[test]
    fn optional_recurses() {
        let opt = info(Kind::Optional).with_elem(string_info);
        assert_eq!(classify(&opt), (SchemaType::String, Format::String));
    }

    #[test]
    fn unknown_falls_back_to_string() {
        assert_eq!(classify(&info(Kind::Other)), (SchemaType::String, Format::String));
    }

    #[test]
    fn containers() {
        assert_eq!(classify(&info(Kind::Struct)), (SchemaType::Object, Format::Object));
        assert_eq!(classify(&info(Kind::Map)), (SchemaType::Object, Format::Map));
        assert_eq!(classify(&info(Kind::Seq)), (SchemaType::Array, Format::Array));
    }

    #[test]
    fn schema_validity() {
        assert!(is_valid_schema(&info(Kind::Seq).with_elem(string_info)));
        assert!(!is_valid_schema(&info(Kind::Other)));
        assert!(!is_valid_schema(&info(Kind::Seq)));
    }
}
