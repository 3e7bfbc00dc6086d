//! `Reflect` implementations for standard library, `chrono` and `uuid` types.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};

use serde_json::Value as Json;

use crate::reflect::{type_info_of, zero_of, Kind, Reflect, Scalar, TypeInfo, Value};

macro_rules! impl_signed {
    ( $( $ty:ty => $kind:ident ),* $(,)? ) => {
        $(
            impl Reflect for $ty {
                fn type_info(&self) -> TypeInfo {
                    TypeInfo::new(stringify!($ty), Kind::$kind)
                }

                fn reflect(&self) -> Value<'_> {
                    Value::Scalar(Scalar::Int(*self as i64))
                }
            }
        )*
    };
}

macro_rules! impl_unsigned {
    ( $( $ty:ty => $kind:ident ),* $(,)? ) => {
        $(
            impl Reflect for $ty {
                fn type_info(&self) -> TypeInfo {
                    TypeInfo::new(stringify!($ty), Kind::$kind)
                }

                fn reflect(&self) -> Value<'_> {
                    Value::Scalar(Scalar::Uint(*self as u64))
                }
            }
        )*
    };
}

impl_signed! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
}

impl_unsigned! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

impl Reflect for f32 {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("f32", Kind::F32)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Scalar(Scalar::Float(f64::from(*self)))
    }
}

impl Reflect for f64 {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("f64", Kind::F64)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Scalar(Scalar::Float(*self))
    }
}

impl Reflect for bool {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("bool", Kind::Bool)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Scalar(Scalar::Bool(*self))
    }
}

impl Reflect for String {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("String", Kind::String)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Scalar(Scalar::Str(Cow::Borrowed(self.as_str())))
    }
}

impl Reflect for char {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("char", Kind::String)
    }

    fn reflect(&self) -> Value<'_> {
        let zero = *self == char::default();
        Value::Scalar(Scalar::Formatted {
            text: self.to_string(),
            zero,
        })
    }
}

impl Reflect for Json {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("Value", Kind::Other)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Scalar(Scalar::Formatted {
            text: self.to_string(),
            zero: self.is_null(),
        })
    }
}

// ── Wrappers ────────────────────────────────────────────────────────────────

impl<T: Reflect + Default + 'static> Reflect for Option<T> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("Option", Kind::Optional).with_elem(type_info_of::<T>)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Optional {
            inner: self.as_ref().map(|v| v as &dyn Reflect),
            zero: zero_of::<T>,
        }
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn type_info(&self) -> TypeInfo {
        (**self).type_info()
    }

    fn reflect(&self) -> Value<'_> {
        (**self).reflect()
    }

    fn enum_values(&self) -> Option<Vec<Json>> {
        (**self).enum_values()
    }

    fn description(&self) -> Option<String> {
        (**self).description()
    }

    fn schema_name(&self) -> Option<String> {
        (**self).schema_name()
    }

    fn shim(&self) -> Option<Box<dyn Reflect>> {
        (**self).shim()
    }
}

// ── Collections ─────────────────────────────────────────────────────────────

impl<T: Reflect + Default + 'static> Reflect for Vec<T> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("Vec", Kind::Seq).with_elem(type_info_of::<T>)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Seq {
            first: self.first().map(|v| v as &dyn Reflect),
            zero: zero_of::<T>,
        }
    }
}

impl<T: Reflect + Default + 'static> Reflect for VecDeque<T> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("VecDeque", Kind::Seq).with_elem(type_info_of::<T>)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Seq {
            first: self.front().map(|v| v as &dyn Reflect),
            zero: zero_of::<T>,
        }
    }
}

impl<T: Reflect + Default + 'static, const N: usize> Reflect for [T; N] {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("array", Kind::Seq).with_elem(type_info_of::<T>)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Seq {
            first: self.first().map(|v| v as &dyn Reflect),
            zero: zero_of::<T>,
        }
    }
}

impl<K, V: Reflect + Default + 'static, S> Reflect for HashMap<K, V, S> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("HashMap", Kind::Map).with_elem(type_info_of::<V>)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Map {
            first: self.values().next().map(|v| v as &dyn Reflect),
            zero: zero_of::<V>,
        }
    }
}

impl<K, V: Reflect + Default + 'static> Reflect for BTreeMap<K, V> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("BTreeMap", Kind::Map).with_elem(type_info_of::<V>)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Map {
            first: self.values().next().map(|v| v as &dyn Reflect),
            zero: zero_of::<V>,
        }
    }
}

// ── Date/time and UUID ──────────────────────────────────────────────────────

impl Reflect for chrono::DateTime<chrono::Utc> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("DateTime", Kind::DateTime)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Scalar(Scalar::Formatted {
            text: self.to_rfc3339(),
            zero: *self == Self::default(),
        })
    }
}

impl Reflect for chrono::DateTime<chrono::FixedOffset> {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("DateTime", Kind::DateTime)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Scalar(Scalar::Formatted {
            text: self.to_rfc3339(),
            zero: *self == Self::default(),
        })
    }
}

impl Reflect for chrono::NaiveDateTime {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("NaiveDateTime", Kind::DateTime)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Scalar(Scalar::Formatted {
            text: self.format("%Y-%m-%dT%H:%M:%S").to_string(),
            zero: *self == Self::default(),
        })
    }
}

impl Reflect for uuid::Uuid {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::new("Uuid", Kind::Uuid)
    }

    fn reflect(&self) -> Value<'_> {
        Value::Scalar(Scalar::Formatted {
            text: self.to_string(),
            zero: self.is_nil(),
        })
    }
}
