//! Described-type model.
//!
//! Every documented type implements [`Reflect`]. A type reports a static
//! [`TypeInfo`] descriptor (what the classifier looks at) and a runtime
//! [`Value`] view (what the schema builder walks). Struct fields carry their
//! annotation strings in [`FieldTags`], exactly as they were declared.
//!
//! Optional capabilities (enumerable values, description, name override,
//! shim) are hooks with a `None` default; a type either overrides the hook or
//! it does not have the capability.
//!
//! `#[derive(Reflect)]` from `specula-macros` writes these impls for structs
//! and unit-only enums.

use std::borrow::Cow;

pub use serde_json::Value as Json;

/// Runtime kind of a described type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    /// Calendar date and time (`chrono` types).
    DateTime,
    /// 128-bit UUID.
    Uuid,
    Struct,
    Map,
    Seq,
    /// `Option<T>`: the only kind that renders as nullable.
    Optional,
    /// Anything the engine has no shape for.
    Other,
}

/// Static descriptor of a documented type.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// Declared type name, used as the definition key for structs and enums.
    pub name: &'static str,
    pub kind: Kind,
    /// The type exposes its legal value set through [`Reflect::enum_values`].
    pub enumerable: bool,
    /// Element type of sequences, value type of maps, pointee of optionals.
    pub elem: Option<fn() -> TypeInfo>,
}

impl TypeInfo {
    pub fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            enumerable: false,
            elem: None,
        }
    }

    /// Attach the element descriptor of a container type.
    pub fn with_elem(mut self, elem: fn() -> TypeInfo) -> Self {
        self.elem = Some(elem);
        self
    }

    /// Mark the type as exposing a finite value set.
    pub fn enumerable(mut self) -> Self {
        self.enumerable = true;
        self
    }

    /// Descriptor of the element type, if this is a container.
    pub fn elem(&self) -> Option<TypeInfo> {
        self.elem.map(|elem| elem())
    }

    /// Follow sequence and optional element types down to the innermost one.
    pub fn innermost(&self) -> TypeInfo {
        match (self.kind, self.elem()) {
            (Kind::Seq | Kind::Optional, Some(elem)) => elem.innermost(),
            _ => *self,
        }
    }
}

/// Annotation strings declared on a struct field.
///
/// Each slot holds the raw annotation text, or `""` when the annotation is
/// absent. The vocabulary is fixed: `json`, `query`, `form`, `swagger` and
/// `validate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldTags {
    pub json: &'static str,
    pub query: &'static str,
    pub form: &'static str,
    pub swagger: &'static str,
    pub validate: &'static str,
}

/// One field of a struct value.
pub struct Field<'a> {
    /// Declared field name.
    pub name: &'static str,
    pub tags: FieldTags,
    /// Embedded field whose own fields are inlined into the parent.
    pub embedded: bool,
    pub value: &'a dyn Reflect,
}

/// A scalar value, used to decide whether a sample differs from its zero value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(Cow<'a, str>),
    /// A value rendered as text whose zero-ness is decided by the type itself
    /// (nil UUID, epoch timestamps).
    Formatted { text: String, zero: bool },
}

impl Scalar<'_> {
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Bool(b) => !b,
            Scalar::Int(i) => *i == 0,
            Scalar::Uint(u) => *u == 0,
            Scalar::Float(f) => *f == 0.0,
            Scalar::Str(s) => s.is_empty(),
            Scalar::Formatted { zero, .. } => *zero,
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Scalar::Bool(b) => Json::Bool(*b),
            Scalar::Int(i) => Json::from(*i),
            Scalar::Uint(u) => Json::from(*u),
            Scalar::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Scalar::Str(s) => Json::String(s.to_string()),
            Scalar::Formatted { text, .. } => Json::String(text.clone()),
        }
    }
}

/// Runtime view of a documented value.
pub enum Value<'a> {
    Scalar(Scalar<'a>),
    /// `zero` builds a default pointee so an absent value still has a shape.
    Optional {
        inner: Option<&'a dyn Reflect>,
        zero: fn() -> Box<dyn Reflect>,
    },
    /// `first` is a representative element; `zero` synthesizes one when empty.
    Seq {
        first: Option<&'a dyn Reflect>,
        zero: fn() -> Box<dyn Reflect>,
    },
    /// `first` is a representative map value; `zero` synthesizes one when empty.
    Map {
        first: Option<&'a dyn Reflect>,
        zero: fn() -> Box<dyn Reflect>,
    },
    Struct(Vec<Field<'a>>),
}

/// A type the documentation engine can walk.
pub trait Reflect {
    /// Static descriptor of this value's type.
    fn type_info(&self) -> TypeInfo;

    /// Runtime view of this value.
    fn reflect(&self) -> Value<'_>;

    /// Legal values of an enum-like type.
    fn enum_values(&self) -> Option<Vec<Json>> {
        None
    }

    /// Description attached to the type's definition.
    fn description(&self) -> Option<String> {
        None
    }

    /// Definition key used instead of the declared type name.
    fn schema_name(&self) -> Option<String> {
        None
    }

    /// Alternate representation documented in place of this type.
    fn shim(&self) -> Option<Box<dyn Reflect>> {
        None
    }
}

/// Box a default instance of `T` as a type-erased value.
pub fn zero_of<T: Reflect + Default + 'static>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

/// Descriptor of `T`, read from its default instance.
pub fn type_info_of<T: Reflect + Default>() -> TypeInfo {
    T::default().type_info()
}

/// Run `f` on the value behind any number of optional wrappers.
///
/// An absent optional is replaced by a zero value of its pointee.
pub fn with_indirect<R>(value: &dyn Reflect, f: impl FnOnce(&dyn Reflect) -> R) -> R {
    match value.reflect() {
        Value::Optional {
            inner: Some(inner), ..
        } => with_indirect(inner, f),
        Value::Optional { inner: None, zero } => {
            let zero = zero();
            with_indirect(zero.as_ref(), f)
        }
        _ => f(value),
    }
}

/// Run `f` on a representative element, synthesizing one when there is none.
pub fn with_element<R>(
    first: Option<&dyn Reflect>,
    zero: fn() -> Box<dyn Reflect>,
    f: impl FnOnce(&dyn Reflect) -> R,
) -> R {
    match first {
        Some(first) => f(first),
        None => {
            let zero = zero();
            f(zero.as_ref())
        }
    }
}
