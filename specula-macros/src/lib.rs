extern crate proc_macro;
use proc_macro::TokenStream;

pub(crate) mod crate_path;
pub(crate) mod reflect_derive;

/// Derive macro implementing `Reflect` so a type can be documented.
///
/// # Structs
///
/// Every named field is reported with its annotation strings. Field types
/// must implement `Reflect`; container element types also need `Default`.
///
/// | Field attribute | Description |
/// |-----------------|-------------|
/// | `json = "name,omitempty"` | Serialized name (first comma segment), used for body, path and header binding |
/// | `query = "name"` | Name when bound as a query parameter |
/// | `form = "name"` | Name when bound as a form parameter |
/// | `swagger = "desc=...;required;min=1"` | Documentation directives; `swagger = "-"` hides the field |
/// | `validate = "min=1,dive,max=5"` | Validator rules; bounds become schema constraints |
/// | `flatten` | Inline the field's own fields into the parent |
///
/// # Enums
///
/// Unit-only enums become string definitions whose `enum` lists every
/// variant label. Labels default to the variant name; change them with
/// `#[reflect(rename_all = "snake_case")]` on the enum or
/// `#[reflect(rename = "...")]` on a variant.
///
/// # Container attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `name = "..."` | Definition key instead of the type name |
/// | `description = "..."` | Description of the definition |
/// | `shim = "Type"` | Document `Type::default()` in place of this type |
///
/// # Example
///
/// ```ignore
/// use specula::Reflect;
///
/// #[derive(Default, Reflect)]
/// #[reflect(description = "A pet in the store")]
/// pub struct Pet {
///     #[reflect(json = "id", swagger = "required;readOnly")]
///     pub id: i64,
///     #[reflect(json = "name", validate = "min=1,max=64")]
///     pub name: String,
///     pub status: Option<PetStatus>,
/// }
///
/// #[derive(Default, Reflect)]
/// #[reflect(rename_all = "lowercase")]
/// pub enum PetStatus {
///     #[default]
///     Available,
///     Sold,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    reflect_derive::expand(input)
}
