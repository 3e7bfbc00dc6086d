use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Type};

use crate::crate_path::specula_core_path;

/// Container-level `#[reflect(...)]` options.
#[derive(Default)]
struct ContainerAttrs {
    name: Option<String>,
    description: Option<String>,
    shim: Option<Type>,
    rename_all: Option<String>,
}

/// Field-level `#[reflect(...)]` options: the annotation strings plus `flatten`.
#[derive(Default)]
struct FieldAttrs {
    json: String,
    query: String,
    form: String,
    swagger: String,
    validate: String,
    flatten: bool,
}

pub fn expand(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_inner(input) {
        Ok(ts) => ts.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_inner(input: DeriveInput) -> syn::Result<TokenStream> {
    let krate = specula_core_path();
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Reflect cannot be derived for generic types: the definition key must be a single name",
        ));
    }

    let attrs = parse_container_attrs(&input.attrs)?;
    let hooks = generate_hooks(&attrs, &krate);

    let body = match &input.data {
        Data::Struct(data) => {
            if attrs.rename_all.is_some() {
                return Err(syn::Error::new_spanned(
                    name,
                    "`rename_all` only applies to enums; use `json = \"...\"` on fields",
                ));
            }
            expand_struct(name, &data.fields, &krate)?
        }
        Data::Enum(data) => {
            let mut variants = Vec::new();
            for variant in &data.variants {
                if !matches!(variant.fields, Fields::Unit) {
                    return Err(syn::Error::new_spanned(
                        variant,
                        "Reflect can only be derived for enums whose variants are all unit variants",
                    ));
                }
                let label = match parse_variant_rename(&variant.attrs)? {
                    Some(label) => label,
                    None => rename_variant(&variant.ident.to_string(), attrs.rename_all.as_deref()),
                };
                variants.push((variant.ident.clone(), label));
            }
            if variants.is_empty() {
                return Err(syn::Error::new_spanned(
                    name,
                    "Reflect cannot be derived for an enum without variants",
                ));
            }
            expand_enum(name, &variants, &krate)
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Reflect can only be derived for structs and enums",
            ))
        }
    };

    Ok(quote! {
        impl #krate::reflect::Reflect for #name {
            #body
            #hooks
        }
    })
}

fn expand_struct(name: &Ident, fields: &Fields, krate: &TokenStream) -> syn::Result<TokenStream> {
    let named = match fields {
        Fields::Named(f) => f.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Reflect can only be derived for structs with named fields",
            ))
        }
    };

    let mut entries = Vec::new();
    for field in named {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let attrs = parse_field_attrs(&field.attrs)?;
        let declared = ident.to_string();
        let declared = declared.strip_prefix("r#").unwrap_or(&declared).to_string();
        let FieldAttrs {
            json,
            query,
            form,
            swagger,
            validate,
            flatten,
        } = attrs;

        entries.push(quote! {
            #krate::reflect::Field {
                name: #declared,
                tags: #krate::reflect::FieldTags {
                    json: #json,
                    query: #query,
                    form: #form,
                    swagger: #swagger,
                    validate: #validate,
                },
                embedded: #flatten,
                value: &self.#ident,
            }
        });
    }

    let type_name = name.to_string();
    Ok(quote! {
        fn type_info(&self) -> #krate::reflect::TypeInfo {
            #krate::reflect::TypeInfo::new(#type_name, #krate::reflect::Kind::Struct)
        }

        fn reflect(&self) -> #krate::reflect::Value<'_> {
            #krate::reflect::Value::Struct(::std::vec![#(#entries),*])
        }
    })
}

fn expand_enum(name: &Ident, variants: &[(Ident, String)], krate: &TokenStream) -> TokenStream {
    let type_name = name.to_string();
    let arms = variants.iter().map(|(ident, label)| {
        quote!(#name::#ident => #label)
    });
    let values = variants.iter().map(|(_, label)| {
        quote!(#krate::reflect::Json::String(::std::string::String::from(#label)))
    });

    quote! {
        fn type_info(&self) -> #krate::reflect::TypeInfo {
            #krate::reflect::TypeInfo::new(#type_name, #krate::reflect::Kind::String).enumerable()
        }

        fn reflect(&self) -> #krate::reflect::Value<'_> {
            let label: &'static str = match self {
                #(#arms),*
            };
            #krate::reflect::Value::Scalar(#krate::reflect::Scalar::Str(
                ::std::borrow::Cow::Borrowed(label),
            ))
        }

        fn enum_values(&self) -> ::std::option::Option<::std::vec::Vec<#krate::reflect::Json>> {
            ::std::option::Option::Some(::std::vec![#(#values),*])
        }
    }
}

fn generate_hooks(attrs: &ContainerAttrs, krate: &TokenStream) -> TokenStream {
    let mut hooks = TokenStream::new();

    if let Some(ref description) = attrs.description {
        hooks.extend(quote! {
            fn description(&self) -> ::std::option::Option<::std::string::String> {
                ::std::option::Option::Some(::std::string::String::from(#description))
            }
        });
    }

    if let Some(ref schema_name) = attrs.name {
        hooks.extend(quote! {
            fn schema_name(&self) -> ::std::option::Option<::std::string::String> {
                ::std::option::Option::Some(::std::string::String::from(#schema_name))
            }
        });
    }

    if let Some(ref shim) = attrs.shim {
        hooks.extend(quote! {
            fn shim(&self) -> ::std::option::Option<::std::boxed::Box<dyn #krate::reflect::Reflect>> {
                ::std::option::Option::Some(::std::boxed::Box::new(
                    <#shim as ::std::default::Default>::default(),
                ))
            }
        });
    }

    hooks
}

// ── Attribute parsing ───────────────────────────────────────────────────────

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut parsed = ContainerAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("reflect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                parsed.name = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("description") {
                let lit: LitStr = meta.value()?.parse()?;
                parsed.description = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("shim") {
                let lit: LitStr = meta.value()?.parse()?;
                parsed.shim = Some(lit.parse()?);
                Ok(())
            } else if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                let rule = lit.value();
                if !RENAME_RULES.contains(&rule.as_str()) {
                    return Err(meta.error(format!(
                        "unknown rename rule, expected one of: {}",
                        RENAME_RULES.join(", ")
                    )));
                }
                parsed.rename_all = Some(rule);
                Ok(())
            } else {
                Err(meta.error(
                    "expected `name = \"...\"`, `description = \"...\"`, `shim = \"Type\"` or `rename_all = \"...\"`",
                ))
            }
        })?;
    }
    Ok(parsed)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("reflect")) {
        attr.parse_nested_meta(|meta| {
            let slot = if meta.path.is_ident("json") {
                &mut parsed.json
            } else if meta.path.is_ident("query") {
                &mut parsed.query
            } else if meta.path.is_ident("form") {
                &mut parsed.form
            } else if meta.path.is_ident("swagger") {
                &mut parsed.swagger
            } else if meta.path.is_ident("validate") {
                &mut parsed.validate
            } else if meta.path.is_ident("flatten") {
                parsed.flatten = true;
                return Ok(());
            } else {
                return Err(meta.error(
                    "expected one of `json`, `query`, `form`, `swagger`, `validate` or `flatten`",
                ));
            };
            let lit: LitStr = meta.value()?.parse()?;
            *slot = lit.value();
            Ok(())
        })?;
    }
    Ok(parsed)
}

fn parse_variant_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("reflect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `rename = \"...\"`"))
            }
        })?;
    }
    Ok(rename)
}

// ── Variant renaming ────────────────────────────────────────────────────────

const RENAME_RULES: &[&str] = &[
    "lowercase",
    "UPPERCASE",
    "snake_case",
    "SCREAMING_SNAKE_CASE",
    "kebab-case",
    "camelCase",
];

fn rename_variant(variant: &str, rule: Option<&str>) -> String {
    match rule {
        Some("lowercase") => variant.to_lowercase(),
        Some("UPPERCASE") => variant.to_uppercase(),
        Some("snake_case") => snake_case(variant),
        Some("SCREAMING_SNAKE_CASE") => snake_case(variant).to_uppercase(),
        Some("kebab-case") => snake_case(variant).replace('_', "-"),
        Some("camelCase") => {
            let mut chars = variant.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        _ => variant.to_string(),
    }
}

fn snake_case(variant: &str) -> String {
    let mut out = String::new();
    for (i, ch) in variant.char_indices() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
