//! Crate path resolution for generated code.
//!
//! Detects whether the user depends on `specula` (facade) or `specula-core`
//! directly, and returns the matching path prefix.

use proc_macro2::{Span, TokenStream};
use proc_macro_crate::{crate_name, FoundCrate};
use quote::quote;

/// Returns the token stream for accessing `specula_core` items.
///
/// The facade wins when both are reachable. Inside the crates themselves the
/// absolute path still works: both declare `extern crate self as ...`, which
/// also covers their integration tests.
pub fn specula_core_path() -> TokenStream {
    [("specula", "specula"), ("specula-core", "specula_core")]
        .into_iter()
        .find_map(|(package, own)| crate_name(package).ok().map(|found| absolute(found, own)))
        .unwrap_or_else(|| quote!(::specula_core))
}

fn absolute(found: FoundCrate, own: &str) -> TokenStream {
    let name = match found {
        FoundCrate::Itself => own.to_string(),
        FoundCrate::Name(name) => name,
    };
    let ident = syn::Ident::new(&name, Span::call_site());
    quote!(::#ident)
}
