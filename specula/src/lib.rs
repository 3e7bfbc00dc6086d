//! Specula: OpenAPI 3.0.1 documents inferred from described Rust types.
//!
//! This facade crate re-exports the Specula sub-crates through a single
//! dependency with feature flags:
//!
//! ```ignore
//! use specula::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature | Default | Crate          |
//! |---------|---------|----------------|
//! | `axum`  | **yes** | `specula-axum` |

// Lets `#[derive(Reflect)]` output resolve `::specula` inside this crate's tests.
extern crate self as specula;

pub extern crate specula_core;
pub extern crate specula_macros;

// Re-export everything from specula-core at the top level for convenience.
pub use specula_core::*;
pub use specula_macros::Reflect;

#[cfg(feature = "axum")]
pub use specula_axum;

#[cfg(feature = "axum")]
pub use specula_axum::docs_routes;

pub mod prelude {
    pub use specula_core::{
        ApiKeyIn, ApiRoot, DocCache, DocsConfig, Method, OAuth2FlowType, Reflect, UiSetting,
    };
    pub use specula_macros::Reflect;

    #[cfg(feature = "axum")]
    pub use specula_axum::docs_routes;
}
