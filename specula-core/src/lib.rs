// Lets `#[derive(Reflect)]` output name this crate by path from inside it.
extern crate self as specula_core;

mod cache;
pub mod classify;
pub mod config;
pub mod convert;
mod definitions;
mod error;
mod impls;
pub mod model;
mod operation;
pub mod reflect;
mod root;
pub mod schema;
pub mod tags;

pub use cache::DocCache;
pub use config::{ConfigError, DocsConfig, UiSetting, DEFAULT_CDN};
pub use convert::ConvertError;
pub use definitions::Definitions;
pub use error::SpecError;
pub use model::{ApiKeyIn, Document, Method, OAuth2FlowType, ParamIn};
pub use operation::{Api, ApiBuilder};
pub use reflect::{Field, FieldTags, Kind, Reflect, Scalar, TypeInfo, Value};
pub use root::{normalize_path, ApiGroup, ApiRoot, GroupBuilder};
pub use schema::JsonSchema;
