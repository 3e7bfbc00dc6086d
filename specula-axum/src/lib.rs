mod handlers;

pub use handlers::{docs_routes, SPEC_NAME};
