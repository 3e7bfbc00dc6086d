use std::sync::OnceLock;

use crate::error::SpecError;
use crate::model::Document;
use crate::root::ApiRoot;

/// Owns the declarations and builds the document at most once.
///
/// Concurrent first callers block until the single build finishes; every
/// caller then sees the same document or the same error. Share it between
/// handlers behind an `Arc`.
#[derive(Debug)]
pub struct DocCache {
    root: ApiRoot,
    built: OnceLock<Result<Document, SpecError>>,
}

impl DocCache {
    pub fn new(root: ApiRoot) -> Self {
        Self {
            root,
            built: OnceLock::new(),
        }
    }

    /// The built document, building it on first call.
    pub fn document(&self) -> Result<&Document, &SpecError> {
        self.built.get_or_init(|| self.root.build()).as_ref()
    }

    /// The document serialized as JSON.
    pub fn to_json(&self) -> Result<String, String> {
        let doc = self.document().map_err(|e| e.to_string())?;
        serde_json::to_string(doc).map_err(|e| e.to_string())
    }

    /// Whether the build already ran.
    pub fn is_built(&self) -> bool {
        self.built.get().is_some()
    }

    pub fn title(&self) -> &str {
        &self.root.info().title
    }
}
