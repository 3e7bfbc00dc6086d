//! Documentation settings, loadable from YAML.
//!
//! ```yaml
//! title: Petstore
//! version: 1.0.0
//! docs_path: /doc
//! ui:
//!   detach_spec: true
//!   hide_top: false
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::model::{Contact, Info, License};

/// Swagger UI bundle used when no CDN is configured.
pub const DEFAULT_CDN: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist@4.6.2";

/// Errors raised while loading a [`DocsConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O or YAML parsing error occurred while loading the file.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "Docs config load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Swagger UI rendering options.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UiSetting {
    /// Serve the document from its own endpoint instead of inlining it in the page.
    pub detach_spec: bool,
    /// Hide the UI top bar. Always hidden when the document is inlined.
    pub hide_top: bool,
    /// Base URL of the swagger-ui-dist bundle; empty means [`DEFAULT_CDN`].
    pub cdn: String,
}

impl UiSetting {
    pub fn cdn(&self) -> &str {
        if self.cdn.is_empty() {
            DEFAULT_CDN
        } else {
            &self.cdn
        }
    }
}

/// Settings of the documentation endpoints and the document's info block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub terms_of_service: Option<String>,
    pub contact: Option<Contact>,
    pub license: Option<License>,
    /// Mount point of the UI; the JSON document lives at `{docs_path}/swagger.json`.
    pub docs_path: String,
    pub ui: UiSetting,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: "API".to_string(),
            version: "0.1.0".to_string(),
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
            docs_path: "/doc".to_string(),
            ui: UiSetting::default(),
        }
    }
}

impl DocsConfig {
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            title: title.to_string(),
            version: version.to_string(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_docs_path(mut self, path: &str) -> Self {
        self.docs_path = path.to_string();
        self
    }

    pub fn with_ui(mut self, ui: UiSetting) -> Self {
        self.ui = ui;
        self
    }

    pub fn with_contact(mut self, name: &str, email: &str, url: &str) -> Self {
        self.contact = Some(Contact {
            name: name.to_string(),
            email: email.to_string(),
            url: url.to_string(),
        });
        self
    }

    pub fn with_license(mut self, name: &str, url: &str) -> Self {
        self.license = Some(License {
            name: name.to_string(),
            url: url.to_string(),
        });
        self
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Load a configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&content)
    }

    /// The document's info block.
    pub fn info(&self) -> Info {
        Info {
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            terms_of_service: self.terms_of_service.clone().unwrap_or_default(),
            contact: self.contact.clone(),
            license: self.license.clone(),
            version: self.version.clone(),
        }
    }

    /// The docs path with a leading slash and no trailing slash.
    pub fn normalized_docs_path(&self) -> String {
        let trimmed = self.docs_path.trim_matches('/');
        format!("/{trimmed}")
    }
}
