//! Declaration API and document assembler.
//!
//! ```ignore
//! let mut root = ApiRoot::new("Petstore", "1.0.0");
//! root.add_security_api_key("api_key", "", "X-API-Key", ApiKeyIn::Header);
//!
//! let mut pets = root.group("pet", "/pets");
//! pets.get("/:id")
//!     .add_param_path(&0_i64, "id", "Pet id")
//!     .add_response(200, "the pet", Some(&Pet::default()), None);
//!
//! let cache = root.into_cache();
//! ```

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::cache::DocCache;
use crate::config::DocsConfig;
use crate::definitions::Definitions;
use crate::error::SpecError;
use crate::model::{
    ApiKeyIn, Components, Contact, Document, ExternalDocs, Flow, Info, License, Method,
    OAuth2FlowType, Operation, PathItem, Response, SecurityRequirement, SecurityScheme,
    SecuritySchemeType, Tag, OPENAPI_VERSION,
};
use crate::operation::{build_response, requirement, scoped_requirement, Api, ApiBuilder};
use crate::reflect::Reflect;

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// A tagged set of routes sharing a path prefix and security.
#[derive(Debug, Clone)]
pub struct ApiGroup {
    pub(crate) tag: Tag,
    pub(crate) prefix: String,
    pub(crate) security: Vec<SecurityRequirement>,
    pub(crate) apis: Vec<Api>,
}

/// Everything declared for one document.
#[derive(Debug, Clone)]
pub struct ApiRoot {
    info: Info,
    external_docs: Option<ExternalDocs>,
    security_schemes: BTreeMap<String, SecurityScheme>,
    security: Vec<SecurityRequirement>,
    response_content_types: Vec<String>,
    groups: Vec<ApiGroup>,
    apis: Vec<Api>,
    defs: Definitions,
}

macro_rules! route_methods {
    ( $( $name:ident => $method:ident ),* $(,)? ) => {
        $(
            pub fn $name(&mut self, path: &str) -> ApiBuilder<'_> {
                self.route(Method::$method, path)
            }
        )*
    };
}

impl ApiRoot {
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            info: Info {
                title: title.to_string(),
                version: version.to_string(),
                ..Info::default()
            },
            external_docs: None,
            security_schemes: BTreeMap::new(),
            security: Vec::new(),
            response_content_types: vec![DEFAULT_CONTENT_TYPE.to_string()],
            groups: Vec::new(),
            apis: Vec::new(),
            defs: Definitions::new(),
        }
    }

    /// Start from the info block of a [`DocsConfig`].
    pub fn from_config(config: &DocsConfig) -> Self {
        let mut root = Self::new(&config.title, &config.version);
        root.info = config.info();
        root
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn definitions(&self) -> &Definitions {
        &self.defs
    }

    // ── Info ────────────────────────────────────────────────────────────────

    pub fn set_description(&mut self, desc: &str) -> &mut Self {
        self.info.description = desc.to_string();
        self
    }

    pub fn set_terms_of_service(&mut self, url: &str) -> &mut Self {
        self.info.terms_of_service = url.to_string();
        self
    }

    pub fn set_contact(&mut self, name: &str, email: &str, url: &str) -> &mut Self {
        self.info.contact = Some(Contact {
            name: name.to_string(),
            email: email.to_string(),
            url: url.to_string(),
        });
        self
    }

    pub fn set_license(&mut self, name: &str, url: &str) -> &mut Self {
        self.info.license = Some(License {
            name: name.to_string(),
            url: url.to_string(),
        });
        self
    }

    pub fn set_external_docs(&mut self, desc: &str, url: &str) -> &mut Self {
        self.external_docs = Some(ExternalDocs {
            description: desc.to_string(),
            url: url.to_string(),
        });
        self
    }

    /// Default content types of responses declared after this call.
    pub fn set_response_content_type(&mut self, types: &[&str]) -> &mut Self {
        self.response_content_types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    // ── Security ────────────────────────────────────────────────────────────

    pub fn add_security_basic(&mut self, name: &str, desc: &str) -> &mut Self {
        self.add_security_scheme(
            name,
            SecurityScheme {
                scheme_type: SecuritySchemeType::Http,
                description: desc.to_string(),
                name: String::new(),
                location: None,
                scheme: "basic".to_string(),
                flows: BTreeMap::new(),
            },
        )
    }

    /// An API key sent in a header or query parameter called `key_name`.
    pub fn add_security_api_key(
        &mut self,
        name: &str,
        desc: &str,
        key_name: &str,
        location: ApiKeyIn,
    ) -> &mut Self {
        self.add_security_scheme(
            name,
            SecurityScheme {
                scheme_type: SecuritySchemeType::ApiKey,
                description: desc.to_string(),
                name: key_name.to_string(),
                location: Some(location),
                scheme: String::new(),
                flows: BTreeMap::new(),
            },
        )
    }

    /// Declare an OAuth2 flow. Declaring another flow under the same scheme
    /// name adds it to that scheme.
    pub fn add_security_oauth2(
        &mut self,
        name: &str,
        desc: &str,
        flow_type: OAuth2FlowType,
        authorization_url: &str,
        token_url: &str,
        scopes: &[(&str, &str)],
    ) -> &mut Self {
        let flow = Flow {
            authorization_url: authorization_url.to_string(),
            token_url: token_url.to_string(),
            scopes: scopes
                .iter()
                .map(|(scope, desc)| (scope.to_string(), desc.to_string()))
                .collect(),
        };
        let scheme = self
            .security_schemes
            .entry(name.to_string())
            .or_insert_with(|| SecurityScheme {
                scheme_type: SecuritySchemeType::OAuth2,
                description: desc.to_string(),
                name: String::new(),
                location: None,
                scheme: String::new(),
                flows: BTreeMap::new(),
            });
        scheme.flows.insert(flow_type, flow);
        self
    }

    fn add_security_scheme(&mut self, name: &str, scheme: SecurityScheme) -> &mut Self {
        self.security_schemes.insert(name.to_string(), scheme);
        self
    }

    /// Require all the named schemes for the whole API.
    pub fn set_security(&mut self, names: &[&str]) -> &mut Self {
        if !names.is_empty() {
            self.security.push(requirement(names));
        }
        self
    }

    pub fn set_security_with_scope(&mut self, scopes: &[(&str, &[&str])]) -> &mut Self {
        if !scopes.is_empty() {
            self.security.push(scoped_requirement(scopes));
        }
        self
    }

    // ── Shared responses ────────────────────────────────────────────────────

    /// Register a response under `components.responses`, referenced with
    /// [`ApiBuilder::add_response_ref`].
    pub fn add_shared_response(
        &mut self,
        code: u16,
        desc: &str,
        schema: Option<&dyn Reflect>,
        header: Option<&dyn Reflect>,
    ) -> &mut Self {
        let response = build_response(
            &mut self.defs,
            desc,
            schema,
            header,
            &self.response_content_types,
        );
        self.defs.add_response(code, response);
        self
    }

    // ── Routes ──────────────────────────────────────────────────────────────

    /// Open a route group. Its routes are tagged `name` and prefixed with `prefix`.
    pub fn group(&mut self, name: &str, prefix: &str) -> GroupBuilder<'_> {
        self.groups.push(ApiGroup {
            tag: Tag {
                name: name.to_string(),
                ..Tag::default()
            },
            prefix: prefix.to_string(),
            security: Vec::new(),
            apis: Vec::new(),
        });
        let index = self.groups.len() - 1;
        GroupBuilder {
            group: &mut self.groups[index],
            defs: &mut self.defs,
            content_types: &self.response_content_types,
        }
    }

    pub fn route(&mut self, method: Method, path: &str) -> ApiBuilder<'_> {
        self.apis.push(Api::new(
            method,
            path.to_string(),
            self.response_content_types.clone(),
        ));
        let index = self.apis.len() - 1;
        ApiBuilder::new(&mut self.apis[index], &mut self.defs)
    }

    route_methods! {
        get => Get,
        put => Put,
        post => Post,
        delete => Delete,
        options => Options,
        head => Head,
        patch => Patch,
    }

    /// Move the declarations into a cache that builds the document on first use.
    pub fn into_cache(self) -> DocCache {
        DocCache::new(self)
    }

    // ── Build ───────────────────────────────────────────────────────────────

    /// Assemble the document from the current declarations.
    pub fn build(&self) -> Result<Document, SpecError> {
        let result = self.assemble();
        match &result {
            Ok(doc) => info!(
                title = %self.info.title,
                paths = doc.paths.len(),
                schemas = doc.components.schemas.len(),
                "OpenAPI document built"
            ),
            Err(err) => warn!(error = %err, "OpenAPI document build failed"),
        }
        result
    }

    fn assemble(&self) -> Result<Document, SpecError> {
        self.check_security(&self.security)?;

        let mut tags: Vec<Tag> = Vec::new();
        let mut paths: BTreeMap<String, PathItem> = BTreeMap::new();

        for group in &self.groups {
            if !tags.iter().any(|t| t.name == group.tag.name) {
                tags.push(group.tag.clone());
            }
            for api in &group.apis {
                let mut operation = api.operation.clone();
                operation.tags = vec![group.tag.name.clone()];
                self.add_security(&mut operation, &group.security)?;
                self.transfer(&mut paths, api, operation, &group.prefix)?;
            }
        }

        for api in &self.apis {
            self.transfer(&mut paths, api, api.operation.clone(), "")?;
        }

        let components = Components {
            schemas: self.defs.schemas().clone(),
            responses: self
                .defs
                .responses()
                .iter()
                .map(|(code, response)| (code.to_string(), response.clone()))
                .collect(),
            parameters: BTreeMap::new(),
            security_schemes: self.security_schemes.clone(),
        };

        Ok(Document {
            openapi: OPENAPI_VERSION.to_string(),
            info: self.info.clone(),
            paths,
            components,
            security: self.security.clone(),
            tags,
            external_docs: self.external_docs.clone(),
        })
    }

    fn transfer(
        &self,
        paths: &mut BTreeMap<String, PathItem>,
        api: &Api,
        mut operation: Operation,
        prefix: &str,
    ) -> Result<(), SpecError> {
        self.add_security(&mut operation, &api.security)?;

        if operation.responses.is_empty() {
            operation.responses.insert(
                "default".to_string(),
                Response {
                    description: "successful operation".to_string(),
                    ..Response::default()
                },
            );
        }

        let path = normalize_path(&format!("{prefix}/{}", api.path));
        paths.entry(path).or_default().assign(api.method, operation);
        Ok(())
    }

    fn add_security(
        &self,
        operation: &mut Operation,
        security: &[SecurityRequirement],
    ) -> Result<(), SpecError> {
        self.check_security(security)?;
        operation.security.extend(security.iter().cloned());
        Ok(())
    }

    fn check_security(&self, security: &[SecurityRequirement]) -> Result<(), SpecError> {
        for name in security.iter().flat_map(|req| req.keys()) {
            if !self.security_schemes.contains_key(name) {
                return Err(SpecError::UnknownSecurityScheme { name: name.clone() });
            }
        }
        Ok(())
    }
}

/// Route declarations inside one group.
pub struct GroupBuilder<'a> {
    group: &'a mut ApiGroup,
    defs: &'a mut Definitions,
    content_types: &'a [String],
}

impl GroupBuilder<'_> {
    pub fn set_description(&mut self, desc: &str) -> &mut Self {
        self.group.tag.description = desc.to_string();
        self
    }

    pub fn set_external_docs(&mut self, desc: &str, url: &str) -> &mut Self {
        self.group.tag.external_docs = Some(ExternalDocs {
            description: desc.to_string(),
            url: url.to_string(),
        });
        self
    }

    /// Require all the named schemes on every route of the group.
    pub fn set_security(&mut self, names: &[&str]) -> &mut Self {
        if !names.is_empty() {
            self.group.security.push(requirement(names));
        }
        self
    }

    pub fn set_security_with_scope(&mut self, scopes: &[(&str, &[&str])]) -> &mut Self {
        if !scopes.is_empty() {
            self.group.security.push(scoped_requirement(scopes));
        }
        self
    }

    pub fn route(&mut self, method: Method, path: &str) -> ApiBuilder<'_> {
        self.group.apis.push(Api::new(
            method,
            path.to_string(),
            self.content_types.to_vec(),
        ));
        let index = self.group.apis.len() - 1;
        ApiBuilder::new(&mut self.group.apis[index], self.defs)
    }

    route_methods! {
        get => Get,
        put => Put,
        post => Post,
        delete => Delete,
        options => Options,
        head => Head,
        patch => Patch,
    }
}

/// Rewrite a colon-style route template into an OpenAPI path key.
///
/// `:name` segments become `{name}`, empty segments are dropped, the result
/// starts with `/` and has no trailing slash.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_string(),
        })
        .collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_segments_become_braces() {
        assert_eq!(
            normalize_path("/users/:id/orders/:orderId"),
            "/users/{id}/orders/{orderId}"
        );
    }

    #[test]
    fn slashes_are_normalized() {
        assert_eq!(normalize_path("/api//pets/"), "/api/pets");
        assert_eq!(normalize_path("pets"), "/pets");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("//"), "/");
    }
}
