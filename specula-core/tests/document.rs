use std::sync::Arc;

use serde_json::{json, Value};
use specula_core::{ApiKeyIn, ApiRoot, DocsConfig, Method, OAuth2FlowType, SpecError};
use specula_macros::Reflect;

// ── Fixtures ────────────────────────────────────────────────────────────────

#[derive(Default, Reflect)]
struct Pet {
    #[reflect(json = "id", swagger = "required")]
    id: i64,
    #[reflect(json = "name")]
    name: String,
}

#[derive(Default, Reflect)]
#[reflect(rename_all = "lowercase")]
enum Status {
    #[default]
    Available,
    Sold,
}

#[derive(Default, Reflect)]
struct Paging {
    #[reflect(query = "limit", swagger = "required;max=100")]
    limit: i32,
    #[reflect(query = "offset")]
    offset: Option<i32>,
}

#[derive(Default, Reflect)]
struct Filter {
    #[reflect(flatten)]
    paging: Paging,
    #[reflect(query = "tags", swagger = "enum=a,b")]
    tags: Vec<String>,
    #[reflect(query = "status")]
    status: Status,
    #[reflect(swagger = "-")]
    internal: String,
}

#[derive(Default, Reflect)]
struct Lookup {
    #[reflect(json = "owner")]
    owner: String,
    #[reflect(json = "petId")]
    pet_id: i64,
}

#[derive(Default, Reflect)]
struct BadFilter {
    #[reflect(query = "pet")]
    pet: Pet,
}

#[derive(Default, Reflect)]
struct RateHeaders {
    #[reflect(json = "X-Rate-Limit", swagger = "desc=calls per hour allowed")]
    limit: i32,
    #[reflect(json = "X-Expires-After")]
    expires: chrono::DateTime<chrono::Utc>,
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn build(root: &ApiRoot) -> Value {
    serde_json::to_value(root.build().expect("document builds")).unwrap()
}

fn secured_root() -> ApiRoot {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.add_security_basic("basic", "HTTP basic")
        .add_security_api_key("api_key", "", "X-API-Key", ApiKeyIn::Header)
        .add_security_oauth2(
            "petstore_auth",
            "OAuth2",
            OAuth2FlowType::Implicit,
            "https://auth.example.com/authorize",
            "",
            &[("read", "read pets"), ("write", "modify pets")],
        )
        .add_security_oauth2(
            "petstore_auth",
            "OAuth2",
            OAuth2FlowType::ClientCredentials,
            "",
            "https://auth.example.com/token",
            &[("read", "read pets")],
        );
    root
}

// ── Document ────────────────────────────────────────────────────────────────

#[test]
fn empty_root_is_a_valid_document() {
    let doc = build(&ApiRoot::new("Empty", "0.1.0"));

    assert_eq!(doc["openapi"], "3.0.1");
    assert_eq!(doc["info"], json!({"title": "Empty", "version": "0.1.0"}));
    assert_eq!(doc["paths"], json!({}));
}

#[test]
fn info_comes_from_config() {
    let config = DocsConfig::new("Petstore", "2.0.0")
        .with_description("Sample server")
        .with_contact("API team", "api@example.com", "")
        .with_license("MIT", "https://opensource.org/licenses/MIT");
    let mut root = ApiRoot::from_config(&config);
    root.set_terms_of_service("https://example.com/terms")
        .set_external_docs("More", "https://example.com/docs");

    let doc = build(&root);
    assert_eq!(
        doc["info"],
        json!({
            "title": "Petstore",
            "description": "Sample server",
            "termsOfService": "https://example.com/terms",
            "contact": {"name": "API team", "email": "api@example.com"},
            "license": {"name": "MIT", "url": "https://opensource.org/licenses/MIT"},
            "version": "2.0.0"
        })
    );
    assert_eq!(doc["externalDocs"]["url"], "https://example.com/docs");
}

#[test]
fn colon_params_and_group_prefix_are_normalized() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    {
        let mut users = root.group("user", "/users/");
        users
            .get("/:id/orders/:orderId/")
            .add_param_path(&0_i64, "id", "")
            .add_param_path(&0_i64, "orderId", "");
    }
    root.get("//health");

    let doc = build(&root);
    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/users/{id}/orders/{orderId}"));
    assert!(paths.contains_key("/health"));
    assert_eq!(paths.len(), 2);

    let params = &doc["paths"]["/users/{id}/orders/{orderId}"]["get"]["parameters"];
    assert_eq!(params[0]["in"], "path");
    assert_eq!(params[0]["required"], true);
}

#[test]
fn methods_on_one_path_share_a_path_item() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/pets").set_operation_id("listPets");
    root.post("/pets/").set_operation_id("addPet");
    root.route(Method::Delete, "/pets").set_operation_id("clearPets");

    let doc = build(&root);
    let item = &doc["paths"]["/pets"];
    assert_eq!(item["get"]["operationId"], "listPets");
    assert_eq!(item["post"]["operationId"], "addPet");
    assert_eq!(item["delete"]["operationId"], "clearPets");
    assert_eq!(doc["paths"].as_object().unwrap().len(), 1);
}

#[test]
fn routes_without_responses_get_a_default() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/ping");

    let doc = build(&root);
    assert_eq!(
        doc["paths"]["/ping"]["get"]["responses"],
        json!({"default": {"description": "successful operation"}})
    );
}

#[test]
fn groups_become_deduplicated_tags() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.group("pet", "/pets")
        .set_description("Everything about your pets")
        .get("/");
    root.group("store", "/store").get("/inventory");
    root.group("pet", "/pets/v2").get("/");

    let doc = build(&root);
    assert_eq!(
        doc["tags"],
        json!([
            {"name": "pet", "description": "Everything about your pets"},
            {"name": "store"}
        ])
    );
    assert_eq!(doc["paths"]["/pets/v2"]["get"]["tags"], json!(["pet"]));
}

// ── Parameters ──────────────────────────────────────────────────────────────

#[test]
fn colliding_parameter_names_get_suffixed() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/pets/:id")
        .add_param_path(&0_i64, "id", "path id")
        .add_param_query(&0_i32, "id", "query id", false)
        .add_param_header(&String::new(), "id", "", true);

    let doc = build(&root);
    let params = doc["paths"]["/pets/{id}"]["get"]["parameters"]
        .as_array()
        .unwrap();
    let names: Vec<&str> = params.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["id", "id_", "id__"]);
    assert_eq!(params[1]["schema"], json!({"type": "integer", "format": "int32"}));
    assert_eq!(params[2]["in"], "header");
}

#[test]
fn nested_query_struct_expands_fields() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/pets").add_param_query_nested(&Filter::default());

    let doc = build(&root);
    let params = &doc["paths"]["/pets"]["get"]["parameters"];
    assert_eq!(params.as_array().unwrap().len(), 4);

    assert_eq!(
        params[0],
        json!({
            "name": "limit",
            "in": "query",
            "required": true,
            "schema": {"type": "integer", "format": "int32", "maximum": 100}
        })
    );
    assert_eq!(params[1]["name"], "offset");
    assert_eq!(params[1]["required"], false);
    assert_eq!(params[1]["schema"]["nullable"], true);
    assert_eq!(
        params[2]["schema"],
        json!({
            "type": "array",
            "items": {"type": "string", "format": "string", "enum": ["a", "b"]}
        })
    );
    assert_eq!(params[3]["schema"], json!({"$ref": "#/components/schemas/Status"}));
    assert!(doc["components"]["schemas"]["Status"].is_object());
}

#[test]
fn nested_path_struct_uses_json_names() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/owners/:owner/pets/:petId")
        .add_param_path_nested(&Lookup::default());

    let doc = build(&root);
    let params = &doc["paths"]["/owners/{owner}/pets/{petId}"]["get"]["parameters"];
    assert_eq!(params[0]["name"], "owner");
    assert_eq!(params[1]["name"], "petId");
    assert_eq!(params[1]["in"], "path");
}

#[test]
fn array_and_enum_params_are_shaped() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/pets/findByStatus")
        .add_param_query(&Vec::<Status>::new(), "status", "", true)
        .add_param_form(&Vec::<i64>::new(), "ids", "", false);

    let doc = build(&root);
    let params = &doc["paths"]["/pets/findByStatus"]["get"]["parameters"];
    assert_eq!(
        params[0]["schema"],
        json!({"type": "array", "items": {"$ref": "#/components/schemas/Status"}})
    );
    assert_eq!(params[1]["in"], "formData");
    assert_eq!(params[1]["schema"]["items"]["format"], "int64");
}

#[test]
#[should_panic(expected = "invalid query param")]
fn struct_params_need_the_nested_form() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/pets").add_param_query(&Pet::default(), "pet", "", false);
}

#[test]
#[should_panic(expected = "invalid query param")]
fn scalar_params_cannot_be_nested() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/pets").add_param_query_nested(&5_i32);
}

#[test]
#[should_panic(expected = "cannot be a query param")]
fn nested_struct_fields_are_rejected() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/pets").add_param_query_nested(&BadFilter::default());
}

// ── Request bodies ──────────────────────────────────────────────────────────

#[test]
fn body_per_content_type() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.post("/pets")
        .add_param_body(&Pet::default(), "application/json", "Pet to add", true)
        .add_param_body(&Pet::default(), "application/xml", "ignored", false);

    let doc = build(&root);
    let body = &doc["paths"]["/pets"]["post"]["requestBody"];
    assert_eq!(body["description"], "Pet to add");
    assert_eq!(body["required"], true);
    let pet_ref = json!({"$ref": "#/components/schemas/Pet"});
    assert_eq!(body["content"]["application/json"]["schema"], pet_ref);
    assert_eq!(body["content"]["application/xml"]["schema"], pet_ref);
}

#[test]
#[should_panic(expected = "already declared")]
fn duplicate_body_content_type_panics() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.post("/pets")
        .add_param_body(&Pet::default(), "application/json", "", true)
        .add_param_body(&Pet::default(), "application/json", "", true);
}

#[test]
fn file_upload_is_multipart() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.post("/pets/:id/image")
        .add_param_path(&0_i64, "id", "")
        .add_param_file("file", "image to upload", true)
        .add_param_file("thumbnail", "", false);

    let doc = build(&root);
    let schema =
        &doc["paths"]["/pets/{id}/image"]["post"]["requestBody"]["content"]["multipart/form-data"]
            ["schema"];
    assert_eq!(
        schema,
        &json!({
            "type": "object",
            "properties": {
                "file": {"type": "string", "format": "binary", "description": "image to upload"},
                "thumbnail": {"type": "string", "format": "binary"}
            },
            "required": ["file"]
        })
    );
}

// ── Responses ───────────────────────────────────────────────────────────────

#[test]
fn responses_carry_schema_and_headers() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.set_response_content_type(&["application/json", "application/xml"]);
    root.get("/pets/:id")
        .add_param_path(&0_i64, "id", "")
        .add_response(200, "the pet", Some(&Pet::default()), Some(&RateHeaders::default()))
        .add_response(404, "not found", None, None);

    let doc = build(&root);
    let responses = &doc["paths"]["/pets/{id}"]["get"]["responses"];
    let ok = &responses["200"];
    assert_eq!(ok["description"], "the pet");
    assert_eq!(
        ok["content"]["application/xml"]["schema"]["$ref"],
        "#/components/schemas/Pet"
    );
    assert_eq!(
        ok["headers"]["X-Rate-Limit"],
        json!({
            "description": "calls per hour allowed",
            "schema": {"type": "integer", "format": "int32"}
        })
    );
    assert_eq!(
        ok["headers"]["X-Expires-After"]["schema"]["format"],
        "date-time"
    );
    assert_eq!(responses["404"], json!({"description": "not found"}));
}

#[test]
fn route_content_types_override_root() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/pets/:id")
        .set_response_content_type(&["text/plain"])
        .add_response(200, "ok", Some(&String::new()), None);

    let doc = build(&root);
    let content = doc["paths"]["/pets/{id}"]["get"]["responses"]["200"]["content"]
        .as_object()
        .unwrap();
    assert_eq!(content.keys().collect::<Vec<_>>(), vec!["text/plain"]);
}

#[test]
fn shared_responses_are_referenced() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.add_shared_response(404, "Pet not found", Some(&String::new()), None);
    root.get("/pets/:id").add_response_ref(404);

    let doc = build(&root);
    assert_eq!(
        doc["paths"]["/pets/{id}"]["get"]["responses"]["404"],
        json!({"$ref": "#/components/responses/404"})
    );
    assert_eq!(
        doc["components"]["responses"]["404"]["description"],
        "Pet not found"
    );
}

#[test]
fn operation_metadata() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.put("/pets")
        .set_operation_id("updatePet")
        .set_summary("Update an existing pet")
        .set_description("Replaces the stored pet")
        .set_external_docs("Guide", "https://example.com/guide")
        .set_deprecated();

    let doc = build(&root);
    let op = &doc["paths"]["/pets"]["put"];
    assert_eq!(op["operationId"], "updatePet");
    assert_eq!(op["summary"], "Update an existing pet");
    assert_eq!(op["description"], "Replaces the stored pet");
    assert_eq!(op["externalDocs"]["url"], "https://example.com/guide");
    assert_eq!(op["deprecated"], true);
}

// ── Security ────────────────────────────────────────────────────────────────

#[test]
fn security_schemes_are_declared() {
    let doc = build(&secured_root());
    let schemes = &doc["components"]["securitySchemes"];

    assert_eq!(
        schemes["basic"],
        json!({"type": "http", "description": "HTTP basic", "scheme": "basic"})
    );
    assert_eq!(
        schemes["api_key"],
        json!({"type": "apiKey", "name": "X-API-Key", "in": "header"})
    );
    assert_eq!(
        schemes["petstore_auth"]["flows"],
        json!({
            "implicit": {
                "authorizationUrl": "https://auth.example.com/authorize",
                "scopes": {"read": "read pets", "write": "modify pets"}
            },
            "clientCredentials": {
                "tokenUrl": "https://auth.example.com/token",
                "scopes": {"read": "read pets"}
            }
        })
    );
}

#[test]
fn security_requirements_stack_group_then_route() {
    let mut root = secured_root();
    root.set_security(&["api_key"]);
    root.group("pet", "/pets")
        .set_security(&["basic"])
        .get("/:id")
        .set_security_with_scope(&[("petstore_auth", &["read"])]);

    let doc = build(&root);
    assert_eq!(doc["security"], json!([{"api_key": []}]));
    assert_eq!(
        doc["paths"]["/pets/{id}"]["get"]["security"],
        json!([{"basic": []}, {"petstore_auth": ["read"]}])
    );
}

#[test]
fn unknown_scheme_fails_the_build() {
    let mut root = secured_root();
    root.get("/pets").set_security(&["basic", "nope"]);

    match root.build() {
        Err(SpecError::UnknownSecurityScheme { name }) => assert_eq!(name, "nope"),
        Ok(_) => panic!("build should fail"),
    }
}

#[test]
fn unknown_group_scheme_fails_the_build() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.group("pet", "/pets").set_security(&["ghost"]).get("/");

    assert!(root.build().is_err());
}

// ── Cache ───────────────────────────────────────────────────────────────────

#[test]
fn builds_are_byte_identical() {
    let mut root = secured_root();
    root.group("pet", "/pets")
        .post("/")
        .add_param_body(&Pet::default(), "application/json", "", true)
        .add_param_query_nested(&Filter::default());
    root.get("/store/inventory")
        .add_response(200, "ok", Some(&Status::Sold), None);

    let first = serde_json::to_string(&root.build().unwrap()).unwrap();
    let second = serde_json::to_string(&root.build().unwrap()).unwrap();
    assert_eq!(first, second);

    let cache = root.into_cache();
    assert_eq!(cache.to_json().unwrap(), first);
    assert_eq!(cache.to_json().unwrap(), first);
}

#[test]
fn cache_builds_once_across_threads() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/pets").add_response(200, "ok", Some(&Vec::<Pet>::new()), None);
    let cache = Arc::new(root.into_cache());
    assert!(!cache.is_built());

    let addresses: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                scope.spawn(move || cache.document().unwrap() as *const _ as usize)
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(cache.is_built());
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn cache_keeps_the_build_error() {
    let mut root = ApiRoot::new("Petstore", "1.0.0");
    root.get("/pets").set_security(&["missing"]);
    let cache = root.into_cache();

    let first = cache.document().unwrap_err().clone();
    let second = cache.document().unwrap_err().clone();
    assert_eq!(first, second);
    assert_eq!(
        cache.to_json().unwrap_err(),
        "specula: no security scheme declared with name 'missing'"
    );
    assert_eq!(cache.title(), "Petstore");
}
