use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use specula::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod models;

use models::{
    Category, FindByStatus, Message, Order, Pet, PetStatus, RateLimitHeaders, Tag, User,
};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,specula=debug")),
        )
        .init();
}

fn load_config() -> DocsConfig {
    let path = std::env::var("PETSTORE_DOCS").unwrap_or_else(|_| "demos/petstore/docs.yaml".into());
    match DocsConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path, error = %e, "using built-in docs config");
            DocsConfig::new("Swagger Petstore", "1.0.0")
        }
    }
}

fn describe(config: &DocsConfig) -> ApiRoot {
    let mut root = ApiRoot::from_config(config);
    root.set_external_docs("Find out more about Swagger", "http://swagger.io")
        .add_security_api_key("api_key", "", "api_key", ApiKeyIn::Header)
        .add_security_oauth2(
            "petstore_auth",
            "",
            OAuth2FlowType::Implicit,
            "http://petstore.swagger.io/oauth/dialog",
            "",
            &[("write:pets", "modify pets in your account"), ("read:pets", "read your pets")],
        )
        .add_shared_response(404, "Not found", Some(&Message::default()), None);

    {
        let mut pets = root.group("pet", "/pets");
        pets.set_description("Everything about your Pets")
            .set_external_docs("Find out more", "http://swagger.io")
            .set_security_with_scope(&[("petstore_auth", &["write:pets", "read:pets"])]);

        pets.post("/")
            .set_operation_id("addPet")
            .set_summary("Add a new pet to the store")
            .add_param_body(&Pet::default(), "application/json", "Pet object that needs to be added to the store", true)
            .add_response(405, "Invalid input", None, None);

        pets.get("/findByStatus")
            .set_operation_id("findPetsByStatus")
            .set_description("Multiple status values can be provided")
            .add_param_query_nested(&FindByStatus::default())
            .add_response(200, "successful operation", Some(&Vec::<Pet>::new()), None)
            .add_response(400, "Invalid status value", None, None);

        pets.get("/:petId")
            .set_operation_id("getPetById")
            .set_summary("Find pet by ID")
            .set_security(&["api_key"])
            .add_param_path(&0_i64, "petId", "ID of pet to return")
            .add_response(200, "successful operation", Some(&sample_pet()), None)
            .add_response_ref(404);

        pets.delete("/:petId")
            .set_operation_id("deletePet")
            .add_param_header(&String::new(), "api_key", "", false)
            .add_param_path(&0_i64, "petId", "Pet id to delete")
            .add_response(400, "Invalid ID supplied", None, None);

        pets.post("/:petId/uploadImage")
            .set_operation_id("uploadFile")
            .add_param_path(&0_i64, "petId", "ID of pet to update")
            .add_param_file("file", "file to upload", true)
            .add_response(200, "successful operation", Some(&Message::default()), None);
    }

    {
        let mut store = root.group("store", "/store");
        store.set_description("Access to Petstore orders");

        store
            .get("/inventory")
            .set_operation_id("getInventory")
            .set_security(&["api_key"])
            .add_response(200, "successful operation", Some(&BTreeMap::<String, i32>::new()), None);

        store
            .post("/order")
            .set_operation_id("placeOrder")
            .add_param_body(&Order::default(), "application/json", "order placed for purchasing the pet", true)
            .add_response(200, "successful operation", Some(&Order::default()), None);

        store
            .delete("/order/:orderId")
            .set_operation_id("deleteOrder")
            .set_deprecated()
            .add_param_path(&0_i64, "orderId", "ID of the order that needs to be deleted")
            .add_response_ref(404);
    }

    {
        let mut users = root.group("user", "/user");
        users.set_description("Operations about user");

        users
            .get("/login")
            .set_operation_id("loginUser")
            .set_response_content_type(&["application/json", "application/xml"])
            .add_param_query(&String::new(), "username", "The user name for login", true)
            .add_param_query(&String::new(), "password", "The password for login in clear text", true)
            .add_response(200, "successful operation", Some(&String::new()), Some(&RateLimitHeaders::default()));

        users
            .post("/")
            .set_operation_id("createUser")
            .add_param_body(&User::default(), "application/json", "Created user object", true);
    }

    root
}

fn sample_pet() -> Pet {
    Pet {
        id: 10,
        category: Some(Category {
            id: 1,
            name: "Dogs".into(),
        }),
        name: "doggie".into(),
        photo_urls: vec!["https://example.com/doggie.png".into()],
        tags: vec![Tag {
            id: 1,
            name: "friendly".into(),
        }],
        status: PetStatus::Available,
    }
}

async fn get_pet(Path(id): Path<i64>) -> Result<Json<Pet>, StatusCode> {
    if id == 10 {
        Ok(Json(sample_pet()))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = load_config();
    let cache = Arc::new(describe(&config).into_cache());

    let app = Router::new()
        .route("/pets/{petId}", get(get_pet))
        .merge(specula::docs_routes(cache, &config));

    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, docs = %config.normalized_docs_path(), "Petstore listening");
    axum::serve(listener, app).await?;
    Ok(())
}
