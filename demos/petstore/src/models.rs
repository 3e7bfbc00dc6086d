use chrono::{DateTime, Utc};
use serde::Serialize;
use specula::Reflect;

#[derive(Debug, Clone, Default, Serialize, Reflect)]
pub struct Category {
    #[reflect(json = "id")]
    pub id: i64,
    #[reflect(json = "name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Reflect)]
pub struct Tag {
    #[reflect(json = "id")]
    pub id: i64,
    #[reflect(json = "name")]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Reflect)]
#[serde(rename_all = "lowercase")]
#[reflect(rename_all = "lowercase", description = "pet status in the store")]
pub enum PetStatus {
    #[default]
    Available,
    Pending,
    Sold,
}

#[derive(Debug, Clone, Default, Serialize, Reflect)]
pub struct Pet {
    #[reflect(json = "id,omitempty", swagger = "readOnly")]
    pub id: i64,
    #[reflect(json = "category")]
    pub category: Option<Category>,
    #[reflect(json = "name", swagger = "required;example=doggie", validate = "min=1,max=64")]
    pub name: String,
    #[reflect(json = "photoUrls", swagger = "required")]
    pub photo_urls: Vec<String>,
    #[reflect(json = "tags")]
    pub tags: Vec<Tag>,
    #[reflect(json = "status")]
    pub status: PetStatus,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Reflect)]
#[serde(rename_all = "lowercase")]
#[reflect(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Placed,
    Approved,
    Delivered,
}

#[derive(Debug, Clone, Default, Serialize, Reflect)]
pub struct Order {
    #[reflect(json = "id")]
    pub id: i64,
    #[reflect(json = "petId")]
    pub pet_id: i64,
    #[reflect(json = "quantity", swagger = "min=1;default=1")]
    pub quantity: i32,
    #[reflect(json = "shipDate")]
    pub ship_date: Option<DateTime<Utc>>,
    #[reflect(json = "status")]
    pub status: OrderStatus,
    #[reflect(json = "complete")]
    pub complete: bool,
}

#[derive(Debug, Clone, Default, Serialize, Reflect)]
pub struct User {
    #[reflect(json = "id")]
    pub id: i64,
    #[reflect(json = "username", swagger = "required")]
    pub username: String,
    #[reflect(json = "email")]
    pub email: String,
    #[reflect(json = "password", swagger = "-")]
    pub password: String,
    #[reflect(json = "userStatus", swagger = "desc=User Status;enum=0,1,2")]
    pub user_status: i32,
}

#[derive(Debug, Clone, Default, Serialize, Reflect)]
#[reflect(name = "ApiResponse")]
pub struct Message {
    #[reflect(json = "code")]
    pub code: i32,
    #[reflect(json = "message")]
    pub message: String,
}

/// Query string of `GET /pets/findByStatus`.
#[derive(Debug, Default, Reflect)]
pub struct FindByStatus {
    #[reflect(query = "status", swagger = "required;desc=Status values that need to be considered for filter")]
    pub status: Vec<PetStatus>,
    #[reflect(query = "limit", swagger = "min=1;max=100;default=20")]
    pub limit: Option<u32>,
}

/// Headers returned by `GET /user/login`.
#[derive(Debug, Default, Reflect)]
pub struct RateLimitHeaders {
    #[reflect(json = "X-Rate-Limit", swagger = "desc=calls per hour allowed by the user")]
    pub rate_limit: i32,
    #[reflect(json = "X-Expires-After", swagger = "desc=date in UTC when token expires")]
    pub expires_after: DateTime<Utc>,
}
