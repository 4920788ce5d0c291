use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use serde::Serialize;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub name: String, pub email: String, pub password: String, pub address: Option<String> }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginResponseDoc { pub message: String, pub token: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest { pub current_password: String, pub new_password: String }

#[derive(ToSchema)]
pub struct AddUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: Option<String>,
    /// `Normal User`, `Store Owner` or `System Administrator`
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct UserDoc { pub id: Uuid, pub name: String, pub email: String, pub address: Option<String>, pub role: String }

#[derive(ToSchema)]
pub struct UserEnvelopeDoc { pub message: String, pub user: UserDoc }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsDoc { pub total_users: u64, pub total_stores: u64, pub total_ratings: u64 }

#[derive(ToSchema)]
pub struct CreateStoreRequest { pub name: String, pub email: String, pub address: String }

#[derive(Serialize, ToSchema)]
pub struct StoreDoc {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    /// Two-decimal string, e.g. `"4.33"`
    pub overall_rating: String,
    pub created_at: String,
}

#[derive(ToSchema)]
pub struct StoreEnvelopeDoc { pub message: String, pub store: StoreDoc }

#[derive(ToSchema)]
pub struct StoreListingDoc {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub overall_rating: String,
    pub user_submitted_rating: Option<i32>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest { pub store_id: Uuid, pub rating: i32 }

#[derive(ToSchema)]
pub struct RatingDoc { pub id: Uuid, pub user_id: Uuid, pub store_id: Uuid, pub rating: i32, pub created_at: String }

#[derive(ToSchema)]
pub struct RatingEnvelopeDoc { pub message: String, pub rating: RatingDoc }

#[derive(Serialize, ToSchema)]
pub struct StoreRatingEntryDoc { pub rating: i32, pub created_at: String, pub user_name: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDashboardDoc { pub store_details: StoreDoc, pub ratings: Vec<StoreRatingEntryDoc> }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::users::update_password,
        crate::routes::users::change_password,
        crate::routes::users::add_user,
        crate::routes::users::list_users,
        crate::routes::users::stats,
        crate::routes::stores::list_stores,
        crate::routes::stores::create_store,
        crate::routes::stores::my_store,
        crate::routes::ratings::submit_rating,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            RegisterRequest,
            LoginRequest,
            LoginResponseDoc,
            PasswordChangeRequest,
            AddUserRequest,
            UserDoc,
            UserEnvelopeDoc,
            StatsDoc,
            CreateStoreRequest,
            StoreDoc,
            StoreEnvelopeDoc,
            StoreListingDoc,
            SubmitRatingRequest,
            RatingDoc,
            RatingEnvelopeDoc,
            StoreRatingEntryDoc,
            OwnerDashboardDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "stores"),
        (name = "ratings"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
