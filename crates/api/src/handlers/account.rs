//! Handlers for the signed-in user's own profile and collection statistics.

use axum::extract::State;
use axum::Json;
use byeolpedia_core::error::CoreError;
use byeolpedia_db::models::stats::CollectionStats;
use byeolpedia_db::models::user::{UpdateProfile, User, UserProfile, UserResponse};
use byeolpedia_db::repositories::{StatsRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{nullable, ApiJson};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `PATCH /auth/profile/`. Other fields are ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 150, message = "Ensure this field has 1 to 150 characters."))]
    pub collector_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(url(message = "Enter a valid URL."))]
    pub profile_pic: Option<Option<String>>,
}

/// GET /api/auth/profile/
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(build_profile(&state, &auth.user).await?))
}

/// PATCH /api/auth/profile/
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    input.validate()?;

    let changes = UpdateProfile {
        collector_name: input.collector_name.map(|s| s.trim().to_string()),
        profile_pic: input.profile_pic,
    };
    let user = UserRepo::update_profile(&state.pool, auth.user_id, &changes)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;
    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(Json(build_profile(&state, &user).await?))
}

/// GET /api/auth/stats/ and GET /api/collection/stats/
pub async fn collection_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<CollectionStats>> {
    let stats = StatsRepo::collection_stats(&state.pool, auth.user_id).await?;
    Ok(Json(stats))
}

async fn build_profile(state: &AppState, user: &User) -> AppResult<UserProfile> {
    let totals = StatsRepo::totals(&state.pool, user.id).await?;
    Ok(UserProfile {
        user: UserResponse::from(user),
        total_albums: totals.total_albums,
        total_photocards: totals.total_photocards,
        total_lightsticks: totals.total_lightsticks,
    })
}
