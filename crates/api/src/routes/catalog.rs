//! Route definitions for the public catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/catalog`. All are GET and unauthenticated.
///
/// ```text
/// /groups/                           list
/// /groups/{id}/                      detail
/// /groups/{id}/albums/               albums of a group
/// /groups/{id}/photocards/           photocards of a group
/// /groups/{id}/lightsticks/          lightsticks of a group
/// /members/                          list
/// /members/{id}/                     detail
/// /members/{id}/photocards/          photocards of a member
/// /albums/                           list
/// /albums/{id}/                      detail
/// /albums/{id}/photocards/           photocards across an album's versions
/// /album-versions/                   list
/// /album-versions/{id}/              detail
/// /album-versions/{id}/photocards/   photocards of a version
/// /photocards/                       list
/// /photocards/{id}/                  detail
/// /lightsticks/                      list
/// /lightsticks/{id}/                 detail
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groups/", get(catalog::list_groups))
        .route("/groups/{id}/", get(catalog::get_group))
        .route("/groups/{id}/albums/", get(catalog::group_albums))
        .route("/groups/{id}/photocards/", get(catalog::group_photocards))
        .route("/groups/{id}/lightsticks/", get(catalog::group_lightsticks))
        .route("/members/", get(catalog::list_members))
        .route("/members/{id}/", get(catalog::get_member))
        .route("/members/{id}/photocards/", get(catalog::member_photocards))
        .route("/albums/", get(catalog::list_albums))
        .route("/albums/{id}/", get(catalog::get_album))
        .route("/albums/{id}/photocards/", get(catalog::album_photocards))
        .route("/album-versions/", get(catalog::list_album_versions))
        .route("/album-versions/{id}/", get(catalog::get_album_version))
        .route(
            "/album-versions/{id}/photocards/",
            get(catalog::album_version_photocards),
        )
        .route("/photocards/", get(catalog::list_photocards))
        .route("/photocards/{id}/", get(catalog::get_photocard))
        .route("/lightsticks/", get(catalog::list_lightsticks))
        .route("/lightsticks/{id}/", get(catalog::get_lightstick))
}
