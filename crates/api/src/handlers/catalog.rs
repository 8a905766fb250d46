//! Read-only handlers for the public catalog.
//!
//! Every list endpoint accepts the filters, `search`, `ordering` and `page`
//! parameters declared by its repository's `LIST` spec. Sub-listings under a
//! parent resource apply the same parameters after scoping to the parent,
//! and 404 when the parent does not exist.

use std::collections::HashMap;

use axum::extract::{OriginalUri, State};
use axum::http::Uri;
use axum::Json;
use byeolpedia_core::error::CoreError;
use byeolpedia_core::listing::ListQuery;
use byeolpedia_core::types::DbId;
use byeolpedia_db::models::album::{AlbumDetail, AlbumListItem, AlbumVersionItem};
use byeolpedia_db::models::group::{GroupDetail, GroupListItem};
use byeolpedia_db::models::lightstick::{LightstickDetail, LightstickListItem};
use byeolpedia_db::models::member::Member;
use byeolpedia_db::models::photocard::{PhotocardDetail, PhotocardListItem};
use byeolpedia_db::repositories::{
    AlbumRepo, AlbumVersionRepo, GroupRepo, LightstickRepo, MemberRepo, PhotocardRepo,
};

use crate::error::AppResult;
use crate::extract::{ApiPath, ApiQuery};
use crate::response::Paginated;
use crate::state::AppState;

type Params = ApiQuery<HashMap<String, String>>;
type ListResponse<T> = AppResult<Json<Paginated<T>>>;

fn not_found(entity: &'static str, id: DbId) -> CoreError {
    CoreError::NotFound { entity, id }
}

fn ensure_exists(exists: bool, entity: &'static str, id: DbId) -> Result<(), CoreError> {
    if exists {
        Ok(())
    } else {
        Err(not_found(entity, id))
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// GET /api/catalog/groups/
pub async fn list_groups(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): Params,
) -> ListResponse<GroupListItem> {
    let query = GroupRepo::LIST.parse(&params)?;
    let page = GroupRepo::list(&state.pool, &query).await?;
    Ok(Json(Paginated::from_page(page, query.page, &uri)?))
}

/// GET /api/catalog/groups/{id}/
pub async fn get_group(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<GroupDetail>> {
    let group = GroupRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(not_found("Group", id))?;
    Ok(Json(group))
}

/// GET /api/catalog/groups/{id}/albums/
pub async fn group_albums(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<DbId>,
    ApiQuery(params): Params,
) -> ListResponse<AlbumListItem> {
    ensure_exists(GroupRepo::exists(&state.pool, id).await?, "Group", id)?;
    let query = AlbumRepo::LIST.parse(&params)?.scoped(AlbumRepo::BY_GROUP, id);
    albums_page(&state, query, &uri).await
}

/// GET /api/catalog/groups/{id}/photocards/
pub async fn group_photocards(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<DbId>,
    ApiQuery(params): Params,
) -> ListResponse<PhotocardListItem> {
    ensure_exists(GroupRepo::exists(&state.pool, id).await?, "Group", id)?;
    let query = PhotocardRepo::LIST
        .parse(&params)?
        .scoped(PhotocardRepo::BY_GROUP, id);
    photocards_page(&state, query, &uri).await
}

/// GET /api/catalog/groups/{id}/lightsticks/
pub async fn group_lightsticks(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<DbId>,
    ApiQuery(params): Params,
) -> ListResponse<LightstickListItem> {
    ensure_exists(GroupRepo::exists(&state.pool, id).await?, "Group", id)?;
    let query = LightstickRepo::LIST
        .parse(&params)?
        .scoped(LightstickRepo::BY_GROUP, id);
    lightsticks_page(&state, query, &uri).await
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// GET /api/catalog/members/
pub async fn list_members(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): Params,
) -> ListResponse<Member> {
    let query = MemberRepo::LIST.parse(&params)?;
    let page = MemberRepo::list(&state.pool, &query).await?;
    Ok(Json(Paginated::from_page(page, query.page, &uri)?))
}

/// GET /api/catalog/members/{id}/
pub async fn get_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Member>> {
    let member = MemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found("Member", id))?;
    Ok(Json(member))
}

/// GET /api/catalog/members/{id}/photocards/
pub async fn member_photocards(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<DbId>,
    ApiQuery(params): Params,
) -> ListResponse<PhotocardListItem> {
    ensure_exists(MemberRepo::exists(&state.pool, id).await?, "Member", id)?;
    let query = PhotocardRepo::LIST
        .parse(&params)?
        .scoped(PhotocardRepo::BY_MEMBER, id);
    photocards_page(&state, query, &uri).await
}

// ---------------------------------------------------------------------------
// Albums and versions
// ---------------------------------------------------------------------------

/// GET /api/catalog/albums/
pub async fn list_albums(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): Params,
) -> ListResponse<AlbumListItem> {
    let query = AlbumRepo::LIST.parse(&params)?;
    albums_page(&state, query, &uri).await
}

/// GET /api/catalog/albums/{id}/
pub async fn get_album(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<AlbumDetail>> {
    let album = AlbumRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(not_found("Album", id))?;
    Ok(Json(album))
}

/// GET /api/catalog/albums/{id}/photocards/
pub async fn album_photocards(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<DbId>,
    ApiQuery(params): Params,
) -> ListResponse<PhotocardListItem> {
    ensure_exists(AlbumRepo::exists(&state.pool, id).await?, "Album", id)?;
    let query = PhotocardRepo::LIST
        .parse(&params)?
        .scoped(PhotocardRepo::BY_ALBUM, id);
    photocards_page(&state, query, &uri).await
}

/// GET /api/catalog/album-versions/
pub async fn list_album_versions(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): Params,
) -> ListResponse<AlbumVersionItem> {
    let query = AlbumVersionRepo::LIST.parse(&params)?;
    let page = AlbumVersionRepo::list(&state.pool, &query).await?;
    Ok(Json(Paginated::from_page(page, query.page, &uri)?))
}

/// GET /api/catalog/album-versions/{id}/
pub async fn get_album_version(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<AlbumVersionItem>> {
    let version = AlbumVersionRepo::find_item(&state.pool, id)
        .await?
        .ok_or(not_found("AlbumVersion", id))?;
    Ok(Json(version))
}

/// GET /api/catalog/album-versions/{id}/photocards/
pub async fn album_version_photocards(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<DbId>,
    ApiQuery(params): Params,
) -> ListResponse<PhotocardListItem> {
    ensure_exists(
        AlbumVersionRepo::exists(&state.pool, id).await?,
        "AlbumVersion",
        id,
    )?;
    let query = PhotocardRepo::LIST
        .parse(&params)?
        .scoped(PhotocardRepo::BY_ALBUM_VERSION, id);
    photocards_page(&state, query, &uri).await
}

// ---------------------------------------------------------------------------
// Photocards and lightsticks
// ---------------------------------------------------------------------------

/// GET /api/catalog/photocards/
pub async fn list_photocards(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): Params,
) -> ListResponse<PhotocardListItem> {
    let query = PhotocardRepo::LIST.parse(&params)?;
    photocards_page(&state, query, &uri).await
}

/// GET /api/catalog/photocards/{id}/
pub async fn get_photocard(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<PhotocardDetail>> {
    let photocard = PhotocardRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(not_found("Photocard", id))?;
    Ok(Json(photocard))
}

/// GET /api/catalog/lightsticks/
pub async fn list_lightsticks(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(params): Params,
) -> ListResponse<LightstickListItem> {
    let query = LightstickRepo::LIST.parse(&params)?;
    lightsticks_page(&state, query, &uri).await
}

/// GET /api/catalog/lightsticks/{id}/
pub async fn get_lightstick(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<LightstickDetail>> {
    let lightstick = LightstickRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(not_found("Lightstick", id))?;
    Ok(Json(lightstick))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn albums_page(
    state: &AppState,
    query: ListQuery,
    uri: &Uri,
) -> ListResponse<AlbumListItem> {
    let page = AlbumRepo::list(&state.pool, &query).await?;
    Ok(Json(Paginated::from_page(page, query.page, uri)?))
}

async fn photocards_page(
    state: &AppState,
    query: ListQuery,
    uri: &Uri,
) -> ListResponse<PhotocardListItem> {
    let page = PhotocardRepo::list(&state.pool, &query).await?;
    Ok(Json(Paginated::from_page(page, query.page, uri)?))
}

async fn lightsticks_page(
    state: &AppState,
    query: ListQuery,
    uri: &Uri,
) -> ListResponse<LightstickListItem> {
    let page = LightstickRepo::list(&state.pool, &query).await?;
    Ok(Json(Paginated::from_page(page, query.page, uri)?))
}
