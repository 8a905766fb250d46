//! Route definitions for the signed-in user's collection.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{account, collection, favorites, wishlist};
use crate::state::AppState;

/// Routes mounted at `/collection`. All require auth.
///
/// ```text
/// GET, POST          /collectibles/                list, create
/// POST               /collectibles/add/            create
/// GET                /collectibles/{type}/         all of one type
/// GET, PATCH, DELETE /collectibles/{id}/           owner only
/// GET, POST          /wishlist/                    list, create
/// POST               /wishlist/add/                create
/// GET                /wishlist/{type}/             all of one type
/// GET, PATCH, DELETE /wishlist/{id}/               owner only
/// GET, POST          /favorites/                   list, add
/// POST               /favorites/add/               add
/// GET, DELETE        /favorites/{id}/              owner only
/// GET                /stats/                       collection statistics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/collectibles/",
            get(collection::list_collectibles).post(collection::create_collectible),
        )
        .route("/collectibles/add/", post(collection::create_collectible))
        .route(
            "/collectibles/{id}/",
            get(collection::get_collectible_or_type)
                .patch(collection::update_collectible)
                .delete(collection::delete_collectible),
        )
        .route(
            "/wishlist/",
            get(wishlist::list_wishlist).post(wishlist::create_wishlist_item),
        )
        .route("/wishlist/add/", post(wishlist::create_wishlist_item))
        .route(
            "/wishlist/{id}/",
            get(wishlist::get_wishlist_item_or_type)
                .patch(wishlist::update_wishlist_item)
                .delete(wishlist::delete_wishlist_item),
        )
        .route(
            "/favorites/",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route("/favorites/add/", post(favorites::add_favorite))
        .route(
            "/favorites/{id}/",
            get(favorites::get_favorite).delete(favorites::delete_favorite),
        )
        .route("/stats/", get(account::collection_stats))
}
