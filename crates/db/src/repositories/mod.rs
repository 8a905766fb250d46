//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Catalog `create` functions take
//! any `PgExecutor` so the seed tool can run them inside a transaction.
//! List endpoints declare their filters, search columns and ordering as an
//! associated `LIST` spec whose column names use the table aliases of that
//! repository's queries.

pub mod album_repo;
pub mod album_version_repo;
pub mod collectible_repo;
pub mod favorite_repo;
pub mod group_repo;
pub mod lightstick_repo;
pub mod member_repo;
pub mod photocard_repo;
pub mod session_repo;
pub mod stats_repo;
pub mod user_repo;
pub mod wishlist_repo;

pub use album_repo::AlbumRepo;
pub use album_version_repo::AlbumVersionRepo;
pub use collectible_repo::CollectibleRepo;
pub use favorite_repo::FavoriteRepo;
pub use group_repo::GroupRepo;
pub use lightstick_repo::LightstickRepo;
pub use member_repo::MemberRepo;
pub use photocard_repo::PhotocardRepo;
pub use session_repo::SessionRepo;
pub use stats_repo::StatsRepo;
pub use user_repo::UserRepo;
pub use wishlist_repo::WishlistRepo;
