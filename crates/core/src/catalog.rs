//! Catalog enumerations.
//!
//! Stored as TEXT with CHECK constraints; these lists must match
//! `db/migrations/20250101000001_create_catalog_tables.sql`.

use crate::error::CoreError;

pub const GROUP_TYPE_GIRL_GROUP: &str = "girl_group";
pub const GROUP_TYPE_BOY_GROUP: &str = "boy_group";
pub const GROUP_TYPE_SOLO: &str = "solo";

/// Valid values for `groups.group_type`.
pub const GROUP_TYPES: &[&str] = &[GROUP_TYPE_GIRL_GROUP, GROUP_TYPE_BOY_GROUP, GROUP_TYPE_SOLO];

pub const ALBUM_TYPE_MINI: &str = "mini_album";
pub const ALBUM_TYPE_STUDIO: &str = "studio_album";
pub const ALBUM_TYPE_SINGLE: &str = "single_album";

/// Valid values for `albums.album_type`.
pub const ALBUM_TYPES: &[&str] = &[ALBUM_TYPE_MINI, ALBUM_TYPE_STUDIO, ALBUM_TYPE_SINGLE];

/// Default `photocards.photocard_type` for regular member cards.
pub const PHOTOCARD_TYPE_MEMBER: &str = "member";

pub fn validate_group_type(value: &str) -> Result<(), CoreError> {
    validate_choice("group_type", value, GROUP_TYPES)
}

pub fn validate_album_type(value: &str) -> Result<(), CoreError> {
    validate_choice("album_type", value, ALBUM_TYPES)
}

/// Check `value` against a fixed set of choices.
pub fn validate_choice(field: &str, value: &str, choices: &[&str]) -> Result<(), CoreError> {
    if choices.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::invalid_field(
            field,
            format!(
                "'{value}' is not a valid choice (expected one of: {})",
                choices.join(", ")
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_group_types_pass() {
        for t in GROUP_TYPES {
            assert!(validate_group_type(t).is_ok());
        }
        assert!(validate_group_type("co_ed").is_err());
    }

    #[test]
    fn album_type_error_lists_choices() {
        let err = validate_album_type("ep").unwrap_err().to_string();
        assert!(err.contains("mini_album"));
        assert!(err.contains("album_type"));
    }
}
