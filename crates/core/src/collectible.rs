//! The photocard/lightstick union shared by collection and wishlist entries.
//!
//! Rows store a `collectible_type` tag plus two nullable foreign keys. In code
//! the pair is always handled as a [`CollectibleRef`], which can only be built
//! through [`CollectibleRef::from_parts`] or [`CollectibleRef::merge`], so a
//! tag/reference mismatch never reaches the repository layer.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Discriminator stored in the `collectible_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectibleType {
    Photocard,
    Lightstick,
}

/// Valid values for the `collectible_type` column.
pub const COLLECTIBLE_TYPES: &[&str] = &["photocard", "lightstick"];

impl CollectibleType {
    pub const ALL: [CollectibleType; 2] = [CollectibleType::Photocard, CollectibleType::Lightstick];

    pub fn as_str(self) -> &'static str {
        match self {
            CollectibleType::Photocard => "photocard",
            CollectibleType::Lightstick => "lightstick",
        }
    }
}

impl fmt::Display for CollectibleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectibleType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photocard" => Ok(CollectibleType::Photocard),
            "lightstick" => Ok(CollectibleType::Lightstick),
            other => Err(CoreError::invalid_field(
                "collectible_type",
                format!("'{other}' is not a valid collectible type (expected 'photocard' or 'lightstick')"),
            )),
        }
    }
}

/// A reference to exactly one catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleRef {
    Photocard(DbId),
    Lightstick(DbId),
}

impl CollectibleRef {
    /// Build a reference from the tag and the two optional ids of a payload.
    ///
    /// The id matching the tag must be present and the other must be absent.
    pub fn from_parts(
        kind: CollectibleType,
        photocard: Option<DbId>,
        lightstick: Option<DbId>,
    ) -> Result<Self, CoreError> {
        match (kind, photocard, lightstick) {
            (CollectibleType::Photocard, Some(id), None) => Ok(CollectibleRef::Photocard(id)),
            (CollectibleType::Lightstick, None, Some(id)) => Ok(CollectibleRef::Lightstick(id)),
            (CollectibleType::Photocard, None, _) => Err(CoreError::invalid_field(
                "photocard",
                "A photocard must be specified for collectible_type 'photocard'",
            )),
            (CollectibleType::Lightstick, _, None) => Err(CoreError::invalid_field(
                "lightstick",
                "A lightstick must be specified for collectible_type 'lightstick'",
            )),
            (CollectibleType::Photocard, Some(_), Some(_)) => Err(CoreError::invalid_field(
                "lightstick",
                "A lightstick cannot be set for collectible_type 'photocard'",
            )),
            (CollectibleType::Lightstick, Some(_), Some(_)) => Err(CoreError::invalid_field(
                "photocard",
                "A photocard cannot be set for collectible_type 'lightstick'",
            )),
        }
    }

    /// Apply a partial update to an existing reference.
    ///
    /// Fields absent from the patch keep their current value, except that the
    /// current id is dropped when the patch switches to the other type.
    pub fn merge(
        self,
        kind: Option<CollectibleType>,
        photocard: Option<DbId>,
        lightstick: Option<DbId>,
    ) -> Result<Self, CoreError> {
        let kind = kind.unwrap_or(self.kind());
        let photocard = photocard.or(match (kind, self) {
            (CollectibleType::Photocard, CollectibleRef::Photocard(id)) => Some(id),
            _ => None,
        });
        let lightstick = lightstick.or(match (kind, self) {
            (CollectibleType::Lightstick, CollectibleRef::Lightstick(id)) => Some(id),
            _ => None,
        });
        Self::from_parts(kind, photocard, lightstick)
    }

    /// Rebuild a reference from a stored row.
    ///
    /// The CHECK constraint on both tables guarantees consistency, so a
    /// mismatch here is an internal error rather than a validation error.
    pub fn from_row(
        kind: &str,
        photocard: Option<DbId>,
        lightstick: Option<DbId>,
    ) -> Result<Self, CoreError> {
        let kind: CollectibleType = kind
            .parse()
            .map_err(|_| CoreError::Internal(format!("unknown collectible_type '{kind}' in row")))?;
        Self::from_parts(kind, photocard, lightstick)
            .map_err(|e| CoreError::Internal(format!("inconsistent collectible row: {e}")))
    }

    pub fn kind(&self) -> CollectibleType {
        match self {
            CollectibleRef::Photocard(_) => CollectibleType::Photocard,
            CollectibleRef::Lightstick(_) => CollectibleType::Lightstick,
        }
    }

    pub fn photocard_id(&self) -> Option<DbId> {
        match self {
            CollectibleRef::Photocard(id) => Some(*id),
            CollectibleRef::Lightstick(_) => None,
        }
    }

    pub fn lightstick_id(&self) -> Option<DbId> {
        match self {
            CollectibleRef::Lightstick(id) => Some(*id),
            CollectibleRef::Photocard(_) => None,
        }
    }
}

/// `purchase_price` is NUMERIC(10,2).
const PRICE_MAX_SCALE: u32 = 2;
const PRICE_MAX_INTEGER_DIGITS: u32 = 8;

/// `priority` is NUMERIC(3,1).
const PRIORITY_MAX_SCALE: u32 = 1;
const PRIORITY_MAX_INTEGER_DIGITS: u32 = 2;

/// Validate a purchase price: non-negative, at most 2 decimal places and
/// at most 8 digits before the decimal point.
pub fn validate_purchase_price(price: &Decimal) -> Result<(), CoreError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CoreError::invalid_field(
            "purchase_price",
            "Purchase price cannot be negative",
        ));
    }
    check_numeric(
        "purchase_price",
        price,
        PRICE_MAX_SCALE,
        PRICE_MAX_INTEGER_DIGITS,
    )
}

/// Validate a wishlist priority: at most 1 decimal place and 2 integer digits.
pub fn validate_priority(priority: &Decimal) -> Result<(), CoreError> {
    check_numeric(
        "priority",
        priority,
        PRIORITY_MAX_SCALE,
        PRIORITY_MAX_INTEGER_DIGITS,
    )
}

fn check_numeric(
    field: &str,
    value: &Decimal,
    max_scale: u32,
    max_integer_digits: u32,
) -> Result<(), CoreError> {
    let normalized = value.normalize();
    if normalized.scale() > max_scale {
        return Err(CoreError::invalid_field(
            field,
            format!("Ensure that there are no more than {max_scale} decimal places"),
        ));
    }
    let limit = Decimal::from(10_i64.pow(max_integer_digits));
    if normalized.abs().trunc() >= limit {
        return Err(CoreError::invalid_field(
            field,
            format!("Ensure that there are no more than {max_integer_digits} digits before the decimal point"),
        ));
    }
    Ok(())
}

/// Quantity must be at least one.
pub fn validate_quantity(quantity: i32) -> Result<(), CoreError> {
    if quantity < 1 {
        return Err(CoreError::invalid_field(
            "quantity",
            "Ensure this value is greater than or equal to 1",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn photocard_tag_requires_photocard_reference() {
        let err = CollectibleRef::from_parts(CollectibleType::Photocard, None, None).unwrap_err();
        assert_matches!(err, CoreError::InvalidField { ref field, .. } if field == "photocard");

        // Supplying only the lightstick does not satisfy a photocard tag.
        let err =
            CollectibleRef::from_parts(CollectibleType::Photocard, None, Some(Uuid::new_v4()))
                .unwrap_err();
        assert_matches!(err, CoreError::InvalidField { ref field, .. } if field == "photocard");
    }

    #[test]
    fn lightstick_tag_requires_lightstick_reference() {
        let err =
            CollectibleRef::from_parts(CollectibleType::Lightstick, Some(Uuid::new_v4()), None)
                .unwrap_err();
        assert_matches!(err, CoreError::InvalidField { ref field, .. } if field == "lightstick");
    }

    #[test]
    fn both_references_are_rejected() {
        let err = CollectibleRef::from_parts(
            CollectibleType::Photocard,
            Some(Uuid::new_v4()),
            Some(Uuid::new_v4()),
        )
        .unwrap_err();
        assert_matches!(err, CoreError::InvalidField { ref field, .. } if field == "lightstick");
    }

    #[test]
    fn matching_reference_is_accepted() {
        let id = Uuid::new_v4();
        let r = CollectibleRef::from_parts(CollectibleType::Lightstick, None, Some(id)).unwrap();
        assert_eq!(r, CollectibleRef::Lightstick(id));
        assert_eq!(r.kind(), CollectibleType::Lightstick);
        assert_eq!(r.lightstick_id(), Some(id));
        assert_eq!(r.photocard_id(), None);
    }

    #[test]
    fn merge_keeps_current_reference_when_untouched() {
        let id = Uuid::new_v4();
        let merged = CollectibleRef::Photocard(id).merge(None, None, None).unwrap();
        assert_eq!(merged, CollectibleRef::Photocard(id));
    }

    #[test]
    fn merge_switches_type_when_new_reference_given() {
        let lightstick = Uuid::new_v4();
        let merged = CollectibleRef::Photocard(Uuid::new_v4())
            .merge(Some(CollectibleType::Lightstick), None, Some(lightstick))
            .unwrap();
        assert_eq!(merged, CollectibleRef::Lightstick(lightstick));
    }

    #[test]
    fn merge_rejects_type_switch_without_reference() {
        let err = CollectibleRef::Photocard(Uuid::new_v4())
            .merge(Some(CollectibleType::Lightstick), None, None)
            .unwrap_err();
        assert_matches!(err, CoreError::InvalidField { ref field, .. } if field == "lightstick");
    }

    #[test]
    fn merge_rejects_foreign_reference_without_type_switch() {
        let err = CollectibleRef::Photocard(Uuid::new_v4())
            .merge(None, None, Some(Uuid::new_v4()))
            .unwrap_err();
        assert_matches!(err, CoreError::InvalidField { .. });
    }

    #[test]
    fn collectible_type_parses_known_values_only() {
        assert_eq!("photocard".parse::<CollectibleType>().unwrap(), CollectibleType::Photocard);
        assert_eq!("lightstick".parse::<CollectibleType>().unwrap(), CollectibleType::Lightstick);
        assert!("album".parse::<CollectibleType>().is_err());
    }

    #[test]
    fn purchase_price_limits() {
        assert!(validate_purchase_price(&Decimal::new(1999, 2)).is_ok());
        assert!(validate_purchase_price(&Decimal::new(0, 0)).is_ok());
        assert!(validate_purchase_price(&Decimal::new(-100, 2)).is_err());
        assert!(validate_purchase_price(&Decimal::new(1999, 3)).is_err());
        assert!(validate_purchase_price(&Decimal::new(99_999_999_99, 2)).is_ok());
        assert!(validate_purchase_price(&Decimal::new(100_000_000_00, 2)).is_err());
    }

    #[test]
    fn priority_limits() {
        assert!(validate_priority(&Decimal::new(45, 1)).is_ok());
        assert!(validate_priority(&Decimal::new(999, 1)).is_ok());
        assert!(validate_priority(&Decimal::new(1000, 1)).is_err());
        assert!(validate_priority(&Decimal::new(455, 2)).is_err());
        // Trailing zeros do not count against the scale.
        assert!(validate_priority(&Decimal::new(4500, 3)).is_ok());
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }
}
