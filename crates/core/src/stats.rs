//! Collection statistics arithmetic.

/// Percentage of a group's catalog photocards a user owns, rounded to two
/// decimal places.
///
/// Returns `None` when the group has no photocards in the catalog; such groups
/// are left out of completion reports instead of reporting a division by zero.
/// Owned rows include duplicates, so the result may exceed 100.
pub fn completion_percentage(owned: i64, total: i64) -> Option<f64> {
    if total <= 0 {
        return None;
    }
    Some(round2(owned as f64 / total as f64 * 100.0))
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
