pub mod university;
pub mod announcement;
pub mod admin;
pub mod extracted;

pub use university::*;
pub use announcement::*;
pub use admin::*;
pub use extracted::*;

use serde::{Deserialize, Deserializer};

/// Reads an explicit JSON `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps an explicit JSON `null` apart from an absent field: absent stays
/// `None` through `#[serde(default)]`, `null` becomes `Some(None)`.
pub(crate) fn null_as_clear<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}
