mod app;
mod content;
mod phone_app_rel;
mod phone_number;
mod post;
mod product;
mod user;

pub use app::*;
pub use content::*;
pub use phone_app_rel::*;
pub use phone_number::*;
pub use post::*;
pub use product::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
/// in partial updates.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
