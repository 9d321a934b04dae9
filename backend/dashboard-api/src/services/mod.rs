mod app_service;
mod auth_service;
mod content_service;
pub mod history;
mod phone_app_rel_service;
mod phone_number_service;
mod post_service;
mod product_service;
mod user_service;

pub use app_service::*;
pub use auth_service::*;
pub use content_service::*;
pub use phone_app_rel_service::*;
pub use phone_number_service::*;
pub use post_service::*;
pub use product_service::*;
pub use user_service::*;
