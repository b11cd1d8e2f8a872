pub mod admin_settings;
pub mod cart;
pub mod cart_item;
pub mod catalog;
pub mod common;
pub mod jersey;
pub mod jersey_request;
pub mod order;
pub mod profile;
pub mod user_role;
pub mod wishlist;

pub use self::admin_settings::*;
pub use self::cart::*;
pub use self::cart_item::*;
pub use self::catalog::*;
pub use self::common::*;
pub use self::jersey::*;
pub use self::jersey_request::*;
pub use self::order::*;
pub use self::profile::*;
pub use self::user_role::*;
pub use self::wishlist::*;
