pub mod types;
pub use self::types::*;

pub mod system;
pub use self::system::*;

pub mod admin;
pub use self::admin::*;

pub mod cart;
pub use self::cart::*;

pub mod catalog;
pub use self::catalog::*;

pub mod contact;
pub use self::contact::*;

pub mod jersey_request;
pub use self::jersey_request::*;

pub mod order;
pub use self::order::*;

pub mod profile;
pub use self::profile::*;

pub mod roles;
pub use self::roles::*;

pub mod wishlist;
pub use self::wishlist::*;
