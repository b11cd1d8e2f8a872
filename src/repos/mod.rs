//! Table access. Every table gets a repo trait over `DbRepo`, implemented by
//! `DbRepoImpl` (Postgres) and `MemoryRepoImpl` (tests and local runs).

pub mod admin_settings;
pub mod cart_item;
pub mod jersey;
pub mod jersey_request;
pub mod memory;
pub mod order;
pub mod order_item;
pub mod pg;
pub mod profile;
pub mod user_role;
pub mod wishlist;

pub use self::admin_settings::*;
pub use self::cart_item::*;
pub use self::jersey::*;
pub use self::jersey_request::*;
pub use self::memory::{MemoryRepoImpl, MemoryRepoPool, MemoryTables};
pub use self::order::*;
pub use self::order_item::*;
pub use self::pg::{DbRepoImpl, PgRepoPool};
pub use self::profile::*;
pub use self::user_role::*;
pub use self::wishlist::*;

use std::str::FromStr;

use postgres::Row;

pub use errors::RepoError;
use util::QueryBuilder;

pub type RepoResult<T> = Result<T, RepoError>;

/// Row type of one table
pub trait DbEntity: Clone + Send + Sized + 'static {
    const TABLE: &'static str;

    fn from_row(row: &Row) -> RepoResult<Self>;

    fn memory_table(tables: &mut MemoryTables) -> &mut Vec<Self>;
}

pub trait Inserter<T>: Send {
    fn into_insert_builder(self, table: &'static str) -> QueryBuilder;

    fn into_entity(self) -> T;

    /// Folds the new row into `existing` when both share a unique key.
    /// Stores without an upsert of their own use it to mirror `ON CONFLICT`.
    fn merge_into(&self, _existing: &mut T) -> bool {
        false
    }
}

pub trait Filter<T>: Send {
    fn into_filtered_builder(self, builder: QueryBuilder) -> QueryBuilder;

    fn matches(&self, entity: &T) -> bool;
}

pub trait Updater<T>: Send {
    type Filter: Filter<T>;

    fn into_update_builder(self, table: &'static str) -> QueryBuilder;

    fn filter(&self) -> &Self::Filter;

    fn apply(&self, entity: &mut T);
}

/// Select, insert, update and delete over one table. Selects are newest first.
pub trait DbRepo<T, I, F, U> {
    fn insert(&mut self, inserter: I) -> RepoResult<T>;

    fn select(&mut self, filter: F) -> RepoResult<Vec<T>>;

    fn update(&mut self, updater: U) -> RepoResult<Vec<T>>;

    fn delete(&mut self, filter: F) -> RepoResult<Vec<T>>;

    fn select_one(&mut self, filter: F) -> RepoResult<Option<T>> {
        Ok(self.select(filter)?.into_iter().next())
    }
}

/// Unit of work handed to services. Dropping a transaction without `commit` rolls it back.
pub trait RepoSession {
    fn jerseys<'a>(&'a mut self) -> Box<JerseyRepo + 'a>;
    fn cart_items<'a>(&'a mut self) -> Box<CartItemRepo + 'a>;
    fn jersey_requests<'a>(&'a mut self) -> Box<JerseyRequestRepo + 'a>;
    fn orders<'a>(&'a mut self) -> Box<OrderRepo + 'a>;
    fn order_items<'a>(&'a mut self) -> Box<OrderItemRepo + 'a>;
    fn profiles<'a>(&'a mut self) -> Box<ProfileRepo + 'a>;
    fn admin_settings<'a>(&'a mut self) -> Box<AdminSettingsRepo + 'a>;
    fn wishlists<'a>(&'a mut self) -> Box<WishlistRepo + 'a>;
    fn user_roles<'a>(&'a mut self) -> Box<UserRoleRepo + 'a>;

    fn commit(self: Box<Self>) -> RepoResult<()>;
}

pub trait RepoPool: Send + Sync {
    /// Autocommit session
    fn session(&self) -> RepoResult<Box<RepoSession>>;

    fn transaction(&self) -> RepoResult<Box<RepoSession>>;
}

/// Parses an enum stored as text
pub fn parse_column<T>(row: &Row, column: &str) -> RepoResult<T>
where
    T: FromStr,
    T::Err: ::std::fmt::Display,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: T::Err| RepoError::Data {
        reason: format!("column {}: {}", column, e),
    })
}

/// Same as `parse_column` for nullable columns
pub fn parse_optional_column<T>(row: &Row, column: &str) -> RepoResult<Option<T>>
where
    T: FromStr,
    T::Err: ::std::fmt::Display,
{
    let raw: Option<String> = row.try_get(column)?;
    match raw {
        Some(raw) => raw.parse().map(Some).map_err(|e: T::Err| RepoError::Data {
            reason: format!("column {}: {}", column, e),
        }),
        None => Ok(None),
    }
}
