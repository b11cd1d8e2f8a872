use failure::Error as FailureError;
use postgres::{Client, Config as PgConfig, NoTls};
use r2d2;
use r2d2_postgres::PostgresConnectionManager;

use super::*;
use types::{DbConnection, DbPool};
use util::{execute, QueryBuilder};

pub fn create_pool(dsn: &str, pool_size: u32) -> Result<DbPool, FailureError> {
    let config = dsn.parse::<PgConfig>()?;
    let manager = PostgresConnectionManager::new(config, NoTls);

    Ok(r2d2::Pool::builder().max_size(pool_size).build(manager)?)
}

pub struct PgRepoPool {
    db_pool: DbPool,
}

impl PgRepoPool {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }
}

impl RepoPool for PgRepoPool {
    fn session(&self) -> RepoResult<Box<RepoSession>> {
        let conn = self.db_pool.get()?;
        Ok(Box::new(PgSession { conn, in_transaction: false }))
    }

    fn transaction(&self) -> RepoResult<Box<RepoSession>> {
        let mut conn = self.db_pool.get()?;
        conn.batch_execute("BEGIN")?;
        Ok(Box::new(PgSession { conn, in_transaction: true }))
    }
}

pub struct PgSession {
    conn: DbConnection,
    in_transaction: bool,
}

impl PgSession {
    fn repo<'a>(&'a mut self) -> DbRepoImpl<'a> {
        DbRepoImpl::new(&mut *self.conn)
    }
}

impl RepoSession for PgSession {
    fn jerseys<'a>(&'a mut self) -> Box<JerseyRepo + 'a> {
        Box::new(self.repo())
    }

    fn cart_items<'a>(&'a mut self) -> Box<CartItemRepo + 'a> {
        Box::new(self.repo())
    }

    fn jersey_requests<'a>(&'a mut self) -> Box<JerseyRequestRepo + 'a> {
        Box::new(self.repo())
    }

    fn orders<'a>(&'a mut self) -> Box<OrderRepo + 'a> {
        Box::new(self.repo())
    }

    fn order_items<'a>(&'a mut self) -> Box<OrderItemRepo + 'a> {
        Box::new(self.repo())
    }

    fn profiles<'a>(&'a mut self) -> Box<ProfileRepo + 'a> {
        Box::new(self.repo())
    }

    fn admin_settings<'a>(&'a mut self) -> Box<AdminSettingsRepo + 'a> {
        Box::new(self.repo())
    }

    fn wishlists<'a>(&'a mut self) -> Box<WishlistRepo + 'a> {
        Box::new(self.repo())
    }

    fn user_roles<'a>(&'a mut self) -> Box<UserRoleRepo + 'a> {
        Box::new(self.repo())
    }

    fn commit(mut self: Box<Self>) -> RepoResult<()> {
        if self.in_transaction {
            self.in_transaction = false;
            self.conn.batch_execute("COMMIT")?;
        }
        Ok(())
    }
}

impl Drop for PgSession {
    fn drop(&mut self) {
        if self.in_transaction {
            if let Err(e) = self.conn.batch_execute("ROLLBACK") {
                error!("Failed to roll back transaction: {}", e);
            }
        }
    }
}

/// Generic table repo over a borrowed connection
pub struct DbRepoImpl<'a> {
    conn: &'a mut Client,
}

impl<'a> DbRepoImpl<'a> {
    pub fn new(conn: &'a mut Client) -> Self {
        Self { conn }
    }
}

impl<'a, T, I, F, U> DbRepo<T, I, F, U> for DbRepoImpl<'a>
where
    T: DbEntity,
    I: Inserter<T>,
    F: Filter<T>,
    U: Updater<T>,
{
    fn insert(&mut self, inserter: I) -> RepoResult<T> {
        let rows = execute(self.conn, inserter.into_insert_builder(T::TABLE))?;
        match rows.first() {
            Some(row) => T::from_row(row),
            None => Err(RepoError::Data {
                reason: format!("insert into {} returned no rows", T::TABLE),
            }),
        }
    }

    fn select(&mut self, filter: F) -> RepoResult<Vec<T>> {
        let builder = filter
            .into_filtered_builder(QueryBuilder::select(T::TABLE))
            .with_extra("ORDER BY created_at DESC");

        execute(self.conn, builder)?.iter().map(T::from_row).collect()
    }

    fn update(&mut self, updater: U) -> RepoResult<Vec<T>> {
        execute(self.conn, updater.into_update_builder(T::TABLE))?
            .iter()
            .map(T::from_row)
            .collect()
    }

    fn delete(&mut self, filter: F) -> RepoResult<Vec<T>> {
        execute(self.conn, filter.into_filtered_builder(QueryBuilder::delete(T::TABLE)))?
            .iter()
            .map(T::from_row)
            .collect()
    }
}
