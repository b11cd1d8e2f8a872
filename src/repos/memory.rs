use std::sync::{Arc, Mutex, MutexGuard};

use super::*;
use models::*;

/// Every table kept as a plain vector in insertion order
#[derive(Clone, Debug, Default)]
pub struct MemoryTables {
    pub jerseys: Vec<Jersey>,
    pub cart_items: Vec<CartItem>,
    pub jersey_requests: Vec<JerseyRequest>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub profiles: Vec<Profile>,
    pub admin_settings: Vec<AdminSettings>,
    pub wishlists: Vec<WishlistEntry>,
    pub user_roles: Vec<UserRoleEntry>,
}

pub type MemoryStorage = Arc<Mutex<MemoryTables>>;

fn lock(storage: &MemoryStorage) -> RepoResult<MutexGuard<MemoryTables>> {
    storage.lock().map_err(|_| RepoError::Connection {
        reason: "memory storage lock is poisoned".to_string(),
    })
}

/// Shares one set of tables between all sessions. Transactions are not isolated
/// and writes are visible immediately.
#[derive(Clone, Default)]
pub struct MemoryRepoPool {
    pub storage: MemoryStorage,
}

impl MemoryRepoPool {
    pub fn new(tables: MemoryTables) -> Self {
        Self {
            storage: Arc::new(Mutex::new(tables)),
        }
    }

    /// Copy of the current tables
    pub fn snapshot(&self) -> RepoResult<MemoryTables> {
        Ok(lock(&self.storage)?.clone())
    }
}

impl RepoPool for MemoryRepoPool {
    fn session(&self) -> RepoResult<Box<RepoSession>> {
        Ok(Box::new(MemorySession {
            storage: self.storage.clone(),
        }))
    }

    fn transaction(&self) -> RepoResult<Box<RepoSession>> {
        self.session()
    }
}

pub struct MemorySession {
    storage: MemoryStorage,
}

impl MemorySession {
    fn repo(&self) -> MemoryRepoImpl {
        MemoryRepoImpl {
            storage: self.storage.clone(),
        }
    }
}

impl RepoSession for MemorySession {
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

    fn commit(self: Box<Self>) -> RepoResult<()> {
        Ok(())
    }
}

pub struct MemoryRepoImpl {
    storage: MemoryStorage,
}

impl<T, I, F, U> DbRepo<T, I, F, U> for MemoryRepoImpl
where
    T: DbEntity,
    I: Inserter<T>,
    F: Filter<T>,
    U: Updater<T>,
{
    fn insert(&mut self, inserter: I) -> RepoResult<T> {
        let mut tables = lock(&self.storage)?;
        let table = T::memory_table(&mut tables);
        for existing in table.iter_mut() {
            if inserter.merge_into(existing) {
                return Ok(existing.clone());
            }
        }

        let entity = inserter.into_entity();
        table.push(entity.clone());
        Ok(entity)
    }

    fn select(&mut self, filter: F) -> RepoResult<Vec<T>> {
        let mut tables = lock(&self.storage)?;
        Ok(T::memory_table(&mut tables)
            .iter()
            .rev()
            .filter(|entity| filter.matches(entity))
            .cloned()
            .collect())
    }

    fn update(&mut self, updater: U) -> RepoResult<Vec<T>> {
        let mut tables = lock(&self.storage)?;
        let mut out = vec![];
        for entity in T::memory_table(&mut tables).iter_mut().rev() {
            if updater.filter().matches(entity) {
                updater.apply(entity);
                out.push(entity.clone());
            }
        }
        Ok(out)
    }

    fn delete(&mut self, filter: F) -> RepoResult<Vec<T>> {
        let mut tables = lock(&self.storage)?;
        let table = T::memory_table(&mut tables);
        let (removed, kept): (Vec<T>, Vec<T>) = table.drain(..).partition(|entity| filter.matches(entity));
        *table = kept;
        Ok(removed.into_iter().rev().collect())
    }
}
