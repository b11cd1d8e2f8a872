use std::sync::Arc;

use failure::Error as FailureError;
use futures::prelude::*;
use futures_cpupool::CpuPool;

use config;
use models::UserLogin;
use repos::{RepoPool, RepoSession};

pub type ServiceFuture<T> = Box<Future<Item = T, Error = FailureError>>;

/// Everything a service needs to serve one request
#[derive(Clone)]
pub struct ServiceContext {
    pub cpu_pool: CpuPool,
    pub repo_pool: Arc<RepoPool>,
    pub login: UserLogin,
    pub whatsapp: Arc<config::WhatsApp>,
}

impl ServiceContext {
    /// Runs blocking repo work on the cpu pool in an autocommit session
    pub fn spawn_on_pool<T, F>(&self, f: F) -> ServiceFuture<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut RepoSession) -> Result<T, FailureError> + Send + 'static,
    {
        let repo_pool = self.repo_pool.clone();
        Box::new(self.cpu_pool.spawn_fn(move || {
            let mut session = repo_pool.session()?;
            f(&mut *session)
        }))
    }

    /// Same as `spawn_on_pool`, but the work is committed only when `f` succeeds
    pub fn spawn_transaction<T, F>(&self, f: F) -> ServiceFuture<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut RepoSession) -> Result<T, FailureError> + Send + 'static,
    {
        let repo_pool = self.repo_pool.clone();
        Box::new(self.cpu_pool.spawn_fn(move || {
            let mut session = repo_pool.transaction()?;
            let out = f(&mut *session)?;
            session.commit()?;
            Ok(out)
        }))
    }
}
