use std::collections::HashMap;

use super::types::{ServiceContext, ServiceFuture};
use acl;
use errors::Error;
use models::*;

pub trait WishlistService {
    /// Saved jerseys, newest first
    fn list(&self) -> ServiceFuture<Vec<WishlistLine>>;
    /// Saves a jersey. Saving it twice keeps one entry.
    fn add(&self, jersey_id: JerseyId) -> ServiceFuture<WishlistEntry>;
    fn remove(&self, jersey_id: JerseyId) -> ServiceFuture<Vec<WishlistEntry>>;
}

pub struct WishlistServiceImpl {
    pub ctx: ServiceContext,
}

impl WishlistService for WishlistServiceImpl {
    fn list(&self) -> ServiceFuture<Vec<WishlistLine>> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            let user_id = acl::caller_id(&login)?;
            let entries = session.wishlists().select(WishlistFilter {
                user_id: Some(user_id),
                ..Default::default()
            })?;
            if entries.is_empty() {
                return Ok(vec![]);
            }

            let jerseys = session
                .jerseys()
                .select(JerseyFilter {
                    ids: Some(entries.iter().map(|entry| entry.jersey_id).collect()),
                    ..Default::default()
                })?
                .into_iter()
                .map(|jersey| (jersey.id, jersey))
                .collect::<HashMap<_, _>>();

            Ok(entries
                .into_iter()
                .filter_map(|entry| {
                    jerseys.get(&entry.jersey_id).map(|jersey| WishlistLine {
                        id: entry.id,
                        created_at: entry.created_at,
                        jersey: JerseySummary::from(jersey),
                    })
                })
                .collect())
        })
    }

    fn add(&self, jersey_id: JerseyId) -> ServiceFuture<WishlistEntry> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_transaction(move |session| {
            let user_id = acl::caller_id(&login)?;
            session.jerseys().select_one(jersey_id.into())?.ok_or(Error::NotFound)?;

            let filter = WishlistFilter {
                user_id: Some(user_id),
                jersey_id: Some(jersey_id),
            };
            if let Some(entry) = session.wishlists().select_one(filter)? {
                return Ok(entry);
            }
            Ok(session.wishlists().insert(NewWishlistEntry::new(user_id, jersey_id))?)
        })
    }

    fn remove(&self, jersey_id: JerseyId) -> ServiceFuture<Vec<WishlistEntry>> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            let user_id = acl::caller_id(&login)?;
            Ok(session.wishlists().delete(WishlistFilter {
                user_id: Some(user_id),
                jersey_id: Some(jersey_id),
            })?)
        })
    }
}
