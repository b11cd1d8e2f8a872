use super::types::{ServiceContext, ServiceFuture};
use acl;
use errors::Error;
use models::*;

/// Catalog management for the back-office
pub trait AdminJerseyService {
    /// Every jersey, available or not, newest first
    fn list_all(&self) -> ServiceFuture<Vec<Jersey>>;
    fn create(&self, payload: JerseyPayload) -> ServiceFuture<Jersey>;
    fn update(&self, jersey_id: JerseyId, payload: JerseyUpdatePayload) -> ServiceFuture<Jersey>;
    /// Deletes the jersey along with the cart and wishlist entries pointing to it
    fn delete(&self, jersey_id: JerseyId) -> ServiceFuture<Jersey>;
}

pub struct AdminJerseyServiceImpl {
    pub ctx: ServiceContext,
}

impl AdminJerseyService for AdminJerseyServiceImpl {
    fn list_all(&self) -> ServiceFuture<Vec<Jersey>> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            acl::ensure_admin(&login)?;
            Ok(session.jerseys().select(JerseyFilter::default())?)
        })
    }

    fn create(&self, payload: JerseyPayload) -> ServiceFuture<Jersey> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            acl::ensure_admin(&login)?;
            let new_jersey = payload.into_new_jersey()?;
            let jersey = session.jerseys().insert(new_jersey)?;
            info!("Created jersey {} ({} {})", jersey.id, jersey.team, jersey.name);
            Ok(jersey)
        })
    }

    fn update(&self, jersey_id: JerseyId, payload: JerseyUpdatePayload) -> ServiceFuture<Jersey> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            acl::ensure_admin(&login)?;
            let data = payload.into_update_data()?;

            let updated = session.jerseys().update(JerseyUpdater {
                filter: jersey_id.into(),
                data,
            })?;
            Ok(updated.into_iter().next().ok_or(Error::NotFound)?)
        })
    }

    fn delete(&self, jersey_id: JerseyId) -> ServiceFuture<Jersey> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_transaction(move |session| {
            acl::ensure_admin(&login)?;
            session.jerseys().select_one(jersey_id.into())?.ok_or(Error::NotFound)?;

            let cart_items = session.cart_items().delete(CartItemFilter {
                jersey_id: Some(jersey_id),
                ..Default::default()
            })?;
            let wishlists = session.wishlists().delete(WishlistFilter {
                jersey_id: Some(jersey_id),
                ..Default::default()
            })?;
            let removed = session.jerseys().delete(jersey_id.into())?;
            info!(
                "Deleted jersey {} with {} cart items and {} wishlist entries",
                jersey_id,
                cart_items.len(),
                wishlists.len()
            );

            Ok(removed.into_iter().next().ok_or(Error::NotFound)?)
        })
    }
}
