use super::types::{ServiceContext, ServiceFuture};
use errors::Error;
use models::*;

pub const DEFAULT_FEATURED_LIMIT: usize = 6;

/// Read side of the catalog, open to everyone
pub trait CatalogService {
    /// Jerseys matching the query, newest first
    fn list(&self, query: CatalogQuery) -> ServiceFuture<Vec<Jersey>>;
    /// Leagues and teams to filter by
    fn facets(&self) -> ServiceFuture<CatalogFacets>;
    fn get(&self, jersey_id: JerseyId) -> ServiceFuture<Jersey>;
    /// Featured jerseys that can be bought right now
    fn featured(&self, limit: Option<usize>) -> ServiceFuture<Vec<Jersey>>;
}

pub struct CatalogServiceImpl {
    pub ctx: ServiceContext,
}

impl CatalogService for CatalogServiceImpl {
    fn list(&self, query: CatalogQuery) -> ServiceFuture<Vec<Jersey>> {
        debug!("Listing catalog with {:?}", query);
        self.ctx.spawn_on_pool(move |session| {
            let jerseys = session.jerseys().select(JerseyFilter::default())?;
            Ok(query.apply(jerseys))
        })
    }

    fn facets(&self) -> ServiceFuture<CatalogFacets> {
        self.ctx.spawn_on_pool(move |session| {
            let jerseys = session.jerseys().select(JerseyFilter::default())?;
            Ok(CatalogFacets::collect(&jerseys))
        })
    }

    fn get(&self, jersey_id: JerseyId) -> ServiceFuture<Jersey> {
        self.ctx.spawn_on_pool(move |session| {
            let jersey = session.jerseys().select_one(jersey_id.into())?;
            Ok(jersey.ok_or(Error::NotFound)?)
        })
    }

    fn featured(&self, limit: Option<usize>) -> ServiceFuture<Vec<Jersey>> {
        let limit = limit.unwrap_or(DEFAULT_FEATURED_LIMIT);
        self.ctx.spawn_on_pool(move |session| {
            let jerseys = session.jerseys().select(JerseyFilter {
                is_available: Some(true),
                is_featured: Some(true),
                ..Default::default()
            })?;
            Ok(jerseys.into_iter().take(limit).collect())
        })
    }
}
