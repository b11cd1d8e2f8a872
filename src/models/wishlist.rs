use chrono::prelude::*;

use super::common::*;
use super::jersey::JerseySummary;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: WishlistEntryId,
    pub user_id: UserId,
    pub jersey_id: JerseyId,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewWishlistEntry {
    pub id: WishlistEntryId,
    pub user_id: UserId,
    pub jersey_id: JerseyId,
    pub created_at: DateTime<Utc>,
}

impl NewWishlistEntry {
    pub fn new(user_id: UserId, jersey_id: JerseyId) -> Self {
        Self {
            id: WishlistEntryId::new(),
            user_id,
            jersey_id,
            created_at: Utc::now(),
        }
    }
}

impl From<NewWishlistEntry> for WishlistEntry {
    fn from(v: NewWishlistEntry) -> Self {
        Self {
            id: v.id,
            user_id: v.user_id,
            jersey_id: v.jersey_id,
            created_at: v.created_at,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WishlistFilter {
    pub user_id: Option<UserId>,
    pub jersey_id: Option<JerseyId>,
}

/// Wishlist rows are only inserted and deleted
#[derive(Clone, Debug, PartialEq)]
pub struct WishlistUpdater {
    pub filter: WishlistFilter,
}

/// A wishlist entry joined with its jersey
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WishlistLine {
    pub id: WishlistEntryId,
    pub created_at: DateTime<Utc>,
    pub jersey: JerseySummary,
}
