use super::types::{ServiceContext, ServiceFuture};
use acl;
use errors::Error;
use models::*;

pub trait ProfileService {
    /// Caller's profile, if one was ever saved
    fn get(&self) -> ServiceFuture<Option<Profile>>;
    /// Creates or updates the caller's profile
    fn update(&self, payload: ProfileUpdatePayload) -> ServiceFuture<Profile>;
}

pub struct ProfileServiceImpl {
    pub ctx: ServiceContext,
}

impl ProfileService for ProfileServiceImpl {
    fn get(&self) -> ServiceFuture<Option<Profile>> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            let user_id = acl::caller_id(&login)?;
            Ok(session.profiles().select_one(ProfileFilter { user_id: Some(user_id) })?)
        })
    }

    fn update(&self, payload: ProfileUpdatePayload) -> ServiceFuture<Profile> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_transaction(move |session| {
            let user_id = acl::caller_id(&login)?;
            let data = payload.into_update_data()?;
            let filter = ProfileFilter { user_id: Some(user_id) };

            if session.profiles().select_one(filter.clone())?.is_none() {
                debug!("Creating profile for user {}", user_id);
                return Ok(session.profiles().insert(NewProfile::new(user_id, data))?);
            }

            let updated = session.profiles().update(ProfileUpdater { filter, data })?;
            Ok(updated.into_iter().next().ok_or(Error::NotFound)?)
        })
    }
}
