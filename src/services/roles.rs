use failure::Error as FailureError;

use super::types::{ServiceContext, ServiceFuture};
use acl;
use errors::Error;
use models::*;
use repos::*;

/// Resolves who is calling from the user id sent by the gateway
pub fn resolve_login(session: &mut RepoSession, user_id: Option<UserId>) -> RepoResult<UserLogin> {
    let caller_id = match user_id {
        Some(v) => v,
        None => return Ok(UserLogin::Anonymous),
    };

    let entries = session.user_roles().select(UserRoleFilter {
        user_id: Some(caller_id),
        ..Default::default()
    })?;
    let profile_is_admin = session
        .profiles()
        .select_one(ProfileFilter { user_id: Some(caller_id) })?
        .map(|profile| profile.is_admin)
        .unwrap_or(false);

    Ok(UserLogin::User {
        caller_id,
        caller_roles: acl::collect_roles(&entries, profile_is_admin),
    })
}

pub trait RoleService {
    /// Roles granted to a user
    fn roles_for(&self, user_id: UserId) -> ServiceFuture<Vec<UserRoleEntry>>;
    /// Grants a role, returning the existing grant when there is one
    fn grant(&self, payload: NewUserRole) -> ServiceFuture<UserRoleEntry>;
    /// Revokes a grant by its id
    fn revoke(&self, role_id: RoleId) -> ServiceFuture<UserRoleEntry>;
}

pub struct RoleServiceImpl {
    pub ctx: ServiceContext,
}

impl RoleService for RoleServiceImpl {
    fn roles_for(&self, user_id: UserId) -> ServiceFuture<Vec<UserRoleEntry>> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| {
            acl::ensure_admin(&login)?;
            Ok(session.user_roles().select(UserRoleFilter {
                user_id: Some(user_id),
                ..Default::default()
            })?)
        })
    }

    fn grant(&self, payload: NewUserRole) -> ServiceFuture<UserRoleEntry> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_transaction(move |session| {
            acl::ensure_admin(&login)?;
            let existing = session.user_roles().select_one(UserRoleFilter {
                user_id: Some(payload.user_id),
                role: Some(payload.role),
                ..Default::default()
            })?;
            if let Some(entry) = existing {
                return Ok(entry);
            }

            info!("Granting role {} to user {}", payload.role, payload.user_id);
            Ok(session.user_roles().insert(payload)?)
        })
    }

    fn revoke(&self, role_id: RoleId) -> ServiceFuture<UserRoleEntry> {
        let login = self.ctx.login.clone();
        self.ctx.spawn_on_pool(move |session| -> Result<UserRoleEntry, FailureError> {
            acl::ensure_admin(&login)?;
            let removed = session.user_roles().delete(UserRoleFilter {
                id: Some(role_id),
                ..Default::default()
            })?;
            removed.into_iter().next().ok_or_else(|| Error::NotFound.into())
        })
    }
}
