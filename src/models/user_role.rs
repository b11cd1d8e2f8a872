use chrono::prelude::*;

use super::common::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRoleEntry {
    pub id: RoleId,
    pub user_id: UserId,
    pub role: AppRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewUserRole {
    pub user_id: UserId,
    pub role: AppRole,
}

impl From<NewUserRole> for UserRoleEntry {
    fn from(v: NewUserRole) -> Self {
        Self {
            id: RoleId::new(),
            user_id: v.user_id,
            role: v.role,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserRoleFilter {
    pub id: Option<RoleId>,
    pub user_id: Option<UserId>,
    pub role: Option<AppRole>,
}

/// Roles are granted and revoked, never edited
#[derive(Clone, Debug, PartialEq)]
pub struct UserRoleUpdater {
    pub filter: UserRoleFilter,
}
