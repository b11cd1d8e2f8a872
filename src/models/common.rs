use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use errors::Error;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, Display, FromStr, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                $name(Uuid::new_v4())
            }
        }
    };
}

uuid_id!(UserId);
uuid_id!(JerseyId);
uuid_id!(CartItemId);
uuid_id!(JerseyRequestId);
uuid_id!(OrderId);
uuid_id!(OrderItemId);
uuid_id!(ProfileId);
uuid_id!(AdminSettingsId);
uuid_id!(WishlistEntryId);
uuid_id!(RoleId);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    Admin,
    User,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppRole::Admin => "admin",
            AppRole::User => "user",
        }
    }
}

impl fmt::Display for AppRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(AppRole::Admin),
            "user" => Ok(AppRole::User),
            other => Err(Error::invalid_input("role", format!("unknown role '{}'", other))),
        }
    }
}

/// Who is calling, resolved once per request
#[derive(Clone, Debug, PartialEq)]
pub enum UserLogin {
    Anonymous,
    User { caller_id: UserId, caller_roles: Vec<AppRole> },
}

impl UserLogin {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            UserLogin::Anonymous => None,
            UserLogin::User { caller_id, .. } => Some(*caller_id),
        }
    }

    pub fn is_admin(&self) -> bool {
        match self {
            UserLogin::Anonymous => false,
            UserLogin::User { caller_roles, .. } => caller_roles.contains(&AppRole::Admin),
        }
    }
}

/// Trims the value, mapping blank strings to `None`
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_strings() {
        let id = JerseyId::new();
        assert_eq!(id.to_string().parse::<JerseyId>().unwrap(), id);
        assert!("nope".parse::<UserId>().is_err());
    }

    #[test]
    fn admin_comes_from_roles() {
        let caller_id = UserId::new();
        let user = UserLogin::User {
            caller_id,
            caller_roles: vec![AppRole::User],
        };
        let admin = UserLogin::User {
            caller_id,
            caller_roles: vec![AppRole::User, AppRole::Admin],
        };

        assert!(!user.is_admin());
        assert!(admin.is_admin());
        assert!(!UserLogin::Anonymous.is_admin());
        assert_eq!(UserLogin::Anonymous.user_id(), None);
    }

    #[test]
    fn blank_strings_are_dropped() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(" Lagos ".to_string())), Some("Lagos".to_string()));
    }
}
