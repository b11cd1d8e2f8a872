//! Access rules over the caller resolved for a request

use errors::Error;
use models::*;

/// Caller id, `Forbidden` for anonymous callers
pub fn caller_id(login: &UserLogin) -> Result<UserId, Error> {
    login.user_id().ok_or(Error::Forbidden)
}

pub fn ensure_admin(login: &UserLogin) -> Result<UserId, Error> {
    match login {
        UserLogin::User { caller_id, .. } if login.is_admin() => Ok(*caller_id),
        _ => Err(Error::Forbidden),
    }
}

/// Owners see their own orders, admins see everything
pub fn can_read_order(login: &UserLogin, order: &Order) -> bool {
    login.is_admin() || (login.user_id().is_some() && login.user_id() == order.user_id)
}

/// Roles stored for the user plus the profile admin flag. Every signed-in user has `User`.
pub fn collect_roles(entries: &[UserRoleEntry], profile_is_admin: bool) -> Vec<AppRole> {
    let mut roles = vec![AppRole::User];
    for entry in entries {
        if !roles.contains(&entry.role) {
            roles.push(entry.role);
        }
    }
    if profile_is_admin && !roles.contains(&AppRole::Admin) {
        roles.push(AppRole::Admin);
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(roles: Vec<AppRole>) -> UserLogin {
        UserLogin::User {
            caller_id: UserId::new(),
            caller_roles: roles,
        }
    }

    fn order_of(user_id: Option<UserId>) -> Order {
        let mut order: Order = NewOrder::checkout(
            UserId::new(),
            CustomerContact::default(),
            vec![],
            None,
            "ORD-20240101-0001".to_string(),
            Utc::now(),
        ).into();
        order.user_id = user_id;
        order
    }

    #[test]
    fn anonymous_is_forbidden() {
        assert!(caller_id(&UserLogin::Anonymous).is_err());
        assert!(ensure_admin(&UserLogin::Anonymous).is_err());
        assert!(ensure_admin(&user(vec![AppRole::User])).is_err());
        assert!(ensure_admin(&user(vec![AppRole::User, AppRole::Admin])).is_ok());
    }

    #[test]
    fn orders_are_visible_to_owner_and_admin() {
        let owner = user(vec![AppRole::User]);
        let order = order_of(owner.user_id());

        assert!(can_read_order(&owner, &order));
        assert!(!can_read_order(&user(vec![AppRole::User]), &order));
        assert!(can_read_order(&user(vec![AppRole::Admin]), &order));
        assert!(!can_read_order(&UserLogin::Anonymous, &order_of(None)));
    }

    #[test]
    fn profile_flag_grants_admin() {
        assert_eq!(collect_roles(&[], false), vec![AppRole::User]);
        assert_eq!(collect_roles(&[], true), vec![AppRole::User, AppRole::Admin]);
    }
}
