use std::str::FromStr;

use hyper::Method;
use uuid::Uuid;

use http::router::RouteParser;
use models::*;

/// List of all routes with params for the app
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Route {
    Healthcheck,
    Jerseys,
    JerseyFacets,
    FeaturedJerseys,
    Jersey { jersey_id: JerseyId },
    JerseyInquiry { jersey_id: JerseyId },
    Cart,
    CartItems,
    CartCount,
    CartItem { item_id: CartItemId },
    CartClear,
    CartCheckout,
    JerseyRequests,
    Orders,
    Order { order_id: OrderId },
    Profile,
    Wishlist,
    WishlistEntry { jersey_id: JerseyId },
    Contact,
    ContactLink,
    AdminJerseys,
    AdminJersey { jersey_id: JerseyId },
    AdminJerseyRequests,
    AdminJerseyRequestStatus { request_id: JerseyRequestId },
    AdminJerseyRequestResponse { request_id: JerseyRequestId },
    AdminOrders,
    AdminOrderStatus { order_id: OrderId },
    AdminOrderNotes { order_id: OrderId },
    AdminSettings,
    AdminRoles,
    /// User id on GET, role id on DELETE
    AdminRole { id: Uuid },
}

fn first_param<T: FromStr>(params: Vec<&str>) -> Option<T> {
    params.into_iter().next().and_then(|param| param.parse().ok())
}

const UUID: &str = "([0-9a-fA-F-]{36})";

pub fn make_router() -> RouteParser<Route> {
    let mut router: RouteParser<Route> = Default::default();
    let with_id = |pattern: &str| format!(r"^{}$", pattern.replace("<id>", UUID));

    router.add_route(r"^/healthcheck$", || Route::Healthcheck);

    // Catalog
    router.add_route(r"^/jerseys$", || Route::Jerseys);
    router.add_route(r"^/jerseys/facets$", || Route::JerseyFacets);
    router.add_route(r"^/jerseys/featured$", || Route::FeaturedJerseys);
    router.add_route_with_params(&with_id("/jerseys/<id>"), |params| {
        first_param(params).map(|jersey_id| Route::Jersey { jersey_id })
    });
    router.add_route_with_params(&with_id("/jerseys/<id>/inquiry"), |params| {
        first_param(params).map(|jersey_id| Route::JerseyInquiry { jersey_id })
    });

    // Cart
    router.add_route(r"^/cart$", || Route::Cart);
    router.add_route(r"^/cart/items$", || Route::CartItems);
    router.add_route(r"^/cart/count$", || Route::CartCount);
    router.add_route(r"^/cart/clear$", || Route::CartClear);
    router.add_route(r"^/cart/checkout$", || Route::CartCheckout);
    router.add_route_with_params(&with_id("/cart/items/<id>"), |params| {
        first_param(params).map(|item_id| Route::CartItem { item_id })
    });

    // Customer
    router.add_route(r"^/jersey_requests$", || Route::JerseyRequests);
    router.add_route(r"^/orders$", || Route::Orders);
    router.add_route_with_params(&with_id("/orders/<id>"), |params| {
        first_param(params).map(|order_id| Route::Order { order_id })
    });
    router.add_route(r"^/profile$", || Route::Profile);
    router.add_route(r"^/wishlist$", || Route::Wishlist);
    router.add_route_with_params(&with_id("/wishlist/<id>"), |params| {
        first_param(params).map(|jersey_id| Route::WishlistEntry { jersey_id })
    });
    router.add_route(r"^/contact$", || Route::Contact);
    router.add_route(r"^/contact/link$", || Route::ContactLink);

    // Back-office
    router.add_route(r"^/admin/jerseys$", || Route::AdminJerseys);
    router.add_route_with_params(&with_id("/admin/jerseys/<id>"), |params| {
        first_param(params).map(|jersey_id| Route::AdminJersey { jersey_id })
    });
    router.add_route(r"^/admin/jersey_requests$", || Route::AdminJerseyRequests);
    router.add_route_with_params(&with_id("/admin/jersey_requests/<id>/status"), |params| {
        first_param(params).map(|request_id| Route::AdminJerseyRequestStatus { request_id })
    });
    router.add_route_with_params(&with_id("/admin/jersey_requests/<id>/response"), |params| {
        first_param(params).map(|request_id| Route::AdminJerseyRequestResponse { request_id })
    });
    router.add_route(r"^/admin/orders$", || Route::AdminOrders);
    router.add_route_with_params(&with_id("/admin/orders/<id>/status"), |params| {
        first_param(params).map(|order_id| Route::AdminOrderStatus { order_id })
    });
    router.add_route_with_params(&with_id("/admin/orders/<id>/notes"), |params| {
        first_param(params).map(|order_id| Route::AdminOrderNotes { order_id })
    });
    router.add_route(r"^/admin/settings$", || Route::AdminSettings);
    router.add_route(r"^/admin/roles$", || Route::AdminRoles);
    router.add_route_with_params(&with_id("/admin/roles/<id>"), |params| {
        first_param(params).map(|id| Route::AdminRole { id })
    });

    router
}

impl Route {
    /// Calls that need no `Authorization` header
    pub fn is_public(&self, method: &Method) -> bool {
        match (method, self) {
            (&Method::Post, Route::JerseyRequests) => true,
            (_, Route::Healthcheck)
            | (_, Route::Jerseys)
            | (_, Route::JerseyFacets)
            | (_, Route::FeaturedJerseys)
            | (_, Route::Jersey { .. })
            | (_, Route::JerseyInquiry { .. })
            | (_, Route::Contact)
            | (_, Route::ContactLink) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids() {
        let router = make_router();
        let jersey_id = JerseyId::new();

        assert_eq!(router.test("/healthcheck"), Some(Route::Healthcheck));
        assert_eq!(router.test("/jerseys/facets"), Some(Route::JerseyFacets));
        assert_eq!(router.test(&format!("/jerseys/{}", jersey_id)), Some(Route::Jersey { jersey_id }));
        assert_eq!(
            router.test(&format!("/jerseys/{}/inquiry", jersey_id)),
            Some(Route::JerseyInquiry { jersey_id })
        );
        assert_eq!(
            router.test(&format!("/admin/orders/{}/notes", jersey_id.0)),
            Some(Route::AdminOrderNotes { order_id: OrderId(jersey_id.0) })
        );
    }

    #[test]
    fn rejects_malformed_ids() {
        let router = make_router();

        assert_eq!(router.test("/jerseys/42"), None);
        assert_eq!(router.test("/cart/items/not-an-id"), None);
        assert_eq!(router.test("/nowhere"), None);
    }

    #[test]
    fn request_list_needs_login_but_submission_does_not() {
        assert!(Route::JerseyRequests.is_public(&Method::Post));
        assert!(!Route::JerseyRequests.is_public(&Method::Get));
        assert!(Route::Contact.is_public(&Method::Get));
        assert!(!Route::Cart.is_public(&Method::Get));
    }
}
