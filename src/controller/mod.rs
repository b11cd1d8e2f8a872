use std::collections::HashMap;
use std::sync::Arc;

use failure::Error as FailureError;
use futures::future;
use futures::prelude::*;
use futures_cpupool::CpuPool;
use hyper;
use hyper::{Delete, Get, Method, Post, Put, Request};

use config;
use errors::*;
use http::controller::Controller;
use http::errors::ControllerError;
use http::request_util::{extract_user_agent, extract_user_id, parse_body, parse_query, serialize_future, ControllerFuture};
use http::router::RouteParser;
use models::*;
use repos::RepoPool;
use services::*;

pub mod routing;
use self::routing::*;

/// Builds services bound to the caller of one request
#[derive(Clone)]
pub struct ServiceFactory {
    pub cpu_pool: CpuPool,
    pub repo_pool: Arc<RepoPool>,
    pub whatsapp: Arc<config::WhatsApp>,
}

impl ServiceFactory {
    fn context(&self, login: UserLogin) -> ServiceContext {
        ServiceContext {
            cpu_pool: self.cpu_pool.clone(),
            repo_pool: self.repo_pool.clone(),
            login,
            whatsapp: self.whatsapp.clone(),
        }
    }

    pub fn resolve_login(&self, user_id: Option<UserId>) -> ServiceFuture<UserLogin> {
        self.context(UserLogin::Anonymous)
            .spawn_on_pool(move |session| Ok(resolve_login(session, user_id)?))
    }

    pub fn create_system_service(&self) -> Box<SystemService> {
        Box::new(SystemServiceImpl::default())
    }

    pub fn create_catalog_service(&self, login: UserLogin) -> Box<CatalogService> {
        Box::new(CatalogServiceImpl { ctx: self.context(login) })
    }

    pub fn create_cart_service(&self, login: UserLogin) -> Box<CartService> {
        Box::new(CartServiceImpl { ctx: self.context(login) })
    }

    pub fn create_jersey_request_service(&self, login: UserLogin) -> Box<JerseyRequestService> {
        Box::new(JerseyRequestServiceImpl { ctx: self.context(login) })
    }

    pub fn create_order_service(&self, login: UserLogin) -> Box<OrderService> {
        Box::new(OrderServiceImpl { ctx: self.context(login) })
    }

    pub fn create_profile_service(&self, login: UserLogin) -> Box<ProfileService> {
        Box::new(ProfileServiceImpl { ctx: self.context(login) })
    }

    pub fn create_wishlist_service(&self, login: UserLogin) -> Box<WishlistService> {
        Box::new(WishlistServiceImpl { ctx: self.context(login) })
    }

    pub fn create_contact_service(&self, login: UserLogin) -> Box<ContactService> {
        Box::new(ContactServiceImpl { ctx: self.context(login) })
    }

    pub fn create_admin_jersey_service(&self, login: UserLogin) -> Box<AdminJerseyService> {
        Box::new(AdminJerseyServiceImpl { ctx: self.context(login) })
    }

    pub fn create_role_service(&self, login: UserLogin) -> Box<RoleService> {
        Box::new(RoleServiceImpl { ctx: self.context(login) })
    }
}

pub struct ControllerImpl {
    route_parser: Arc<RouteParser<Route>>,
    service_factory: Arc<ServiceFactory>,
}

impl ControllerImpl {
    pub fn new(service_factory: ServiceFactory) -> Self {
        ControllerImpl {
            route_parser: Arc::new(routing::make_router()),
            service_factory: Arc::new(service_factory),
        }
    }
}

/// Everything the dispatcher needs besides the route
struct Call {
    login: UserLogin,
    query: HashMap<String, String>,
    user_agent: Option<String>,
    payload: hyper::Body,
}

fn invalid_param<T: 'static>(field: &str, reason: &str) -> ServiceFuture<T> {
    Box::new(future::err(FailureError::from(Error::invalid_input(field, reason))))
}

fn dispatch(service_factory: Arc<ServiceFactory>, method: Method, route: Route, call: Call) -> ControllerFuture {
    let Call {
        login,
        query,
        user_agent,
        payload,
    } = call;

    match (method, route) {
        // GET /jerseys
        (Get, Route::Jerseys) => {
            let jerseys: ServiceFuture<Vec<Jersey>> = match CatalogQuery::from_params(&query) {
                Ok(catalog_query) => service_factory.create_catalog_service(login).list(catalog_query),
                Err(e) => Box::new(future::err(e.into())),
            };
            serialize_future(jerseys)
        }
        // GET /jerseys/facets
        (Get, Route::JerseyFacets) => serialize_future(service_factory.create_catalog_service(login).facets()),
        // GET /jerseys/featured
        (Get, Route::FeaturedJerseys) => serialize_future(match query.get("limit").map(|v| v.parse::<usize>()) {
            Some(Err(_)) => invalid_param("limit", "expected a positive number"),
            limit => service_factory
                .create_catalog_service(login)
                .featured(limit.and_then(Result::ok)),
        }),
        // GET /jerseys/<jersey_id>
        (Get, Route::Jersey { jersey_id }) => serialize_future(service_factory.create_catalog_service(login).get(jersey_id)),
        // POST /jerseys/<jersey_id>/inquiry
        (Post, Route::JerseyInquiry { jersey_id }) => serialize_future(parse_body::<InquiryPayload>(payload).and_then(move |data| {
            debug!("Received inquiry for jersey {}: {:?}", jersey_id, data);
            service_factory
                .create_order_service(login)
                .inquire(jersey_id, data, user_agent)
                .map_err(ControllerError::from)
        })),

        // GET /cart
        (Get, Route::Cart) => serialize_future(service_factory.create_cart_service(login).get_cart()),
        // POST /cart/items
        (Post, Route::CartItems) => serialize_future(parse_body::<AddToCartPayload>(payload).and_then(move |data| {
            service_factory
                .create_cart_service(login)
                .add_item(data)
                .map_err(ControllerError::from)
        })),
        // GET /cart/count
        (Get, Route::CartCount) => serialize_future(service_factory.create_cart_service(login).count()),
        // PUT /cart/items/<item_id>
        (Put, Route::CartItem { item_id }) => serialize_future(parse_body::<SetQuantityPayload>(payload).and_then(move |data| {
            service_factory
                .create_cart_service(login)
                .set_quantity(item_id, data.quantity)
                .map_err(ControllerError::from)
        })),
        // DELETE /cart/items/<item_id>
        (Delete, Route::CartItem { item_id }) => serialize_future(service_factory.create_cart_service(login).remove_item(item_id)),
        // POST /cart/clear
        (Post, Route::CartClear) => serialize_future(service_factory.create_cart_service(login).clear()),
        // POST /cart/checkout
        (Post, Route::CartCheckout) => serialize_future(parse_body::<CheckoutPayload>(payload).and_then(move |data| {
            service_factory
                .create_cart_service(login)
                .checkout(data, user_agent)
                .map_err(ControllerError::from)
        })),

        // GET /jersey_requests
        (Get, Route::JerseyRequests) => serialize_future(service_factory.create_jersey_request_service(login).list_mine()),
        // POST /jersey_requests
        (Post, Route::JerseyRequests) => serialize_future(parse_body::<JerseyRequestPayload>(payload).and_then(move |data| {
            service_factory
                .create_jersey_request_service(login)
                .submit(data, user_agent)
                .map_err(ControllerError::from)
        })),
        // GET /orders
        (Get, Route::Orders) => serialize_future(service_factory.create_order_service(login).list_mine()),
        // GET /orders/<order_id>
        (Get, Route::Order { order_id }) => serialize_future(service_factory.create_order_service(login).get(order_id)),
        // GET /profile
        (Get, Route::Profile) => serialize_future(service_factory.create_profile_service(login).get()),
        // PUT /profile
        (Put, Route::Profile) => serialize_future(parse_body::<ProfileUpdatePayload>(payload).and_then(move |data| {
            service_factory
                .create_profile_service(login)
                .update(data)
                .map_err(ControllerError::from)
        })),
        // GET /wishlist
        (Get, Route::Wishlist) => serialize_future(service_factory.create_wishlist_service(login).list()),
        // PUT /wishlist/<jersey_id>
        (Put, Route::WishlistEntry { jersey_id }) => serialize_future(service_factory.create_wishlist_service(login).add(jersey_id)),
        // DELETE /wishlist/<jersey_id>
        (Delete, Route::WishlistEntry { jersey_id }) => serialize_future(service_factory.create_wishlist_service(login).remove(jersey_id)),
        // GET /contact
        (Get, Route::Contact) => serialize_future(service_factory.create_contact_service(login).contact_info(user_agent)),
        // POST /contact/link
        (Post, Route::ContactLink) => serialize_future(parse_body::<ContactLinkPayload>(payload).and_then(move |data| {
            service_factory
                .create_contact_service(login)
                .link(data, user_agent)
                .map_err(ControllerError::from)
        })),

        // GET /admin/jerseys
        (Get, Route::AdminJerseys) => serialize_future(service_factory.create_admin_jersey_service(login).list_all()),
        // POST /admin/jerseys
        (Post, Route::AdminJerseys) => serialize_future(parse_body::<JerseyPayload>(payload).and_then(move |data| {
            service_factory
                .create_admin_jersey_service(login)
                .create(data)
                .map_err(ControllerError::from)
        })),
        // PUT /admin/jerseys/<jersey_id>
        (Put, Route::AdminJersey { jersey_id }) => serialize_future(parse_body::<JerseyUpdatePayload>(payload).and_then(move |data| {
            service_factory
                .create_admin_jersey_service(login)
                .update(jersey_id, data)
                .map_err(ControllerError::from)
        })),
        // DELETE /admin/jerseys/<jersey_id>
        (Delete, Route::AdminJersey { jersey_id }) => {
            serialize_future(service_factory.create_admin_jersey_service(login).delete(jersey_id))
        }
        // GET /admin/jersey_requests
        (Get, Route::AdminJerseyRequests) => serialize_future(service_factory.create_jersey_request_service(login).list_all()),
        // PUT /admin/jersey_requests/<request_id>/status
        (Put, Route::AdminJerseyRequestStatus { request_id }) => serialize_future(
            parse_body::<RequestStatusPayload>(payload).and_then(move |data| {
                service_factory
                    .create_jersey_request_service(login)
                    .set_status(request_id, data.status)
                    .map_err(ControllerError::from)
            }),
        ),
        // PUT /admin/jersey_requests/<request_id>/response
        (Put, Route::AdminJerseyRequestResponse { request_id }) => serialize_future(
            parse_body::<RequestResponsePayload>(payload).and_then(move |data| {
                service_factory
                    .create_jersey_request_service(login)
                    .respond(request_id, data)
                    .map_err(ControllerError::from)
            }),
        ),
        // GET /admin/orders
        (Get, Route::AdminOrders) => serialize_future(service_factory.create_order_service(login).list_all()),
        // PUT /admin/orders/<order_id>/status
        (Put, Route::AdminOrderStatus { order_id }) => serialize_future(parse_body::<OrderStatusPayload>(payload).and_then(move |data| {
            service_factory
                .create_order_service(login)
                .set_status(order_id, data.status)
                .map_err(ControllerError::from)
        })),
        // PUT /admin/orders/<order_id>/notes
        (Put, Route::AdminOrderNotes { order_id }) => serialize_future(parse_body::<OrderNotesPayload>(payload).and_then(move |data| {
            service_factory
                .create_order_service(login)
                .annotate(order_id, data)
                .map_err(ControllerError::from)
        })),
        // GET /admin/settings
        (Get, Route::AdminSettings) => serialize_future(service_factory.create_contact_service(login).get_settings()),
        // PUT /admin/settings
        (Put, Route::AdminSettings) => serialize_future(parse_body::<AdminSettingsPayload>(payload).and_then(move |data| {
            service_factory
                .create_contact_service(login)
                .update_settings(data)
                .map_err(ControllerError::from)
        })),
        // GET /admin/roles/<user_id>
        (Get, Route::AdminRole { id }) => serialize_future(service_factory.create_role_service(login).roles_for(UserId(id))),
        // POST /admin/roles
        (Post, Route::AdminRoles) => serialize_future(parse_body::<NewUserRole>(payload).and_then(move |data| {
            service_factory
                .create_role_service(login)
                .grant(data)
                .map_err(ControllerError::from)
        })),
        // DELETE /admin/roles/<role_id>
        (Delete, Route::AdminRole { id }) => serialize_future(service_factory.create_role_service(login).revoke(RoleId(id))),

        // Fallback
        _ => Box::new(future::err(ControllerError::NotFound)),
    }
}

impl Controller for ControllerImpl {
    fn call(&self, request: Request) -> ControllerFuture {
        let (method, uri, _, headers, payload) = request.deconstruct();

        let service_factory = self.service_factory.clone();
        let route = match self.route_parser.test(uri.path()) {
            Some(route) => route,
            None => return Box::new(future::err(ControllerError::NotFound)),
        };

        // GET /healthcheck
        if let (&Get, Route::Healthcheck) = (&method, route) {
            return serialize_future(service_factory.create_system_service().healthcheck());
        }

        let is_public = route.is_public(&method);
        let query = parse_query(uri.query());
        let user_agent = extract_user_agent(&headers);

        Box::new(
            extract_user_id(&headers)
                .and_then({
                    let service_factory = service_factory.clone();
                    move |user_id| -> Box<Future<Item = UserLogin, Error = ControllerError>> {
                        if user_id.is_none() && !is_public {
                            return Box::new(future::err(ControllerError::BadRequest(AuthorizationError::Missing.into())));
                        }
                        Box::new(service_factory.resolve_login(user_id).map_err(ControllerError::from))
                    }
                })
                .and_then(move |login| {
                    let call = Call {
                        login,
                        query,
                        user_agent,
                        payload,
                    };
                    dispatch(service_factory, method, route, call)
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use hyper::header::Authorization;
    use hyper::Uri;

    use super::*;
    use repos::MemoryRepoPool;

    fn make_test_controller() -> ControllerImpl {
        ControllerImpl::new(ServiceFactory {
            cpu_pool: CpuPool::new(1),
            repo_pool: Arc::new(MemoryRepoPool::default()),
            whatsapp: Arc::new(config::WhatsApp::default()),
        })
    }

    fn request(method: Method, path: &str) -> Request {
        Request::new(method, Uri::from_str(path).unwrap())
    }

    #[test]
    fn test_healthcheck() {
        let result = make_test_controller().call(request(Method::Get, "/healthcheck")).wait().unwrap();

        assert_eq!(result, "\"Ok\"");
    }

    #[test]
    fn test_missing_auth_header() {
        match make_test_controller().call(request(Method::Get, "/cart")).wait() {
            Ok(v) => panic!("Expected error, received {}", v),
            Err(ControllerError::BadRequest(e)) => match e.downcast::<AuthorizationError>() {
                Ok(AuthorizationError::Missing) => {}
                other => panic!("Invalid error: {:?}", other),
            },
            Err(e) => panic!("Invalid error: {}", e),
        }
    }

    #[test]
    fn test_invalid_auth_header() {
        let mut req = request(Method::Get, "/cart");
        req.headers_mut()
            .set::<Authorization<String>>(Authorization("12345abc".into()));

        match make_test_controller().call(req).wait() {
            Ok(v) => panic!("Expected error, received {}", v),
            Err(ControllerError::BadRequest(e)) => match e.downcast::<AuthorizationError>() {
                Ok(AuthorizationError::Parse { .. }) => {}
                other => panic!("Invalid error: {:?}", other),
            },
            Err(e) => panic!("Invalid error: {}", e),
        }
    }

    #[test]
    fn test_catalog_is_public() {
        let result = make_test_controller().call(request(Method::Get, "/jerseys?availability=all")).wait().unwrap();

        assert_eq!(result, "[]");
    }

    #[test]
    fn test_unknown_route() {
        match make_test_controller().call(request(Method::Get, "/nowhere")).wait() {
            Err(ControllerError::NotFound) => {}
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_method() {
        match make_test_controller().call(request(Method::Delete, "/jerseys")).wait() {
            Err(ControllerError::NotFound) => {}
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_set_quantity_nopayload() {
        let mut req = request(Method::Put, &format!("/cart/items/{}", CartItemId::new()));
        req.headers_mut()
            .set::<Authorization<String>>(Authorization(UserId::new().to_string()));

        match make_test_controller().call(req).wait() {
            Err(ControllerError::UnprocessableEntity(_)) => {}
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
