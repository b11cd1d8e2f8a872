extern crate chrono;
extern crate futures;
extern crate futures_cpupool;
extern crate hyper;
extern crate jerseys_lib as lib;
#[macro_use]
extern crate serde_json;

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use futures::prelude::*;
use futures_cpupool::CpuPool;
use hyper::header::{Authorization, UserAgent};
use hyper::{Method, Request, Uri};
use serde_json::Value;

use lib::config;
use lib::controller::*;
use lib::http::controller::Controller;
use lib::http::errors::ControllerError;
use lib::models::*;
use lib::repos::*;

struct Context {
    controller: ControllerImpl,
    pool: MemoryRepoPool,
}

fn setup(jerseys: Vec<Jersey>) -> Context {
    let pool = MemoryRepoPool::new(MemoryTables {
        jerseys,
        ..Default::default()
    });
    let controller = ControllerImpl::new(ServiceFactory {
        cpu_pool: CpuPool::new(2),
        repo_pool: Arc::new(pool.clone()),
        whatsapp: Arc::new(config::WhatsApp::default()),
    });

    Context { controller, pool }
}

fn jersey(team: &str, league: &str, is_available: bool, is_featured: bool) -> Jersey {
    let now = Utc::now();
    Jersey {
        id: JerseyId::new(),
        name: format!("{} Home", team),
        team: team.to_string(),
        league: league.to_string(),
        season: "2024/25".to_string(),
        price_naira: 20000.0,
        description: None,
        image_url: None,
        sizes: vec!["M".to_string(), "L".to_string()],
        available_sizes: vec!["M".to_string(), "L".to_string()],
        stock_quantity: 5,
        is_available,
        is_featured,
        created_at: now,
        updated_at: now,
    }
}

fn request(method: Method, path: &str, user_id: Option<UserId>, body: Option<Value>) -> Request {
    let mut req = Request::new(method, Uri::from_str(path).unwrap());
    if let Some(user_id) = user_id {
        req.headers_mut()
            .set::<Authorization<String>>(Authorization(user_id.to_string()));
    }
    if let Some(body) = body {
        req.set_body(body.to_string());
    }
    req
}

fn call(ctx: &Context, req: Request) -> Result<Value, ControllerError> {
    ctx.controller
        .call(req)
        .wait()
        .map(|body| serde_json::from_str(&body).unwrap())
}

fn grant_admin(ctx: &Context, user_id: UserId) {
    ctx.pool.storage.lock().unwrap().user_roles.push(
        NewUserRole {
            user_id,
            role: AppRole::Admin,
        }.into(),
    );
}

#[test]
fn catalog_filters_and_facets() {
    let ctx = setup(vec![
        jersey("Arsenal", "Premier League", true, true),
        jersey("Real Madrid", "La Liga", true, false),
        jersey("Chelsea", "Premier League", false, false),
    ]);

    let all = call(&ctx, request(Method::Get, "/jerseys", None, None)).unwrap();
    assert_eq!(all.as_array().unwrap().len(), 3);

    let premier = call(&ctx, request(Method::Get, "/jerseys?league=Premier%20League&availability=available", None, None)).unwrap();
    assert_eq!(premier.as_array().unwrap().len(), 1);
    assert_eq!(premier[0]["team"], "Arsenal");

    let search = call(&ctx, request(Method::Get, "/jerseys?search=MADRID", None, None)).unwrap();
    assert_eq!(search[0]["team"], "Real Madrid");

    let facets = call(&ctx, request(Method::Get, "/jerseys/facets", None, None)).unwrap();
    assert_eq!(facets["leagues"].as_array().unwrap().len(), 2);
    assert_eq!(facets["teams"].as_array().unwrap().len(), 3);

    let featured = call(&ctx, request(Method::Get, "/jerseys/featured?limit=4", None, None)).unwrap();
    assert_eq!(featured.as_array().unwrap().len(), 1);

    match call(&ctx, request(Method::Get, "/jerseys?availability=sometimes", None, None)) {
        Err(ControllerError::UnprocessableEntity(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn missing_jersey_is_not_found() {
    let ctx = setup(vec![]);

    match call(&ctx, request(Method::Get, &format!("/jerseys/{}", JerseyId::new()), None, None)) {
        Err(ControllerError::NotFound) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn cart_flow_ends_in_checkout() {
    let shirt = jersey("Arsenal", "Premier League", true, false);
    let ctx = setup(vec![shirt.clone()]);
    let user_id = UserId::new();

    let body = json!({ "jersey_id": shirt.id, "size": "M", "quantity": 1 });
    call(&ctx, request(Method::Post, "/cart/items", Some(user_id), Some(body.clone()))).unwrap();
    let cart = call(&ctx, request(Method::Post, "/cart/items", Some(user_id), Some(body))).unwrap();

    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);
    assert_eq!(cart["lines"][0]["quantity"], 2);
    assert_eq!(cart["subtotal"], 40000.0);

    let count = call(&ctx, request(Method::Get, "/cart/count", Some(user_id), None)).unwrap();
    assert_eq!(count["count"], 2);

    let mut req = request(
        Method::Post,
        "/cart/checkout",
        Some(user_id),
        Some(json!({ "customer_name": "Ada Obi", "customer_phone": "08012345678", "notes": "Deliver after 5pm" })),
    );
    req.headers_mut().set(UserAgent::new("Mozilla/5.0 (Linux; Android 14)"));
    let result = call(&ctx, req).unwrap();

    assert_eq!(result["order"]["status"], "pending");
    assert_eq!(result["order"]["inquiry_type"], "cart");
    assert_eq!(result["order"]["notes"], "Deliver after 5pm");
    assert!(result["whatsapp_link"].as_str().unwrap().starts_with("whatsapp://send?phone="));

    let cart = call(&ctx, request(Method::Get, "/cart", Some(user_id), None)).unwrap();
    assert_eq!(cart["lines"].as_array().unwrap().len(), 0);

    let orders = call(&ctx, request(Method::Get, "/orders", Some(user_id), None)).unwrap();
    assert_eq!(orders.as_array().unwrap().len(), 1);

    let order_id = orders[0]["id"].as_str().unwrap().to_string();
    let details = call(&ctx, request(Method::Get, &format!("/orders/{}", order_id), Some(user_id), None)).unwrap();
    assert_eq!(details["items"].as_array().unwrap().len(), 1);
}

#[test]
fn checkout_without_contact_is_rejected() {
    let shirt = jersey("Arsenal", "Premier League", true, false);
    let ctx = setup(vec![shirt.clone()]);
    let user_id = UserId::new();

    call(
        &ctx,
        request(
            Method::Post,
            "/cart/items",
            Some(user_id),
            Some(json!({ "jersey_id": shirt.id, "size": "L" })),
        ),
    ).unwrap();

    match call(&ctx, request(Method::Post, "/cart/checkout", Some(user_id), Some(json!({})))) {
        Err(ControllerError::UnprocessableEntity(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
    assert_eq!(ctx.pool.snapshot().unwrap().cart_items.len(), 1);
}

#[test]
fn request_submission_validates_before_writing() {
    let ctx = setup(vec![]);

    let invalid = json!({
        "full_name": "Ada Obi",
        "email": "ada.example.com",
        "phone_number": "08012345678",
        "jersey_name": "1994 Home",
        "team": "Nigeria",
        "size": "L"
    });
    match call(&ctx, request(Method::Post, "/jersey_requests", None, Some(invalid))) {
        Err(ControllerError::Validate(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
    assert!(ctx.pool.snapshot().unwrap().jersey_requests.is_empty());

    let valid = json!({
        "full_name": "Ada Obi",
        "email": "ada@example.com",
        "phone_number": "08012345678",
        "jersey_name": "1994 Home",
        "team": "Nigeria",
        "size": "L",
        "contact_via_whatsapp": true
    });
    let submitted = call(&ctx, request(Method::Post, "/jersey_requests", None, Some(valid))).unwrap();
    assert_eq!(submitted["request"]["status"], "pending");
    assert!(submitted["whatsapp_link"].as_str().unwrap().starts_with("https://wa.me?phone=2348012345678"));
}

#[test]
fn admin_routes_need_admin_role() {
    let ctx = setup(vec![]);
    let user_id = UserId::new();

    match call(&ctx, request(Method::Get, "/admin/orders", Some(user_id), None)) {
        Err(ControllerError::Forbidden(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }

    grant_admin(&ctx, user_id);
    let orders = call(&ctx, request(Method::Get, "/admin/orders", Some(user_id), None)).unwrap();
    assert_eq!(orders, json!([]));
}

#[test]
fn admin_manages_catalog_and_requests() {
    let ctx = setup(vec![]);
    let admin_id = UserId::new();
    grant_admin(&ctx, admin_id);

    let created = call(
        &ctx,
        request(
            Method::Post,
            "/admin/jerseys",
            Some(admin_id),
            Some(json!({
                "name": "Away Kit",
                "team": "Super Eagles",
                "league": "International",
                "season": "2024",
                "price_naira": 18000.0,
                "sizes": ["M", "L"],
                "is_featured": true
            })),
        ),
    ).unwrap();
    assert_eq!(created["available_sizes"], json!(["M", "L"]));
    let jersey_id = created["id"].as_str().unwrap().to_string();

    let updated = call(
        &ctx,
        request(
            Method::Put,
            &format!("/admin/jerseys/{}", jersey_id),
            Some(admin_id),
            Some(json!({ "is_available": false })),
        ),
    ).unwrap();
    assert_eq!(updated["is_available"], false);

    let submitted = call(
        &ctx,
        request(
            Method::Post,
            "/jersey_requests",
            None,
            Some(json!({
                "full_name": "Ada Obi",
                "email": "ada@example.com",
                "phone_number": "08012345678",
                "jersey_name": "1998 Away",
                "team": "Nigeria",
                "size": "XL"
            })),
        ),
    ).unwrap();
    assert_eq!(submitted["whatsapp_link"], Value::Null);
    let request_id = submitted["request"]["id"].as_str().unwrap().to_string();

    let approved = call(
        &ctx,
        request(
            Method::Put,
            &format!("/admin/jersey_requests/{}/status", request_id),
            Some(admin_id),
            Some(json!({ "status": "approved" })),
        ),
    ).unwrap();
    assert_eq!(approved["status"], "approved");

    match call(
        &ctx,
        request(
            Method::Put,
            &format!("/admin/jersey_requests/{}/status", request_id),
            Some(admin_id),
            Some(json!({ "status": "pending" })),
        ),
    ) {
        Err(ControllerError::UnprocessableEntity(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }

    call(
        &ctx,
        request(Method::Delete, &format!("/admin/jerseys/{}", jersey_id), Some(admin_id), None),
    ).unwrap();
    assert!(ctx.pool.snapshot().unwrap().jerseys.is_empty());
}

#[test]
fn contact_is_public() {
    let ctx = setup(vec![]);

    let info = call(&ctx, request(Method::Get, "/contact", None, None)).unwrap();
    assert_eq!(info["whatsapp_business_number"], "2348012345678");
    assert!(info["estimated_response_time"].as_str().unwrap().starts_with("Within"));

    let link = call(
        &ctx,
        request(Method::Post, "/contact/link", None, Some(json!({ "message": "Do you ship to Abuja?" }))),
    ).unwrap();
    assert_eq!(
        link["whatsapp_link"],
        "https://wa.me?phone=2348012345678&text=Do%20you%20ship%20to%20Abuja%3F"
    );
}
