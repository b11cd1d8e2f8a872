extern crate chrono;
extern crate futures;
extern crate futures_cpupool;
extern crate jerseys_lib as lib;

use std::sync::Arc;

use chrono::Utc;
use futures::future;
use futures::prelude::*;
use futures_cpupool::CpuPool;

use lib::config;
use lib::migrations;
use lib::models::*;
use lib::repos::pg::create_pool;
use lib::repos::*;
use lib::services::*;

fn prepare_db(pool_size: u32) -> PgRepoPool {
    let config = config::Config::new().unwrap();
    let db_pool = create_pool(&config.db.dsn, pool_size).unwrap();
    migrations::run(&db_pool).unwrap();

    PgRepoPool::new(db_pool)
}

fn new_jersey() -> NewJersey {
    JerseyPayload {
        name: "Home Kit".to_string(),
        team: "Enyimba".to_string(),
        league: "NPFL".to_string(),
        season: "2024/25".to_string(),
        price_naira: 12500.0,
        description: None,
        image_url: None,
        sizes: None,
        available_sizes: None,
        stock_quantity: None,
        is_available: None,
        is_featured: None,
    }.into_new_jersey()
        .unwrap()
}

// Needs a running Postgres at the configured dsn
#[test]
#[ignore]
fn test_cart_items_repo() {
    let pool = prepare_db(2);
    // Never committed, rolled back on drop
    let mut session = pool.transaction().unwrap();

    let jersey = session.jerseys().insert(new_jersey()).unwrap();
    assert_eq!(jersey.available_sizes, jersey.sizes);

    let user_id = UserId::new();
    let item = session
        .cart_items()
        .insert(NewCartItem::new(user_id, jersey.id, "L".to_string(), 1))
        .unwrap();
    assert_eq!(item.quantity, 1);

    // Bump the quantity
    let updated = session
        .cart_items()
        .update(CartItemUpdater {
            filter: CartItemFilter {
                id: Some(item.id),
                ..Default::default()
            },
            quantity: 3,
        })
        .unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].quantity, 3);

    // Check DB contents
    let items = session.cart_items().select(CartItemFilter::for_user(user_id)).unwrap();
    assert_eq!(items, updated);

    // Clear the cart
    let deleted = session.cart_items().delete(CartItemFilter::for_user(user_id)).unwrap();
    assert_eq!(deleted.len(), 1);
    assert!(session.cart_items().select(CartItemFilter::for_user(user_id)).unwrap().is_empty());
}

#[test]
#[ignore]
fn test_jersey_requests_repo() {
    let pool = prepare_db(2);
    let mut session = pool.transaction().unwrap();

    let new_request = JerseyRequestPayload {
        full_name: "Tunde Bakare".to_string(),
        email: "tunde@example.com".to_string(),
        phone_number: "08031234567".to_string(),
        jersey_name: "1996 Olympic Home".to_string(),
        team: "Nigeria".to_string(),
        league: None,
        size: "XL".to_string(),
        additional_notes: Some("Long sleeves if possible".to_string()),
        contact_via_whatsapp: false,
    }.into_new_request(None, Utc::now())
        .unwrap();

    let request = session.jersey_requests().insert(new_request).unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.inquiry_id, None);

    let updated = session
        .jersey_requests()
        .update(JerseyRequestUpdater {
            filter: request.id.into(),
            data: JerseyRequestUpdateData {
                status: Some(RequestStatus::Approved),
                admin_response: Some("We can source it in two weeks".to_string()),
                ..Default::default()
            },
        })
        .unwrap();
    assert_eq!(updated[0].status, RequestStatus::Approved);

    let stored = session.jersey_requests().select_one(request.id.into()).unwrap().unwrap();
    assert_eq!(stored.admin_response, Some("We can source it in two weeks".to_string()));
}

fn cart_service(pool: &Arc<PgRepoPool>, cpu_pool: &CpuPool, user_id: UserId) -> CartServiceImpl {
    CartServiceImpl {
        ctx: ServiceContext {
            cpu_pool: cpu_pool.clone(),
            repo_pool: pool.clone(),
            login: UserLogin::User {
                caller_id: user_id,
                caller_roles: vec![AppRole::User],
            },
            whatsapp: Arc::new(config::WhatsApp::default()),
        },
    }
}

fn add(jersey_id: JerseyId, size: &str) -> AddToCartPayload {
    AddToCartPayload {
        jersey_id,
        size: size.to_string(),
        quantity: Some(1),
    }
}

fn cleanup(pool: &PgRepoPool, jersey_id: JerseyId, user_ids: &[UserId]) {
    let mut session = pool.session().unwrap();
    for user_id in user_ids {
        session.cart_items().delete(CartItemFilter::for_user(*user_id)).unwrap();
        session
            .orders()
            .delete(OrderFilter {
                user_id: Some(*user_id),
                ..Default::default()
            })
            .unwrap();
    }
    session.jerseys().delete(jersey_id.into()).unwrap();
}

#[test]
#[ignore]
fn test_concurrent_adds_of_one_line_all_count() {
    let pool = Arc::new(prepare_db(16));
    let cpu_pool = CpuPool::new(16);
    let jersey = pool.session().unwrap().jerseys().insert(new_jersey()).unwrap();
    let user_id = UserId::new();
    let service = cart_service(&pool, &cpu_pool, user_id);

    let adds = (0..12).map(|_| service.add_item(add(jersey.id, "L"))).collect::<Vec<_>>();
    let results = future::join_all(adds).wait();
    let count = service.count().wait().unwrap().count;
    cleanup(&pool, jersey.id, &[user_id]);

    assert!(results.is_ok(), "{:?}", results.err());
    assert_eq!(count, 12);
}

#[test]
#[ignore]
fn test_checkout_keeps_lines_added_meanwhile() {
    let pool = Arc::new(prepare_db(16));
    let cpu_pool = CpuPool::new(4);
    let jersey = pool.session().unwrap().jerseys().insert(new_jersey()).unwrap();
    let mut user_ids = vec![];

    for _ in 0..30 {
        let user_id = UserId::new();
        user_ids.push(user_id);
        let service = cart_service(&pool, &cpu_pool, user_id);
        service.add_item(add(jersey.id, "M")).wait().unwrap();

        let checkout = service.checkout(
            CheckoutPayload {
                customer_name: Some("Chidi Okeke".to_string()),
                customer_phone: Some("08051234567".to_string()),
                ..Default::default()
            },
            None,
        );
        let late_add = service.add_item(add(jersey.id, "L"));
        let (checkout, late_add) = checkout.then(Ok::<_, ()>).join(late_add.then(Ok::<_, ()>)).wait().unwrap();

        let added = 1 + if late_add.is_ok() { 1 } else { 0 };
        let ordered = checkout
            .map(|result| result.items.iter().map(|item| i64::from(item.quantity)).sum::<i64>())
            .unwrap_or(0);
        let left = service.count().wait().unwrap().count;
        assert_eq!(ordered + left, added);
    }

    cleanup(&pool, jersey.id, &user_ids);
}
