//! CRUD, listing order, constraint mapping and stock bookkeeping against an
//! in-memory database.

use chrono::Duration;
use uuid::Uuid;

use simshop_core::models::{
    now, Category, NewCategory, NewOrder, NewProduct, OrderItem, PaymentMethod, Product,
    ProductFilter, ProductSort, Role, ShippingAddress, User,
};
use simshop_core::{OrderStatus, PaymentStatus, ShopError, StorageError};
use simshop_storage::queries::{categories, orders, products, users};
use simshop_storage::Store;

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn store() -> Store {
    Store::open_in_memory().unwrap()
}

fn category(store: &Store, name: &str) -> Category {
    let category = NewCategory {
        name: name.to_string(),
        slug: None,
        description: None,
    }
    .into_category(now())
    .unwrap();
    let saved = category.clone();
    store
        .with_conn_sync(move |conn| categories::insert_category(conn, &category))
        .unwrap();
    saved
}

fn product(store: &Store, category: Uuid, name: &str, price: f64, stock: i64) -> Product {
    let product = NewProduct {
        name: name.to_string(),
        price,
        category,
        stock,
        sku: name.to_uppercase().replace(' ', "-"),
        ..NewProduct::default()
    }
    .into_product(now())
    .unwrap();
    let saved = product.clone();
    store
        .with_conn_sync(move |conn| products::insert_product(conn, &product))
        .unwrap();
    saved
}

fn user(store: &Store, email: &str) -> User {
    let at = now();
    let user = User {
        id: Uuid::new_v4(),
        name: "Ana".into(),
        email: email.into(),
        role: Role::Customer,
        active: true,
        created_at: at,
        updated_at: at,
    };
    let saved = user.clone();
    store
        .with_conn_sync(move |conn| users::insert_user(conn, &user, "hash"))
        .unwrap();
    saved
}

fn order_for(user: Uuid, product: &Product, quantity: u32) -> simshop_core::models::Order {
    NewOrder {
        user: None,
        items: vec![OrderItem {
            product: product.id,
            quantity,
            price: product.price,
        }],
        total_amount: product.price * f64::from(quantity),
        shipping_address: ShippingAddress {
            street: "Calle Mayor 1".into(),
            city: "Madrid".into(),
            postal_code: "28013".into(),
            country: "España".into(),
        },
        payment_method: PaymentMethod::Tarjeta,
        notes: None,
    }
    .into_order(user, now())
    .unwrap()
}

fn list(store: &Store, filter: ProductFilter) -> Vec<String> {
    store
        .with_conn_sync(move |conn| products::list_products(conn, &filter))
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect()
}

// ─── Categories ──────────────────────────────────────────────────────────────

#[test]
fn categories_listed_by_name_and_found_by_slug() {
    let store = store();
    category(&store, "Smartwatch");
    let sim = category(&store, "SIM Prepago");

    let names: Vec<String> = store
        .with_conn_sync(categories::list_categories)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["SIM Prepago", "Smartwatch"]);

    let found = store
        .with_conn_sync(|conn| categories::get_category_by_slug(conn, "sim-prepago"))
        .unwrap()
        .unwrap();
    assert_eq!(found, sim);
}

#[test]
fn duplicate_slug_is_reported_as_duplicate() {
    let store = store();
    category(&store, "SIM Prepago");
    let again = NewCategory {
        name: "Sim prepago".into(),
        slug: None,
        description: None,
    }
    .into_category(now())
    .unwrap();

    let err = store
        .with_conn_sync(move |conn| categories::insert_category(conn, &again))
        .unwrap_err();
    match err {
        ShopError::Storage(StorageError::Duplicate { field }) => {
            assert_eq!(field, "categories.slug");
        }
        other => panic!("expected duplicate, got {other:?}"),
    }
}

#[test]
fn category_in_use_cannot_be_deleted() {
    let store = store();
    let sim = category(&store, "SIM Prepago");
    product(&store, sim.id, "SIM Vodafone 10GB", 15.99, 5);

    let err = store
        .with_conn_sync(move |conn| categories::delete_category(conn, sim.id))
        .unwrap_err();
    assert!(matches!(err, ShopError::Storage(StorageError::Reference { .. })));
}

#[test]
fn product_requires_existing_category() {
    let store = store();
    let orphan = NewProduct {
        name: "Orphan".into(),
        price: 1.0,
        category: Uuid::new_v4(),
        sku: "ORPHAN".into(),
        ..NewProduct::default()
    }
    .into_product(now())
    .unwrap();

    let err = store
        .with_conn_sync(move |conn| products::insert_product(conn, &orphan))
        .unwrap_err();
    assert!(matches!(err, ShopError::Storage(StorageError::Reference { .. })));
}

// ─── Products ────────────────────────────────────────────────────────────────

#[test]
fn product_listing_filters_and_sorts() {
    let store = store();
    let sim = category(&store, "SIM Prepago");
    let watches = category(&store, "Smartwatch");

    let mut cheap = product(&store, sim.id, "SIM Basic", 5.0, 10);
    product(&store, sim.id, "SIM Vodafone 10GB", 15.99, 10);
    product(&store, watches.id, "Watch 100% Sport", 99.0, 2);

    cheap.is_offer = true;
    store
        .with_conn_sync(move |conn| products::update_product(conn, &cheap))
        .unwrap();

    assert_eq!(
        list(
            &store,
            ProductFilter {
                sort: ProductSort::PriceAsc,
                ..ProductFilter::default()
            }
        ),
        vec!["SIM Basic", "SIM Vodafone 10GB", "Watch 100% Sport"]
    );
    assert_eq!(
        list(
            &store,
            ProductFilter {
                category: Some(sim.id),
                sort: ProductSort::PriceDesc,
                ..ProductFilter::default()
            }
        ),
        vec!["SIM Vodafone 10GB", "SIM Basic"]
    );
    assert_eq!(
        list(
            &store,
            ProductFilter {
                only_offers: true,
                ..ProductFilter::default()
            }
        ),
        vec!["SIM Basic"]
    );
    // `%` is literal, not a wildcard.
    assert_eq!(
        list(
            &store,
            ProductFilter {
                search: Some("100%".into()),
                ..ProductFilter::default()
            }
        ),
        vec!["Watch 100% Sport"]
    );
    assert!(list(
        &store,
        ProductFilter {
            search: Some("0%S".into()),
            ..ProductFilter::default()
        }
    )
    .is_empty());
}

#[test]
fn search_folds_non_ascii_case() {
    let store = store();
    let sim = category(&store, "SIM Prepago");
    let mut phone = product(&store, sim.id, "Teléfono Ñandú", 120.0, 3);
    product(&store, sim.id, "SIM Básica", 5.0, 10);

    let search = |term: &str| {
        list(
            &store,
            ProductFilter {
                search: Some(term.to_string()),
                ..ProductFilter::default()
            },
        )
    };
    assert_eq!(search("ñandú"), vec!["Teléfono Ñandú"]);
    assert_eq!(search("TELÉFONO"), vec!["Teléfono Ñandú"]);
    assert_eq!(search("BÁSICA"), vec!["SIM Básica"]);

    // Renames are searchable under the new name only.
    phone.name = "Módem Águila".into();
    store
        .with_conn_sync(move |conn| products::update_product(conn, &phone))
        .unwrap();
    assert!(search("ñandú").is_empty());
    assert_eq!(search("águila"), vec!["Módem Águila"]);
}

#[test]
fn newest_first_is_stable_for_equal_timestamps() {
    let store = store();
    let sim = category(&store, "SIM Prepago");
    let at = now();
    for name in ["first", "second", "third"] {
        let p = NewProduct {
            name: name.into(),
            price: 1.0,
            category: sim.id,
            sku: name.into(),
            ..NewProduct::default()
        }
        .into_product(at)
        .unwrap();
        store
            .with_conn_sync(move |conn| products::insert_product(conn, &p))
            .unwrap();
    }

    assert_eq!(
        list(&store, ProductFilter::default()),
        vec!["third", "second", "first"]
    );
    assert_eq!(
        list(
            &store,
            ProductFilter {
                window: Some((2, 2)),
                ..ProductFilter::default()
            }
        ),
        vec!["first"]
    );
}

#[test]
fn adjust_stock_never_goes_negative() {
    let store = store();
    let sim = category(&store, "SIM Prepago");
    let p = product(&store, sim.id, "SIM Basic", 5.0, 3);
    let id = p.id;

    let taken = store
        .with_conn_sync(move |conn| products::adjust_stock(conn, id, -3))
        .unwrap();
    assert!(taken);
    let refused = store
        .with_conn_sync(move |conn| products::adjust_stock(conn, id, -1))
        .unwrap();
    assert!(!refused);

    let stock = store
        .with_conn_sync(move |conn| products::get_product(conn, id))
        .unwrap()
        .unwrap()
        .stock;
    assert_eq!(stock, 0);
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[test]
fn credentials_lookup_returns_hash() {
    let store = store();
    let ana = user(&store, "ana@simshop.com");

    let (found, hash) = store
        .with_conn_sync(|conn| users::get_user_credentials(conn, "ana@simshop.com"))
        .unwrap()
        .unwrap();
    assert_eq!(found, ana);
    assert_eq!(hash, "hash");
}

#[test]
fn duplicate_email_is_reported_as_duplicate() {
    let store = store();
    user(&store, "ana@simshop.com");
    let at = now();
    let clash = User {
        id: Uuid::new_v4(),
        name: "Otra Ana".into(),
        email: "ana@simshop.com".into(),
        role: Role::Customer,
        active: true,
        created_at: at,
        updated_at: at,
    };
    let err = store
        .with_conn_sync(move |conn| users::insert_user(conn, &clash, "hash"))
        .unwrap_err();
    assert!(matches!(err, ShopError::Storage(StorageError::Duplicate { .. })));
}

#[test]
fn users_paginate_newest_first() {
    let store = store();
    for i in 0..5 {
        user(&store, &format!("user{i}@simshop.com"));
    }
    let page = store
        .with_conn_sync(|conn| users::list_users(conn, 2, 0))
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].email, "user4@simshop.com");
    assert_eq!(store.with_conn_sync(users::count_users).unwrap(), 5);
}

// ─── Orders ──────────────────────────────────────────────────────────────────

#[test]
fn orders_round_trip_with_nested_documents() {
    let store = store();
    let sim = category(&store, "SIM Prepago");
    let p = product(&store, sim.id, "SIM Vodafone 10GB", 15.99, 10);
    let ana = user(&store, "ana@simshop.com");

    let order = order_for(ana.id, &p, 1);
    let expected = order.clone();
    store
        .with_conn_sync(move |conn| orders::insert_order(conn, &order))
        .unwrap();

    let loaded = store
        .with_conn_sync(move |conn| orders::get_order(conn, expected.id))
        .unwrap()
        .unwrap();
    assert_eq!(loaded.items, vec![OrderItem { product: p.id, quantity: 1, price: 15.99 }]);
    assert_eq!(loaded.shipping_address.city, "Madrid");
    assert_eq!(loaded.order_status, OrderStatus::Pendiente);
    assert_eq!(loaded.payment_status, PaymentStatus::Pendiente);
}

#[test]
fn user_orders_listed_newest_first() {
    let store = store();
    let sim = category(&store, "SIM Prepago");
    let p = product(&store, sim.id, "SIM Vodafone 10GB", 15.99, 10);
    let ana = user(&store, "ana@simshop.com");
    let bea = user(&store, "bea@simshop.com");

    let mut older = order_for(ana.id, &p, 1);
    older.created_at = now() - Duration::hours(1);
    let newer = order_for(ana.id, &p, 2);
    let other = order_for(bea.id, &p, 3);
    let (older_id, newer_id) = (older.id, newer.id);
    store
        .with_conn_sync(move |conn| {
            orders::insert_order(conn, &older)?;
            orders::insert_order(conn, &newer)?;
            orders::insert_order(conn, &other)
        })
        .unwrap();

    let ids: Vec<Uuid> = store
        .with_conn_sync(move |conn| orders::list_orders_for_user(conn, ana.id))
        .unwrap()
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec![newer_id, older_id]);
}

#[test]
fn user_with_orders_cannot_be_deleted() {
    let store = store();
    let sim = category(&store, "SIM Prepago");
    let p = product(&store, sim.id, "SIM Vodafone 10GB", 15.99, 10);
    let ana = user(&store, "ana@simshop.com");
    let order = order_for(ana.id, &p, 1);
    store
        .with_conn_sync(move |conn| orders::insert_order(conn, &order))
        .unwrap();

    let err = store
        .with_conn_sync(move |conn| users::delete_user(conn, ana.id))
        .unwrap_err();
    assert!(matches!(err, ShopError::Storage(StorageError::Reference { .. })));
}

#[test]
fn reservation_is_all_or_nothing() {
    let store = store();
    let sim = category(&store, "SIM Prepago");
    let plenty = product(&store, sim.id, "SIM Basic", 5.0, 10);
    let scarce = product(&store, sim.id, "SIM Vodafone 10GB", 15.99, 1);
    let ana = user(&store, "ana@simshop.com");

    let mut order = order_for(ana.id, &plenty, 4);
    order.items.push(OrderItem {
        product: scarce.id,
        quantity: 2,
        price: scarce.price,
    });

    let err = store
        .with_conn_sync(move |conn| orders::insert_order_reserving_stock(conn, &mut order))
        .unwrap_err();
    assert!(matches!(err, ShopError::Conflict(_)));

    let (plenty_stock, count) = store
        .with_conn_sync(move |conn| {
            let stock = products::get_product(conn, plenty.id)?.map(|p| p.stock);
            Ok((stock, orders::count_orders(conn)?))
        })
        .unwrap();
    assert_eq!(plenty_stock, Some(10));
    assert_eq!(count, 0);
}

#[test]
fn cancelling_a_reserved_order_restocks() {
    let store = store();
    let sim = category(&store, "SIM Prepago");
    let p = product(&store, sim.id, "SIM Basic", 5.0, 10);
    let ana = user(&store, "ana@simshop.com");

    let mut order = order_for(ana.id, &p, 4);
    let order = store
        .with_conn_sync(move |conn| {
            orders::insert_order_reserving_stock(conn, &mut order)?;
            Ok(order)
        })
        .unwrap();
    assert!(order.stock_reserved);

    let product_id = p.id;
    let stock_after = |store: &Store| {
        store
            .with_conn_sync(move |conn| products::get_product(conn, product_id))
            .unwrap()
            .unwrap()
            .stock
    };
    assert_eq!(stock_after(&store), 6);

    let mut cancelled = order.clone();
    cancelled.order_status = OrderStatus::Cancelado;
    let cancelled = store
        .with_conn_sync(move |conn| {
            assert!(orders::save_status(conn, &mut cancelled)?);
            Ok(cancelled)
        })
        .unwrap();
    assert!(!cancelled.stock_reserved);
    assert_eq!(stock_after(&store), 10);

    // A second cancellation has nothing left to give back.
    let mut again = cancelled;
    store
        .with_conn_sync(move |conn| orders::save_status(conn, &mut again))
        .unwrap();
    assert_eq!(stock_after(&store), 10);
}

#[test]
fn save_status_on_unknown_order_reports_missing() {
    let store = store();
    let sim = category(&store, "SIM Prepago");
    let p = product(&store, sim.id, "SIM Basic", 5.0, 10);
    let mut ghost = order_for(Uuid::new_v4(), &p, 1);
    let found = store
        .with_conn_sync(move |conn| orders::save_status(conn, &mut ghost))
        .unwrap();
    assert!(!found);
}
