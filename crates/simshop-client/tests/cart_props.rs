//! Property tests for cart bookkeeping.

use std::collections::HashMap;

use proptest::prelude::*;
use uuid::Uuid;

use simshop_client::Cart;
use simshop_core::models::ProductSummary;

fn catalog() -> Vec<ProductSummary> {
    (0..5)
        .map(|i| ProductSummary {
            id: Uuid::from_u128(i + 1),
            name: format!("SIM {i}"),
            slug: format!("sim-{i}"),
            price: 4.99 + i as f64 * 5.0,
            images: Vec::new(),
        })
        .collect()
}

#[derive(Debug, Clone)]
enum Op {
    Add(usize, u32),
    Update(usize, u32),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..5usize, 0..20u32).prop_map(|(p, q)| Op::Add(p, q)),
        (0..5usize, 0..20u32).prop_map(|(p, q)| Op::Update(p, q)),
        (0..5usize).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn totals_match_a_plain_model(ops in prop::collection::vec(op(), 0..40)) {
        let products = catalog();
        let mut cart = Cart::new();
        let mut model: HashMap<usize, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Add(p, q) => {
                    cart.add(products[p].clone(), q);
                    if q > 0 {
                        *model.entry(p).or_default() += q;
                    }
                }
                Op::Update(p, q) => {
                    let existed = model.contains_key(&p);
                    prop_assert_eq!(cart.update_quantity(products[p].id, q), existed);
                    if q == 0 {
                        model.remove(&p);
                    } else if existed {
                        model.insert(p, q);
                    }
                }
                Op::Remove(p) => {
                    prop_assert_eq!(cart.remove(products[p].id), model.remove(&p).is_some());
                }
            }
        }

        let expected_total: f64 = model
            .iter()
            .map(|(p, q)| products[*p].price * f64::from(*q))
            .sum();
        let expected_items: u64 = model.values().map(|q| u64::from(*q)).sum();

        prop_assert_eq!(cart.line_count(), model.len());
        prop_assert_eq!(cart.item_count(), expected_items);
        prop_assert!((cart.total() - expected_total).abs() < 1e-6);
        prop_assert!(cart.lines().iter().all(|line| line.quantity > 0));
    }

    #[test]
    fn clear_empties_everything(adds in prop::collection::vec((0..5usize, 1..10u32), 1..10)) {
        let products = catalog();
        let mut cart = Cart::new();
        for (p, q) in adds {
            cart.add(products[p].clone(), q);
        }
        prop_assert!(!cart.is_empty());
        cart.clear();
        prop_assert_eq!(cart.item_count(), 0);
        prop_assert_eq!(cart.total(), 0.0);
    }
}
