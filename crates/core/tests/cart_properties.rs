//! Property tests for cart quantity arithmetic and write-through.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use agency_core::storage::CART_KEY;
use agency_core::{Cart, CartStore, MemoryStore, NewCartItem, Price, ServiceId};
use proptest::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
enum Op {
    Add { id: u8, price: u32, quantity: Option<u32> },
    Remove { id: u8 },
    SetQuantity { id: u8, quantity: i64 },
}

fn service_id(n: u8) -> ServiceId {
    ServiceId::parse(&format!("pkg-{n}")).unwrap()
}

fn new_item(id: u8, price: u32, quantity: Option<u32>) -> NewCartItem {
    let mut item = NewCartItem::new(service_id(id), format!("Package {id}"), Price::from_units(price));
    item.quantity = quantity;
    item
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..5, 0u32..50_000, proptest::option::of(0u32..10))
            .prop_map(|(id, price, quantity)| Op::Add { id, price, quantity }),
        (0u8..5).prop_map(|id| Op::Remove { id }),
        (0u8..5, -3i64..10).prop_map(|(id, quantity)| Op::SetQuantity { id, quantity }),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn repeated_adds_sum_quantities(quantities in proptest::collection::vec(proptest::option::of(0u32..100), 1..20)) {
        let mut cart = Cart::new();
        for quantity in &quantities {
            cart.add_item(new_item(1, 100, *quantity));
        }
        let expected: u32 = quantities
            .iter()
            .map(|q| q.filter(|q| *q > 0).unwrap_or(1))
            .sum();

        prop_assert_eq!(cart.items().len(), 1);
        prop_assert_eq!(cart.get(&service_id(1)).unwrap().quantity, expected);
    }

    #[test]
    fn ids_stay_unique_and_quantities_positive(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let mut cart = Cart::new();
        for op in ops {
            match op {
                Op::Add { id, price, quantity } => cart.add_item(new_item(id, price, quantity)),
                Op::Remove { id } => { cart.remove_item(&service_id(id)); }
                Op::SetQuantity { id, quantity } => { cart.set_quantity(&service_id(id), quantity); }
            }
        }

        let mut seen = HashMap::new();
        for item in cart.items() {
            prop_assert!(item.quantity > 0);
            prop_assert!(seen.insert(item.id.clone(), ()).is_none());
        }
        let expected: Decimal = cart
            .items()
            .iter()
            .map(|item| item.price.amount() * Decimal::from(item.quantity))
            .sum();
        prop_assert_eq!(cart.total(), expected);
    }

    #[test]
    fn set_quantity_zero_equals_remove(ops in proptest::collection::vec(op_strategy(), 0..20), target in 0u8..5) {
        let mut cart = Cart::new();
        for op in ops {
            if let Op::Add { id, price, quantity } = op {
                cart.add_item(new_item(id, price, quantity));
            }
        }
        let mut via_set = cart.clone();
        via_set.set_quantity(&service_id(target), 0);
        let mut via_remove = cart;
        via_remove.remove_item(&service_id(target));

        prop_assert_eq!(via_set, via_remove);
    }

    #[test]
    fn persisted_matches_memory_after_every_mutation(ops in proptest::collection::vec(op_strategy(), 1..25)) {
        runtime().block_on(async {
            let storage = MemoryStore::new();
            let mut store = CartStore::open(storage.clone()).await;
            for op in ops {
                match op {
                    Op::Add { id, price, quantity } => store.add_item(new_item(id, price, quantity)).await,
                    Op::Remove { id } => store.remove_item(&service_id(id)).await,
                    Op::SetQuantity { id, quantity } => store.set_quantity(&service_id(id), quantity).await,
                }
                let persisted: Cart = serde_json::from_str(&storage.snapshot(CART_KEY).unwrap()).unwrap();
                assert_eq!(&persisted, store.cart());
            }
        });
    }
}

#[test]
fn scenario_add_twice_then_total() {
    let mut cart = Cart::new();
    cart.add_item(NewCartItem::new(ServiceId::parse("a").unwrap(), "X", Price::from_units(100)));
    cart.add_item(NewCartItem::new(ServiceId::parse("a").unwrap(), "X", Price::from_units(100)));

    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 2);
    assert_eq!(cart.total(), Decimal::from(200));
}

#[test]
fn scenario_custom_quote_item() {
    let mut cart = Cart::new();
    cart.add_item(NewCartItem::new(ServiceId::parse("b").unwrap(), "Y", Price::ZERO));

    assert_eq!(cart.total(), Decimal::ZERO);
    assert_eq!(cart.items()[0].price, Price::ZERO);
    assert!(cart.has_custom_quote());
}

#[test]
fn scenario_set_quantity_leaves_others() {
    let mut cart = Cart::new();
    cart.add_item(NewCartItem::new(ServiceId::parse("a").unwrap(), "X", Price::from_units(100)));
    cart.add_item(NewCartItem::new(ServiceId::parse("c").unwrap(), "Z", Price::from_units(10)).with_quantity(3));
    cart.set_quantity(&ServiceId::parse("a").unwrap(), 5);

    assert_eq!(cart.items()[0].quantity, 5);
    assert_eq!(cart.items()[1].quantity, 3);
}
