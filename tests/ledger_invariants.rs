//! Inventory conservation across arbitrary operation sequences.
//!
//! For every product, units available plus units reserved by the cart plus
//! units sold through checkout must equal the starting stock plus anything
//! restocked, whether each operation succeeded or was rejected.

use proptest::prelude::*;
use rusty_money::{Money, iso::GBP};
use rustc_hash::FxHashMap;
use shopfront::prelude::*;

const PRODUCTS: [u64; 4] = [1, 2, 3, 4];
const STOCK: [(u64, u32); 4] = [(1, 3), (2, 1), (3, 0), (4, 6)];

#[derive(Debug, Clone)]
enum Op {
    Add { product: usize, sized: bool },
    Update { line: usize, quantity: u32 },
    Remove { line: usize },
    Clear,
    SaveForLater { line: usize },
    MoveBack { item: usize },
    SaveCart,
    Load { cart: usize },
    Merge { cart: usize },
    Undo,
    Restock { product: usize, units: u32 },
    Checkout,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..PRODUCTS.len(), any::<bool>())
            .prop_map(|(product, sized)| Op::Add { product, sized }),
        2 => (0..4_usize, 0..6_u32).prop_map(|(line, quantity)| Op::Update { line, quantity }),
        1 => (0..4_usize).prop_map(|line| Op::Remove { line }),
        1 => Just(Op::Clear),
        1 => (0..4_usize).prop_map(|line| Op::SaveForLater { line }),
        1 => (0..4_usize).prop_map(|item| Op::MoveBack { item }),
        1 => Just(Op::SaveCart),
        2 => (0..3_usize).prop_map(|cart| Op::Load { cart }),
        1 => (0..3_usize).prop_map(|cart| Op::Merge { cart }),
        2 => Just(Op::Undo),
        1 => (0..PRODUCTS.len(), 1..3_u32).prop_map(|(product, units)| Op::Restock { product, units }),
        1 => Just(Op::Checkout),
    ]
}

fn product(index: usize) -> ProductId {
    ProductId::new(PRODUCTS.get(index).copied().unwrap_or(1))
}

/// Translate an index-based op into an action against the current state.
fn action(ledger: &CartLedger, op: &Op) -> Option<LedgerAction> {
    let line = |index: usize| ledger.cart().items().get(index).map(|item| item.id);

    Some(match *op {
        Op::Add { product: index, sized } => LedgerAction::AddToCart {
            product: product(index),
            unit_price: Money::from_minor(199, GBP),
            variant: sized.then(|| "M".to_string()),
        },
        Op::Update { line: index, quantity } => LedgerAction::UpdateQuantity {
            line: line(index)?,
            quantity,
        },
        Op::Remove { line: index } => LedgerAction::RemoveFromCart { line: line(index)? },
        Op::Clear => LedgerAction::ClearCart,
        Op::SaveForLater { line: index } => LedgerAction::MoveToSavedForLater { line: line(index)? },
        Op::MoveBack { item } => LedgerAction::MoveBackToCart {
            item: ledger.saved_for_later().get(item)?.id,
        },
        Op::SaveCart => LedgerAction::SaveCart {
            name: "saved".to_string(),
        },
        Op::Load { cart } => LedgerAction::LoadCart {
            cart: ledger.saved_carts().get(cart)?.id,
        },
        Op::Merge { cart } => LedgerAction::AddCartItems {
            cart: ledger.saved_carts().get(cart)?.id,
        },
        Op::Undo => LedgerAction::Undo,
        Op::Restock { product: index, units } => LedgerAction::Restock {
            product: product(index),
            units,
        },
        Op::Checkout => LedgerAction::Checkout,
    })
}

fn sold(ledger: &CartLedger, product: ProductId) -> u32 {
    ledger
        .orders()
        .iter()
        .flat_map(|order| order.items.iter())
        .filter(|item| item.product == product)
        .map(|item| item.quantity)
        .sum()
}

proptest! {
    #[test]
    fn units_are_conserved(ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut ledger = CartLedger::new(InventoryPool::from(STOCK), GBP);
        let mut expected: FxHashMap<ProductId, u32> = STOCK
            .iter()
            .map(|(id, units)| (ProductId::new(*id), *units))
            .collect();

        for op in &ops {
            let Some(action) = action(&ledger, op) else {
                continue;
            };

            let before = ledger.clone();
            let result = ledger.dispatch(action.clone());

            match result {
                Ok(_) => {
                    if let LedgerAction::Restock { product, units } = action {
                        *expected.entry(product).or_default() += units;
                    }
                }
                Err(_) => prop_assert_eq!(&ledger, &before),
            }

            for (product, total) in &expected {
                let accounted = ledger.available(*product)
                    + ledger.cart().reserved(*product)
                    + sold(&ledger, *product);

                prop_assert_eq!(accounted, *total, "product {} after {:?}", product, op);
            }
        }
    }
}
