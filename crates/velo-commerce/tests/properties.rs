//! Property tests for cart invariants.

use proptest::prelude::*;
use velo_commerce::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add { product: u64, color: Option<String>, quantity: i64, stock: i64 },
    Update { index: usize, quantity: i64 },
    Remove { index: usize },
    Clear,
}

fn color() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec!["Black", "Red", "a|c=b", "%7C", " "]).prop_map(String::from))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (1u64..5, color(), -3i64..20, 0i64..8).prop_map(|(product, color, quantity, stock)| Op::Add {
            product,
            color,
            quantity,
            stock,
        }),
        3 => (0usize..8, -2i64..25).prop_map(|(index, quantity)| Op::Update { index, quantity }),
        2 => (0usize..8).prop_map(|index| Op::Remove { index }),
        1 => Just(Op::Clear),
    ]
}

fn candidate(product: u64, color: Option<&str>, quantity: i64, stock: i64) -> LineCandidate {
    LineCandidate {
        product_id: ProductId::new(product),
        name: format!("Part {product}"),
        unit_price: Money::from_cents(product as i64 * 1234 + 1),
        quantity,
        image_url: None,
        variation: Variation::new(color, None),
        product_kind: ProductKind::Hardware,
        available_stock: stock,
    }
}

fn apply(cart: &Cart, op: &Op) -> Cart {
    match op {
        Op::Add { product, color, quantity, stock } => {
            cart.add_item(candidate(*product, color.as_deref(), *quantity, *stock)).0
        }
        Op::Update { index, quantity } => match cart.lines().get(*index) {
            Some(line) => cart.update_quantity(&line.line_id.clone(), *quantity).0,
            None => cart.clone(),
        },
        Op::Remove { index } => match cart.lines().get(*index) {
            Some(line) => cart.remove_item(&line.line_id.clone()),
            None => cart.clone(),
        },
        Op::Clear => cart.cleared(),
    }
}

fn assert_invariants(cart: &Cart) {
    let quantity: i64 = cart.lines().iter().map(|l| l.quantity).sum();
    let subtotal: Money = cart.lines().iter().map(|l| l.unit_price * l.quantity).sum();
    assert_eq!(cart.grand_quantity(), quantity);
    assert_eq!(cart.subtotal(), subtotal);

    let mut ids = std::collections::HashSet::new();
    for line in cart.lines() {
        assert!(line.quantity >= 1);
        assert!(line.quantity <= line.available_stock);
        assert_eq!(line.line_id, resolve_id(line.product_id, line.color.as_deref(), line.size.as_deref()));
        assert!(ids.insert(line.line_id.clone()));
    }
}

proptest! {
    #[test]
    fn prop_invariants_hold_after_any_sequence(ops in prop::collection::vec(op(), 0..40)) {
        let mut cart = Cart::new();
        for op in &ops {
            let before = cart.clone();
            let next = apply(&cart, op);
            // Transitions never touch the old snapshot.
            prop_assert_eq!(&cart, &before);
            assert_invariants(&next);
            cart = next;
        }
    }

    #[test]
    fn prop_add_clamps_to_stock(quantity in any::<i64>(), stock in 0i64..50, existing in 0i64..10) {
        let mut cart = Cart::new();
        if existing > 0 {
            cart = cart.add_item(candidate(1, None, existing, 50)).0;
        }
        let (after, change) = cart.add_item(candidate(1, None, quantity, stock));
        let held = after.lines().first().map_or(0, |l| l.quantity);
        prop_assert_eq!(held, change.applied);
        prop_assert_eq!(change.previous, existing);
        if quantity <= 0 || stock == 0 {
            // Nothing to add: the cart, including any held line, stays as it was.
            prop_assert_eq!(&after, &cart);
            prop_assert_eq!(change.applied, existing);
        } else {
            prop_assert!(change.applied >= 1);
            prop_assert!(change.applied <= stock);
        }
        assert_invariants(&after);
    }

    #[test]
    fn prop_update_clamps_to_stock(quantity in any::<i64>(), stock in 1i64..50) {
        let (cart, change) = Cart::new().add_item(candidate(2, Some("Red"), 1, stock));
        let (cart, update) = cart.update_quantity(&change.line_id, quantity);
        let update = update.unwrap();
        prop_assert!(update.applied <= stock);
        prop_assert_eq!(cart.is_empty(), quantity <= 0);
        assert_invariants(&cart);
    }

    #[test]
    fn prop_identity_is_deterministic(
        product in any::<u64>(),
        color in prop::option::of(".{0,8}"),
        size in prop::option::of(".{0,8}"),
    ) {
        let a = resolve_id(ProductId::new(product), color.as_deref(), size.as_deref());
        let b = resolve_id(ProductId::new(product), color.as_deref(), size.as_deref());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_distinct_colors_give_distinct_ids(
        product in any::<u64>(),
        c1 in "[A-Za-z|%=]{1,6}",
        c2 in "[A-Za-z|%=]{1,6}",
        size in prop::option::of("[A-Z|]{1,3}"),
    ) {
        prop_assume!(c1 != c2);
        let pid = ProductId::new(product);
        prop_assert_ne!(
            resolve_id(pid, Some(&c1), size.as_deref()),
            resolve_id(pid, Some(&c2), size.as_deref())
        );
    }

    #[test]
    fn prop_readding_merges(stock in 2i64..100) {
        let cart = Cart::new();
        let (cart, _) = cart.add_item(candidate(3, Some("Black"), 1, stock));
        let (cart, _) = cart.add_item(candidate(3, Some("Black"), 1, stock));
        prop_assert_eq!(cart.unique_line_count(), 1);
        prop_assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn prop_decode_normalises(ops in prop::collection::vec(op(), 0..20)) {
        let cart = ops.iter().fold(Cart::new(), |cart, op| apply(&cart, op));
        let json = serde_json::to_string(&cart).unwrap();
        let decoded: Cart = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(decoded, cart);
    }
}
