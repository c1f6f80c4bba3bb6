//! End-to-end cart and checkout scenarios.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use velo_cache::{FileStore, KvStore, MemoryStore};
use velo_commerce::prelude::*;

fn catalog() -> Vec<Product> {
    vec![
        Product::new(1, "Carbon Handlebar", ProductKind::Hardware, Money::from_cents(8900), 3),
        Product::new(2, "Team Jersey", ProductKind::Apparel, Money::from_cents(5500), 10)
            .with_colors(["Navy", "Red"])
            .with_sizes(["S", "M", "L"]),
        Product::new(3, "Bottle Cage", ProductKind::Hardware, Money::from_cents(1500), 0),
    ]
}

fn address() -> Address {
    Address::new("Marta", "Gil", "Av. del Puerto 12", "Valencia", "46023", "marta@example.com")
        .with_country("España")
}

fn walk_to_confirmation<G: PaymentGateway>(session: &mut CheckoutSession<G>) {
    session.update_checkout_data(
        CheckoutUpdate::new()
            .shipping_address(address())
            .use_shipping_as_billing(true),
    );
    assert!(session.advance());
    session.select_shipping_method("gratis").unwrap();
    assert!(session.advance());
    session.select_payment_method("tarjeta").unwrap();
    assert!(session.advance());
    assert_eq!(session.current_step(), CheckoutStep::Confirmation);
}

struct DecliningGateway;

#[async_trait]
impl PaymentGateway for DecliningGateway {
    async fn charge(&self, _request: &velo_commerce::checkout::PaymentRequest) -> Result<Transaction, CommerceError> {
        Err(CommerceError::PaymentFailed("card declined".into()))
    }
}

#[tokio::test]
async fn test_full_checkout() {
    let kv = Arc::new(MemoryStore::new());
    let mut store = CartStore::new(kv.clone()).rehydrate();
    let products = catalog();

    let change = store.add_item(products[0].candidate(Variation::none(), 5));
    assert!(change.was_clamped());
    assert_eq!(change.applied, 3);

    let navy_m = Variation::none().with_color("Navy").with_size("M");
    store.add_item(products[1].candidate(navy_m.clone(), 1));
    store.add_item(products[1].candidate(navy_m.clone(), 1));
    assert_eq!(store.cart().unique_line_count(), 2);
    assert_eq!(store.find_line(ProductId::new(2), &navy_m).map(|l| l.quantity), Some(2));

    let sold_out = store.add_item(products[2].candidate(Variation::none(), 1));
    assert_eq!(sold_out.applied, 0);
    assert_eq!(store.cart().unique_line_count(), 2);

    // 3 x 89.00 + 2 x 55.00
    assert_eq!(store.cart().subtotal(), Money::from_cents(37700));

    let mut session = CheckoutSession::new(SimulatedGateway::new(Duration::from_millis(5)));
    walk_to_confirmation(&mut session);
    assert_eq!(session.state().billing_address, address());

    let summary = session.summary(store.cart());
    assert!(summary.has_free_shipping());

    let order = session.submit_order(store.cart()).await.unwrap();
    assert_eq!(order.status(), OrderStatus::Confirmed);
    assert_eq!(order.total(), summary.grand_total());
    assert_eq!(order.checkout().shipping_address, address());

    store.clear();
    session.reset();
    assert!(store.cart().is_empty());
    assert!(!kv.exists("velo:cart").unwrap());
    assert_eq!(order.item_count(), 5);
}

#[tokio::test]
async fn test_declined_payment_leaves_state_intact() {
    let kv = Arc::new(MemoryStore::new());
    let mut store = CartStore::new(kv.clone());
    store.add_item(catalog()[0].candidate(Variation::none(), 1));
    let before = store.snapshot();

    let mut session = CheckoutSession::new(DecliningGateway);
    walk_to_confirmation(&mut session);
    let state_before = session.state().clone();

    let err = session.submit_order(store.cart()).await.unwrap_err();
    assert!(matches!(err, CommerceError::PaymentFailed(_)));
    assert_eq!(store.cart(), &before);
    assert_eq!(session.state(), &state_before);
    assert!(!session.is_submitting());

    let restored = CartStore::new(kv).rehydrate();
    assert_eq!(restored.cart(), &before);
}

#[test]
fn test_cart_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let jersey = &catalog()[1];
    let red_l = Variation::none().with_color("Red").with_size("L");

    {
        let disk: Arc<dyn KvStore> = Arc::new(FileStore::open(dir.path()).unwrap());
        let mut store = CartStore::new(disk);
        store.add_item(jersey.candidate(red_l.clone(), 4));
    }

    let disk: Arc<dyn KvStore> = Arc::new(FileStore::open(dir.path()).unwrap());
    let mut store = CartStore::new(disk.clone()).load().unwrap();
    let line = store.find_line(jersey.id, &red_l).unwrap().clone();
    assert_eq!(line.quantity, 4);
    assert_eq!(line.display_name(), "Team Jersey (Red / L)");

    store.update_quantity(&line.line_id, 0);
    assert!(store.cart().is_empty());
    assert!(disk.keys().unwrap().is_empty());
}

#[test]
fn test_order_is_a_snapshot() {
    let mut store = CartStore::new(Arc::new(MemoryStore::new()));
    let change = store.add_item(catalog()[1].candidate(Variation::none().with_size("S"), 2));

    let mut checkout = CheckoutState::new();
    checkout.apply(CheckoutUpdate::new().payment_method(standard_payment_method("paypal")));
    let summary = compute_summary(store.cart(), None);
    let order = OrderFactory::create_order(store.cart(), &checkout, summary).unwrap();

    store.update_quantity(&change.line_id, 9);
    checkout.apply(CheckoutUpdate::new().notes("leave at the door"));

    assert_eq!(store.cart().grand_quantity(), 9);
    assert_eq!(order.lines()[0].quantity, 2);
    assert!(order.checkout().notes.is_empty());
}

fn standard_payment_method(id: &str) -> PaymentMethod {
    velo_commerce::checkout::standard_payment_methods()
        .into_iter()
        .find(|m| m.id.as_str() == id)
        .unwrap()
}
