//! Walk the checkout wizard and place an order.

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use dialoguer::{Confirm, Input, Select};
use serde::Deserialize;
use tracing::info;
use velo_commerce::checkout::{Address, CheckoutSession, CheckoutStep, CheckoutUpdate, Order, PaymentGateway};
use velo_commerce::{CommerceError, Money};

use super::cart::{print_cart, print_summary};
use super::CheckoutArgs;
use crate::context::Context;
use crate::output::status_badge;

const TOTAL_STEPS: usize = 4;

/// Checkout details read from a file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutDetails {
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub use_shipping_as_billing: Option<bool>,
    pub shipping_method: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl CheckoutDetails {
    /// Load details from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read checkout details: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse checkout details: {}", path.display()))
    }

    /// The address-step update for `shipping_address`.
    ///
    /// Billing follows shipping unless the file gives a billing address; an
    /// explicit `use_shipping_as_billing` always wins.
    pub fn address_update(&self, shipping_address: Address) -> CheckoutUpdate {
        let same_as_shipping = self
            .use_shipping_as_billing
            .unwrap_or(self.billing_address.is_none());
        let mut update = CheckoutUpdate::new()
            .shipping_address(shipping_address)
            .use_shipping_as_billing(same_as_shipping);
        if let Some(billing) = self.billing_address.clone() {
            update = update.billing_address(billing);
        }
        if let Some(notes) = self.notes.clone() {
            update = update.notes(notes);
        }
        update
    }
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_cart()?;
    if store.cart().is_empty() {
        bail!("Your cart is empty. Add something with `velo cart add`.");
    }

    let details = match &args.details {
        Some(path) => CheckoutDetails::load(&ctx.resolve_path(&path.to_string_lossy()))?,
        None => CheckoutDetails::default(),
    };
    let interactive = !ctx.output.is_json();
    let mut session = ctx.checkout_session();

    ctx.output.header("Checkout");

    // Address
    ctx.output.step(1, TOTAL_STEPS, CheckoutStep::Address.display_name());
    let shipping_address = match details.shipping_address.clone() {
        Some(address) => address,
        None if interactive => prompt_address()?,
        None => Address::default(),
    };
    session.update_checkout_data(details.address_update(shipping_address));
    ensure_advanced(&mut session)?;

    // Shipping
    ctx.output.step(2, TOTAL_STEPS, CheckoutStep::Shipping.display_name());
    let shipping_id = match args.shipping.clone().or(details.shipping_method.clone()) {
        Some(id) => id,
        None if interactive => prompt_shipping(&session, store.cart().subtotal(), ctx)?,
        None => String::new(),
    };
    if !shipping_id.is_empty() {
        let method = session.select_shipping_method(&shipping_id)?;
        ctx.output.debug(&format!("Shipping with {}", method.name));
    }
    ensure_advanced(&mut session)?;

    // Payment
    ctx.output.step(3, TOTAL_STEPS, CheckoutStep::Payment.display_name());
    let payment_id = match args.payment.clone().or(details.payment_method.clone()) {
        Some(id) => id,
        None if interactive => prompt_payment(&session)?,
        None => String::new(),
    };
    if !payment_id.is_empty() {
        session.select_payment_method(&payment_id)?;
    }
    ensure_advanced(&mut session)?;

    // Confirmation
    ctx.output.step(4, TOTAL_STEPS, CheckoutStep::Confirmation.display_name());
    let summary = session.summary(store.cart());
    if interactive {
        print_cart(store.cart(), ctx);
        print_summary(&summary, ctx);
        print_selection(&session, summary.grand_total(), ctx);
    }

    if !args.yes && interactive {
        let confirmed = Confirm::new()
            .with_prompt(format!("Place order for {}?", ctx.money(summary.grand_total())))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Checkout cancelled; your cart is unchanged");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Processing payment...");
    let result = session.submit_order(store.cart()).await;
    spinner.finish_and_clear();
    let order = result.context("Order was not placed; your cart is unchanged")?;

    if order.is_confirmed() {
        store.clear();
    }
    info!(order = order.order_number(), status = order.status().as_str(), "Checkout finished");

    if let Some(path) = &args.output {
        let path = ctx.resolve_path(&path.to_string_lossy());
        std::fs::write(&path, serde_json::to_string_pretty(&order)?)
            .with_context(|| format!("Failed to write order: {}", path.display()))?;
        ctx.output.debug(&format!("Order written to {}", path.display()));
    }

    print_order(&order, ctx);
    Ok(())
}

/// Advance the wizard or fail with what the current step is missing.
fn ensure_advanced<G: PaymentGateway>(session: &mut CheckoutSession<G>) -> Result<()> {
    if session.advance() {
        return Ok(());
    }
    let step = session.current_step();
    Err(CommerceError::CheckoutIncomplete {
        step,
        missing: session.missing_fields(step),
    }
    .into())
}

fn prompt_address() -> Result<Address> {
    let required = |prompt: &str| -> Result<String> {
        Ok(Input::<String>::new().with_prompt(prompt).interact_text()?)
    };
    let optional = |prompt: &str| -> Result<Option<String>> {
        let value: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(Some(value.trim().to_string()).filter(|v| !v.is_empty()))
    };

    let mut address = Address::new(
        required("First name")?,
        required("Last name")?,
        required("Street and number")?,
        required("City")?,
        required("Postal code")?,
        required("Email")?,
    );
    address.region = optional("Region (optional)")?;
    address.country = optional("Country (optional)")?.unwrap_or_default();
    address.phone = optional("Phone (optional)")?;
    Ok(address)
}

fn prompt_shipping<G: PaymentGateway>(
    session: &CheckoutSession<G>,
    subtotal: Money,
    ctx: &Context,
) -> Result<String> {
    let methods: Vec<_> = session.shipping_methods().iter().filter(|m| m.enabled).collect();
    if methods.is_empty() {
        bail!("No shipping methods are available");
    }
    let labels: Vec<String> = methods
        .iter()
        .map(|m| {
            format!(
                "{} ({}, {})",
                m.name,
                ctx.money(m.effective_price(subtotal, session.policy())),
                m.eta_label
            )
        })
        .collect();
    let choice = Select::new()
        .with_prompt("Shipping method")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(methods[choice].id.to_string())
}

fn prompt_payment<G: PaymentGateway>(session: &CheckoutSession<G>) -> Result<String> {
    let methods = session.payment_methods();
    if methods.is_empty() {
        bail!("No payment methods are available");
    }
    let labels: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
    let choice = Select::new()
        .with_prompt("Payment method")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(methods[choice].id.to_string())
}

fn print_selection<G: PaymentGateway>(session: &CheckoutSession<G>, total: Money, ctx: &Context) {
    let state = session.state();
    ctx.output.kv("Ship to", &state.shipping_address.one_line());
    ctx.output.kv("Bill to", &state.billing_address.one_line());
    if let Some(method) = &state.shipping_method {
        ctx.output.kv("Shipping", &format!("{} ({})", method.name, method.eta_label));
    }
    if let Some(method) = &state.payment_method {
        ctx.output.kv("Payment", &method.name);
        let surcharge = method.surcharge_on(total);
        if !surcharge.is_zero() {
            ctx.output.info(&format!(
                "{} adds a {} surcharge, collected on delivery",
                method.name,
                ctx.money(surcharge)
            ));
        }
    }
}

fn print_order(order: &Order, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(order);
        return;
    }

    if order.is_confirmed() {
        ctx.output.success("Order placed");
    } else {
        ctx.output.warn("Order recorded but payment did not complete");
    }
    ctx.output.kv("Order", order.order_number());
    ctx.output.kv("Status", &status_badge(order.status()));
    ctx.output.kv("Total", &ctx.money(order.total()));
    ctx.output.kv("Transaction", order.transaction().transaction_id.as_str());
    ctx.output.kv(
        "Placed",
        &order.created_at().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use velo_commerce::checkout::CheckoutState;

    #[test]
    fn test_details_file() {
        let details: CheckoutDetails = toml::from_str(
            r#"
            shipping_method = "express"
            payment_method = "paypal"

            [shipping_address]
            firstName = "Ana"
            lastName = "Ruiz"
            line1 = "Calle Mayor 1"
            city = "Valencia"
            postalCode = "46001"
            email = "ana@example.com"
            "#,
        )
        .unwrap();
        let address = details.shipping_address.clone().unwrap();
        assert!(address.is_complete());
        assert_eq!(details.shipping_method.as_deref(), Some("express"));
        assert!(details.use_shipping_as_billing.is_none());

        let mut state = CheckoutState::new();
        state.apply(details.address_update(address.clone()));
        assert!(state.use_shipping_as_billing);
        assert_eq!(state.billing_address, address);
    }

    #[test]
    fn test_details_billing_address_kept_without_flag() {
        let details: CheckoutDetails = toml::from_str(
            r#"
            [shipping_address]
            firstName = "Ana"
            lastName = "Ruiz"
            line1 = "Calle Mayor 1"
            city = "Valencia"
            postalCode = "46001"
            email = "ana@example.com"

            [billing_address]
            firstName = "Ana"
            lastName = "Ruiz"
            company = "Ruiz Ciclos SL"
            line1 = "Avenida del Puerto 20"
            city = "Valencia"
            postalCode = "46023"
            email = "facturas@ruizciclos.es"
            "#,
        )
        .unwrap();
        assert!(details.use_shipping_as_billing.is_none());

        let shipping = details.shipping_address.clone().unwrap();
        let mut state = CheckoutState::new();
        state.apply(details.address_update(shipping));
        assert!(!state.use_shipping_as_billing);
        assert_eq!(state.billing_address.line1, "Avenida del Puerto 20");
        assert_eq!(state.billing_address.company.as_deref(), Some("Ruiz Ciclos SL"));
    }

    #[test]
    fn test_explicit_flag_wins_over_billing_address() {
        let billing = Address::new("Luis", "Gil", "Plaza 3", "Sevilla", "41001", "luis@example.com");
        let details = CheckoutDetails {
            billing_address: Some(billing),
            use_shipping_as_billing: Some(true),
            ..Default::default()
        };
        let shipping = Address::new("Ana", "Ruiz", "Calle Mayor 1", "Valencia", "46001", "ana@example.com");
        let mut state = CheckoutState::new();
        state.apply(details.address_update(shipping.clone()));
        assert_eq!(state.billing_address, shipping);
    }
}
