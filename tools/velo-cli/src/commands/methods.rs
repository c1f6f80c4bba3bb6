//! List shipping and payment methods.

use anyhow::Result;
use serde_json::json;

use super::{PaymentArgs, ShippingArgs};
use crate::context::Context;

/// Run the shipping command.
pub async fn shipping(args: ShippingArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_cart()?;
    let subtotal = store.cart().subtotal();
    let policy = &ctx.config.pricing;
    let methods: Vec<_> = ctx
        .config
        .shipping_methods()
        .into_iter()
        .filter(|m| args.all || m.enabled)
        .collect();

    if ctx.output.is_json() {
        let rows: Vec<_> = methods
            .iter()
            .map(|m| json!({ "method": m, "effectivePrice": m.effective_price(subtotal, policy) }))
            .collect();
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header("Shipping methods");
    let widths = [12, 24, 10, 10, 18];
    ctx.output
        .table_row(&["ID", "NAME", "LISTED", "YOU PAY", "DELIVERY"], &widths);
    for method in &methods {
        let listed = ctx.money(method.price);
        let effective = method.effective_price(subtotal, policy);
        let pay = if method.enabled {
            ctx.money(effective)
        } else {
            "unavailable".to_string()
        };
        ctx.output.table_row(
            &[method.id.as_str(), &method.name, &listed, &pay, &method.eta_label],
            &widths,
        );
    }

    if let Some(remaining) = policy.remaining_for_free_shipping(subtotal) {
        ctx.output.info(&format!(
            "'{}' is free from {}; {} to go",
            policy.free_shipping_method,
            ctx.money(policy.free_shipping_threshold),
            ctx.money(remaining)
        ));
    }
    Ok(())
}

/// Run the payment command.
pub async fn payment(_args: PaymentArgs, ctx: &Context) -> Result<()> {
    let methods = ctx.config.payment_methods();

    if ctx.output.is_json() {
        ctx.output.json(&methods);
        return Ok(());
    }

    ctx.output.header("Payment methods");
    let widths = [16, 28, 18];
    ctx.output.table_row(&["ID", "NAME", "KIND"], &widths);
    for method in &methods {
        ctx.output.table_row(
            &[method.id.as_str(), &method.name, method.kind.display_name()],
            &widths,
        );
        if let Some(percent) = method.surcharge_percent {
            ctx.output.kv("      surcharge", &format!("{}%", percent));
        }
        if !method.description.is_empty() {
            ctx.output.kv("      ", &method.description);
        }
    }
    Ok(())
}
