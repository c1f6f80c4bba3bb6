//! Cart commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use serde_json::json;
use velo_commerce::cart::{Cart, OrderSummary, QuantityChange, Variation};
use velo_commerce::catalog::Product;
use velo_commerce::ids::LineId;

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(CartCommand::Show { shipping: None }) {
        CartCommand::Add {
            product_id,
            color,
            size,
            qty,
        } => add(product_id, color.as_deref(), size.as_deref(), qty, ctx),
        CartCommand::Update { line_id, quantity } => update(&line_id, quantity, ctx),
        CartCommand::Remove { line_id } => remove(&line_id, ctx),
        CartCommand::Clear { yes } => clear(yes, ctx),
        CartCommand::Show { shipping } => show(shipping.as_deref(), ctx),
    }
}

fn add(product_id: u64, color: Option<&str>, size: Option<&str>, qty: i64, ctx: &Context) -> Result<()> {
    let product = ctx
        .find_product(product_id)
        .with_context(|| format!("Unknown product id: {}", product_id))?;
    let variation = Variation::new(
        pick_option("color", &product.colors, color)?.as_deref(),
        pick_option("size", &product.sizes, size)?.as_deref(),
    );

    let mut store = ctx.open_cart()?;
    let change = store.add_item(product.candidate(variation, qty));

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "change": change, "cart": store.cart() }));
        return Ok(());
    }

    report_change(&product, &change, ctx);
    ctx.output.kv("Items in cart", &store.cart().grand_quantity().to_string());
    ctx.output.kv("Subtotal", &ctx.money(store.cart().subtotal()));
    Ok(())
}

fn report_change(product: &Product, change: &QuantityChange, ctx: &Context) {
    if qty_was_ignored(change) {
        ctx.output.warn("Nothing added: quantity must be at least 1");
    } else if !product.in_stock() {
        ctx.output.warn(&format!("{} is out of stock; cart unchanged", product.name));
    } else if change.was_clamped() {
        ctx.output.warn(&format!(
            "Only {} of {} available; cart holds {}",
            product.stock, product.name, change.applied
        ));
    } else {
        ctx.output.success(&format!(
            "Added {} x {} ({})",
            change.applied - change.previous,
            product.name,
            change.line_id
        ));
    }
}

fn qty_was_ignored(change: &QuantityChange) -> bool {
    change.requested <= change.previous
}

/// Match a requested variation value against what the product offers.
///
/// Products without choices for `what` take no value. Matching ignores case
/// and returns the catalog spelling.
fn pick_option(what: &str, offered: &[String], requested: Option<&str>) -> Result<Option<String>> {
    let requested = requested.map(str::trim).filter(|r| !r.is_empty());
    match (offered.is_empty(), requested) {
        (true, None) => Ok(None),
        (true, Some(value)) => bail!("This product has no {} choices (got '{}')", what, value),
        (false, None) => bail!("Pick a {}: {}", what, offered.join(", ")),
        (false, Some(value)) => offered
            .iter()
            .find(|o| o.eq_ignore_ascii_case(value))
            .cloned()
            .map(Some)
            .with_context(|| format!("Unknown {} '{}'; choose from {}", what, value, offered.join(", "))),
    }
}

fn update(line_id: &str, quantity: i64, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_cart()?;
    let change = store
        .update_quantity(&LineId::new(line_id), quantity)
        .with_context(|| format!("No line '{}' in the cart", line_id))?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "change": change, "cart": store.cart() }));
        return Ok(());
    }

    if change.applied == 0 {
        ctx.output.success(&format!("Removed {}", line_id));
    } else if change.was_clamped() {
        ctx.output.warn(&format!(
            "Requested {} but only {} available",
            change.requested, change.applied
        ));
    } else {
        ctx.output.success(&format!("{} now has {}", line_id, change.applied));
    }
    Ok(())
}

fn remove(line_id: &str, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_cart()?;
    if !store.remove_item(&LineId::new(line_id)) {
        ctx.output.warn(&format!("No line '{}' in the cart", line_id));
        return Ok(());
    }
    ctx.output.success(&format!("Removed {}", line_id));
    Ok(())
}

fn clear(yes: bool, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_cart()?;
    if store.cart().is_empty() {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} items from the cart?", store.cart().grand_quantity()))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Cart left as it was");
            return Ok(());
        }
    }

    store.clear();
    ctx.output.success("Cart emptied");
    Ok(())
}

fn show(shipping: Option<&str>, ctx: &Context) -> Result<()> {
    let store = ctx.open_cart()?;
    let mut session = ctx.checkout_session();
    if let Some(id) = shipping {
        session.select_shipping_method(id)?;
    }
    let summary = session.summary(store.cart());

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "cart": store.cart(), "summary": summary }));
        return Ok(());
    }

    ctx.output.header("Cart");
    if store.cart().is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }
    print_cart(store.cart(), ctx);
    print_summary(&summary, ctx);

    if let Some(remaining) = session.policy().remaining_for_free_shipping(store.cart().subtotal()) {
        ctx.output.info(&format!(
            "Add {} more for free shipping with '{}'",
            ctx.money(remaining),
            session.policy().free_shipping_method
        ));
    }
    Ok(())
}

/// Print cart lines as a table.
pub fn print_cart(cart: &Cart, ctx: &Context) {
    let widths = [16, 30, 4, 10, 10];
    ctx.output
        .table_row(&["LINE", "ITEM", "QTY", "UNIT", "TOTAL"], &widths);
    for line in cart.lines() {
        let qty = line.quantity.to_string();
        let unit = ctx.money(line.unit_price);
        let total = ctx.money(line.total());
        ctx.output.table_row(
            &[line.line_id.as_str(), &line.display_name(), &qty, &unit, &total],
            &widths,
        );
    }
}

/// Print an order summary.
pub fn print_summary(summary: &OrderSummary, ctx: &Context) {
    ctx.output.info("");
    ctx.output.kv("Subtotal", &ctx.money(summary.subtotal()));
    let shipping = if summary.has_free_shipping() {
        "free".to_string()
    } else {
        ctx.money(summary.shipping_cost())
    };
    ctx.output.kv("Shipping", &shipping);
    ctx.output.kv("Tax", &ctx.money(summary.tax()));
    if !summary.discount().is_zero() {
        ctx.output.kv("Discount", &ctx.money(summary.discount()));
    }
    ctx.output.kv("Total", &ctx.money(summary.grand_total()));
}
