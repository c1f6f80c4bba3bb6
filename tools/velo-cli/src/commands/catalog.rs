//! List the product catalog.

use anyhow::Result;

use super::CatalogArgs;
use crate::context::Context;
use crate::output::stock_badge;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let products: Vec<_> = ctx
        .config
        .products()
        .into_iter()
        .filter(|p| !args.in_stock || p.in_stock())
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header("Catalog");
    if products.is_empty() {
        ctx.output.info("No products");
        return Ok(());
    }

    let widths = [4, 30, 9, 10, 14];
    ctx.output
        .table_row(&["ID", "NAME", "KIND", "PRICE", "STOCK"], &widths);
    for product in &products {
        let id = product.id.to_string();
        let price = ctx.money(product.unit_price);
        let stock = stock_badge(product.stock);
        ctx.output.table_row(
            &[&id, &product.name, product.kind.as_str(), &price, &stock],
            &widths,
        );
        if !product.colors.is_empty() {
            ctx.output.kv("      colors", &product.colors.join(", "));
        }
        if !product.sizes.is_empty() {
            ctx.output.kv("      sizes", &product.sizes.join(", "));
        }
    }

    Ok(())
}
