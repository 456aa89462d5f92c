//! Product browsing commands.

use green_papaya_core::ProductId;
use green_papaya_storefront::api::types::Product;

use super::{CliError, bootstrap};

/// List all published products.
pub async fn list() -> Result<(), CliError> {
    let app = bootstrap()?;

    let products = app.api.get_published_products().await?;
    if products.is_empty() {
        println!("no published products");
        return Ok(());
    }

    for product in &products {
        print_summary(product);
    }
    println!("{} product(s)", products.len());

    Ok(())
}

/// Show a single product by ID.
pub async fn show(id: &str) -> Result<(), CliError> {
    let app = bootstrap()?;

    let product = app.api.get_product(&ProductId::new(id)).await?;

    println!("{}  [{}]", product.name, product.id);
    println!("  price:    {}", product.price);
    println!("  category: {}", product.category);
    println!("  stock:    {} ({})", product.quantity, product.stock_status());
    if !product.colors.is_empty() {
        println!("  colors:   {}", product.colors.join(", "));
    }
    if !product.sizes.is_empty() {
        println!("  sizes:    {}", product.sizes.join(", "));
    }
    if let Some(shop) = &product.shop {
        println!("  shop:     {} <{}>", shop.name, shop.email);
    }
    if !product.description.is_empty() {
        println!("\n{}", product.description);
    }

    Ok(())
}

/// Search products by category.
pub async fn search(category: &str) -> Result<(), CliError> {
    let app = bootstrap()?;

    let products = app.api.search_products(category).await?;
    if products.is_empty() {
        println!("no products in category {category}");
        return Ok(());
    }

    for product in &products {
        print_summary(product);
    }

    Ok(())
}

fn print_summary(product: &Product) {
    println!(
        "{:<24}  {:>10}  {:<12}  {}",
        truncate(&product.name, 24),
        product.price.to_string(),
        product.stock_status().to_string(),
        product.id
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}\u{2026}")
    }
}
