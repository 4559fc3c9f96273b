//! Storefront console - loads a catalog, searches it and prices a sample cart.

use anyhow::{Context, Result};
use storefront_engine::{Catalog, Session, SessionObserver, Storefront, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env()?;
    let Some(path) = config.catalog_path.clone() else {
        tracing::warn!("STOREFRONT_CATALOG is not set; nothing to load");
        return Ok(());
    };
    let payload = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let catalog = Catalog::from_json(&payload)?;
    tracing::info!(products = catalog.len(), categories = catalog.categories().len(), "catalog loaded");

    let query = config.search_query.clone().unwrap_or_default();
    let session = SessionObserver::fixed(Some(Session::new("console").with_display_name("Console")));
    let mut store = Storefront::new(catalog, session, config);

    let hits: Vec<_> = store.search(&query).iter().map(|p| p.id).collect();
    println!("{} product(s) match {:?}", hits.len(), query);
    for id in &hits {
        let product = store.product(*id)?;
        println!("  #{:<4} {:<50} {:>10}  [{}]", product.id.to_string(), product.title, product.price.to_string(), product.category);
    }

    for id in hits.iter().take(3) {
        store.add_to_cart(*id)?;
    }
    let quote = store.quote();
    println!();
    println!("Sample cart ({} line(s))", quote.item_count);
    println!("  Subtotal  {:>10}", quote.subtotal.to_string());
    println!("  Shipping  {:>10}", if quote.qualifies_for_free_shipping() { "FREE".to_string() } else { quote.shipping.to_string() });
    println!("  Tax       {:>10}", quote.tax.to_string());
    println!("  Total     {:>10}", quote.total.to_string());
    if !quote.qualifies_for_free_shipping() {
        println!("  Add {} more for free shipping", quote.amount_to_free_shipping());
    }
    Ok(())
}
