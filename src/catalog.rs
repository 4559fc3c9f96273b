//! Read-only catalog accessor.
//!
//! Products arrive from an external fetch; the engine only looks them up and
//! filters them. Fetch failures surface once as
//! [`CatalogError::ProductUnavailable`] and are never retried here.

use std::collections::HashMap;
use thiserror::Error;
use crate::domain::aggregates::Product;
use crate::domain::value_objects::ProductId;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product {id} is unavailable")]
    ProductUnavailable { id: ProductId },
    #[error("catalog listing is unavailable: {0}")]
    ListingUnavailable(String),
    #[error("catalog payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Later duplicates of an id are dropped.
    pub fn new(products: Vec<Product>) -> Self {
        let mut index = HashMap::with_capacity(products.len());
        let mut kept = Vec::with_capacity(products.len());
        for product in products {
            if index.contains_key(&product.id) { continue; }
            index.insert(product.id, kept.len());
            kept.push(product);
        }
        Self { products: kept, index }
    }

    pub fn from_json(payload: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(payload)?;
        Ok(Self::new(products))
    }

    /// Wraps the outcome of an external bulk fetch.
    pub fn from_fetch<E: std::fmt::Display>(fetched: Result<Vec<Product>, E>) -> Result<Self, CatalogError> {
        fetched.map(Self::new).map_err(|e| CatalogError::ListingUnavailable(e.to_string()))
    }

    /// Lifts the outcome of an external single-product fetch keyed by `id`.
    pub fn fetched_product<E>(id: ProductId, fetched: Result<Option<Product>, E>) -> Result<Product, CatalogError> {
        fetched.ok().flatten().ok_or(CatalogError::ProductUnavailable { id })
    }

    pub fn products(&self) -> &[Product] { &self.products }
    pub fn len(&self) -> usize { self.products.len() }
    pub fn is_empty(&self) -> bool { self.products.is_empty() }

    pub fn get(&self, id: ProductId) -> Option<&Product> { self.index.get(&id).map(|&i| &self.products[i]) }

    pub fn product(&self, id: ProductId) -> Result<&Product, CatalogError> {
        self.get(id).ok_or(CatalogError::ProductUnavailable { id })
    }

    /// Matching products in catalog order.
    pub fn search(&self, query: &str) -> impl Iterator<Item = &Product> + '_ {
        let needle = query.trim().to_lowercase();
        self.products.iter().filter(move |p| matches_needle(p, &needle))
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for p in &self.products {
            if !seen.contains(&p.category.as_str()) { seen.push(&p.category); }
        }
        seen
    }
}

/// Case-insensitive substring match on title or category; a blank query
/// matches everything.
pub fn matches_query(product: &Product, query: &str) -> bool {
    matches_needle(product, &query.trim().to_lowercase())
}

fn matches_needle(product: &Product, needle: &str) -> bool {
    needle.is_empty()
        || product.title.to_lowercase().contains(needle)
        || product.category.to_lowercase().contains(needle)
}
