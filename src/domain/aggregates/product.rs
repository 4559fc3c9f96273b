//! Product record as supplied by the catalog feed

use serde::{Deserialize, Serialize};
use crate::domain::value_objects::{Money, ProductId};

/// Read-only catalog entry. Cart and wishlist keep clones of it as snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Money,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: Rating,
}

/// Review score in `0..=5`; out-of-range feed values are rejected on decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRating")]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

#[derive(Deserialize)]
struct RawRating {
    rate: f64,
    count: u32,
}

impl TryFrom<RawRating> for Rating {
    type Error = String;
    fn try_from(raw: RawRating) -> Result<Self, Self::Error> {
        if !(0.0..=5.0).contains(&raw.rate) {
            return Err(format!("rating {} is outside 0..=5", raw.rate));
        }
        Ok(Rating { rate: raw.rate, count: raw.count })
    }
}

impl Product {
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, price: Money, category: impl Into<String>) -> Self {
        Self {
            id: id.into(), title: title.into(), price, category: category.into(),
            image: String::new(), description: String::new(), rating: Rating::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self { self.description = description.into(); self }
    pub fn with_image(mut self, image: impl Into<String>) -> Self { self.image = image.into(); self }
    pub fn with_rating(mut self, rate: f64, count: u32) -> Self { self.rating = Rating { rate: rate.clamp(0.0, 5.0), count }; self }
}
