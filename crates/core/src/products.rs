//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Catalog product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Catalog product, as served by the products endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub product_id: ProductId,

    /// Display name
    pub product_name: String,

    /// Comma-separated image file names
    #[serde(default)]
    pub images: String,
}

impl Product {
    /// Create a product.
    pub fn new(
        product_id: impl Into<ProductId>,
        product_name: impl Into<String>,
        images: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            images: images.into(),
        }
    }

    /// Iterate over the image file names, skipping blanks.
    pub fn image_names(&self) -> impl Iterator<Item = &str> {
        self.images
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// The first entry of the image list, trimmed. A blank head stays blank.
    #[must_use]
    pub fn first_image(&self) -> &str {
        self.images.split(',').next().map(str::trim).unwrap_or_default()
    }
}
