//! Catalog product record.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product as delivered by the catalog source.
///
/// Products are immutable once loaded. Ids are expected to be unique across
/// the catalog; nothing here enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog-wide unique id.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Category label, matched exactly when filtering.
    pub category: String,
    /// Image filename, if the product has one.
    ///
    /// Catalog files mark a missing image with `false`; `null`, an empty
    /// string or an absent key mean the same thing.
    #[serde(default, deserialize_with = "deserialize_image")]
    pub image: Option<String>,
}

impl Product {
    /// Create a product without an image.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Price,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category: category.into(),
            image: None,
        }
    }

    /// Attach an image filename.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Whether the name contains `needle`, ignoring case.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn name_contains_lowercase(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImageRef {
    Name(String),
    Flag(bool),
}

fn deserialize_image<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<ImageRef>::deserialize(deserializer)? {
        Some(ImageRef::Name(name)) if !name.is_empty() => Ok(Some(name)),
        Some(ImageRef::Flag(true)) => Err(serde::de::Error::custom(
            "image must be a filename or false",
        )),
        _ => Ok(None),
    }
}
