//! Admin form draft.
//!
//! The draft mirrors the admin form field for field, holding raw text until
//! submit. Submitting coerces the price, appends the product to the catalog,
//! and resets the draft. A draft that fails validation is left untouched so
//! the form can be shown again with the visitor's input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, NewProduct, Product};
use crate::types::{Price, PriceError};

/// Reasons a draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Price must be a number, got '{0}'")]
    InvalidPrice(String),

    #[error("Price cannot be negative")]
    NegativePrice,

    #[error("Price is too large")]
    PriceTooLarge,
}

impl From<PriceError> for DraftError {
    fn from(err: PriceError) -> Self {
        match err {
            PriceError::Invalid(input) => Self::InvalidPrice(input),
            PriceError::Negative => Self::NegativePrice,
            PriceError::TooLarge => Self::PriceTooLarge,
        }
    }
}

/// Pending product as typed into the admin form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    pub title: String,
    pub price: String,
    pub description: String,
    /// Image reference, usually a URL.
    pub image: String,
}

impl ProductDraft {
    /// Convert the draft into catalog input without consuming it.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if the price is not a non-negative number.
    pub fn validate(&self) -> Result<NewProduct, DraftError> {
        let price = Price::parse(&self.price)?;
        Ok(NewProduct {
            title: self.title.trim().to_string(),
            price,
            image: non_blank(&self.image),
            description: non_blank(&self.description),
        })
    }

    /// Append the draft to `catalog` and reset it to empty.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] and leaves both the draft and the catalog
    /// unchanged if validation fails.
    pub fn submit(&mut self, catalog: &mut Catalog) -> Result<Product, DraftError> {
        let input = self.validate()?;
        let product = catalog.add_product(input);
        *self = Self::default();
        Ok(product)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(title: &str, price: &str) -> ProductDraft {
        ProductDraft {
            title: title.to_string(),
            price: price.to_string(),
            ..ProductDraft::default()
        }
    }

    #[test]
    fn test_submit_appends_and_resets() {
        let mut catalog = Catalog::seeded();
        let mut form = ProductDraft {
            title: "Suede Fringe Vest".to_string(),
            price: "62.50".to_string(),
            description: "  Soft and worn in  ".to_string(),
            image: String::new(),
        };

        let product = form.submit(&mut catalog).unwrap();

        assert_eq!(product.id.as_str(), "p5");
        assert_eq!(product.price.to_string(), "$62.50");
        assert_eq!(product.description.as_deref(), Some("Soft and worn in"));
        assert_eq!(product.image, None);
        assert_eq!(form, ProductDraft::default());
        assert_eq!(catalog.list().last(), Some(&product));
    }

    #[test]
    fn test_submit_rejects_non_numeric_price() {
        let mut catalog = Catalog::seeded();
        let mut form = draft("Mystery Box", "twenty");

        let err = form.submit(&mut catalog).unwrap_err();

        assert_eq!(err, DraftError::InvalidPrice("twenty".to_string()));
        assert_eq!(form.title, "Mystery Box");
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_submit_rejects_negative_price() {
        let mut catalog = Catalog::seeded();
        let mut form = draft("Refund Hat", "-4");
        assert_eq!(form.submit(&mut catalog), Err(DraftError::NegativePrice));
    }

    #[test]
    fn test_submit_rejects_price_too_large_to_charge() {
        let mut catalog = Catalog::seeded();
        let mut form = draft("Gold Watch", "100000000000000000000");

        assert_eq!(form.submit(&mut catalog), Err(DraftError::PriceTooLarge));
        assert_eq!(form.price, "100000000000000000000");
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_blank_price_is_invalid() {
        assert!(matches!(
            draft("Scarf", "").validate(),
            Err(DraftError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_two_submits_get_distinct_ids() {
        let mut catalog = Catalog::seeded();
        let a = draft("Scarf", "12").submit(&mut catalog).unwrap();
        let b = draft("Scarf", "12").submit(&mut catalog).unwrap();
        assert_ne!(a.id, b.id);
    }
}
