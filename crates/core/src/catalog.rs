//! Product catalog.
//!
//! The catalog is seeded with the shop's launch stock and grows through the
//! admin form. Products are never edited or deleted once listed.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product listed in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Opaque image reference (usually a URL).
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Input for a product that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewProduct {
    pub title: String,
    pub price: Price,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Actions that change the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogAction {
    AddProduct(NewProduct),
}

/// Ordered, append-only list of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    /// Next numeric suffix for generated ids. Only ever grows.
    next_seq: u64,
}

impl Catalog {
    /// An empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            products: Vec::new(),
            next_seq: 1,
        }
    }

    /// The launch catalog.
    #[must_use]
    pub fn seeded() -> Self {
        let mut catalog = Self::new();
        for (title, dollars) in [
            ("90s Floral Midi Dress", 48),
            ("Leather Bomber Jacket", 95),
            ("Vintage Band Tee", 28),
            ("High-waist Mom Jeans", 40),
        ] {
            catalog.add_product(NewProduct {
                title: title.to_string(),
                price: Price::from_dollars(dollars),
                image: None,
                description: None,
            });
        }
        catalog
    }

    /// All products in listing order.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Number of listed products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products whose title contains `query`, ignoring case.
    ///
    /// An empty query matches everything. Listing order is preserved.
    pub fn filter<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Product> + use<'a> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(move |p| needle.is_empty() || p.title.to_lowercase().contains(&needle))
    }

    /// Append a product under a freshly assigned id and return a copy of it.
    pub fn add_product(&mut self, input: NewProduct) -> Product {
        let product = Product {
            id: self.next_id(),
            title: input.title,
            price: input.price,
            image: input.image,
            description: input.description,
        };
        self.products.push(product.clone());
        product
    }

    /// Apply an action in place.
    pub fn apply(&mut self, action: CatalogAction) {
        match action {
            CatalogAction::AddProduct(input) => {
                self.add_product(input);
            }
        }
    }

    /// Allocate `p<n>` ids from a counter that never goes backwards, skipping
    /// any id already taken.
    fn next_id(&mut self) -> ProductId {
        loop {
            let candidate = ProductId::new(format!("p{}", self.next_seq));
            self.next_seq += 1;
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure reducer: `(catalog, action) -> catalog'`.
#[must_use]
pub fn reduce(mut catalog: Catalog, action: CatalogAction) -> Catalog {
    catalog.apply(action);
    catalog
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn titles<'a>(products: impl Iterator<Item = &'a Product>) -> Vec<&'a str> {
        products.map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_seeded_catalog() {
        let catalog = Catalog::seeded();
        let ids: Vec<_> = catalog.list().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2", "p3", "p4"]);
        assert_eq!(
            catalog.get(&ProductId::new("p2")).unwrap().price,
            Price::from_dollars(95)
        );
    }

    #[test]
    fn test_filter_empty_returns_everything_in_order() {
        let catalog = Catalog::seeded();
        assert_eq!(titles(catalog.filter("")), titles(catalog.list().iter()));
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let catalog = Catalog::seeded();
        assert_eq!(titles(catalog.filter("dress")), ["90s Floral Midi Dress"]);
        assert_eq!(titles(catalog.filter("LEATHER")), ["Leather Bomber Jacket"]);
        assert_eq!(
            titles(catalog.filter("e")),
            [
                "90s Floral Midi Dress",
                "Leather Bomber Jacket",
                "Vintage Band Tee",
                "High-waist Mom Jeans",
            ]
        );
        assert_eq!(catalog.filter("sweater").count(), 0);
    }

    #[test]
    fn test_filter_does_not_mutate() {
        let catalog = Catalog::seeded();
        let before = catalog.clone();
        let _ = catalog.filter("tee").count();
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_add_product_assigns_unique_ids() {
        let mut catalog = Catalog::seeded();
        for i in 0..10 {
            catalog.add_product(NewProduct {
                title: format!("Item {i}"),
                ..NewProduct::default()
            });
        }

        let ids: HashSet<_> = catalog.list().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert_eq!(catalog.list()[4].id, ProductId::new("p5"));
    }

    #[test]
    fn test_reduce_appends() {
        let catalog = reduce(
            Catalog::seeded(),
            CatalogAction::AddProduct(NewProduct {
                title: "Corduroy Overalls".to_string(),
                price: Price::from_dollars(55),
                image: Some("https://img.example/overalls.jpg".to_string()),
                description: Some("Wide wale".to_string()),
            }),
        );

        let added = catalog.list().last().unwrap();
        assert_eq!(added.id, ProductId::new("p5"));
        assert_eq!(added.title, "Corduroy Overalls");
        assert_eq!(catalog.len(), 5);
    }
}
