//! Product catalog store and batch selection
//!
//! The catalog is written once by the loader and read for every cycle
//! afterwards. Readers take cheap `Arc` snapshots, so a replacement is atomic
//! from their point of view.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Number of products shown per cycle
pub const BATCH_SIZE: usize = 1;

/// A hero product record as delivered by the catalog source
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Pre-formatted price, e.g. `"$42,000"`
    pub price: String,
    pub image_url: String,
    /// Optional pipe-delimited tags, e.g. `"AWD | Turbo | 2024"`
    #[serde(default)]
    pub meta: Option<String>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            image_url: image_url.into(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Trimmed, non-empty meta tags in order
    pub fn meta_tags(&self) -> Vec<&str> {
        self.meta
            .as_deref()
            .map(|meta| {
                meta.split('|')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Select the products for a cycle
///
/// Returns `min(BATCH_SIZE, products.len())` consecutive products starting at
/// `cycle_index * BATCH_SIZE`, wrapping around the catalog. An empty catalog
/// yields an empty batch.
pub fn get_batch(products: &[Product], cycle_index: u64) -> Vec<Product> {
    let len = products.len();
    if len == 0 {
        return Vec::new();
    }

    // u128 keeps `cycle_index * BATCH_SIZE` exact for any u64 index
    let start = ((cycle_index as u128 * BATCH_SIZE as u128) % len as u128) as usize;
    (0..BATCH_SIZE.min(len))
        .map(|offset| products[(start + offset) % len].clone())
        .collect()
}

/// Single-writer catalog store
#[derive(Debug)]
pub struct CatalogStore {
    products: RwLock<Arc<[Product]>>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::with_products(Vec::new())
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products.into()),
        }
    }

    /// Replace the whole catalog
    pub fn replace(&self, products: Vec<Product>) {
        let products: Arc<[Product]> = products.into();
        match self.products.write() {
            Ok(mut guard) => *guard = products,
            Err(poisoned) => *poisoned.into_inner() = products,
        }
    }

    /// Current catalog contents
    pub fn snapshot(&self) -> Arc<[Product]> {
        match self.products.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Batch for a cycle index, see [`get_batch`]
    pub fn batch(&self, cycle_index: u64) -> Vec<Product> {
        get_batch(&self.snapshot(), cycle_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| Product::new(format!("Car {i}"), format!("${i}0,000"), format!("/{i}.png")))
            .collect()
    }

    #[test]
    fn test_batch_wraps_around() {
        for n in [1usize, 2, 5] {
            let products = catalog(n);
            let n64 = n as u64;
            for i in [0, 1, n64 - 1, n64, n64 + 7] {
                let batch = get_batch(&products, i);
                assert_eq!(batch.len(), 1, "n={n} i={i}");
                assert_eq!(batch[0], products[(i % n64) as usize], "n={n} i={i}");
            }
        }
    }

    #[test]
    fn test_empty_catalog_yields_empty_batch() {
        assert!(get_batch(&[], 0).is_empty());
        assert!(get_batch(&[], u64::MAX).is_empty());
    }

    #[test]
    fn test_huge_cycle_index() {
        let products = catalog(3);
        let batch = get_batch(&products, u64::MAX);
        assert_eq!(batch[0], products[(u64::MAX % 3) as usize]);
    }

    #[test]
    fn test_meta_tags() {
        let product = Product::new("A", "$1", "/a.png").with_meta("AWD | Turbo | 2024");
        assert_eq!(product.meta_tags(), vec!["AWD", "Turbo", "2024"]);

        assert!(Product::new("A", "$1", "/a.png").meta_tags().is_empty());
        assert!(Product::new("A", "$1", "/a.png")
            .with_meta("")
            .meta_tags()
            .is_empty());
        assert_eq!(
            Product::new("A", "$1", "/a.png")
                .with_meta("AWD||  |500mi")
                .meta_tags(),
            vec!["AWD", "500mi"]
        );
    }

    #[test]
    fn test_store_replace() {
        let store = CatalogStore::new();
        assert!(store.is_empty());
        assert!(store.batch(0).is_empty());

        let before = store.snapshot();
        store.replace(catalog(2));

        assert_eq!(store.len(), 2);
        assert!(before.is_empty());
        assert_eq!(store.batch(3)[0].name, "Car 1");
    }

    #[test]
    fn test_product_deserialize_without_meta() {
        let product: Product = serde_json::from_str(
            r#"{"name":"Model X","price":"$79,990","image_url":"/x.png"}"#,
        )
        .unwrap();
        assert_eq!(product.meta, None);
    }
}
