//! Cache keys derived from catalog query shapes

use std::fmt;

/// Query shapes whose results are cached
///
/// Each shape maps to exactly one key, so readers and invalidating writers
/// always agree on where a snapshot lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogQuery {
    /// The full, unfiltered product list
    AllProducts,
}

impl CatalogQuery {
    /// Returns the cache key for this query shape
    pub fn cache_key(&self) -> &'static str {
        match self {
            Self::AllProducts => "products:all",
        }
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_products_key() {
        assert_eq!(CatalogQuery::AllProducts.cache_key(), "products:all");
        assert_eq!(CatalogQuery::AllProducts.to_string(), "products:all");
    }
}
