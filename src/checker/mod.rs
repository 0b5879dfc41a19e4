use std::sync::Arc;

use tracing::info;

use crate::catalog::Catalog;
use crate::models::ProductRecord;

/// Read-only availability queries over a loaded catalog.
///
/// Cloning shares the same snapshot; there is no lock because nothing
/// writes to the catalog after startup.
#[derive(Debug, Clone)]
pub struct AvailabilityChecker {
    catalog: Arc<Catalog>,
}

impl AvailabilityChecker {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// `true` iff some record's id equals `product_id` exactly.
    /// No trimming or case folding; an empty id is never available.
    pub fn is_available(&self, product_id: &str) -> bool {
        let available = self.catalog.contains(product_id);
        info!(product_id, available, "Validated product");
        available
    }

    /// Identifiers in load order, duplicates included.
    pub fn list_available(&self) -> Vec<String> {
        self.catalog.ids().map(str::to_owned).collect()
    }

    /// Full records in load order.
    pub fn list_records(&self) -> Vec<ProductRecord> {
        self.catalog.records().to_vec()
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }
}
