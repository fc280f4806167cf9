use tracing::{debug, info, warn};

use crate::models::ResolvedRecord;
use crate::oracle::NutritionOracle;
use crate::parser::split_simple_entry;
use crate::products::KnownProductTable;

pub const DEFAULT_WEIGHT_G: f64 = 100.0;

/// Resolves product names against the known-product table, falling back to the oracle.
pub struct ProductResolver<'a> {
    table: &'a KnownProductTable,
    oracle: &'a dyn NutritionOracle,
}

impl<'a> ProductResolver<'a> {
    pub fn new(table: &'a KnownProductTable, oracle: &'a dyn NutritionOracle) -> Self {
        Self { table, oracle }
    }

    /// Looks up `name` and decides the effective weight.
    ///
    /// A table hit uses the product's canonical weight, then `input_weight`, then 100 g. A miss
    /// asks the oracle on every call and uses `input_weight` or 100 g. A zero `input_weight`
    /// counts as no weight. Oracle failures resolve to `None`.
    pub async fn resolve(&self, name: &str, input_weight: Option<f64>) -> Option<ResolvedRecord> {
        let name = name.trim().to_lowercase();
        let input_weight = input_weight.filter(|w| *w > 0.0);

        if let Some(product) = self.table.find_first_containing(&name) {
            info!(query = %name, product = %product.name, "Found in product table");
            let weight_g = product
                .weight_g
                .or(input_weight)
                .unwrap_or(DEFAULT_WEIGHT_G);
            return Some(ResolvedRecord {
                name: product.name.clone(),
                profile: product.profile,
                weight_g,
            });
        }

        match self.oracle.lookup(&name).await {
            Ok(Some(profile)) => Some(ResolvedRecord {
                weight_g: input_weight.unwrap_or(DEFAULT_WEIGHT_G),
                name,
                profile,
            }),
            Ok(None) => {
                debug!(query = %name, "Oracle had no answer");
                None
            }
            Err(e) => {
                warn!(query = %name, error = %e, "Oracle lookup failed");
                None
            }
        }
    }

    /// Handles a line without inline nutrition numbers: `<name> [weight]`.
    pub async fn parse_simple_entry(&self, line: &str) -> Option<ResolvedRecord> {
        let (name, weight_g) = split_simple_entry(line)?;
        self.resolve(&name, weight_g).await
    }
}
