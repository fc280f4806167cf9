use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{DiaryError, Result};
use crate::models::{KnownProduct, Macro, MacroProfile};

pub const NAME_COL: &str = "назва";
pub const WEIGHT_COL: &str = "вага";

/// Products in the order their rows appear in the source file.
#[derive(Debug, Clone, Default)]
pub struct KnownProductTable {
    products: Vec<KnownProduct>,
}

impl KnownProductTable {
    pub fn new(products: Vec<KnownProduct>) -> Self {
        Self { products }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownProduct> {
        self.products.iter()
    }

    /// First product, in table order, whose name contains `query` ignoring case.
    pub fn find_first_containing(&self, query: &str) -> Option<&KnownProduct> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .find(|product| product.name.to_lowercase().contains(&needle))
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        .ok_or_else(|| DiaryError::MissingColumn(name.to_string()))
}

/// Loads the known-product table from a CSV file with a `назва` column, the five macro columns
/// and an optional `вага` column.
pub fn load_known_products(csv_path: &Path) -> Result<KnownProductTable> {
    let file = std::fs::File::open(csv_path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = rdr.headers()?.clone();
    let name_idx = column_index(&headers, NAME_COL)?;
    let mut macro_idx = [0usize; 5];
    for (slot, nutrient) in macro_idx.iter_mut().zip(Macro::ALL) {
        *slot = column_index(&headers, nutrient.label())?;
    }
    let weight_idx = column_index(&headers, WEIGHT_COL).ok();
    if weight_idx.is_none() {
        debug!("Column '{}' absent, no canonical weights", WEIGHT_COL);
    }

    let mut products = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result?;
        let row = row_index + 1;

        let name = record.get(name_idx).unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }

        let mut values = [0.0f64; 5];
        for ((value, &idx), nutrient) in values.iter_mut().zip(&macro_idx).zip(Macro::ALL) {
            let cell = record.get(idx).unwrap_or("");
            *value = parse_number(cell)
                .filter(|v| *v >= 0.0)
                .ok_or_else(|| DiaryError::InvalidValue {
                    row,
                    column: nutrient.label().to_string(),
                    value: cell.to_string(),
                })?;
        }

        let weight_g = match weight_idx.and_then(|idx| record.get(idx)).map(str::trim) {
            None | Some("") => None,
            Some(cell) => match parse_number(cell) {
                Some(w) if w > 0.0 => Some(w),
                _ => {
                    warn!(row, product = %name, value = cell, "Ignoring unusable weight cell");
                    None
                }
            },
        };

        let [calories, fat, carbohydrate, sugar, protein] = values;
        products.push(KnownProduct {
            name,
            profile: MacroProfile {
                calories,
                fat,
                carbohydrate,
                sugar,
                protein,
            },
            weight_g,
        });
    }

    if products.is_empty() {
        warn!(path = %csv_path.display(), "Product table is empty, every entry goes to the oracle");
    }

    Ok(KnownProductTable::new(products))
}
