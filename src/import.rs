//! # CSV Price-List Importer
//!
//! Parses uploaded comma-separated text into append batches of suppliers,
//! ingredients, and price-list items. Column positions are discovered by
//! case-insensitive substring match against fixed header fragments, so
//! "Supplier Name", "supplier" and "SUPPLIER CODE" all bind the supplier
//! column.
//!
//! ## Row rules
//!
//! - blank rows are skipped
//! - rows missing a supplier name, SKU, or price are skipped
//! - suppliers resolve by case-insensitive name against the store and the
//!   current batch; ingredients resolve the same way by SKU
//! - country defaults to "USA"; currency, when the CSV omits it, is INR for
//!   IND suppliers and USD otherwise; pack size defaults to 1, unit of
//!   measure to "unit", effective date to today
//!
//! There is no quoted-field escaping and no per-row diagnostics; a malformed
//! price parses to zero silently.

use crate::model::{Ingredient, PriceListItem, Supplier};
use crate::store::{
    new_ingredient_id, new_price_item_id, new_supplier_id, today_iso, EntityStore,
};
use log::{debug, info};
use std::fmt;

/// Canonical CSV template offered for download: header plus two example rows.
pub const CSV_TEMPLATE_HEADER: &str =
    "Supplier Name,SKU,Item Name,Pack Size,UOM,Price,Currency,Effective Date,Country Code (Optional)";

const CSV_TEMPLATE_ROWS: &[&str] = &[
    "Mumbai Spices Ltd,SP-TUR,Turmeric Powder,1,kg,250,,2025-02-01,IND",
    "Acme Foods,VEG-CAR,Carrots,5,kg,4.50,USD,2025-01-15,USA",
];

/// The full CSV import template as one string.
pub fn csv_template() -> String {
    let mut lines = vec![CSV_TEMPLATE_HEADER];
    lines.extend_from_slice(CSV_TEMPLATE_ROWS);
    lines.join("\n")
}

/// Append batches produced by one CSV parse, merged into the store in a
/// single [`EntityStore::commit`].
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    /// Suppliers first seen in this CSV
    pub suppliers: Vec<Supplier>,
    /// Ingredients first seen in this CSV
    pub ingredients: Vec<Ingredient>,
    /// All imported price-list items
    pub items: Vec<PriceListItem>,
    /// Non-blank data rows encountered
    pub data_rows: usize,
    /// Rows dropped for missing supplier name, SKU, or price
    pub skipped_rows: usize,
}

/// Summary counts surfaced to the user after an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub new_suppliers: usize,
    pub new_ingredients: usize,
    pub skipped: usize,
}

impl ImportBatch {
    /// Summarize this batch for the post-import notice.
    pub fn report(&self) -> ImportReport {
        ImportReport {
            imported: self.items.len(),
            new_suppliers: self.suppliers.len(),
            new_ingredients: self.ingredients.len(),
            skipped: self.skipped_rows,
        }
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imported {} prices. Added {} new suppliers and {} new ingredients.",
            self.imported, self.new_suppliers, self.new_ingredients
        )
    }
}

/// Pick a field out of a data row by header fragment.
///
/// The first header containing `fragment` wins; a row shorter than the header
/// yields an empty field.
fn field<'a>(headers: &[String], row: &[&'a str], fragment: &str) -> &'a str {
    headers
        .iter()
        .position(|h| h.contains(fragment))
        .and_then(|idx| row.get(idx))
        .map(|v| v.trim())
        .unwrap_or("")
}

/// Parse raw CSV text into an import batch against the current store.
///
/// The store is only consulted for de-duplication; nothing is mutated here.
/// Input with fewer than two lines (no header or no data) produces an empty
/// batch.
pub fn parse_price_list_csv(text: &str, store: &EntityStore) -> ImportBatch {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut batch = ImportBatch::default();

    if lines.len() < 2 {
        return batch;
    }

    let headers: Vec<String> = lines[0]
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();
    debug!("Import headers: {:?}", headers);

    for line in &lines[1..] {
        if line.trim().is_empty() {
            continue;
        }
        batch.data_rows += 1;
        let row: Vec<&str> = line.split(',').collect();

        let sup_name = field(&headers, &row, "supplier");
        let sku = field(&headers, &row, "sku");
        let ing_name = field(&headers, &row, "item name");
        let price_str = field(&headers, &row, "price");
        let currency = field(&headers, &row, "currency");
        let date = field(&headers, &row, "date");
        let country = field(&headers, &row, "country");

        if sup_name.is_empty() || sku.is_empty() || price_str.is_empty() {
            debug!("Skipping row missing supplier, SKU, or price: '{}'", line);
            batch.skipped_rows += 1;
            continue;
        }

        let (supplier_id, supplier_country) = match store
            .find_supplier_by_name(sup_name)
            .or_else(|| {
                batch
                    .suppliers
                    .iter()
                    .find(|s| s.name.eq_ignore_ascii_case(sup_name))
            }) {
            Some(existing) => (existing.id.clone(), existing.country.clone()),
            None => {
                let country_code = if country.is_empty() { "USA" } else { country };
                let supplier = Supplier {
                    id: new_supplier_id(),
                    name: sup_name.to_string(),
                    country: country_code.to_uppercase(),
                };
                let resolved = (supplier.id.clone(), supplier.country.clone());
                batch.suppliers.push(supplier);
                resolved
            }
        };

        let ingredient_id = match store.find_ingredient_by_sku(sku).or_else(|| {
            batch
                .ingredients
                .iter()
                .find(|i| i.sku.eq_ignore_ascii_case(sku))
        }) {
            Some(existing) => existing.id.clone(),
            None => {
                let name = if ing_name.is_empty() { sku } else { ing_name };
                let ingredient = Ingredient {
                    id: new_ingredient_id(),
                    name: name.to_string(),
                    sku: sku.to_string(),
                };
                let id = ingredient.id.clone();
                batch.ingredients.push(ingredient);
                id
            }
        };

        let currency = if currency.is_empty() {
            let inferred = if supplier_country == "IND" { "INR" } else { "USD" };
            inferred.to_string()
        } else {
            currency.to_string()
        };

        let pack_size = field(&headers, &row, "pack")
            .parse::<f64>()
            .ok()
            .filter(|p| *p > 0.0)
            .unwrap_or(1.0);
        let uom = field(&headers, &row, "uom");

        batch.items.push(PriceListItem {
            id: new_price_item_id(),
            supplier_id,
            ingredient_id,
            price: price_str.parse::<f64>().unwrap_or(0.0),
            currency,
            pack_size,
            uom: if uom.is_empty() { "unit" } else { uom }.to_string(),
            effective_date: if date.is_empty() {
                today_iso()
            } else {
                date.to_string()
            },
        });
    }

    info!(
        "Parsed CSV: {} data rows, {} imported, {} skipped, {} new suppliers, {} new ingredients",
        batch.data_rows,
        batch.items.len(),
        batch.skipped_rows,
        batch.suppliers.len(),
        batch.ingredients.len()
    );

    batch
}
