//! # Recipe Cost Calculator
//!
//! Linear recipe costing against the current price lists. Each recipe row
//! takes the first price-list item found for its ingredient (store order, not
//! lowest price), normalizes INR to approximate USD at a fixed rate, and
//! scales price-per-pack down to price-per-unit.
//!
//! Units of measure are not converted; a recipe quantity in kg against a
//! price quoted per lb still computes, just with mismatched units.

use crate::model::{PriceListItem, RecipeRow};
use crate::store::EntityStore;

/// Fixed INR→USD conversion divisor used for estimation.
pub const INR_PER_USD: f64 = 83.0;

/// Price of one pack normalized to USD-equivalent units.
pub fn normalized_pack_price(item: &PriceListItem) -> f64 {
    if item.currency == "INR" {
        item.price / INR_PER_USD
    } else {
        item.price
    }
}

/// Cost of a single unit out of the pack, in USD-equivalent units.
pub fn unit_cost(item: &PriceListItem) -> f64 {
    normalized_pack_price(item) / item.pack_size
}

/// Cost of one recipe row.
///
/// Zero when the row has no ingredient selected or when no price-list item
/// quotes the ingredient.
pub fn row_cost(store: &EntityStore, row: &RecipeRow) -> f64 {
    if !row.is_selected() {
        return 0.0;
    }
    match store.first_price_for_ingredient(&row.ingredient_id) {
        Some(item) => unit_cost(item) * row.qty,
        None => 0.0,
    }
}

/// Total estimated cost of a recipe: the sum of its row costs.
pub fn total_cost(store: &EntityStore, rows: &[RecipeRow]) -> f64 {
    rows.iter().map(|row| row_cost(store, row)).sum()
}
