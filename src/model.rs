//! # Procurement Data Model
//!
//! This module defines the core entities tracked by MenuWise: suppliers,
//! ingredients, and the price-list items that tie one supplier's quote to one
//! ingredient. All three are append-only; records are created by manual entry,
//! CSV import, or seed generation and never updated or deleted in place.
//!
//! ## Core Concepts
//!
//! - **Supplier**: a vendor identified by name and a country code
//! - **Ingredient**: a purchasable item identified by SKU
//! - **PriceListItem**: one supplier's quoted price for one ingredient at a
//!   given pack size, unit of measure, and effective date
//! - **RecipeRow**: one line of a recipe being costed (ingredient + quantity)

use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered ingredient supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique identifier (e.g., "sup_1", "sup_new_x7k2p9q4m")
    pub id: String,

    /// Display name, unique case-insensitively within the store
    pub name: String,

    /// ISO-ish three-letter country code (e.g., "USA", "IND")
    pub country: String,
}

/// A purchasable ingredient tracked in the master list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier (e.g., "ing_3", "ing_new_q1w2e3r4t")
    pub id: String,

    /// Display name
    pub name: String,

    /// Stock-keeping unit code, unique case-insensitively within the store
    pub sku: String,
}

/// One supplier's quoted price for one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceListItem {
    /// Unique identifier (e.g., "pli_12", "pli_new_a9s8d7f6g")
    pub id: String,

    /// Id of the quoting supplier; a dangling reference degrades to fallback
    /// display text rather than failing
    pub supplier_id: String,

    /// Id of the quoted ingredient; same dangling-reference rule
    pub ingredient_id: String,

    /// Quoted price for one pack, non-negative
    pub price: f64,

    /// Currency code ("USD", "INR", ...)
    pub currency: String,

    /// Number of units per pack
    pub pack_size: f64,

    /// Unit of measure the pack is counted in (kg, L, lb, oz, ...)
    pub uom: String,

    /// ISO date string (YYYY-MM-DD); compared lexicographically
    pub effective_date: String,
}

/// One line of a recipe being costed.
///
/// An empty `ingredient_id` represents a row where no ingredient has been
/// selected yet; such rows cost zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRow {
    /// Id of the selected ingredient, or empty when unselected
    pub ingredient_id: String,

    /// Quantity of the ingredient in pack units
    pub qty: f64,
}

impl Supplier {
    /// Create a supplier with an explicit id.
    pub fn new(id: &str, name: &str, country: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            country: country.to_string(),
        }
    }
}

impl Ingredient {
    /// Create an ingredient with an explicit id.
    pub fn new(id: &str, name: &str, sku: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sku: sku.to_string(),
        }
    }
}

impl RecipeRow {
    /// Create a recipe row for the given ingredient and quantity.
    pub fn new(ingredient_id: &str, qty: f64) -> Self {
        Self {
            ingredient_id: ingredient_id.to_string(),
            qty,
        }
    }

    /// An empty row with no ingredient selected and quantity 1.
    pub fn unselected() -> Self {
        Self {
            ingredient_id: String::new(),
            qty: 1.0,
        }
    }

    /// Whether an ingredient has been selected for this row.
    pub fn is_selected(&self) -> bool {
        !self.ingredient_id.is_empty()
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.country)
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.sku)
    }
}

impl fmt::Display for PriceListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2} for {} {} (effective {})",
            self.currency, self.price, self.pack_size, self.uom, self.effective_date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_row_selection() {
        let empty = RecipeRow::unselected();
        assert!(!empty.is_selected());
        assert_eq!(empty.qty, 1.0);

        let row = RecipeRow::new("ing_1", 2.5);
        assert!(row.is_selected());
        assert_eq!(row.qty, 2.5);
    }

    #[test]
    fn test_display_formatting() {
        let supplier = Supplier::new("sup_1", "Acme Foods", "USA");
        assert_eq!(format!("{}", supplier), "Acme Foods (USA)");

        let ingredient = Ingredient::new("ing_1", "Tomato", "TOM-001");
        assert_eq!(format!("{}", ingredient), "Tomato [TOM-001]");

        let item = PriceListItem {
            id: "pli_1".to_string(),
            supplier_id: "sup_1".to_string(),
            ingredient_id: "ing_1".to_string(),
            price: 4.5,
            currency: "USD".to_string(),
            pack_size: 5.0,
            uom: "kg".to_string(),
            effective_date: "2025-01-15".to_string(),
        };
        let display = format!("{}", item);
        assert!(display.contains("USD 4.50"));
        assert!(display.contains("5 kg"));
        assert!(display.contains("2025-01-15"));
    }
}
