//! # Entity Store
//!
//! In-memory collections of suppliers, ingredients, and price-list items.
//! This is the only mutable state in the system, and the only mutations are
//! appends: a manual supplier add or a committed import batch. Nothing is
//! updated or deleted, and everything resets on process restart.
//!
//! Lookups by id never fail; callers that render entities use the
//! `*_display_name` helpers, which degrade dangling references to placeholder
//! text ("Unknown", "N/A") instead of raising an error.

use crate::import::ImportBatch;
use crate::model::{Ingredient, PriceListItem, Supplier};
use chrono::{Duration, Utc};
use log::info;
use rand::{distributions::Alphanumeric, Rng};
use std::collections::HashSet;

/// Seed suppliers available in every fresh store.
const SEED_SUPPLIERS: &[(&str, &str, &str)] = &[
    ("sup_1", "Acme Foods", "USA"),
    ("sup_2", "FreshCo", "USA"),
    ("sup_3", "Mumbai Spices Ltd", "IND"),
    ("sup_4", "Global Grains", "CAN"),
    ("sup_5", "Pacific Seafoods", "USA"),
];

/// Seed ingredient master list.
const SEED_INGREDIENTS: &[(&str, &str, &str)] = &[
    ("ing_1", "Tomato", "TOM-001"),
    ("ing_2", "Garlic", "GAR-010"),
    ("ing_3", "Basmati Rice", "RIC-500"),
    ("ing_4", "Olive Oil", "OIL-EXT"),
    ("ing_5", "Chicken Breast", "CHK-BRS"),
    ("ing_6", "Cumin Seeds", "SP-CUM"),
    ("ing_7", "Red Onion", "VEG-ONI"),
    ("ing_8", "Heavy Cream", "DAIRY-HC"),
    ("ing_9", "Large Eggs", "DAIRY-EGG-12"),
    ("ing_10", "Salted Butter", "DAIRY-BUT-500"),
    ("ing_11", "Cheddar Cheese", "DAIRY-CH-BLK"),
    ("ing_12", "Spinach", "VEG-SPIN"),
];

/// Units of measure used for generated seed prices.
const SEED_UOMS: &[&str] = &["kg", "L", "lb", "oz"];

/// Aggregate counts for one supplier's price-list footprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierStats {
    /// Number of price-list items quoted by the supplier
    pub price_count: usize,
    /// Number of distinct ingredients the supplier quotes
    pub unique_ingredients: usize,
}

/// The process-wide entity collections.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub suppliers: Vec<Supplier>,
    pub ingredients: Vec<Ingredient>,
    pub items: Vec<PriceListItem>,
}

/// Today's date as an ISO `YYYY-MM-DD` string.
pub fn today_iso() -> String {
    Utc::now().date_naive().to_string()
}

/// Generate a nine-character lowercase alphanumeric id suffix.
fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Fresh id for a supplier created outside the seed set.
pub fn new_supplier_id() -> String {
    format!("sup_new_{}", random_suffix())
}

/// Fresh id for an ingredient created outside the seed set.
pub fn new_ingredient_id() -> String {
    format!("ing_new_{}", random_suffix())
}

/// Fresh id for an imported price-list item.
pub fn new_price_item_id() -> String {
    format!("pli_new_{}", random_suffix())
}

impl EntityStore {
    /// An empty store with no entities at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with the fixed supplier and ingredient seed sets
    /// but no price-list items.
    pub fn seeded() -> Self {
        let suppliers = SEED_SUPPLIERS
            .iter()
            .map(|(id, name, country)| Supplier::new(id, name, country))
            .collect();
        let ingredients = SEED_INGREDIENTS
            .iter()
            .map(|(id, name, sku)| Ingredient::new(id, name, sku))
            .collect();
        Self {
            suppliers,
            ingredients,
            items: Vec::new(),
        }
    }

    /// A seeded store with `count` randomly generated price-list items.
    ///
    /// Prices for IND suppliers are denominated in INR at roughly 83x the
    /// USD base, pack sizes run 1..=10, and effective dates fall within
    /// thirty days of today in either direction.
    pub fn seeded_with_prices(count: usize) -> Self {
        let mut store = Self::seeded();
        let mut rng = rand::thread_rng();
        let today = Utc::now().date_naive();

        for i in 0..count {
            let supplier = &store.suppliers[rng.gen_range(0..store.suppliers.len())];
            let ingredient = &store.ingredients[rng.gen_range(0..store.ingredients.len())];

            let currency = if supplier.country == "IND" { "INR" } else { "USD" };
            let price_base: f64 = rng.gen_range(1.0..51.0);
            let price = if currency == "INR" {
                price_base * 83.0
            } else {
                price_base
            };

            let date = today + Duration::days(rng.gen_range(-30..30));

            let item = PriceListItem {
                id: format!("pli_{}", i),
                supplier_id: supplier.id.clone(),
                ingredient_id: ingredient.id.clone(),
                price: (price * 100.0).round() / 100.0,
                currency: currency.to_string(),
                pack_size: rng.gen_range(1..=10) as f64,
                uom: SEED_UOMS[rng.gen_range(0..SEED_UOMS.len())].to_string(),
                effective_date: date.to_string(),
            };
            store.items.push(item);
        }

        info!(
            "Seeded store with {} suppliers, {} ingredients, {} price items",
            store.suppliers.len(),
            store.ingredients.len(),
            store.items.len()
        );

        store
    }

    /// Find a supplier by case-insensitive name match.
    pub fn find_supplier_by_name(&self, name: &str) -> Option<&Supplier> {
        self.suppliers
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Find an ingredient by case-insensitive SKU match.
    pub fn find_ingredient_by_sku(&self, sku: &str) -> Option<&Ingredient> {
        self.ingredients
            .iter()
            .find(|i| i.sku.eq_ignore_ascii_case(sku))
    }

    /// Find an ingredient by case-insensitive name match.
    pub fn find_ingredient_by_name(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name))
    }

    /// Look up a supplier by id.
    pub fn supplier_by_id(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    /// Look up an ingredient by id.
    pub fn ingredient_by_id(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == id)
    }

    /// Supplier name for display; dangling ids render as "Unknown".
    pub fn supplier_display_name(&self, id: &str) -> &str {
        self.supplier_by_id(id).map(|s| s.name.as_str()).unwrap_or("Unknown")
    }

    /// Supplier country for display; dangling ids render as "N/A".
    pub fn supplier_display_country(&self, id: &str) -> &str {
        self.supplier_by_id(id)
            .map(|s| s.country.as_str())
            .unwrap_or("N/A")
    }

    /// Ingredient name for display; dangling ids render as "Unknown Item".
    pub fn ingredient_display_name(&self, id: &str) -> &str {
        self.ingredient_by_id(id)
            .map(|i| i.name.as_str())
            .unwrap_or("Unknown Item")
    }

    /// Ingredient SKU for display; dangling ids render as "N/A".
    pub fn ingredient_display_sku(&self, id: &str) -> &str {
        self.ingredient_by_id(id).map(|i| i.sku.as_str()).unwrap_or("N/A")
    }

    /// First price-list item quoting the given ingredient, if any.
    ///
    /// "First" is store order; committed imports sit ahead of older items,
    /// so recently imported prices win this lookup.
    pub fn first_price_for_ingredient(&self, ingredient_id: &str) -> Option<&PriceListItem> {
        self.items.iter().find(|i| i.ingredient_id == ingredient_id)
    }

    /// Manually register a new supplier. Returns the generated id, or `None`
    /// when the name is empty (the add form rejects empty names).
    pub fn add_supplier(&mut self, name: &str, country: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        let id = new_supplier_id();
        info!("Adding supplier '{}' ({}) with id {}", name, country, id);
        self.suppliers.push(Supplier::new(&id, name, country));
        Some(id)
    }

    /// Merge an import batch into the store in a single commit.
    ///
    /// New suppliers and ingredients append to their collections; new price
    /// items are inserted ahead of existing ones so that the freshest import
    /// is found first by `first_price_for_ingredient`.
    pub fn commit(&mut self, batch: ImportBatch) {
        info!(
            "Committing import batch: {} price items, {} new suppliers, {} new ingredients",
            batch.items.len(),
            batch.suppliers.len(),
            batch.ingredients.len()
        );
        self.suppliers.extend(batch.suppliers);
        self.ingredients.extend(batch.ingredients);
        let mut merged = batch.items;
        merged.append(&mut self.items);
        self.items = merged;
    }

    /// Price-list footprint for one supplier.
    pub fn supplier_stats(&self, supplier_id: &str) -> SupplierStats {
        let supplier_items: Vec<&PriceListItem> = self
            .items
            .iter()
            .filter(|i| i.supplier_id == supplier_id)
            .collect();
        let unique: HashSet<&str> = supplier_items
            .iter()
            .map(|i| i.ingredient_id.as_str())
            .collect();
        SupplierStats {
            price_count: supplier_items.len(),
            unique_ingredients: unique.len(),
        }
    }

    /// Number of price points quoting the given ingredient.
    pub fn price_count_for_ingredient(&self, ingredient_id: &str) -> usize {
        self.items
            .iter()
            .filter(|i| i.ingredient_id == ingredient_id)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_store_contents() {
        let store = EntityStore::seeded();
        assert_eq!(store.suppliers.len(), 5);
        assert_eq!(store.ingredients.len(), 12);
        assert!(store.items.is_empty());
    }

    #[test]
    fn test_seeded_prices_respect_country_currency() {
        let store = EntityStore::seeded_with_prices(150);
        assert_eq!(store.items.len(), 150);

        for item in &store.items {
            let supplier = store.supplier_by_id(&item.supplier_id).unwrap();
            let expected = if supplier.country == "IND" { "INR" } else { "USD" };
            assert_eq!(item.currency, expected);
            assert!(item.price >= 0.0);
            assert!(item.pack_size >= 1.0 && item.pack_size <= 10.0);
        }
    }

    #[test]
    fn test_case_insensitive_lookups() {
        let store = EntityStore::seeded();
        assert!(store.find_supplier_by_name("acme foods").is_some());
        assert!(store.find_supplier_by_name("ACME FOODS").is_some());
        assert!(store.find_supplier_by_name("Acme").is_none());

        assert!(store.find_ingredient_by_sku("tom-001").is_some());
        assert!(store.find_ingredient_by_name("tomato").is_some());
    }

    #[test]
    fn test_display_fallbacks_for_dangling_ids() {
        let store = EntityStore::seeded();
        assert_eq!(store.supplier_display_name("sup_404"), "Unknown");
        assert_eq!(store.supplier_display_country("sup_404"), "N/A");
        assert_eq!(store.ingredient_display_name("ing_404"), "Unknown Item");
        assert_eq!(store.ingredient_display_sku("ing_404"), "N/A");

        assert_eq!(store.supplier_display_name("sup_1"), "Acme Foods");
        assert_eq!(store.ingredient_display_sku("ing_1"), "TOM-001");
    }

    #[test]
    fn test_add_supplier_rejects_empty_name() {
        let mut store = EntityStore::new();
        assert!(store.add_supplier("", "USA").is_none());
        assert!(store.suppliers.is_empty());

        let id = store.add_supplier("Global Foods Inc.", "GBR").unwrap();
        assert!(id.starts_with("sup_new_"));
        assert_eq!(store.suppliers.len(), 1);
        assert_eq!(store.suppliers[0].country, "GBR");
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = new_supplier_id();
        let b = new_supplier_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), "sup_new_".len() + 9);
    }

    #[test]
    fn test_supplier_stats_counts_unique_ingredients() {
        let mut store = EntityStore::seeded();
        for (n, ing) in ["ing_1", "ing_1", "ing_2"].iter().enumerate() {
            store.items.push(PriceListItem {
                id: format!("pli_{}", n),
                supplier_id: "sup_1".to_string(),
                ingredient_id: ing.to_string(),
                price: 1.0,
                currency: "USD".to_string(),
                pack_size: 1.0,
                uom: "kg".to_string(),
                effective_date: "2025-01-01".to_string(),
            });
        }

        let stats = store.supplier_stats("sup_1");
        assert_eq!(stats.price_count, 3);
        assert_eq!(stats.unique_ingredients, 2);
        assert_eq!(store.price_count_for_ingredient("ing_1"), 2);
    }
}
