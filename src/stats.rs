//! # Dashboard Summary
//!
//! Headline numbers for the procurement dashboard: entity counts, total and
//! average price-list value normalized to USD, and the most recently added
//! suppliers.

use crate::costing::INR_PER_USD;
use crate::model::Supplier;
use crate::store::EntityStore;
use std::fmt;

/// Aggregate figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub supplier_count: usize,
    pub ingredient_count: usize,
    pub price_record_count: usize,
    /// Sum of all quoted pack prices, non-USD divided by the INR rate
    pub total_value_usd: f64,
    /// Mean quoted pack price in USD-equivalent units
    pub avg_price_usd: f64,
}

/// Compute the dashboard figures over the whole store.
///
/// Any currency other than USD is treated as INR for the estimate, matching
/// the dashboard's rough normalization (costing proper only converts INR).
pub fn dashboard_stats(store: &EntityStore) -> DashboardStats {
    let total_value_usd: f64 = store
        .items
        .iter()
        .map(|item| {
            if item.currency == "USD" {
                item.price
            } else {
                item.price / INR_PER_USD
            }
        })
        .sum();
    let avg_price_usd = if store.items.is_empty() {
        0.0
    } else {
        total_value_usd / store.items.len() as f64
    };

    DashboardStats {
        supplier_count: store.suppliers.len(),
        ingredient_count: store.ingredients.len(),
        price_record_count: store.items.len(),
        total_value_usd,
        avg_price_usd,
    }
}

/// The last `n` suppliers added to the store, newest first.
pub fn recent_suppliers(store: &EntityStore, n: usize) -> Vec<&Supplier> {
    store.suppliers.iter().rev().take(n).collect()
}

impl fmt::Display for DashboardStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Suppliers:      {}", self.supplier_count)?;
        writeln!(f, "Ingredients:    {}", self.ingredient_count)?;
        writeln!(f, "Price records:  {}", self.price_record_count)?;
        writeln!(f, "Total value:    ${:.2}", self.total_value_usd)?;
        write!(f, "Avg item price: ${:.2}", self.avg_price_usd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PriceListItem;

    fn item(id: &str, price: f64, currency: &str) -> PriceListItem {
        PriceListItem {
            id: id.to_string(),
            supplier_id: "sup_1".to_string(),
            ingredient_id: "ing_1".to_string(),
            price,
            currency: currency.to_string(),
            pack_size: 1.0,
            uom: "kg".to_string(),
            effective_date: "2025-01-01".to_string(),
        }
    }

    #[test]
    fn test_empty_store_stats() {
        let stats = dashboard_stats(&EntityStore::new());
        assert_eq!(stats.price_record_count, 0);
        assert_eq!(stats.total_value_usd, 0.0);
        assert_eq!(stats.avg_price_usd, 0.0);
    }

    #[test]
    fn test_value_normalization() {
        let mut store = EntityStore::seeded();
        store.items.push(item("pli_1", 10.0, "USD"));
        store.items.push(item("pli_2", 83.0, "INR"));

        let stats = dashboard_stats(&store);
        assert_eq!(stats.price_record_count, 2);
        assert!((stats.total_value_usd - 11.0).abs() < 1e-9);
        assert!((stats.avg_price_usd - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_recent_suppliers_newest_first() {
        let mut store = EntityStore::seeded();
        store.add_supplier("Fresh Arrival", "GBR").unwrap();

        let recent = recent_suppliers(&store, 3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].name, "Fresh Arrival");
        assert_eq!(recent[1].id, "sup_5");
    }
}
