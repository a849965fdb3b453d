//! # MenuWise Procurement Core
//!
//! In-memory procurement management: suppliers, ingredients, price lists,
//! recipe costing, CSV price-list import, and an AI-assisted recipe filler
//! backed by a generative completion service. All state lives in process
//! memory and resets on restart.

pub mod costing;
pub mod filter;
pub mod import;
pub mod model;
pub mod recipe_ai;
pub mod stats;
pub mod store;
