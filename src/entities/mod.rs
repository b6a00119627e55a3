//! Database entities for the meal-order ledger and its reference catalogs.
//!
//! The reference tables (clients, dictionaries, per-client overlays, contracts,
//! kitchen assignment periods) are maintained by external back-office tooling
//! and are read-only from this service's point of view. The only table this
//! service writes is `meal_entries`, and only the four decision columns of it.

pub mod client;
pub mod client_department;
pub mod client_diet;
pub mod client_meal_type;
pub mod contract;
pub mod department;
pub mod diet;
pub mod kitchen;
pub mod kitchen_period;
pub mod meal_entry;
pub mod meal_type;
pub mod user;
