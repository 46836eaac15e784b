//! Core business logic: cost derivation, modifier tallies and change detection

pub mod aggregate;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod ledger;
pub mod log;
pub mod modifier;
pub mod power;

// Re-export main types for cleaner imports
pub use aggregate::{CostAggregator, Priced, aggregate};
pub use cache::{ChangeDetectingCache, KeyValueCollection, Store, has_changed};
pub use modifier::{Modifier, ModifierError, ModifierTally, RadioGroup, TallyResult, Toggle};
pub use power::{CastSummary, PowerCast, PowerError};
