//! Entity value generators.
//!
//! Each submodule produces a pool of `EntityRecord`s for one entity type,
//! ready for weight expansion and composition. All sampling draws from the
//! single run-wide seeded generator so a run is reproducible end to end.

pub mod date;
pub mod money;
pub mod numbers;
pub mod percent;
pub mod person;
pub mod quantity;

pub use date::{generate_date_pool, DateFormat};
pub use money::{generate_money_pool, CurrencySpec, Placement};
pub use numbers::number_words;
pub use percent::generate_percent_pool;
pub use person::{generate_person_pool, NameEntry, NamePool};
pub use quantity::{generate_quantity_pool, UnitSpec};
