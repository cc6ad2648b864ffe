//! Static Schema Catalogue
//!
//! Maps every fixed test database identifier to its complete schema text.
//! Built once from a resource source and read-only afterwards.

mod ids;
mod store;

pub use ids::*;
pub use store::StaticCatalogue;
