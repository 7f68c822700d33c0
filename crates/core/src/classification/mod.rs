//! Classification module - maps security names to the asset taxonomy.

mod classification_constants;
mod classification_model;
mod classifier;
mod section_overrides;

#[cfg(test)]
mod classification_tests;

pub use classification_constants::asset_types;
pub use classification_model::{AssetCategory, Classification, ClassificationRule};
pub use classifier::classify;
pub use section_overrides::classify_holding;
