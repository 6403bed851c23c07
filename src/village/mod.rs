pub mod catalog;
pub mod fixture;
pub mod model;

pub use model::{Dimension, IndicatorCode, ModelError, Status, VillageId, VillageRecord};
