pub mod config;
pub mod error;
pub mod types;

pub use config::{ConstructExtents, ConstructionRules};
pub use error::{Result, ShipwrightError};
pub use types::{BoundingBox, Cell};
