//! Fitroom Core - shared domain types, configuration, error taxonomy.

pub mod config;
pub mod error;
pub mod types;

pub use config::{FitroomConfig, Pricing};
pub use error::{Error, Result};
pub use types::{
    Attachment, BudgetCheck, CostEstimate, FormTryOn, GarmentType, ImageSource, JsonTryOn,
    TryOnImage, TryOnInput, TryOnRequest,
};
