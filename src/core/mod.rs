pub mod chart;
pub mod engine;
pub mod export;
pub mod markers;
pub mod service;

pub use crate::domain::model::{
    DosageConfig, InputLimits, Interpretation, MarkerDefinition, MarkerEffect, PatientInput,
    ScoreResult,
};
pub use crate::domain::ports::{ConfigProvider, ExportFormat, Storage};
pub use crate::utils::error::Result;
