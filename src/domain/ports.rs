use crate::domain::model::{DosageConfig, InputLimits, MarkerDefinition};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        file_name: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn scoring(&self) -> &DosageConfig;
    fn markers(&self) -> &[MarkerDefinition];
    fn limits(&self) -> &InputLimits;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[ExportFormat];
    fn bundle(&self) -> bool;
}
