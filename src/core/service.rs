use crate::core::engine::DosageEngine;
use crate::core::export::{self, ExportArtifact};
use crate::core::{ConfigProvider, ExportFormat, PatientInput, ScoreResult, Storage};
use crate::utils::error::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub result: ScoreResult,
    pub written: Vec<PathBuf>,
}

/// Validates patient input, scores it and writes the configured exports.
pub struct ReportService<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    engine: DosageEngine,
}

impl<S: Storage, C: ConfigProvider> ReportService<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let engine = DosageEngine::new(config.markers().to_vec(), config.scoring().clone());
        Self {
            storage,
            config,
            engine,
        }
    }

    pub fn evaluate(&self, input: &PatientInput) -> Result<ScoreResult> {
        input.validate_limits(self.config.limits())?;
        let result = self.engine.run(input)?;

        tracing::debug!(
            "PRS {:.4} ({}), {} risk markers, {} mg/day",
            result.prs_score,
            result.interpretation,
            result.risk_count,
            result.dosage_mg
        );
        Ok(result)
    }

    /// One artifact per distinct format, in configured order.
    fn artifacts(&self, input: &PatientInput, result: &ScoreResult) -> Result<Vec<ExportArtifact>> {
        let generated_at = Utc::now();
        let mut formats: Vec<ExportFormat> = Vec::new();
        for format in self.config.output_formats() {
            if formats.contains(format) {
                tracing::warn!("Export format {} listed twice, writing it once", format.as_str());
            } else {
                formats.push(*format);
            }
        }

        formats
            .into_iter()
            .map(|format| match format {
                ExportFormat::Csv => export::to_csv(result),
                ExportFormat::Json => export::to_json(input, result, generated_at),
            })
            .collect()
    }

    /// Writes the exports and returns their paths under the output directory.
    pub async fn export(&self, input: &PatientInput, result: &ScoreResult) -> Result<Vec<PathBuf>> {
        let mut artifacts = self.artifacts(input, result)?;
        if artifacts.is_empty() {
            tracing::warn!("No export formats configured, nothing written");
            return Ok(Vec::new());
        }

        if self.config.bundle() {
            artifacts = vec![export::bundle(&artifacts)?];
        }

        let output_dir = Path::new(self.config.output_path());
        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in &artifacts {
            tracing::debug!(
                "Writing {} ({}, {} bytes)",
                artifact.file_name,
                artifact.mime_type,
                artifact.bytes.len()
            );
            self.storage
                .write_file(&artifact.file_name, &artifact.bytes)
                .await?;
            written.push(output_dir.join(&artifact.file_name));
        }
        Ok(written)
    }

    pub async fn run(&self, input: &PatientInput) -> Result<ReportOutcome> {
        tracing::info!("Scoring {} markers", self.engine.markers().len());
        let result = self.evaluate(input)?;
        let written = self.export(input, &result).await?;
        tracing::info!("Exported {} file(s)", written.len());
        Ok(ReportOutcome { result, written })
    }
}
