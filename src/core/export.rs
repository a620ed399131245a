use crate::core::chart::ChartSeries;
use crate::domain::model::{PatientInput, ScoreResult};
use crate::utils::error::{DosageError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const CSV_FILE_NAME: &str = "vitamin_c_result.csv";
pub const CSV_MIME_TYPE: &str = "text/csv";
pub const JSON_FILE_NAME: &str = "vitamin_c_result.json";
pub const JSON_MIME_TYPE: &str = "application/json";
pub const BUNDLE_FILE_NAME: &str = "vitamin_c_result.zip";
pub const BUNDLE_MIME_TYPE: &str = "application/zip";

pub const TOTAL_PRS_ROW: &str = "Total PRS";
pub const RISK_SNPS_ROW: &str = "Risk SNPs";
pub const DOSE_ROW: &str = "Recommended dose (mg/day)";
pub const DOSE_ANNOTATION: &str = "Adjusted for genetics, weight and conditions";

#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "SNP")]
    pub snp: String,
    #[serde(rename = "Genotype")]
    pub genotype: String,
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(rename = "Description")]
    pub description: String,
}

impl ExportRow {
    fn summary(label: &str, value: String, note: &str) -> Self {
        Self {
            snp: label.to_string(),
            genotype: String::new(),
            effect: value,
            description: note.to_string(),
        }
    }
}

/// Per-marker rows followed by the total PRS, risk count and dose rows.
pub fn export_rows(result: &ScoreResult) -> Vec<ExportRow> {
    let mut rows: Vec<ExportRow> = result
        .effects
        .iter()
        .map(|effect| ExportRow {
            snp: effect.marker_id.clone(),
            genotype: effect.genotype.clone(),
            effect: format!("{:.2}", effect.rounded_effect),
            description: effect.description.clone(),
        })
        .collect();

    rows.push(ExportRow::summary(
        TOTAL_PRS_ROW,
        format!("{:.2}", result.prs_display()),
        result.interpretation.label(),
    ));
    rows.push(ExportRow::summary(
        RISK_SNPS_ROW,
        result.risk_count.to_string(),
        "",
    ));
    rows.push(ExportRow::summary(
        DOSE_ROW,
        format!("{:.2}", result.dosage_mg),
        DOSE_ANNOTATION,
    ));
    rows
}

pub fn to_csv(result: &ScoreResult) -> Result<ExportArtifact> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in export_rows(result) {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| DosageError::IoError(e.into_error()))?;

    Ok(ExportArtifact {
        file_name: CSV_FILE_NAME.to_string(),
        mime_type: CSV_MIME_TYPE,
        bytes,
    })
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    patient: &'a PatientInput,
    prs_display: f64,
    result: &'a ScoreResult,
    chart: ChartSeries,
}

pub fn to_json(
    input: &PatientInput,
    result: &ScoreResult,
    generated_at: DateTime<Utc>,
) -> Result<ExportArtifact> {
    let report = JsonReport {
        generated_at,
        patient: input,
        prs_display: result.prs_display(),
        result,
        chart: ChartSeries::from_result(result),
    };
    let bytes = serde_json::to_vec_pretty(&report)?;

    Ok(ExportArtifact {
        file_name: JSON_FILE_NAME.to_string(),
        mime_type: JSON_MIME_TYPE,
        bytes,
    })
}

/// Packs several artifacts into a single ZIP archive.
pub fn bundle(artifacts: &[ExportArtifact]) -> Result<ExportArtifact> {
    tracing::debug!("Creating ZIP bundle with {} files", artifacts.len());

    let bytes = {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for artifact in artifacts {
            zip.start_file::<_, ()>(artifact.file_name.as_str(), FileOptions::default())?;
            zip.write_all(&artifact.bytes)?;
        }
        let cursor = zip.finish()?;
        cursor.into_inner()
    };

    Ok(ExportArtifact {
        file_name: BUNDLE_FILE_NAME.to_string(),
        mime_type: BUNDLE_MIME_TYPE,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::DosageEngine;
    use crate::core::markers::{GPX1, GSTM1, GSTT1, SLC23A1, SLC23A2};
    use chrono::TimeZone;

    fn scenario() -> (PatientInput, ScoreResult) {
        let input = PatientInput::new(35, 70.0)
            .with_genotype(SLC23A1, "TT")
            .with_genotype(SLC23A2, "GG")
            .with_genotype(GSTT1, "del/del")
            .with_genotype(GSTM1, "ins/ins")
            .with_genotype(GPX1, "TT");
        let result = DosageEngine::default().run(&input).unwrap();
        (input, result)
    }

    #[test]
    fn test_export_rows_layout() {
        let (_, result) = scenario();
        let rows = export_rows(&result);

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].snp, SLC23A1);
        assert_eq!(rows[0].effect, "-0.80");
        assert_eq!(rows[1].effect, "0.00");
        assert_eq!(rows[5].snp, TOTAL_PRS_ROW);
        assert_eq!(rows[5].effect, "-2.20");
        assert_eq!(rows[5].description, "Low expected response");
        assert_eq!(rows[6].effect, "3");
        assert_eq!(rows[7].effect, "3500.00");
        assert_eq!(rows[7].description, DOSE_ANNOTATION);
    }

    #[test]
    fn test_csv_output() {
        let (_, result) = scenario();
        let artifact = to_csv(&result).unwrap();
        assert_eq!(artifact.file_name, CSV_FILE_NAME);
        assert_eq!(artifact.mime_type, "text/csv");

        let text = String::from_utf8(artifact.bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "SNP,Genotype,Effect,Description");
        assert_eq!(lines[1], "SLC23A1_rs33972313,TT,-0.80,↓ vitamin C transport");
        assert_eq!(lines[3], "GSTT1_null_variant,del/del,-1.00,↓ antioxidant defense");
        assert_eq!(lines[6], "Total PRS,,-2.20,Low expected response");
        assert_eq!(lines[7], "Risk SNPs,,3,");
        assert_eq!(
            lines[8],
            "Recommended dose (mg/day),,3500.00,\"Adjusted for genetics, weight and conditions\""
        );
    }

    #[test]
    fn test_json_report() {
        let (input, result) = scenario();
        let when = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let artifact = to_json(&input, &result, when).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(value["prs_display"], -2.2);
        assert_eq!(value["result"]["risk_count"], 3);
        assert_eq!(value["result"]["interpretation"], "Low expected response");
        assert_eq!(value["patient"]["age"], 35);
        assert_eq!(value["chart"]["bars"].as_array().unwrap().len(), 5);
        assert!(value["generated_at"].as_str().unwrap().starts_with("2026-10-18T09:30:00"));
    }

    #[test]
    fn test_bundle_contains_artifacts() {
        let (input, result) = scenario();
        let csv = to_csv(&result).unwrap();
        let json = to_json(&input, &result, Utc::now()).unwrap();

        let archive_bytes = bundle(&[csv.clone(), json]).unwrap();
        assert_eq!(archive_bytes.file_name, BUNDLE_FILE_NAME);

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(archive_bytes.bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut file_names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        file_names.sort();
        assert_eq!(file_names, vec![CSV_FILE_NAME, JSON_FILE_NAME]);

        let csv_read = {
            let mut file = archive.by_name(CSV_FILE_NAME).unwrap();
            let mut content = Vec::new();
            std::io::Read::read_to_end(&mut file, &mut content).unwrap();
            content
        };
        assert_eq!(csv_read, csv.bytes);
    }
}
