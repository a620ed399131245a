use anyhow::Result;
use vitc_dose::core::markers::{GPX1, GSTM1, GSTT1, SLC23A1, SLC23A2};
use vitc_dose::core::PatientInput;
use vitc_dose::utils::validation::Validate;
use vitc_dose::{DosageError, LocalStorage, ReportService, TomlConfig};
use tempfile::TempDir;

fn scenario_input() -> PatientInput {
    PatientInput::new(35, 70.0)
        .with_genotype(SLC23A1, "TT")
        .with_genotype(SLC23A2, "GG")
        .with_genotype(GSTT1, "del/del")
        .with_genotype(GSTM1, "ins/ins")
        .with_genotype(GPX1, "TT")
}

/// Config file on disk, scores the patient and writes CSV + JSON next to it.
#[tokio::test]
async fn test_end_to_end_from_config_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("reports");
    let normalized_path = output_path.to_string_lossy().replace('\\', "/");

    let config_content = format!(
        r#"
[scoring]
base_dosage_mg = 2000.0

[export]
output_path = "{}"
formats = ["csv", "json"]
"#,
        normalized_path
    );
    let config_path = temp_dir.path().join("vitc.toml");
    tokio::fs::write(&config_path, config_content).await?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;

    let storage = LocalStorage::new(normalized_path.clone());
    let service = ReportService::new(storage, config);
    let outcome = service.run(&scenario_input()).await?;

    assert_eq!(outcome.result.dosage_mg, 3500.0);
    assert_eq!(
        outcome.written,
        vec![
            std::path::Path::new(&normalized_path).join("vitamin_c_result.csv"),
            std::path::Path::new(&normalized_path).join("vitamin_c_result.json"),
        ]
    );

    let csv = std::fs::read_to_string(output_path.join("vitamin_c_result.csv"))?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "SNP,Genotype,Effect,Description");
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[7], "Risk SNPs,,3,");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output_path.join("vitamin_c_result.json"))?)?;
    assert_eq!(json["result"]["dosage_mg"], 3500.0);
    assert_eq!(json["result"]["effects"][2]["marker_id"], GSTT1);

    Ok(())
}

#[tokio::test]
async fn test_bundle_written_to_disk() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let mut config = TomlConfig::default();
    config.export.output_path = output_path.clone();
    config.export.bundle = true;

    let service = ReportService::new(LocalStorage::new(output_path), config);
    let outcome = service.run(&scenario_input().with_stressed(true)).await?;

    // 3500 * 1.3
    assert_eq!(outcome.result.dosage_mg, 4550.0);

    let zip_path = temp_dir.path().join("vitamin_c_result.zip");
    assert!(zip_path.exists());
    let mut archive = zip::ZipArchive::new(std::fs::File::open(zip_path)?)?;
    assert_eq!(archive.len(), 1);
    assert_eq!(archive.by_index(0)?.name(), "vitamin_c_result.csv");

    Ok(())
}

#[tokio::test]
async fn test_configured_limits_reject_patient() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let mut config = TomlConfig::from_toml_str("[limits]\nmin_age = 18\n")?;
    config.export.output_path = output_path.clone();

    let service = ReportService::new(LocalStorage::new(output_path), config);
    let mut input = scenario_input();
    input.age = 16;

    let err = service.run(&input).await.unwrap_err();
    assert!(matches!(err, DosageError::OutOfRangeInput { .. }));
    assert!(!temp_dir.path().join("vitamin_c_result.csv").exists());

    Ok(())
}

#[tokio::test]
async fn test_repeated_format_in_config_file_is_rejected() -> Result<()> {
    let config = TomlConfig::from_toml_str(
        "[export]\nformats = [\"csv\", \"csv\"]\nbundle = true\n",
    )?;

    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        DosageError::InvalidConfigValueError { ref field, .. } if field == "export.formats"
    ));

    Ok(())
}
