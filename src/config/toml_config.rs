use crate::core::markers::reference_panel;
use crate::core::{ConfigProvider, DosageConfig, ExportFormat, InputLimits, MarkerDefinition};
use crate::utils::error::{DosageError, Result};
use crate::utils::validation::{
    validate_factor, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, validate_unique_formats, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub scoring: DosageConfig,
    #[serde(default)]
    pub limits: InputLimits,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// `[[markers]]` replaces the whole reference panel when present.
    #[serde(default = "reference_panel")]
    pub markers: Vec<MarkerDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_path: String,
    pub formats: Vec<ExportFormat>,
    pub bundle: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            formats: vec![ExportFormat::Csv],
            bundle: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
    pub verbose: bool,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            scoring: DosageConfig::default(),
            limits: InputLimits::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
            markers: reference_panel(),
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| DosageError::ConfigError {
                message: format!("cannot read {}: {}", path.as_ref().display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DosageError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DosageError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn validate_scoring(&self) -> Result<()> {
        let s = &self.scoring;
        validate_positive_number("scoring.base_dosage_mg", s.base_dosage_mg)?;
        validate_positive_number("scoring.reference_weight_kg", s.reference_weight_kg)?;
        if !s.per_risk_marker_factor.is_finite() || s.per_risk_marker_factor < 0.0 {
            return Err(DosageError::InvalidConfigValueError {
                field: "scoring.per_risk_marker_factor".to_string(),
                value: s.per_risk_marker_factor.to_string(),
                reason: "Value must be finite and not negative".to_string(),
            });
        }
        validate_factor("scoring.age_factor", s.age_factor)?;
        validate_factor("scoring.smoking_factor", s.smoking_factor)?;
        validate_factor("scoring.stress_factor", s.stress_factor)?;
        validate_factor("scoring.infection_factor", s.infection_factor)?;

        if !(s.low_band <= s.moderate_band) {
            return Err(DosageError::ConfigValidationError {
                field: "scoring.low_band".to_string(),
                message: format!(
                    "low_band ({}) must not exceed moderate_band ({})",
                    s.low_band, s.moderate_band
                ),
            });
        }
        Ok(())
    }

    fn validate_limits(&self) -> Result<()> {
        let l = &self.limits;
        validate_range("limits.min_age", l.min_age, 0, l.max_age)?;
        validate_positive_number("limits.min_weight_kg", l.min_weight_kg)?;
        if !(l.max_weight_kg >= l.min_weight_kg) {
            return Err(DosageError::InvalidConfigValueError {
                field: "limits.max_weight_kg".to_string(),
                value: l.max_weight_kg.to_string(),
                reason: format!("Value must be at least min_weight_kg ({})", l.min_weight_kg),
            });
        }
        Ok(())
    }

    fn validate_markers(&self) -> Result<()> {
        if self.markers.is_empty() {
            return Err(DosageError::ConfigValidationError {
                field: "markers".to_string(),
                message: "At least one marker is required".to_string(),
            });
        }

        let mut seen_ids = HashSet::new();
        for marker in &self.markers {
            validate_non_empty_string("markers.id", &marker.id)?;
            validate_non_empty_string("markers.description", &marker.description)?;
            if !seen_ids.insert(marker.id.as_str()) {
                return Err(DosageError::InvalidConfigValueError {
                    field: "markers.id".to_string(),
                    value: marker.id.clone(),
                    reason: "Duplicate marker id".to_string(),
                });
            }
            if !marker.beta.is_finite() {
                return Err(DosageError::InvalidConfigValueError {
                    field: format!("markers.{}.beta", marker.id),
                    value: marker.beta.to_string(),
                    reason: "Beta must be a finite number".to_string(),
                });
            }
            if marker.genotypes.is_empty() {
                return Err(DosageError::ConfigValidationError {
                    field: format!("markers.{}.genotypes", marker.id),
                    message: "Genotype table cannot be empty".to_string(),
                });
            }

            let mut seen_labels = HashSet::new();
            for entry in marker.genotypes.entries() {
                let field = format!("markers.{}.genotypes", marker.id);
                validate_non_empty_string(&field, &entry.label)?;
                validate_range(&field, entry.count, 0, 2)?;
                if !seen_labels.insert(entry.label.as_str()) {
                    return Err(DosageError::InvalidConfigValueError {
                        field,
                        value: entry.label.clone(),
                        reason: "Duplicate genotype label".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("export.output_path", &self.export.output_path)?;
        validate_unique_formats("export.formats", &self.export.formats)?;
        self.validate_scoring()?;
        self.validate_limits()?;
        self.validate_markers()
    }
}

impl ConfigProvider for TomlConfig {
    fn scoring(&self) -> &DosageConfig {
        &self.scoring
    }

    fn markers(&self) -> &[MarkerDefinition] {
        &self.markers
    }

    fn limits(&self) -> &InputLimits {
        &self.limits
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn output_formats(&self) -> &[ExportFormat] {
        &self.export.formats
    }

    fn bundle(&self) -> bool {
        self.export.bundle
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
