use crate::utils::error::{DosageError, Result};
use crate::utils::validation::validate_input_range;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rounds to two decimal places for display and export, folding `-0.0` into `0.0`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenotypeEntry {
    pub label: String,
    pub count: u8,
}

/// Genotype label to allele count, scoped to a single marker. Keeps declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenotypeTable {
    entries: Vec<GenotypeEntry>,
}

impl GenotypeTable {
    pub fn new<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u8)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, count)| GenotypeEntry {
                    label: label.to_string(),
                    count,
                })
                .collect(),
        }
    }

    pub fn count_for(&self, genotype: &str) -> Option<u8> {
        self.entries
            .iter()
            .find(|entry| entry.label == genotype)
            .map(|entry| entry.count)
    }

    pub fn entries(&self) -> &[GenotypeEntry] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    pub fn vocabulary(&self) -> String {
        self.labels().collect::<Vec<_>>().join(", ")
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDefinition {
    pub id: String,
    pub beta: f64,
    pub description: String,
    #[serde(default = "default_is_risk")]
    pub is_risk: bool,
    pub genotypes: GenotypeTable,
}

fn default_is_risk() -> bool {
    true
}

impl MarkerDefinition {
    pub fn allele_count(&self, genotype: &str) -> Result<u8> {
        self.genotypes
            .count_for(genotype)
            .ok_or_else(|| DosageError::InvalidGenotype {
                marker: self.id.clone(),
                genotype: genotype.to_string(),
                allowed: self.genotypes.vocabulary(),
            })
    }
}

/// Dosage and interpretation constants. Every field can be overridden from `[scoring]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DosageConfig {
    pub base_dosage_mg: f64,
    pub per_risk_marker_factor: f64,
    pub reference_weight_kg: f64,
    pub age_threshold: u32,
    pub age_factor: f64,
    pub smoking_factor: f64,
    pub stress_factor: f64,
    pub infection_factor: f64,
    pub low_band: f64,
    pub moderate_band: f64,
}

impl Default for DosageConfig {
    fn default() -> Self {
        Self {
            base_dosage_mg: 2000.0,
            per_risk_marker_factor: 0.25,
            reference_weight_kg: 70.0,
            age_threshold: 60,
            age_factor: 1.2,
            smoking_factor: 1.2,
            stress_factor: 1.3,
            infection_factor: 1.5,
            low_band: -1.0,
            moderate_band: 0.5,
        }
    }
}

/// Clinically intended input bounds, checked before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub min_age: u32,
    pub max_age: u32,
    pub min_weight_kg: f64,
    pub max_weight_kg: f64,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_age: 10,
            max_age: 100,
            min_weight_kg: 30.0,
            max_weight_kg: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    /// Marker id to genotype label.
    pub genotypes: BTreeMap<String, String>,
    pub age: u32,
    pub weight_kg: f64,
    #[serde(default)]
    pub smoker: bool,
    #[serde(default)]
    pub stressed: bool,
    #[serde(default)]
    pub infected: bool,
}

impl PatientInput {
    pub fn new(age: u32, weight_kg: f64) -> Self {
        Self {
            genotypes: BTreeMap::new(),
            age,
            weight_kg,
            smoker: false,
            stressed: false,
            infected: false,
        }
    }

    pub fn with_genotype(mut self, marker_id: impl Into<String>, genotype: impl Into<String>) -> Self {
        self.genotypes.insert(marker_id.into(), genotype.into());
        self
    }

    pub fn with_smoker(mut self, smoker: bool) -> Self {
        self.smoker = smoker;
        self
    }

    pub fn with_stressed(mut self, stressed: bool) -> Self {
        self.stressed = stressed;
        self
    }

    pub fn with_infected(mut self, infected: bool) -> Self {
        self.infected = infected;
        self
    }

    pub fn validate_limits(&self, limits: &InputLimits) -> Result<()> {
        validate_input_range("age", self.age, limits.min_age, limits.max_age)?;
        validate_input_range(
            "weight_kg",
            self.weight_kg,
            limits.min_weight_kg,
            limits.max_weight_kg,
        )?;
        if self.weight_kg <= 0.0 {
            return Err(DosageError::OutOfRangeInput {
                field: "weight_kg".to_string(),
                value: self.weight_kg.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpretation {
    #[serde(rename = "Low expected response")]
    Low,
    #[serde(rename = "Moderate expected response")]
    Moderate,
    #[serde(rename = "Good expected response")]
    Good,
}

impl Interpretation {
    pub fn label(&self) -> &'static str {
        match self {
            Interpretation::Low => "Low expected response",
            Interpretation::Moderate => "Moderate expected response",
            Interpretation::Good => "Good expected response",
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerEffect {
    pub marker_id: String,
    pub genotype: String,
    pub allele_count: u8,
    /// Unrounded contribution, used for aggregation.
    pub effect: f64,
    pub rounded_effect: f64,
    pub description: String,
    pub is_risk_hit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub effects: Vec<MarkerEffect>,
    pub prs_score: f64,
    pub risk_count: usize,
    pub interpretation: Interpretation,
    pub dosage_mg: f64,
}

impl ScoreResult {
    pub fn prs_display(&self) -> f64 {
        round2(self.prs_score)
    }
}
