use crate::core::markers::reference_panel;
use crate::domain::model::{
    round2, DosageConfig, Interpretation, MarkerDefinition, MarkerEffect, PatientInput,
    ScoreResult,
};
use crate::utils::error::{DosageError, Result};
use std::collections::BTreeMap;

/// Pure dosage scoring over a fixed marker panel.
///
/// Holds no mutable state: every call to [`DosageEngine::run`] depends only on
/// its input, so one engine can be shared across threads without locking.
#[derive(Debug, Clone)]
pub struct DosageEngine {
    markers: Vec<MarkerDefinition>,
    config: DosageConfig,
}

impl Default for DosageEngine {
    fn default() -> Self {
        Self::new(reference_panel(), DosageConfig::default())
    }
}

impl DosageEngine {
    pub fn new(markers: Vec<MarkerDefinition>, config: DosageConfig) -> Self {
        Self { markers, config }
    }

    pub fn markers(&self) -> &[MarkerDefinition] {
        &self.markers
    }

    /// One effect per configured marker, in panel order.
    pub fn compute_marker_effects(
        &self,
        genotypes: &BTreeMap<String, String>,
    ) -> Result<Vec<MarkerEffect>> {
        if let Some(unknown) = genotypes
            .keys()
            .find(|id| !self.markers.iter().any(|m| &m.id == *id))
        {
            return Err(DosageError::UnknownMarker {
                marker: unknown.clone(),
            });
        }

        self.markers
            .iter()
            .map(|marker| {
                let genotype =
                    genotypes
                        .get(&marker.id)
                        .ok_or_else(|| DosageError::MissingGenotype {
                            marker: marker.id.clone(),
                        })?;
                let count = marker.allele_count(genotype)?;
                let effect = f64::from(count) * marker.beta;

                tracing::debug!(
                    "{} {} -> count {}, effect {:.4}",
                    marker.id,
                    genotype,
                    count,
                    effect
                );

                Ok(MarkerEffect {
                    marker_id: marker.id.clone(),
                    genotype: genotype.clone(),
                    allele_count: count,
                    effect,
                    rounded_effect: round2(effect),
                    description: marker.description.clone(),
                    is_risk_hit: marker.is_risk && count > 0,
                })
            })
            .collect()
    }

    /// Sums unrounded effects; rounding happens only on display.
    pub fn aggregate(effects: &[MarkerEffect]) -> (f64, usize) {
        let prs_score = effects.iter().map(|e| e.effect).sum();
        let risk_count = effects.iter().filter(|e| e.is_risk_hit).count();
        (prs_score, risk_count)
    }

    pub fn interpret(&self, prs_score: f64) -> Interpretation {
        if prs_score <= self.config.low_band {
            Interpretation::Low
        } else if prs_score <= self.config.moderate_band {
            Interpretation::Moderate
        } else {
            Interpretation::Good
        }
    }

    pub fn compute_dosage(
        &self,
        risk_count: usize,
        weight_kg: f64,
        age: u32,
        smoker: bool,
        stressed: bool,
        infected: bool,
    ) -> f64 {
        let c = &self.config;
        let genetic = 1.0 + c.per_risk_marker_factor * risk_count as f64;
        let weight = weight_kg / c.reference_weight_kg;
        let age = if age >= c.age_threshold { c.age_factor } else { 1.0 };
        let smoking = if smoker { c.smoking_factor } else { 1.0 };
        let stress = if stressed { c.stress_factor } else { 1.0 };
        let infection = if infected { c.infection_factor } else { 1.0 };

        round2(c.base_dosage_mg * genetic * weight * age * smoking * stress * infection)
    }

    pub fn run(&self, input: &PatientInput) -> Result<ScoreResult> {
        let effects = self.compute_marker_effects(&input.genotypes)?;
        let (prs_score, risk_count) = Self::aggregate(&effects);
        let interpretation = self.interpret(prs_score);
        let dosage_mg = self.compute_dosage(
            risk_count,
            input.weight_kg,
            input.age,
            input.smoker,
            input.stressed,
            input.infected,
        );

        Ok(ScoreResult {
            effects,
            prs_score,
            risk_count,
            interpretation,
            dosage_mg,
        })
    }
}
