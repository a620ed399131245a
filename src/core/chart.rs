use crate::domain::model::ScoreResult;
use serde::Serialize;

pub const CHART_TITLE: &str = "Genetic impact per SNP";
pub const CHART_X_LABEL: &str = "PRS contribution";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub marker_id: String,
    pub genotype: String,
    pub value: f64,
}

/// Horizontal bars centered at zero, one per marker in panel order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub x_label: String,
    pub bars: Vec<ChartBar>,
}

impl ChartSeries {
    pub fn from_result(result: &ScoreResult) -> Self {
        Self {
            title: CHART_TITLE.to_string(),
            x_label: CHART_X_LABEL.to_string(),
            bars: result
                .effects
                .iter()
                .map(|effect| ChartBar {
                    marker_id: effect.marker_id.clone(),
                    genotype: effect.genotype.clone(),
                    value: effect.rounded_effect,
                })
                .collect(),
        }
    }

    fn max_magnitude(&self) -> f64 {
        self.bars
            .iter()
            .map(|bar| bar.value.abs())
            .fold(0.0, f64::max)
    }

    /// Renders a diverging bar chart. `half_width` is the number of cells on each side of the axis.
    pub fn render_text(&self, half_width: usize) -> String {
        let half_width = half_width.max(1);
        let label_width = self
            .bars
            .iter()
            .map(|bar| bar.marker_id.chars().count())
            .max()
            .unwrap_or(0);
        let scale = self.max_magnitude();

        let mut lines = vec![self.title.clone()];
        for bar in &self.bars {
            let cells = if scale > 0.0 {
                ((bar.value.abs() / scale) * half_width as f64).round() as usize
            } else {
                0
            };
            let (left, right) = if bar.value < 0.0 {
                (
                    format!("{}{}", " ".repeat(half_width - cells), "█".repeat(cells)),
                    " ".repeat(half_width),
                )
            } else {
                (
                    " ".repeat(half_width),
                    format!("{}{}", "█".repeat(cells), " ".repeat(half_width - cells)),
                )
            };
            lines.push(format!(
                "{:<label_width$} {}|{} {:>6.2}",
                bar.marker_id,
                left,
                right,
                bar.value,
                label_width = label_width
            ));
        }
        lines.push(format!(
            "{:<label_width$} {:^width$}",
            "",
            self.x_label,
            label_width = label_width,
            width = half_width * 2 + 1
        ));
        lines.join("\n")
    }
}
