pub mod storage;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::config::toml_config::TomlConfig;
    use crate::core::{ExportFormat, PatientInput};
    use crate::utils::error::{DosageError, Result};
    use crate::utils::validation::validate_unique_formats;
    use clap::Parser;

    fn parse_genotype(value: &str) -> std::result::Result<(String, String), String> {
        let (marker, genotype) = value
            .split_once('=')
            .ok_or_else(|| format!("expected MARKER=GENOTYPE, got '{}'", value))?;
        let (marker, genotype) = (marker.trim(), genotype.trim());
        if marker.is_empty() || genotype.is_empty() {
            return Err(format!("expected MARKER=GENOTYPE, got '{}'", value));
        }
        Ok((marker.to_string(), genotype.to_string()))
    }

    #[derive(Debug, Clone, Parser)]
    #[command(name = "vitc-dose")]
    #[command(about = "Personalized vitamin C dosage from genetic markers and lifestyle factors")]
    pub struct CliConfig {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Genotype for one marker, e.g. GPX1_rs1050450=CT (repeat for each marker)
        #[arg(short = 'g', long = "genotype", value_parser = parse_genotype)]
        pub genotypes: Vec<(String, String)>,

        #[arg(long, default_value = "35")]
        pub age: u32,

        /// Body weight in kilograms
        #[arg(long, default_value = "70.0")]
        pub weight: f64,

        #[arg(long)]
        pub smoker: bool,

        /// Elevated physical or emotional stress
        #[arg(long)]
        pub stressed: bool,

        /// Active infection or chronic illness
        #[arg(long)]
        pub infected: bool,

        /// Overrides export.output_path
        #[arg(long)]
        pub output_path: Option<String>,

        /// Overrides export.formats (csv, json)
        #[arg(long, value_delimiter = ',')]
        pub format: Vec<String>,

        /// Pack all exports into one ZIP archive
        #[arg(long)]
        pub bundle: bool,

        #[arg(long, help = "Skip the text chart")]
        pub no_chart: bool,

        #[arg(long, help = "Print the marker panel and exit")]
        pub list_markers: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub log_json: bool,
    }

    impl CliConfig {
        pub fn load_config(&self) -> Result<TomlConfig> {
            match &self.config {
                Some(path) => TomlConfig::from_file(path),
                None => Ok(TomlConfig::default()),
            }
        }

        /// Command line flags win over file values.
        pub fn apply_overrides(&self, config: &mut TomlConfig) -> Result<()> {
            if let Some(path) = &self.output_path {
                config.export.output_path = path.clone();
            }

            if !self.format.is_empty() {
                config.export.formats = self
                    .format
                    .iter()
                    .map(|value| {
                        ExportFormat::parse(value).ok_or_else(|| DosageError::InvalidConfigValueError {
                            field: "--format".to_string(),
                            value: value.clone(),
                            reason: "Supported formats: csv, json".to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                validate_unique_formats("--format", &config.export.formats)?;
            }

            if self.bundle {
                config.export.bundle = true;
            }
            Ok(())
        }

        /// Fails when the same marker is given twice rather than keeping the last value.
        pub fn patient_input(&self) -> Result<PatientInput> {
            let mut input = PatientInput::new(self.age, self.weight)
                .with_smoker(self.smoker)
                .with_stressed(self.stressed)
                .with_infected(self.infected);

            for (marker, genotype) in &self.genotypes {
                if let Some(previous) = input.genotypes.get(marker) {
                    return Err(DosageError::DuplicateGenotype {
                        marker: marker.clone(),
                        first: previous.clone(),
                        second: genotype.clone(),
                    });
                }
                input = input.with_genotype(marker.as_str(), genotype.as_str());
            }
            Ok(input)
        }
    }

}
