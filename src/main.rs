use clap::Parser;
use vitc_dose::core::chart::ChartSeries;
use vitc_dose::core::ConfigProvider;
use vitc_dose::utils::error::{DosageError, ErrorSeverity};
use vitc_dose::utils::{logger, validation::Validate};
use vitc_dose::{CliConfig, LocalStorage, ReportService, TomlConfig};

const CHART_HALF_WIDTH: usize = 20;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    let mut config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.logging.verbose;
    if args.log_json || config.logging.json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting vitc-dose");
    if verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    if let Err(e) = args
        .apply_overrides(&mut config)
        .and_then(|_| config.validate())
    {
        exit_with(&e);
    }

    if args.list_markers {
        print_markers(&config);
        return Ok(());
    }

    let input = match args.patient_input() {
        Ok(input) => input,
        Err(e) => exit_with(&e),
    };
    let storage = LocalStorage::new(config.output_path().to_string());
    let service = ReportService::new(storage, config);

    match service.run(&input).await {
        Ok(outcome) => {
            let result = &outcome.result;
            println!("📊 Personalized results");
            println!("  PRS total: {:.2}", result.prs_display());
            println!("  Interpretation: {}", result.interpretation);
            println!("  Risk SNPs detected: {}", result.risk_count);
            println!(
                "  💊 Recommended dose: {:.2} mg/day (split doses)",
                result.dosage_mg
            );

            if !args.no_chart {
                println!();
                println!(
                    "{}",
                    ChartSeries::from_result(result).render_text(CHART_HALF_WIDTH)
                );
            }

            if !outcome.written.is_empty() {
                println!();
                for path in &outcome.written {
                    tracing::info!("📁 Output saved to: {}", path.display());
                    println!("📁 Output saved to: {}", path.display());
                }
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn print_markers(config: &TomlConfig) {
    println!("🧬 Marker panel:");
    for marker in config.markers() {
        println!(
            "  {:<20} beta {:>5.2}  [{}]  {}",
            marker.id,
            marker.beta,
            marker.genotypes.vocabulary(),
            marker.description
        );
    }
}

fn exit_with(e: &DosageError) -> ! {
    tracing::error!(
        "❌ vitc-dose failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
