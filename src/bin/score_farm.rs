// Score one farm against a species list and print ranked recommendations
//
// Usage: cargo run --features cli --bin score_farm -- \
//          --farm farm.json --species species.csv [--config scoring.json] [--output out.json]

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tree_suitability_scorer::{
    FarmProfile, FarmRecord, RecommendationReport, ScoringConfig, SpeciesCatalog, SpeciesScorer,
};

#[derive(Parser, Debug)]
#[command(
    name = "score_farm",
    about = "Rank tree species by suitability for a farm",
    version
)]
struct Args {
    /// Farm record (JSON object)
    #[arg(long)]
    farm: PathBuf,
    /// Species list: JSON array of records, or a CSV catalog
    #[arg(long)]
    species: PathBuf,
    /// Scoring configuration (JSON); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the payload here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_farm(path: &Path) -> Result<FarmRecord> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read farm file: {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse farm JSON: {:?}", path))
}

fn load_species(path: &Path) -> Result<SpeciesCatalog> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        SpeciesCatalog::from_csv(path)
    } else {
        SpeciesCatalog::from_json(path)
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };
    let scorer = SpeciesScorer::from_config(&config)?;

    let farm_record = load_farm(&args.farm)?;
    for violation in farm_record.range_violations() {
        tracing::warn!(
            "Farm {}: {} = {} outside plausible range [{}, {}]",
            farm_record.farm_id,
            violation.field,
            violation.value,
            violation.min,
            violation.max
        );
    }
    let farm = FarmProfile::from_record(&farm_record);

    let species = load_species(&args.species)?.into_profiles();
    tracing::info!(
        "Scoring farm {} against {} species ({} criteria)",
        farm.farm_id,
        species.len(),
        scorer.registry().len()
    );

    let run = scorer.run(&farm, &species);
    let report = RecommendationReport::from_run(run, chrono::Utc::now().to_rfc3339());
    let json = report.to_json_pretty()?;

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write output: {:?}", path))?;
            tracing::info!("Wrote {} recommendations to {:?}", report.recommendations.len(), path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tree_suitability_scorer=info,score_farm=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        tracing::error!("Scoring failed: {:#}", err);
        return Err(err);
    }
    Ok(())
}
