use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wb_app::{
    AppError, AppResult, Explorer, FeatureInputs, TransformRequest, diagnose, init_config,
    load_config, load_table, profile_file, rankings, run_transform, simulate_insight,
    simulate_policy, to_json,
};
use wb_core::{Dimension, Real};
use wb_explore::{FilterPredicate, RankingEntry};

#[derive(Parser)]
#[command(name = "wb-cli")]
#[command(about = "Wellbeing Explorer CLI - OECD wellbeing index builder and simulator", long_about = None)]
struct Cli {
    /// Configuration YAML (built-in OECD defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile a raw OECD extract before transforming it
    Profile {
        /// Path to the raw CSV extract
        raw_path: PathBuf,
    },
    /// Build the wellbeing table and write it to an output directory
    Transform {
        /// Path to the raw CSV extract
        raw_path: PathBuf,
        /// Output directory for the table, sample, metadata and manifest
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Validate a configuration file
    ValidateConfig {
        /// Path to the configuration YAML file
        config_path: PathBuf,
    },
    /// Write the default configuration to a file
    InitConfig {
        /// Destination YAML path
        path: PathBuf,
    },
    /// Top and bottom countries by composite index
    Rank {
        /// Table CSV or build directory
        table_path: PathBuf,
        /// Entries per listing (defaults to the configured ranking size)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Strengths, weaknesses and narrative for one country
    Diagnose {
        /// Table CSV or build directory
        table_path: PathBuf,
        /// Country name or ISO code
        country: String,
    },
    /// What-if scenarios
    #[command(subcommand)]
    Simulate(SimulateCommands),
    /// Assemble the dashboard layout with every panel's initial render
    Dashboard {
        /// Table CSV or build directory
        table_path: PathBuf,
    },
    /// Run one feature update
    Feature {
        /// Table CSV or build directory
        table_path: PathBuf,
        /// Feature id (e.g. country_radar_chart)
        feature_id: String,
        /// Control value as id=value; repeatable
        #[arg(long = "set")]
        set: Vec<String>,
        /// Row filter as column:op:value; repeatable
        #[arg(long = "filter")]
        filter: Vec<String>,
    },
}

#[derive(Subcommand)]
enum SimulateCommands {
    /// Percentage boosts across every country, or one
    Policy {
        /// Table CSV or build directory
        table_path: PathBuf,
        /// Restrict to one country
        #[arg(long)]
        country: Option<String>,
        /// Boost as dimension=percent (e.g. jobs=25); repeatable
        #[arg(long = "boost", value_parser = parse_boost)]
        boosts: Vec<(Dimension, Real)>,
    },
    /// Flat-point improvement of one dimension for one country
    Insight {
        /// Table CSV or build directory
        table_path: PathBuf,
        /// Country name
        country: String,
        /// Dimension key (e.g. environment)
        dimension: Dimension,
        /// Points to add (defaults to the configured default)
        #[arg(long)]
        improvement: Option<Real>,
    },
}

fn parse_boost(s: &str) -> Result<(Dimension, Real), String> {
    let (key, percent) = s
        .split_once('=')
        .ok_or_else(|| format!("expected dimension=percent, got {s:?}"))?;
    let dim = key.trim().parse::<Dimension>().map_err(|e| e.to_string())?;
    let percent = percent
        .trim()
        .parse::<Real>()
        .map_err(|e| format!("invalid percent {percent:?}: {e}"))?;
    Ok((dim, percent))
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let json = cli.json;

    match cli.command {
        Commands::Profile { raw_path } => cmd_profile(&raw_path, json),
        Commands::Transform { raw_path, out } => cmd_transform(config_path, &raw_path, out, json),
        Commands::ValidateConfig { config_path } => cmd_validate_config(&config_path),
        Commands::InitConfig { path } => cmd_init_config(&path),
        Commands::Rank { table_path, count } => cmd_rank(config_path, &table_path, count, json),
        Commands::Diagnose {
            table_path,
            country,
        } => cmd_diagnose(&table_path, &country, json),
        Commands::Simulate(sim) => match sim {
            SimulateCommands::Policy {
                table_path,
                country,
                boosts,
            } => cmd_simulate_policy(config_path, &table_path, country.as_deref(), &boosts, json),
            SimulateCommands::Insight {
                table_path,
                country,
                dimension,
                improvement,
            } => cmd_simulate_insight(
                config_path,
                &table_path,
                &country,
                dimension,
                improvement,
                json,
            ),
        },
        Commands::Dashboard { table_path } => cmd_dashboard(config_path, &table_path),
        Commands::Feature {
            table_path,
            feature_id,
            set,
            filter,
        } => cmd_feature(config_path, &table_path, &feature_id, &set, &filter),
    }
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

fn check_mark(passed: bool) -> &'static str {
    if passed { "✓" } else { "✗" }
}

fn cmd_profile(raw_path: &Path, json: bool) -> AppResult<()> {
    let profile = profile_file(raw_path)?;
    if json {
        return print_json(&profile);
    }

    println!("Raw extract: {}", raw_path.display());
    println!("  Rows: {}", profile.rows);
    println!("  Countries: {}", profile.countries);
    if let (Some(first), Some(last)) = (profile.years.first(), profile.years.last()) {
        println!("  Years: {first} - {last} ({} distinct)", profile.years.len());
    }
    if let Some(year) = profile.best_year {
        println!("  Best year: {year}");
    }

    println!("\nDomains:");
    for domain in &profile.domains {
        println!("  {} ({} measures)", domain.domain, domain.measures.len());
        for m in &domain.measures {
            println!("    {} - {} countries", m.measure, m.countries);
        }
    }

    println!("\nCompleteness by year:");
    for y in &profile.completeness {
        println!(
            "  {}: {} countries, {} measures, {} domains",
            y.year, y.countries, y.measures, y.domains
        );
    }

    if !profile.sex_breakdown_measures.is_empty() {
        println!("\nMeasures with a sex breakdown:");
        for m in &profile.sex_breakdown_measures {
            println!("  {m}");
        }
    }

    println!("\nSample countries:");
    for (name, code) in &profile.sample_countries {
        println!("  {name} ({code})");
    }
    Ok(())
}

fn cmd_transform(
    config_path: Option<&Path>,
    raw_path: &Path,
    out: PathBuf,
    json: bool,
) -> AppResult<()> {
    let config = load_config(config_path)?;
    let request = TransformRequest {
        raw_path,
        out_dir: out,
    };
    let response = run_transform(&request, &config)?;
    if json {
        return print_json(&response);
    }

    let manifest = &response.manifest;
    println!("✓ Built table: {}", manifest.build_id);
    println!("  Countries: {}", manifest.countries);
    println!("  Dimensions: {}", manifest.dimensions.len());
    if let Some((first, last)) = manifest.year_range {
        println!("  Years: {first} - {last}");
    }
    if !manifest.dropped_countries.is_empty() {
        println!("  Dropped: {}", manifest.dropped_countries.join(", "));
    }
    for fill in &response.report.fills {
        println!(
            "  Filled {} missing {} value(s) with {:.2}",
            fill.count, fill.dimension, fill.value
        );
    }
    println!("  Files:");
    for file in &manifest.files {
        println!("    {}", request.out_dir.join(file).display());
    }

    println!("\nValidation:");
    for check in &response.checks {
        println!("  {} {}", check_mark(check.passed), check.name);
    }

    print_rankings(&response.rankings.top, &response.rankings.bottom);
    Ok(())
}

fn cmd_validate_config(path: &Path) -> AppResult<()> {
    println!("Validating configuration: {}", path.display());
    let config = load_config(Some(path))?;
    println!("✓ Configuration is valid");
    println!("  Name: {}", config.name);
    println!("  Measures: {}", config.measures.len());
    Ok(())
}

fn cmd_init_config(path: &Path) -> AppResult<()> {
    if path.exists() {
        return Err(AppError::InvalidInput(format!(
            "{} already exists",
            path.display()
        )));
    }
    init_config(path)?;
    info!(path = %path.display(), "wrote default configuration");
    println!("✓ Wrote default configuration to {}", path.display());
    Ok(())
}

fn print_rankings(top: &[RankingEntry], bottom: &[RankingEntry]) {
    let highlights = |entry: &RankingEntry| {
        entry
            .highlights
            .iter()
            .map(|(dim, gap)| format!("{} {gap:+.1}", dim.label()))
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!("\nTop {} countries:", top.len());
    for entry in top {
        println!(
            "  {:>3}. {:<20} {:>5.1}  strengths: {}",
            entry.rank,
            entry.country,
            entry.composite_index,
            highlights(entry)
        );
    }
    println!("\nBottom {} countries:", bottom.len());
    for entry in bottom {
        println!(
            "  {:>3}. {:<20} {:>5.1}  weaknesses: {}",
            entry.rank,
            entry.country,
            entry.composite_index,
            highlights(entry)
        );
    }
}

fn cmd_rank(
    config_path: Option<&Path>,
    table_path: &Path,
    count: Option<usize>,
    json: bool,
) -> AppResult<()> {
    let config = load_config(config_path)?;
    let table = load_table(table_path)?;
    let ranks = rankings(&table, count.unwrap_or(config.transform.ranking_size));
    if json {
        return print_json(&ranks);
    }
    print_rankings(&ranks.top, &ranks.bottom);
    Ok(())
}

fn cmd_diagnose(table_path: &Path, country: &str, json: bool) -> AppResult<()> {
    let table = load_table(table_path)?;
    let diagnosis = diagnose(&table, country)?;
    if json {
        return print_json(&diagnosis);
    }
    println!("{}", diagnosis.narrative);
    Ok(())
}

fn cmd_simulate_policy(
    config_path: Option<&Path>,
    table_path: &Path,
    country: Option<&str>,
    boosts: &[(Dimension, Real)],
    json: bool,
) -> AppResult<()> {
    let config = load_config(config_path)?;
    let table = load_table(table_path)?;
    let results = simulate_policy(&table, &config, country, boosts)?;
    if json {
        return print_json(&results);
    }

    if boosts.is_empty() {
        println!("No boosts given; showing current positions");
    } else {
        let summary: Vec<String> = boosts
            .iter()
            .map(|(dim, pct)| format!("{} +{pct}%", dim.label()))
            .collect();
        println!("Boosts: {}", summary.join(", "));
    }
    for sim in &results {
        let life = sim
            .life_satisfaction
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  {:<20} life satisfaction {:>5}  (proxy {:.1}{})",
            sim.country,
            life,
            sim.proxy,
            if sim.boosted { ", boosted" } else { "" }
        );
    }
    Ok(())
}

fn cmd_simulate_insight(
    config_path: Option<&Path>,
    table_path: &Path,
    country: &str,
    dimension: Dimension,
    improvement: Option<Real>,
    json: bool,
) -> AppResult<()> {
    let config = load_config(config_path)?;
    let table = load_table(table_path)?;
    let improvement = improvement.unwrap_or(config.simulation.default_improvement);
    let insight = simulate_insight(&table, &config, country, dimension, improvement)?;
    if json {
        return print_json(&insight);
    }
    println!("{}", insight.narrative);
    Ok(())
}

fn cmd_dashboard(config_path: Option<&Path>, table_path: &Path) -> AppResult<()> {
    let config = load_config(config_path)?;
    let table = load_table(table_path)?;
    let explorer = Explorer::new(table, config);
    print_json(&explorer.layout())
}

fn cmd_feature(
    config_path: Option<&Path>,
    table_path: &Path,
    feature_id: &str,
    set: &[String],
    filter: &[String],
) -> AppResult<()> {
    let config = load_config(config_path)?;
    let table = load_table(table_path)?;
    let explorer = Explorer::new(table, config);

    let mut inputs = FeatureInputs::default();
    for assignment in set {
        inputs.set_from_str(assignment)?;
    }
    for predicate in filter {
        inputs = inputs.with_filter(predicate.parse::<FilterPredicate>()?);
    }
    print_json(&explorer.update(feature_id, &inputs)?)
}
