//! Subcommand handlers.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, ValueEnum};
use pbaesa_allocation::AllocationVariant;
use pbaesa_core::{AllocationPipeline, AssessmentConfig, Inventory, load_scores};
use pbaesa_lca::CharacterizationTable;
use pbaesa_sos::{calculate_exploitation, exceeded_boundaries, render_report};
use pbaesa_types::Year;
use tracing::{info, warn};

/// Which allocation factor `factor` prints.
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum VariantArg {
    /// Direct final-consumption share.
    #[default]
    DirectFce,
    /// Total final-consumption share.
    TotalFce,
    /// Direct gross-value-added share.
    DirectGva,
    /// Total gross-value-added share.
    TotalGva,
    /// Every variant, absent ones as `N/A`.
    All,
}

impl VariantArg {
    const fn variant(self) -> Option<AllocationVariant> {
        match self {
            Self::DirectFce => Some(AllocationVariant::DirectFce),
            Self::TotalFce => Some(AllocationVariant::TotalFce),
            Self::DirectGva => Some(AllocationVariant::DirectGva),
            Self::TotalGva => Some(AllocationVariant::TotalGva),
            Self::All => None,
        }
    }
}

/// Arguments of `factor`.
#[derive(Args, Debug)]
pub struct FactorArgs {
    /// Geography code, e.g. `DE`.
    #[arg(long)]
    pub geography: String,

    /// Sector name as it appears in EXIOBASE.
    #[arg(long)]
    pub sector: String,

    /// Reference year.
    #[arg(long)]
    pub year: u16,

    /// Allocation basis.
    #[arg(long, value_enum, default_value_t)]
    pub variant: VariantArg,

    /// Only read exported tables; never load EXIOBASE to build a missing one.
    #[arg(long)]
    pub no_build: bool,
}

/// Arguments of `exploit`.
#[derive(Args, Debug)]
pub struct ExploitArgs {
    /// JSON score file: `[{"method": [..], "score": ..}]`.
    #[arg(long, conflicts_with = "inventory", required_unless_present = "inventory")]
    pub scores: Option<PathBuf>,

    /// JSON inventory to score with the built-in methods.
    #[arg(long, requires = "characterization")]
    pub inventory: Option<PathBuf>,

    /// JSON characterization-factor table for `--inventory`.
    #[arg(long, requires = "inventory")]
    pub characterization: Option<PathBuf>,
}

/// Build and persist the allocation table of `year`.
///
/// # Errors
///
/// Fails if the dataset cannot be loaded or the table cannot be written.
pub fn run_build(config: &AssessmentConfig, year: u16) -> anyhow::Result<()> {
    let pipeline = AllocationPipeline::from_config(config);
    let path = pipeline
        .export(Year::new(year))
        .with_context(|| format!("building allocation factors for {year}"))?;
    println!("Allocation factors for {year} written to {}", path.display());
    Ok(())
}

/// Print one allocation factor, or all of them.
///
/// # Errors
///
/// Fails with the lookup error when no factor can be produced.
pub fn run_factor(config: &AssessmentConfig, args: &FactorArgs) -> anyhow::Result<()> {
    let pipeline = AllocationPipeline::from_config(config);
    let accessor = if args.no_build {
        pipeline.read_only_accessor()
    } else {
        pipeline.accessor()
    };
    let year = Year::new(args.year);

    if let Some(variant) = args.variant.variant() {
        let value = accessor.allocation_factor(variant, &args.geography, &args.sector, year)?;
        println!("{value}");
        return Ok(());
    }

    let row = accessor.get_all_allocation_factor(&args.geography, &args.sector, year)?;
    for variant in AllocationVariant::ALL {
        match row.value(variant) {
            Some(value) => println!("{variant}: {value}"),
            None => println!("{variant}: N/A"),
        }
    }
    Ok(())
}

/// Print the exploitation report.
///
/// # Errors
///
/// Fails if the scores or the inventory cannot be read or scored.
pub fn run_exploit(config: &AssessmentConfig, args: &ExploitArgs) -> anyhow::Result<()> {
    let scores = match (&args.scores, &args.inventory, &args.characterization) {
        (Some(path), _, _) => {
            load_scores(path).with_context(|| format!("reading scores from {}", path.display()))?
        }
        (None, Some(inventory), Some(characterization)) => {
            let table = CharacterizationTable::from_file(characterization).with_context(|| {
                format!(
                    "reading characterization factors from {}",
                    characterization.display()
                )
            })?;
            Inventory::from_file(inventory)
                .with_context(|| format!("reading inventory from {}", inventory.display()))?
                .score(&table)?
        }
        _ => anyhow::bail!("either --scores or --inventory with --characterization is required"),
    };
    info!(methods = scores.len(), "Scores loaded");

    let sos = config.boundaries.safe_operating_space();
    let exploitation = calculate_exploitation(&scores, &sos);
    print!("{}", render_report(&exploitation));

    let exceeded = exceeded_boundaries(&exploitation);
    if !exceeded.is_empty() {
        warn!(count = exceeded.len(), "Safe operating space exceeded");
        println!("Exceeded:");
        for key in exceeded {
            println!("  {}", key.category().unwrap_or("?"));
        }
    }
    Ok(())
}

/// Print the safe operating space and the recognised geographies.
pub fn run_thresholds(config: &AssessmentConfig) {
    let sos = config.boundaries.safe_operating_space();
    for (category, threshold) in sos.iter() {
        let unit = threshold.unit.as_deref().unwrap_or("");
        println!("{category:<35} {:>10} {unit}", threshold.value);
    }
    println!("{} geographies", config.geography.geo_scopes().len());
}
