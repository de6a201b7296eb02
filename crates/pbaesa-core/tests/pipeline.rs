//! End-to-end allocation pipeline over a synthetic EXIOBASE dataset.

#![allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use pbaesa_allocation::{BuildError, LookupError};
use pbaesa_core::{AllocationPipeline, AssessmentConfig};
use pbaesa_mrio::MrioError;
use pbaesa_sos::{calculate_exploitation, exceeded_boundaries, render_report};
use pbaesa_types::{DEMAND_CATEGORIES, MethodKey, PlanetaryBoundary, Year};

const REGIONS: [&str; 3] = ["DE", "FR", "WM"];
const SECTORS: [&str; 2] = ["Wheat", "Steel"];

fn header(out: &mut String, level: &str, labels: &[String]) {
    let _ = writeln!(out, "{level}\t\t{}", labels.join("\t"));
}

/// Write `IOT_{year}_ixi/{Z,Y}.txt` with three regions and two sectors.
///
/// Every region's FCE columns hold `(row + 1) * (category + 1)`, so the FR
/// share of row `i` is `(i + 1) / 21` in every geography.
fn write_dataset(folder: &Path, year: u16) {
    let dir = folder.join(format!("IOT_{year}_ixi"));
    fs::create_dir_all(&dir).unwrap();

    let rows: Vec<(&str, &str)> = REGIONS
        .iter()
        .flat_map(|r| SECTORS.iter().map(move |s| (*r, *s)))
        .collect();
    let row_regions: Vec<String> = rows.iter().map(|(r, _)| (*r).to_owned()).collect();
    let row_sectors: Vec<String> = rows.iter().map(|(_, s)| (*s).to_owned()).collect();

    let mut z = String::new();
    header(&mut z, "region", &row_regions);
    header(&mut z, "sector", &row_sectors);
    let _ = writeln!(z, "region\tsector{}", "\t".repeat(rows.len()));
    for (i, (region, sector)) in rows.iter().enumerate() {
        let values: Vec<String> = (0..rows.len()).map(|j| format!("{}", 1 + i + j)).collect();
        let _ = writeln!(z, "{region}\t{sector}\t{}", values.join("\t"));
    }

    let demand_regions: Vec<String> = REGIONS
        .iter()
        .flat_map(|r| DEMAND_CATEGORIES.iter().map(move |_| (*r).to_owned()))
        .collect();
    let demand_categories: Vec<String> = REGIONS
        .iter()
        .flat_map(|_| DEMAND_CATEGORIES.iter().map(|c| (*c).to_owned()))
        .collect();

    let mut y = String::new();
    header(&mut y, "region", &demand_regions);
    header(&mut y, "category", &demand_categories);
    let _ = writeln!(y, "region\tsector{}", "\t".repeat(demand_regions.len()));
    for (i, (region, sector)) in rows.iter().enumerate() {
        let values: Vec<String> = (0..demand_regions.len())
            .map(|c| {
                let category = c % DEMAND_CATEGORIES.len();
                if category < 3 {
                    format!("{}", (i + 1) * (category + 1))
                } else {
                    "5".to_owned()
                }
            })
            .collect();
        let _ = writeln!(y, "{region}\t{sector}\t{}", values.join("\t"));
    }

    fs::write(dir.join("Z.txt"), z).unwrap();
    fs::write(dir.join("Y.txt"), y).unwrap();
}

fn config(root: &Path) -> AssessmentConfig {
    let mut config = AssessmentConfig::default();
    config.exiobase.storage_dir = root.join("exiobase");
    config.exiobase.download_enabled = false;
    config.allocation.output_dir = root.join("allocation");
    config.geography.scopes = REGIONS.iter().map(|r| (*r).to_owned()).collect();
    config
}

#[test]
fn export_writes_one_row_per_region_sector() {
    let root = tempfile::tempdir().unwrap();
    write_dataset(&root.path().join("exiobase"), 2020);
    let pipeline = AllocationPipeline::from_config(&config(root.path()));

    let path = pipeline.export(Year::new(2020)).unwrap();
    assert!(path.ends_with("allocation_factors_2020.json"));

    let table = pipeline.store().load(Year::new(2020)).unwrap().unwrap();
    assert_eq!(table.len(), 6);
    for row in &table.rows {
        assert_eq!(row.geography, row.region);
        assert!(row.total_fce.is_none() && row.direct_gva.is_none() && row.total_gva.is_none());
    }
    let de_wheat = table.find("DE", "Wheat").unwrap().direct_fce.unwrap();
    assert!((de_wheat - 1.0 / 21.0).abs() < 1e-12);
}

#[test]
fn accessor_builds_missing_year_on_demand() {
    let root = tempfile::tempdir().unwrap();
    write_dataset(&root.path().join("exiobase"), 2011);
    let pipeline = AllocationPipeline::from_config(&config(root.path()));
    let accessor = pipeline.accessor();

    let factor = accessor
        .get_direct_fce_allocation_factor("FR", "Steel", Year::new(2011))
        .unwrap();
    assert!((factor - 4.0 / 21.0).abs() < 1e-12);
    assert!(pipeline.store().path(Year::new(2011)).exists());

    let gva = accessor.get_direct_gva_allocation_factor("FR", "Steel", Year::new(2011));
    assert!(matches!(gva, Err(LookupError::ColumnUnavailable { .. })));

    let unknown = accessor.get_all_allocation_factor("XX", "Steel", Year::new(2011));
    assert!(matches!(
        unknown,
        Err(LookupError::UnknownGeography { ref valid, .. }) if valid.len() == 3
    ));
}

#[test]
fn read_only_accessor_sees_exported_tables_only() {
    let root = tempfile::tempdir().unwrap();
    write_dataset(&root.path().join("exiobase"), 2015);
    let pipeline = AllocationPipeline::from_config(&config(root.path()));

    let before = pipeline
        .read_only_accessor()
        .get_direct_fce_allocation_factor("DE", "Steel", Year::new(2015));
    assert!(matches!(before, Err(LookupError::TableUnavailable { .. })));
    assert!(!pipeline.store().path(Year::new(2015)).exists());

    pipeline.export(Year::new(2015)).unwrap();
    let after = pipeline
        .read_only_accessor()
        .get_direct_fce_allocation_factor("DE", "Steel", Year::new(2015))
        .unwrap();
    assert!((after - 2.0 / 21.0).abs() < 1e-12);
}

#[test]
fn years_outside_range_or_cache_are_unsupported() {
    let root = tempfile::tempdir().unwrap();
    let pipeline = AllocationPipeline::from_config(&config(root.path()));

    for year in [1990, 2020] {
        let err = pipeline.export(Year::new(year)).unwrap_err();
        assert!(
            matches!(err, BuildError::Mrio(MrioError::UnsupportedYear { .. })),
            "{year}: {err}"
        );
    }
    assert!(!root.path().join("allocation").exists());

    let lookup = pipeline
        .accessor()
        .get_direct_fce_allocation_factor("DE", "Wheat", Year::new(1990));
    assert!(matches!(lookup, Err(LookupError::TableUnavailable { .. })));
}

#[test]
fn infinite_demand_cell_fails_export_without_artifact() {
    let root = tempfile::tempdir().unwrap();
    let storage = root.path().join("exiobase");
    write_dataset(&storage, 2020);
    let y_path = storage.join("IOT_2020_ixi").join("Y.txt");
    let y = fs::read_to_string(&y_path).unwrap();
    fs::write(&y_path, y.replacen("DE\tWheat\t1\t", "DE\tWheat\tinf\t", 1)).unwrap();

    let pipeline = AllocationPipeline::from_config(&config(root.path()));
    let err = pipeline.export(Year::new(2020)).unwrap_err();
    assert!(
        matches!(
            err,
            BuildError::Mrio(MrioError::Parse { ref file, .. }) if file.ends_with("Y.txt")
        ),
        "{err}"
    );
    assert!(!pipeline.store().path(Year::new(2020)).exists());

    let lookup = pipeline
        .accessor()
        .get_direct_fce_allocation_factor("DE", "Wheat", Year::new(2020));
    assert!(matches!(lookup, Err(LookupError::TableUnavailable { .. })));
}

#[test]
fn exploitation_uses_configured_thresholds() {
    let yaml = "boundaries:\n  thresholds:\n    Freshwater Use:\n      value: 2000.0\n";
    let config = AssessmentConfig::parse_without_env(yaml).unwrap();
    let sos = config.boundaries.safe_operating_space();

    let climate = MethodKey::planetary_boundary(PlanetaryBoundary::ClimateChange);
    let water = MethodKey::planetary_boundary(PlanetaryBoundary::FreshwaterUse);
    let unknown = MethodKey::new(["Planetary Boundaries", "Novel Entities"]);
    let scores = [(climate.clone(), 0.3), (water.clone(), 3000.0), (unknown.clone(), 1.0)]
        .into_iter()
        .collect();

    let exploitation = calculate_exploitation(&scores, &sos);
    assert_eq!(exploitation[&climate], Some(0.5));
    assert_eq!(exploitation[&water], Some(1.5));
    assert_eq!(exploitation[&unknown], None);
    assert_eq!(exceeded_boundaries(&exploitation), vec![&water]);

    let report = render_report(&exploitation);
    assert!(report.contains("Novel Entities"));
    assert!(report.contains("N/A"));
}
