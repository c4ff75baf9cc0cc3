use super::CliError;
use super::helpers::*;
use serde::Serialize;
use std::path::PathBuf;
use xray_core::analysis::{XrayFractionSummary, xray_fraction_summary};
use xray_core::common::constants::MPC_TO_CM;
use xray_core::domain::EmissionComponent;
use xray_core::fields::{
    EmissivityRequest, XrayFields, calculate_xray_emissivity, calculate_xray_fields,
};
use xray_core::table::{check_version, load_table, locate_table, open_source};

#[derive(clap::Args)]
pub(super) struct InspectArgs {
    #[command(flatten)]
    table: TableArgs,
}

#[derive(clap::Args)]
pub(super) struct BandArgs {
    /// Lower edge of the observer-frame band in keV
    #[arg(long)]
    e_min: f64,

    /// Upper edge of the observer-frame band in keV
    #[arg(long)]
    e_max: f64,

    /// Source redshift
    #[arg(long, default_value_t = 0.0)]
    redshift: f64,

    /// Per-cell metallicity field in solar units
    #[arg(long, conflicts_with = "metallicity")]
    metallicity_field: Option<String>,

    /// Constant metallicity in solar units
    #[arg(long)]
    metallicity: Option<f64>,
}

#[derive(clap::Args)]
pub(super) struct EmissivityArgs {
    /// JSON cell catalog of named columns
    #[arg(long)]
    cells: PathBuf,

    /// Temperature field in K
    #[arg(long, default_value = "Tvir")]
    temperature_field: String,

    #[command(flatten)]
    band: BandArgs,

    /// Report photon-weighted fields instead of energy-weighted ones
    #[arg(long)]
    photons: bool,

    /// Fixed source distance in Mpc for intensity fields
    #[arg(long)]
    distance_mpc: Option<f64>,

    /// JSON report output path
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    table: TableArgs,
}

#[derive(clap::Args)]
pub(super) struct FractionArgs {
    /// JSON cell catalog of named columns
    #[arg(long)]
    cells: PathBuf,

    /// Temperature field in K
    #[arg(long, default_value = "Tvir")]
    temperature_field: String,

    /// Heating rate per unit volume, in the emissivity's units
    #[arg(long)]
    heating_field: String,

    /// Net heating (1) or cooling (-1) flag per cell
    #[arg(long)]
    flag_field: Option<String>,

    #[command(flatten)]
    band: BandArgs,

    /// JSON report output path
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    table: TableArgs,
}

impl BandArgs {
    fn into_request(self, temperature_field: String) -> Result<EmissivityRequest, CliError> {
        let band = energy_band(self.e_min, self.e_max)?;
        Ok(EmissivityRequest::new(temperature_field, band)
            .with_redshift(self.redshift)
            .with_metallicity(metallicity_choice(self.metallicity_field, self.metallicity)))
    }
}

#[derive(Debug, Serialize)]
struct EmissivityReport {
    table_type: String,
    e_min: f64,
    e_max: f64,
    redshift: f64,
    cells: usize,
    fields: XrayFields,
}

#[derive(Debug, Serialize)]
struct FractionReport {
    table_type: String,
    e_min: f64,
    e_max: f64,
    heating_field: String,
    summary: XrayFractionSummary,
}

pub(super) fn run_inspect_command(args: InspectArgs) -> Result<i32, CliError> {
    let kind = args.table.table_kind()?;
    let config = args.table.to_config()?;
    let path = locate_table(&config, kind)?;
    let source = open_source(&path, config.format)?;
    let has_metals = source.contains(EmissionComponent::Metals.dataset_name());
    let table = load_table(source.as_ref(), has_metals)?;
    check_version(&table, &config, kind)?;

    let (lower, upper) = table.energy_bounds();
    let log_t = table.log_t();
    println!("Table: {}", path.display());
    println!(
        "Type: {} (version {})",
        kind,
        table
            .version()
            .map_or_else(|| "undeclared".to_string(), |version| format!("v{version}"))
    );
    println!(
        "Temperature grid: {} points, log T {} to {}",
        log_t.len(),
        log_t[0],
        log_t[log_t.len() - 1]
    );
    match table.log_nh() {
        Some(log_nh) => println!(
            "Density grid: {} points, log nH {} to {}",
            log_nh.len(),
            log_nh[0],
            log_nh[log_nh.len() - 1]
        ),
        None => println!("Density grid: none"),
    }
    println!(
        "Energy bins: {}, {:e} to {:e} keV",
        table.bin_count(),
        lower,
        upper
    );
    println!("Metals: {}", if table.has_metals() { "yes" } else { "no" });
    Ok(0)
}

pub(super) fn run_emissivity_command(args: EmissivityArgs) -> Result<i32, CliError> {
    let kind = args.table.table_kind()?;
    let config = args.table.to_config()?;
    let cells = load_cells(&args.cells)?;
    let (e_min, e_max, redshift) = (args.band.e_min, args.band.e_max, args.band.redshift);
    let mut request = args
        .band
        .into_request(args.temperature_field)?
        .with_table_kind(kind);
    if let Some(distance_mpc) = args.distance_mpc {
        request = request.with_distance_cm(distance_mpc * MPC_TO_CM);
    }

    let fields = calculate_xray_fields(&cells, &request, &config, None)?;
    println!("Band: {} ({}, z = {})", fields.label, kind, redshift);
    println!("Cells: {}", fields.emissivity.len());
    if args.photons {
        println!(
            "{}",
            render_stats("Photon emissivity", "photons/s/cm^3", &fields.photon_emissivity)
        );
        if let Some(photon_intensity) = &fields.photon_intensity {
            println!(
                "{}",
                render_stats(
                    "Photon intensity",
                    "photons/s/cm^3/arcsec^2",
                    photon_intensity
                )
            );
        }
    } else {
        println!(
            "{}",
            render_stats("Emissivity", "erg/s/cm^3", &fields.emissivity)
        );
        if let Some(luminosity) = &fields.luminosity {
            println!("{}", render_stats("Luminosity", "erg/s", luminosity));
        }
        if let Some(intensity) = &fields.intensity {
            println!(
                "{}",
                render_stats("Intensity", "erg/s/cm^3/arcsec^2", intensity)
            );
        }
    }
    println!("Zeroed cells: {}", fields.zeroed_cells);

    if let Some(output) = &args.output {
        let report = EmissivityReport {
            table_type: kind.to_string(),
            e_min,
            e_max,
            redshift,
            cells: fields.emissivity.len(),
            fields,
        };
        write_json_report(output, &report)?;
        println!("JSON report: {}", output.display());
    }
    Ok(0)
}

pub(super) fn run_fraction_command(args: FractionArgs) -> Result<i32, CliError> {
    let kind = args.table.table_kind()?;
    let config = args.table.to_config()?;
    let cells = load_cells(&args.cells)?;
    let (e_min, e_max) = (args.band.e_min, args.band.e_max);
    let request = args
        .band
        .into_request(args.temperature_field)?
        .with_table_kind(kind);

    let emissivity = calculate_xray_emissivity(&cells, &request, &config)?;
    let heating = require_field(&cells, &args.heating_field)?;
    let flags = args
        .flag_field
        .as_deref()
        .map(|name| require_field(&cells, name))
        .transpose()?;
    let summary = xray_fraction_summary(&emissivity, heating, flags)?;

    println!("Band: {} ({})", request.band.label(), kind);
    println!("Cells: {}", summary.cells);
    println!("Max X-ray fraction: {:.6e}", summary.max_fraction);
    println!(
        "Heating-weighted mean X-ray fraction: {:.6e}",
        summary.heating_weighted_mean
    );
    match (summary.min_log10_fraction, summary.max_log10_fraction) {
        (Some(min), Some(max)) => println!("log10 fraction range: {min:.3} to {max:.3}"),
        _ => println!("log10 fraction range: none"),
    }
    if flags.is_some() {
        println!(
            "Net heating cells: {}, net cooling cells: {}",
            summary.net_heating_cells, summary.net_cooling_cells
        );
    }

    if let Some(output) = &args.output {
        let report = FractionReport {
            table_type: kind.to_string(),
            e_min,
            e_max,
            heating_field: args.heating_field.clone(),
            summary,
        };
        write_json_report(output, &report)?;
        println!("JSON report: {}", output.display());
    }
    Ok(0)
}
