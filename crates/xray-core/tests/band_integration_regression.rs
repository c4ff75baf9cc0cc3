use approx::assert_relative_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use xray_core::common::{TableConfig, TableFormat};
use xray_core::domain::{EmissionComponent, EmissivityError, TableKind, Weighting};
use xray_core::fields::{
    CellCatalog, CosmologicalDistances, EmissivityRequest, Metallicity, calculate_xray_emissivity,
    calculate_xray_fields,
};
use xray_core::integrator::XrayEmissivityIntegrator;

const FLAT_TABLE: &str = r#"{
    "log_T": [6.0, 7.0, 8.0],
    "E": [0.1, 1.0, 10.0],
    "emissivity_primordial": [[1e-23, 1e-23], [1e-23, 1e-23], [1e-23, 1e-23]],
    "emissivity_metals": [[2e-23, 2e-23], [2e-23, 2e-23], [2e-23, 2e-23]],
    "version": 2
}"#;

fn write_table(dir: &Path, file_name: &str, contents: &str) {
    fs::write(dir.join(file_name), contents).expect("table should be written");
}

fn json_config(dir: &Path) -> TableConfig {
    TableConfig::default()
        .with_data_dir(dir)
        .with_format(TableFormat::Json)
}

struct FixedDistances;

impl CosmologicalDistances for FixedDistances {
    fn luminosity_distance_cm(&self, _redshift: f64) -> f64 {
        4.0e27
    }

    fn angular_scale_cm_per_radian(&self, _redshift: f64) -> f64 {
        1.0e27
    }
}

#[test]
fn flat_table_band_integral_matches_clipped_widths() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_table(temp.path(), "cloudy_emissivity_v2.json", FLAT_TABLE);

    let integrator =
        XrayEmissivityIntegrator::new(TableKind::Cloudy, &json_config(temp.path()), 0.0, false)
            .expect("integrator should load");
    let interp = integrator
        .interpolator(EmissionComponent::Primordial, 0.5, 5.0, Weighting::Energy)
        .expect("interpolator should build");

    let expected = 1.0e-23 * 0.5 + 1.0e-23 * 4.0;
    for log_t in [5.0, 6.0, 6.5, 7.0, 8.0, 9.0] {
        assert_relative_eq!(
            10f64.powf(interp.evaluate(0.0, log_t)),
            expected,
            max_relative = 1.0e-12
        );
    }
}

#[test]
fn redshift_moves_band_into_rest_frame() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_table(temp.path(), "cloudy_emissivity_v2.json", FLAT_TABLE);

    let integrator =
        XrayEmissivityIntegrator::new(TableKind::Cloudy, &json_config(temp.path()), 1.0, false)
            .expect("integrator should load");
    let interp = integrator
        .interpolator(EmissionComponent::Primordial, 0.25, 2.5, Weighting::Energy)
        .expect("interpolator should build");

    assert_relative_eq!(
        10f64.powf(interp.evaluate(0.0, 7.0)),
        1.0e-23 * 4.5,
        max_relative = 1.0e-12
    );

    let error = integrator
        .interpolator(EmissionComponent::Primordial, 0.5, 6.0, Weighting::Energy)
        .expect_err("rest-frame band exceeds the table");
    assert!(matches!(error, EmissivityError::EnergyBounds { .. }));
}

#[test]
fn band_edge_within_tolerance_is_accepted() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_table(temp.path(), "cloudy_emissivity_v2.json", FLAT_TABLE);
    let integrator =
        XrayEmissivityIntegrator::new(TableKind::Cloudy, &json_config(temp.path()), 0.0, false)
            .expect("integrator should load");

    assert!(
        integrator
            .interpolator(EmissionComponent::Primordial, 0.5, 10.005, Weighting::Energy)
            .is_ok()
    );
    assert!(
        integrator
            .interpolator(EmissionComponent::Primordial, 0.5, 10.02, Weighting::Energy)
            .is_err()
    );
}

#[test]
fn emissivity_field_end_to_end_with_metallicity() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_table(temp.path(), "cloudy_emissivity_v2.json", FLAT_TABLE);

    let cells = CellCatalog::new()
        .with_field("lognH", vec![-3.0, -1.0])
        .with_field("Tvir", vec![1.0e6, 1.0e7])
        .with_field("gas_metallicity_host", vec![0.0, 0.5]);
    let band = xray_core::domain::EnergyBand::new(0.5, 5.0).expect("band should be valid");
    let request = EmissivityRequest::new("Tvir", band).with_metallicity(Metallicity::host_field());

    let values = calculate_xray_emissivity(&cells, &request, &json_config(temp.path()))
        .expect("emissivity should compute");
    assert_relative_eq!(values[0], 1.0e-6 * 4.5e-23, max_relative = 1.0e-12);
    assert_relative_eq!(values[1], 1.0e-2 * 2.0 * 4.5e-23, max_relative = 1.0e-12);
}

#[test]
fn cosmological_intensity_applies_redshift_to_photons() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_table(temp.path(), "cloudy_emissivity_v2.json", FLAT_TABLE);

    let cells = CellCatalog::new()
        .with_field("lognH", vec![0.0])
        .with_field("T_DF", vec![1.0e7]);
    let band = xray_core::domain::EnergyBand::new(0.1, 1.0).expect("band should be valid");
    let request = EmissivityRequest::new("T_DF", band).with_redshift(1.0);

    let fields = calculate_xray_fields(
        &cells,
        &request,
        &json_config(temp.path()),
        Some(&FixedDistances),
    )
    .expect("fields should compute");

    let intensity = fields.intensity.as_ref().expect("intensity")[0];
    let photon_intensity = fields.photon_intensity.as_ref().expect("photon intensity")[0];
    assert_relative_eq!(
        photon_intensity / fields.photon_emissivity[0],
        2.0 * intensity / fields.emissivity[0],
        max_relative = 1.0e-12
    );
}

#[test]
fn missing_table_names_download_location() {
    let temp = TempDir::new().expect("tempdir should be created");
    let error =
        XrayEmissivityIntegrator::new(TableKind::Apec, &json_config(temp.path()), 0.0, false)
            .expect_err("table should be missing");

    let message = error.to_string();
    assert!(message.contains("apec_emissivity_v3.json"), "{message}");
    assert!(message.contains("http://yt-project.org/data"), "{message}");
    assert_eq!(error.exit_code(), 3);
}

#[test]
fn obsolete_declared_version_is_rejected() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_table(
        temp.path(),
        "cloudy_emissivity_v2.json",
        &FLAT_TABLE.replace("\"version\": 2", "\"version\": 1"),
    );

    let error =
        XrayEmissivityIntegrator::new(TableKind::Cloudy, &json_config(temp.path()), 0.0, false)
            .expect_err("version should be rejected");
    assert!(matches!(
        error,
        EmissivityError::ObsoleteTableVersion {
            found: 1,
            expected: 2,
            ..
        }
    ));
}
