use crate::domain::{EmissivityError, XrayResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const LOG_NH_FIELD: &str = "lognH";
pub const HOST_METALLICITY_FIELD: &str = "gas_metallicity_host";
pub const MASS_FIELD: &str = "mass";
pub const DENSITY_FIELD: &str = "density";

/// Named per-cell arrays.
pub trait CellData {
    fn field(&self, name: &str) -> Option<&[f64]>;

    fn require(&self, name: &str) -> XrayResult<&[f64]> {
        self.field(name)
            .ok_or_else(|| EmissivityError::MissingField(name.to_string()))
    }
}

/// Column-oriented cell table, deserialized from `{"name": [values...]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellCatalog {
    columns: BTreeMap<String, Vec<f64>>,
}

impl CellCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.insert(name.into(), values);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.columns.insert(name.into(), values);
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn load_json(path: impl AsRef<Path>) -> XrayResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| EmissivityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&source).map_err(|error| EmissivityError::Parse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }
}

impl CellData for CellCatalog {
    fn field(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }
}

pub(crate) fn check_length(name: &str, values: &[f64], expected: usize) -> XrayResult<()> {
    if values.len() == expected {
        return Ok(());
    }
    Err(EmissivityError::FieldLengthMismatch {
        field: name.to_string(),
        expected,
        actual: values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::{CellCatalog, CellData};
    use crate::domain::EmissivityError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn catalog_reads_named_columns_from_json() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("cells.json");
        fs::write(&path, r#"{ "lognH": [-3.0, -2.0], "Tvir": [1.0e6, 2.0e6] }"#)
            .expect("cells should be written");

        let catalog = CellCatalog::load_json(&path).expect("catalog should load");
        assert_eq!(catalog.field("Tvir"), Some(&[1.0e6, 2.0e6][..]));
        assert_eq!(catalog.field_names().collect::<Vec<_>>(), vec!["Tvir", "lognH"]);
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let catalog = CellCatalog::new().with_field("lognH", vec![-3.0]);
        let error = catalog.require("T_DF").expect_err("absent");
        assert!(matches!(error, EmissivityError::MissingField(name) if name == "T_DF"));
    }
}
