use crate::domain::{EmissivityError, XrayResult};
use ndarray::{ArrayD, IxDyn};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Named numeric datasets backing an emissivity table.
pub trait TableSource {
    fn source_name(&self) -> String;

    fn contains(&self, dataset: &str) -> bool;

    fn read_dataset(&self, dataset: &str) -> XrayResult<ArrayD<f64>>;

    /// Integer `version` recorded in the file, if any.
    fn declared_version(&self) -> XrayResult<Option<u32>>;

    fn read_vector(&self, dataset: &str) -> XrayResult<Vec<f64>> {
        let array = self.read_dataset(dataset)?;
        if array.ndim() != 1 {
            return Err(EmissivityError::InvalidTable(format!(
                "dataset '{}' in '{}' must be one-dimensional, found shape {:?}",
                dataset,
                self.source_name(),
                array.shape()
            )));
        }
        Ok(array.into_iter().collect())
    }
}

/// JSON document with the same dataset names as the HDF5 tables; arrays are
/// nested lists.
#[derive(Debug, Clone)]
pub struct JsonTableSource {
    path: PathBuf,
    datasets: Map<String, Value>,
}

impl JsonTableSource {
    pub fn open(path: impl AsRef<Path>) -> XrayResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| EmissivityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_document(path, &source)
    }

    pub fn from_document(path: impl Into<PathBuf>, source: &str) -> XrayResult<Self> {
        let path = path.into();
        let document: Value =
            serde_json::from_str(source).map_err(|error| EmissivityError::Parse {
                path: path.clone(),
                message: error.to_string(),
            })?;
        let Value::Object(datasets) = document else {
            return Err(EmissivityError::Parse {
                path,
                message: "top-level value must be an object of datasets".to_string(),
            });
        };
        Ok(Self { path, datasets })
    }

    fn parse_error(&self, message: String) -> EmissivityError {
        EmissivityError::Parse {
            path: self.path.clone(),
            message,
        }
    }
}

impl TableSource for JsonTableSource {
    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn contains(&self, dataset: &str) -> bool {
        self.datasets.contains_key(dataset)
    }

    fn read_dataset(&self, dataset: &str) -> XrayResult<ArrayD<f64>> {
        let value = self
            .datasets
            .get(dataset)
            .ok_or_else(|| EmissivityError::MissingDataset {
                source_name: self.source_name(),
                dataset: dataset.to_string(),
            })?;
        json_to_array(value).ok_or_else(|| {
            self.parse_error(format!(
                "dataset '{}' is not a rectangular array of numbers",
                dataset
            ))
        })
    }

    fn declared_version(&self) -> XrayResult<Option<u32>> {
        match self.datasets.get("version") {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|version| u32::try_from(version).ok())
                .map(Some)
                .ok_or_else(|| self.parse_error(format!("invalid table version {}", value))),
        }
    }
}

fn json_to_array(value: &Value) -> Option<ArrayD<f64>> {
    let mut shape = Vec::new();
    let mut probe = value;
    while let Value::Array(items) = probe {
        shape.push(items.len());
        match items.first() {
            Some(first) => probe = first,
            None => break,
        }
    }

    let mut flat = Vec::new();
    collect_leaves(value, &shape, 0, &mut flat)?;
    ArrayD::from_shape_vec(IxDyn(&shape), flat).ok()
}

fn collect_leaves(value: &Value, shape: &[usize], depth: usize, out: &mut Vec<f64>) -> Option<()> {
    match value {
        Value::Array(items) => {
            if shape.get(depth) != Some(&items.len()) {
                return None;
            }
            for item in items {
                collect_leaves(item, shape, depth + 1, out)?;
            }
            Some(())
        }
        Value::Number(number) if depth == shape.len() => {
            out.push(number.as_f64()?);
            Some(())
        }
        _ => None,
    }
}
