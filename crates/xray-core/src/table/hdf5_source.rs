use super::source::TableSource;
use crate::domain::{EmissivityError, XrayResult};
use hdf5::File;
use ndarray::{ArrayD, IxDyn};
use std::path::{Path, PathBuf};

pub struct Hdf5TableSource {
    path: PathBuf,
    file: File,
    members: Vec<String>,
}

impl Hdf5TableSource {
    pub fn open(path: impl AsRef<Path>) -> XrayResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|error| parse_error(&path, error))?;
        let members = file
            .member_names()
            .map_err(|error| parse_error(&path, error))?;
        Ok(Self {
            path,
            file,
            members,
        })
    }
}

impl TableSource for Hdf5TableSource {
    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn contains(&self, dataset: &str) -> bool {
        self.members.iter().any(|member| member == dataset)
    }

    fn read_dataset(&self, dataset: &str) -> XrayResult<ArrayD<f64>> {
        if !self.contains(dataset) {
            return Err(EmissivityError::MissingDataset {
                source_name: self.source_name(),
                dataset: dataset.to_string(),
            });
        }

        let handle = self
            .file
            .dataset(dataset)
            .map_err(|error| parse_error(&self.path, error))?;
        let shape = handle.shape();
        let raw: Vec<f64> = handle
            .read_raw()
            .map_err(|error| parse_error(&self.path, error))?;
        ArrayD::from_shape_vec(IxDyn(&shape), raw).map_err(|error| EmissivityError::Parse {
            path: self.path.clone(),
            message: format!("dataset '{}': {}", dataset, error),
        })
    }

    fn declared_version(&self) -> XrayResult<Option<u32>> {
        let names = self
            .file
            .attr_names()
            .map_err(|error| parse_error(&self.path, error))?;
        if !names.iter().any(|name| name == "version") {
            return Ok(None);
        }

        let version = self
            .file
            .attr("version")
            .and_then(|attr| attr.read_scalar::<u32>())
            .map_err(|error| parse_error(&self.path, error))?;
        Ok(Some(version))
    }
}

fn parse_error(path: &Path, error: hdf5::Error) -> EmissivityError {
    EmissivityError::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
