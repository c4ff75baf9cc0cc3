use super::{EmissionComponent, TableKind};
use std::path::PathBuf;

pub type XrayResult<T> = Result<T, EmissivityError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl ErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
            Self::InternalError => "InternalError",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmissivityError {
    #[error("Failed to find emissivity data file {file_name}! Please download from {url}")]
    MissingDataFile {
        file_name: String,
        path: PathBuf,
        url: String,
    },
    #[error("Energy bounds are {lower:e} to {upper:e} keV.")]
    EnergyBounds { lower: f64, upper: f64 },
    #[error(
        "X-ray emissivity data is out of date (found v{found}, expected v{expected}).\nDownload the latest data from {url}/{file_name}."
    )]
    ObsoleteTableVersion {
        found: u32,
        expected: u32,
        file_name: String,
        url: String,
    },
    #[error("invalid energy band [{e_min}, {e_max}] keV: {reason}")]
    InvalidBand {
        e_min: f64,
        e_max: f64,
        reason: &'static str,
    },
    #[error("unknown table type '{0}'; expected 'cloudy' or 'apec'")]
    UnknownTableKind(String),
    #[error("emissivity table '{source_name}' is missing dataset '{dataset}'")]
    MissingDataset {
        source_name: String,
        dataset: String,
    },
    #[error("invalid emissivity table: {0}")]
    InvalidTable(String),
    #[error("{component} emissivity was not loaded; load the table with metals enabled")]
    ComponentNotLoaded { component: EmissionComponent },
    #[error("cell data has no field '{0}'")]
    MissingField(String),
    #[error("field '{field}' has {actual} cells, expected {expected}")]
    FieldLengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },
    #[error("table type '{0}' is not supported for field assembly; only 'cloudy' tables are")]
    UnsupportedTable(TableKind),
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl EmissivityError {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::EnergyBounds { .. }
            | Self::InvalidBand { .. }
            | Self::UnknownTableKind(_)
            | Self::ComponentNotLoaded { .. }
            | Self::MissingField(_)
            | Self::FieldLengthMismatch { .. }
            | Self::UnsupportedTable(_) => ErrorCategory::InputValidationError,
            Self::MissingDataFile { .. }
            | Self::ObsoleteTableVersion { .. }
            | Self::MissingDataset { .. }
            | Self::Io { .. }
            | Self::Parse { .. } => ErrorCategory::IoSystemError,
            Self::InvalidTable(_) => ErrorCategory::ComputationError,
        }
    }

    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::MissingDataFile { .. } => "IO.TABLE_MISSING",
            Self::EnergyBounds { .. } => "INPUT.ENERGY_BOUNDS",
            Self::ObsoleteTableVersion { .. } => "IO.TABLE_OBSOLETE",
            Self::InvalidBand { .. } => "INPUT.ENERGY_BAND",
            Self::UnknownTableKind(_) => "INPUT.TABLE_TYPE",
            Self::MissingDataset { .. } => "IO.TABLE_DATASET",
            Self::InvalidTable(_) => "RUN.TABLE_SHAPE",
            Self::ComponentNotLoaded { .. } => "INPUT.TABLE_COMPONENT",
            Self::MissingField(_) => "INPUT.CELL_FIELD",
            Self::FieldLengthMismatch { .. } => "INPUT.CELL_LENGTH",
            Self::UnsupportedTable(_) => "INPUT.TABLE_UNSUPPORTED",
            Self::Io { .. } => "IO.READ",
            Self::Parse { .. } => "IO.PARSE",
        }
    }

    pub const fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder(), self)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}
