//! Explicit lookup configuration for emissivity tables.
//!
//! Table versions and the support-data directory are carried in
//! [`TableConfig`] instead of process-wide state; the environment is read
//! only by [`TableConfig::from_env`].

use crate::domain::TableKind;
use std::path::{Path, PathBuf};

pub const DATA_URL: &str = "http://yt-project.org/data";
pub const SUPPORT_DATA_DIR_ENV: &str = "XRAY_SUPPORT_DATA_DIR";
pub const CLOUDY_TABLE_VERSION: u32 = 2;
pub const APEC_TABLE_VERSION: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFormat {
    Hdf5,
    Json,
}

impl TableFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Hdf5 => "h5",
            Self::Json => "json",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "hdf5" | "h5" => Some(Self::Hdf5),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl Default for TableFormat {
    fn default() -> Self {
        if cfg!(feature = "hdf5") {
            Self::Hdf5
        } else {
            Self::Json
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub data_dir: Option<PathBuf>,
    pub support_data_dir: Option<PathBuf>,
    pub cloudy_version: u32,
    pub apec_version: u32,
    pub data_url: String,
    pub format: TableFormat,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            support_data_dir: None,
            cloudy_version: CLOUDY_TABLE_VERSION,
            apec_version: APEC_TABLE_VERSION,
            data_url: DATA_URL.to_string(),
            format: TableFormat::default(),
        }
    }
}

impl TableConfig {
    pub fn from_env() -> Self {
        Self {
            support_data_dir: std::env::var_os(SUPPORT_DATA_DIR_ENV).map(PathBuf::from),
            ..Self::default()
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    pub fn with_support_data_dir(mut self, support_data_dir: impl Into<PathBuf>) -> Self {
        self.support_data_dir = Some(support_data_dir.into());
        self
    }

    pub fn with_format(mut self, format: TableFormat) -> Self {
        self.format = format;
        self
    }

    pub const fn version(&self, kind: TableKind) -> u32 {
        match kind {
            TableKind::Cloudy => self.cloudy_version,
            TableKind::Apec => self.apec_version,
        }
    }

    pub fn file_name(&self, kind: TableKind) -> String {
        format!(
            "{}_emissivity_v{}.{}",
            kind,
            self.version(kind),
            self.format.extension()
        )
    }

    /// Explicit directory first, then the support directory when it exists,
    /// then the working directory.
    pub fn resolve_dir(&self) -> PathBuf {
        if let Some(data_dir) = &self.data_dir {
            return data_dir.clone();
        }

        match &self.support_data_dir {
            Some(support) if support.exists() => support.clone(),
            _ => Path::new(".").to_path_buf(),
        }
    }

    pub fn table_path(&self, kind: TableKind) -> PathBuf {
        self.resolve_dir().join(self.file_name(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::{TableConfig, TableFormat};
    use crate::domain::TableKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn file_names_carry_per_kind_versions() {
        let config = TableConfig::default().with_format(TableFormat::Hdf5);
        assert_eq!(config.file_name(TableKind::Cloudy), "cloudy_emissivity_v2.h5");
        assert_eq!(config.file_name(TableKind::Apec), "apec_emissivity_v3.h5");

        let json = config.with_format(TableFormat::Json);
        assert_eq!(json.file_name(TableKind::Cloudy), "cloudy_emissivity_v2.json");
    }

    #[test]
    fn explicit_directory_wins_over_support_directory() {
        let temp = TempDir::new().expect("tempdir should be created");
        let config = TableConfig::default()
            .with_support_data_dir(temp.path())
            .with_data_dir("tables");
        assert_eq!(config.resolve_dir(), PathBuf::from("tables"));
    }

    #[test]
    fn support_directory_is_used_only_when_present() {
        let temp = TempDir::new().expect("tempdir should be created");
        let present = TableConfig::default().with_support_data_dir(temp.path());
        assert_eq!(present.resolve_dir(), temp.path().to_path_buf());

        let missing = TableConfig::default().with_support_data_dir(temp.path().join("absent"));
        assert_eq!(missing.resolve_dir(), PathBuf::from("."));
    }

    #[test]
    fn format_tokens_are_case_insensitive() {
        assert_eq!(TableFormat::from_token("HDF5"), Some(TableFormat::Hdf5));
        assert_eq!(TableFormat::from_token("h5"), Some(TableFormat::Hdf5));
        assert_eq!(TableFormat::from_token("json"), Some(TableFormat::Json));
        assert_eq!(TableFormat::from_token("fits"), None);
    }
}
