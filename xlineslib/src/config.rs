//! Run-time settings.
//!
//! Everything a run needs beyond the origin path is carried here and passed
//! down explicitly: where the exclusion list lives and how the report is laid
//! out.

use std::path::PathBuf;

use crate::error::XlinesError;
use crate::exclusions::ExclusionFile;
use crate::report::Layout;
use crate::Result;

/// Directory name under the platform configuration directory.
pub const CONFIG_DIR_NAME: &str = "xlines";

/// File name of the persisted exclusion list.
pub const EXCLUSIONS_FILE_NAME: &str = "exclusions.list";

/// Settings for a single invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Backing file of the exclusion list
    pub exclusions: ExclusionFile,
    /// Report layout
    pub layout: Layout,
}

impl Settings {
    /// Settings using the exclusion file in the user's configuration directory.
    ///
    /// Fails with [`XlinesError::ConfigDirUnavailable`] when the platform has
    /// no configuration directory (e.g. `$HOME` unset).
    pub fn resolve() -> Result<Self> {
        Ok(Self::with_exclusions(default_exclusions_path()?))
    }

    /// Settings using an explicit exclusion file.
    pub fn with_exclusions(path: impl Into<PathBuf>) -> Self {
        Self {
            exclusions: ExclusionFile::new(path),
            layout: Layout::default(),
        }
    }

    /// Builder: set the report layout.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

/// `<config_dir>/xlines/exclusions.list`
pub fn default_exclusions_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or(XlinesError::ConfigDirUnavailable)?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(EXCLUSIONS_FILE_NAME))
}
