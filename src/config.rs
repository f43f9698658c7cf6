use crate::actions::{ActionCatalog, ImprovementAction};
use crate::error::{Result, WasteVizError};
use crate::waste::WasteType;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "wastedata.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "figs";
pub const FORMAT_SVG: &str = "svg";
pub const FORMAT_JSON: &str = "json";

/// Tool configuration, loaded from a TOML file or defaulted.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Optional catalog override; when present it replaces the compiled-in
    /// action set entirely.
    pub actions: Option<Vec<ActionEntry>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    pub csv_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub format: String, // "svg" | "json"
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: FORMAT_SVG.to_string(),
        }
    }
}

/// One catalog entry as written in TOML. The waste type is a plain string
/// here so a typo surfaces as a config error, not a deserialization panic.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActionEntry {
    pub waste_type: String,
    pub label: String,
    pub reduction: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            output: OutputConfig::default(),
            actions: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WasteVizError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            WasteVizError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.output.format.as_str() {
            FORMAT_SVG | FORMAT_JSON => {}
            other => {
                return Err(WasteVizError::Config(format!(
                    "Invalid output format: {}. Must be 'svg' or 'json'",
                    other
                )));
            }
        }

        if let Some(entries) = &self.actions {
            if entries.is_empty() {
                return Err(WasteVizError::Config(
                    "actions override cannot be empty; omit the table to use the default catalog"
                        .to_string(),
                ));
            }
            for entry in entries {
                entry.resolve()?;
            }
        }

        Ok(())
    }

    /// The action catalog this run uses: the config override when present,
    /// otherwise the compiled-in default.
    pub fn catalog(&self) -> Result<ActionCatalog> {
        match &self.actions {
            Some(entries) => {
                let actions = entries
                    .iter()
                    .map(ActionEntry::resolve)
                    .collect::<Result<Vec<_>>>()?;
                ActionCatalog::from_entries(actions)
            }
            None => Ok(ActionCatalog::default()),
        }
    }
}

impl ActionEntry {
    fn resolve(&self) -> Result<ImprovementAction> {
        let waste_type: WasteType = self.waste_type.parse().map_err(|_| {
            WasteVizError::Config(format!(
                "Invalid waste type '{}' for action '{}'. Must be one of Disposed, Recycle, Organics, Other",
                self.waste_type, self.label
            ))
        })?;
        ImprovementAction::new(waste_type, self.label.clone(), self.reduction)
    }
}
