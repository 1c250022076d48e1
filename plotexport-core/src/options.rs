use crate::format::{DataFormat, ImageFormat};
use crate::ExportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE_NAME: &str = "plot_data";
pub const DEFAULT_DECK_FILE_NAME: &str = "plots.pptx";
pub const DEFAULT_VEGA_FILE_NAME: &str = "plots.json";
pub const DEFAULT_DPI: u32 = 100;
pub const DEFAULT_JSON_INDENT: usize = 4;
pub const MAX_HDF5_COMPRESSION_LEVEL: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetFormat {
    #[default]
    ImageFolder,
    SlideDeck,
    VegaDocument,
}

impl TargetFormat {
    pub fn name(self) -> &'static str {
        match self {
            TargetFormat::ImageFolder => "image-folder",
            TargetFormat::SlideDeck => "slide-deck",
            TargetFormat::VegaDocument => "vega-document",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace('_', "-").as_str() {
            "image-folder" | "images" => Some(TargetFormat::ImageFolder),
            "slide-deck" | "pptx" | "slides" => Some(TargetFormat::SlideDeck),
            "vega-document" | "vega" => Some(TargetFormat::VegaDocument),
            _ => None,
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataExportMode {
    #[default]
    None,
    Yes,
    Inline,
    InFile,
    SeparateFile,
}

impl DataExportMode {
    pub fn name(self) -> &'static str {
        match self {
            DataExportMode::None => "none",
            DataExportMode::Yes => "yes",
            DataExportMode::Inline => "inline",
            DataExportMode::InFile => "in-file",
            DataExportMode::SeparateFile => "separate-file",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "none" | "no" => Some(DataExportMode::None),
            "yes" => Some(DataExportMode::Yes),
            "inline" => Some(DataExportMode::Inline),
            "in-file" => Some(DataExportMode::InFile),
            "separate-file" => Some(DataExportMode::SeparateFile),
            _ => None,
        }
    }
}

impl fmt::Display for DataExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Data-export modes a target format accepts.
pub fn legal_data_modes(target: TargetFormat) -> &'static [DataExportMode] {
    match target {
        TargetFormat::ImageFolder | TargetFormat::SlideDeck => {
            &[DataExportMode::None, DataExportMode::Yes]
        }
        TargetFormat::VegaDocument => &[
            DataExportMode::None,
            DataExportMode::Inline,
            DataExportMode::InFile,
            DataExportMode::SeparateFile,
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageFolderOptions {
    pub format: ImageFormat,
    pub dpi: u32,
    pub filename_from_title: bool,
}

impl Default for ImageFolderOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            dpi: DEFAULT_DPI,
            filename_from_title: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideDeckOptions {
    pub file_name: String,
    pub title: String,
    pub subtitle: String,
    pub image_format: ImageFormat,
    pub dpi: u32,
}

impl Default for SlideDeckOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_DECK_FILE_NAME.to_string(),
            title: "Plots".to_string(),
            subtitle: String::new(),
            image_format: ImageFormat::Png,
            dpi: DEFAULT_DPI,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegaOptions {
    /// Document file written inside the destination directory; `None` keeps
    /// the document in memory only.
    pub file_name: Option<String>,
    /// Indent width for pretty printing; `None` writes compact JSON.
    pub indent: Option<usize>,
}

impl Default for VegaOptions {
    fn default() -> Self {
        Self {
            file_name: Some(DEFAULT_VEGA_FILE_NAME.to_string()),
            indent: Some(DEFAULT_JSON_INDENT),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hdf5Options {
    /// Deflate level, 0 disables compression.
    pub compression_level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub target: TargetFormat,
    pub destination: PathBuf,
    pub export_data: DataExportMode,
    pub export_each_plot_data: bool,
    pub data_file_name: String,
    pub data_format: DataFormat,
    pub include_index: bool,
    pub skip_hidden: bool,
    pub overwrite: bool,
    pub interactive: bool,
    pub image: ImageFolderOptions,
    pub slides: SlideDeckOptions,
    pub vega: VegaOptions,
    pub hdf5: Hdf5Options,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            target: TargetFormat::ImageFolder,
            destination: PathBuf::from("."),
            export_data: DataExportMode::None,
            export_each_plot_data: false,
            data_file_name: DEFAULT_DATA_FILE_NAME.to_string(),
            data_format: DataFormat::Csv,
            include_index: true,
            skip_hidden: true,
            overwrite: false,
            interactive: false,
            image: ImageFolderOptions::default(),
            slides: SlideDeckOptions::default(),
            vega: VegaOptions::default(),
            hdf5: Hdf5Options::default(),
        }
    }
}

impl ExportOptions {
    pub fn for_target(target: TargetFormat, destination: impl Into<PathBuf>) -> Self {
        Self {
            target,
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        if !legal_data_modes(self.target).contains(&self.export_data) {
            return Err(ExportError::InvalidDataExportMode {
                mode: self.export_data.to_string(),
                target: self.target.to_string(),
            });
        }
        if self.destination.as_os_str().is_empty() {
            return Err(ExportError::Options(
                "destination directory must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Data base name with any extension the user typed stripped off.
    pub fn data_base_name(&self) -> &str {
        let name = self.data_file_name.trim();
        Path::new(name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or(DEFAULT_DATA_FILE_NAME)
    }
}

pub fn normalize_export_options(mut options: ExportOptions) -> ExportOptions {
    options.image.dpi = options.image.dpi.max(1);
    options.slides.dpi = options.slides.dpi.max(1);
    options.hdf5.compression_level = options
        .hdf5
        .compression_level
        .min(MAX_HDF5_COMPRESSION_LEVEL);
    if options.data_file_name.trim().is_empty() {
        options.data_file_name = DEFAULT_DATA_FILE_NAME.to_string();
    }
    if options.slides.file_name.trim().is_empty() {
        options.slides.file_name = DEFAULT_DECK_FILE_NAME.to_string();
    }
    if let Some(name) = options.vega.file_name.as_deref() {
        if name.trim().is_empty() {
            options.vega.file_name = None;
        }
    }
    options
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("toml")
}

pub fn load_options_file(path: &Path) -> Result<ExportOptions, ExportError> {
    let data = std::fs::read_to_string(path)?;
    let options: ExportOptions = if is_toml(path) {
        toml::from_str(&data).map_err(|e| {
            ExportError::Options(format!(
                "failed to parse options file '{}': {e}",
                path.display()
            ))
        })?
    } else {
        serde_json::from_str(&data)?
    };
    Ok(normalize_export_options(options))
}

pub fn save_options_file(path: &Path, options: &ExportOptions) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = if is_toml(path) {
        toml::to_string_pretty(options)
            .map_err(|e| ExportError::Options(format!("failed to serialize options: {e}")))?
    } else {
        serde_json::to_string_pretty(options)?
    };
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vega_accepts_only_embedding_modes() {
        let modes = legal_data_modes(TargetFormat::VegaDocument);
        assert!(!modes.contains(&DataExportMode::Yes));
        assert!(modes.contains(&DataExportMode::SeparateFile));
    }

    #[test]
    fn validate_rejects_mode_for_wrong_target() {
        let mut options = ExportOptions::for_target(TargetFormat::SlideDeck, "out");
        options.export_data = DataExportMode::Inline;
        let err = options.validate().unwrap_err();
        assert!(matches!(
            err,
            ExportError::InvalidDataExportMode { ref mode, ref target }
                if mode == "inline" && target == "slide-deck"
        ));

        options.export_data = DataExportMode::Yes;
        assert!(options.validate().is_ok());
    }

    #[test]
    fn normalize_clamps_values() {
        let mut options = ExportOptions::default();
        options.image.dpi = 0;
        options.hdf5.compression_level = 42;
        options.data_file_name = "  ".to_string();
        options.vega.file_name = Some(String::new());
        let options = normalize_export_options(options);
        assert_eq!(options.image.dpi, 1);
        assert_eq!(options.hdf5.compression_level, 9);
        assert_eq!(options.data_file_name, DEFAULT_DATA_FILE_NAME);
        assert_eq!(options.vega.file_name, None);
    }

    #[test]
    fn data_base_name_strips_extension() {
        let mut options = ExportOptions::default();
        options.data_file_name = "results.csv".to_string();
        assert_eq!(options.data_base_name(), "results");
    }

    #[test]
    fn mode_names_parse() {
        for mode in [
            DataExportMode::None,
            DataExportMode::Yes,
            DataExportMode::Inline,
            DataExportMode::InFile,
            DataExportMode::SeparateFile,
        ] {
            assert_eq!(DataExportMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(
            DataExportMode::from_name("Separate File"),
            Some(DataExportMode::SeparateFile)
        );
    }
}
