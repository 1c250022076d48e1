use super::encoding::encoding;
use crate::format::DataFormat;
use crate::paths::check_overwrite;
use crate::tabular::{export_table, TableExportSettings};
use crate::ExportError;
use plot_model::{DataTable, PlotConfiguration};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{json, Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v3.json";

/// Where a document's data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedMode {
    /// `data: {}`
    Omit,
    /// Records of the source table written into the document.
    Inline,
    /// Source table written to this CSV path, referenced by `data.url`.
    File(PathBuf),
    /// Named dataset living elsewhere, referenced by `data.name`.
    Reference(String),
    /// Already written file, referenced by `data.url` without any I/O.
    Url(String),
}

impl EmbedMode {
    /// Parses an embedding argument: `inline`/`true`, `false`/`none`, a path
    /// ending in `.csv`, or an extension-less dataset name. Surrounding
    /// whitespace is ignored when classifying, but paths and names are kept
    /// exactly as given.
    pub fn parse(arg: &str) -> Result<Self, ExportError> {
        let trimmed = arg.trim();
        match trimmed.to_lowercase().as_str() {
            "inline" | "true" => return Ok(EmbedMode::Inline),
            "false" | "none" => return Ok(EmbedMode::Omit),
            "" => return Err(ExportError::InvalidExportDataArgument(arg.to_string())),
            _ => {}
        }
        match Path::new(trimmed).extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(EmbedMode::File(PathBuf::from(arg))),
            Some(_) => Err(ExportError::InvalidExportDataArgument(arg.to_string())),
            None => Ok(EmbedMode::Reference(arg.to_string())),
        }
    }
}

impl From<bool> for EmbedMode {
    fn from(embed: bool) -> Self {
        if embed {
            EmbedMode::Inline
        } else {
            EmbedMode::Omit
        }
    }
}

/// `{values, "index-name"}` block for inline embedding.
pub fn inline_data(table: &DataTable) -> Value {
    json!({
        "values": table.records(),
        "index-name": table.index_label(),
    })
}

/// Assembles single-plot Vega-Lite documents.
#[derive(Debug, Clone)]
pub struct VegaDocumentBuilder {
    pub overwrite: bool,
    pub include_index: bool,
}

impl Default for VegaDocumentBuilder {
    fn default() -> Self {
        Self {
            overwrite: false,
            include_index: true,
        }
    }
}

impl VegaDocumentBuilder {
    pub fn new(overwrite: bool) -> Self {
        Self {
            overwrite,
            ..Self::default()
        }
    }

    /// `data` block for `mode`. File mode writes the source table as a side
    /// effect.
    pub fn data_block(&self, source: &DataTable, mode: &EmbedMode) -> Result<Value, ExportError> {
        let block = match mode {
            EmbedMode::Omit => json!({}),
            EmbedMode::Inline => inline_data(source),
            EmbedMode::File(path) => {
                let settings = TableExportSettings {
                    include_index: self.include_index,
                    overwrite: self.overwrite,
                    ..TableExportSettings::default()
                };
                export_table(path, source, "data", DataFormat::Csv, &settings)?;
                json!({"url": path.to_string_lossy()})
            }
            EmbedMode::Reference(name) => json!({"name": name}),
            EmbedMode::Url(url) => json!({"url": url}),
        };
        Ok(block)
    }

    /// Full document for one plot: schema, data block, mark and encoding.
    pub fn document(
        &self,
        config: &PlotConfiguration,
        mode: &EmbedMode,
    ) -> Result<Value, ExportError> {
        let mut doc = Map::new();
        doc.insert("$schema".to_string(), json!(SCHEMA));
        doc.insert("data".to_string(), self.data_block(&config.source, mode)?);
        if let Value::Object(fragment) = encoding(config)? {
            doc.extend(fragment);
        }
        Ok(Value::Object(doc))
    }

    /// Serializes `doc` to `path`, pretty printed with `indent` spaces or
    /// compact when `indent` is `None`.
    pub fn write_document(
        &self,
        doc: &Value,
        path: &Path,
        indent: Option<usize>,
    ) -> Result<(), ExportError> {
        check_overwrite(path, self.overwrite)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        match indent {
            Some(width) => {
                let indent = " ".repeat(width);
                let formatter = PrettyFormatter::with_indent(indent.as_bytes());
                let mut ser = Serializer::with_formatter(&mut writer, formatter);
                doc.serialize(&mut ser)?;
            }
            None => serde_json::to_writer(&mut writer, doc)?,
        }
        writer.write_all(b"\n")?;
        writer.flush()?;
        log::info!("wrote Vega-Lite document {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_embedding_arguments() {
        assert_eq!(EmbedMode::parse("inline").unwrap(), EmbedMode::Inline);
        assert_eq!(EmbedMode::parse("True").unwrap(), EmbedMode::Inline);
        assert_eq!(EmbedMode::parse("false").unwrap(), EmbedMode::Omit);
        assert_eq!(
            EmbedMode::parse("out/data.csv").unwrap(),
            EmbedMode::File(PathBuf::from("out/data.csv"))
        );
        assert_eq!(
            EmbedMode::parse("shared").unwrap(),
            EmbedMode::Reference("shared".to_string())
        );
        assert!(matches!(
            EmbedMode::parse("data.json"),
            Err(ExportError::InvalidExportDataArgument(_))
        ));
        assert!(matches!(
            EmbedMode::parse("  "),
            Err(ExportError::InvalidExportDataArgument(_))
        ));
    }

    #[test]
    fn parsed_names_and_paths_keep_surrounding_whitespace() {
        assert_eq!(
            EmbedMode::parse(" shared ").unwrap(),
            EmbedMode::Reference(" shared ".to_string())
        );
        assert_eq!(
            EmbedMode::parse("out/data.csv ").unwrap(),
            EmbedMode::File(PathBuf::from("out/data.csv "))
        );
        assert_eq!(EmbedMode::parse(" Inline ").unwrap(), EmbedMode::Inline);

        let source = DataTable::with_range_index(1);
        let block = VegaDocumentBuilder::default()
            .data_block(&source, &EmbedMode::parse(" shared ").unwrap())
            .unwrap();
        assert_eq!(block, json!({"name": " shared "}));
    }

    #[test]
    fn bool_maps_to_inline_or_omit() {
        assert_eq!(EmbedMode::from(true), EmbedMode::Inline);
        assert_eq!(EmbedMode::from(false), EmbedMode::Omit);
    }

    #[test]
    fn compact_and_pretty_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let builder = VegaDocumentBuilder::new(true);
        let doc = json!({"mark": "bar", "data": {}});

        let compact = dir.path().join("compact.json");
        builder.write_document(&doc, &compact, None).unwrap();
        let text = std::fs::read_to_string(&compact).unwrap();
        assert_eq!(text, "{\"mark\":\"bar\",\"data\":{}}\n");

        let pretty = dir.path().join("pretty.json");
        builder.write_document(&doc, &pretty, Some(2)).unwrap();
        let text = std::fs::read_to_string(&pretty).unwrap();
        assert!(text.contains("\n  \"mark\": \"bar\""));
    }
}
