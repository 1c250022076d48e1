//! Vega-Lite output: per-plot encodings, document assembly and the reverse
//! reader.

mod document;
mod encoding;
mod reverse;

pub use self::document::{inline_data, EmbedMode, VegaDocumentBuilder, SCHEMA};
pub use self::encoding::{encoding, kind_for_name, mark_for_kind};
pub use self::reverse::{config_from_document, configs_from_document};
