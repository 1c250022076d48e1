use super::{export_data, ExportOutcome, PlotManagerExporter};
use crate::format::ImageFormat;
use crate::paths::{check_overwrite, ensure_dir, sanitize_file_stem};
use crate::ExportError;
use plot_model::PlotCollection;

/// `<index>_<title>.<ext>` when titles are used and the sanitized title is
/// not empty, `<index>.<ext>` otherwise.
pub fn image_file_name(index: usize, title: &str, from_title: bool, format: ImageFormat) -> String {
    let stem = sanitize_file_stem(title);
    if from_title && !stem.is_empty() {
        format!("{index}_{stem}.{}", format.extension())
    } else {
        format!("{index}.{}", format.extension())
    }
}

impl PlotManagerExporter {
    pub(super) fn export_images(
        &mut self,
        collection: &PlotCollection,
    ) -> Result<ExportOutcome, ExportError> {
        let renderer = self
            .renderer
            .as_deref_mut()
            .ok_or_else(|| ExportError::Render("no plot renderer attached".to_string()))?;
        let options = &self.options;
        let image = &options.image;
        ensure_dir(&options.destination)?;
        let data_file = export_data(options, collection)?;

        let mut files = Vec::new();
        for (idx, desc) in collection.exportable(options.skip_hidden) {
            let name = image_file_name(idx, &desc.title, image.filename_from_title, image.format);
            let path = options.destination.join(name);
            check_overwrite(&path, options.overwrite)?;
            renderer.render(desc.handle, &path, image.dpi, image.format)?;
            log::info!("plot {idx} saved to {}", path.display());
            files.push(path);
        }
        Ok(ExportOutcome {
            files,
            data_file,
            document: None,
        })
    }
}
