use super::{export_data, image_file_name, ExportOutcome, PlotManagerExporter};
use crate::paths::{check_overwrite, ensure_dir};
use crate::ExportError;
use plot_model::PlotCollection;

impl PlotManagerExporter {
    pub(super) fn export_slides(
        &mut self,
        collection: &PlotCollection,
    ) -> Result<ExportOutcome, ExportError> {
        let presentation = self.presentation.as_deref_mut().ok_or_else(|| {
            ExportError::Presentation("no presentation builder attached".to_string())
        })?;
        let renderer = self
            .renderer
            .as_deref_mut()
            .ok_or_else(|| ExportError::Render("no plot renderer attached".to_string()))?;
        let options = &self.options;
        let slides = &options.slides;
        ensure_dir(&options.destination)?;
        let data_file = export_data(options, collection)?;

        let deck_path = options.destination.join(&slides.file_name);
        check_overwrite(&deck_path, options.overwrite)?;
        let deck = presentation.create_deck()?;
        presentation.add_title_slide(deck, &slides.title, &slides.subtitle)?;

        // slide images only live until they are embedded
        let scratch = tempfile::tempdir()?;
        for (idx, desc) in collection.exportable(options.skip_hidden) {
            let image = scratch
                .path()
                .join(image_file_name(idx, &desc.title, false, slides.image_format));
            renderer.render(desc.handle, &image, slides.dpi, slides.image_format)?;
            presentation.add_image_slide(deck, &image, &desc.title)?;
            std::fs::remove_file(&image)?;
            log::info!("added slide for plot {idx} '{}'", desc.title);
        }
        presentation.save_deck(deck, &deck_path)?;
        log::info!("saved slide deck {}", deck_path.display());

        Ok(ExportOutcome {
            files: vec![deck_path],
            data_file,
            document: None,
        })
    }
}
