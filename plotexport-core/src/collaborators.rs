//! Seams to the host application: plot rendering, slide decks and user
//! notifications. This crate ships no renderer or presentation library.

use crate::format::ImageFormat;
use crate::ExportError;
use plot_model::PlotHandle;
use std::path::Path;

/// Produces an image file for a plot at the given path.
pub trait PlotRenderer {
    fn render(
        &mut self,
        plot: PlotHandle,
        path: &Path,
        dpi: u32,
        format: ImageFormat,
    ) -> Result<(), ExportError>;
}

/// Opaque deck reference handed out by a [`PresentationBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeckHandle(pub u64);

pub trait PresentationBuilder {
    fn create_deck(&mut self) -> Result<DeckHandle, ExportError>;
    fn add_title_slide(
        &mut self,
        deck: DeckHandle,
        title: &str,
        subtitle: &str,
    ) -> Result<(), ExportError>;
    fn add_image_slide(
        &mut self,
        deck: DeckHandle,
        image: &Path,
        title: &str,
    ) -> Result<(), ExportError>;
    fn save_deck(&mut self, deck: DeckHandle, path: &Path) -> Result<(), ExportError>;
}

/// User-facing messages in interactive mode.
pub trait Notifier {
    fn info(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Routes notifications to the `log` facade.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn error(&mut self, message: &str) {
        log::error!("{message}");
    }
}
