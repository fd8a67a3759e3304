//! Debug hooks for the pseudo-RGB preview.

use std::path::Path;

use crate::config::{DebugConfig, DebugMode};
use crate::data::PseudoRgb;
use crate::error::ReadError;

/// Receives the preview of a finished read when debugging is enabled.
///
/// Hooks only see the preview; they cannot change the returned record.
pub trait PreviewHook {
    /// Show the preview (`DebugMode::Plot`).
    fn render(&mut self, preview: &PseudoRgb) -> Result<(), ReadError>;

    /// Write the preview to `path` (`DebugMode::Print`).
    fn persist(&mut self, preview: &PseudoRgb, path: &Path) -> Result<(), ReadError>;
}

/// Default hook backed by the `image` crate.
///
/// No window toolkit is linked, so `render` only logs the preview. `persist`
/// writes a PNG, creating the parent directory if needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImagePreview;

impl PreviewHook for ImagePreview {
    fn render(&mut self, preview: &PseudoRgb) -> Result<(), ReadError> {
        log::info!(
            "Pseudo-RGB preview ready ({}x{}); no display attached",
            preview.samples(),
            preview.lines()
        );
        Ok(())
    }

    fn persist(&mut self, preview: &PseudoRgb, path: &Path) -> Result<(), ReadError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ReadError::io(parent, e))?;
        }
        preview.to_rgb_image().save(path)?;
        log::info!("Saved pseudo-RGB preview to {}", path.display());
        Ok(())
    }
}

/// Invoke the hook matching the configured debug mode.
pub fn dispatch(
    config: &DebugConfig,
    preview: &PseudoRgb,
    hook: &mut dyn PreviewHook,
) -> Result<(), ReadError> {
    match config.mode {
        DebugMode::Disabled => Ok(()),
        DebugMode::Plot => hook.render(preview),
        DebugMode::Print => hook.persist(preview, &config.preview_path()),
    }
}
