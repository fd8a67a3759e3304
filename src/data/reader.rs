//! Read orchestration: header, cube, preview, record.

use std::path::Path;

use crate::config::DebugConfig;
use crate::data::cube::{CubeDims, DataCube};
use crate::data::header::{HeaderMetadata, header_path};
use crate::data::pseudo_rgb::{BandSelection, PseudoRgb};
use crate::data::record::{RecordParts, SpectralDataRecord};
use crate::data::wavelength::WavelengthIndex;
use crate::error::{DatasetError, ReadError};
use crate::preview::{self, ImagePreview, PreviewHook};

/// Read a hyperspectral dataset.
///
/// `path` is the binary data file; its header is expected at `<path>.hdr`.
/// Printed previews are written with the `image` crate.
pub fn read_data(
    path: impl AsRef<Path>,
    config: &DebugConfig,
) -> Result<SpectralDataRecord, DatasetError> {
    read_data_with(path, config, &mut ImagePreview)
}

/// Read a hyperspectral dataset, handing the preview to a custom hook.
pub fn read_data_with(
    path: impl AsRef<Path>,
    config: &DebugConfig,
    hook: &mut dyn PreviewHook,
) -> Result<SpectralDataRecord, DatasetError> {
    let path = path.as_ref();
    let record = read_record(path).map_err(|e| DatasetError::new(path, e))?;

    preview::dispatch(config, record.pseudo_rgb(), hook)
        .map_err(|e| DatasetError::new(path, e))?;

    Ok(record)
}

fn read_record(path: &Path) -> Result<SpectralDataRecord, ReadError> {
    let header = HeaderMetadata::read(&header_path(path))?;

    let bands = header.bands()?;
    let wavelengths = WavelengthIndex::new(header.wavelengths(), bands)?;

    let interleave = header.interleave()?.to_string();
    let wavelength_units = header.wavelength_units()?.to_string();

    let data_type = header.data_type()?;
    let dims = CubeDims::new(header.lines()?, header.samples()?, bands);
    let cube = DataCube::read(path, data_type, dims, header.endianness()?)?;

    let selection = BandSelection::choose(header.default_bands()?, &wavelengths, bands);
    log::debug!(
        "Pseudo-RGB bands for {}: {} {:?}",
        path.display(),
        selection.strategy(),
        selection.channel_bands()
    );
    let pseudo_rgb = PseudoRgb::compose(&cube, selection)?;

    let record = SpectralDataRecord::assemble(RecordParts {
        array_data: cube,
        wavelengths,
        interleave,
        wavelength_units,
        pseudo_rgb,
        band_selection: selection,
        filename: path.to_path_buf(),
    });

    log::info!(
        "Read {} ({} x {} x {} {})",
        path.display(),
        record.lines(),
        record.samples(),
        record.bands(),
        record.data_type()
    );
    Ok(record)
}
