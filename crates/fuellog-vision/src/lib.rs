//! Vision module - reading pump displays and odometers from photos
//!
//! The model is an external collaborator. This crate only decides what to
//! ask it and how to turn its answer into a `ScanReading`.

pub mod ai;
pub mod image_input;

pub use ai::gemini::GeminiBackend;
pub use ai::prompts::build_scan_prompt;
pub use ai::response::{extract_json_from_response, parse_scan_response};
pub use ai::VisionBackend;
pub use image_input::{is_supported_image, load_image, validate_image, ImageInput};

use std::path::Path;

use fuellog_types::{Result, ScanReading};
use tracing::{debug, info};

/// Read a photo and ask `backend` what it shows.
///
/// An answer the model garbles comes back as `ScanReading::Unknown`; only
/// image and transport problems are errors.
pub fn scan_image(backend: &dyn VisionBackend, image_path: &Path) -> Result<ScanReading> {
    let image = load_image(image_path)?;
    debug!(
        path = %image_path.display(),
        mime = image.mime_type,
        bytes = image.bytes.len(),
        "sending photo for analysis"
    );

    let response = backend.analyze(&build_scan_prompt(), &image.bytes, image.mime_type)?;
    let reading = parse_scan_response(&response);
    info!(kind = reading.label(), "scan finished");

    Ok(reading)
}
