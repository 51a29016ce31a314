//! AI backend seam

pub mod gemini;
pub mod prompts;
pub mod response;

use fuellog_types::Result;

/// Something that can answer a prompt about one image
pub trait VisionBackend {
    /// Send `prompt` with the image and return the raw text answer
    fn analyze(&self, prompt: &str, image: &[u8], mime_type: &str) -> Result<String>;
}
