//! Card images: resolving a URL for an article, downloading it, and
//! preparing it for terminal display.
//!
//! Rendering uses the best graphics protocol the terminal supports (Sixel,
//! Kitty, iTerm2) with fallback to Unicode halfblocks.

mod cache;
mod chain;
mod loader;

pub use cache::ImageCache;
pub use chain::{FALLBACK_QUERY, ImageChain, ResolvedImages};
pub use loader::fetch_image;

use ratatui_image::picker::Picker;
use std::sync::OnceLock;

/// Global picker instance (initialized once at startup)
static PICKER: OnceLock<Picker> = OnceLock::new();

/// Query terminal graphics support.
///
/// Must be called before entering the alternate screen.
pub fn init_picker() {
    PICKER.get_or_init(|| match Picker::from_query_stdio() {
        Ok(p) => {
            tracing::info!("Image support detected: {:?}", p.protocol_type());
            p
        }
        Err(e) => {
            tracing::debug!("No image protocol support: {e}");
            Picker::halfblocks()
        }
    });
}

/// Get the global picker instance.
pub fn picker() -> Option<&'static Picker> {
    PICKER.get()
}
