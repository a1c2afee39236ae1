//! Image download and decoding.

use anyhow::{Context, Result, bail};
use image::DynamicImage;

/// Largest width or height kept after decoding
const MAX_DIMENSION: u32 = 800;

/// Download an image from a URL and decode it.
pub async fn fetch_image(client: &reqwest::Client, url: &str) -> Result<DynamicImage> {
    tracing::debug!("Downloading image: {url}");

    let response = client
        .get(url)
        .send()
        .await
        .context("Failed to download image")?;

    if !response.status().is_success() {
        bail!("HTTP {}", response.status());
    }

    let bytes = response.bytes().await.context("Failed to read image body")?;
    let image = image::load_from_memory(&bytes).context("Failed to decode image")?;

    Ok(shrink(image))
}

/// Resize image if it's too large (to save memory and rendering time).
fn shrink(image: DynamicImage) -> DynamicImage {
    let (width, height) = (image.width(), image.height());

    if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
        return image;
    }

    // Keep aspect ratio
    let ratio = f64::from(width) / f64::from(height);
    let (new_width, new_height) = if width > height {
        (MAX_DIMENSION, (f64::from(MAX_DIMENSION) / ratio) as u32)
    } else {
        ((f64::from(MAX_DIMENSION) * ratio) as u32, MAX_DIMENSION)
    };

    image.resize(new_width, new_height, image::imageops::FilterType::Triangle)
}
