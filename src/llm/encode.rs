//! Image encoding for HTTP model backends

use super::ModelError;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

/// Encode an RGB image as base64 PNG
pub fn png_base64(image: &RgbImage) -> Result<String, ModelError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    DynamicImage::ImageRgb8(image.clone()).write_to(&mut cursor, ImageFormat::Png)?;
    Ok(STANDARD.encode(&buffer))
}

/// Encode an RGB image as a `data:` URL
pub fn png_data_url(image: &RgbImage) -> Result<String, ModelError> {
    Ok(format!("data:image/png;base64,{}", png_base64(image)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_png_round_trips_through_base64() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
        let encoded = png_base64(&img).unwrap();

        let bytes = STANDARD.decode(encoded).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_data_url_prefix() {
        let url = png_data_url(&RgbImage::new(1, 1)).unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBOR"));
    }
}
