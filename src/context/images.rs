//! Decoding of image entries for multimodal prompts

use super::ContextEntry;
use crate::utils::errors::BrainError;
use crate::vfs::FileTree;
use crate::Result;
use image::RgbImage;
use std::path::Path;
use tracing::{debug, error};

/// Decode every image entry to RGB, in context order.
///
/// Images are read from the tree on every call. One that cannot be read or
/// decoded is logged and skipped.
pub fn load_images(tree: &dyn FileTree, entries: &[ContextEntry]) -> Vec<RgbImage> {
    let mut images = Vec::new();
    for entry in entries {
        let Some(location) = entry.image_location() else {
            continue;
        };
        match decode_image(tree, location) {
            Ok(image) => {
                debug!("Successfully loaded image: {}", entry.path());
                images.push(image);
            }
            Err(e) => error!("Error opening image {}: {}", location.display(), e),
        }
    }
    images
}

/// Read and decode a single image, normalized to three channels
pub fn decode_image(tree: &dyn FileTree, location: &Path) -> Result<RgbImage> {
    let bytes = tree
        .read(location)
        .map_err(|e| BrainError::file_system(location, e))?;
    let image = image::load_from_memory(&bytes)?;
    Ok(image.to_rgb8())
}
