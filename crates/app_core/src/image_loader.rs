//! Image decoding collaborator
//!
//! The tree only resolves paths. Turning a path into pixels happens here and
//! may run whenever the caller likes; a failure is "no preview", never fatal.

use crate::tree::FileEntry;
use crate::AppError;
use app_fs::UniversalPath;
use image::{GenericImageView, ImageReader};
use rayon::prelude::*;
use std::path::Path;

/// Decoded RGBA8 bitmap
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub path: UniversalPath,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Something that can turn an image file into a bitmap
pub trait ImageDecoder {
    /// Decode `path`, downscaling to fit `max_size` when given
    fn decode(&self, path: &Path, max_size: Option<(u32, u32)>) -> Result<DecodedImage, AppError>;
}

/// Decoder backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path, max_size: Option<(u32, u32)>) -> Result<DecodedImage, AppError> {
        tracing::debug!("Decoding image: {}", path.display());

        let img = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;

        // Resize if needed
        let img = match max_size {
            Some((max_w, max_h)) => {
                let (w, h) = img.dimensions();
                if w > max_w || h > max_h {
                    img.thumbnail(max_w, max_h)
                } else {
                    img
                }
            }
            None => img,
        };

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(DecodedImage {
            path: UniversalPath::new(path),
            width,
            height,
            data: rgba.into_raw(),
        })
    }
}

/// What the viewer shows for one entry
#[derive(Debug, Clone)]
pub enum Preview {
    Ready(DecodedImage),
    /// Unreadable or corrupt; the UI draws a placeholder
    Unavailable,
}

impl Preview {
    pub fn is_ready(&self) -> bool {
        matches!(self, Preview::Ready(_))
    }
}

/// Decode an entry, mapping failure to [`Preview::Unavailable`]
pub fn preview<D: ImageDecoder + ?Sized>(
    decoder: &D,
    entry: &FileEntry,
    max_size: Option<(u32, u32)>,
) -> Preview {
    match decoder.decode(entry.path().as_path(), max_size) {
        Ok(image) => Preview::Ready(image),
        Err(e) => {
            tracing::debug!("No preview for {}: {}", entry.path(), e);
            Preview::Unavailable
        }
    }
}

/// Thumbnail generator for grid views
pub struct ThumbnailGenerator<D = ImageCrateDecoder> {
    decoder: D,
    size: u32,
}

impl ThumbnailGenerator<ImageCrateDecoder> {
    pub fn new(size: u32) -> Self {
        Self::with_decoder(ImageCrateDecoder, size)
    }
}

impl<D: ImageDecoder + Sync> ThumbnailGenerator<D> {
    pub fn with_decoder(decoder: D, size: u32) -> Self {
        Self { decoder, size }
    }

    pub fn generate(&self, entry: &FileEntry) -> Preview {
        preview(&self.decoder, entry, Some((self.size, self.size)))
    }

    /// Generate thumbnails for a folder in parallel, keeping the input order
    pub fn generate_batch(&self, entries: &[FileEntry]) -> Vec<Preview> {
        entries.par_iter().map(|entry| self.generate(entry)).collect()
    }
}

/// Get image dimensions without fully decoding
pub fn get_image_dimensions(path: &Path) -> Result<(u32, u32), AppError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}
