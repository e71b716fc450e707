//! Phase 2 of export: decode image sources and size them for the page.

use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, ImageReader};

use crate::export::ExportOptions;
use crate::export::fit::{Size, aspect_fit};
use crate::export::model::SizedImage;

#[derive(Debug, thiserror::Error)]
pub enum ImageResolveError {
    #[error("image source is not a base64 data URI")]
    NotDataUri,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unrecognised image format")]
    UnknownFormat,
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// The raw bytes carried by a `data:<mime>;base64,<payload>` URI.
pub fn decode_data_uri(src: &str) -> Result<Vec<u8>, ImageResolveError> {
    let rest = src.strip_prefix("data:").ok_or(ImageResolveError::NotDataUri)?;
    let (_, payload) = rest
        .split_once("base64,")
        .ok_or(ImageResolveError::NotDataUri)?;
    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

/// Decode `src` and compute its export size.
///
/// The intrinsic size is the declared one when both sides are non-zero,
/// else the size in the image header, else the configured default. PNG data
/// is embedded unchanged; other formats are re-encoded as PNG. An image whose
/// header cannot be read is an error.
pub fn resolve_image(
    src: &str,
    declared_width: u32,
    declared_height: u32,
    options: &ExportOptions,
) -> Result<SizedImage, ImageResolveError> {
    let bytes = decode_data_uri(src)?;
    let format = image::guess_format(&bytes).map_err(|_| ImageResolveError::UnknownFormat)?;

    let (data, (header_width, header_height)) = if format == ImageFormat::Png {
        let header =
            ImageReader::with_format(Cursor::new(&bytes), ImageFormat::Png).into_dimensions()?;
        (bytes, header)
    } else {
        let decoded = image::load_from_memory_with_format(&bytes, format)?;
        let header = (decoded.width(), decoded.height());
        let mut png = Vec::new();
        decoded.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        (png, header)
    };

    let intrinsic = if declared_width > 0 && declared_height > 0 {
        Size::new(declared_width, declared_height)
    } else if header_width > 0 && header_height > 0 {
        Size::new(header_width, header_height)
    } else {
        Size::new(options.default_width, options.default_height)
    };
    let fitted = aspect_fit(intrinsic, Size::new(options.max_width, options.max_height));

    Ok(SizedImage {
        data,
        width: fitted.width,
        height: fitted.height,
    })
}
