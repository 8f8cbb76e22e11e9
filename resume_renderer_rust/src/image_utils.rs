//! Image utilities for the resume avatar
//!
//! The avatar is decoded, cropped to a centered square, scaled, and masked
//! to a circle. It is embedded as an RGB image XObject with the alpha
//! channel in a separate soft mask.

use std::io::{Cursor, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::imageops::FilterType;
use image::io::Reader as ImageReader;
use image::{DynamicImage, GenericImageView, RgbaImage};
use pdf_writer::{Filter, Name, Pdf, Ref};

use crate::error::{RendererError, RendererResult};

/// Resource name of the avatar image on the first page
pub const AVATAR_RESOURCE: Name<'static> = Name(b"Im1");

/// Square RGBA bitmap, transparent outside the inscribed circle
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarImage {
    pub size: u32,
    pub rgba: Vec<u8>,
}

/// Decode image bytes, guessing the format from the data
pub fn load_image_from_bytes(data: &[u8]) -> RendererResult<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    if reader.format().is_none() {
        return Err(RendererError::ImageError("Unrecognized image format".to_string()));
    }
    Ok(reader.decode()?)
}

/// Crop to a centered square, scale to `size` pixels and mask to a circle
pub fn circular_crop(image: &DynamicImage, size: u32) -> RendererResult<AvatarImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(RendererError::ImageError("Image has no pixels".to_string()));
    }
    if size == 0 {
        return Err(RendererError::ImageError("Avatar size must be non-zero".to_string()));
    }

    let side = width.min(height);
    let square = image.crop_imm((width - side) / 2, (height - side) / 2, side, side);
    let mut scaled: RgbaImage = square.resize_exact(size, size, FilterType::Lanczos3).to_rgba8();

    let radius = size as f64 / 2.0;
    for (x, y, pixel) in scaled.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - radius;
        let dy = y as f64 + 0.5 - radius;
        let distance = (dx * dx + dy * dy).sqrt();
        // one pixel of anti-aliasing along the edge
        let coverage = (radius - distance + 0.5).clamp(0.0, 1.0);
        pixel.0[3] = (pixel.0[3] as f64 * coverage).round() as u8;
    }

    Ok(AvatarImage {
        size,
        rgba: scaled.into_raw(),
    })
}

/// Decode and crop in one step
pub fn prepare_avatar(data: &[u8], size: u32) -> RendererResult<AvatarImage> {
    let image = load_image_from_bytes(data)?;
    circular_crop(&image, size)
}

/// Zlib-compress a stream body for `FlateDecode`
pub fn flate_compress(data: &[u8]) -> RendererResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Write the avatar as an image XObject plus soft mask
pub fn add_avatar_to_pdf(
    pdf: &mut Pdf,
    avatar: &AvatarImage,
    image_id: Ref,
    smask_id: Ref,
) -> RendererResult<()> {
    let pixel_count = (avatar.size as usize) * (avatar.size as usize);
    if avatar.rgba.len() != pixel_count * 4 {
        return Err(RendererError::ImageError(format!(
            "Avatar buffer has {} bytes, expected {}",
            avatar.rgba.len(),
            pixel_count * 4
        )));
    }

    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for chunk in avatar.rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
        alpha.push(chunk[3]);
    }
    let rgb = flate_compress(&rgb)?;
    let alpha = flate_compress(&alpha)?;

    {
        let mut smask = pdf.image_xobject(smask_id, &alpha);
        smask.filter(Filter::FlateDecode);
        smask.width(avatar.size as i32);
        smask.height(avatar.size as i32);
        smask.color_space().device_gray();
        smask.bits_per_component(8);
    }
    {
        let mut xobject = pdf.image_xobject(image_id, &rgb);
        xobject.filter(Filter::FlateDecode);
        xobject.width(avatar.size as i32);
        xobject.height(avatar.size as i32);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
        xobject.s_mask(smask_id);
    }

    Ok(())
}
