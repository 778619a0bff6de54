use {
    crate::{Image, ImageError, PixelFormat},
    base::Vec2,
    std::path::Path,
};

/// Decode an encoded image (format auto-detected) into `Rgb8`.
pub fn decode_rgb(data: &[u8]) -> Result<Image, ImageError> {
    let rgb = crates_image::load_from_memory(data)?.to_rgb8();
    let (w, h) = rgb.dimensions();
    Image::try_new(
        Vec2::new(w as usize, h as usize),
        rgb.into_raw(),
        PixelFormat::Rgb8,
    )
}

/// Read and decode an image file into `Rgb8`.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<Image, ImageError> {
    let bytes = std::fs::read(path)?;
    decode_rgb(&bytes)
}
