/// A decoded backdrop ready for a view layer to draw: RGBA8 pixel data in
/// row-major order, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode raw bytes into an RGBA image. Returns None when the bytes are not
/// a supported image format; the caller treats that the same as a failed
/// fetch.
pub fn decode_image(bytes: &[u8]) -> Option<BackgroundImage> {
    let decoded = image::load_from_memory(bytes).ok()?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Some(BackgroundImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
