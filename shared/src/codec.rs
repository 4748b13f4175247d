use std::io::Cursor;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use crate::error::CodecError;

/// JPEG quality used for both re-encoded uploads and camera frames.
pub const JPEG_QUALITY: u8 = 92;

/// Upper bound on the dimensions of an image sent for prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Immutable image bytes tagged with their MIME type. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime: String,
    bytes: Arc<[u8]>,
}

impl EncodedImage {
    pub fn new(mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File name used for the multipart part, e.g. `image.jpeg`.
    pub fn file_name(&self) -> String {
        let extension = ImageFormat::from_mime_type(&self.mime)
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("bin");
        format!("image.{}", extension)
    }

    /// Pixel dimensions, read from the encoded header.
    pub fn dimensions(&self) -> Result<Dimensions, CodecError> {
        let format = detect_format(&self.bytes, Some(self.mime.as_str()))?;
        let image = image::load_from_memory_with_format(&self.bytes, format)
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        Ok(Dimensions::new(image.width(), image.height()))
    }
}

/// Raw bytes decoded out of a data URL, ready for a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferBuffer {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl From<TransferBuffer> for EncodedImage {
    fn from(buffer: TransferBuffer) -> Self {
        EncodedImage::new(buffer.mime, buffer.bytes)
    }
}

/// Scales `width` x `height` uniformly so it fits inside `limits`.
///
/// The width constraint is applied first and the height constraint is then
/// checked against the already-scaled size, so a tall image fitted to the
/// maximum width can shrink further. Fractional results are truncated, with a
/// floor of one pixel.
pub fn fit_within(width: u32, height: u32, limits: Dimensions) -> (u32, u32) {
    let mut w = f64::from(width);
    let mut h = f64::from(height);
    let max_w = f64::from(limits.width);
    let max_h = f64::from(limits.height);

    if w > max_w {
        let ratio = max_w / w;
        w = max_w;
        h *= ratio;
    }

    if h > max_h {
        let ratio = max_h / h;
        h = max_h;
        w *= ratio;
    }

    ((w as u32).max(1), (h as u32).max(1))
}

/// Decodes `bytes`, fits them inside `limits` and re-encodes in the source
/// format. The format is sniffed from the bytes; `mime`, the type reported by
/// the file picker, is only consulted when sniffing fails.
pub fn resize(bytes: &[u8], mime: Option<&str>, limits: Dimensions) -> Result<EncodedImage, CodecError> {
    let format = detect_format(bytes, mime)?;
    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    let (width, height) = fit_within(image.width(), image.height(), limits);
    let resized = if (width, height) == (image.width(), image.height()) {
        image
    } else {
        image.resize_exact(width, height, FilterType::Triangle)
    };

    log::debug!(
        "resized {} image to {}x{} (limits {}x{})",
        format.to_mime_type(),
        width,
        height,
        limits.width,
        limits.height
    );

    encode(&resized, format)
}

/// Re-encodes a raw camera snapshot as JPEG at its native resolution.
pub fn encode_frame(bytes: &[u8]) -> Result<EncodedImage, CodecError> {
    let format = detect_format(bytes, None)?;
    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| CodecError::Decode(e.to_string()))?;
    encode(&image, ImageFormat::Jpeg)
}

pub fn to_data_url(image: &EncodedImage) -> String {
    format!("data:{};base64,{}", image.mime(), STANDARD.encode(image.bytes()))
}

/// Splits a `data:<mime>;base64,<payload>` URL into its MIME type and bytes.
pub fn to_transferable_buffer(data_url: &str) -> Result<TransferBuffer, CodecError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| CodecError::MalformedDataUrl("missing `data:` scheme".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CodecError::MalformedDataUrl("missing `,` separator".into()))?;
    let params = header
        .strip_suffix(";base64")
        .ok_or_else(|| CodecError::MalformedDataUrl("payload is not base64".into()))?;

    let mime = params.split(';').next().unwrap_or_default().trim();
    if mime.is_empty() {
        return Err(CodecError::MalformedDataUrl("empty MIME type".into()));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| CodecError::MalformedDataUrl(e.to_string()))?;

    Ok(TransferBuffer {
        mime: mime.to_string(),
        bytes,
    })
}

/// Magic bytes win over the declared type: pickers derive `mime` from the
/// file extension, which can lie.
fn detect_format(bytes: &[u8], mime: Option<&str>) -> Result<ImageFormat, CodecError> {
    image::guess_format(bytes)
        .ok()
        .or_else(|| mime.and_then(ImageFormat::from_mime_type))
        .ok_or(CodecError::UnknownFormat)
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Result<EncodedImage, CodecError> {
    let mut buffer = Vec::new();

    if format == ImageFormat::Jpeg {
        let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
        DynamicImage::ImageRgb8(image.to_rgb8())
            .write_with_encoder(encoder)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        return Ok(EncodedImage::new(format.to_mime_type(), buffer));
    }

    match image.write_to(&mut Cursor::new(&mut buffer), format) {
        Ok(()) => Ok(EncodedImage::new(format.to_mime_type(), buffer)),
        Err(e) => {
            log::warn!(
                "cannot encode {}, falling back to PNG: {}",
                format.to_mime_type(),
                e
            );
            buffer.clear();
            image
                .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
                .map_err(|e| CodecError::Encode(e.to_string()))?;
            Ok(EncodedImage::new(ImageFormat::Png.to_mime_type(), buffer))
        }
    }
}
