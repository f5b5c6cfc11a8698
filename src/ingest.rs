use std::io::Cursor;

use actix_multipart::Multipart;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures_util::StreamExt;
use image::ImageFormat;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::IngestError;
use crate::models::UploadedImage;

/// Multipart field carrying the image, both inbound and towards backends.
pub const FILE_FIELD: &str = "file";

const FALLBACK_MIME: &str = "application/octet-stream";

/// Reads the `file` field out of an upload form.
///
/// Returns `Ok(None)` when the form carries no file (or an empty one); the
/// caller is expected to leave its current state alone in that case.
pub async fn read_upload(
    payload: &mut Multipart,
    max_bytes: usize,
) -> Result<Option<UploadedImage>, IngestError> {
    let mut file_name = None;
    let mut bytes: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let disposition = field.content_disposition();
        let is_file = disposition.get_name() == Some(FILE_FIELD) && bytes.is_none();

        if !is_file {
            // drain so the stream can advance to the next field
            while let Some(chunk) = field.next().await {
                chunk?;
            }
            continue;
        }

        file_name = disposition
            .get_filename()
            .filter(|name| !name.is_empty())
            .map(str::to_owned);

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if data.len() + chunk.len() > max_bytes {
                return Err(IngestError::TooLarge { limit: max_bytes });
            }
            data.extend_from_slice(&chunk);
        }
        bytes = Some(data);
    }

    let bytes = match bytes {
        Some(b) if !b.is_empty() => b,
        _ => {
            debug!("upload form carried no file");
            return Ok(None);
        }
    };

    let image = from_bytes(bytes, file_name);
    info!(
        id = %image.id,
        file = image.file_name.as_deref().unwrap_or("-"),
        content_type = %image.content_type,
        size = image.bytes.len(),
        "image received"
    );
    Ok(Some(image))
}

/// Builds an [`UploadedImage`] from raw file contents.
pub fn from_bytes(bytes: Vec<u8>, file_name: Option<String>) -> UploadedImage {
    let format = image::guess_format(&bytes).ok();
    let content_type = format.map(mime_for).unwrap_or(FALLBACK_MIME).to_string();
    let dimensions = format.and_then(|f| {
        image::io::Reader::with_format(Cursor::new(&bytes), f)
            .into_dimensions()
            .ok()
    });
    let preview = format!("data:{};base64,{}", content_type, STANDARD.encode(&bytes));

    UploadedImage {
        id: Uuid::new_v4(),
        file_name,
        content_type,
        dimensions,
        bytes,
        preview,
    }
}

fn mime_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Ico => "image/x-icon",
        _ => FALLBACK_MIME,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageOutputFormat, RgbImage};

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn png_gets_mime_dimensions_and_data_url() {
        let bytes = png_bytes(3, 2);
        let image = from_bytes(bytes.clone(), Some("scan.png".into()));

        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.dimensions, Some((3, 2)));
        assert_eq!(image.bytes, bytes);
        assert!(image.preview.starts_with("data:image/png;base64,"));
        let encoded = image.preview.split_once(',').unwrap().1;
        assert_eq!(STANDARD.decode(encoded).unwrap(), bytes);
    }

    #[test]
    fn unknown_bytes_fall_back_to_octet_stream() {
        let image = from_bytes(b"not an image".to_vec(), None);
        assert_eq!(image.content_type, FALLBACK_MIME);
        assert_eq!(image.dimensions, None);
        assert!(image.upload_name().ends_with(".bin"));
    }

    #[test]
    fn each_upload_gets_fresh_id() {
        let a = from_bytes(vec![1], None);
        let b = from_bytes(vec![1], None);
        assert_ne!(a.id, b.id);
    }
}
