use base64::{engine::general_purpose, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;

/// Fixed encode parameters for device playback: fit within 800x800, JPEG
/// quality 90, no rotation.
pub const MAX_WIDTH: u32 = 800;
pub const MAX_HEIGHT: u32 = 800;
pub const JPEG_QUALITY: u8 = 90;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("could not decode {name}: {source}")]
    Decode {
        name: String,
        source: image::ImageError,
    },
    #[error("could not encode {name}: {source}")]
    Encode {
        name: String,
        source: image::ImageError,
    },
    #[error("encode task for {name} was lost")]
    Lost { name: String },
}

/// A picked file before encoding: display name plus raw bytes.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub name: String,
    pub data_uri: String,
}

/// Encode one raw image into a size-bounded `data:image/jpeg;base64,` string.
/// Images larger than the bound are scaled down with their aspect ratio
/// preserved; smaller images pass through at their original size.
pub fn encode_image(name: &str, bytes: &[u8]) -> Result<String, EncodeError> {
    let img = image::load_from_memory(bytes).map_err(|e| EncodeError::Decode {
        name: name.to_string(),
        source: e,
    })?;

    let img = if img.width() > MAX_WIDTH || img.height() > MAX_HEIGHT {
        img.thumbnail(MAX_WIDTH, MAX_HEIGHT)
    } else {
        img
    };

    let rgb = img.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| EncodeError::Encode {
            name: name.to_string(),
            source: e,
        })?;

    Ok(format!(
        "data:image/jpeg;base64,{}",
        general_purpose::STANDARD.encode(&jpeg)
    ))
}

/// Encode a batch of files concurrently, returning results in input order.
/// The batch is atomic: if any file fails, the whole call fails and no
/// partial results escape.
pub async fn encode_batch(files: Vec<RawImage>) -> Result<Vec<EncodedImage>, EncodeError> {
    let mut handles = Vec::with_capacity(files.len());
    for file in files {
        let name = file.name.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let data_uri = encode_image(&file.name, &file.bytes)?;
            Ok(EncodedImage {
                name: file.name,
                data_uri,
            })
        });
        handles.push((name, handle));
    }

    let mut encoded = Vec::with_capacity(handles.len());
    for (name, handle) in handles {
        match handle.await {
            Ok(result) => encoded.push(result?),
            Err(_) => return Err(EncodeError::Lost { name }),
        }
    }
    Ok(encoded)
}
