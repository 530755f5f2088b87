//! 画像ファイルをData URIとして読み込む

use crate::error::{Result, TwinFinderError};
use image::ImageFormat;
use std::path::Path;
use twinfinder_common::{is_image_mime, DataUri};

/// imageクレートが判定できない形式
const EXTRA_IMAGE_EXTENSIONS: &[(&str, &str)] = &[("heic", "image/heic"), ("heif", "image/heif")];

pub fn load_image(path: &Path) -> Result<DataUri> {
    if !path.is_file() {
        return Err(TwinFinderError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let mime_type = detect_mime_type(path, &bytes)
        .ok_or_else(|| TwinFinderError::NotAnImage(path.display().to_string()))?;

    log::debug!("loaded {} ({}, {} bytes)", path.display(), mime_type, bytes.len());
    Ok(DataUri::from_bytes(mime_type, &bytes)?)
}

/// 先頭バイトで判定し、だめなら拡張子で判定
fn detect_mime_type(path: &Path, bytes: &[u8]) -> Option<&'static str> {
    let from_content = image::guess_format(bytes).ok().map(|f| f.to_mime_type());

    let from_extension = || -> Option<&'static str> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        EXTRA_IMAGE_EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, mime)| *mime)
            .or_else(|| ImageFormat::from_extension(&ext).map(|f| f.to_mime_type()))
    };

    from_content
        .filter(|m| is_image_mime(m))
        .or_else(|| from_extension().filter(|m| is_image_mime(m)))
}
