//! Data URI（`data:<mime>;base64,<payload>`）の検証と変換
//!
//! アップロード画像・ハイライト画像はすべてこの形式で受け渡す。

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

const PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// モデル出力はパディングを省くことがあるので、デコード時は有無を問わない
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// 検証済みのData URI
///
/// 文字列全体を保持し、MIMEタイプとペイロードの位置だけを覚えておく。
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUri {
    uri: String,
    /// `;base64,` の開始位置
    marker: usize,
}

impl DataUri {
    /// Data URIをパースする
    ///
    /// ペイロードのデコードは行わない（形式のみ検証）。
    ///
    /// # Examples
    /// ```
    /// use twinfinder_common::DataUri;
    ///
    /// let uri = DataUri::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
    /// assert_eq!(uri.mime_type(), "image/png");
    /// assert_eq!(uri.payload(), "iVBORw0KGgo=");
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        let rest = value
            .strip_prefix(PREFIX)
            .ok_or_else(|| Error::InvalidDataUri("missing `data:` prefix".into()))?;

        let offset = rest
            .find(BASE64_MARKER)
            .ok_or_else(|| Error::InvalidDataUri("missing `;base64,` marker".into()))?;

        let media_type = rest[..offset].split(';').next().unwrap_or_default();
        if media_type.is_empty() {
            return Err(Error::InvalidDataUri("empty MIME type".into()));
        }
        if !media_type.contains('/') {
            return Err(Error::InvalidDataUri(format!("malformed MIME type: {}", media_type)));
        }

        if rest[offset + BASE64_MARKER.len()..].is_empty() {
            return Err(Error::InvalidDataUri("empty payload".into()));
        }

        Ok(Self {
            uri: value.to_string(),
            marker: PREFIX.len() + offset,
        })
    }

    /// バイト列をBase64エンコードしてData URIを作る
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self> {
        Self::parse(&format!("{PREFIX}{mime_type}{BASE64_MARKER}{}", STANDARD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// MIMEタイプ（`charset` 等のパラメータは除く）
    pub fn mime_type(&self) -> &str {
        self.uri[PREFIX.len()..self.marker]
            .split(';')
            .next()
            .unwrap_or_default()
    }

    /// Base64ペイロード部分
    pub fn payload(&self) -> &str {
        &self.uri[self.marker + BASE64_MARKER.len()..]
    }

    pub fn decode_payload(&self) -> Result<Vec<u8>> {
        LENIENT
            .decode(self.payload())
            .map_err(|e| Error::InvalidDataUri(format!("base64 decode failed: {}", e)))
    }

    /// 保存時の拡張子
    pub fn file_extension(&self) -> &'static str {
        match self.mime_type() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "image/bmp" => "bmp",
            "image/heic" => "heic",
            "image/heif" => "heif",
            _ => "bin",
        }
    }
}

/// アップロード時のMIMEフィルタ（`image/*` のみ許可）
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

impl TryFrom<String> for DataUri {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DataUri> for String {
    fn from(value: DataUri) -> Self {
        value.uri
    }
}

impl AsRef<str> for DataUri {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

// ペイロードは巨大になりうるのでDebugでは省略する
impl fmt::Debug for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataUri")
            .field("mime_type", &self.mime_type())
            .field("payload_len", &self.payload().len())
            .finish()
    }
}
