//! Image payloads stored under image tags.
//!
//! An [`ImageExport`] remembers where an image came from and can carry the
//! bytes themselves as base64, so an exported content file stays usable on a
//! machine that does not have the original image.

use crate::error::ContentError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};

/// Marker stored in the `type` field of an exported image record.
pub const IMAGE_RECORD_TYPE: &str = "ImageExport";

/// An image reference with an optional embedded payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename = "ImageExport", rename_all = "camelCase")]
pub struct ImageExport {
    /// Original location of the image.
    #[serde(default)]
    pub path: String,
    /// File bytes, standard base64.
    #[serde(default)]
    pub base64: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl ImageExport {
    /// Reference without payload, e.g. for a legacy bare path.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            base64: None,
            mime_type: None,
        }
    }

    /// Read `file` and embed its bytes. The MIME type comes from the
    /// extension.
    pub fn from_file(file: &Path) -> Result<Self, ContentError> {
        let bytes = fs::read(file).map_err(ContentError::io(file))?;
        let absolute = std::path::absolute(file).map_err(ContentError::io(file))?;
        Ok(Self {
            path: absolute.to_string_lossy().into_owned(),
            base64: Some(STANDARD.encode(bytes)),
            mime_type: Some(mime_type_for(file).to_string()),
        })
    }

    pub fn has_payload(&self) -> bool {
        self.base64.is_some()
    }

    /// Write the image to `output`, creating parent directories.
    ///
    /// The embedded payload is preferred; without one the original file is
    /// copied if it still exists.
    pub fn save_to_file(&self, output: &Path) -> Result<PathBuf, ContentError> {
        if let Some(payload) = &self.base64 {
            let bytes = STANDARD.decode(payload)?;
            create_parent(output)?;
            fs::write(output, bytes).map_err(ContentError::io(output))?;
        } else if Path::new(&self.path).is_file() {
            create_parent(output)?;
            fs::copy(&self.path, output).map_err(ContentError::io(output))?;
        } else {
            return Err(ContentError::NoSource {
                path: self.path.clone(),
            });
        }
        Ok(output.to_path_buf())
    }

    /// The exported record: `{path, base64?, mimeType?, type: "ImageExport"}`.
    pub fn to_json(&self) -> JsonValue {
        let mut record = Map::new();
        record.insert("path".into(), self.path.clone().into());
        if let Some(payload) = &self.base64 {
            record.insert("base64".into(), payload.clone().into());
        }
        if let Some(mime) = &self.mime_type {
            record.insert("mimeType".into(), mime.clone().into());
        }
        record.insert("type".into(), IMAGE_RECORD_TYPE.into());
        JsonValue::Object(record)
    }

    /// Whether a JSON value is an exported image record.
    pub fn is_record(value: &JsonValue) -> bool {
        value.get("type").and_then(JsonValue::as_str) == Some(IMAGE_RECORD_TYPE)
    }
}

fn create_parent(output: &Path) -> Result<(), ContentError> {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(ContentError::io(parent))
        }
        _ => Ok(()),
    }
}

/// MIME type inferred from a file extension.
pub fn mime_type_for(file: &Path) -> &'static str {
    let extension = file
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// File extension used when restoring an image that has no file name.
pub fn extension_for_mime(mime_type: Option<&str>) -> &'static str {
    match mime_type {
        Some("image/png") => "png",
        Some("image/gif") => "gif",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mime_types_by_extension() {
        assert_eq!(mime_type_for(Path::new("a/photo.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("logo.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("x.webp")), "image/webp");
        assert_eq!(mime_type_for(Path::new("scan.bmp")), "image/bmp");
        assert_eq!(mime_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn restore_extension_defaults_to_jpg() {
        assert_eq!(extension_for_mime(Some("image/png")), "png");
        assert_eq!(extension_for_mime(Some("image/webp")), "jpg");
        assert_eq!(extension_for_mime(None), "jpg");
    }

    #[test]
    fn record_shape() {
        let image = ImageExport {
            path: "/tmp/a.png".into(),
            base64: None,
            mime_type: Some("image/png".into()),
        };
        let json = image.to_json();
        assert_eq!(
            json,
            serde_json::json!({"path": "/tmp/a.png", "mimeType": "image/png", "type": "ImageExport"})
        );
        assert!(ImageExport::is_record(&json));
        let back: ImageExport = serde_json::from_value(json).expect("record");
        assert_eq!(back, image);
    }

    #[test]
    fn null_fields_read_as_absent() {
        let json = serde_json::json!({"path": "p.gif", "base64": null, "mimeType": null, "type": "ImageExport"});
        let image: ImageExport = serde_json::from_value(json).expect("record");
        assert_eq!(image, ImageExport::from_path("p.gif"));
    }

    #[test]
    fn save_without_any_source_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = ImageExport::from_path(dir.path().join("missing.png").to_string_lossy());
        let err = image.save_to_file(&dir.path().join("out.png")).unwrap_err();
        assert!(matches!(err, ContentError::NoSource { .. }), "got {err}");
    }

    #[test]
    fn save_copies_original_when_no_payload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("src.gif");
        fs::write(&source, b"GIF89a").expect("write");
        let image = ImageExport::from_path(source.to_string_lossy());
        let out = image
            .save_to_file(&dir.path().join("nested/copy.gif"))
            .expect("copy");
        assert_eq!(fs::read(out).expect("read"), b"GIF89a");
    }

    #[test]
    fn corrupt_payload_is_reported() {
        let image = ImageExport {
            path: String::new(),
            base64: Some("not base64!".into()),
            mime_type: None,
        };
        let dir = tempfile::tempdir().expect("tempdir");
        let err = image.save_to_file(&dir.path().join("x.jpg")).unwrap_err();
        assert!(matches!(err, ContentError::Base64(_)), "got {err}");
    }
}
