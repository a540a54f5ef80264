//! File attachments for bank transaction explanations
//!
//! FreeAgent accepts PDF, PNG, JPEG and GIF files up to 5 MiB, sent inline as
//! base64 with a FreeAgent-specific content type.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use freeagent_domain::constants::{DEFAULT_ATTACHMENT_DESCRIPTION, MAX_ATTACHMENT_BYTES};
use freeagent_domain::{Attachment, ExplanationPayload, FreeAgentError, Result};
use tracing::debug;

/// FreeAgent content type for the file's extension
///
/// # Errors
/// Returns `FreeAgentError::Attachment` for unsupported extensions
pub fn content_type_for(path: &Path) -> Result<&'static str> {
    let extension =
        path.extension().and_then(|ext| ext.to_str()).map(str::to_lowercase).unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok("application/x-pdf"),
        "png" => Ok("image/x-png"),
        "jpeg" | "jpg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        _ => Err(FreeAgentError::Attachment(format!(
            "unsupported file type for FreeAgent: {}",
            path.display()
        ))),
    }
}

/// Size of the file, rejecting anything over the attachment limit
///
/// # Errors
/// Returns `FreeAgentError::Attachment` if the file is unreadable or too large
pub fn check_file_size(path: &Path) -> Result<u64> {
    let size = fs::metadata(path)
        .map_err(|e| {
            FreeAgentError::Attachment(format!("failed to read {}: {e}", path.display()))
        })?
        .len();

    if size > MAX_ATTACHMENT_BYTES {
        return Err(FreeAgentError::Attachment(format!(
            "attachment too large ({size} bytes), max allowed is {MAX_ATTACHMENT_BYTES}"
        )));
    }
    Ok(size)
}

/// Base64 contents of the file after the size check
///
/// # Errors
/// Returns `FreeAgentError::Attachment` if the file is unreadable or too large
pub fn encode_file_base64(path: &Path) -> Result<String> {
    check_file_size(path)?;
    let bytes = fs::read(path).map_err(|e| {
        FreeAgentError::Attachment(format!("failed to read {}: {e}", path.display()))
    })?;
    Ok(STANDARD.encode(bytes))
}

/// Build an attachment record from a file on disk
///
/// # Errors
/// Returns `FreeAgentError::Attachment` for unsupported, unreadable or
/// oversized files
pub fn attachment_from_file(path: &Path, description: Option<&str>) -> Result<Attachment> {
    let content_type = content_type_for(path)?;
    let data = encode_file_base64(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            FreeAgentError::Attachment(format!("invalid file name: {}", path.display()))
        })?
        .to_string();

    debug!(file_name = %file_name, content_type = %content_type, "Encoded attachment");

    Ok(Attachment {
        file_name,
        description: description.unwrap_or(DEFAULT_ATTACHMENT_DESCRIPTION).to_string(),
        content_type: content_type.to_string(),
        data,
    })
}

/// Attach a file to an explanation, replacing any previous attachment
///
/// # Errors
/// See [`attachment_from_file`]
pub fn attach_file(
    payload: &mut ExplanationPayload,
    path: &Path,
    description: Option<&str>,
) -> Result<()> {
    payload.attachment = Some(attachment_from_file(path, description)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::{Builder, NamedTempFile};

    use super::*;

    fn temp_file(suffix: &str, contents: &[u8]) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    fn payload() -> ExplanationPayload {
        ExplanationPayload::new(
            "https://api.freeagent.com/v2/categories/285",
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            Decimal::new(1000, 2),
        )
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for(Path::new("a.pdf")).unwrap(), "application/x-pdf");
        assert_eq!(content_type_for(Path::new("a.PNG")).unwrap(), "image/x-png");
        assert_eq!(content_type_for(Path::new("a.jpeg")).unwrap(), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.jpg")).unwrap(), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.gif")).unwrap(), "image/gif");
        assert!(matches!(
            content_type_for(Path::new("a.exe")),
            Err(FreeAgentError::Attachment(_))
        ));
        assert!(content_type_for(Path::new("no_extension")).is_err());
    }

    #[test]
    fn small_file_passes_size_check() {
        let file = temp_file(".pdf", &vec![b'x'; 10 * 1024]);

        assert_eq!(check_file_size(file.path()).unwrap(), 10_240);
    }

    #[test]
    fn large_file_is_rejected() {
        let file = temp_file(".pdf", &vec![b'x'; 6 * 1024 * 1024]);

        assert!(matches!(check_file_size(file.path()), Err(FreeAgentError::Attachment(_))));
    }

    #[test]
    fn file_limit_is_inclusive() {
        let file = temp_file(".pdf", &vec![b'x'; 5 * 1024 * 1024]);

        assert!(check_file_size(file.path()).is_ok());
    }

    #[test]
    fn contents_are_base64_encoded() {
        let file = temp_file(".png", b"abc123");

        assert_eq!(encode_file_base64(file.path()).unwrap(), "YWJjMTIz");
    }

    #[test]
    fn attach_file_sets_payload_attachment() {
        let file = temp_file(".pdf", b"data");
        let mut explanation = payload();

        attach_file(&mut explanation, file.path(), Some("Receipt")).unwrap();

        let attachment = explanation.attachment.unwrap();
        assert_eq!(attachment.description, "Receipt");
        assert_eq!(attachment.content_type, "application/x-pdf");
        assert_eq!(attachment.data, "ZGF0YQ==");
        assert!(attachment.file_name.ends_with(".pdf"));
    }

    #[test]
    fn description_defaults_to_attachment() {
        let file = temp_file(".gif", b"GIF89a");

        let attachment = attachment_from_file(file.path(), None).unwrap();

        assert_eq!(attachment.description, "Attachment");
    }

    #[test]
    fn missing_file_is_an_attachment_error() {
        let result = attachment_from_file(Path::new("/nonexistent/receipt.pdf"), None);

        assert!(matches!(result, Err(FreeAgentError::Attachment(_))));
    }
}
