// utils/upload.rs
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use thiserror::Error;

pub const MAX_PROOF_BYTES: usize = 5 * 1024 * 1024;

/// Public prefix the proof directory is served under.
pub const PROOF_URL_PREFIX: &str = "worker_proofs";

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "pdf"];
const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "application/pdf"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Proof document is required")]
    MissingFile,

    #[error("Only images (jpeg, jpg, png, gif) and PDF files are allowed")]
    UnsupportedType,

    #[error("Proof document must not exceed {0} bytes")]
    TooLarge(usize),

    #[error("Failed to store proof document: {0}")]
    Io(#[from] std::io::Error),
}

/// A proof document as received from the multipart body.
#[derive(Debug, Clone)]
pub struct ProofUpload {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredProof {
    pub file_name: String,
    /// Reference persisted on the application row.
    pub file_path: String,
    pub disk_path: PathBuf,
}

/// Returns the lowercased extension when both it and the MIME type are allowed.
pub fn validate_proof(upload: &ProofUpload) -> Result<String, UploadError> {
    if upload.bytes.is_empty() {
        return Err(UploadError::MissingFile);
    }

    if upload.bytes.len() > MAX_PROOF_BYTES {
        return Err(UploadError::TooLarge(MAX_PROOF_BYTES));
    }

    let extension = Path::new(&upload.original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or(UploadError::UnsupportedType)?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedType);
    }

    let mime_ok = upload
        .content_type
        .as_deref()
        .map(|mime| ALLOWED_MIME_TYPES.contains(&mime.to_ascii_lowercase().as_str()))
        .unwrap_or(false);

    if !mime_ok {
        return Err(UploadError::UnsupportedType);
    }

    Ok(extension)
}

fn unique_file_name(extension: &str) -> String {
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("{}_{}.{}", Utc::now().timestamp_millis(), suffix, extension)
}

pub async fn store_proof(upload_dir: &str, upload: &ProofUpload) -> Result<StoredProof, UploadError> {
    let extension = validate_proof(upload)?;
    let file_name = unique_file_name(&extension);
    let disk_path = Path::new(upload_dir).join(&file_name);

    tokio::fs::create_dir_all(upload_dir).await?;
    tokio::fs::write(&disk_path, &upload.bytes).await?;

    tracing::debug!("Stored proof document at {}", disk_path.display());

    Ok(StoredProof {
        file_path: format!("{}/{}", PROOF_URL_PREFIX, file_name),
        file_name,
        disk_path,
    })
}

/// Best effort; a leftover file is logged, not surfaced.
pub async fn remove_proof(proof: &StoredProof) {
    if let Err(e) = tokio::fs::remove_file(&proof.disk_path).await {
        tracing::warn!(
            "Failed to remove orphaned proof {}: {}",
            proof.disk_path.display(),
            e
        );
    }
}
