//! Dealer document uploads

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::RangeInclusive,
};

use thiserror::Error;

/// Accepted number of director ID copies.
pub const DIRECTOR_ID_COUNT: RangeInclusive<usize> = 3..=4;

/// A document the dealer uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Tax clearance certificate, one file
    TaxClearance,

    /// Certificate of incorporation, one file
    CertificateOfIncorporation,

    /// Copies of the directors' national IDs, several files
    DirectorIds,
}

impl DocumentKind {
    /// Form field name the files are posted under.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            DocumentKind::TaxClearance => "tax_clearance",
            DocumentKind::CertificateOfIncorporation => "certificate_of_incorporation",
            DocumentKind::DirectorIds => "national_ID_Copies_of_the_Directors",
        }
    }

    /// Check whether the field accepts more than one file.
    #[must_use]
    pub const fn is_multi_file(self) -> bool {
        matches!(self, DocumentKind::DirectorIds)
    }
}

impl Display for DocumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            DocumentKind::TaxClearance => "tax clearance",
            DocumentKind::CertificateOfIncorporation => "certificate of incorporation",
            DocumentKind::DirectorIds => "directors' ID copies",
        })
    }
}

/// A file picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name as picked
    pub file_name: String,

    /// File contents
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Create an upload file.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Reasons an upload is rejected before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentUploadError {
    /// A single-file field got the wrong number of files.
    #[error("{kind} takes exactly one file, got {count}")]
    SingleFileExpected {
        /// Field being uploaded
        kind: DocumentKind,

        /// Number of files picked
        count: usize,
    },

    /// The directors' ID copies are outside the accepted count.
    #[error("upload 3 to 4 directors' ID copies, got {0}")]
    DirectorIdCount(usize),

    /// A picked file has no name.
    #[error("a file without a name was picked for {0}")]
    UnnamedFile(DocumentKind),
}

/// Check the files picked for `kind`.
///
/// The same rule applies on every screen that uploads dealer documents.
///
/// # Errors
///
/// Returns a `DocumentUploadError` describing the first rule broken.
pub fn validate_upload(kind: DocumentKind, files: &[UploadFile]) -> Result<(), DocumentUploadError> {
    if files.iter().any(|file| file.file_name.trim().is_empty()) {
        return Err(DocumentUploadError::UnnamedFile(kind));
    }

    if kind.is_multi_file() {
        if !DIRECTOR_ID_COUNT.contains(&files.len()) {
            return Err(DocumentUploadError::DirectorIdCount(files.len()));
        }
    } else if files.len() != 1 {
        return Err(DocumentUploadError::SingleFileExpected {
            kind,
            count: files.len(),
        });
    }

    Ok(())
}

/// Join stored file names into the comma-separated field value.
pub fn join_file_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names.into_iter().collect::<Vec<_>>().join(",")
}
