//! Optional file attachments carried alongside a form submission.
//!
//! Attachments are explicit values (field name, file name, bytes), never a
//! reference to some input widget. Whether a submission carries any of them
//! decides its wire encoding: JSON when empty, multipart otherwise.

use crate::error::CoreError;

/// Advisory media fields accepted by the upstream advisory endpoints.
pub const ADVISORY_ATTACHMENT_FIELDS: &[&str] =
    &["pdf_file", "image_file", "video_file", "audio_file"];

/// Media fields accepted by the enquiry reply endpoint.
pub const REPLY_ATTACHMENT_FIELDS: &[&str] =
    &["image_answer", "video_answer", "audio_answer", "docs_pdf"];

/// Files accepted by the manual quality-sample upload.
pub const QUALITY_UPLOAD_FIELDS: &[&str] = &["image_file", "remarks"];

/// A single selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Form field the file is submitted under.
    pub field: String,
    /// Original file name as chosen by the user.
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// The set of files attached to one submission. At most one file per field;
/// attaching a second file under the same field replaces the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachments {
    files: Vec<Attachment>,
}

impl Attachments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attachment: Attachment) {
        self.files.retain(|f| f.field != attachment.field);
        self.files.push(attachment);
    }

    pub fn with(mut self, attachment: Attachment) -> Self {
        self.push(attachment);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attachment> {
        self.files.iter()
    }

    pub fn get(&self, field: &str) -> Option<&Attachment> {
        self.files.iter().find(|f| f.field == field)
    }

    /// File name attached under `field`, if any.
    pub fn file_name(&self, field: &str) -> Option<String> {
        self.get(field).map(|f| f.file_name.clone())
    }

    /// Reject files submitted under a field the form does not know about.
    pub fn ensure_allowed(&self, allowed: &[&str]) -> Result<(), CoreError> {
        match self.files.iter().find(|f| !allowed.contains(&f.field.as_str())) {
            Some(unknown) => Err(CoreError::Validation(format!(
                "Unexpected file field '{}'",
                unknown.field
            ))),
            None => Ok(()),
        }
    }
}
