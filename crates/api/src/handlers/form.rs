//! Multipart form reading.

use std::collections::HashMap;

use axum::extract::Multipart;

use rubberwatch_core::attachments::{Attachment, Attachments};

use crate::error::{AppError, AppResult};

/// Text fields and file attachments of one multipart submission.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    pub files: Attachments,
}

impl FormData {
    /// Read every part. Parts with a file name are attachments; an empty
    /// file part (no file chosen) is dropped.
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name.is_empty() {
                continue;
            }
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    if file_name.is_empty() && data.is_empty() {
                        continue;
                    }
                    let mut attachment = Attachment::new(name, file_name, data.to_vec());
                    if let Some(content_type) = content_type {
                        attachment = attachment.with_content_type(content_type);
                    }
                    form.files.push(attachment);
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        tracing::debug!(
            fields = form.fields.len(),
            files = form.files.len(),
            "Read multipart form"
        );
        Ok(form)
    }

    /// Value of a text field, `""` when absent.
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }
}
