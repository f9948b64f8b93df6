//! Uploaded documents and the bounded set the user attaches to a request.

use serde::{Deserialize, Serialize};

use crate::error::ComposeError;

/// How many documents may be attached at once.
pub const MAX_ATTACHMENTS: usize = 3;

/// A file the user uploaded, already reduced to plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub filename: String,
    pub text: String,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
        }
    }
}

/// Up to [`MAX_ATTACHMENTS`] documents in upload order.
#[derive(Debug, Clone, Default)]
pub struct Attachments {
    docs: Vec<UploadedDocument>,
}

impl Attachments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, doc: UploadedDocument) -> Result<(), ComposeError> {
        if self.is_full() {
            return Err(ComposeError::AttachmentLimit {
                max: MAX_ATTACHMENTS,
            });
        }
        self.docs.push(doc);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<UploadedDocument> {
        if index < self.docs.len() {
            Some(self.docs.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.docs.clear();
    }

    pub fn is_full(&self) -> bool {
        self.docs.len() >= MAX_ATTACHMENTS
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn as_slice(&self) -> &[UploadedDocument] {
        &self.docs
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadedDocument> {
        self.docs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourth_attachment_rejected() {
        let mut attachments = Attachments::new();
        for i in 0..MAX_ATTACHMENTS {
            attachments
                .add(UploadedDocument::new(format!("f{}.txt", i), "x"))
                .unwrap();
        }
        assert!(attachments.is_full());

        let err = attachments
            .add(UploadedDocument::new("extra.txt", "x"))
            .unwrap_err();
        assert_eq!(err, ComposeError::AttachmentLimit { max: 3 });
        assert_eq!(attachments.len(), 3);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut attachments = Attachments::new();
        attachments.add(UploadedDocument::new("a", "1")).unwrap();
        attachments.add(UploadedDocument::new("b", "2")).unwrap();
        attachments.add(UploadedDocument::new("c", "3")).unwrap();

        let removed = attachments.remove(1).unwrap();
        assert_eq!(removed.filename, "b");
        let names: Vec<&str> = attachments.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert!(attachments.remove(5).is_none());
    }
}
