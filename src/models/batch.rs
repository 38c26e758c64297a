use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identity, Point};

/// One client-submitted set of canvas changes, applied in one transaction.
///
/// Any subset of the lists may be absent or empty. Added elements may carry a
/// client-assigned id; modified elements must name an existing row; deleted
/// elements are plain ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeBatch {
    pub added_lines: Vec<LineChange>,
    pub modified_lines: Vec<LineChange>,
    pub deleted_lines: Vec<Uuid>,
    pub added_images: Vec<ImageChange>,
    pub modified_images: Vec<ImageChange>,
    pub deleted_images: Vec<Uuid>,
    pub added_text_boxes: Vec<TextBoxChange>,
    pub modified_text_boxes: Vec<TextBoxChange>,
    pub deleted_text_boxes: Vec<Uuid>,
}

impl ChangeBatch {
    /// True when the batch carries no operations at all.
    pub fn is_empty(&self) -> bool {
        self.added_lines.is_empty()
            && self.modified_lines.is_empty()
            && self.deleted_lines.is_empty()
            && self.added_images.is_empty()
            && self.modified_images.is_empty()
            && self.deleted_images.is_empty()
            && self.added_text_boxes.is_empty()
            && self.modified_text_boxes.is_empty()
            && self.deleted_text_boxes.is_empty()
    }
}

/// A line as it appears in a change batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LineChange {
    #[serde(default)]
    pub id: Identity,
    #[serde(default)]
    pub points: Vec<Point>,
}

/// An image as it appears in a change batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageChange {
    #[serde(default)]
    pub id: Identity,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub url: String,
}

/// A text box as it appears in a change batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextBoxChange {
    #[serde(default)]
    pub id: Identity,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_empty_batch() {
        let batch: ChangeBatch = serde_json::from_str("{}").unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_deserialize_camel_case_payload() {
        let payload = r#"{
            "addedLines": [{"points": [{"x": 0.0, "y": 0.0}, {"x": 1.0, "y": 1.0}]}],
            "deletedImages": ["8b6f8e1e-3a52-4a5e-9c3a-4f0f3c2d1b0a"],
            "addedTextBoxes": [{"x": 10.0, "y": 20.0, "width": 100.0, "height": 40.0, "content": "hello"}]
        }"#;

        let batch: ChangeBatch = serde_json::from_str(payload).unwrap();
        assert!(!batch.is_empty());
        assert_eq!(batch.added_lines.len(), 1);
        assert_eq!(batch.added_lines[0].id, Identity::New);
        assert_eq!(batch.added_lines[0].points.len(), 2);
        assert_eq!(batch.deleted_images.len(), 1);
        assert_eq!(batch.added_text_boxes[0].content, "hello");
        assert!(batch.modified_lines.is_empty());
    }

    #[test]
    fn test_empty_string_id_reads_as_new() {
        let payload = r#"{"addedImages": [{"id": "", "x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0, "url": "a.png"}]}"#;
        let batch: ChangeBatch = serde_json::from_str(payload).unwrap();
        assert_eq!(batch.added_images[0].id, Identity::New);
    }

    #[test]
    fn test_line_without_points_is_valid() {
        let payload = r#"{"addedLines": [{}]}"#;
        let batch: ChangeBatch = serde_json::from_str(payload).unwrap();
        assert!(batch.added_lines[0].points.is_empty());
    }

    #[test]
    fn test_non_batch_shape_is_rejected() {
        let result: Result<ChangeBatch, _> = serde_json::from_str(r#"{"addedLines": 42}"#);
        assert!(result.is_err());
    }
}
