use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image placed on the canvas.
///
/// `url` is a loose reference to uploaded content, not a foreign key:
/// deleting the image row leaves the file behind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub url: String,
}
