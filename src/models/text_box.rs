use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text box placed on the canvas. Content is UTF-8 of unbounded length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextBox {
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: String,
}
