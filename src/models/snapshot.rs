use serde::{Deserialize, Serialize};

use super::{Image, Line, TextBox};

/// The full current canvas state returned on load.
///
/// There is no canvas entity of its own; the snapshot is derived by reading
/// all rows of the three entity tables. Empty storage yields an empty
/// aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSnapshot {
    pub lines: Vec<Line>,
    pub images: Vec<Image>,
    pub text_boxes: Vec<TextBox>,
}
