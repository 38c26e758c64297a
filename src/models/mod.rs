mod batch;
mod identity;
mod image;
mod line;
mod snapshot;
mod text_box;

pub use batch::{ChangeBatch, ImageChange, LineChange, TextBoxChange};
pub use identity::Identity;
pub use image::Image;
pub use line::{Line, Point};
pub use snapshot::CanvasSnapshot;
pub use text_box::TextBox;
