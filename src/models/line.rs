use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single coordinate in canvas space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A freehand stroke: an ordered run of points.
///
/// Point order defines the stroke path and is preserved end to end. A line
/// with zero points is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Line {
    pub id: Uuid,
    pub points: Vec<Point>,
}
