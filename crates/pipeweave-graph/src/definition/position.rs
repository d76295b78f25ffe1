//! Position type for canvas node placement.

use serde::{Deserialize, Serialize};

/// Position of a node on the canvas.
///
/// Carried for the rendering layer; the graph engine never consults it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
