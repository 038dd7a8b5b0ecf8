use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A decorative geometry primitive attached to a [`Component`]. Never consulted by the
/// core: carried through purely so the Design round-trips through serde for callers that
/// render it (SVG rendering lives outside this crate).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeometryPrimitive {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        #[serde(default)]
        rx: f64,
        #[serde(default)]
        ry: f64,
    },
    Circle { cx: f64, cy: f64, r: f64 },
    Polygon { points: Vec<(f64, f64)> },
    Path { d: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub w: f64,
    pub h: f64,
    #[serde(default = "default_true")]
    pub movable: bool,
    #[serde(default)]
    pub geometry: Option<Vec<GeometryPrimitive>>,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Net {
    pub name: String,
    pub nodes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub a: String,
    pub b: String,
    #[serde(default = "default_count")]
    pub count: i64,
}

fn default_count() -> i64 {
    1
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(rename = "W")]
    pub width: f64,
    #[serde(rename = "H")]
    pub height: f64,
    #[serde(default = "default_grid")]
    pub grid: f64,
    #[serde(default = "default_margin")]
    pub margin: f64,
}

fn default_grid() -> f64 {
    1.0
}

fn default_margin() -> f64 {
    3.0
}

impl Board {
    /// Length of the board's diagonal; the objective's normalization constant.
    /// Degrades to 0 when both dimensions are 0 rather than producing NaN.
    pub fn diagonal(&self) -> f64 {
        (self.width * self.width + self.height * self.height).sqrt()
    }
}

/// A single candidate placement slot, the centroid coordinate of a board position.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    pub fn euclid(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An ordered, deduplicated sequence of candidate positions. Length M must be >= the
/// component count K for a solver to succeed.
pub type PositionField = Vec<Position>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Design {
    pub board: Board,
    pub components: Vec<Component>,
    #[serde(default)]
    pub nets: Vec<Net>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub field: Option<PositionField>,
}

impl Design {
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Insertion order of component names, fixed once per solve and used as the GA's
    /// `comp_order` (index <-> component identifier translation table).
    pub fn comp_order(&self) -> Vec<String> {
        self.components.iter().map(|c| c.name.clone()).collect()
    }
}

/// A partial or total mapping from component identifier to board position. Final,
/// solver-returned placements are total (every component present) and injective (no two
/// components share a position).
pub type Placement = HashMap<String, Position>;
