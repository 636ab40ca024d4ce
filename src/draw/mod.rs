//! Draw interaction state machine
//!
//! Tracks whether the user is drawing a search polygon and which polygon is
//! committed. Every command that changes polygon data returns a [`DrawEvent`];
//! callers refetch exactly when they receive one.
//!
//! ```text
//! Idle --start--> Drawing --finish--> Complete --clear--> Idle
//!                  |  ^                 |   ^
//!                cancel +-----start-----+   +-- edit vertex
//! ```

use crate::error::{Error, Result};
use crate::geometry::{GeoPoint, PolygonRings};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum distinct vertices of a closable ring
pub const MIN_RING_VERTICES: usize = 3;

/// Drawing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    /// Nothing being drawn, no polygon
    #[default]
    Idle,
    /// Vertices are being placed
    Drawing,
    /// A polygon exists and editing has stopped
    Complete,
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Drawing => write!(f, "drawing"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Polygon data change emitted by a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "rings", rename_all = "snake_case")]
pub enum DrawEvent {
    Created(PolygonRings),
    Updated(PolygonRings),
    Deleted,
}

impl DrawEvent {
    /// The polygon after this event, if any
    pub fn polygon(&self) -> Option<&PolygonRings> {
        match self {
            DrawEvent::Created(rings) | DrawEvent::Updated(rings) => Some(rings),
            DrawEvent::Deleted => None,
        }
    }
}

/// User input driving the state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DrawCommand {
    Start,
    AddVertex {
        point: GeoPoint,
    },
    Cancel,
    Finish,
    EditVertex {
        ring: usize,
        vertex: usize,
        point: GeoPoint,
    },
    Clear,
}

/// One draw session, living as long as the map view
#[derive(Debug, Clone, Default)]
pub struct DrawSession {
    mode: DrawMode,
    polygon: Option<PolygonRings>,
    vertices: Vec<GeoPoint>,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out with a committed polygon, as if it had just been drawn
    pub fn with_polygon(polygon: PolygonRings) -> Self {
        Self {
            mode: DrawMode::Complete,
            polygon: Some(polygon),
            vertices: Vec::new(),
        }
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// The committed polygon, which drives the search
    pub fn polygon(&self) -> Option<&PolygonRings> {
        self.polygon.as_ref()
    }

    /// Vertices placed so far in the current drawing
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// Dispatch a command to its transition
    pub fn apply(&mut self, command: DrawCommand) -> Result<Option<DrawEvent>> {
        match command {
            DrawCommand::Start => self.start(),
            DrawCommand::AddVertex { point } => self.add_vertex(point),
            DrawCommand::Cancel => self.cancel(),
            DrawCommand::Finish => self.finish(),
            DrawCommand::EditVertex {
                ring,
                vertex,
                point,
            } => self.edit_vertex(ring, vertex, point),
            DrawCommand::Clear => self.clear(),
        }
    }

    /// Begin drawing a new polygon
    ///
    /// From `Complete` the committed polygon stays active until the new one
    /// is finished, so no data changes here.
    pub fn start(&mut self) -> Result<Option<DrawEvent>> {
        match self.mode {
            DrawMode::Idle | DrawMode::Complete => {
                self.mode = DrawMode::Drawing;
                self.vertices.clear();
                Ok(None)
            }
            DrawMode::Drawing => Err(self.invalid("start")),
        }
    }

    /// Place a vertex of the in-progress shape
    pub fn add_vertex(&mut self, point: GeoPoint) -> Result<Option<DrawEvent>> {
        if self.mode != DrawMode::Drawing {
            return Err(self.invalid("add vertex"));
        }
        self.vertices.push(point);
        Ok(None)
    }

    /// Discard the in-progress shape
    ///
    /// Returns to `Complete` when a committed polygon is still held,
    /// otherwise to `Idle`.
    pub fn cancel(&mut self) -> Result<Option<DrawEvent>> {
        if self.mode != DrawMode::Drawing {
            return Err(self.invalid("cancel"));
        }
        self.vertices.clear();
        self.mode = if self.polygon.is_some() {
            DrawMode::Complete
        } else {
            DrawMode::Idle
        };
        Ok(None)
    }

    /// Close the in-progress shape and commit it
    pub fn finish(&mut self) -> Result<Option<DrawEvent>> {
        if self.mode != DrawMode::Drawing {
            return Err(self.invalid("finish"));
        }

        let mut ring = self.vertices.clone();
        ring.dedup();
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        let distinct = ring
            .iter()
            .enumerate()
            .filter(|(i, p)| !ring[..*i].contains(*p))
            .count();
        if distinct < MIN_RING_VERTICES {
            return Err(Error::InvalidPolygon(format!(
                "A polygon needs at least {} distinct vertices, got {}",
                MIN_RING_VERTICES, distinct
            )));
        }
        self.vertices.clear();
        ring.push(ring[0]);

        let rings = vec![ring];
        self.polygon = Some(rings.clone());
        self.mode = DrawMode::Complete;
        Ok(Some(DrawEvent::Created(rings)))
    }

    /// Move one vertex of the committed polygon
    ///
    /// Moving the first vertex of a closed ring moves its closing vertex too.
    pub fn edit_vertex(
        &mut self,
        ring_index: usize,
        vertex_index: usize,
        point: GeoPoint,
    ) -> Result<Option<DrawEvent>> {
        if self.mode != DrawMode::Complete {
            return Err(self.invalid("edit vertex"));
        }

        let ring = self
            .polygon
            .as_mut()
            .and_then(|rings| rings.get_mut(ring_index))
            .ok_or_else(|| Error::InvalidPolygon(format!("No ring at index {}", ring_index)))?;

        if vertex_index >= ring.len() {
            return Err(Error::InvalidPolygon(format!(
                "No vertex at index {} in ring {}",
                vertex_index, ring_index
            )));
        }

        let last = ring.len() - 1;

        let closed = last > 0 && ring[0] == ring[last];
        ring[vertex_index] = point;
        if closed && (vertex_index == 0 || vertex_index == last) {
            ring[0] = point;
            ring[last] = point;
        }

        let rings = ring_snapshot(&self.polygon);
        Ok(Some(DrawEvent::Updated(rings)))
    }

    /// Discard the committed polygon
    pub fn clear(&mut self) -> Result<Option<DrawEvent>> {
        if self.mode != DrawMode::Complete {
            return Err(self.invalid("clear"));
        }
        self.polygon = None;
        self.vertices.clear();
        self.mode = DrawMode::Idle;
        Ok(Some(DrawEvent::Deleted))
    }

    fn invalid(&self, command: &str) -> Error {
        Error::InvalidTransition {
            mode: self.mode.to_string(),
            command: command.to_string(),
        }
    }
}

fn ring_snapshot(polygon: &Option<PolygonRings>) -> PolygonRings {
    polygon.clone().unwrap_or_default()
}
