//! Drawable surface abstraction
//!
//! The host owns the actual display. The engine only creates, moves, restyles
//! and destroys shapes through this trait, and asks it which shapes overlap a
//! box. `MemorySurface` is a headless implementation for the native binary
//! and tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::Bounds;

/// Opaque handle to a shape living on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeHandle(pub u32);

/// Primitive shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Oval,
    Rectangle,
}

/// Fill color (any color string the host understands)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fill(pub &'static str);

/// Arena size as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

/// Host-provided drawing surface
///
/// Preconditions (not validated): arena dimensions are positive and handles
/// passed back in were produced by `create_shape` and not yet destroyed.
pub trait Surface {
    fn create_shape(&mut self, kind: ShapeKind, bounds: Bounds, fill: Fill) -> ShapeHandle;

    /// Current geometry of a shape. The engine never reads geometry back:
    /// entities cache their bounds and keep the surface in sync on every
    /// move. Hosts and tests use this to inspect what was drawn.
    fn bounds(&self, handle: ShapeHandle) -> Option<Bounds>;

    fn translate(&mut self, handle: ShapeHandle, dx: f32, dy: f32);

    /// Replace a shape's geometry
    fn reshape(&mut self, handle: ShapeHandle, bounds: Bounds);

    fn restyle(&mut self, handle: ShapeHandle, fill: Fill);

    fn destroy(&mut self, handle: ShapeHandle);

    /// Handles whose boxes intersect `area` (inclusive), in creation order
    fn query_overlapping(&self, area: &Bounds) -> Vec<ShapeHandle>;

    fn arena(&self) -> Arena;
}

/// A shape stored by the in-memory surface
#[derive(Debug, Clone, Serialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub bounds: Bounds,
    pub fill: Fill,
}

/// Headless surface keeping every shape in memory
#[derive(Debug, Clone)]
pub struct MemorySurface {
    arena: Arena,
    shapes: BTreeMap<ShapeHandle, Shape>,
    next_handle: u32,
}

impl MemorySurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            arena: Arena { width, height },
            shapes: BTreeMap::new(),
            next_handle: 1,
        }
    }

    /// Simulate the host window being resized
    pub fn resize(&mut self, width: f32, height: f32) {
        log::info!(
            "Surface resized {}x{} -> {}x{}",
            self.arena.width,
            self.arena.height,
            width,
            height
        );
        self.arena = Arena { width, height };
    }

    pub fn shape(&self, handle: ShapeHandle) -> Option<&Shape> {
        self.shapes.get(&handle)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }
}

impl Surface for MemorySurface {
    fn create_shape(&mut self, kind: ShapeKind, bounds: Bounds, fill: Fill) -> ShapeHandle {
        let handle = ShapeHandle(self.next_handle);
        self.next_handle += 1;
        self.shapes.insert(handle, Shape { kind, bounds, fill });
        handle
    }

    fn bounds(&self, handle: ShapeHandle) -> Option<Bounds> {
        self.shapes.get(&handle).map(|s| s.bounds)
    }

    fn translate(&mut self, handle: ShapeHandle, dx: f32, dy: f32) {
        if let Some(shape) = self.shapes.get_mut(&handle) {
            shape.bounds = shape.bounds.translated(glam::Vec2::new(dx, dy));
        }
    }

    fn reshape(&mut self, handle: ShapeHandle, bounds: Bounds) {
        if let Some(shape) = self.shapes.get_mut(&handle) {
            shape.bounds = bounds;
        }
    }

    fn restyle(&mut self, handle: ShapeHandle, fill: Fill) {
        if let Some(shape) = self.shapes.get_mut(&handle) {
            shape.fill = fill;
        }
    }

    fn destroy(&mut self, handle: ShapeHandle) {
        if self.shapes.remove(&handle).is_none() {
            log::warn!("Destroy of unknown shape {:?}", handle);
        }
    }

    fn query_overlapping(&self, area: &Bounds) -> Vec<ShapeHandle> {
        self.shapes
            .iter()
            .filter(|(_, shape)| shape.bounds.intersects(area))
            .map(|(&handle, _)| handle)
            .collect()
    }

    fn arena(&self) -> Arena {
        self.arena
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_query() {
        let mut surface = MemorySurface::new(100.0, 100.0);
        let a = surface.create_shape(
            ShapeKind::Rectangle,
            Bounds::new(0.0, 0.0, 10.0, 10.0),
            Fill("red"),
        );
        let b = surface.create_shape(
            ShapeKind::Oval,
            Bounds::new(20.0, 20.0, 30.0, 30.0),
            Fill("white"),
        );

        assert_eq!(surface.query_overlapping(&Bounds::new(5.0, 5.0, 25.0, 25.0)), vec![a, b]);
        assert_eq!(surface.query_overlapping(&Bounds::new(10.0, 10.0, 12.0, 12.0)), vec![a]);
        assert!(surface.query_overlapping(&Bounds::new(50.0, 50.0, 60.0, 60.0)).is_empty());
    }

    #[test]
    fn test_translate_reshape_restyle_destroy() {
        let mut surface = MemorySurface::new(100.0, 100.0);
        let h = surface.create_shape(
            ShapeKind::Rectangle,
            Bounds::new(0.0, 0.0, 10.0, 10.0),
            Fill("red"),
        );

        surface.translate(h, 5.0, -2.0);
        assert_eq!(surface.bounds(h), Some(Bounds::new(5.0, -2.0, 15.0, 8.0)));

        surface.reshape(h, Bounds::new(1.0, 1.0, 2.0, 2.0));
        assert_eq!(surface.bounds(h), Some(Bounds::new(1.0, 1.0, 2.0, 2.0)));

        surface.restyle(h, Fill("blue"));
        assert_eq!(surface.shape(h).map(|s| s.fill), Some(Fill("blue")));

        surface.destroy(h);
        assert_eq!(surface.bounds(h), None);
        assert_eq!(surface.shape_count(), 0);
    }

    #[test]
    fn test_resize() {
        let mut surface = MemorySurface::new(610.0, 400.0);
        surface.resize(300.0, 200.0);
        assert_eq!(surface.arena(), Arena { width: 300.0, height: 200.0 });
    }
}
