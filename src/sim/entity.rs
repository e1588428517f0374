//! Entities and the shape-handle registry
//!
//! An `Entity` owns exactly one shape on the surface and caches its box, so
//! reading a position never goes back to the host. The `Registry` resolves
//! handles returned by overlap queries to typed entity ids.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Bounds;
use crate::surface::{Fill, ShapeHandle, ShapeKind, Surface};

/// Stable entity identifier, allocated by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Closed set of collision partners a ball can meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Paddle,
    Brick,
    Bonus,
}

/// A drawable shape plus its last applied geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    handle: ShapeHandle,
    bounds: Bounds,
}

impl Entity {
    /// Create the backing shape on the surface
    pub fn spawn<S: Surface + ?Sized>(
        surface: &mut S,
        kind: ShapeKind,
        bounds: Bounds,
        fill: Fill,
    ) -> Self {
        let handle = surface.create_shape(kind, bounds, fill);
        Self { handle, bounds }
    }

    #[inline]
    pub fn handle(&self) -> ShapeHandle {
        self.handle
    }

    #[inline]
    pub fn position(&self) -> Bounds {
        self.bounds
    }

    pub fn move_by<S: Surface + ?Sized>(&mut self, surface: &mut S, delta: Vec2) {
        surface.translate(self.handle, delta.x, delta.y);
        self.bounds = self.bounds.translated(delta);
    }

    pub fn set_bounds<S: Surface + ?Sized>(&mut self, surface: &mut S, bounds: Bounds) {
        surface.reshape(self.handle, bounds);
        self.bounds = bounds;
    }

    pub fn restyle<S: Surface + ?Sized>(&self, surface: &mut S, fill: Fill) {
        surface.restyle(self.handle, fill);
    }

    /// Release the shape. Consumes the entity so it cannot be deleted twice.
    pub fn delete<S: Surface + ?Sized>(self, surface: &mut S) {
        surface.destroy(self.handle);
    }
}

/// Maps shape handles back to the entities that own them
#[derive(Debug, Clone, Default)]
pub struct Registry {
    by_handle: HashMap<ShapeHandle, (EntityId, EntityKind)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: ShapeHandle, id: EntityId, kind: EntityKind) {
        self.by_handle.insert(handle, (id, kind));
    }

    pub fn remove(&mut self, handle: ShapeHandle) -> Option<(EntityId, EntityKind)> {
        self.by_handle.remove(&handle)
    }

    /// `None` for handles that belong to no registered entity (balls, stale shapes)
    pub fn resolve(&self, handle: ShapeHandle) -> Option<(EntityId, EntityKind)> {
        self.by_handle.get(&handle).copied()
    }

    pub fn len(&self) -> usize {
        self.by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }
}
