//! Narrow interfaces to the collaborators outside the simulation core:
//! the render context, the model catalog and the visibility detector.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Stable identity of a world object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Renderable model, resolved from its name once at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelId(pub u32);

/// Name to id table for the models the renderer knows about.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    ids: HashMap<String, ModelId>,
    names: Vec<String>,
}

impl ModelCatalog {
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut catalog = Self::default();
        for name in names {
            let name = name.into();
            if catalog.ids.contains_key(&name) {
                continue;
            }
            let id = ModelId(catalog.names.len() as u32);
            catalog.ids.insert(name.clone(), id);
            catalog.names.push(name);
        }
        catalog
    }

    pub fn resolve(&self, name: &str) -> Result<ModelId> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownModel(name.to_string()))
    }

    pub fn name(&self, id: ModelId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A renderable attached to the scene on behalf of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RenderHandle {
    pub object: ObjectId,
    pub model: ModelId,
}

/// Scene-graph collaborator. The core only attaches and detaches renderables.
pub trait RenderContext {
    fn add_renderable(&mut self, handle: RenderHandle);
    fn remove_renderable(&mut self, handle: RenderHandle);
}

#[derive(Debug, Default)]
struct SceneState {
    attached: BTreeSet<RenderHandle>,
    added: u64,
    removed: u64,
}

/// Render context that only tracks which renderables are attached.
///
/// Clones share the same state, so a caller can keep a clone to inspect
/// what the world attached.
#[derive(Debug, Clone, Default)]
pub struct SceneIndex {
    state: Arc<Mutex<SceneState>>,
}

impl SceneIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached(&self) -> Vec<RenderHandle> {
        self.state
            .lock()
            .map(|s| s.attached.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_attached(&self, object: ObjectId) -> bool {
        self.state
            .lock()
            .map(|s| s.attached.iter().any(|h| h.object == object))
            .unwrap_or(false)
    }

    /// Total (added, removed) calls seen so far.
    pub fn counters(&self) -> (u64, u64) {
        self.state
            .lock()
            .map(|s| (s.added, s.removed))
            .unwrap_or_default()
    }
}

impl RenderContext for SceneIndex {
    fn add_renderable(&mut self, handle: RenderHandle) {
        if let Ok(mut state) = self.state.lock() {
            state.attached.insert(handle);
            state.added += 1;
        }
    }

    fn remove_renderable(&mut self, handle: RenderHandle) {
        if let Ok(mut state) = self.state.lock() {
            // Removing an untracked handle is a no-op.
            if state.attached.remove(&handle) {
                state.removed += 1;
            }
        }
    }
}

/// A ray hit, as reported by a [`Detector`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub object: ObjectId,
    pub distance: f64,
    pub point: DVec3,
}

/// Visibility and ray queries against the scene.
///
/// Ray results are sorted by increasing distance. Directions are unit vectors.
pub trait Detector {
    fn is_visible(&self, object: ObjectId) -> bool;
    fn is_occluded(&self, object: ObjectId) -> bool;
    fn raycast(&self, origin: DVec3, direction: DVec3) -> Vec<Intersection>;
    fn raycast_to_object(&self, origin: DVec3, direction: DVec3, object: ObjectId) -> Vec<Intersection>;
}
