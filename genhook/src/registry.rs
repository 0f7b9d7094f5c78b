//! Process-wide mapping of worlds to their override controller.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::world_override::{WorldOverride, OverrideError};
use crate::patch::{PatchError, ReferencePatcher};
use crate::world::WorldId;


/// Registry of the override controllers of all worlds of a host. Controllers are
/// created on first access and removed when their world is unloaded.
pub struct OverrideRegistry {
    patcher: Arc<dyn ReferencePatcher>,
    worlds: RwLock<IndexMap<WorldId, Arc<WorldOverride>>>,
}

impl OverrideRegistry {

    /// Create an empty registry patching the host through the given patcher.
    pub fn new(patcher: Arc<dyn ReferencePatcher>) -> Self {
        Self {
            patcher,
            worlds: RwLock::new(IndexMap::new()),
        }
    }

    /// Get the controller of a world, creating it if needed. The host's current
    /// pipeline for this world becomes the original one at creation.
    pub fn get_or_create(&self, world: &WorldId) -> Result<Arc<WorldOverride>, PatchError> {

        if let Some(controller) = self.worlds.read().get(world) {
            return Ok(Arc::clone(controller));
        }

        let mut worlds = self.worlds.write();
        // Another thread may have created it between our locks.
        if let Some(controller) = worlds.get(world) {
            return Ok(Arc::clone(controller));
        }

        let controller = Arc::new(WorldOverride::new(world.clone(), Arc::clone(&self.patcher))?);
        worlds.insert(world.clone(), Arc::clone(&controller));
        info!("override controller created for {world}");
        Ok(controller)

    }

    /// Get the controller of a world, if already created.
    pub fn get(&self, world: &WorldId) -> Option<Arc<WorldOverride>> {
        self.worlds.read().get(world).cloned()
    }

    /// Remove the controller of a world being unloaded, the host is not patched
    /// because the world and its pipeline are discarded together.
    pub fn remove(&self, world: &WorldId) -> Option<Arc<WorldOverride>> {
        self.worlds.write().shift_remove(world)
    }

    /// Reset every world, for example when the host shuts down. All worlds are
    /// attempted even if some fail, the first error is returned.
    pub fn reset_all(&self) -> Result<(), OverrideError> {

        // Snapshot so that patching happens without holding the registry lock.
        let controllers = self.worlds.read().values().cloned().collect::<Vec<_>>();
        let mut first_err = None;

        for controller in controllers {
            if let Err(err) = controller.reset() {
                warn!("failed to reset {}: {err}", controller.world());
                first_err.get_or_insert(err);
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }

    }

    /// Identities of all worlds with a controller, in creation order.
    pub fn worlds(&self) -> Vec<WorldId> {
        self.worlds.read().keys().cloned().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.worlds.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.worlds.read().is_empty()
    }

}
