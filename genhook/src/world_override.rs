//! Per-world override controller. A [`WorldOverride`] is either unmodified, the host
//! running its original pipeline, or overridden, the host running an
//! [`InjectedPipeline`] owned by the controller.
//!
//! Only installing and resetting patch host references, every other change mutates
//! the installed pipeline in place.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn, instrument};

use crate::gen::{BiomeClassifier, BlockPlacer, BridgeConfig, ChunkPipeline, HostClassifier,
    HostTerrain, NoiseSampler, NoiseTerrainBridge, PlacerTerrain, TerrainGenerator, WorldDecorator};
use crate::patch::{HostPipelines, HostShape, PatchError, ReferencePatcher};
use crate::inject::InjectedPipeline;
use crate::world::WorldId;


/// Error of an override operation.
#[derive(Error, Debug)]
pub enum OverrideError {
    /// The host references could not be patched, the controller kept its state.
    #[error("patch error: {0}")]
    Patch(#[from] PatchError),
    /// The given strategy is not valid, nothing has been changed.
    #[error("precondition violated: {0}")]
    Precondition(&'static str),
}

/// Override controller of a single world.
pub struct WorldOverride {
    world: WorldId,
    patcher: Arc<dyn ReferencePatcher>,
    /// The host's pipelines before any override, restored on reset.
    original: HostPipelines,
    /// Shape of the host, probed on first patch.
    shape: OnceCell<HostShape>,
    /// The currently installed pipeline, none when the host runs the original one.
    /// This lock is only taken by administrative operations.
    active: Mutex<Option<Arc<InjectedPipeline>>>,
}

impl WorldOverride {

    /// Create the controller of a world, capturing the pipelines currently used by the
    /// host as the original ones.
    pub fn new(world: WorldId, patcher: Arc<dyn ReferencePatcher>) -> Result<Self, PatchError> {
        let original = patcher.current(&world)?;
        Ok(Self {
            world,
            patcher,
            original,
            shape: OnceCell::new(),
            active: Mutex::new(None),
        })
    }

    #[inline]
    pub fn world(&self) -> &WorldId {
        &self.world
    }

    /// The pipeline captured at creation, that the host runs when not overridden.
    /// This is the host's custom generator if it had one.
    #[inline]
    pub fn original_pipeline(&self) -> &Arc<dyn ChunkPipeline> {
        self.original.effective()
    }

    /// Return the installed pipeline, if overridden.
    pub fn injected(&self) -> Option<Arc<InjectedPipeline>> {
        self.active.lock().clone()
    }

    #[inline]
    pub fn is_overridden(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Return the terrain generator currently effective for the world: the installed
    /// one if overridden, or a view of the host's pipeline.
    pub fn terrain_generator(&self) -> Arc<dyn TerrainGenerator> {
        match &*self.active.lock() {
            Some(injected) => injected.terrain_generator(),
            None => Arc::new(HostTerrain::new(Arc::clone(self.original_pipeline()))),
        }
    }

    /// Same as [`Self::terrain_generator`], this is the terrain generator that custom
    /// strategies may wrap to reuse the host's generation.
    #[inline]
    pub fn base_terrain_generator(&self) -> Arc<dyn TerrainGenerator> {
        self.terrain_generator()
    }

    /// Return the biome classifier currently effective for the world: the installed
    /// one if overridden, or a view of the host's pipeline.
    pub fn biome_classifier(&self) -> Arc<dyn BiomeClassifier> {
        self.effective_classifier(&self.active.lock())
    }

    /// Return the decorator of the world, installing a pipeline that keeps the host's
    /// terrain generation if not overridden yet.
    pub fn world_decorator(&self) -> Result<Arc<WorldDecorator>, OverrideError> {
        let mut active = self.active.lock();
        let injected = self.ensure_installed(&mut active)?;
        Ok(Arc::clone(injected.world_decorator()))
    }

    /// Set the terrain generator of the world, installing the override pipeline if
    /// needed or replacing the generator of the installed one in place.
    pub fn set_terrain_generator(&self, terrain: Arc<dyn TerrainGenerator>) -> Result<(), OverrideError> {
        self.set_terrain_locked(&mut self.active.lock(), terrain)
    }

    /// Set a strategy that only places blocks, its heights are reported as the
    /// placeholder height.
    pub fn set_block_placer(&self, placer: Arc<dyn BlockPlacer>) -> Result<(), OverrideError> {
        self.set_terrain_generator(Arc::new(PlacerTerrain::new(placer)))
    }

    /// Set the biome classifier of the world, installing a pipeline that keeps the
    /// host's terrain generation if not overridden yet.
    pub fn set_biome_classifier(&self, classifier: Arc<dyn BiomeClassifier>) -> Result<(), OverrideError> {
        let mut active = self.active.lock();
        let injected = self.ensure_installed(&mut active)?;
        injected.set_biome_classifier(classifier)?;
        debug!("{}: biome classifier replaced", self.world);
        Ok(())
    }

    /// Set a noise sampler for the world's heights, the terrain is painted with the
    /// default materials of the currently effective biome classifier. The returned
    /// bridge is the installed terrain generator.
    pub fn set_noise_sampler(&self, sampler: Arc<dyn NoiseSampler>) -> Result<Arc<NoiseTerrainBridge>, OverrideError> {
        self.set_noise_sampler_with(sampler, BridgeConfig::default())
    }

    /// Same as [`Self::set_noise_sampler`] with a custom bridge configuration.
    pub fn set_noise_sampler_with(&self,
        sampler: Arc<dyn NoiseSampler>,
        config: BridgeConfig,
    ) -> Result<Arc<NoiseTerrainBridge>, OverrideError> {
        // The classifier read and the generator change happen under the same lock.
        let mut active = self.active.lock();
        let classifier = self.effective_classifier(&active);
        let bridge = Arc::new(NoiseTerrainBridge::with_config(classifier, sampler, config)?);
        self.set_terrain_locked(&mut active, Arc::clone(&bridge) as Arc<dyn TerrainGenerator>)?;
        Ok(bridge)
    }

    /// Restore the original pipeline in the host and discard the installed one. This
    /// does nothing if not overridden. If the host cannot be patched, the world stays
    /// overridden.
    #[instrument(skip_all, fields(world = %self.world))]
    pub fn reset(&self) -> Result<(), OverrideError> {

        let mut active = self.active.lock();
        if active.is_none() {
            return Ok(());
        }

        let shape = self.probe()?;
        if let Err(err) = self.patcher.restore(&self.world, shape, &self.original) {
            warn!("failed to restore original pipeline: {err}");
            return Err(err.into());
        }

        *active = None;
        info!("original pipeline restored");
        Ok(())

    }

    /// Internal function returning the effective classifier, the active lock must be
    /// held.
    fn effective_classifier(&self, active: &Option<Arc<InjectedPipeline>>) -> Arc<dyn BiomeClassifier> {
        match active {
            Some(injected) => injected.biome_classifier(),
            None => Arc::new(HostClassifier::new(Arc::clone(self.original_pipeline()))),
        }
    }

    /// Internal function to install the given terrain generator or replace it in
    /// place, the active lock must be held.
    fn set_terrain_locked(&self, active: &mut Option<Arc<InjectedPipeline>>, terrain: Arc<dyn TerrainGenerator>) -> Result<(), OverrideError> {
        if let Some(injected) = &*active {
            injected.set_terrain_generator(terrain)?;
            debug!("{}: terrain generator replaced", self.world);
            return Ok(());
        }
        *active = Some(self.install(terrain)?);
        Ok(())
    }

    /// Internal function returning the installed pipeline, installing one that keeps
    /// the host's terrain generation if there is none.
    fn ensure_installed<'a>(&self, active: &'a mut Option<Arc<InjectedPipeline>>) -> Result<&'a Arc<InjectedPipeline>, OverrideError> {
        let injected = match active.take() {
            Some(injected) => injected,
            None => self.install(Arc::new(HostTerrain::new(Arc::clone(self.original_pipeline()))))?,
        };
        Ok(active.insert(injected))
    }

    /// Internal function to create a pipeline and patch the host with it, the caller
    /// must hold the active lock and store the pipeline only if successful.
    #[instrument(skip_all, fields(world = %self.world))]
    fn install(&self, terrain: Arc<dyn TerrainGenerator>) -> Result<Arc<InjectedPipeline>, OverrideError> {

        let shape = self.probe()?;
        let injected = Arc::new(InjectedPipeline::new(self.original_pipeline(), terrain));

        if let Err(err) = self.patcher.patch(&self.world, shape, Arc::clone(&injected) as Arc<dyn ChunkPipeline>) {
            warn!("failed to install pipeline: {err}");
            return Err(err.into());
        }

        info!("pipeline installed in {} holders", shape.holders().len());
        Ok(injected)

    }

    /// Internal function to probe the host shape, only once successful.
    fn probe(&self) -> Result<&HostShape, PatchError> {
        self.shape.get_or_try_init(|| {
            let shape = self.patcher.probe(&self.world)?;
            debug!("{}: host probed, holders: {:?}", self.world, shape.holders());
            Ok(shape)
        })
    }

}


#[cfg(test)]
mod tests {

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use glam::IVec3;

    use super::*;
    use crate::host::{FlatPipeline, HostPatcher, HostVariant, HostWorld};
    use crate::gen::{same_pipeline, DecorationStage, GeneratingChunk, HeightKind, PLACEHOLDER_HEIGHT};
    use crate::patch::HostHolder;
    use crate::chunk::CHUNK_WIDTH;
    use crate::biome::Biome;
    use crate::block;

    /// Patcher of the reference host counting patches, and able to fail on demand.
    #[derive(Default)]
    struct CountingPatcher {
        inner: HostPatcher,
        patches: AtomicUsize,
        fail: AtomicBool,
    }

    impl CountingPatcher {
        fn patches(&self) -> usize {
            self.patches.load(Ordering::SeqCst)
        }

        fn count(&self, world: &WorldId) -> Result<(), PatchError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(PatchError::MissingReference { world: world.clone(), holder: HostHolder::Provider });
            }
            self.patches.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    impl ReferencePatcher for CountingPatcher {

        fn probe(&self, world: &WorldId) -> Result<HostShape, PatchError> {
            self.inner.probe(world)
        }

        fn current(&self, world: &WorldId) -> Result<HostPipelines, PatchError> {
            self.inner.current(world)
        }

        fn patch(&self, world: &WorldId, shape: &HostShape, pipeline: Arc<dyn ChunkPipeline>) -> Result<(), PatchError> {
            self.count(world)?;
            self.inner.patch(world, shape, pipeline)
        }

        fn restore(&self, world: &WorldId, shape: &HostShape, original: &HostPipelines) -> Result<(), PatchError> {
            self.count(world)?;
            self.inner.restore(world, shape, original)
        }

    }

    /// Places a single layer of the given block, at the given height.
    struct LayerTerrain(u8, i32);
    impl TerrainGenerator for LayerTerrain {
        fn height(&self, _x: i32, _z: i32, _kind: HeightKind) -> i32 {
            self.1
        }
        fn place_blocks(&self, chunk: &mut GeneratingChunk) {
            for x in 0..CHUNK_WIDTH {
                for z in 0..CHUNK_WIDTH {
                    chunk.set_block(IVec3::new(x as i32, self.1, z as i32), self.0);
                }
            }
        }
    }

    fn setup(variant: HostVariant) -> (Arc<CountingPatcher>, Arc<HostWorld>, WorldOverride) {
        let id = WorldId::new("overworld");
        let patcher = Arc::new(CountingPatcher::default());
        let world = Arc::new(HostWorld::new(id.clone(), 99, variant, Arc::new(FlatPipeline)));
        patcher.inner.add_world(Arc::clone(&world));
        let controller = WorldOverride::new(id, Arc::clone(&patcher) as Arc<dyn ReferencePatcher>).unwrap();
        (patcher, world, controller)
    }

    /// Assert that every holder of the world references the given pipeline.
    fn assert_live(world: &HostWorld, expected: &Arc<dyn ChunkPipeline>) {
        for holder in [HostHolder::Provider, HostHolder::ChunkMap, HostHolder::TaskScheduler] {
            if let Some(pipeline) = world.pipeline(holder) {
                assert!(same_pipeline(&pipeline, expected), "{holder:?} not patched");
            }
        }
    }

    fn injected_as_pipeline(controller: &WorldOverride) -> Arc<dyn ChunkPipeline> {
        controller.injected().unwrap()
    }

    #[test]
    fn scenario() {

        let (patcher, world, controller) = setup(HostVariant::Threaded);
        let original = Arc::clone(controller.original_pipeline());

        assert!(!controller.is_overridden());
        assert_live(&world, &original);

        controller.set_terrain_generator(Arc::new(LayerTerrain(block::SAND, 10))).unwrap();
        assert!(controller.is_overridden());
        let injected = injected_as_pipeline(&controller);
        assert_live(&world, &injected);
        assert_eq!(world.generate_chunk(0, 0).block(IVec3::new(1, 10, 1)), block::SAND);

        controller.set_terrain_generator(Arc::new(LayerTerrain(block::GRAVEL, 20))).unwrap();
        assert!(same_pipeline(&injected_as_pipeline(&controller), &injected));
        assert_live(&world, &injected);
        assert_eq!(world.generate_chunk(0, 0).block(IVec3::new(1, 20, 1)), block::GRAVEL);
        assert_eq!(controller.terrain_generator().height(5, 5, HeightKind::Surface), 20);

        controller.reset().unwrap();
        assert!(!controller.is_overridden());
        assert_live(&world, &original);
        assert_eq!(world.generate_chunk(0, 0).block(IVec3::new(1, FlatPipeline::SURFACE, 1)), block::GRASS);

        assert_eq!(patcher.patches(), 2);

    }

    #[test]
    fn reset_is_idempotent() {

        let (patcher, _, controller) = setup(HostVariant::Standard);

        controller.reset().unwrap();
        assert_eq!(patcher.patches(), 0);

        fn nothing(_chunk: &mut GeneratingChunk) { }

        controller.set_block_placer(Arc::new(nothing)).unwrap();
        controller.reset().unwrap();
        controller.reset().unwrap();
        assert_eq!(patcher.patches(), 2);
        assert!(!controller.is_overridden());

    }

    #[test]
    fn round_trip_restores_original() {

        let (_, world, controller) = setup(HostVariant::Threaded);
        let original = world.active_pipeline();

        controller.set_biome_classifier(Arc::new(|_: IVec3| Biome::Desert)).unwrap();
        controller.set_terrain_generator(Arc::new(LayerTerrain(block::SAND, 3))).unwrap();
        controller.set_noise_sampler(Arc::new(|_: i32, _: i32, _: HeightKind| 70)).unwrap();
        controller.set_biome_classifier(Arc::new(|_: IVec3| Biome::Tundra)).unwrap();
        controller.reset().unwrap();

        assert_live(&world, &original);
        assert!(same_pipeline(&world.active_pipeline(), &original));
        assert_eq!(controller.biome_classifier().classify(IVec3::ZERO), Biome::Plains);

    }

    #[test]
    fn round_trip_restores_custom_generator() {

        let id = WorldId::new("overworld");
        let patcher = Arc::new(CountingPatcher::default());
        let world = Arc::new(HostWorld::new(id.clone(), 99, HostVariant::Standard, Arc::new(FlatPipeline)));
        let custom: Arc<dyn ChunkPipeline> = Arc::new(FlatPipeline);
        world.set_custom_generator(Arc::clone(&custom));
        patcher.inner.add_world(Arc::clone(&world));

        let controller = WorldOverride::new(id, Arc::clone(&patcher) as Arc<dyn ReferencePatcher>).unwrap();
        assert!(same_pipeline(controller.original_pipeline(), &custom));

        controller.world_decorator().unwrap();
        assert!(!world.has_custom_generator());
        // The installed pipeline keeps generating with the custom generator.
        assert_eq!(world.generate_chunk(0, 0).block(IVec3::new(2, FlatPipeline::SURFACE, 2)), block::GRASS);

        controller.reset().unwrap();
        assert!(world.has_custom_generator());
        assert!(same_pipeline(&world.active_pipeline(), &custom));
        assert_eq!(patcher.patches(), 2);

    }

    #[test]
    fn lazy_install_from_classifier() {

        let (patcher, world, controller) = setup(HostVariant::Standard);

        controller.set_biome_classifier(Arc::new(|_: IVec3| Biome::Desert)).unwrap();
        assert_eq!(patcher.patches(), 1);
        assert!(controller.is_overridden());
        assert_live(&world, &injected_as_pipeline(&controller));

        controller.set_biome_classifier(Arc::new(|_: IVec3| Biome::Tundra)).unwrap();
        assert_eq!(patcher.patches(), 1);
        assert_eq!(world.active_pipeline().classify(IVec3::ZERO), Biome::Tundra);

        // Terrain is still generated by the host.
        assert_eq!(world.generate_chunk(0, 0).block(IVec3::new(1, FlatPipeline::SURFACE, 1)), block::GRASS);

    }

    #[test]
    fn self_forwarding_classifier_rejected() {

        let (patcher, world, controller) = setup(HostVariant::Standard);
        controller.set_biome_classifier(Arc::new(|_: IVec3| Biome::Desert)).unwrap();

        let looping = Arc::new(HostClassifier::new(injected_as_pipeline(&controller)));
        let res = controller.set_biome_classifier(looping);
        assert!(matches!(res, Err(OverrideError::Precondition(_))));
        assert_eq!(world.active_pipeline().classify(IVec3::ZERO), Biome::Desert);
        assert_eq!(patcher.patches(), 1);

    }

    #[test]
    fn lazy_install_from_decorator() {

        let (patcher, world, controller) = setup(HostVariant::Standard);

        let decorator = controller.world_decorator().unwrap();
        assert_eq!(patcher.patches(), 1);
        assert!(controller.is_overridden());

        let again = controller.world_decorator().unwrap();
        assert_eq!(patcher.patches(), 1);
        assert!(Arc::ptr_eq(&decorator, &again));

        // The baseline pipeline keeps the host's terrain and default decorations.
        fn marker(chunk: &mut GeneratingChunk) {
            chunk.set_block(IVec3::new(0, 100, 0), block::CLAY);
        }

        decorator.with_custom_decoration(DecorationStage::Features, Arc::new(marker));
        let chunk = world.generate_chunk(0, 0);
        assert_eq!(chunk.block(IVec3::new(3, FlatPipeline::SURFACE, 3)), block::GRASS);
        assert_eq!(chunk.block(IVec3::new(0, 100, 0)), block::CLAY);

        // Decorations outlive generator changes.
        controller.set_terrain_generator(Arc::new(LayerTerrain(block::SAND, 1))).unwrap();
        assert!(Arc::ptr_eq(&controller.world_decorator().unwrap(), &decorator));
        assert_eq!(world.generate_chunk(0, 0).block(IVec3::new(0, 100, 0)), block::CLAY);
        assert_eq!(patcher.patches(), 1);

    }

    #[test]
    fn noise_sampler_composes_with_classifier() {

        fn classifier(pos: IVec3) -> Biome {
            if pos.z < 8 { Biome::Desert } else { Biome::Forest }
        }

        fn sampler(x: i32, z: i32, kind: HeightKind) -> i32 {
            match kind {
                HeightKind::Surface => 66 + (x + z) % 5,
                _ => 40,
            }
        }

        let (_, world, controller) = setup(HostVariant::Standard);
        controller.set_biome_classifier(Arc::new(classifier)).unwrap();
        let bridge = controller.set_noise_sampler(Arc::new(sampler)).unwrap();

        for kind in [HeightKind::Surface, HeightKind::OceanFloor, HeightKind::LowestSpawn] {
            assert_eq!(bridge.height(7, 2, kind), sampler(7, 2, kind));
            assert_eq!(controller.terrain_generator().height(7, 2, kind), sampler(7, 2, kind));
        }

        let chunk = world.generate_chunk(0, 0);
        for x in 0..16 {
            for z in 0..16 {
                let top = sampler(x, z, HeightKind::Surface);
                let materials = classifier(IVec3::new(x, 0, z)).materials();
                assert_eq!(chunk.highest_block(IVec3::new(x, 0, z)), Some(top));
                assert_eq!(chunk.block(IVec3::new(x, top, z)), materials.top);
                assert_eq!(chunk.block(IVec3::new(x, top - 1, z)), materials.filler);
            }
        }

    }

    #[test]
    fn noise_sampler_paints_with_current_classifier() {

        fn data_ptr(classifier: &Arc<dyn BiomeClassifier>) -> *const () {
            Arc::as_ptr(classifier) as *const ()
        }

        let (patcher, _, controller) = setup(HostVariant::Standard);
        let sampler = |_: i32, _: i32, _: HeightKind| 70;

        controller.set_biome_classifier(Arc::new(|_: IVec3| Biome::Desert)).unwrap();
        let installed = controller.biome_classifier();
        let bridge = controller.set_noise_sampler(Arc::new(sampler)).unwrap();
        assert_eq!(data_ptr(bridge.classifier()), data_ptr(&installed));

        // Racing classifier changes and resets, every bridge installed keeps working.
        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..50 {
                    controller.set_biome_classifier(Arc::new(|_: IVec3| Biome::Tundra)).unwrap();
                    controller.reset().unwrap();
                }
            });
            for _ in 0..50 {
                let bridge = controller.set_noise_sampler(Arc::new(sampler)).unwrap();
                assert_eq!(bridge.height(0, 0, HeightKind::Surface), 70);
            }
        });

        controller.reset().unwrap();
        assert!(!controller.is_overridden());
        assert!(patcher.patches() >= 2);

    }

    #[test]
    fn block_placer_reports_placeholder_height() {

        let (_, world, controller) = setup(HostVariant::Standard);

        fn placer(chunk: &mut GeneratingChunk) {
            chunk.fill_column(0, 0, 0, 30, block::STONE);
        }

        controller.set_block_placer(Arc::new(placer)).unwrap();
        assert_eq!(controller.terrain_generator().height(0, 0, HeightKind::Surface), PLACEHOLDER_HEIGHT);
        assert_eq!(world.generate_chunk(0, 0).highest_block(IVec3::ZERO), Some(29));

    }

    #[test]
    fn unsupported_host_keeps_unmodified() {

        let (patcher, world, controller) = setup(HostVariant::Legacy);
        let original = world.active_pipeline();

        let res = controller.set_terrain_generator(Arc::new(LayerTerrain(block::SAND, 3)));
        assert!(matches!(res, Err(OverrideError::Patch(PatchError::UnsupportedHost { .. }))));
        assert!(matches!(controller.world_decorator(), Err(OverrideError::Patch(_))));

        assert!(!controller.is_overridden());
        assert_eq!(patcher.patches(), 0);
        assert_live(&world, &original);
        controller.reset().unwrap();

    }

    #[test]
    fn failed_patch_keeps_last_state() {

        let (patcher, world, controller) = setup(HostVariant::Standard);
        let original = world.active_pipeline();

        patcher.fail.store(true, Ordering::SeqCst);
        assert!(controller.set_terrain_generator(Arc::new(LayerTerrain(block::SAND, 3))).is_err());
        assert!(!controller.is_overridden());
        assert_live(&world, &original);

        patcher.fail.store(false, Ordering::SeqCst);
        controller.set_terrain_generator(Arc::new(LayerTerrain(block::SAND, 3))).unwrap();
        let injected = injected_as_pipeline(&controller);

        patcher.fail.store(true, Ordering::SeqCst);
        assert!(matches!(controller.reset(), Err(OverrideError::Patch(_))));
        assert!(controller.is_overridden());
        assert_live(&world, &injected);

        patcher.fail.store(false, Ordering::SeqCst);
        controller.reset().unwrap();
        assert_live(&world, &original);

    }

    #[test]
    fn self_forwarding_generator_rejected() {

        let (patcher, _, controller) = setup(HostVariant::Standard);
        controller.set_terrain_generator(Arc::new(LayerTerrain(block::SAND, 3))).unwrap();

        let looping = Arc::new(HostTerrain::new(injected_as_pipeline(&controller)));
        let res = controller.set_terrain_generator(looping);
        assert!(matches!(res, Err(OverrideError::Precondition(_))));
        assert_eq!(controller.terrain_generator().height(0, 0, HeightKind::Surface), 3);
        assert_eq!(patcher.patches(), 1);

    }

    #[test]
    fn unmodified_views_follow_host() {

        let (patcher, _, controller) = setup(HostVariant::Standard);

        assert_eq!(controller.base_terrain_generator().height(0, 0, HeightKind::Surface), FlatPipeline::SURFACE);
        assert_eq!(controller.biome_classifier().classify(IVec3::new(5, 0, 5)), Biome::Plains);
        assert!(controller.injected().is_none());
        assert_eq!(patcher.patches(), 0);

    }

}
