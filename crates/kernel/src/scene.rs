use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use skyline_assets::FactoryRegistry;
use skyline_stream::{StreamEvent, StreamPhase, StreamingWorld, WorldSummary};

use crate::config::{SceneConfig, SceneError, WorldConfig};

/// Identifier of a world within one scene, assigned in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u32);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world-{}", self.0)
    }
}

/// A stream event tagged with the tick and world that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEvent {
    pub tick: u64,
    pub world: WorldId,
    pub event: StreamEvent,
}

struct SceneWorld {
    name: String,
    world: StreamingWorld,
}

/// Per-world line of [`Scene::summary`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorldReport {
    pub id: WorldId,
    pub name: String,
    pub summary: WorldSummary,
}

impl fmt::Display for WorldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<9} {:<12} {}", self.id, self.name, self.summary)
    }
}

/// Owns every live world, the frame tick and the event log.
///
/// Worlds advance in id order, so the same seed and the same viewer path
/// give the same event log.
pub struct Scene {
    worlds: BTreeMap<WorldId, SceneWorld>,
    registry: FactoryRegistry,
    next_id: u32,
    tick: u64,
    seed: u64,
    event_log: Vec<SceneEvent>,
}

impl Scene {
    pub fn new(seed: u64, registry: FactoryRegistry) -> Self {
        Self {
            worlds: BTreeMap::new(),
            registry,
            next_id: 0,
            tick: 0,
            seed,
            event_log: Vec::new(),
        }
    }

    /// Scene seeded from `config` with every listed world spawned.
    pub fn from_config(config: &SceneConfig, registry: FactoryRegistry) -> Result<Self, SceneError> {
        let mut scene = Self::new(config.seed, registry);
        for world in &config.worlds {
            scene.spawn_world(world)?;
        }
        Ok(scene)
    }

    /// Build a world's grid and add it to the scene.
    pub fn spawn_world(&mut self, config: &WorldConfig) -> Result<WorldId, SceneError> {
        config.validate()?;
        let id = WorldId(self.next_id);
        let seed = splitmix64(self.seed ^ u64::from(id.0));
        let _span = tracing::info_span!("spawn_world", %id, name = %config.name).entered();

        let world = StreamingWorld::build(
            config.stream.clone(),
            config.layout.clone(),
            &self.registry,
            seed,
        )?;
        tracing::info!(
            factory = %config.stream.factory,
            total_x = world.grid().total_x(),
            total_z = world.grid().total_z(),
            fingerprint = world.grid().fingerprint(),
            "world spawned"
        );
        self.next_id += 1;
        self.worlds.insert(
            id,
            SceneWorld {
                name: config.name.clone(),
                world,
            },
        );
        Ok(id)
    }

    /// Advance every live world once. Returns the events of this tick;
    /// they also stay in the log until drained.
    pub fn step(&mut self, viewer_z: f32) -> &[SceneEvent] {
        self.tick += 1;
        let tick = self.tick;
        let _span = tracing::debug_span!("scene_step", tick, viewer_z).entered();
        let first = self.event_log.len();

        for (&id, entry) in self.worlds.iter_mut() {
            for event in entry.world.advance(viewer_z) {
                tracing::debug!(%id, ?event, "stream event");
                self.event_log.push(SceneEvent {
                    tick,
                    world: id,
                    event,
                });
            }
        }
        self.worlds.retain(|id, entry| {
            let live = entry.world.phase() != StreamPhase::Retired;
            if !live {
                tracing::info!(%id, name = %entry.name, "world dropped");
            }
            live
        });

        &self.event_log[first..]
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    pub fn world(&self, id: WorldId) -> Option<&StreamingWorld> {
        self.worlds.get(&id).map(|entry| &entry.world)
    }

    pub fn registry(&self) -> &FactoryRegistry {
        &self.registry
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    /// Phase, rows and thresholds of every live world, in id order.
    pub fn summary(&self) -> Vec<WorldReport> {
        self.worlds
            .iter()
            .map(|(&id, entry)| WorldReport {
                id,
                name: entry.name.clone(),
                summary: entry.world.summary(),
            })
            .collect()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("tick", &self.tick)
            .field("seed", &self.seed)
            .field("worlds", &self.worlds.keys().collect::<Vec<_>>())
            .field("events", &self.event_log.len())
            .finish_non_exhaustive()
    }
}

/// Splitmix64 step, used to derive independent per-world seeds from the
/// scene seed.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
