//! Survivor spawner for seeding the colony.
//!
//! Survivors are placed in pairs at the left and right edges of the shelter
//! region. Each further pair stands one row off the previous one, alternating
//! in front of and behind the first pair. Names are drawn at random from the
//! configured pool; an odd count leaves the last survivor on the left edge.

use outpost_agents::{RandomSource, SurvivorRoster};
use outpost_core::config::SurvivorConfig;
use outpost_types::{Position, RegionCoord, SurvivorId};
use outpost_world::WorldGrid;
use tracing::info;

use crate::error::EngineError;

/// The output of the spawner.
#[derive(Debug)]
pub struct SpawnResult {
    /// The populated roster, holding the unused names.
    pub roster: SurvivorRoster,
    /// Spawned survivor ids, in spawn order.
    pub survivors: Vec<SurvivorId>,
}

/// Spawn `config.count` survivors around the shelter region.
///
/// # Errors
///
/// Returns [`EngineError::Spawner`] if the name pool runs dry or a name
/// repeats, and [`EngineError::World`] if `shelter` is not on the grid.
pub fn spawn_survivors(
    config: &SurvivorConfig,
    world: &WorldGrid,
    shelter: RegionCoord,
    rng: &mut dyn RandomSource,
) -> Result<SpawnResult, EngineError> {
    let mut roster = SurvivorRoster::new(config.names.clone());
    let center = world.region_center(shelter)?;
    let stats = config.stats();
    let mut survivors = Vec::new();

    let pairs = config.count / 2;
    for pair in 0..pairs {
        let row = Position::new(center.x, center.y, center.z + row_offset(pair));
        let ids = roster.spawn_around(rng, row, world.region_size(), stats)?;
        survivors.extend(ids);
    }

    if config.count % 2 == 1 {
        let row = Position::new(center.x, center.y, center.z + row_offset(pairs));
        survivors.push(spawn_left(&mut roster, rng, row, world.region_size(), config)?);
    }

    info!(
        count = survivors.len(),
        shelter = %shelter,
        names_left = roster.names_left(),
        "Survivors spawned"
    );

    Ok(SpawnResult { roster, survivors })
}

/// Z offset of a pair's row: 0, +1, -1, +2, -2, ...
fn row_offset(pair: u32) -> f32 {
    let step = u16::try_from(pair.div_ceil(2)).unwrap_or(u16::MAX);
    let magnitude = f32::from(step);
    if pair % 2 == 1 { magnitude } else { -magnitude }
}

/// Spawn one survivor at the left edge of `row`.
fn spawn_left(
    roster: &mut SurvivorRoster,
    rng: &mut dyn RandomSource,
    row: Position,
    region_size: u32,
    config: &SurvivorConfig,
) -> Result<SurvivorId, EngineError> {
    let size = f32::from(u16::try_from(region_size).unwrap_or(u16::MAX));
    let x = row.x - (size - 1.0) / 2.0;
    let position = Position::new(x, row.y, row.z).raised(config.height / 2.0);
    Ok(roster.spawn_named(rng, position, config.stats())?)
}
