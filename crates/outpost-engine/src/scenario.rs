//! Deterministic starting layout.
//!
//! Every region starts as forest. The center region becomes the stone
//! shelter, with its middle tile reserved, and the configured grass regions
//! are laid out around it. Trees and crops are planted on a fixed stride so
//! a given config always produces the same world.

use outpost_core::config::WorldConfig;
use outpost_types::{PropKind, RegionCoord, RegionType, TileCoord};
use outpost_world::WorldGrid;
use tracing::{debug, info};

use crate::error::EngineError;

/// What the scenario builder laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioLayout {
    /// The stone shelter region.
    pub shelter: RegionCoord,
    /// The reserved tile in the middle of the shelter.
    pub shelter_tile: TileCoord,
    /// Forest regions, in grid order.
    pub forests: Vec<RegionCoord>,
    /// Grass regions, in grid order.
    pub grass: Vec<RegionCoord>,
    /// Trees planted.
    pub trees: u32,
    /// Crops planted.
    pub crops: u32,
}

/// Build the starting world from config.
///
/// # Errors
///
/// Returns [`EngineError::World`] for invalid grid dimensions and
/// [`EngineError::Scenario`] if a grass region lies outside the grid or on
/// the shelter.
pub fn build_world(config: &WorldConfig) -> Result<(WorldGrid, ScenarioLayout), EngineError> {
    let mut world = WorldGrid::new(
        config.width,
        config.depth,
        config.region_size,
        RegionType::Forest,
    )?;

    // Shelter
    let shelter = world.center_region();
    world.set_region_type(shelter, RegionType::Stone)?;
    let center = world.region_center(shelter)?;
    let shelter_tile = world.tile_at(center).ok_or_else(|| EngineError::Scenario {
        message: format!("shelter center of {shelter} is off the grid"),
    })?;
    world.reserve_tile(shelter_tile)?;

    // Grass
    for coord in config.grass_coords() {
        if coord == shelter {
            return Err(EngineError::Scenario {
                message: format!("grass region {coord} overlaps the shelter"),
            });
        }
        if world.region(coord).is_none() {
            return Err(EngineError::Scenario {
                message: format!(
                    "grass region {coord} is outside the {}x{} grid",
                    config.width, config.depth
                ),
            });
        }
        world.set_region_type(coord, RegionType::Grass)?;
    }

    // Props
    let mut forests = Vec::new();
    let mut grass = Vec::new();
    for region in world.regions() {
        match region.region_type() {
            RegionType::Forest => forests.push(region.coord()),
            RegionType::Grass => grass.push(region.coord()),
            RegionType::Stone | RegionType::Dirt => {}
        }
    }
    let mut trees = 0_u32;
    for coord in &forests {
        let planted = plant(&mut world, *coord, PropKind::Tree, config.trees_per_forest)?;
        trees = trees.saturating_add(planted);
    }
    let mut crops = 0_u32;
    for coord in &grass {
        let planted = plant(&mut world, *coord, PropKind::Crop, config.crops_per_grass)?;
        crops = crops.saturating_add(planted);
    }

    info!(
        width = config.width,
        depth = config.depth,
        region_size = config.region_size,
        shelter = %shelter,
        forests = forests.len(),
        grass = grass.len(),
        trees,
        crops,
        "Scenario built"
    );

    Ok((
        world,
        ScenarioLayout {
            shelter,
            shelter_tile,
            forests,
            grass,
            trees,
            crops,
        },
    ))
}

/// Plant up to `count` props of `kind` in `region`, spread on a fixed
/// stride. Returns how many were planted.
fn plant(
    world: &mut WorldGrid,
    region: RegionCoord,
    kind: PropKind,
    count: u32,
) -> Result<u32, EngineError> {
    if count == 0 {
        return Ok(0);
    }
    let size = world.region_size();
    let overflow = || EngineError::Scenario {
        message: format!("planting layout of {region} overflows"),
    };
    let area = size.checked_mul(size).ok_or_else(overflow)?;
    let step = area.checked_div(count).unwrap_or(1).max(1);
    let base_x = region.x.checked_mul(size).ok_or_else(overflow)?;
    let base_y = region.y.checked_mul(size).ok_or_else(overflow)?;

    let mut planted = 0_u32;
    let mut index = step.checked_div(2).unwrap_or(0);
    let mut tried = 0_u32;
    while planted < count && tried < area {
        let local = index.checked_rem(area).ok_or_else(overflow)?;
        let tile = TileCoord::new(
            local
                .checked_rem(size)
                .and_then(|dx| base_x.checked_add(dx))
                .ok_or_else(overflow)?,
            local
                .checked_div(size)
                .and_then(|dy| base_y.checked_add(dy))
                .ok_or_else(overflow)?,
        );
        if !world.tile_is_occupied(tile) {
            world.place_prop(tile, kind)?;
            planted = planted.saturating_add(1);
            debug!(region = %region, tile = %tile, ?kind, "Prop planted");
        }
        index = local.checked_add(step).ok_or_else(overflow)?;
        tried = tried.saturating_add(1);
    }
    Ok(planted)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_has_shelter_and_grass() {
        let config = WorldConfig::default();
        let (world, layout) = build_world(&config).unwrap();

        assert_eq!(layout.shelter, RegionCoord::new(2, 2));
        assert_eq!(
            world.region(layout.shelter).unwrap().region_type(),
            RegionType::Stone
        );
        assert!(world.tile_is_occupied(layout.shelter_tile));
        assert_eq!(world.prop_at(layout.shelter_tile), None);
        assert_eq!(
            layout.grass,
            vec![RegionCoord::new(1, 2), RegionCoord::new(3, 2)]
        );
        assert_eq!(layout.forests.len(), 22);
        assert_eq!(layout.trees, 22 * config.trees_per_forest);
        assert_eq!(layout.crops, 2 * config.crops_per_grass);
    }

    #[test]
    fn props_land_in_their_region() {
        let config = WorldConfig::default();
        let (world, layout) = build_world(&config).unwrap();
        for coord in &layout.grass {
            let region = world.region(*coord).unwrap();
            let crops = region.tiles_with(PropKind::Crop).count();
            assert_eq!(crops, 4);
            assert_eq!(region.tiles_with(PropKind::Tree).count(), 0);
        }
    }

    #[test]
    fn grass_on_shelter_is_rejected() {
        let config = WorldConfig {
            grass_regions: vec![[2, 2]],
            ..WorldConfig::default()
        };
        assert!(matches!(
            build_world(&config),
            Err(EngineError::Scenario { .. })
        ));
    }

    #[test]
    fn grass_outside_grid_is_rejected() {
        let config = WorldConfig {
            grass_regions: vec![[9, 0]],
            ..WorldConfig::default()
        };
        assert!(matches!(
            build_world(&config),
            Err(EngineError::Scenario { .. })
        ));
    }

    #[test]
    fn planting_caps_at_region_area() {
        let config = WorldConfig {
            width: 1,
            depth: 1,
            region_size: 2,
            grass_regions: Vec::new(),
            trees_per_forest: 10,
            ..WorldConfig::default()
        };
        let (world, layout) = build_world(&config).unwrap();
        // A 1x1 grid is all shelter; nothing to plant.
        assert!(layout.forests.is_empty());
        assert_eq!(layout.trees, 0);
        assert_eq!(world.region_count(), 1);

        let mut grid = WorldGrid::new(1, 1, 2, RegionType::Forest).unwrap();
        let planted = plant(&mut grid, RegionCoord::new(0, 0), PropKind::Tree, 10).unwrap();
        assert_eq!(planted, 4);
    }
}
