//! Aggregated attributes of everything on the board

use std::collections::HashMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use super::types::PlacedEntity;

/// Numeric attributes of a part, also used for board totals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartStats {
    pub power: f64,
    pub control: f64,
    pub malfunction_risk: f64,
    pub price: f64,
}

impl AddAssign<&PartStats> for PartStats {
    fn add_assign(&mut self, other: &PartStats) {
        self.power += other.power;
        self.control += other.control;
        self.malfunction_risk += other.malfunction_risk;
        self.price += other.price;
    }
}

/// Resolves a catalog identifier to its attributes
pub trait StatsLookup {
    fn stats_for(&self, catalog_id: &str) -> Option<&PartStats>;
}

impl StatsLookup for HashMap<String, PartStats> {
    fn stats_for(&self, catalog_id: &str) -> Option<&PartStats> {
        self.get(catalog_id)
    }
}

/// Sum the attributes of every placed entity.
///
/// Entities whose catalog id no longer resolves contribute nothing.
pub fn aggregate(entities: &[PlacedEntity], catalog: &impl StatsLookup) -> PartStats {
    let mut totals = PartStats::default();
    for entity in entities {
        match catalog.stats_for(&entity.catalog_id) {
            Some(stats) => totals += stats,
            None => tracing::trace!(
                entity = %entity.id,
                catalog_id = %entity.catalog_id,
                "stale catalog reference skipped"
            ),
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{EntityId, GridPosition, Point, Rotation, Shape, TextureBinding};

    fn entity(id: u64, catalog_id: &str) -> PlacedEntity {
        let shape = Shape::from_bits(&[[1]]).unwrap();
        PlacedEntity {
            id: EntityId(id),
            catalog_id: catalog_id.to_string(),
            binding: TextureBinding::capture(&shape, 60.0, Point::origin()),
            shape,
            position: GridPosition::new(id as i32, 0),
            rotation: Rotation::Deg0,
            mirrored: false,
        }
    }

    fn catalog() -> HashMap<String, PartStats> {
        HashMap::from([
            (
                "reactor".to_string(),
                PartStats {
                    power: 10.0,
                    control: 2.0,
                    malfunction_risk: 3.0,
                    price: 150.0,
                },
            ),
            (
                "valve".to_string(),
                PartStats {
                    power: 0.0,
                    control: 5.0,
                    malfunction_risk: 1.0,
                    price: 40.0,
                },
            ),
        ])
    }

    #[test]
    fn test_empty_board_totals_zero() {
        assert_eq!(aggregate(&[], &catalog()), PartStats::default());
    }

    #[test]
    fn test_sums_all_entities() {
        let entities = vec![entity(1, "reactor"), entity(2, "valve"), entity(3, "valve")];
        let totals = aggregate(&entities, &catalog());
        assert_eq!(
            totals,
            PartStats {
                power: 10.0,
                control: 12.0,
                malfunction_risk: 5.0,
                price: 230.0,
            }
        );
    }

    #[test]
    fn test_stale_reference_contributes_nothing() {
        let entities = vec![entity(1, "reactor"), entity(2, "removed_part")];
        let totals = aggregate(&entities, &catalog());
        assert_eq!(totals.power, 10.0);
        assert_eq!(totals.price, 150.0);
    }

    #[test]
    fn test_order_independent() {
        let forward = vec![entity(1, "reactor"), entity(2, "valve"), entity(3, "reactor")];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(
            aggregate(&forward, &catalog()),
            aggregate(&reversed, &catalog())
        );
    }
}
