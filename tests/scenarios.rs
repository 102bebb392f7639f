//! End-to-end drag scenarios against the controller
//!
//! Grids use 10 px cells at the screen origin, so cell (x, y) spans
//! `[10x, 10x + 10) × [10y, 10y + 10)`.

use std::collections::HashMap;

use block_assembler::board::{
    aggregate, DiscardReason, DragController, DragEffect, EntityId, GridConfig, GridPosition,
    NoopReason, PaletteItem, PartStats, Point, Rotation, Shape, TextureBinding,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const CELL: f64 = 10.0;

fn grid(width: usize, height: usize) -> GridConfig {
    GridConfig {
        width,
        height,
        cell_size: CELL,
        ..GridConfig::default()
    }
}

fn item(id: &str, shape: Shape) -> PaletteItem {
    PaletteItem {
        catalog_id: id.to_string(),
        binding: TextureBinding::capture(&shape, 60.0, Point::origin()),
        shape,
    }
}

fn l_block() -> Shape {
    Shape::from_bits(&[[1, 0], [1, 0], [1, 1]]).unwrap()
}

fn bar() -> Shape {
    Shape::from_bits(&[[1, 1]]).unwrap()
}

/// Pointer position that previews a top-left-grabbed shape at `cell`
fn at(x: i32, y: i32) -> Point {
    Point::new(x as f64 * CELL, y as f64 * CELL)
}

fn drop_fresh(c: &mut DragController, item: PaletteItem, x: i32, y: i32) -> DragEffect {
    c.pick_from_palette(item, Point::new(-100.0, 0.0), Point::origin());
    c.pointer_move(at(x, y));
    c.release().effect
}

#[test]
fn test_drop_l_block_on_empty_grid() {
    let mut c = DragController::new(grid(6, 6));
    let effect = drop_fresh(&mut c, item("l_block", l_block()), 0, 0);

    assert_eq!(
        effect,
        DragEffect::Committed {
            id: EntityId(1),
            position: GridPosition::new(0, 0),
            rotation: Rotation::Deg0,
            mirrored: false,
            created: true,
        }
    );
    let entities = c.entities();
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].position, GridPosition::new(0, 0));
    assert_eq!(entities[0].rotation, Rotation::Deg0);
    assert!(!entities[0].mirrored);
}

#[test]
fn test_overlapping_drop_reports_single_conflict() {
    let mut c = DragController::new(grid(6, 6));
    drop_fresh(&mut c, item("l_block", l_block()), 0, 0);
    let before = c.entities().to_vec();

    c.pick_from_palette(item("bar", bar()), Point::new(-100.0, 0.0), Point::origin());
    c.pointer_move(at(0, 0));
    let session = c.session().unwrap();
    assert!(!session.placement.feasible);
    assert_eq!(session.placement.conflicts, vec![GridPosition::new(0, 0)]);

    let t = c.release();
    assert_eq!(
        t.effect,
        DragEffect::Discarded {
            reason: DiscardReason::Infeasible
        }
    );
    assert_eq!(c.entities(), &before[..]);
}

#[test]
fn test_redrag_rotate_and_move() {
    let mut c = DragController::new(grid(6, 6));
    drop_fresh(&mut c, item("l_block", l_block()), 0, 0);

    // Grab the top cell in its middle
    c.pointer_down_on_grid(Point::new(5.0, 5.0));
    assert_eq!(c.dragged_id(), Some(EntityId(1)));
    c.rotate();
    let session = c.session().unwrap();
    assert_eq!(session.rotation, Rotation::Deg90);
    assert_eq!(session.shape, l_block().rotate_clockwise());
    assert_eq!(session.shape, Shape::from_bits(&[[1, 1, 1], [1, 0, 0]]).unwrap());

    c.pointer_move(Point::new(25.0, 25.0));
    let t = c.release();
    assert_eq!(
        t.effect,
        DragEffect::Committed {
            id: EntityId(1),
            position: GridPosition::new(2, 2),
            rotation: Rotation::Deg90,
            mirrored: false,
            created: false,
        }
    );
    assert_eq!(c.entities().len(), 1);
    assert_eq!(c.entities()[0].shape, l_block().rotate_clockwise());
    // Binding keeps the catalog's base dimensions
    assert_eq!(
        (c.entities()[0].binding.base_width, c.entities()[0].binding.base_height),
        (2, 3)
    );
}

#[test]
fn test_rotation_runs_backwards_while_mirrored() {
    let mut c = DragController::new(grid(6, 6));
    c.pick_from_palette(item("l_block", l_block()), Point::origin(), Point::origin());
    c.mirror();
    c.rotate();

    let session = c.session().unwrap();
    assert!(session.mirrored);
    assert_eq!(session.rotation, Rotation::Deg270);
    assert_eq!(session.shape, l_block().mirror_horizontal().rotate_clockwise());
}

#[test]
fn test_redrag_onto_own_footprint_is_feasible() {
    let mut c = DragController::new(grid(6, 6));
    drop_fresh(&mut c, item("bar", bar()), 0, 0);

    // Nudge one cell right: overlaps its own old cell (1, 0)
    c.pointer_down_on_grid(Point::new(5.0, 5.0));
    c.pointer_move(Point::new(15.0, 5.0));
    assert!(c.session().unwrap().placement.feasible);
    c.release();
    assert_eq!(c.entities()[0].position, GridPosition::new(1, 0));
}

#[test]
fn test_failed_redrag_restores_entity() {
    let mut c = DragController::new(grid(6, 6));
    drop_fresh(&mut c, item("bar", bar()), 0, 0);
    let before = c.entities().to_vec();

    c.pointer_down_on_grid(Point::new(5.0, 5.0));
    c.rotate();
    c.mirror();
    c.pointer_move(Point::new(500.0, 500.0));
    let t = c.release();
    assert!(matches!(t.effect, DragEffect::Discarded { .. }));
    assert_eq!(c.entities(), &before[..]);
}

#[test]
fn test_commands_without_session_are_ignored() {
    let mut c = DragController::new(grid(6, 6));
    for t in [c.rotate(), c.mirror(), c.release()] {
        assert_eq!(
            t.effect,
            DragEffect::Noop {
                reason: NoopReason::IdleWithoutActiveDrag
            }
        );
    }
    assert!(c.entities().is_empty());
}

#[test]
fn test_fresh_ids_are_never_reused() {
    let mut c = DragController::new(grid(6, 6));
    drop_fresh(&mut c, item("bar", bar()), 0, 0);
    drop_fresh(&mut c, item("bar", bar()), 0, 1);
    c.clear();
    let effect = drop_fresh(&mut c, item("bar", bar()), 0, 0);
    assert!(matches!(
        effect,
        DragEffect::Committed {
            id: EntityId(3),
            ..
        }
    ));
}

#[test]
fn test_totals_after_commits() {
    let mut c = DragController::new(grid(6, 6));
    drop_fresh(&mut c, item("l_block", l_block()), 0, 0);
    drop_fresh(&mut c, item("bar", bar()), 2, 0);

    let catalog = HashMap::from([
        (
            "l_block".to_string(),
            PartStats {
                power: 4.0,
                control: 1.0,
                malfunction_risk: 2.0,
                price: 120.0,
            },
        ),
        (
            "bar".to_string(),
            PartStats {
                power: 1.0,
                control: 0.0,
                malfunction_risk: 0.5,
                price: 10.0,
            },
        ),
    ]);
    let totals = aggregate(c.entities(), &catalog);
    assert_eq!(
        totals,
        PartStats {
            power: 5.0,
            control: 1.0,
            malfunction_risk: 2.5,
            price: 130.0,
        }
    );
}

#[derive(Debug, Clone)]
enum Step {
    Pick(usize),
    Press(i32, i32),
    Move(i32, i32),
    Rotate,
    Mirror,
    Release,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..3).prop_map(Step::Pick),
        (0i32..6, 0i32..6).prop_map(|(x, y)| Step::Press(x, y)),
        (-2i32..8, -2i32..8).prop_map(|(x, y)| Step::Move(x, y)),
        Just(Step::Rotate),
        Just(Step::Mirror),
        Just(Step::Release),
    ]
}

proptest! {
    #[test]
    fn prop_board_never_double_books(steps in prop::collection::vec(step(), 0..60)) {
        let palette = [
            item("l_block", l_block()),
            item("bar", bar()),
            item("square", Shape::from_bits(&[[1, 1], [1, 1]]).unwrap()),
        ];
        let mut c = DragController::new(grid(6, 6));
        let mut max_id = 0;

        for step in steps {
            let before = c.entities().to_vec();
            let t = match step {
                Step::Pick(i) => c.pick_from_palette(palette[i].clone(), Point::origin(), Point::origin()),
                Step::Press(x, y) => c.pointer_down_on_grid(Point::new(x as f64 * CELL + 1.0, y as f64 * CELL + 1.0)),
                Step::Move(x, y) => c.pointer_move(at(x, y)),
                Step::Rotate => c.rotate(),
                Step::Mirror => c.mirror(),
                Step::Release => c.release(),
            };

            match t.effect {
                DragEffect::Committed { id, created: true, .. } => {
                    prop_assert_eq!(c.entities().len(), before.len() + 1);
                    prop_assert!(id.0 > max_id);
                    max_id = id.0;
                }
                DragEffect::Committed { created: false, .. } => {
                    prop_assert_eq!(c.entities().len(), before.len());
                }
                _ => prop_assert_eq!(c.entities(), &before[..]),
            }

            let mut owners: HashMap<GridPosition, EntityId> = HashMap::new();
            for entity in c.entities() {
                for cell in entity.footprint() {
                    prop_assert!(cell.within(6, 6));
                    prop_assert!(owners.insert(cell, entity.id).is_none(), "{} double booked", cell);
                }
            }
        }
    }

    #[test]
    fn prop_totals_order_independent(seed in any::<u64>()) {
        let mut c = DragController::new(grid(6, 6));
        drop_fresh(&mut c, item("l_block", l_block()), 0, 0);
        drop_fresh(&mut c, item("bar", bar()), 2, 0);
        drop_fresh(&mut c, item("bar", bar()), 2, 1);

        let catalog = HashMap::from([
            ("l_block".to_string(), PartStats { power: 4.0, control: 1.0, malfunction_risk: 2.0, price: 120.0 }),
            ("bar".to_string(), PartStats { power: 1.0, control: 3.0, malfunction_risk: 0.5, price: 10.0 }),
        ]);
        let mut shuffled = c.entities().to_vec();
        let k = (seed % shuffled.len() as u64) as usize;
        shuffled.rotate_left(k);
        if seed % 2 == 0 {
            shuffled.reverse();
        }
        prop_assert_eq!(aggregate(&shuffled, &catalog), aggregate(c.entities(), &catalog));
    }
}
