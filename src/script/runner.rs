//! Drives a [`DragController`] from a parsed script

use crate::board::{
    BoardGeometry, DragController, DragTransition, Hit, NoopReason, Point, PointerHost,
};
use crate::catalog::Catalog;
use crate::error::ScriptError;
use crate::script::ast::{Command, Script};

/// Resolve every part reference against the palette and the catalog
pub fn check(script: &Script, catalog: &Catalog, geometry: &BoardGeometry) -> Result<(), ScriptError> {
    for part in script.part_references() {
        if geometry.slot(&part.node).is_none() && catalog.get(&part.node).is_none() {
            return Err(ScriptError::UnknownPart {
                name: part.node.clone(),
                span: part.span.clone(),
                suggestions: catalog.suggest(&part.node),
            });
        }
    }
    Ok(())
}

/// Apply every command in order and collect the resulting transitions.
///
/// Part references are resolved up front, so an unknown name leaves the
/// controller untouched.
pub fn run<H: PointerHost>(
    script: &Script,
    controller: &mut DragController<H>,
    catalog: &Catalog,
    geometry: &BoardGeometry,
) -> Result<Vec<DragTransition>, ScriptError> {
    check(script, catalog, geometry)?;

    let mut transitions = Vec::with_capacity(script.commands.len());
    for command in &script.commands {
        let transition = step(&command.node, controller, catalog, geometry);
        tracing::trace!(
            command = ?command.node,
            effect = ?transition.effect,
            "script step"
        );
        transitions.push(transition);
    }
    Ok(transitions)
}

/// Deliver one command; every command yields exactly one transition
fn step<H: PointerHost>(
    command: &Command,
    controller: &mut DragController<H>,
    catalog: &Catalog,
    geometry: &BoardGeometry,
) -> DragTransition {
    match command {
        Command::Press(pointer) => match geometry.hit_test(*pointer) {
            Some(Hit::Palette { slot, grab_offset }) => {
                controller.pick_from_palette(slot.item.clone(), *pointer, grab_offset)
            }
            Some(Hit::Grid) | None => controller.pointer_down_on_grid(*pointer),
        },
        Command::Pick { part, grab } => {
            let grab = grab.unwrap_or_default();
            if let Some(slot) = geometry.slot(&part.node) {
                let pointer = slot.bounds.top_left().offset(grab.x, grab.y);
                return controller.pick_from_palette(slot.item.clone(), pointer, grab);
            }
            // Not laid out (empty shape): the controller decides
            match catalog.get(&part.node) {
                Some(entry) => controller.pick_from_palette(entry.palette_item(), grab, grab),
                None => {
                    tracing::warn!(part = %part.node, "pick of unknown part ignored");
                    controller.noop(NoopReason::UnknownPart)
                }
            }
        }
        Command::Move(pointer) => controller.pointer_move(*pointer),
        Command::Rotate => controller.rotate(),
        Command::Mirror => controller.mirror(),
        Command::Release => controller.release(),
        Command::Clear => controller.clear(),
    }
}

/// Screen point of a grid cell's centre; handy for writing scripts by hand
pub fn cell_center(geometry: &BoardGeometry, x: i32, y: i32) -> Point {
    let half = geometry.cell_size / 2.0;
    geometry
        .cell_origin(crate::board::GridPosition::new(x, y))
        .offset(half, half)
}
