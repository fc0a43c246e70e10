//! Idle/demo mode
//!
//! Picks a lane the way a cautious player would, so the game can run
//! without a camera.

use super::state::{GamePhase, GameState};
use crate::input::GestureCommand;

/// Suggest a command for the current frame, or None to hold position
pub fn suggest_command(state: &GameState) -> Option<GestureCommand> {
    if state.phase != GamePhase::Playing {
        return None;
    }

    let basket_top = state.basket.pos.y;
    let basket_bottom = basket_top + state.basket.height;

    // Lowest bomb still above the basket's bottom edge, per lane
    let mut bomb_y = [f32::NEG_INFINITY; 3];
    for item in state.items.iter().filter(|i| i.kind.is_bomb()) {
        let y = item.pos.y + item.size;
        if item.lane < 3 && item.pos.y < basket_bottom && y > bomb_y[item.lane] {
            bomb_y[item.lane] = y;
        }
    }

    // Lowest catchable item with no bomb below it in its lane
    let target = state
        .items
        .iter()
        .filter(|i| !i.kind.is_bomb() && i.active && i.lane < 3)
        .filter(|i| i.pos.y < basket_bottom)
        .filter(|i| bomb_y[i.lane] <= i.pos.y)
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(item) = target {
        return GestureCommand::from_lane(item.lane);
    }

    // Nothing to catch: get out from under a bomb
    let current = state.basket.lane();
    if bomb_y[current].is_finite() {
        let safest = (0..3).min_by(|&a, &b| {
            bomb_y[a]
                .partial_cmp(&bomb_y[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        return GestureCommand::from_lane(safest);
    }

    None
}
