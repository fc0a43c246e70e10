//! Frame and countdown steps
//!
//! The browser drives `frame` from requestAnimationFrame and `countdown`
//! from a one-second interval. Both only touch state while Playing.

use rand::Rng;

use super::collision::basket_catches;
use super::state::{FallingItem, GameEvent, GamePhase, GameState, ItemKind, ItemType};
use crate::input::GestureCommand;

/// Apply a gesture command. Ignored unless Playing.
pub fn apply_command(state: &mut GameState, command: GestureCommand) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    state.basket.steer(command);
    true
}

/// Advance one animation frame at timestamp `now_ms`
pub fn frame(state: &mut GameState, now_ms: f64) {
    if state.phase != GamePhase::Playing {
        return;
    }

    // Spawn on cadence; the first frame of a round only starts the clock
    let last_spawn = *state.last_spawn_ms.get_or_insert(now_ms);
    if now_ms - last_spawn > state.spawn_interval_ms {
        spawn_item(state);
        state.last_spawn_ms = Some(now_ms);
    }

    state.basket.update();

    let speed_mult = state.level_speed_multiplier();
    let tolerance = state.tuning.catch_tolerance;
    let floor_y = state.viewport.height;

    let mut i = state.items.len();
    while i > 0 {
        i -= 1;
        let item = &mut state.items[i];
        item.update(speed_mult);

        if basket_catches(&state.basket, item, tolerance) {
            let kind = item.kind;
            state.items.remove(i);
            collect(state, kind);
            if state.phase != GamePhase::Playing {
                // Bomb: freeze the rest of the scene as it is
                break;
            }
        } else if !item.active || item.pos.y > floor_y {
            state.items.remove(i);
        }
    }
}

/// One second of countdown
pub fn countdown(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_left = state.time_left.saturating_sub(1);
    state.events.push(GameEvent::TimeChanged {
        seconds_left: state.time_left,
    });

    if state.time_left == 0 {
        log::info!("Time up with score {}", state.score);
        state.trigger_game_over();
    }
}

/// Roll an item type for the current level
pub fn roll_item_type(state: &mut GameState) -> ItemType {
    let roll: f32 = state.rng.random();
    if roll < state.tuning.bomb_chance(state.level) {
        ItemType::Bomb
    } else if roll > state.tuning.gold_roll_threshold {
        ItemType::Gold
    } else {
        ItemType::Fruit
    }
}

/// Spawn one item and tighten the cadence for the current level
pub fn spawn_item(state: &mut GameState) {
    let item_type = roll_item_type(state);
    let id = state.next_entity_id();
    let item = FallingItem::spawn(
        id,
        item_type,
        state.viewport.width,
        &state.tuning,
        &mut state.rng,
    );
    log::trace!("Spawned {:?} in lane {}", item.kind, item.lane);
    state.items.push(item);
    state.spawn_interval_ms = state.tuning.spawn_interval_ms(state.level);
}

/// Apply the effect of catching an item
pub fn collect(state: &mut GameState, kind: ItemKind) {
    if kind.is_bomb() {
        log::info!("Bomb caught with score {}", state.score);
        state.trigger_game_over();
        return;
    }

    state.score += kind.reward();
    let level = state.tuning.level_for_score(state.score);
    if level > state.level {
        state.level = level;
        log::info!("Level up: {}", level);
        state.events.push(GameEvent::LevelUp { level });
    }
    state.events.push(GameEvent::ScoreChanged { score: state.score });
}
