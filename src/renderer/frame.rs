//! Display list generation
//!
//! Turns a game state snapshot into 2D drawing commands. Pure, so it can be
//! tested without a canvas.

use glam::Vec2;

use crate::consts::{BASKET_FONT_PX, ITEM_FONT_PX};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState};

pub const BASKET_GLYPH: &str = "🧺";

const GUIDE_COLOR: &str = "rgba(255, 255, 255, 0.3)";
const GUIDE_WIDTH: f32 = 2.0;
const GUIDE_DASH: [f32; 2] = [10.0, 10.0];
const OVERLAY_COLOR: &str = "rgba(0, 0, 0, 0.5)";
const TEXT_COLOR: &str = "white";
const EMOJI_FONT: &str = "Arial";
const TITLE_FONT: &str = "'Press Start 2P', sans-serif";
const BODY_FONT: &str = "sans-serif";

/// A single 2D drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: f32,
        height: f32,
    },
    DashedLine {
        from: Vec2,
        to: Vec2,
        color: &'static str,
        width: f32,
        dash: [f32; 2],
    },
    FillRect {
        origin: Vec2,
        size: Vec2,
        color: &'static str,
    },
    /// Text centered on `center`
    Text {
        text: String,
        center: Vec2,
        font_px: f32,
        family: &'static str,
        color: &'static str,
    },
}

/// Build the commands for one frame
pub fn build_frame(state: &GameState, settings: &Settings) -> Vec<DrawCommand> {
    let width = state.viewport.width;
    let height = state.viewport.height;
    let mut cmds = Vec::with_capacity(state.items.len() + 8);

    cmds.push(DrawCommand::Clear { width, height });

    if settings.show_lane_guides {
        let third = width / 3.0;
        for x in [third, third * 2.0] {
            cmds.push(DrawCommand::DashedLine {
                from: Vec2::new(x, 0.0),
                to: Vec2::new(x, height),
                color: GUIDE_COLOR,
                width: GUIDE_WIDTH,
                dash: GUIDE_DASH,
            });
        }
    }

    cmds.push(glyph(BASKET_GLYPH, state.basket.center(), BASKET_FONT_PX));

    for item in &state.items {
        cmds.push(glyph(item.kind.glyph(), item.center(), ITEM_FONT_PX));
    }

    if state.phase == GamePhase::GameOver {
        game_over_overlay(&mut cmds, state, settings);
    }

    cmds
}

fn glyph(text: &str, center: Vec2, font_px: f32) -> DrawCommand {
    DrawCommand::Text {
        text: text.to_string(),
        center,
        font_px,
        family: EMOJI_FONT,
        color: TEXT_COLOR,
    }
}

fn game_over_overlay(cmds: &mut Vec<DrawCommand>, state: &GameState, settings: &Settings) {
    let size = Vec2::new(state.viewport.width, state.viewport.height);
    let mid = size / 2.0;

    cmds.push(DrawCommand::FillRect {
        origin: Vec2::ZERO,
        size,
        color: OVERLAY_COLOR,
    });
    cmds.push(DrawCommand::Text {
        text: "GAME OVER".to_string(),
        center: mid + Vec2::new(0.0, -20.0),
        font_px: 40.0,
        family: TITLE_FONT,
        color: TEXT_COLOR,
    });
    cmds.push(DrawCommand::Text {
        text: format!("Final score: {}", state.score),
        center: mid + Vec2::new(0.0, 30.0),
        font_px: 20.0,
        family: BODY_FONT,
        color: TEXT_COLOR,
    });
    if settings.show_restart_hint {
        cmds.push(DrawCommand::Text {
            text: "Press Space or Enter to play again".to_string(),
            center: mid + Vec2::new(0.0, 70.0),
            font_px: 20.0,
            family: BODY_FONT,
            color: TEXT_COLOR,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::sim::{FallingItem, ItemKind};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        let mut state = GameState::new(1, Viewport::new(600.0, 480.0), Tuning::default());
        state.start_round();
        state
            .items
            .push(FallingItem::new(1, ItemKind::Bomb, 0, Vec2::new(75.0, 100.0), 3.0));
        state
    }

    fn texts(cmds: &[DrawCommand]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_playing_frame_order() {
        let cmds = build_frame(&state(), &Settings::default());
        assert_eq!(
            cmds[0],
            DrawCommand::Clear {
                width: 600.0,
                height: 480.0
            }
        );
        assert!(matches!(cmds[1], DrawCommand::DashedLine { .. }));
        assert!(matches!(cmds[2], DrawCommand::DashedLine { .. }));
        assert_eq!(texts(&cmds), vec![BASKET_GLYPH, "💣"]);
        assert!(!cmds.iter().any(|c| matches!(c, DrawCommand::FillRect { .. })));
    }

    #[test]
    fn test_guides_split_thirds() {
        let cmds = build_frame(&state(), &Settings::default());
        let xs: Vec<f32> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DashedLine { from, .. } => Some(from.x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![200.0, 400.0]);
    }

    #[test]
    fn test_item_drawn_at_center() {
        let cmds = build_frame(&state(), &Settings::default());
        let bomb = cmds.iter().find_map(|c| match c {
            DrawCommand::Text { text, center, .. } if text == "💣" => Some(*center),
            _ => None,
        });
        assert_eq!(bomb, Some(Vec2::new(100.0, 125.0)));
    }

    #[test]
    fn test_game_over_overlay_last() {
        let mut s = state();
        s.score = 1200;
        s.trigger_game_over();
        let cmds = build_frame(&s, &Settings::default());
        let overlay_at = cmds
            .iter()
            .position(|c| matches!(c, DrawCommand::FillRect { .. }))
            .unwrap();
        assert!(overlay_at > 3);
        let t = texts(&cmds);
        assert!(t.contains(&"GAME OVER"));
        assert!(t.contains(&"Final score: 1200"));
        assert_eq!(t.last(), Some(&"Press Space or Enter to play again"));
    }

    #[test]
    fn test_settings_hide_guides_and_hint() {
        let settings = Settings {
            show_lane_guides: false,
            show_restart_hint: false,
            ..Default::default()
        };
        let mut s = state();
        s.trigger_game_over();
        let cmds = build_frame(&s, &settings);
        assert!(!cmds.iter().any(|c| matches!(c, DrawCommand::DashedLine { .. })));
        assert_eq!(texts(&cmds).len(), 4);
    }
}
