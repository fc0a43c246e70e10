//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::input::GestureCommand;
use crate::tuning::Tuning;
use crate::{Viewport, square_center};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Not running; nothing spawns and the frame loop is idle
    Ready,
    /// Active round
    Playing,
    /// Round ended; the last frame stays on screen under an overlay
    GameOver,
}

/// The player's basket
#[derive(Debug, Clone)]
pub struct Basket {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Desired x from the last gesture command
    pub target_x: f32,
    /// Fraction of the remaining gap covered per frame
    pub smoothing: f32,
    /// Gap below which x snaps onto target_x
    pub snap_distance: f32,
    canvas_width: f32,
}

impl Basket {
    pub fn new(viewport: Viewport, tuning: &Tuning) -> Self {
        let mut basket = Self {
            pos: Vec2::ZERO,
            width: BASKET_SIZE,
            height: BASKET_SIZE,
            target_x: 0.0,
            smoothing: tuning.basket_smoothing,
            snap_distance: tuning.basket_snap_distance,
            canvas_width: viewport.width,
        };
        basket.relayout(viewport);
        basket
    }

    /// Re-center on the bottom of a (possibly resized) canvas
    pub fn relayout(&mut self, viewport: Viewport) {
        self.canvas_width = viewport.width;
        self.pos.x = (viewport.width - self.width) / 2.0;
        self.pos.y = viewport.height - self.height - BASKET_BOTTOM_MARGIN;
        self.target_x = self.pos.x;
    }

    /// Target x for a command on the current canvas
    pub fn target_for(&self, command: GestureCommand) -> f32 {
        let section = self.canvas_width / 3.0;
        match command {
            GestureCommand::Left => section / 2.0 - self.width / 2.0,
            GestureCommand::Center => self.canvas_width / 2.0 - self.width / 2.0,
            // Written relative to the section rather than mirrored from Left
            GestureCommand::Right => section * 2.5 - self.width / 2.0,
        }
    }

    /// Point the basket at a lane. Position follows in `update`.
    pub fn steer(&mut self, command: GestureCommand) {
        self.target_x = self.target_for(command);
    }

    /// Ease toward target_x, snapping once close enough
    pub fn update(&mut self) {
        let gap = self.target_x - self.pos.x;
        if gap.abs() > self.snap_distance {
            self.pos.x += gap * self.smoothing;
        } else {
            self.pos.x = self.target_x;
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Lane the basket is currently over
    pub fn lane(&self) -> usize {
        let section = self.canvas_width / 3.0;
        if section <= 0.0 {
            return 1;
        }
        ((self.center().x / section).floor().max(0.0) as usize).min(2)
    }
}

/// Fruit varieties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FruitKind {
    Apple,
    Banana,
}

/// What a falling item is; fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Fruit(FruitKind),
    /// Ends the round on contact
    Bomb,
    /// Rare, fast, valuable
    Gold,
}

impl ItemKind {
    /// Points awarded when caught
    pub fn reward(&self) -> u32 {
        match self {
            ItemKind::Fruit(FruitKind::Apple) => 100,
            ItemKind::Fruit(FruitKind::Banana) => 200,
            ItemKind::Gold => 300,
            ItemKind::Bomb => 0,
        }
    }

    /// Applied to the base fall speed at spawn
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            ItemKind::Gold => 1.5,
            _ => 1.0,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ItemKind::Fruit(FruitKind::Apple) => "🍎",
            ItemKind::Fruit(FruitKind::Banana) => "🍌",
            ItemKind::Gold => "🍓",
            ItemKind::Bomb => "💣",
        }
    }

    pub fn is_bomb(&self) -> bool {
        matches!(self, ItemKind::Bomb)
    }
}

/// Spawn category chosen by the spawner; fruit variety is picked by the item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Fruit,
    Bomb,
    Gold,
}

/// A falling item entity
#[derive(Debug, Clone)]
pub struct FallingItem {
    pub id: u32,
    pub kind: ItemKind,
    /// Spawn lane (0 = left)
    pub lane: usize,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    /// Pixels per frame before the level multiplier
    pub speed: f32,
    pub active: bool,
}

impl FallingItem {
    pub fn new(id: u32, kind: ItemKind, lane: usize, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            kind,
            lane,
            pos,
            size: ITEM_SIZE,
            speed,
            active: true,
        }
    }

    /// Spawn above a random lane
    pub fn spawn<R: Rng + ?Sized>(
        id: u32,
        item_type: ItemType,
        canvas_width: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        let lane = rng.random_range(0..LANE_CENTERS.len());
        let x = canvas_width * LANE_CENTERS[lane] - ITEM_SIZE / 2.0;
        let base_speed = rng.random_range(tuning.fall_speed_min..tuning.fall_speed_max);

        let kind = match item_type {
            ItemType::Bomb => ItemKind::Bomb,
            ItemType::Gold => ItemKind::Gold,
            ItemType::Fruit => {
                if rng.random_bool(0.5) {
                    ItemKind::Fruit(FruitKind::Apple)
                } else {
                    ItemKind::Fruit(FruitKind::Banana)
                }
            }
        };

        Self::new(
            id,
            kind,
            lane,
            Vec2::new(x, ITEM_SPAWN_Y),
            base_speed * kind.speed_multiplier(),
        )
    }

    /// Fall one frame
    pub fn update(&mut self, level_speed_multiplier: f32) {
        self.pos.y += self.speed * level_speed_multiplier;
        if self.pos.y > ITEM_DESPAWN_Y {
            self.active = false;
        }
    }

    pub fn center(&self) -> Vec2 {
        square_center(self.pos, self.size)
    }
}

/// Notifications produced by the simulation, drained by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged { score: u32 },
    LevelUp { level: u32 },
    TimeChanged { seconds_left: u32 },
    GameOver { final_score: u32 },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u32,
    /// Derived from score, never decreases within a round
    pub level: u32,
    /// Seconds left in the round
    pub time_left: u32,
    pub basket: Basket,
    /// Live items (order is not meaningful)
    pub items: Vec<FallingItem>,
    /// Current spawn cadence
    pub spawn_interval_ms: f64,
    /// Frame timestamp of the last spawn (None until the first frame of a round)
    pub last_spawn_ms: Option<f64>,
    pub viewport: Viewport,
    pub tuning: Tuning,
    /// Pending notifications
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create an idle game in the Ready phase
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        Self {
            seed,
            phase: GamePhase::Ready,
            score: 0,
            level: 1,
            time_left: tuning.round_seconds,
            basket: Basket::new(viewport, &tuning),
            items: Vec::new(),
            spawn_interval_ms: tuning.base_spawn_interval_ms,
            last_spawn_ms: None,
            viewport,
            tuning,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset every round-scoped value and enter Playing
    pub fn start_round(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.level = 1;
        self.time_left = self.tuning.round_seconds;
        self.items.clear();
        self.basket = Basket::new(self.viewport, &self.tuning);
        self.spawn_interval_ms = self.tuning.base_spawn_interval_ms;
        self.last_spawn_ms = None;
    }

    /// Return to Ready. Round values stay as they were until the next start.
    pub fn stop_round(&mut self) {
        self.phase = GamePhase::Ready;
    }

    /// Enter GameOver; only the first call of a round has any effect
    pub fn trigger_game_over(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            final_score: self.score,
        });
    }

    /// Adopt new canvas dimensions. In-flight items keep their positions.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.basket.relayout(viewport);
    }

    pub fn level_speed_multiplier(&self) -> f32 {
        self.tuning.level_speed_multiplier(self.level)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn basket(width: f32) -> Basket {
        Basket::new(Viewport::new(width, 480.0), &Tuning::default())
    }

    #[test]
    fn test_basket_starts_centered_at_bottom() {
        let b = basket(600.0);
        assert_eq!(b.pos.x, 260.0);
        assert_eq!(b.pos.y, 480.0 - 80.0 - 10.0);
        assert_eq!(b.target_x, b.pos.x);
    }

    #[test]
    fn test_basket_lane_targets() {
        let mut b = basket(600.0);
        b.steer(GestureCommand::Left);
        assert_eq!(b.target_x, 60.0);
        b.steer(GestureCommand::Center);
        assert_eq!(b.target_x, 260.0);
        b.steer(GestureCommand::Right);
        assert_eq!(b.target_x, 460.0);
        // steering does not move the basket by itself
        assert_eq!(b.pos.x, 260.0);
    }

    #[test]
    fn test_basket_snaps_when_close() {
        let mut b = basket(600.0);
        b.target_x = b.pos.x + 0.4;
        b.update();
        assert_eq!(b.pos.x, b.target_x);
    }

    #[test]
    fn test_basket_reaches_target_eventually() {
        let mut b = basket(600.0);
        b.steer(GestureCommand::Left);
        for _ in 0..200 {
            b.update();
        }
        assert_eq!(b.pos.x, b.target_x);
        assert_eq!(b.lane(), 0);
    }

    #[test]
    fn test_item_kind_data() {
        assert_eq!(ItemKind::Fruit(FruitKind::Apple).reward(), 100);
        assert_eq!(ItemKind::Fruit(FruitKind::Banana).reward(), 200);
        assert_eq!(ItemKind::Gold.reward(), 300);
        assert_eq!(ItemKind::Bomb.reward(), 0);
        assert_eq!(ItemKind::Gold.speed_multiplier(), 1.5);
        assert!(ItemKind::Bomb.is_bomb());
    }

    #[test]
    fn test_spawned_item_in_a_lane_above_screen() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 0..50 {
            let item = FallingItem::spawn(id, ItemType::Fruit, 600.0, &tuning, &mut rng);
            let expected_x = 600.0 * LANE_CENTERS[item.lane] - ITEM_SIZE / 2.0;
            assert_eq!(item.pos.x, expected_x);
            assert_eq!(item.pos.y, ITEM_SPAWN_Y);
            assert!(item.speed >= 3.0 && item.speed < 5.0);
            assert!(matches!(item.kind, ItemKind::Fruit(_)));
        }
    }

    #[test]
    fn test_fruit_variety_and_lanes_are_uniform() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2024);
        let n = 30_000;
        let mut apples = 0;
        let mut lanes = [0u32; 3];
        for id in 0..n {
            let item = FallingItem::spawn(id, ItemType::Fruit, 600.0, &tuning, &mut rng);
            match item.kind {
                ItemKind::Fruit(FruitKind::Apple) => apples += 1,
                ItemKind::Fruit(FruitKind::Banana) => {}
                other => panic!("fruit spawn produced {:?}", other),
            }
            lanes[item.lane] += 1;
        }
        let apple_rate = apples as f32 / n as f32;
        assert!((apple_rate - 0.5).abs() < 0.02, "apple rate {apple_rate}");
        for (lane, count) in lanes.iter().enumerate() {
            let rate = *count as f32 / n as f32;
            assert!((rate - 1.0 / 3.0).abs() < 0.02, "lane {lane} rate {rate}");
        }
    }

    #[test]
    fn test_gold_falls_faster() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        for id in 0..50 {
            let item = FallingItem::spawn(id, ItemType::Gold, 600.0, &tuning, &mut rng);
            assert_eq!(item.kind, ItemKind::Gold);
            assert!(item.speed >= 4.5 && item.speed < 7.5);
        }
    }

    #[test]
    fn test_item_deactivates_off_screen() {
        let mut item = FallingItem::new(1, ItemKind::Bomb, 0, Vec2::new(0.0, 595.0), 4.0);
        item.update(1.0);
        assert!(item.active);
        item.update(1.0);
        assert!(!item.active);
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut state = GameState::new(1, Viewport::new(600.0, 480.0), Tuning::default());
        state.trigger_game_over();
        assert_eq!(state.phase, GamePhase::Ready);

        state.start_round();
        state.trigger_game_over();
        state.trigger_game_over();
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_start_round_is_silent() {
        let mut state = GameState::new(1, Viewport::new(600.0, 480.0), Tuning::default());
        state.start_round();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_resize_recenters_basket_only() {
        let mut state = GameState::new(1, Viewport::new(600.0, 480.0), Tuning::default());
        state.start_round();
        state
            .items
            .push(FallingItem::new(9, ItemKind::Gold, 2, Vec2::new(475.0, 100.0), 3.0));
        state.basket.steer(GestureCommand::Right);
        state.resize(Viewport::new(900.0, 700.0));
        assert_eq!(state.basket.pos.x, 410.0);
        assert_eq!(state.basket.target_x, 410.0);
        assert_eq!(state.basket.pos.y, 610.0);
        assert_eq!(state.items[0].pos, Vec2::new(475.0, 100.0));
    }

    proptest! {
        #[test]
        fn steering_is_idempotent(width in 90.0f32..4000.0, lane in 0usize..3) {
            let cmd = GestureCommand::from_lane(lane).unwrap();
            let mut b = basket(width);
            b.steer(cmd);
            let first = b.target_x;
            b.steer(cmd);
            prop_assert_eq!(b.target_x, first);
            prop_assert_eq!(first, basket(width).target_for(cmd));
        }

        #[test]
        fn basket_converges_monotonically(
            start in -500.0f32..2000.0,
            target in -500.0f32..2000.0,
            frames in 1usize..300,
        ) {
            let mut b = basket(1200.0);
            b.pos.x = start;
            b.target_x = target;
            for _ in 0..frames {
                let before = (b.target_x - b.pos.x).abs();
                b.update();
                let after = (b.target_x - b.pos.x).abs();
                if before > 0.0 {
                    prop_assert!(after < before);
                }
                if before <= 0.5 {
                    prop_assert_eq!(b.pos.x, b.target_x);
                }
            }
        }
    }
}
