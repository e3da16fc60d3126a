use super::{
    config::GameConfig,
    direction::Direction,
    state::{CollisionType, GameOutcome, GameState, Position, Snake, SpecialFood, SpecialFoodKind},
};
use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Something the snake ate during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumption {
    Food,
    SpecialFood(SpecialFoodKind),
}

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// What the snake ate this step, if anything
    pub consumed: Option<Consumption>,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Id of a special food spawned this step; its expiry timer must be armed
    pub spawned_special: Option<u64>,
    /// The tick interval was recomputed and the ticker must be rescheduled
    pub speed_changed: bool,
}

/// Result of a game step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    next_special_id: u64,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine with a fixed seed, for reproducible games
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            next_special_id: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    ///
    /// A single-cell snake at the configured start heading right, fresh food,
    /// no special food, score zero and the base tick interval.
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::new(self.config.start_position, Direction::Right, 1);

        // A validated config always leaves at least one free cell here
        let food = self
            .generate_food_position(&snake)
            .unwrap_or(self.config.start_position);

        GameState::new(
            snake,
            food,
            self.config.grid_width(),
            self.config.grid_height(),
            self.config.tick_interval(0),
        )
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if state.is_game_over {
            return StepResult {
                terminated: true,
                info: StepInfo::default(),
            };
        }

        // Calculate new head position
        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        // Check for collisions
        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.is_game_over = true;
            state.outcome = Some(GameOutcome::Collision(collision_type));
            state.steps += 1;

            return StepResult {
                terminated: true,
                info: StepInfo {
                    collision_type: Some(collision_type),
                    ..Default::default()
                },
            };
        }

        state.snake.push_head(new_head);
        state.steps += 1;

        let mut info = StepInfo::default();

        if new_head == state.food {
            state.score += 1;
            info.consumed = Some(Consumption::Food);

            match self.generate_food_position(&state.snake) {
                Some(food) => state.food = food,
                None => {
                    state.is_game_over = true;
                    state.outcome = Some(GameOutcome::BoardFilled);
                    return StepResult {
                        terminated: true,
                        info,
                    };
                }
            }

            self.update_speed(state, &mut info);

            if self.rng.gen_bool(self.config.special_food_chance) {
                info.spawned_special = self.spawn_special_food(state);
            }
        } else if let Some(special) = state
            .special_food
            .filter(|special| special.position == new_head)
        {
            state.special_food = None;
            info.consumed = Some(Consumption::SpecialFood(special.kind));

            match special.kind {
                SpecialFoodKind::Harmful => {
                    state.score = state.score.saturating_sub(1);
                    // Undo the growth from the new head, then lose one more.
                    // pop_tail never removes the head, so a lone head stays.
                    state.snake.pop_tail();
                    state.snake.pop_tail();
                }
                SpecialFoodKind::Beneficial => {
                    state.score += 4;
                    // The head already grew the snake by one
                    state.snake.extend_tail(3);
                }
            }
            debug!("special food {} eaten ({:?})", special.id, special.kind);

            self.update_speed(state, &mut info);
        }

        if info.consumed.is_none() {
            state.snake.pop_tail();
        }

        StepResult {
            terminated: false,
            info,
        }
    }

    /// Spawn a special food unless one is already on the board
    ///
    /// Returns the id of the new special food. The caller arms its expiry
    /// timer with that id.
    pub fn spawn_special_food(&mut self, state: &mut GameState) -> Option<u64> {
        if state.special_food.is_some() {
            return None;
        }

        let kind = if self.rng.gen_bool(0.5) {
            SpecialFoodKind::Harmful
        } else {
            SpecialFoodKind::Beneficial
        };
        let position = self.generate_food_position(&state.snake)?;

        self.next_special_id += 1;
        let id = self.next_special_id;
        state.special_food = Some(SpecialFood {
            id,
            position,
            kind,
            color: kind.color(),
        });
        debug!("special food {id} ({kind:?}) spawned at {position:?}");

        Some(id)
    }

    /// Remove the special food whose expiry timer fired
    ///
    /// A stale id (the food was eaten or replaced meanwhile) is ignored.
    pub fn expire_special_food(&self, state: &mut GameState, id: u64) -> bool {
        match state.special_food {
            Some(special) if special.id == id => {
                state.special_food = None;
                debug!("special food {id} expired");
                true
            }
            _ => false,
        }
    }

    /// Pick a random cell not covered by the snake
    ///
    /// Returns `None` when the snake covers the whole board.
    pub fn generate_food_position(&mut self, snake: &Snake) -> Option<Position> {
        let width = self.config.grid_width();
        let height = self.config.grid_height();

        if snake.body.len() >= width * height {
            return None;
        }

        loop {
            let x = self.rng.gen_range(0..width) as i32;
            let y = self.rng.gen_range(0..height) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }
    }

    /// Recompute the tick interval after a consumption
    fn update_speed(&self, state: &mut GameState, info: &mut StepInfo) {
        state.tick_interval = self.config.tick_interval(state.score);
        info.speed_changed = true;
        debug!(
            "score {} -> tick interval {:?}",
            state.score, state.tick_interval
        );
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        // Check wall collision
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        // Check self-collision, tail included
        if state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7)
    }

    /// Engine that never spawns special food on its own
    fn quiet_engine() -> GameEngine {
        let config = GameConfig {
            special_food_chance: 0.0,
            ..Default::default()
        };
        GameEngine::with_seed(config, 7)
    }

    fn place_special(state: &mut GameState, kind: SpecialFoodKind) -> Position {
        let position = state.snake.head().moved_in_direction(state.snake.direction);
        state.special_food = Some(SpecialFood {
            id: 99,
            position,
            kind,
            color: kind.color(),
        });
        // Keep ordinary food out of the way
        state.food = Position::new(0, 0);
        position
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let state = engine.reset();

        assert!(!state.is_game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.body, vec![Position::new(10, 10)]);
        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.special_food, None);
        assert_eq!(state.tick_interval, Duration::from_millis(200));
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = quiet_engine();
        let mut state = engine.reset();
        state.food = Position::new(0, 0);

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert_eq!(result.info.consumed, None);
        assert!(!result.info.speed_changed);
        assert_eq!(state.snake.body, vec![Position::new(11, 10)]);
        assert_eq!(state.steps, 1);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = quiet_engine();
        let mut state = engine.reset();

        // Place food directly in front of snake
        state.food = state.snake.head().moved_in_direction(state.snake.direction);
        let initial_length = state.snake.len();

        let result = engine.step(&mut state);

        assert_eq!(result.info.consumed, Some(Consumption::Food));
        assert!(result.info.speed_changed);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), initial_length + 1);
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_length_invariant_without_food() {
        let mut engine = quiet_engine();
        let snake = Snake::new(Position::new(10, 5), Direction::Down, 4);
        let mut state = GameState::new(snake, Position::new(0, 0), 20, 20, Duration::from_millis(200));

        for _ in 0..5 {
            engine.step(&mut state);
            assert_eq!(state.snake.len(), 4);
        }
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        let mut state = GameState::new(
            Snake::new(Position::new(0, 5), Direction::Left, 3),
            Position::new(5, 5),
            20,
            20,
            Duration::from_millis(200),
        );

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert!(state.is_game_over);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(
            state.outcome,
            Some(GameOutcome::Collision(CollisionType::Wall))
        );
    }

    #[test]
    fn test_wall_collision_every_edge() {
        let edges = [
            (Position::new(5, 0), Direction::Up),
            (Position::new(5, 19), Direction::Down),
            (Position::new(0, 5), Direction::Left),
            (Position::new(19, 5), Direction::Right),
        ];

        for (head, direction) in edges {
            let mut engine = engine();
            let mut state = GameState::new(
                Snake::new(head, direction, 1),
                Position::new(10, 10),
                20,
                20,
                Duration::from_millis(200),
            );
            let result = engine.step(&mut state);
            assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        }
    }

    #[test]
    fn test_self_collision() {
        let mut engine = quiet_engine();

        // Snake at (5, 5) going Right with length 5
        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        let mut state = GameState::new(snake, Position::new(8, 8), 20, 20, Duration::from_millis(200));

        // Down: (5,6), (5,5), (4,5), (3,5), (2,5)
        state.change_direction(Direction::Down);
        engine.step(&mut state);
        // Left: (4,6), (5,6), (5,5), (4,5), (3,5)
        state.change_direction(Direction::Left);
        engine.step(&mut state);
        // Up: (4,5) is still body
        state.change_direction(Direction::Up);
        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_moving_into_tail_cell_collides() {
        let mut engine = quiet_engine();
        // A 2x2 loop: head (5,5), then (5,6), (6,6), tail (6,5)
        let snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(6, 6),
                Position::new(6, 5),
            ],
            placeholders: 0,
            direction: Direction::Right,
        };
        let mut state = GameState::new(snake, Position::new(0, 0), 20, 20, Duration::from_millis(200));

        let result = engine.step(&mut state);

        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.is_game_over = true;
        let before = state.clone();

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(state, before);
    }

    #[test]
    fn test_harmful_special_food() {
        let mut engine = quiet_engine();
        let snake = Snake::new(Position::new(10, 10), Direction::Right, 3);
        let mut state = GameState::new(snake, Position::new(0, 0), 20, 20, Duration::from_millis(200));
        state.score = 5;
        place_special(&mut state, SpecialFoodKind::Harmful);

        let result = engine.step(&mut state);

        assert_eq!(
            result.info.consumed,
            Some(Consumption::SpecialFood(SpecialFoodKind::Harmful))
        );
        assert!(result.info.speed_changed);
        assert_eq!(state.score, 4);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.special_food, None);
    }

    #[test]
    fn test_harmful_special_food_floors_score_and_length() {
        let mut engine = quiet_engine();
        let mut state = engine.reset();
        place_special(&mut state, SpecialFoodKind::Harmful);

        engine.step(&mut state);

        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(11, 10));
    }

    #[test]
    fn test_beneficial_special_food() {
        let mut engine = quiet_engine();
        let mut state = engine.reset();
        place_special(&mut state, SpecialFoodKind::Beneficial);

        let result = engine.step(&mut state);

        assert_eq!(
            result.info.consumed,
            Some(Consumption::SpecialFood(SpecialFoodKind::Beneficial))
        );
        assert_eq!(state.score, 4);
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.tick_interval, Duration::from_millis(190));

        // The extra segments are shed as the snake moves on
        state.food = Position::new(0, 0);
        engine.step(&mut state);
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.snake.body.len(), 3);
    }

    #[test]
    fn test_food_beats_special_food_on_same_cell() {
        let mut engine = quiet_engine();
        let mut state = engine.reset();
        let cell = place_special(&mut state, SpecialFoodKind::Beneficial);
        state.food = cell;

        let result = engine.step(&mut state);

        assert_eq!(result.info.consumed, Some(Consumption::Food));
        assert_eq!(state.score, 1);
        assert!(state.special_food.is_some());
    }

    #[test]
    fn test_spawn_special_food_once() {
        let mut engine = engine();
        let mut state = engine.reset();

        let first = engine.spawn_special_food(&mut state);
        assert!(first.is_some());
        let special = state.special_food.expect("special food spawned");
        assert!(!state.snake.occupies(special.position));
        assert_eq!(special.color, special.kind.color());

        assert_eq!(engine.spawn_special_food(&mut state), None);
        assert_eq!(state.special_food, Some(special));
    }

    #[test]
    fn test_spawn_special_food_both_kinds() {
        let mut engine = engine();
        let mut seen_harmful = false;
        let mut seen_beneficial = false;

        for _ in 0..64 {
            let mut state = engine.reset();
            engine.spawn_special_food(&mut state);
            match state.special_food.map(|s| s.kind) {
                Some(SpecialFoodKind::Harmful) => seen_harmful = true,
                Some(SpecialFoodKind::Beneficial) => seen_beneficial = true,
                None => panic!("special food should spawn on an empty board"),
            }
        }

        assert!(seen_harmful && seen_beneficial);
    }

    #[test]
    fn test_eating_food_always_spawns_special_at_full_chance() {
        let config = GameConfig {
            special_food_chance: 1.0,
            ..Default::default()
        };
        let mut engine = GameEngine::with_seed(config, 3);
        let mut state = engine.reset();
        state.food = state.snake.head().moved_in_direction(state.snake.direction);

        let result = engine.step(&mut state);

        let id = result.info.spawned_special.expect("special food spawned");
        assert_eq!(state.special_food.map(|s| s.id), Some(id));
    }

    #[test]
    fn test_expire_ignores_stale_id() {
        let mut engine = engine();
        let mut state = engine.reset();
        let id = engine.spawn_special_food(&mut state).expect("spawned");

        assert!(!engine.expire_special_food(&mut state, id + 1));
        assert!(state.special_food.is_some());

        assert!(engine.expire_special_food(&mut state, id));
        assert_eq!(state.special_food, None);
        assert!(!engine.expire_special_food(&mut state, id));
    }

    #[test]
    fn test_generated_food_avoids_snake() {
        let mut engine = engine();
        let snake = Snake::new(Position::new(19, 10), Direction::Right, 20);

        for _ in 0..200 {
            let food = engine.generate_food_position(&snake).expect("free cell");
            assert!(!snake.occupies(food));
            assert!((0..20).contains(&food.x) && (0..20).contains(&food.y));
        }
    }

    #[test]
    fn test_generate_food_on_full_board() {
        let config = GameConfig {
            canvas_width: 40,
            canvas_height: 20,
            start_position: Position::new(0, 0),
            ..Default::default()
        };
        let mut engine = GameEngine::with_seed(config, 1);
        let full = Snake::new(Position::new(1, 0), Direction::Right, 2);

        assert_eq!(engine.generate_food_position(&full), None);
    }

    #[test]
    fn test_filling_the_board_ends_the_game() {
        let config = GameConfig {
            canvas_width: 40,
            canvas_height: 20,
            start_position: Position::new(0, 0),
            special_food_chance: 0.0,
            ..Default::default()
        };
        let mut engine = GameEngine::with_seed(config, 1);
        let mut state = engine.reset();
        assert_eq!(state.food, Position::new(1, 0));

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(result.info.consumed, Some(Consumption::Food));
        assert_eq!(state.score, 1);
        assert_eq!(state.outcome, Some(GameOutcome::BoardFilled));
    }
}
