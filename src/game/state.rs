use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// A flat color, stored as red, green, blue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The snake in the game
///
/// `body` holds the cells the snake actually covers, head first. Growth from
/// a beneficial special food is recorded in `placeholders`: those segments
/// sit behind the last real cell, count toward the length, cover nothing and
/// are shed before any real cell when the tail moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Pending tail segments that do not cover a cell yet
    pub placeholders: usize,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self {
            body,
            placeholders: 0,
            direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if any segment of the snake, head included, covers `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Add a new head in front of the current one
    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Remove the last segment, shedding placeholders first
    ///
    /// The head is never removed.
    pub fn pop_tail(&mut self) {
        if self.placeholders > 0 {
            self.placeholders -= 1;
        } else if self.body.len() > 1 {
            self.body.pop();
        }
    }

    /// Append `count` placeholder segments to the tail
    pub fn extend_tail(&mut self, count: usize) {
        self.placeholders += count;
    }

    /// Length of the snake, placeholders included
    pub fn len(&self) -> usize {
        self.body.len() + self.placeholders
    }
}

/// What a special food does when eaten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialFoodKind {
    /// +4 points and four extra segments
    Beneficial,
    /// -1 point (floored at zero) and one segment shorter
    Harmful,
}

impl SpecialFoodKind {
    /// Display color assigned when the food spawns
    pub fn color(&self) -> Rgb {
        match self {
            SpecialFoodKind::Beneficial => Rgb(0xff, 0xea, 0x00),
            SpecialFoodKind::Harmful => Rgb(0xf7, 0x25, 0x85),
        }
    }
}

/// A short-lived bonus or penalty item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialFood {
    /// Generation id, matched against the expiry timer that was armed for it
    pub id: u64,
    pub position: Position,
    pub kind: SpecialFoodKind,
    pub color: Rgb,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Collision(CollisionType),
    /// The snake covers every cell and no food can be placed
    BoardFilled,
}

impl GameOutcome {
    pub fn describe(&self) -> &'static str {
        match self {
            GameOutcome::Collision(CollisionType::Wall) => "Hit the wall",
            GameOutcome::Collision(CollisionType::SelfCollision) => "Bit your own tail",
            GameOutcome::BoardFilled => "Board filled, you win!",
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub special_food: Option<SpecialFood>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    /// Current tick interval, derived from the score
    pub tick_interval: Duration,
    pub is_game_over: bool,
    pub outcome: Option<GameOutcome>,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        snake: Snake,
        food: Position,
        grid_width: usize,
        grid_height: usize,
        tick_interval: Duration,
    ) -> Self {
        Self {
            snake,
            food,
            special_food: None,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            tick_interval,
            is_game_over: false,
            outcome: None,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    /// Turn the snake, unless the turn would reverse it onto itself
    ///
    /// Returns whether the direction was accepted.
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        if self.snake.direction.is_opposite(direction) {
            return false;
        }
        self.snake.direction = direction;
        true
    }
}
