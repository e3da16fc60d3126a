//! Paints the game state onto a pixel surface

use super::surface::Surface;
use crate::game::{Direction, GameOutcome, GameState, Position, Rgb};

pub const BACKGROUND: Rgb = Rgb(0x16, 0x1b, 0x22);
pub const SNAKE_BODY: Rgb = Rgb(0x48, 0xca, 0xe4);
pub const SNAKE_HEAD: Rgb = Rgb(0xad, 0xe8, 0xf4);
pub const FOOD: Rgb = Rgb(0xff, 0xaf, 0xcc);

/// Rectangle in fifths of a cell: x, y, width, height
type FacePart = (u32, u32, u32, u32);

/// Two eyes and a mouth, the mouth on the side the snake is heading
fn face(direction: Direction) -> [FacePart; 3] {
    match direction {
        Direction::Up => [(1, 3, 1, 1), (3, 3, 1, 1), (1, 1, 3, 1)],
        Direction::Down => [(1, 1, 1, 1), (3, 1, 1, 1), (1, 3, 3, 1)],
        Direction::Left => [(3, 1, 1, 1), (3, 3, 1, 1), (1, 1, 1, 3)],
        Direction::Right => [(1, 1, 1, 1), (1, 3, 1, 1), (3, 1, 1, 3)],
    }
}

fn fill_cell(surface: &mut impl Surface, pos: Position, cell_size: u32, color: Rgb) {
    let size = cell_size as i32;
    surface.fill_rect(pos.x * size, pos.y * size, cell_size, cell_size, color);
}

/// Repaint the whole surface from `state`
pub fn paint(surface: &mut impl Surface, state: &GameState, cell_size: u32) {
    let (width, height) = (surface.width(), surface.height());
    surface.fill_rect(0, 0, width, height, BACKGROUND);

    for &segment in state.snake.body_segments() {
        fill_cell(surface, segment, cell_size, SNAKE_BODY);
    }

    let head = state.snake.head();
    fill_cell(surface, head, cell_size, SNAKE_HEAD);

    let unit = cell_size / 5;
    let (head_x, head_y) = (head.x * cell_size as i32, head.y * cell_size as i32);
    for (x, y, w, h) in face(state.direction()) {
        surface.fill_rect(
            head_x + (x * unit) as i32,
            head_y + (y * unit) as i32,
            w * unit,
            h * unit,
            BACKGROUND,
        );
    }

    // A filled board has nowhere left for food; the last one was eaten
    if state.outcome != Some(GameOutcome::BoardFilled) {
        fill_cell(surface, state.food, cell_size, FOOD);
    }

    if let Some(special) = state.special_food {
        fill_cell(surface, special.position, cell_size, special.color);
    }
}
