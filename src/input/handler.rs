use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position as ScreenPosition, Rect};

use crate::game::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    Restart,
    Quit,
    None,
}

/// Screen areas of the on-screen buttons from the last drawn frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonMap {
    buttons: Vec<(Rect, KeyAction)>,
}

impl ButtonMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, area: Rect, action: KeyAction) {
        self.buttons.push((area, action));
    }

    /// Action of the button under the given terminal cell
    pub fn hit(&self, column: u16, row: u16) -> KeyAction {
        let point = ScreenPosition::new(column, row);
        self.buttons
            .iter()
            .find(|(area, _)| area.contains(point))
            .map(|(_, action)| *action)
            .unwrap_or(KeyAction::None)
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Turn(Direction::Up),
            KeyCode::Down => KeyAction::Turn(Direction::Down),
            KeyCode::Left => KeyAction::Turn(Direction::Left),
            KeyCode::Right => KeyAction::Turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Turn(Direction::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }

    /// Map a left click on an on-screen button to its action
    pub fn handle_mouse_event(&self, mouse: MouseEvent, buttons: &ButtonMap) -> KeyAction {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => buttons.hit(mouse.column, mouse.row),
            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
