use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// What a key press means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    Steer(Direction),
    StartOrRestart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyIntent {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyIntent::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyIntent::Steer(Direction::Up),
            KeyCode::Down => KeyIntent::Steer(Direction::Down),
            KeyCode::Left => KeyIntent::Steer(Direction::Left),
            KeyCode::Right => KeyIntent::Steer(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyIntent::Steer(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyIntent::Steer(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyIntent::Steer(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyIntent::Steer(Direction::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyIntent::Quit,
            KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') => {
                KeyIntent::StartOrRestart
            }

            _ => KeyIntent::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
