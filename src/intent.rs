use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction;

const POLL_INTERVAL_MS: u64 = 25;

/// Everything the player can ask of the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Pause,
    Start,
    Restart,
    Quit,
}

const KEY_BINDINGS: &[(KeyCode, Intent)] = &[
    (KeyCode::Up, Intent::MoveUp),
    (KeyCode::Char('w'), Intent::MoveUp),
    (KeyCode::Char('k'), Intent::MoveUp),
    (KeyCode::Down, Intent::MoveDown),
    (KeyCode::Char('s'), Intent::MoveDown),
    (KeyCode::Char('j'), Intent::MoveDown),
    (KeyCode::Left, Intent::MoveLeft),
    (KeyCode::Char('a'), Intent::MoveLeft),
    (KeyCode::Char('h'), Intent::MoveLeft),
    (KeyCode::Right, Intent::MoveRight),
    (KeyCode::Char('d'), Intent::MoveRight),
    (KeyCode::Char('l'), Intent::MoveRight),
    (KeyCode::Char('p'), Intent::Pause),
    (KeyCode::Char(' '), Intent::Pause),
    (KeyCode::Esc, Intent::Pause),
    (KeyCode::Enter, Intent::Start),
    (KeyCode::Char('r'), Intent::Restart),
    (KeyCode::Char('q'), Intent::Quit),
];

impl Intent {
    pub fn from_key(ev: &KeyEvent) -> Option<Intent> {
        if is_ctrl_c(ev) {
            return Some(Intent::Quit);
        }

        let code = match ev.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };

        KEY_BINDINGS.iter().find(|(key, _)| *key == code).map(|(_, intent)| *intent)
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Intent::MoveUp => Some(Direction::Up),
            Intent::MoveDown => Some(Direction::Down),
            Intent::MoveLeft => Some(Direction::Left),
            Intent::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

/// Forwards key presses as intents until `stop` is raised or the receiving
/// side hangs up.
pub fn spawn_reader(intents: Sender<Intent>, stop: Arc<AtomicBool>) -> JoinHandle<crossterm::Result<()>> {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            if !poll(Duration::from_millis(POLL_INTERVAL_MS))? {
                continue;
            }

            if let Event::Key(ev) = read()? {
                if let Some(intent) = Intent::from_key(&ev) {
                    if intents.send(intent).is_err() {
                        break;
                    }
                }
            }
        }

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn arrows_wasd_and_vim_keys_move() {
        for (code, intent) in [
            (KeyCode::Up, Intent::MoveUp),
            (KeyCode::Char('a'), Intent::MoveLeft),
            (KeyCode::Char('j'), Intent::MoveDown),
            (KeyCode::Char('l'), Intent::MoveRight),
        ] {
            assert_eq!(Intent::from_key(&key(code)), Some(intent));
        }
    }

    #[test]
    fn letters_are_case_insensitive() {
        let shifted = KeyEvent { code: KeyCode::Char('W'), modifiers: KeyModifiers::SHIFT };
        assert_eq!(Intent::from_key(&shifted), Some(Intent::MoveUp));
        assert_eq!(Intent::from_key(&key(KeyCode::Char('Q'))), Some(Intent::Quit));
    }

    #[test]
    fn commands() {
        assert_eq!(Intent::from_key(&key(KeyCode::Char('p'))), Some(Intent::Pause));
        assert_eq!(Intent::from_key(&key(KeyCode::Char(' '))), Some(Intent::Pause));
        assert_eq!(Intent::from_key(&key(KeyCode::Esc)), Some(Intent::Pause));
        assert_eq!(Intent::from_key(&key(KeyCode::Enter)), Some(Intent::Start));
        assert_eq!(Intent::from_key(&key(KeyCode::Char('r'))), Some(Intent::Restart));
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_does_nothing() {
        let ctrl_c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        assert_eq!(Intent::from_key(&ctrl_c), Some(Intent::Quit));
        assert_eq!(Intent::from_key(&key(KeyCode::Char('c'))), None);
        assert_eq!(Intent::from_key(&key(KeyCode::Tab)), None);
    }

    #[test]
    fn only_moves_carry_a_direction() {
        assert_eq!(Intent::MoveLeft.direction(), Some(Direction::Left));
        assert_eq!(Intent::Pause.direction(), None);
    }
}
