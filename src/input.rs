use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction::{self, *};

/// Everything the player asked for since the previous tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PolledInput {
    pub quit: bool,
    /// Turn requests in the order they arrived.
    pub directions: Vec<Direction>,
}

pub trait InputSource {
    /// Drains pending events without blocking.
    fn poll_events(&mut self) -> Result<PolledInput>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum Intent {
    Turn(Direction),
    Quit,
}

pub fn key_intent(ev: &KeyEvent) -> Option<Intent> {
    if is_ctrl_c(ev) {
        return Some(Intent::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Intent::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Intent::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Intent::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Intent::Turn(Right)),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Intent::Quit),
        _ => None,
    }
}

/// Folds a batch of key events into one tick's worth of input.
pub fn collect_intents<I: IntoIterator<Item = KeyEvent>>(events: I) -> PolledInput {
    let mut polled = PolledInput::default();

    for ev in events {
        match key_intent(&ev) {
            Some(Intent::Quit) => {
                polled.quit = true;
                break;
            }
            Some(Intent::Turn(dir)) => polled.directions.push(dir),
            None => {}
        }
    }

    polled
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
