use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::maze::Dir;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Dir),
    Restart,
    Quit,
}

/// Maps a terminal event to a game command. Key releases, mouse and
/// focus events map to nothing.
pub fn command_for(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) => command_for_key(key),
        _ => None,
    }
}

pub fn command_for_key(key: &KeyEvent) -> Option<Command> {
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => {}
        KeyEventKind::Release => return None,
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }
    let command = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => Command::Move(Dir::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => Command::Move(Dir::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => Command::Move(Dir::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => Command::Move(Dir::Right),
        KeyCode::Char('r' | 'R') | KeyCode::Enter => Command::Restart,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(command)
}
