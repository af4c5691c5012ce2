use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

use crate::events::AppEvent;
use crate::events::DriverEvent;
use crate::events::Event;

/// Milliseconds added to or removed from the interval per key press
const INTERVAL_STEP: i64 = 25;

/// Density added or removed per key press
const DENSITY_STEP: f64 = 0.05;

/// Converts a crossterm event into a backdrop event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    match event {
        CrossTermEvent::Key(KeyEvent {
            kind: KeyEventKind::Release,
            ..
        }) => None,
        CrossTermEvent::Key(key_event) => match key_event {
            KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => Some(Event::AppEvent(AppEvent::Exit)),
            KeyEvent {
                code: KeyCode::Char('t'),
                ..
            } => Some(Event::DriverEvent(DriverEvent::ToggleTheme)),
            KeyEvent {
                code: KeyCode::Char('+'),
                ..
            } => Some(Event::DriverEvent(DriverEvent::Interval(-INTERVAL_STEP))),
            KeyEvent {
                code: KeyCode::Char('-'),
                ..
            } => Some(Event::DriverEvent(DriverEvent::Interval(INTERVAL_STEP))),
            KeyEvent {
                code: KeyCode::Char('['),
                ..
            } => Some(Event::DriverEvent(DriverEvent::Density(-DENSITY_STEP))),
            KeyEvent {
                code: KeyCode::Char(']'),
                ..
            } => Some(Event::DriverEvent(DriverEvent::Density(DENSITY_STEP))),
            KeyEvent { code, .. } => {
                let (dx, dy) = match code {
                    KeyCode::Left | KeyCode::Char('h') => (-1, 0),
                    KeyCode::Down | KeyCode::Char('j') => (0, 1),
                    KeyCode::Up | KeyCode::Char('k') => (0, -1),
                    KeyCode::Right | KeyCode::Char('l') => (1, 0),
                    _ => return None,
                };

                Some(Event::AppEvent(AppEvent::MoveAnchor { dx, dy }))
            }
        },
        CrossTermEvent::Resize(cols, rows) => {
            Some(Event::AppEvent(AppEvent::Resize { cols, rows }))
        }
        _ => None,
    }
}
