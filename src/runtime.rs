use std::collections::VecDeque;
use std::io;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::digits::Digit;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource {
    /// Block until the next event. `Ok(None)` means the source is exhausted.
    fn next_event(&mut self) -> io::Result<Option<AppEvent>>;
}

/// Production event source reading crossterm events on the calling thread
#[derive(Debug, Default)]
pub struct CrosstermEventSource;

impl CrosstermEventSource {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for CrosstermEventSource {
    fn next_event(&mut self) -> io::Result<Option<AppEvent>> {
        loop {
            match event::read()? {
                // Windows reports releases too; only presses drive the game
                CtEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(Some(AppEvent::Key(key)))
                }
                CtEvent::Resize(_, _) => return Ok(Some(AppEvent::Resize)),
                _ => {}
            }
        }
    }
}

/// Replays a fixed list of events; used by headless tests
#[derive(Debug, Default)]
pub struct ScriptedEventSource {
    events: VecDeque<AppEvent>,
}

impl ScriptedEventSource {
    pub fn new<I: IntoIterator<Item = AppEvent>>(events: I) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// One key press per character of `text`
    pub fn typing(text: &str) -> Self {
        Self::new(text.chars().map(|c| AppEvent::Key(key(KeyCode::Char(c)))))
    }

    pub fn push(&mut self, event: AppEvent) {
        self.events.push_back(event);
    }
}

impl EventSource for ScriptedEventSource {
    fn next_event(&mut self) -> io::Result<Option<AppEvent>> {
        Ok(self.events.pop_front())
    }
}

/// Runner that advances the application one event at a time
pub struct Runner<E: EventSource> {
    event_source: E,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E) -> Self {
        Self { event_source }
    }

    pub fn step(&mut self) -> io::Result<Option<AppEvent>> {
        self.event_source.next_event()
    }
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// The digit typed by a key press, if any. Modified keys never count.
pub fn digit_from_key(key: &KeyEvent) -> Option<Digit> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => Digit::try_from(c).ok(),
        _ => None,
    }
}

pub fn is_quit_chord(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_source_drains_in_order() {
        let mut runner = Runner::new(ScriptedEventSource::new([
            AppEvent::Resize,
            AppEvent::Key(key(KeyCode::Esc)),
        ]));
        assert_eq!(runner.step().unwrap(), Some(AppEvent::Resize));
        assert_eq!(runner.step().unwrap(), Some(AppEvent::Key(key(KeyCode::Esc))));
        assert_eq!(runner.step().unwrap(), None);
    }

    #[test]
    fn typing_emits_one_key_per_char() {
        let mut source = ScriptedEventSource::typing("31");
        source.push(AppEvent::Resize);
        let mut runner = Runner::new(source);
        assert_eq!(
            runner.step().unwrap(),
            Some(AppEvent::Key(key(KeyCode::Char('3'))))
        );
        assert_eq!(
            runner.step().unwrap(),
            Some(AppEvent::Key(key(KeyCode::Char('1'))))
        );
        assert_eq!(runner.step().unwrap(), Some(AppEvent::Resize));
    }

    #[test]
    fn digits_from_keys() {
        assert_eq!(
            digit_from_key(&key(KeyCode::Char('7'))).map(Digit::value),
            Some(7)
        );
        assert_eq!(digit_from_key(&key(KeyCode::Char('a'))), None);
        assert_eq!(digit_from_key(&key(KeyCode::Enter)), None);
        let ctrl_one = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::CONTROL);
        assert_eq!(digit_from_key(&ctrl_one), None);
        let shifted = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::SHIFT);
        assert!(digit_from_key(&shifted).is_some());
    }

    #[test]
    fn ctrl_c_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_quit_chord(&ctrl_c));
        assert!(!is_quit_chord(&key(KeyCode::Char('c'))));
    }
}
