use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::SystemTime;

use crate::runtime::AppEvent;
use crate::session::{GameStats, KeystrokeOutcome, Session, SessionError, SessionSettings};
use crate::word::WordItem;

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Typing,
    Results(GameStats),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitType {
    Restart,
    Quit,
}

/// Terminal front end state: the running session plus what to show.
#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub state: AppState,
    words: Vec<WordItem>,
    settings: SessionSettings,
}

impl App {
    pub fn new(words: Vec<WordItem>, settings: SessionSettings) -> Result<Self, SessionError> {
        Ok(Self {
            session: Session::new(words.clone(), settings)?,
            state: AppState::Typing,
            words,
            settings,
        })
    }

    /// Starts over with the same words and settings.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.session = Session::new(self.words.clone(), self.settings)?;
        self.state = AppState::Typing;
        Ok(())
    }

    /// Stats of the last finished drill, if the results screen is showing.
    pub fn final_stats(&self) -> Option<&GameStats> {
        match &self.state {
            AppState::Results(stats) => Some(stats),
            AppState::Typing => None,
        }
    }

    pub fn on_tick(&mut self, now: SystemTime) {
        if let Some(point) = self.session.apply_tick(now) {
            log::trace!("sampled {} wpm at {}s", point.wpm, point.elapsed_seconds);
        }
    }

    /// Dispatches one loop event. The history sampler is polled after every
    /// event, so steady typing cannot hold back samples; it ignores polls
    /// before the next sample is due.
    pub fn handle_event(&mut self, event: AppEvent, now: SystemTime) -> Option<ExitType> {
        let exit = match event {
            AppEvent::Key(key) => self.on_key(key, now),
            AppEvent::Resize | AppEvent::Tick => None,
        };
        if exit.is_none() {
            self.on_tick(now);
        }
        exit
    }

    /// Handles a key press; returns how the loop should exit, if at all.
    pub fn on_key(&mut self, key: KeyEvent, now: SystemTime) -> Option<ExitType> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let chord = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('c')) {
            self.session.exit();
            return Some(ExitType::Quit);
        }

        match self.state {
            AppState::Typing => {
                let mut candidate = self.session.buffer().to_string();
                match key.code {
                    KeyCode::Char(c) if !chord => candidate.push(c),
                    KeyCode::Backspace => {
                        candidate.pop();
                    }
                    _ => return None,
                }
                if let KeystrokeOutcome::Finished(stats) =
                    self.session.apply_keystroke(&candidate, now)
                {
                    self.state = AppState::Results(stats);
                }
                None
            }
            AppState::Results(_) => match key.code {
                KeyCode::Char('r') => Some(ExitType::Restart),
                KeyCode::Char('q') => Some(ExitType::Quit),
                _ => None,
            },
        }
    }
}
