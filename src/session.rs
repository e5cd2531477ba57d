use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use thiserror::Error;

use crate::history::{HistoryPoint, HistorySampler, DEFAULT_SAMPLE_INTERVAL};
use crate::matcher::{Match, VariantSet};
use crate::metrics::MetricsAccumulator;
use crate::queue::WordQueue;
use crate::word::WordItem;

/// Completions needed to finish a drill.
pub const DRILL_WORD_COUNT: u32 = 100;
pub const DEFAULT_ERROR_FLASH: Duration = Duration::from_millis(200);

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// cycle through the list until you quit
    #[default]
    #[strum(serialize = "endless")]
    Endless,
    /// finish after 100 completed words
    #[serde(rename = "drill")]
    #[value(name = "drill")]
    #[strum(serialize = "drill")]
    Drill100,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No counted keystroke yet.
    Idle,
    Running,
    /// Drill target reached; stats have been handed off.
    Finished,
    /// Ended by the user.
    Exited,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Finished | Phase::Exited)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub mode: Mode,
    pub shuffle: bool,
    pub error_flash: Duration,
    pub sample_interval: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            mode: Mode::Endless,
            shuffle: false,
            error_flash: DEFAULT_ERROR_FLASH,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
        }
    }
}

impl SessionSettings {
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot start a session without words")]
    EmptyWordList,
    #[error("word {id:?} has no accepted spellings")]
    EmptyAccepts { id: String },
}

/// Final record of a finished drill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub wpm: u32,
    pub accuracy: u32,
    /// Seconds between the first counted keystroke and the finish.
    pub elapsed_time: f64,
    pub total_keystrokes: u32,
    pub correct_keystrokes: u32,
    pub missed_keystrokes: u32,
    pub words_completed: u32,
    pub history: Vec<HistoryPoint>,
}

/// What a single buffer change did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum KeystrokeOutcome {
    /// The session already ended.
    Ignored,
    /// Same buffer as the committed one.
    Unchanged,
    /// Buffer committed. `counted` is false for edits that did not grow it.
    Advanced { counted: bool },
    /// Buffer matched no spelling and was not committed.
    Rejected { counted: bool },
    /// Word finished and the next one is current.
    Completed,
    /// Word finished and it was the last one of the drill.
    Finished(GameStats),
}

/// Emitted when a session ends.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSignal {
    Finished(GameStats),
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveMetrics {
    pub wpm: u32,
    pub accuracy: u32,
    pub elapsed: Duration,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderView<'a> {
    pub display: &'a str,
    pub active_variant: &'a str,
    /// Characters of `active_variant` already typed.
    pub buffer_len: usize,
    pub is_error_flash: bool,
}

impl<'a> RenderView<'a> {
    /// Splits the guide into typed text, the cursor character and the rest.
    pub fn guide_parts(&self) -> (&'a str, Option<char>, &'a str) {
        let split = self
            .active_variant
            .char_indices()
            .nth(self.buffer_len)
            .map_or(self.active_variant.len(), |(i, _)| i);
        let (typed, remaining) = self.active_variant.split_at(split);
        let mut chars = remaining.chars();
        let current = chars.next();
        (typed, current, chars.as_str())
    }
}

/// Mutable part of a session.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Committed input for the current word; always a prefix of the active variant.
    pub buffer: String,
    pub variants: VariantSet,
    pub metrics: MetricsAccumulator,
    pub completed_count: u32,
    pub sampler: HistorySampler,
    pub error_flash_until: Option<SystemTime>,
}

impl SessionState {
    fn new(first_word: &WordItem, sample_interval: Duration) -> Self {
        Self {
            buffer: String::new(),
            variants: VariantSet::new(first_word.accepts.len()),
            metrics: MetricsAccumulator::new(),
            completed_count: 0,
            sampler: HistorySampler::new(sample_interval),
            error_flash_until: None,
        }
    }

    pub fn history(&self) -> &[HistoryPoint] {
        self.sampler.points()
    }
}

/// A typing session over a word list.
///
/// State only changes through [`Session::apply_keystroke`],
/// [`Session::apply_tick`] and [`Session::exit`].
#[derive(Debug, Clone)]
pub struct Session {
    settings: SessionSettings,
    queue: WordQueue,
    state: SessionState,
    phase: Phase,
}

impl Session {
    pub fn new(words: Vec<WordItem>, settings: SessionSettings) -> Result<Self, SessionError> {
        if let Some(word) = words.iter().find(|w| w.accepts.is_empty()) {
            return Err(SessionError::EmptyAccepts {
                id: word.id.clone(),
            });
        }
        let mut queue = WordQueue::new(words).ok_or(SessionError::EmptyWordList)?;
        if settings.shuffle {
            queue.shuffle();
        }
        let state = SessionState::new(queue.current(), settings.sample_interval);

        debug!(
            "new {} session over {} words",
            settings.mode,
            queue.len()
        );

        Ok(Self {
            settings,
            queue,
            state,
            phase: Phase::Idle,
        })
    }

    pub fn mode(&self) -> Mode {
        self.settings.mode
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn words(&self) -> &[WordItem] {
        self.queue.words()
    }

    pub fn current_word(&self) -> &WordItem {
        self.queue.current()
    }

    pub fn current_index(&self) -> usize {
        self.queue.index()
    }

    pub fn buffer(&self) -> &str {
        &self.state.buffer
    }

    pub fn active_variant(&self) -> &str {
        &self.current_word().accepts[self.state.variants.active()]
    }

    pub fn completed_count(&self) -> u32 {
        self.state.completed_count
    }

    /// Words left in a drill, `None` in endless mode.
    pub fn remaining_words(&self) -> Option<u32> {
        match self.settings.mode {
            Mode::Endless => None,
            Mode::Drill100 => Some(DRILL_WORD_COUNT.saturating_sub(self.state.completed_count)),
        }
    }

    pub fn is_error_flash(&self, now: SystemTime) -> bool {
        self.state.error_flash_until.is_some_and(|until| now < until)
    }

    pub fn live_metrics(&self, now: SystemTime) -> LiveMetrics {
        let metrics = &self.state.metrics;
        LiveMetrics {
            wpm: metrics.wpm(now),
            accuracy: metrics.accuracy(),
            elapsed: metrics.elapsed(now),
        }
    }

    pub fn render_view(&self, now: SystemTime) -> RenderView<'_> {
        RenderView {
            display: &self.current_word().display,
            active_variant: self.active_variant(),
            buffer_len: self.state.buffer.chars().count(),
            is_error_flash: self.is_error_flash(now),
        }
    }

    /// Applies the full input value after a change.
    pub fn apply_keystroke(&mut self, buffer: &str, now: SystemTime) -> KeystrokeOutcome {
        if self.phase.is_terminal() {
            return KeystrokeOutcome::Ignored;
        }
        if buffer == self.state.buffer {
            return KeystrokeOutcome::Unchanged;
        }

        let grew = buffer.chars().count() > self.state.buffer.chars().count();
        if grew && self.state.metrics.start_if_idle(now) {
            self.phase = Phase::Running;
            info!("session started");
        }

        let accepts = &self.queue.current().accepts;
        match self
            .state
            .variants
            .narrow(accepts, &self.state.buffer, buffer)
        {
            Match::Reject => {
                if grew {
                    self.state.metrics.record_miss();
                    self.state.error_flash_until = Some(now + self.settings.error_flash);
                    debug!("rejected {buffer:?}");
                }
                KeystrokeOutcome::Rejected { counted: grew }
            }
            Match::Advance { .. } => {
                if grew {
                    self.state.metrics.record_correct();
                }
                self.state.error_flash_until = None;
                self.state.buffer = buffer.to_string();
                KeystrokeOutcome::Advanced { counted: grew }
            }
            Match::Complete { variant } => {
                if grew {
                    self.state.metrics.record_correct();
                }
                debug!(
                    "completed {:?} as {:?}",
                    self.queue.current().display,
                    accepts[variant]
                );
                self.complete_word(now)
            }
        }
    }

    fn complete_word(&mut self, now: SystemTime) -> KeystrokeOutcome {
        self.state.error_flash_until = None;
        self.state.completed_count += 1;

        let next = self.queue.advance();
        self.state.buffer.clear();
        self.state.variants = VariantSet::new(next.accepts.len());

        if self.settings.mode == Mode::Drill100 && self.state.completed_count == DRILL_WORD_COUNT {
            return KeystrokeOutcome::Finished(self.finish(now));
        }
        KeystrokeOutcome::Completed
    }

    fn finish(&mut self, now: SystemTime) -> GameStats {
        self.phase = Phase::Finished;
        self.state.sampler.stop();

        let metrics = &self.state.metrics;
        let stats = GameStats {
            wpm: metrics.wpm(now),
            accuracy: metrics.accuracy(),
            elapsed_time: metrics.elapsed(now).as_secs_f64(),
            total_keystrokes: metrics.total_keystrokes(),
            correct_keystrokes: metrics.correct_keystrokes,
            missed_keystrokes: metrics.missed_keystrokes,
            words_completed: self.state.completed_count,
            history: self.state.history().to_vec(),
        };
        info!(
            "drill finished: {} wpm, {}% accuracy",
            stats.wpm, stats.accuracy
        );
        stats
    }

    /// Periodic tick; samples history while the session is running.
    pub fn apply_tick(&mut self, now: SystemTime) -> Option<HistoryPoint> {
        if self.phase != Phase::Running {
            return None;
        }
        self.state.sampler.on_tick(&self.state.metrics, now)
    }

    /// Ends the session at the user's request. No stats are produced.
    pub fn exit(&mut self) -> SessionSignal {
        if self.phase != Phase::Exited {
            info!(
                "session exited after {} words",
                self.state.completed_count
            );
            self.phase = Phase::Exited;
            self.state.sampler.stop();
        }
        SessionSignal::Exited
    }
}
