use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, SystemTime},
};
use typeflow::{
    app::{App, ExitType},
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    session::Mode,
    word::{builtin_word_list, load_word_list, WordItem, WordListError},
};

/// typing trainer for words with more than one correct spelling
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A typing trainer for words that can be typed more than one way (shi/si/ci). The guide follows whichever spelling you choose, and a 100 word drill ends with wpm, accuracy and a wpm history."
)]
pub struct Cli {
    /// session mode
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// JSON word list produced by a word-list generator
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// built-in word list to practice
    #[clap(short = 'l', long, value_enum)]
    list: Option<BuiltinList>,

    /// shuffle the word list before starting
    #[clap(long, num_args = 0..=1, default_missing_value = "true")]
    shuffle: Option<bool>,

    /// print the final stats of a finished drill as JSON on exit
    #[clap(long)]
    json: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BuiltinList {
    Kana,
    English,
}

impl Cli {
    /// Overlays the command line on the saved settings.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(list) = self.list {
            config.builtin_list = list.to_string();
            config.word_list = None;
        }
        if let Some(file) = &self.file {
            config.word_list = Some(file.clone());
        }
        if let Some(shuffle) = self.shuffle {
            config.shuffle = shuffle;
        }
        config
    }
}

fn load_words(config: &Config) -> Result<Vec<WordItem>, WordListError> {
    match &config.word_list {
        Some(path) => load_word_list(path),
        None => builtin_word_list(&config.builtin_list),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());

    let words = match load_words(&config) {
        Ok(words) => words,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
    };
    let mut app = App::new(words, config.session_settings())?;

    if let Err(err) = store.save(&config) {
        log::warn!("unable to save config to {}: {err}", store.path().display());
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, config.tick_rate());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result?;

    if cli.json {
        if let Some(stats) = app.final_stats() {
            println!("{}", serde_json::to_string_pretty(stats)?);
        }
    }

    Ok(())
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(tick_rate));

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match app.handle_event(runner.step(), SystemTime::now()) {
            Some(ExitType::Restart) => app.reset()?,
            Some(ExitType::Quit) => break,
            None => {}
        }
    }

    Ok(())
}
