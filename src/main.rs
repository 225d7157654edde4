mod ui;

use std::{
    collections::HashMap,
    error::Error,
    fs,
    io::{self, stdin},
    path::{Path, PathBuf},
};

use chrono::{Local, Utc};
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use glance::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    library::{
        headword, DefinitionLookup, Glossary, JsonLibraryStore, LibraryItem, Repository,
        VocabularyEntry,
    },
    pacing::{PacingController, PacingEvent, PlayState, ReadingMode, ReadingSettings},
    retention::{
        describe_next_review, mastery_breakdown, Rating, ReviewSession, MAX_PROFICIENCY,
    },
    runtime::{CrosstermEventSource, FixedTicker, ReaderEvent, Runner},
    session::{SessionRecord, SessionRecorder, SessionSummary},
    stats::ReadingStatsDb,
    time_series::TimeSeriesPoint,
    tokenizer::{context_window, tokenize},
    util::percent,
    GlanceError,
};
use log::{info, warn, LevelFilter};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use uuid::Uuid;

use crate::ui::screen::current_screen;

/// wpm change per arrow key press
const WPM_STEP: u32 = 25;

/// rsvp speed reader with spaced-repetition vocabulary review
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Read text files one word (or chunk) at a time with punctuation-aware pacing, save unfamiliar words while reading and review them on a spaced-repetition schedule."
)]
pub struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// read a text file, resuming where you left off
    Read(ReadArgs),
    /// add a text file to the library without reading it
    Add {
        file: PathBuf,
        /// title shown in the library (defaults to the file name)
        #[clap(short = 't', long)]
        title: Option<String>,
    },
    /// list the library with reading progress
    List,
    /// review saved words that are due
    Review,
    /// print reading statistics
    Stats {
        /// also export every recorded session to this csv file
        #[clap(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
struct ReadArgs {
    file: PathBuf,

    /// words per minute
    #[clap(short = 'w', long)]
    wpm: Option<u32>,

    /// how words are presented
    #[clap(short = 'm', long, value_enum)]
    mode: Option<ReadingMode>,

    /// words per step in chunk mode
    #[clap(short = 'c', long)]
    chunk_size: Option<usize>,

    /// bold the leading part of each word
    #[clap(long)]
    emphasis: bool,

    /// title shown in the library (defaults to the file name)
    #[clap(short = 't', long)]
    title: Option<String>,

    /// json file of `word -> {definition, examples}` used when saving words
    #[clap(short = 'g', long)]
    glossary: Option<PathBuf>,

    /// store these reading settings as the new defaults
    #[clap(long)]
    save: bool,
}

impl ReadArgs {
    /// Stored config with the flags of this run on top
    fn apply_to(&self, config: Config) -> Config {
        Config {
            wpm: self.wpm.unwrap_or(config.wpm),
            mode: self.mode.unwrap_or(config.mode),
            chunk_size: self.chunk_size.unwrap_or(config.chunk_size),
            emphasis: self.emphasis || config.emphasis,
            ..config
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Reading,
    Results,
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// A text being read and its playback
#[derive(Debug)]
pub struct ReadingView {
    pub item: LibraryItem,
    pub controller: PacingController,
    pub history: Vec<TimeSeriesPoint>,
    pub last_summary: Option<SessionSummary>,
}

/// Due words across the library, walked one at a time
#[derive(Debug)]
pub struct ReviewView {
    pub session: ReviewSession,
    pub revealed: bool,
    pub mastery: [usize; MAX_PROFICIENCY as usize + 1],
    /// Library item owning each queued entry
    owners: HashMap<Uuid, Uuid>,
}

#[derive(Debug)]
pub enum Activity {
    Reading(Box<ReadingView>),
    Review(ReviewView),
}

#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub activity: Activity,
    pub config: Config,
    /// One-line feedback shown in the footer
    pub status: Option<String>,
    library: JsonLibraryStore,
    stats_db: Option<ReadingStatsDb>,
    glossary: Glossary,
}

impl App {
    pub fn reading(
        item: LibraryItem,
        config: Config,
        library: JsonLibraryStore,
        stats_db: Option<ReadingStatsDb>,
        glossary: Glossary,
    ) -> Result<Self, GlanceError> {
        let tokens = tokenize(&item.content);
        // a finished text starts over
        let start = if item.last_position + 1 >= tokens.len() {
            0
        } else {
            item.last_position
        };
        let settings = config.reading_settings()?;
        let controller = PacingController::new(tokens, settings)?.at_position(start);
        let history = TimeSeriesPoint::from_sessions(&item.sessions);

        Ok(Self {
            state: AppState::Reading,
            activity: Activity::Reading(Box::new(ReadingView {
                item,
                controller,
                history,
                last_summary: None,
            })),
            config,
            status: None,
            library,
            stats_db,
            glossary,
        })
    }

    pub fn review(config: Config, library: JsonLibraryStore) -> Result<Self, GlanceError> {
        let owned = library.all_vocabulary()?;
        let owners = owned.iter().map(|(item, e)| (e.id, *item)).collect();
        let entries: Vec<VocabularyEntry> = owned.into_iter().map(|(_, e)| e).collect();

        Ok(Self {
            state: AppState::Review,
            activity: Activity::Review(ReviewView {
                session: ReviewSession::new(&entries, Utc::now()),
                revealed: false,
                mastery: mastery_breakdown(&entries),
                owners,
            }),
            config,
            status: None,
            library,
            stats_db: None,
            glossary: Glossary::default(),
        })
    }

    /// Fire any due advance. Returns true when the screen needs redrawing.
    fn on_tick(&mut self) -> bool {
        let Activity::Reading(view) = &mut self.activity else {
            return false;
        };
        match view.controller.poll() {
            Some(event) => {
                self.on_pacing_event(event);
                true
            }
            None => false,
        }
    }

    fn on_pacing_event(&mut self, event: PacingEvent) {
        let PacingEvent::SessionEnded(summary) = event else {
            return;
        };
        let Activity::Reading(view) = &mut self.activity else {
            return;
        };

        let record = SessionRecord::from_summary(&summary, Utc::now());
        if let Err(e) = self.library.append_session(view.item.id, record.clone()) {
            warn!("could not store session in library: {e}");
        }
        if let Some(db) = self.stats_db.as_mut() {
            if let Err(e) = db.record(Some(view.item.id), &record) {
                warn!("could not record session: {e}");
            }
        }
        view.item.sessions.push(record);
        view.history = TimeSeriesPoint::from_sessions(&view.item.sessions);
        view.last_summary = Some(summary);
        self.state = AppState::Results;
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        // ctrl+c to quit
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
            return Flow::Quit;
        }

        self.status = None;
        match self.state {
            AppState::Reading => self.on_reading_key(key),
            AppState::Results => {
                if key.code == KeyCode::Char('r') {
                    if let Activity::Reading(view) = &mut self.activity {
                        view.controller.reset();
                    }
                    self.state = AppState::Reading;
                }
            }
            AppState::Review => self.on_review_key(key),
        }
        Flow::Continue
    }

    fn on_reading_key(&mut self, key: KeyEvent) {
        let Activity::Reading(view) = &mut self.activity else {
            return;
        };
        let controller = &mut view.controller;

        match key.code {
            KeyCode::Char(' ') => controller.toggle(),
            KeyCode::Left => {
                controller.seek_by(-1);
            }
            KeyCode::Right => {
                controller.seek_by(1);
            }
            KeyCode::Up => self.change_wpm(|wpm| wpm.saturating_add(WPM_STEP)),
            KeyCode::Down => self.change_wpm(|wpm| wpm.saturating_sub(WPM_STEP)),
            KeyCode::Char('c') => match controller.play_state() {
                PlayState::ContextView => controller.exit_context(),
                _ => controller.enter_context(),
            },
            KeyCode::Char('s') if controller.play_state() == PlayState::ContextView => {
                self.save_current_word()
            }
            KeyCode::Char('e') => self.config.emphasis = !self.config.emphasis,
            KeyCode::Char('r') if controller.is_finished() => controller.reset(),
            _ => {}
        }
    }

    fn change_wpm(&mut self, change: impl Fn(u32) -> u32) {
        let Activity::Reading(view) = &mut self.activity else {
            return;
        };
        let current = *view.controller.settings();
        let settings = ReadingSettings {
            wpm: change(current.wpm),
            ..current
        };
        match view.controller.apply_settings(settings) {
            Ok(()) => {
                self.config = self.config.clone().with_settings(&settings);
                self.status = Some(format!("{} wpm", settings.wpm));
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// Save the word under the cursor to the item's vocabulary.
    ///
    /// A word missing from the glossary is still saved, with an empty
    /// definition and the reading context as its only example.
    fn save_current_word(&mut self) {
        let Activity::Reading(view) = &mut self.activity else {
            return;
        };
        let position = view.controller.position();
        let Some(token) = view.controller.current_token() else {
            return;
        };
        let word = headword(&token.text).to_string();
        if word.is_empty() {
            self.status = Some("nothing to save here".to_string());
            return;
        }
        let key = word.to_lowercase();
        if view
            .item
            .vocabulary
            .iter()
            .any(|e| e.word.to_lowercase() == key)
        {
            self.status = Some(format!("'{word}' is already saved"));
            return;
        }

        let context = context_window(
            view.controller.tokens(),
            position,
            self.config.context_radius,
        );
        let (definition, examples) = match self.glossary.define(&word, &context) {
            Ok(found) => (found.definition, found.examples),
            Err(_) => (String::new(), vec![context]),
        };
        let entry = VocabularyEntry::new(word.clone(), definition, examples, Utc::now());

        match self.library.add_vocabulary(view.item.id, entry.clone()) {
            Ok(()) => {
                info!("saved {word:?} from {:?}", view.item.title);
                view.item.vocabulary.push(entry);
                self.status = Some(format!("saved '{word}'"));
            }
            Err(e) => self.status = Some(format!("could not save '{word}': {e}")),
        }
    }

    fn on_review_key(&mut self, key: KeyEvent) {
        let Activity::Review(view) = &mut self.activity else {
            return;
        };

        let rating = match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                view.revealed = true;
                return;
            }
            KeyCode::Char('n') => {
                view.session.skip();
                view.revealed = false;
                return;
            }
            KeyCode::Char('1') => Rating::Hard,
            KeyCode::Char('2') => Rating::Good,
            KeyCode::Char('3') => Rating::Easy,
            _ => return,
        };

        let Some(graded) = view.session.answer(rating, Utc::now()) else {
            return;
        };
        view.revealed = false;
        let Some(&owner) = view.owners.get(&graded.id) else {
            warn!("no library item owns {:?}", graded.word);
            return;
        };
        self.status = match self.library.replace_vocabulary_entry(owner, graded.clone()) {
            Ok(()) => Some(format!(
                "{}: {rating}, due {}",
                graded.word,
                describe_next_review(&graded, Utc::now())
            )),
            Err(e) => Some(format!("could not save review of '{}': {e}", graded.word)),
        };
        if let Ok(owned) = self.library.all_vocabulary() {
            let entries: Vec<VocabularyEntry> = owned.into_iter().map(|(_, e)| e).collect();
            view.mastery = mastery_breakdown(&entries);
        }
    }

    /// Persist the reading position before the process exits
    fn shutdown(&self) {
        if let Activity::Reading(view) = &self.activity {
            if let Err(e) = self
                .library
                .save_position(view.item.id, view.controller.position())
            {
                warn!("could not save reading position: {e}");
            }
        }
    }
}

fn library_store() -> Result<JsonLibraryStore, GlanceError> {
    AppDirs::library_path()
        .map(JsonLibraryStore::with_path)
        .ok_or(GlanceError::NoStateDir)
}

/// Append-mode log file, creating its directory when missing
fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::OpenOptions::new().append(true).create(true).open(path)
}

// stderr belongs to the terminal UI, so logs go to a file or nowhere
fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    match AppDirs::log_path().map(|path| open_log_file(&path)) {
        Some(Ok(file)) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        _ => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.init();
}

/// Find the library item imported from `file`, importing it when new
fn import_file(
    library: &JsonLibraryStore,
    file: &Path,
    title: Option<String>,
) -> Result<LibraryItem, GlanceError> {
    let source = fs::canonicalize(file)?;
    if let Some(existing) = library
        .load_library()?
        .into_iter()
        .find(|item| item.source.as_deref() == Some(source.as_path()))
    {
        return Ok(existing);
    }

    let content = fs::read_to_string(&source)?;
    let title = title.unwrap_or_else(|| {
        source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string())
    });
    let item = LibraryItem::from_file(title, source, content);
    library.add_item(item.clone())?;
    info!("imported {:?} ({} words)", item.title, item.word_count());
    Ok(item)
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Add { file, title } => {
            let item = import_file(&library_store()?, &file, title)?;
            println!("{}  {}  {} words", item.id, item.title, item.word_count());
        }
        Command::List => print_library(&library_store()?)?,
        Command::Stats { csv } => print_stats(&library_store()?, csv.as_deref())?,
        Command::Read(args) => {
            require_tty();
            let store = FileConfigStore::new();
            let config = args.apply_to(store.load());
            config.validate()?;
            if args.save {
                store.save(&config)?;
            }

            let library = library_store()?;
            let item = import_file(&library, &args.file, args.title.clone())?;
            let glossary = match &args.glossary {
                Some(path) => Glossary::from_file(path)?,
                None => Glossary::default(),
            };
            let stats_db = ReadingStatsDb::new()
                .map_err(|e| warn!("session log unavailable: {e}"))
                .ok();

            let mut app = App::reading(item, config, library, stats_db, glossary)?;
            run_tui(&mut app)?;
        }
        Command::Review => {
            require_tty();
            let mut app = App::review(FileConfigStore::new().load(), library_store()?)?;
            run_tui(&mut app)?;
        }
    }

    Ok(())
}

fn require_tty() {
    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }
}

fn print_library(library: &JsonLibraryStore) -> Result<(), GlanceError> {
    let items = library.load_library()?;
    if items.is_empty() {
        println!("library is empty, add a text with `glance add <FILE>`");
        return Ok(());
    }

    let now = Utc::now();
    for item in items {
        let due = item.vocabulary.iter().filter(|e| e.is_due(now)).count();
        println!(
            "{:>3}%  {:<32}  {:>6} words  {} saved ({} due)",
            percent(item.progress(), 1.0),
            item.title,
            item.word_count(),
            item.vocabulary.len(),
            due
        );
    }
    Ok(())
}

fn print_stats(library: &JsonLibraryStore, csv: Option<&Path>) -> Result<(), GlanceError> {
    let db = ReadingStatsDb::new()?;
    let summary = db.summary()?;
    let streak = db.streak(Local::now().date_naive())?;
    let vocabulary = library.all_vocabulary()?;
    let now = Utc::now();
    let due = vocabulary.iter().filter(|(_, e)| e.is_due(now)).count();

    println!("sessions     {}", summary.sessions);
    println!("words read   {}", summary.total_words);
    println!("time         {:.0} min", summary.total_secs / 60.0);
    println!(
        "average      {:.0} wpm (sd {:.1})",
        summary.average_wpm, summary.wpm_std_dev
    );
    println!("streak       {streak} days");
    println!("vocabulary   {} words, {due} due", vocabulary.len());

    if let Some(path) = csv {
        let rows = db.export_csv(path)?;
        println!("exported {rows} sessions to {}", path.display());
    }
    Ok(())
}

fn run_tui(app: &mut App) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, app);
    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            ReaderEvent::Tick => {
                if app.on_tick() {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            ReaderEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            ReaderEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    current_screen(&app.state).render(app, f);
}
