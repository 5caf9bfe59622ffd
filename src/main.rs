//! spyglass: A scroll-spy reader for long-form articles.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use spyglass::{app_state, config, formats, input, logging, ui};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "spyglass")]
#[command(about = "Scroll-spy section navigation for long-form articles", long_about = None)]
struct Args {
    /// Article files or directories of articles
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// File extensions to match
    #[arg(long, short = 'e', value_name = "EXT")]
    ext: Vec<String>,

    /// Fraction of a section that must be visible before it becomes active
    #[arg(long, short = 't', value_name = "FRACTION")]
    threshold: Option<f64>,

    /// Print the section outline of every page as JSON and exit
    #[arg(long)]
    outline: bool,

    /// Append logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut cfg = config::Config::load();

    // Override config with command line args
    if !args.ext.is_empty() {
        cfg.file_extensions = args.ext;
    }
    if let Some(threshold) = args.threshold {
        cfg.threshold = threshold;
    }

    let log_file = args
        .log_file
        .or_else(|| (!cfg.log_file.is_empty()).then(|| PathBuf::from(&cfg.log_file)));
    logging::init(&cfg.log_level, log_file.as_deref())?;

    let documents = input::find_documents(args.paths, &cfg.file_extensions)?;
    let pages = input::load_articles(&documents, &formats::markdown::MarkdownFormat, &cfg);

    if pages.is_empty() {
        eprintln!("No articles with sections found");
        return Ok(());
    }

    if args.outline {
        let outlines: Vec<_> = pages.iter().map(spyglass::section::Article::outline).collect();
        let json = serde_json::to_string_pretty(&outlines).map_err(io::Error::other)?;
        println!("{json}");
        return Ok(());
    }

    let mut state = app_state::AppState::new(pages, &cfg);
    if state.file_mode == app_state::FileMode::Single {
        state.open_page(0)?;
    }

    info!(pages = state.pages.len(), "starting reader");
    run_tui(state, &cfg)
}

fn run_tui(mut app: app_state::AppState, cfg: &config::Config) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, cfg);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut app_state::AppState,
    cfg: &config::Config,
) -> io::Result<()> {
    let frame = Duration::from_millis(cfg.tick_ms.max(1));

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(frame)? {
            app.tick();
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let quit = match app.current_view {
                app_state::View::PageList => handle_page_list_key(app, key)?,
                app_state::View::Article => handle_article_key(app, key),
            };
            if quit {
                return Ok(());
            }
        }
    }
}

/// Returns whether the reader should exit.
fn handle_page_list_key(app: &mut app_state::AppState, key: KeyEvent) -> io::Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_page(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_page(),
        KeyCode::Enter => {
            if let Err(e) = app.open_page(app.current_page_index) {
                app.message = Some(format!("Cannot open page: {e}"));
            }
        }
        _ => {}
    }
    Ok(false)
}

/// Returns whether the reader should exit.
fn handle_article_key(app: &mut app_state::AppState, key: KeyEvent) -> bool {
    app.message = None;

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            if app.file_mode == app_state::FileMode::Multi {
                app.close_page();
            } else {
                return true;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.scroll_lines(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_lines(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Home | KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.scroll_to_bottom(),
        KeyCode::BackTab | KeyCode::Char('p') => app.go_to_previous_section(),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
            app.go_to_previous_section();
        }
        KeyCode::Tab | KeyCode::Char('n') => app.go_to_next_section(),
        KeyCode::Char(']') => app.focus_next(),
        KeyCode::Char('[') => app.focus_previous(),
        KeyCode::Enter => app.go_to_focused(),
        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
            if let Some(n) = c.to_digit(10).and_then(|n| usize::try_from(n).ok()) {
                app.go_to_section_number(n);
            }
        }
        _ => {}
    }
    false
}
