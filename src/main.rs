use std::cell::Cell as StdCell;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use tabgrid::column::Column;
use tabgrid::engine::TableEngine;
use tabgrid::handlers::{
    handle_export_filename_mode, handle_export_format_mode, handle_mouse, handle_normal_mode,
    App, AppMode, KeyAction,
};
use tabgrid::loader;
use tabgrid::render;

/// Interactive terminal data grid: sort, resize, and select rows of a CSV.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// CSV file to view. Reads from stdin when omitted.
    file: Option<PathBuf>,
}

/// Initialize the terminal for TUI rendering.
/// Enables raw mode, enters alternate screen, and creates a Terminal instance.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
/// Disables raw mode and leaves alternate screen.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Load data before touching the terminal
    let (dataset, name) = match &cli.file {
        Some(path) => {
            let file = File::open(path)?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "table".to_string());
            (loader::load_csv(file), name)
        }
        None => {
            if io::stdin().is_terminal() {
                eprintln!("Error: no input. Pass a CSV file or pipe CSV on stdin.");
                eprintln!("Usage: tabgrid data.csv   or   some-command | tabgrid");
                std::process::exit(1);
            }
            (loader::load_csv(io::stdin().lock()), "stdin".to_string())
        }
    };
    let dataset = match dataset {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Selection column first, then one data column per CSV header
    let mut columns = vec![Column::selection()];
    columns.extend(loader::build_columns(&dataset));
    let mut engine = TableEngine::new(columns, |r: &loader::Record| r.id.clone());

    // Selection-count notifications surface in the status line
    let selection_note: Rc<StdCell<Option<usize>>> = Rc::new(StdCell::new(None));
    let note = Rc::clone(&selection_note);
    engine.on_selection_change(move |count| note.set(Some(count)));

    let mut app = App::new(engine, dataset.records, name);

    // Set up panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = init_terminal()?;
    let mut table_area = Rect::default();

    // Main event loop
    loop {
        if let Some(count) = selection_note.take() {
            app.status = Some(format!(
                "{} row{} selected",
                count,
                if count == 1 { "" } else { "s" }
            ));
        }
        app.refresh();

        terminal.draw(|frame| {
            let bottom = match app.mode {
                AppMode::Normal => 1,
                AppMode::ExportFormat | AppMode::ExportFilename => 3,
            };
            let chunks =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(bottom)])
                    .split(frame.area());
            table_area = chunks[0];

            render::render_grid(
                frame,
                chunks[0],
                &app.view,
                &app.name,
                (!app.view.empty).then_some(app.cursor_row),
                Some(app.cursor_col),
                app.engine.live_resize(),
            );

            match app.mode {
                AppMode::Normal => {
                    render::render_hint_bar(frame, chunks[1], app.status.as_deref())
                }
                AppMode::ExportFormat => render::render_format_prompt(frame, chunks[1]),
                AppMode::ExportFilename => {
                    render::render_input_bar(frame, chunks[1], &app.input_buffer)
                }
            }
        })?;

        // Poll with 250ms timeout for responsive feel
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let action = match event::read()? {
            Event::Key(key) => match app.mode {
                AppMode::Normal => handle_normal_mode(&key, &mut app),
                AppMode::ExportFormat => handle_export_format_mode(&key, &mut app),
                AppMode::ExportFilename => handle_export_filename_mode(&key, &mut app),
            },
            Event::Mouse(mouse) => handle_mouse(&mouse, &mut app, table_area),
            _ => KeyAction::None,
        };

        match action {
            KeyAction::None => {}
            KeyAction::Quit => break,
            KeyAction::StatusMessage(msg) => app.status = Some(msg),
            KeyAction::ModeChange(mode) => {
                app.mode = mode;
                app.status = None;
            }
        }
    }

    terminal.clear()?;
    restore_terminal(&mut terminal)?;
    Ok(())
}
