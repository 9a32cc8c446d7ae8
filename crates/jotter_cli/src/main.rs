//! Interactive terminal front-end.
//!
//! # Responsibility
//! - Drive the single notes screen from stdin lines.
//! - Re-render whenever the controller publishes a new list.
//!
//! # Invariants
//! - `/rm <n>` resolves row `n` of the last render to a note id before
//!   deleting, so a concurrent re-sort never hits the wrong note.

use anyhow::{Context, Result};
use jotter_core::{
    core_version, init_logging, runtime, store, AppConfig, NoteController, NoteId, NoteScreen,
    NotesSnapshot,
};
use log::info;
use parking_lot::Mutex;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

const HELP: &str = "type text + Enter to add | /rm <n> delete row n | /ls redraw | /quit";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Add(&'a str),
    Remove(usize),
    List,
    Quit,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    match trimmed.split_once(' ').unwrap_or((trimmed, "")) {
        ("/quit" | "/q", _) => Input::Quit,
        ("/ls", _) => Input::List,
        ("/rm", arg) => match arg.trim().parse::<usize>() {
            Ok(position) if position > 0 => Input::Remove(position),
            _ => Input::Unknown(trimmed),
        },
        (command, _) if command.starts_with('/') => Input::Unknown(trimmed),
        _ => Input::Add(line),
    }
}

struct Frontend {
    screen: Mutex<NoteScreen>,
    visible: Mutex<Vec<NoteId>>,
}

impl Frontend {
    fn render(&self, snapshot: &NotesSnapshot) {
        let screen = self.screen.lock();
        *self.visible.lock() = screen.rows(snapshot).iter().map(|row| row.key).collect();
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\n{}", screen.render(snapshot));
        let _ = stdout.flush();
    }
}

fn main() -> Result<()> {
    let config = AppConfig::resolve();
    if let Err(err) = init_logging(&config.log_level, &config.log_dir.display().to_string()) {
        eprintln!("logging disabled: {err}");
    }

    let store = store::initialize(&config.db_path).with_context(|| {
        format!("failed to open note store at {}", config.db_path.display())
    })?;
    let handle = runtime::handle().context("failed to start background runtime")?;
    let controller = NoteController::new(store, &handle);
    info!("event=cli_start module=cli status=ok version={}", core_version());

    let frontend = Arc::new(Frontend {
        screen: Mutex::new(NoteScreen::new()),
        visible: Mutex::new(Vec::new()),
    });
    let _observer = {
        let frontend = Arc::clone(&frontend);
        controller.on_change(move |snapshot| frontend.render(snapshot))
    };

    println!("jotter {} ({})", core_version(), HELP);
    frontend.render(&controller.current_notes());

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        match parse_input(&line) {
            Input::Quit => break,
            Input::List => frontend.render(&controller.current_notes()),
            Input::Add(text) => {
                let mut screen = frontend.screen.lock();
                screen.set_input(text);
                if !screen.submit(&controller) {
                    screen.set_input("");
                }
            }
            Input::Remove(position) => {
                let key = frontend.visible.lock().get(position - 1).copied();
                match key {
                    Some(key) => {
                        let snapshot = controller.current_notes();
                        frontend.screen.lock().delete_row(&controller, &snapshot, key);
                    }
                    None => eprintln!("no row {position}"),
                }
            }
            Input::Unknown(command) => eprintln!("unknown command `{command}`; {HELP}"),
        }
    }

    handle.block_on(controller.shutdown());
    info!("event=cli_stop module=cli status=ok");
    Ok(())
}
