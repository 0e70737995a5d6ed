//! Interactive terminal interface for generating and debugging SmartPy
//! contracts. State lives in [`app::UiApp`]; rendering in [`view`] is a pure
//! function of that state.

pub mod app;
pub mod view;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::prelude::*;
use app::UiApp;

#[derive(Debug, clap::Args)]
pub struct UiOptions {
    /// Initial SmartPy IDE dialect. Toggle with F3 inside the interface.
    #[clap(long, value_enum, default_value = "modern")]
    pub dialect: crate::Dialect,
}

pub async fn run(options: UiOptions, global: crate::Global) -> Result<()> {
    let clipboard = crate::clipboard::create_clipboard();
    let mut app = UiApp::new(options.dialect.into(), global, clipboard);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app).await;

    // Restore the terminal before surfacing any loop error.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut UiApp,
) -> Result<()> {
    while app.running {
        terminal.draw(|frame| view::render(app, frame))?;

        app.poll_responses();
        app.tick();

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Paste(text) => app.handle_paste(&text),
                _ => {}
            }
        }
    }

    Ok(())
}
