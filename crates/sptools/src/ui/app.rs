//! Terminal application state. Holds the two core flows plus
//! presentation-only state (active tab, scroll offsets, flash message) and
//! dispatches model calls onto background tasks.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use sptools_core::extract::extract_python_block;
use sptools_core::flow::{DebugField, DebuggerFlow, GeneratorFlow, RequestId};
use sptools_core::prompt::{build_debug_prompt, build_generation_prompt};
use sptools_core::types::{DebugReport, DebugRequest, Dialect, GenerationRequest};

use crate::clipboard::ClipboardProvider;
use crate::gemini::{GeminiClient, GeminiConfig, DEBUG_SAMPLING, GENERATION_SAMPLING};
use crate::prelude::*;

/// Seconds a flash message stays on screen.
const FLASH_SECONDS: u64 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Generator,
    Debugger,
}

impl Tab {
    pub fn index(&self) -> usize {
        match self {
            Tab::Generator => 0,
            Tab::Debugger => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Generator => "Generator",
            Tab::Debugger => "Debugger",
        }
    }
}

/// Transient status line shown in the footer until it expires.
#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub text: String,
    pub is_error: bool,
    created: Instant,
}

impl FlashMessage {
    pub fn new(text: String, is_error: bool) -> Self {
        Self {
            text,
            is_error,
            created: Instant::now(),
        }
    }

    pub fn is_expired(&self, seconds: u64) -> bool {
        self.created.elapsed() >= Duration::from_secs(seconds)
    }
}

/// Outcome of one background model call, tagged with the ticket it answers.
pub enum Completion {
    Generation(RequestId, Result<String, String>),
    Debugging(RequestId, Result<DebugReport, String>),
}

pub struct UiApp {
    pub running: bool,
    pub tab: Tab,
    pub dialect: Dialect,
    pub generator: GeneratorFlow,
    pub debugger: DebuggerFlow,
    pub debug_field: DebugField,
    pub generator_scroll: usize,
    pub debugger_scroll: usize,
    pub spinner_frame: usize,
    pub flash_message: Option<FlashMessage>,
    global: crate::Global,
    clipboard: Box<dyn ClipboardProvider>,
    tx: mpsc::Sender<Completion>,
    rx: mpsc::Receiver<Completion>,
}

impl UiApp {
    pub fn new(
        dialect: Dialect,
        global: crate::Global,
        clipboard: Box<dyn ClipboardProvider>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();

        Self {
            running: true,
            tab: Tab::default(),
            dialect,
            generator: GeneratorFlow::default(),
            debugger: DebuggerFlow::default(),
            debug_field: DebugField::default(),
            generator_scroll: 0,
            debugger_scroll: 0,
            spinner_frame: 0,
            flash_message: None,
            global,
            clipboard,
            tx,
            rx,
        }
    }

    /// Drains completed background calls into the flows. Stale completions
    /// are discarded by the flow's ticket check.
    pub fn poll_responses(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(Completion::Generation(id, outcome)) => {
                    if self.generator.resolve(id, outcome) {
                        self.generator_scroll = 0;
                    }
                }
                Ok(Completion::Debugging(id, outcome)) => {
                    if self.debugger.resolve(id, outcome) {
                        self.debugger_scroll = 0;
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Advances the spinner and expires the flash message. Called once per
    /// draw cycle.
    pub fn tick(&mut self) {
        if self.generator.is_pending() || self.debugger.is_pending() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }

        if let Some(flash) = &self.flash_message {
            if flash.is_expired(FLASH_SECONDS) {
                self.flash_message = None;
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.running = false;
                    return;
                }
                KeyCode::Char('g') => {
                    self.submit_active();
                    return;
                }
                KeyCode::Char('y') => {
                    self.copy_active();
                    return;
                }
                KeyCode::Char('a') => {
                    if self.tab == Tab::Debugger {
                        self.apply_correction();
                    }
                    return;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::F(1) => {
                self.tab = Tab::Generator;
                return;
            }
            KeyCode::F(2) => {
                self.tab = Tab::Debugger;
                return;
            }
            KeyCode::F(3) => {
                self.dialect = self.dialect.toggled();
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::Generator => self.handle_generator_key(key),
            Tab::Debugger => self.handle_debugger_key(key),
        }
    }

    fn handle_generator_key(&mut self, key: KeyEvent) {
        if self.generator.is_pending() {
            if key.code == KeyCode::Esc {
                self.generator.abandon();
            }
            return;
        }

        match key.code {
            KeyCode::Char(c) => self.generator.push_char(c),
            KeyCode::Enter => self.generator.push_char('\n'),
            KeyCode::Backspace => self.generator.backspace(),
            KeyCode::Up => self.generator_scroll = self.generator_scroll.saturating_sub(1),
            KeyCode::Down => self.generator_scroll = self.generator_scroll.saturating_add(1),
            KeyCode::PageUp => self.generator_scroll = self.generator_scroll.saturating_sub(10),
            KeyCode::PageDown => self.generator_scroll = self.generator_scroll.saturating_add(10),
            _ => {}
        }
    }

    fn handle_debugger_key(&mut self, key: KeyEvent) {
        if self.debugger.is_pending() {
            if key.code == KeyCode::Esc {
                self.debugger.abandon();
            }
            return;
        }

        match key.code {
            // Two fields, so next() also serves as previous.
            KeyCode::Tab | KeyCode::BackTab => self.debug_field = self.debug_field.next(),
            KeyCode::Char(c) => self.debugger.push_char(self.debug_field, c),
            KeyCode::Enter => self.debugger.push_char(self.debug_field, '\n'),
            KeyCode::Backspace => self.debugger.backspace(self.debug_field),
            KeyCode::Up => self.debugger_scroll = self.debugger_scroll.saturating_sub(1),
            KeyCode::Down => self.debugger_scroll = self.debugger_scroll.saturating_add(1),
            KeyCode::PageUp => self.debugger_scroll = self.debugger_scroll.saturating_sub(10),
            KeyCode::PageDown => self.debugger_scroll = self.debugger_scroll.saturating_add(10),
            _ => {}
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        // Bracketed paste delivers newlines as carriage returns in raw mode.
        let text = text.replace('\r', "\n");

        match self.tab {
            Tab::Generator => {
                if !self.generator.is_pending() {
                    self.generator.append(&text);
                }
            }
            Tab::Debugger => {
                if !self.debugger.is_pending() {
                    self.debugger.append(self.debug_field, &text);
                }
            }
        }
    }

    fn submit_active(&mut self) {
        match self.tab {
            Tab::Generator => {
                let Some(id) = self.generator.submit() else {
                    return;
                };

                let request = GenerationRequest {
                    description: self.generator.description().to_string(),
                    dialect: self.dialect,
                };
                let tx = self.tx.clone();
                let base_url = self.global.base_url.clone();
                let model = self.global.model.clone();

                tokio::spawn(async move {
                    let outcome = match run_generation(request, base_url, model).await {
                        Ok(code) => Ok(code),
                        Err(err) => {
                            log::error!("Error generating contract: {err}");
                            Err(err.generation_message())
                        }
                    };
                    let _ = tx.send(Completion::Generation(id, outcome));
                });
            }
            Tab::Debugger => {
                let Some(id) = self.debugger.submit() else {
                    return;
                };

                let request = DebugRequest {
                    contract_code: self.debugger.contract_code().to_string(),
                    error_message: self.debugger.error_message().to_string(),
                    dialect: self.dialect,
                };
                let tx = self.tx.clone();
                let base_url = self.global.base_url.clone();
                let model = self.global.model.clone();

                tokio::spawn(async move {
                    let outcome = match run_debugging(request, base_url, model).await {
                        Ok(report) => Ok(report),
                        Err(err) => {
                            log::error!("Error debugging contract: {err}");
                            Err(err.debugging_message())
                        }
                    };
                    let _ = tx.send(Completion::Debugging(id, outcome));
                });
            }
        }
    }

    /// Text that Ctrl+Y places on the clipboard for the active tab. The
    /// debugger prefers the corrected code once a report is showing.
    fn copy_payload(&self) -> Option<String> {
        match self.tab {
            Tab::Generator => self
                .generator
                .generated_code()
                .map(|code| extract_python_block(code).unwrap_or_else(|| code.to_string())),
            Tab::Debugger => {
                if let Some(report) = self.debugger.report() {
                    Some(report.corrected_code.clone())
                } else if !self.debugger.contract_code().is_empty() {
                    Some(self.debugger.contract_code().to_string())
                } else {
                    None
                }
            }
        }
    }

    fn copy_active(&mut self) {
        let Some(text) = self.copy_payload() else {
            return;
        };

        match self.clipboard.set_text(&text) {
            Ok(()) => self.show_flash("Copied!", false),
            Err(err) => self.show_flash(&f!("Copy failed: {err}"), true),
        }
    }

    fn apply_correction(&mut self) {
        if self.debugger.apply_correction() {
            self.debugger_scroll = 0;
            self.show_flash("Correction applied", false);
        }
    }

    fn show_flash(&mut self, text: &str, is_error: bool) {
        self.flash_message = Some(FlashMessage::new(text.to_string(), is_error));
    }
}

async fn run_generation(
    request: GenerationRequest,
    base_url: Option<String>,
    model: Option<String>,
) -> Result<String, Error> {
    let config = GeminiConfig::from_env()?.with_overrides(base_url, model);
    let client = GeminiClient::new(config)?;
    let prompt = build_generation_prompt(&request);

    client.generate(&prompt, GENERATION_SAMPLING).await
}

async fn run_debugging(
    request: DebugRequest,
    base_url: Option<String>,
    model: Option<String>,
) -> Result<DebugReport, Error> {
    let config = GeminiConfig::from_env()?.with_overrides(base_url, model);
    let client = GeminiClient::new(config)?;
    let prompt = build_debug_prompt(&request);

    client.debug(&prompt, DEBUG_SAMPLING).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::TestClipboard;
    use sptools_core::flow::{EMPTY_DESCRIPTION_MESSAGE, MISSING_DEBUG_INPUT_MESSAGE};

    fn test_global() -> crate::Global {
        crate::Global {
            model: None,
            base_url: None,
            verbose: false,
        }
    }

    fn test_app() -> UiApp {
        UiApp::new(
            Dialect::Modern,
            test_global(),
            Box::new(TestClipboard::default()),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_function_keys_switch_tabs() {
        let mut app = test_app();
        assert_eq!(app.tab, Tab::Generator);

        app.handle_key_event(key(KeyCode::F(2)));
        assert_eq!(app.tab, Tab::Debugger);

        app.handle_key_event(key(KeyCode::F(1)));
        assert_eq!(app.tab, Tab::Generator);
    }

    #[test]
    fn test_f3_toggles_dialect() {
        let mut app = test_app();
        assert_eq!(app.dialect, Dialect::Modern);

        app.handle_key_event(key(KeyCode::F(3)));
        assert_eq!(app.dialect, Dialect::Legacy);

        app.handle_key_event(key(KeyCode::F(3)));
        assert_eq!(app.dialect, Dialect::Modern);
    }

    #[test]
    fn test_typing_edits_the_generator_description() {
        let mut app = test_app();

        app.handle_key_event(key(KeyCode::Char('h')));
        app.handle_key_event(key(KeyCode::Char('i')));
        assert_eq!(app.generator.description(), "hi");

        app.handle_key_event(key(KeyCode::Backspace));
        assert_eq!(app.generator.description(), "h");
    }

    #[test]
    fn test_tab_cycles_the_debugger_field() {
        let mut app = test_app();
        app.tab = Tab::Debugger;

        app.handle_key_event(key(KeyCode::Char('x')));
        assert_eq!(app.debugger.contract_code(), "x");

        app.handle_key_event(key(KeyCode::Tab));
        app.handle_key_event(key(KeyCode::Char('y')));
        assert_eq!(app.debugger.error_message(), "y");

        app.handle_key_event(key(KeyCode::BackTab));
        app.handle_key_event(key(KeyCode::Char('z')));
        assert_eq!(app.debugger.contract_code(), "xz");
    }

    #[test]
    fn test_blank_generator_submit_reports_validation_without_dispatch() {
        let mut app = test_app();

        app.handle_key_event(ctrl('g'));

        assert!(!app.generator.is_pending());
        assert_eq!(app.generator.error(), Some(EMPTY_DESCRIPTION_MESSAGE));
    }

    #[test]
    fn test_blank_debugger_submit_reports_validation_without_dispatch() {
        let mut app = test_app();
        app.tab = Tab::Debugger;
        app.handle_key_event(key(KeyCode::Char('c')));

        app.handle_key_event(ctrl('g'));

        assert!(!app.debugger.is_pending());
        assert_eq!(app.debugger.error(), Some(MISSING_DEBUG_INPUT_MESSAGE));
    }

    #[test]
    fn test_escape_abandons_a_pending_generation() {
        let mut app = test_app();
        app.generator.append("a token contract");
        let id = app.generator.submit().unwrap();

        app.handle_key_event(key(KeyCode::Esc));
        assert!(!app.generator.is_pending());

        // The late completion must be ignored.
        app.tx
            .send(Completion::Generation(id, Ok("import smartpy as sp".to_string())))
            .unwrap();
        app.poll_responses();
        assert_eq!(app.generator.generated_code(), None);
    }

    #[test]
    fn test_poll_responses_resolves_the_matching_ticket() {
        let mut app = test_app();
        app.generator.append("a token contract");
        let id = app.generator.submit().unwrap();
        app.generator_scroll = 7;

        app.tx
            .send(Completion::Generation(id, Ok("import smartpy as sp".to_string())))
            .unwrap();
        app.poll_responses();

        assert_eq!(app.generator.generated_code(), Some("import smartpy as sp"));
        assert_eq!(app.generator_scroll, 0);
    }

    #[test]
    fn test_copy_payload_extracts_the_python_block() {
        let mut app = test_app();
        app.generator.append("a token contract");
        let id = app.generator.submit().unwrap();
        app.generator
            .resolve(id, Ok("intro\n```python\nimport smartpy as sp\n```".to_string()));

        assert_eq!(app.copy_payload(), Some("import smartpy as sp".to_string()));
    }

    #[test]
    fn test_copy_payload_prefers_the_corrected_code() {
        let mut app = test_app();
        app.tab = Tab::Debugger;
        app.debugger.append(DebugField::ContractCode, "bad code");
        app.debugger.append(DebugField::ErrorMessage, "SyntaxError");

        assert_eq!(app.copy_payload(), Some("bad code".to_string()));

        let id = app.debugger.submit().unwrap();
        app.debugger.resolve(
            id,
            Ok(DebugReport {
                explanation: "Missing import.".to_string(),
                corrected_code: "import smartpy as sp".to_string(),
            }),
        );

        assert_eq!(app.copy_payload(), Some("import smartpy as sp".to_string()));
    }

    #[test]
    fn test_copy_sets_the_flash_message() {
        let mut app = test_app();
        app.generator.append("a token contract");
        let id = app.generator.submit().unwrap();
        app.generator
            .resolve(id, Ok("import smartpy as sp".to_string()));

        app.handle_key_event(ctrl('y'));

        let flash = app.flash_message.as_ref().unwrap();
        assert_eq!(flash.text, "Copied!");
        assert!(!flash.is_error);
    }

    #[test]
    fn test_failed_copy_flashes_an_error() {
        let mut app = UiApp::new(
            Dialect::Modern,
            test_global(),
            Box::new(TestClipboard {
                fail: true,
                ..TestClipboard::default()
            }),
        );
        app.generator.append("a token contract");
        let id = app.generator.submit().unwrap();
        app.generator
            .resolve(id, Ok("import smartpy as sp".to_string()));

        app.handle_key_event(ctrl('y'));

        let flash = app.flash_message.as_ref().unwrap();
        assert!(flash.is_error);
        assert!(flash.text.starts_with("Copy failed"));
    }

    #[test]
    fn test_ctrl_a_applies_the_correction() {
        let mut app = test_app();
        app.tab = Tab::Debugger;
        app.debugger.append(DebugField::ContractCode, "bad code");
        app.debugger.append(DebugField::ErrorMessage, "SyntaxError");
        let id = app.debugger.submit().unwrap();
        app.debugger.resolve(
            id,
            Ok(DebugReport {
                explanation: "Missing import.".to_string(),
                corrected_code: "import smartpy as sp".to_string(),
            }),
        );

        app.handle_key_event(ctrl('a'));

        assert_eq!(app.debugger.contract_code(), "import smartpy as sp");
        assert!(app.debugger.report().is_none());
    }

    #[test]
    fn test_paste_targets_the_active_debug_field() {
        let mut app = test_app();
        app.tab = Tab::Debugger;
        app.handle_key_event(key(KeyCode::Tab));

        app.handle_paste("line one\rline two");
        assert_eq!(app.debugger.error_message(), "line one\nline two");
        assert_eq!(app.debugger.contract_code(), "");
    }

    #[test]
    fn test_spinner_advances_only_while_pending() {
        let mut app = test_app();

        app.tick();
        assert_eq!(app.spinner_frame, 0);

        app.generator.append("a token contract");
        app.generator.submit().unwrap();
        app.tick();
        assert_eq!(app.spinner_frame, 1);
    }

    #[test]
    fn test_flash_expiry() {
        let flash = FlashMessage::new("Copied!".to_string(), false);
        assert!(!flash.is_expired(60));
        assert!(flash.is_expired(0));
    }

    #[test]
    fn test_quit_keys_stop_the_loop() {
        let mut app = test_app();
        app.handle_key_event(ctrl('q'));
        assert!(!app.running);

        let mut app = test_app();
        app.handle_key_event(ctrl('c'));
        assert!(!app.running);
    }
}
