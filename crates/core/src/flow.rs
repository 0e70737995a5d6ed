//! State machines for the generator and debugger flows
//!
//! Each flow is a small finite state machine: `Idle -> Pending ->
//! {Success, Failed}`, returning to `Idle` on the next field edit. All UI
//! state is held here and mutated only through the transition methods, so
//! the imperative shell never touches fields directly.
//!
//! Every submission is tagged with a [`RequestId`] ticket. A response is
//! applied only when its ticket matches the currently pending one, so
//! responses from abandoned or superseded requests are discarded instead
//! of overwriting newer state.

use crate::types::DebugReport;

/// Validation message shown when the contract description is blank.
pub const EMPTY_DESCRIPTION_MESSAGE: &str = "Please enter a description for the contract.";

/// Validation message shown when either debugger input is blank.
pub const MISSING_DEBUG_INPUT_MESSAGE: &str =
    "Please provide both the contract code and the error message.";

/// Ticket identifying one dispatched request.
///
/// Allocated by a per-flow counter on submit; never reused within a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(u64);

/// State for the contract-generation flow.
#[derive(Debug, Default)]
pub struct GeneratorFlow {
    description: String,
    generated_code: Option<String>,
    error: Option<String>,
    pending: Option<RequestId>,
    next_id: u64,
}

impl GeneratorFlow {
    /// Current contents of the description field.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The last successfully generated contract, if any.
    pub fn generated_code(&self) -> Option<&str> {
        self.generated_code.as_deref()
    }

    /// The current error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Append one character to the description. Clears any prior error.
    pub fn push_char(&mut self, c: char) {
        self.description.push(c);
        self.error = None;
    }

    /// Delete the last character of the description. Clears any prior error.
    pub fn backspace(&mut self) {
        self.description.pop();
        self.error = None;
    }

    /// Append a block of text to the description (paste). Clears any prior error.
    pub fn append(&mut self, text: &str) {
        self.description.push_str(text);
        self.error = None;
    }

    /// Whether a submission would currently be dispatched.
    pub fn can_submit(&self) -> bool {
        !self.is_pending() && !self.description.trim().is_empty()
    }

    /// Attempt to enter the pending state.
    ///
    /// Returns the ticket for the new request, or `None` when a request is
    /// already in flight or the description is blank (in which case the
    /// validation message is recorded instead).
    pub fn submit(&mut self) -> Option<RequestId> {
        if self.is_pending() {
            return None;
        }

        if self.description.trim().is_empty() {
            self.error = Some(EMPTY_DESCRIPTION_MESSAGE.to_string());
            return None;
        }

        self.error = None;
        self.generated_code = None;
        self.next_id += 1;

        let id = RequestId(self.next_id);
        self.pending = Some(id);
        Some(id)
    }

    /// Apply the outcome of a dispatched request.
    ///
    /// Ignored (returns `false`) unless `id` matches the pending ticket.
    pub fn resolve(&mut self, id: RequestId, outcome: Result<String, String>) -> bool {
        if self.pending != Some(id) {
            return false;
        }

        self.pending = None;
        match outcome {
            Ok(code) => self.generated_code = Some(code),
            Err(message) => self.error = Some(message),
        }
        true
    }

    /// Drop the pending ticket so the in-flight response is discarded.
    pub fn abandon(&mut self) {
        self.pending = None;
    }
}

/// Input field targeted by a debugger edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DebugField {
    #[default]
    ContractCode,
    ErrorMessage,
}

impl DebugField {
    /// The next field in Tab order.
    pub fn next(&self) -> DebugField {
        match self {
            DebugField::ContractCode => DebugField::ErrorMessage,
            DebugField::ErrorMessage => DebugField::ContractCode,
        }
    }
}

/// State for the contract-debugging flow.
#[derive(Debug, Default)]
pub struct DebuggerFlow {
    contract_code: String,
    error_message: String,
    report: Option<DebugReport>,
    error: Option<String>,
    pending: Option<RequestId>,
    next_id: u64,
}

impl DebuggerFlow {
    /// Current contents of the contract-code field.
    pub fn contract_code(&self) -> &str {
        &self.contract_code
    }

    /// Current contents of the error-message field.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// The last successful debug report, if any.
    pub fn report(&self) -> Option<&DebugReport> {
        self.report.as_ref()
    }

    /// The current error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn field_mut(&mut self, field: DebugField) -> &mut String {
        match field {
            DebugField::ContractCode => &mut self.contract_code,
            DebugField::ErrorMessage => &mut self.error_message,
        }
    }

    /// Append one character to the given field. Clears any prior error.
    pub fn push_char(&mut self, field: DebugField, c: char) {
        self.field_mut(field).push(c);
        self.error = None;
    }

    /// Delete the last character of the given field. Clears any prior error.
    pub fn backspace(&mut self, field: DebugField) {
        self.field_mut(field).pop();
        self.error = None;
    }

    /// Append a block of text to the given field (paste). Clears any prior error.
    pub fn append(&mut self, field: DebugField, text: &str) {
        self.field_mut(field).push_str(text);
        self.error = None;
    }

    /// Whether a submission would currently be dispatched.
    pub fn can_submit(&self) -> bool {
        !self.is_pending()
            && !self.contract_code.trim().is_empty()
            && !self.error_message.trim().is_empty()
    }

    /// Attempt to enter the pending state.
    ///
    /// Both inputs must be non-blank after trimming; otherwise the
    /// validation message is recorded and `None` is returned.
    pub fn submit(&mut self) -> Option<RequestId> {
        if self.is_pending() {
            return None;
        }

        if self.contract_code.trim().is_empty() || self.error_message.trim().is_empty() {
            self.error = Some(MISSING_DEBUG_INPUT_MESSAGE.to_string());
            return None;
        }

        self.error = None;
        self.report = None;
        self.next_id += 1;

        let id = RequestId(self.next_id);
        self.pending = Some(id);
        Some(id)
    }

    /// Apply the outcome of a dispatched request.
    ///
    /// Ignored (returns `false`) unless `id` matches the pending ticket.
    pub fn resolve(&mut self, id: RequestId, outcome: Result<DebugReport, String>) -> bool {
        if self.pending != Some(id) {
            return false;
        }

        self.pending = None;
        match outcome {
            Ok(report) => self.report = Some(report),
            Err(message) => self.error = Some(message),
        }
        true
    }

    /// Drop the pending ticket so the in-flight response is discarded.
    pub fn abandon(&mut self) {
        self.pending = None;
    }

    /// Replace the contract code with the report's corrected code.
    ///
    /// Clears the report display and returns to the idle state. Returns
    /// `false` when there is no report to apply.
    pub fn apply_correction(&mut self) -> bool {
        match self.report.take() {
            Some(report) => {
                self.contract_code = report.corrected_code;
                true
            }
            None => false,
        }
    }
}
