use serde::{Deserialize, Serialize};

/// SmartPy IDE dialect targeted by generated contracts.
///
/// The modern IDE expects lowercase type constructors such as `sp.address`,
/// while the legacy IDE expects the older `sp.TAddress` style together with
/// explicit `sp.set_type_expr` annotations for complex types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    #[default]
    Modern,
    Legacy,
}

impl Dialect {
    /// Label shown to the user for this dialect.
    pub fn label(&self) -> &'static str {
        match self {
            Dialect::Modern => "Modern IDE",
            Dialect::Legacy => "Legacy IDE",
        }
    }

    /// The other dialect, for toggle controls.
    pub fn toggled(&self) -> Dialect {
        match self {
            Dialect::Modern => Dialect::Legacy,
            Dialect::Legacy => Dialect::Modern,
        }
    }
}

/// A request to generate a SmartPy contract from a natural-language description.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Free-form description of the desired contract.
    pub description: String,
    /// IDE dialect the generated code must target.
    pub dialect: Dialect,
}

/// A request to explain and correct a failing SmartPy contract.
#[derive(Debug, Clone)]
pub struct DebugRequest {
    /// Full source of the failing contract.
    pub contract_code: String,
    /// Error message produced when running or compiling the contract.
    pub error_message: String,
    /// IDE dialect the corrected code must target.
    pub dialect: Dialect,
}

/// Structured result of a debug call.
///
/// Serialized with camelCase field names to match the wire schema the model
/// is instructed to follow (`explanation` / `correctedCode`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugReport {
    /// Markdown explanation of the error, its cause, and the fix.
    pub explanation: String,
    /// Complete corrected contract source, including imports and tests.
    pub corrected_code: String,
}
