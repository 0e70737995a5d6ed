use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sptools_core::flow::MISSING_DEBUG_INPUT_MESSAGE;
use sptools_core::prompt::build_debug_prompt;
use sptools_core::types::{DebugReport, DebugRequest};

use crate::gemini::{GeminiClient, GeminiConfig, DEBUG_SAMPLING};

#[derive(Debug, clap::Args)]
pub struct DebugOptions {
    /// Path to the failing SmartPy contract
    pub file: String,

    /// Error message produced when running the contract
    pub error: String,

    /// SmartPy IDE dialect of the contract
    #[clap(long, value_enum, default_value = "modern")]
    pub dialect: crate::Dialect,

    /// Write the corrected code back to FILE
    #[clap(long)]
    pub apply: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugOutput {
    model: String,
    dialect: crate::Dialect,
    explanation: String,
    corrected_code: String,
}

pub async fn run(options: DebugOptions, global: crate::Global) -> Result<()> {
    let contract_code = tokio::fs::read_to_string(&options.file)
        .await
        .map_err(|e| eyre!("Failed to read contract '{}': {}", options.file, e))?;

    let request = DebugRequest {
        contract_code,
        error_message: options.error.clone(),
        dialect: options.dialect.clone().into(),
    };

    if request.contract_code.trim().is_empty() || request.error_message.trim().is_empty() {
        return Err(Error::Validation(MISSING_DEBUG_INPUT_MESSAGE.to_string()).into());
    }

    // Build the prompt using the functional core
    let prompt = build_debug_prompt(&request);

    let config = GeminiConfig::from_env()?.with_overrides(global.base_url, global.model);

    if global.verbose {
        eprintln!("Model: {}", config.model);
        eprintln!("Base URL: {}", config.base_url);
        eprintln!("Dialect: {}", request.dialect.label());
        eprintln!("Prompt length: {} chars", prompt.len());
    }

    let model = config.model.clone();
    let client = GeminiClient::new(config)?;

    let spinner = if !options.json {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        spinner.set_message("Analyzing your contract...");
        Some(spinner)
    } else {
        None
    };

    let result = client.debug(&prompt, DEBUG_SAMPLING).await;

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    let report = result?;

    if options.json {
        let output = DebugOutput {
            model,
            dialect: options.dialect.clone(),
            explanation: report.explanation.clone(),
            corrected_code: report.corrected_code.clone(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output)
                .map_err(|e| eyre!("JSON serialization failed: {}", e))?
        );
    } else {
        println!("{}", format_report_text(&report));
    }

    if options.apply {
        tokio::fs::write(&options.file, &report.corrected_code)
            .await
            .map_err(|e| eyre!("Failed to write corrected contract '{}': {}", options.file, e))?;
        eprintln!("{} {}", "Corrected code written to".green(), options.file);
    }

    Ok(())
}

/// Build formatted text output for a debug report
fn format_report_text(report: &DebugReport) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        "DEBUGGING ANALYSIS".bright_cyan().bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    result.push_str(&format!(
        "\n{}\n",
        "Explanation of the Error:".cyan().bold()
    ));
    result.push_str(&format!("{}\n", report.explanation));

    result.push_str(&format!("\n{}\n", "Corrected Code:".green().bold()));
    result.push_str(&format!("{}\n", report.corrected_code));

    result
}
