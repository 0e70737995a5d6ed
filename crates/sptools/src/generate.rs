use crate::prelude::{eprintln, println, *};
use indicatif::{ProgressBar, ProgressStyle};
use sptools_core::flow::EMPTY_DESCRIPTION_MESSAGE;
use sptools_core::prompt::build_generation_prompt;
use sptools_core::types::GenerationRequest;

use crate::gemini::{GeminiClient, GeminiConfig, GENERATION_SAMPLING};

#[derive(Debug, clap::Args)]
pub struct GenerateOptions {
    /// Natural-language description of the contract
    pub description: String,

    /// SmartPy IDE dialect for the generated code
    #[clap(long, value_enum, default_value = "modern")]
    pub dialect: crate::Dialect,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, serde::Serialize)]
struct GenerateOutput {
    model: String,
    dialect: crate::Dialect,
    code: String,
}

pub async fn run(options: GenerateOptions, global: crate::Global) -> Result<()> {
    let request = GenerationRequest {
        description: options.description.clone(),
        dialect: options.dialect.clone().into(),
    };

    if request.description.trim().is_empty() {
        return Err(Error::Validation(EMPTY_DESCRIPTION_MESSAGE.to_string()).into());
    }

    // Build the prompt using the functional core
    let prompt = build_generation_prompt(&request);

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
        spinner.set_message("Generating your contract...");
        Some(spinner)
    } else {
        None
    };

    let result = client.generate(&prompt, GENERATION_SAMPLING).await;

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    let code = result?;

    if options.json {
        let output = GenerateOutput {
            model,
            dialect: options.dialect,
            code,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output)
                .map_err(|e| eyre!("JSON serialization failed: {}", e))?
        );
    } else {
        // Print raw code to stdout
        print!("{}", code);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_rejects_blank_description_before_any_request() {
        let options = GenerateOptions {
            description: "   ".to_string(),
            dialect: crate::Dialect::Modern,
            json: false,
        };
        let global = crate::Global {
            model: None,
            base_url: None,
            verbose: false,
        };

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let error = runtime.block_on(run(options, global)).unwrap_err();
        assert!(error.to_string().contains(EMPTY_DESCRIPTION_MESSAGE));
    }

    #[test]
    fn test_generate_output_json_shape() {
        let output = GenerateOutput {
            model: "gemini-2.5-flash".to_string(),
            dialect: crate::Dialect::Legacy,
            code: "import smartpy as sp".to_string(),
        };

        let json = serde_json::to_string_pretty(&output).unwrap();
        assert!(json.contains("\"model\": \"gemini-2.5-flash\""));
        assert!(json.contains("\"dialect\": \"legacy\""));
        assert!(json.contains("\"code\": \"import smartpy as sp\""));
    }
}
