use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use spikecoder_core::generation::{GenerationRequest, GenerationResult};

pub mod service;

pub use service::{GenerationService, ModelBackend};

use crate::gemini::{GeminiClient, GeminiConfig};

/// Generic notice shown when a call fails. Details go to the log.
pub const FAILURE_NOTICE: &str = "Failed to generate code. Please try again.";

#[derive(Debug, clap::Args)]
pub struct GenerateOptions {
    /// What the robot should do, in plain language
    pub instruction: String,

    /// File holding the current script to build on
    #[arg(long, value_name = "PATH")]
    pub prior_code_file: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Build the process-wide generation service from the environment.
pub fn create_service(global: &crate::Global) -> Result<GenerationService<GeminiClient>> {
    let config = GeminiConfig::from_env()?.with_overrides(
        global.model.clone(),
        global.base_url.clone(),
        global.timeout,
    );

    if global.verbose {
        eprintln!("Gemini base URL: {}", config.base_url);
        eprintln!("Model: {}", config.model);
    }

    let client = GeminiClient::new(&config)?;
    Ok(GenerationService::new(client, config.model))
}

/// Spinner shown while the single in-flight call is pending.
pub fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Analyzing documentation & generating code...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

pub async fn run(options: GenerateOptions, global: crate::Global) -> Result<()> {
    let prior_code = match &options.prior_code_file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| eyre!("Failed to read file '{}': {}", path, e))?,
        None => String::new(),
    };

    let request =
        GenerationRequest::new(options.instruction, prior_code).map_err(|e| eyre!("{}", e))?;

    let service = create_service(&global)?;

    if global.verbose {
        let packaged = service.model_request(&request);
        eprintln!("Model: {}", service.model());
        eprintln!("Prompt length: {} chars", packaged.prompt.len());
        eprintln!(
            "System instruction length: {} chars",
            packaged.system_instruction.len()
        );
    }

    let progress = spinner();
    let outcome = service.generate(request).await;
    progress.finish_and_clear();

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            if global.verbose {
                eprintln!("{}", e);
            }
            return Err(eyre!(FAILURE_NOTICE));
        }
    };

    if options.json {
        println!("{}", format_result_json(&result)?);
    } else {
        println!("{}", format_result_text(&result));
    }

    Ok(())
}

/// Convert a result to a JSON string
fn format_result_json(result: &GenerationResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// Convert a result to formatted text with colors
pub fn format_result_text(result: &GenerationResult) -> String {
    let mut out = String::new();

    out.push_str(&f!("\n{}\n", result.explanation.trim().white()));
    out.push_str(&f!("\n{}\n", "=".repeat(80).bright_cyan()));
    out.push_str(&f!("{}\n", "main.py".bright_cyan().bold()));
    out.push_str(&f!("{}\n", "=".repeat(80).bright_cyan()));
    out.push_str(result.code.trim_end());
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> GenerationResult {
        GenerationResult {
            code: "import motor\n\n".to_string(),
            explanation: "Imports the motor module.".to_string(),
        }
    }

    #[test]
    fn test_format_result_json_has_both_fields() {
        let json = format_result_json(&result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["code"], "import motor\n\n");
        assert_eq!(value["explanation"], "Imports the motor module.");
    }

    #[test]
    fn test_format_result_text_shows_explanation_then_code() {
        colored::control::set_override(false);
        let text = format_result_text(&result());

        let explanation = text.find("Imports the motor module.").unwrap();
        let code = text.find("import motor").unwrap();
        assert!(explanation < code);
        assert!(text.ends_with("import motor\n"));
    }
}
