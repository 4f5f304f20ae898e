use crate::prelude::{println, *};
use colored::Colorize;
use serde::Serialize;
use spikecoder_core::docs::{DocumentationCorpus, SPIKE_PRIME};

#[derive(Debug, clap::Args)]
pub struct DocsOptions {
    /// Print only the section whose title starts with NAME
    #[arg(long, value_name = "NAME")]
    pub section: Option<String>,

    /// List section titles instead of printing text
    #[arg(long, conflicts_with = "section")]
    pub list: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DocsOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub text: String,
}

pub async fn run(options: DocsOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Corpus version: {}", SPIKE_PRIME.version());
        let missing = SPIKE_PRIME.missing_sections();
        if !missing.is_empty() {
            println!("Missing sections: {}", missing.join(", "));
        }
    }

    if options.list {
        for section in SPIKE_PRIME.sections() {
            println!("{}", section.title);
        }
        return Ok(());
    }

    let output = docs_data(&SPIKE_PRIME, options.section.as_deref())?;

    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output)
                .map_err(|e| eyre!("JSON serialization failed: {}", e))?
        );
    } else {
        if let Some(title) = &output.section {
            println!("{}", title.bright_cyan().bold());
        }
        println!("{}", output.text);
    }

    Ok(())
}

/// Look up the whole corpus, or one section of it.
pub fn docs_data(corpus: &DocumentationCorpus, section: Option<&str>) -> Result<DocsOutput> {
    match section {
        None => Ok(DocsOutput {
            version: corpus.version().to_string(),
            section: None,
            text: corpus.text().to_string(),
        }),
        Some(name) => {
            let found = corpus
                .section(name)
                .ok_or_else(|| eyre!("No documentation section matches '{}'", name))?;
            Ok(DocsOutput {
                version: corpus.version().to_string(),
                section: Some(found.title.to_string()),
                text: found.body.to_string(),
            })
        }
    }
}
