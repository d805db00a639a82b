//! Document analysis command.

use std::path::Path;

use console::style;

use docsight::analysis::{AnalysisError, DocumentAnalyzer};
use docsight::config::Settings;
use docsight::llm::{AnalysisClient, ApiKey};

use super::super::helpers::read_document;

/// Analyze a PDF file and print the result.
pub async fn cmd_analyze(
    settings: &Settings,
    file: &Path,
    api_key: Option<&str>,
    instructions: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let api_key = api_key
        .and_then(ApiKey::parse)
        .or_else(|| settings.llm.api_key.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("No provider API key. Pass --api-key or set GROQ_API_KEY")
        })?;

    let bytes = read_document(file).await?;
    let client = AnalysisClient::new(settings.llm.clone())?;
    let analyzer = DocumentAnalyzer::new(client, settings.analysis.clone());

    if !json {
        println!(
            "{} Analyzing {} with {}...",
            style("→").cyan(),
            file.display(),
            settings.llm.model
        );
    }

    let result = match analyzer.analyze(&bytes, &api_key, instructions).await {
        Ok(result) => result,
        Err(e) if e.is_transient() => {
            eprintln!("{} {}", style("✗").red(), e);
            return Err(anyhow::anyhow!("Provider is busy, try again later"));
        }
        Err(AnalysisError::BadInput(msg)) => {
            return Err(anyhow::anyhow!("{}: {}", file.display(), msg));
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("\n{}", style("Summary").bold());
    println!("{}", result.summary);

    println!("\n{}", style("Topics").bold());
    for topic in &result.topics {
        println!("  {} {}", style("•").cyan(), topic);
    }

    if let Some(insights) = &result.insights {
        println!("\n{}", style("Insights").bold());
        println!("{}", insights);
    }

    Ok(())
}
