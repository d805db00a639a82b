//! Prompts for document analysis.

/// System instruction sent with every analysis request.
pub const SYSTEM_PROMPT: &str = "You are an expert in analyzing academic and technical documents. Analyze the provided text and return a structured JSON object with a summary, topics and insights.";

/// Fixed instruction block placed before the document text.
const ANALYSIS_INSTRUCTIONS: &str = r#"Analyze the following document and return a JSON object with exactly these fields:

1. "summary": a concise summary of the document (at most 300 words)
2. "topics": a list of 5-10 main topics and relevant keywords
3. "insights": additional insights about the document (optional, at most 200 words)

Expected response format:
{
  "summary": "Summary of the document",
  "topics": ["topic1", "topic2", "topic3"],
  "insights": "Additional insights"
}"#;

/// Build the user message for an analysis request.
///
/// The text is embedded verbatim at the end; callers truncate beforehand.
/// The additional-instructions block appears only for non-blank instructions.
pub fn build_analysis_prompt(text: &str, instructions: Option<&str>) -> String {
    let mut prompt = String::with_capacity(ANALYSIS_INSTRUCTIONS.len() + text.len() + 64);
    prompt.push_str(ANALYSIS_INSTRUCTIONS);
    prompt.push_str("\n\n");

    if let Some(extra) = instructions.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str("Additional instructions: ");
        prompt.push_str(extra);
        prompt.push_str("\n\n");
    }

    prompt.push_str("Document to analyze:\n");
    prompt.push_str(text);
    prompt
}
