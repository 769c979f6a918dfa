//! Selector recovery: ask the model for a corrected CSS selector when a
//! page shape changes out from under us.

use crate::error::Result;
use crate::llm::CompletionClient;

/// Byte budget for the HTML snippet sent with a recovery request.
pub const SNIPPET_BYTE_BUDGET: usize = 6000;

const SELECTOR_SYSTEM_PROMPT: &str = "You are an expert web scraping assistant. \
     Given a broken CSS or XPath selector and an HTML snippet, \
     return a JSON object: {\"selector\": \"<corrected selector>\"}. \
     No explanation, just the corrected selector.";

const SELECTOR_MAX_TOKENS: u32 = 100;

/// Ask for a corrected selector.
///
/// The snippet is clipped to [`SNIPPET_BYTE_BUDGET`] before it reaches the
/// wire. When the model answers in the prompted JSON shape the extracted
/// selector comes back; otherwise the raw trimmed text does, and the caller
/// must validate it against a live page before trusting it.
///
/// # Errors
///
/// Completion-call failures (missing credential, transport, response shape)
/// propagate; there is no degraded default for a selector.
pub async fn suggest_selector<C: CompletionClient>(
    client: &C,
    failed_selector: &str,
    html_snippet: &str,
    purpose: Option<&str>,
) -> Result<String> {
    let user = build_prompt(failed_selector, html_snippet, purpose);
    let raw = client
        .complete(SELECTOR_SYSTEM_PROMPT, &user, SELECTOR_MAX_TOKENS)
        .await?;
    Ok(extract_selector(&raw).unwrap_or(raw))
}

fn build_prompt(failed_selector: &str, html_snippet: &str, purpose: Option<&str>) -> String {
    let snippet = clip_to_budget(html_snippet, SNIPPET_BYTE_BUDGET);
    let mut prompt = format!("Broken selector: {failed_selector}\n");
    if let Some(purpose) = purpose {
        prompt.push_str(&format!("Selector purpose: {purpose}\n"));
    }
    prompt.push_str(&format!("\nHTML snippet:\n{snippet}"));
    prompt
}

/// Clip to at most `budget` bytes without splitting a UTF-8 character.
fn clip_to_budget(text: &str, budget: usize) -> &str {
    if text.len() <= budget {
        return text;
    }
    let mut end = budget;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn extract_selector(raw: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    value.get("selector")?.as_str().map(str::to_string)
}
