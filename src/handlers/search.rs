//! `google`/`search <terms>` via the DuckDuckGo Instant Answer API.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::warn;

use super::core::{Context, Handler};
use crate::config::SearchConfig;
use crate::error::HandlerResult;

const RESULT_COUNT: usize = 3;

#[derive(Debug, Default, Deserialize)]
pub struct InstantAnswer {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// Topic groups carry no `Text` and are skipped.
#[derive(Debug, Default, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text", default)]
    text: Option<String>,
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Numbered results, padded to three with plain search suggestions.
pub fn format_results(query: &str, answer: &InstantAnswer) -> String {
    let mut results = Vec::with_capacity(RESULT_COUNT);

    if !answer.abstract_text.is_empty() {
        let url = if answer.abstract_url.is_empty() {
            "No URL"
        } else {
            answer.abstract_url.as_str()
        };
        results.push(format!("1. {} - {url}", truncate(&answer.abstract_text, 100)));
    }

    let room = RESULT_COUNT - results.len();
    for topic in answer.related_topics.iter().take(room) {
        if let Some(text) = topic.text.as_deref().filter(|t| !t.is_empty()) {
            results.push(format!("{}. {}", results.len() + 1, truncate(text, 80)));
        }
    }

    while results.len() < RESULT_COUNT {
        results.push(format!("{}. Search for '{query}' on Google", results.len() + 1));
    }

    format!("🔍 Search results for '{query}': {}", results.join(" | "))
}

/// Plain Google search link, used when the lookup fails.
pub fn fallback_link(query: &str) -> String {
    let url = Url::parse_with_params("https://www.google.com/search", &[("q", query)])
        .map(String::from)
        .unwrap_or_else(|_| "https://www.google.com/".to_string());
    format!("🔍 Search for '{query}': {url}")
}

/// `google` / `search` command.
pub struct SearchHandler {
    command: String,
    client: reqwest::Client,
    base_url: String,
}

impl SearchHandler {
    pub fn new(command: impl Into<String>, client: reqwest::Client, config: &SearchConfig) -> Self {
        Self {
            command: command.into(),
            client,
            base_url: config.base_url.clone(),
        }
    }

    async fn lookup(&self, query: &str) -> Result<InstantAnswer, reqwest::Error> {
        self.client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl Handler for SearchHandler {
    async fn handle(&self, _ctx: &Context, _sender: &str, text: &str) -> HandlerResult {
        let query = text
            .strip_prefix(self.command.as_str())
            .unwrap_or(text)
            .trim();
        if query.is_empty() {
            return Ok(Some(format!("Usage: {} <search term>", self.command)));
        }

        match self.lookup(query).await {
            Ok(answer) => Ok(Some(format_results(query, &answer))),
            Err(e) if e.is_decode() => {
                warn!(error = %e, "search response parsing error");
                Ok(Some("Sorry, search failed.".to_string()))
            }
            Err(e) => {
                warn!(error = %e, "search API error");
                Ok(Some(fallback_link(query)))
            }
        }
    }
}
