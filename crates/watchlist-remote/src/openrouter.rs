use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use watchlist_models::{Mood, MoodSignal};

use crate::traits::TitleMoodRater;

const COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Cap on the whole request. A slow model must never stall an interactive
/// recommendation; past this the caller degrades to no signal.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

fn build_prompt(title: &str, mood: Mood) -> String {
    format!(
        "Analyze the video title: \"{}\".\n\
         Evaluate how well the *content implied by this title* matches a \"{}\" mood.\n\
         Do NOT base the reason on the literal words in the title; infer what kind of content or vibe it likely represents.\n\
         Avoid phrases like \"The title...\", \"Based on the title...\", \"The title suggests...\"; focus on the implied content, NOT THE TITLE.\n\
         Respond with a score from 0-10 (10 = perfect match) and a brief reason describing the *type of content or mood*, not just a restatement of the title.\n\
         Format: Score: X, Reason: Y\n\
         (Limit to 2 sentences (30 words max), use only lowercase and start with a verb)",
        title, mood
    )
}

/// Parse a "Score: X, Reason: Y" reply. Anything that doesn't fit the
/// format reads as no signal.
fn parse_signal(content: &str) -> Option<MoodSignal> {
    let (score_part, reason_part) = content.split_once(',')?;
    let score = score_part
        .rsplit(':')
        .next()?
        .trim()
        .parse::<i64>()
        .ok()?;
    let reason = reason_part
        .rsplit(':')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    Some(MoodSignal::new(score, reason))
}

/// Title analysis backed by an OpenRouter chat model.
pub struct OpenRouterRater {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenRouterRater {
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key,
            model,
        }
    }

    async fn request_signal(&self, title: &str, mood: Mood) -> Result<Option<MoodSignal>> {
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": build_prompt(title, mood) }],
            "max_tokens": 50,
        });

        let response = self
            .client
            .post(COMPLETIONS_URL)
            .json(&payload)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Title analysis failed: {} - {}", status, error_text));
        }

        let chat: ChatResponse = response.json().await?;
        let content = match chat.choices.into_iter().next() {
            Some(choice) => choice.message.content,
            None => return Ok(None),
        };

        Ok(parse_signal(&content))
    }
}

#[async_trait]
impl TitleMoodRater for OpenRouterRater {
    async fn rate(&self, title: &str, mood: Mood) -> MoodSignal {
        match self.request_signal(title, mood).await {
            Ok(Some(signal)) => signal,
            Ok(None) => {
                debug!(title, mood = %mood, "unparsable title analysis reply");
                MoodSignal::none()
            }
            Err(e) => {
                debug!(title, mood = %mood, error = %e, "title analysis unavailable");
                MoodSignal::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_reply() {
        let signal = parse_signal("Score: 7, Reason: delivers calm ambient visuals").unwrap();
        assert_eq!(signal.score, 7);
        assert_eq!(signal.reason, "delivers calm ambient visuals");
    }

    #[test]
    fn keeps_commas_inside_reason() {
        let signal = parse_signal("Score: 9, Reason: mixes cozy, slow-paced storytelling").unwrap();
        assert_eq!(signal.score, 9);
        assert_eq!(signal.reason, "mixes cozy, slow-paced storytelling");
    }

    #[test]
    fn rejects_missing_comma() {
        assert!(parse_signal("Score: 7 Reason: something").is_none());
    }

    #[test]
    fn rejects_non_numeric_score() {
        assert!(parse_signal("Score: high, Reason: energetic").is_none());
    }

    #[test]
    fn missing_reason_reads_as_empty() {
        let signal = parse_signal("Score: 3,").unwrap();
        assert_eq!(signal.score, 3);
        assert_eq!(signal.reason, "");
    }

    #[test]
    fn prompt_pins_reply_format() {
        let prompt = build_prompt("Lo-fi beats", Mood::Relaxed);
        assert!(prompt.contains("Format: Score: X, Reason: Y"));
        assert!(prompt.contains("\"relaxed\" mood"));
    }
}
