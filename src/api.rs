//! Chat-completion API interaction with exponential backoff retry logic.
//!
//! This module provides the interface for communicating with an
//! OpenAI-compatible chat API. Every generation call is stateless: each
//! request carries exactly one system message and one user message, with no
//! conversation carried across calls.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait defining a single stateless ask
//! - [`ChatClient`]: HTTP implementation against `{base_url}/chat/completions`
//! - [`RetryAsk`]: decorator that adds retry logic to any `AskAsync` implementation
//!
//! # Retry Strategy
//!
//! - Maximum 3 retry attempts
//! - Exponential backoff starting at 1 second
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use crate::config::OpenAiConfig;
use rand::{rng, Rng};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Trait for a single stateless generation call.
pub trait AskAsync {
    /// The type of response returned by the model.
    type Response;

    /// Send one system/user message pair and receive a response.
    async fn ask(&self, system: &str, user: &str) -> Result<Self::Response, Box<dyn Error>>;
}

impl<T> AskAsync for &T
where
    T: AskAsync,
{
    type Response = T::Response;

    async fn ask(&self, system: &str, user: &str) -> Result<Self::Response, Box<dyn Error>> {
        (*self).ask(system, user).await
    }
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(client: Client, config: &OpenAiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl AskAsync for ChatClient {
    type Response = String;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, system: &str, user: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u128,
                "API call failed"
            );
            return Err(format!("chat API error {status}: {body}").into());
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| "chat API response has no choices".into())
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, system: &str, user: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(system, user).await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "ask() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Send one generation call with exponential backoff retry logic.
///
/// This is the entry point used by the content generator for each of its
/// three per-entry calls.
#[instrument(level = "info", skip_all)]
pub async fn ask_with_backoff(
    chat: &ChatClient,
    system: &str,
    user: &str,
) -> Result<String, Box<dyn Error>> {
    let api = RetryAsk::new(chat, 3, StdDuration::from_secs(1));
    api.ask(system, user).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Fails a fixed number of times before succeeding.
    #[derive(Debug)]
    struct FlakyAsk {
        failures_left: RefCell<usize>,
        calls: RefCell<usize>,
    }

    impl AskAsync for FlakyAsk {
        type Response = String;

        async fn ask(&self, _system: &str, user: &str) -> Result<String, Box<dyn Error>> {
            *self.calls.borrow_mut() += 1;
            let mut left = self.failures_left.borrow_mut();
            if *left > 0 {
                *left -= 1;
                Err("transient".into())
            } else {
                Ok(format!("echo: {user}"))
            }
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failures() {
        let flaky = FlakyAsk {
            failures_left: RefCell::new(2),
            calls: RefCell::new(0),
        };
        let api = RetryAsk::new(&flaky, 3, StdDuration::from_millis(1));
        let response = api.ask("system", "hello").await.unwrap();
        assert_eq!(response, "echo: hello");
        assert_eq!(*flaky.calls.borrow(), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let flaky = FlakyAsk {
            failures_left: RefCell::new(10),
            calls: RefCell::new(0),
        };
        let api = RetryAsk::new(&flaky, 2, StdDuration::from_millis(1));
        let result = api.ask("system", "hello").await;
        assert!(result.is_err());
        // initial attempt plus two retries
        assert_eq!(*flaky.calls.borrow(), 3);
    }
}
