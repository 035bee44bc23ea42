//! Bounded-concurrency execution of generation requests.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::time::Instant;

use skillmap_core::traits::{ContentGenerator, GeneratedContent, GenerationRequest};

use crate::config::SkillmapConfig;
use crate::error::GenerationError;

/// Configuration for a batch of generation requests.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Maximum concurrent requests.
    pub parallelism: usize,
    /// Retries on transient generation errors.
    pub max_retries: u32,
    /// Delay before the first retry; doubles per attempt.
    pub retry_delay: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            max_retries: 2,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl From<&SkillmapConfig> for RunnerConfig {
    fn from(config: &SkillmapConfig) -> Self {
        Self {
            parallelism: config.parallelism.max(1),
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// The result of one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutcome {
    /// Group id or student id the request was about.
    pub key: String,
    pub attempts: u32,
    /// Time from acquiring a concurrency slot to the final attempt's end.
    pub duration_ms: u64,
    #[serde(flatten)]
    pub result: OutcomeResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OutcomeResult {
    Generated { content: GeneratedContent },
    Failed { error: String },
}

impl PlanOutcome {
    pub fn content(&self) -> Option<&GeneratedContent> {
        match &self.result {
            OutcomeResult::Generated { content } => Some(content),
            OutcomeResult::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.result, OutcomeResult::Generated { .. })
    }
}

/// Run every request against `generator`, at most `config.parallelism` at a
/// time.
///
/// Failures are logged and reported per request; one failed request never
/// stops the others. Outcomes come back in request order.
pub async fn run_plans(
    generator: Arc<dyn ContentGenerator>,
    requests: Vec<GenerationRequest>,
    config: &RunnerConfig,
) -> Vec<PlanOutcome> {
    let start = Instant::now();
    let semaphore = Arc::new(Semaphore::new(config.parallelism.max(1)));
    let mut futures = FuturesUnordered::new();

    for (index, request) in requests.into_iter().enumerate() {
        let generator = Arc::clone(&generator);
        let semaphore = Arc::clone(&semaphore);
        let config = config.clone();

        futures.push(async move {
            let key = request.key().to_string();
            let (attempts, elapsed, result) = match semaphore.acquire_owned().await {
                Ok(_permit) => {
                    let started = Instant::now();
                    let (attempts, result) =
                        generate_with_retry(&*generator, &request, &config).await;
                    (attempts, started.elapsed(), result)
                }
                Err(_) => (0, Duration::ZERO, Err(anyhow::anyhow!("semaphore closed"))),
            };
            (index, key, attempts, elapsed, result)
        });
    }

    let total = futures.len();
    let mut outcomes: Vec<(usize, PlanOutcome)> = Vec::with_capacity(total);
    let mut failed = 0usize;

    while let Some((index, key, attempts, elapsed, result)) = futures.next().await {
        let result = match result {
            Ok(content) => OutcomeResult::Generated { content },
            Err(e) => {
                tracing::error!("generation failed for {key} via {}: {e:#}", generator.name());
                failed += 1;
                OutcomeResult::Failed {
                    error: format!("{e:#}"),
                }
            }
        };
        outcomes.push((
            index,
            PlanOutcome {
                key,
                attempts,
                duration_ms: elapsed.as_millis() as u64,
                result,
            },
        ));
    }

    tracing::info!(
        "generated {}/{total} requests in {}ms ({failed} failed)",
        total - failed,
        start.elapsed().as_millis()
    );

    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

/// Call the generator, retrying transient errors with exponential backoff.
async fn generate_with_retry(
    generator: &dyn ContentGenerator,
    request: &GenerationRequest,
    config: &RunnerConfig,
) -> (u32, anyhow::Result<GeneratedContent>) {
    let mut retry_delay = config.retry_delay;
    let mut attempt = 0;

    loop {
        attempt += 1;
        let error = match generator.generate(request).await {
            Ok(content) => return (attempt, Ok(content)),
            Err(e) => e,
        };

        let transient = error
            .downcast_ref::<GenerationError>()
            .filter(|e| e.is_transient());
        let Some(transient) = transient else {
            return (attempt, Err(error));
        };
        if attempt > config.max_retries {
            return (attempt, Err(error));
        }

        let wait = transient
            .retry_after_ms()
            .map(Duration::from_millis)
            .unwrap_or(retry_delay);
        tracing::warn!(
            "transient error for {} (attempt {attempt}), retrying in {}ms: {transient}",
            request.key(),
            wait.as_millis()
        );
        tokio::time::sleep(wait).await;
        retry_delay = (retry_delay * 2).min(Duration::from_secs(60));
    }
}
