//! Mock generator for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use skillmap_core::traits::{ContentGenerator, GeneratedContent, GenerationRequest};

use crate::error::GenerationError;

/// A content generator that never leaves the process.
///
/// Returns canned content keyed by request key (group id or student id),
/// can be told to fail a request a number of times first, and records
/// what it was asked.
pub struct MockGenerator {
    /// Map of request key → content.
    responses: HashMap<String, GeneratedContent>,
    /// Content for keys with no entry.
    default_response: GeneratedContent,
    /// Errors to return, in order, before a key succeeds.
    failures: Mutex<HashMap<String, VecDeque<GenerationError>>>,
    /// Simulated latency per call.
    delay: Option<Duration>,
    call_count: AtomicU32,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl MockGenerator {
    /// Create a mock with the given key → content mappings.
    pub fn new(responses: HashMap<String, GeneratedContent>) -> Self {
        Self {
            responses,
            default_response: GeneratedContent::Text("No content.".to_string()),
            failures: Mutex::new(HashMap::new()),
            delay: None,
            call_count: AtomicU32::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same content.
    pub fn with_fixed_response(content: GeneratedContent) -> Self {
        let mut mock = Self::new(HashMap::new());
        mock.default_response = content;
        mock
    }

    /// Fail requests for `key` with `errors`, one per call, before succeeding.
    pub fn with_failures(mut self, key: &str, errors: Vec<GenerationError>) -> Self {
        if let Ok(failures) = self.failures.get_mut() {
            failures.insert(key.to_string(), errors.into());
        }
        self
    }

    /// Sleep for `delay` inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }

    fn next_failure(&self, key: &str) -> Option<GenerationError> {
        let mut failures = self.failures.lock().ok()?;
        let error = failures.get_mut(key)?.pop_front();
        error
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<GeneratedContent> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = self.next_failure(request.key()) {
            return Err(error.into());
        }

        Ok(self
            .responses
            .get(request.key())
            .cloned()
            .unwrap_or_else(|| self.default_response.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillmap_core::model::ProficiencyLevel;
    use skillmap_core::traits::{StudentReportRequest, TeacherProfile};

    fn report(id: &str) -> GenerationRequest {
        GenerationRequest::StudentReport(StudentReportRequest {
            student_id: id.into(),
            student_name: format!("Student {id}"),
            overall_score: 64.0,
            overall_level: ProficiencyLevel::Weak,
            weakest_skills: vec![],
            target_accuracy: 80.0,
            profile: TeacherProfile::default(),
        })
    }

    #[tokio::test]
    async fn fixed_response() {
        let mock = MockGenerator::with_fixed_response(GeneratedContent::Text("Keep going".into()));
        let content = mock.generate(&report("S1")).await.unwrap();
        assert_eq!(content, GeneratedContent::Text("Keep going".into()));
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.last_request(), Some(report("S1")));
    }

    #[tokio::test]
    async fn key_matching() {
        let mut responses = HashMap::new();
        responses.insert(
            "S2".to_string(),
            GeneratedContent::Text("Practise fractions".into()),
        );
        let mock = MockGenerator::new(responses);

        let matched = mock.generate(&report("S2")).await.unwrap();
        assert_eq!(matched, GeneratedContent::Text("Practise fractions".into()));

        let fallback = mock.generate(&report("S9")).await.unwrap();
        assert_eq!(fallback, GeneratedContent::Text("No content.".into()));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn failures_are_consumed_in_order() {
        let mock = MockGenerator::new(HashMap::new()).with_failures(
            "S1",
            vec![
                GenerationError::Timeout(5),
                GenerationError::Rejected("nope".into()),
            ],
        );

        let first = mock.generate(&report("S1")).await.unwrap_err();
        assert!(matches!(
            first.downcast_ref::<GenerationError>(),
            Some(GenerationError::Timeout(5))
        ));
        let second = mock.generate(&report("S1")).await.unwrap_err();
        assert!(second.to_string().contains("nope"));
        assert!(mock.generate(&report("S1")).await.is_ok());
        assert!(mock.generate(&report("S2")).await.is_ok());
    }
}
