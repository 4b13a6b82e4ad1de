use crate::config::{ReviewOrder, RetryConfig};
use crate::discovery::collect_reviews;
use crate::document::{PaperEntry, PaperSlot};
use crate::parser::{normalize_contradictions, try_parse_response, ContradictionRecord};
use crate::provider::{Agent, AgentResponse};
use std::time::Duration;
use tracing::{debug, warn};

use super::retry::invoke_with_retries;

/// Everything a paper needs besides its own record
#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub instructions: String,
    pub review_order: ReviewOrder,
    pub retry: RetryConfig,
    pub attempt_timeout: Option<Duration>,
}

#[derive(Debug)]
pub struct PaperResult {
    pub slot: PaperSlot,
    pub paper_id: String,
    pub status: PaperStatus,
    pub review_count: usize,
    pub contradictions: Vec<ContradictionRecord>,
    pub duration: Duration,
    /// Offset from the start of the run at which the result was written back
    pub finished_at: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaperStatus {
    Completed,
    NoReviews,
    /// Every attempt failed; the paper gets an empty result
    InvocationFailed,
    /// The response held no decodable contradiction list
    Unparseable { error: String },
}

impl std::fmt::Display for PaperStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaperStatus::Completed => write!(f, "completed"),
            PaperStatus::NoReviews => write!(f, "no_reviews"),
            PaperStatus::InvocationFailed => write!(f, "invocation_failed"),
            PaperStatus::Unparseable { error } => write!(f, "unparseable: {}", error),
        }
    }
}

/// Combine the instructions with every review, numbered from 1 in collection order
pub fn build_task(instructions: &str, reviews: &[String]) -> String {
    let combined: String = reviews
        .iter()
        .enumerate()
        .map(|(idx, review)| format!("Review {}: {}\n\n", idx + 1, review))
        .collect();
    format!("{}\n{}", instructions, combined)
}

/// Plain text of an agent run: the agent's own message, else all reply text,
/// else the rendered response. No response at all is empty text.
pub fn extraction_text(response: Option<&AgentResponse>, agent_name: &str) -> String {
    let Some(response) = response else {
        return String::new();
    };

    if let Some(content) = response.message_from(agent_name) {
        if !content.is_empty() {
            return content.to_string();
        }
    }

    let text = response.text();
    if !text.is_empty() {
        return text;
    }

    response.to_string()
}

/// Run one paper through collect -> invoke -> parse -> normalize
pub async fn process_paper(
    entry: PaperEntry,
    agent: &dyn Agent,
    settings: &ExtractionSettings,
) -> PaperResult {
    let start = std::time::Instant::now();
    let PaperEntry {
        slot,
        paper_id,
        record,
    } = entry;

    let reviews = collect_reviews(&record, settings.review_order);
    if reviews.is_empty() {
        println!("No reviews found for paper {}", paper_id);
        return PaperResult {
            slot,
            paper_id,
            status: PaperStatus::NoReviews,
            review_count: 0,
            contradictions: Vec::new(),
            duration: start.elapsed(),
            finished_at: Duration::ZERO,
        };
    }

    let task = build_task(&settings.instructions, &reviews);
    debug!("Task for paper {}:\n{}", paper_id, task);

    let response =
        invoke_with_retries(agent, &task, &settings.retry, settings.attempt_timeout).await;
    let invocation_failed = response.is_none();

    let text = extraction_text(response.as_ref(), agent.name());
    debug!("Raw extraction output for paper {}: {}", paper_id, text);

    let (raw_items, status) = match try_parse_response(&text) {
        Ok(items) if invocation_failed => (items, PaperStatus::InvocationFailed),
        Ok(items) => (items, PaperStatus::Completed),
        Err(e) => {
            warn!("Could not parse contradictions for paper {}: {}", paper_id, e);
            (Vec::new(), PaperStatus::Unparseable { error: e.to_string() })
        }
    };

    let contradictions = normalize_contradictions(&raw_items);
    debug!(
        "Extracted {} contradictions for paper {}",
        contradictions.len(),
        paper_id
    );

    PaperResult {
        slot,
        paper_id,
        status,
        review_count: reviews.len(),
        contradictions,
        duration: start.elapsed(),
        finished_at: Duration::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::AgentMessage;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct ScriptedAgent {
        reply: Option<String>,
        calls: AtomicU32,
        tasks: Mutex<Vec<String>>,
    }

    impl ScriptedAgent {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: AtomicU32::new(0),
                tasks: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicU32::new(0),
                tasks: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Agent for ScriptedAgent {
        fn name(&self) -> &str {
            "ExtractorAgent"
        }

        async fn run(&self, task: &str) -> Result<AgentResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.tasks.lock().unwrap().push(task.to_string());
            match &self.reply {
                Some(reply) => Ok(AgentResponse {
                    messages: vec![
                        AgentMessage {
                            source: "user".to_string(),
                            content: task.to_string(),
                        },
                        AgentMessage {
                            source: "ExtractorAgent".to_string(),
                            content: reply.clone(),
                        },
                    ],
                }),
                None => Err(ProviderError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                }),
            }
        }
    }

    fn settings() -> ExtractionSettings {
        ExtractionSettings {
            instructions: "Find contradictions.".to_string(),
            review_order: ReviewOrder::Document,
            retry: RetryConfig {
                max_attempts: 3,
                backoff_base_ms: 10,
                jitter_ms: 0,
            },
            attempt_timeout: None,
        }
    }

    fn entry(record: serde_json::Value) -> PaperEntry {
        PaperEntry {
            slot: PaperSlot::Index(0),
            paper_id: "p1".to_string(),
            record,
        }
    }

    #[test]
    fn test_build_task_numbers_reviews() {
        let task = build_task("Instr.", &["first".to_string(), "second".to_string()]);
        assert_eq!(task, "Instr.\nReview 1: first\n\nReview 2: second\n\n");
    }

    #[test]
    fn test_extraction_text_prefers_agent_message() {
        let response = AgentResponse {
            messages: vec![
                AgentMessage {
                    source: "user".to_string(),
                    content: "task".to_string(),
                },
                AgentMessage {
                    source: "Critic".to_string(),
                    content: "critic says".to_string(),
                },
                AgentMessage {
                    source: "ExtractorAgent".to_string(),
                    content: "[]".to_string(),
                },
            ],
        };
        assert_eq!(extraction_text(Some(&response), "ExtractorAgent"), "[]");
        assert_eq!(
            extraction_text(Some(&response), "Missing"),
            "critic says\n[]"
        );
        assert_eq!(extraction_text(None, "ExtractorAgent"), "");
    }

    #[test]
    fn test_extraction_text_falls_back_to_rendered_response() {
        let response = AgentResponse {
            messages: vec![AgentMessage {
                source: "user".to_string(),
                content: "task".to_string(),
            }],
        };
        assert_eq!(extraction_text(Some(&response), "ExtractorAgent"), "user: task");
    }

    #[tokio::test]
    async fn test_no_reviews_never_calls_agent() {
        let agent = ScriptedAgent::replying("[]");
        let record = json!({"paper_id": "p1", "title": "t"});
        let result = process_paper(entry(record), &agent, &settings()).await;

        assert_eq!(result.status, PaperStatus::NoReviews);
        assert!(result.contradictions.is_empty());
        assert_eq!(agent.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_contradictions_extracted() {
        let agent = ScriptedAgent::replying(
            r#"[{"contradiction_statement":"x","identified_aspect":"Clarity","evidence":"e","aspect_score":4,"evidence_score":3}]"#,
        );
        let record = json!({
            "paper_id": "p1",
            "review_1_full": "Clear.",
            "review_2_full": "Unclear."
        });

        let result = process_paper(entry(record), &agent, &settings()).await;

        assert_eq!(result.status, PaperStatus::Completed);
        assert_eq!(result.review_count, 2);
        assert_eq!(
            result.contradictions,
            vec![ContradictionRecord {
                contradiction_statement: "x".to_string(),
                identified_aspect: "Clarity".to_string(),
                evidence: "e".to_string(),
                aspect_score: Some(4),
                evidence_score: Some(3),
            }]
        );

        let tasks = agent.tasks.lock().unwrap();
        assert_eq!(
            tasks[0],
            "Find contradictions.\nReview 1: Clear.\n\nReview 2: Unclear.\n\n"
        );
    }

    #[tokio::test]
    async fn test_invocation_failure_degrades_to_empty() {
        let agent = ScriptedAgent::failing();
        let record = json!({"review_1_full": "a", "review_2_full": "b"});

        let result = process_paper(entry(record), &agent, &settings()).await;

        assert_eq!(result.status, PaperStatus::InvocationFailed);
        assert!(result.contradictions.is_empty());
        assert_eq!(agent.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unparseable_response_degrades_to_empty() {
        let agent = ScriptedAgent::replying("I could not find anything worth reporting.");
        let record = json!({"review_1_full": "a", "review_2_full": "b"});

        let result = process_paper(entry(record), &agent, &settings()).await;

        assert!(matches!(result.status, PaperStatus::Unparseable { .. }));
        assert!(result.contradictions.is_empty());
    }
}
