use crate::config::Config;
use crate::document::{PaperDocument, PaperSlot};
use crate::error::RunnerError;
use crate::provider::Agent;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tokio::time::Instant;
use tracing::{info, info_span, warn, Instrument};

use super::executor::{process_paper, ExtractionSettings, PaperResult, PaperStatus};

#[derive(Debug)]
pub struct RunReport {
    pub paper_results: Vec<PaperResult>,
    pub total_duration: Duration,
}

impl RunReport {
    pub fn totals(&self) -> RunTotals {
        let mut totals = RunTotals {
            papers: self.paper_results.len(),
            ..RunTotals::default()
        };
        for result in &self.paper_results {
            match result.status {
                PaperStatus::Completed => totals.completed += 1,
                PaperStatus::NoReviews => totals.no_reviews += 1,
                PaperStatus::InvocationFailed => totals.invocation_failed += 1,
                PaperStatus::Unparseable { .. } => totals.unparseable += 1,
            }
            totals.contradictions += result.contradictions.len();
        }
        totals
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RunTotals {
    pub papers: usize,
    pub completed: usize,
    pub no_reviews: usize,
    pub invocation_failed: usize,
    pub unparseable: usize,
    pub contradictions: usize,
}

pub struct Orchestrator {
    agent: Arc<dyn Agent>,
    settings: Arc<ExtractionSettings>,
    result_field: String,
    concurrency: usize,
    semaphore: Arc<Semaphore>,
}

impl Orchestrator {
    pub fn new(config: &Config, agent: Arc<dyn Agent>, instructions: String) -> Self {
        let concurrency = config.concurrency.max(1);
        let settings = ExtractionSettings {
            instructions,
            review_order: config.review_order,
            retry: config.retry.clone(),
            attempt_timeout: config.provider.timeout_sec.map(Duration::from_secs),
        };
        Self {
            agent,
            settings: Arc::new(settings),
            result_field: config.result_field.clone(),
            concurrency,
            semaphore: Arc::new(Semaphore::new(concurrency)),
        }
    }

    /// Process every paper and attach its contradictions to the document.
    ///
    /// A paper that fails in any way still receives an empty result. Finished
    /// papers are written back while later ones are still waiting for a permit.
    pub async fn run(&self, document: &mut PaperDocument) -> Result<RunReport, RunnerError> {
        let start = Instant::now();
        let papers = document.papers();
        let mut progress = Progress {
            start,
            total: papers.len(),
            done: 0,
            results: Vec::with_capacity(papers.len()),
        };

        info!(
            "Processing {} papers with concurrency {}",
            progress.total, self.concurrency
        );

        let mut futures: FuturesUnordered<BoxFuture<'static, Finished>> = FuturesUnordered::new();

        for entry in papers {
            let permit = loop {
                tokio::select! {
                    biased;
                    Some(finished) = futures.next(), if !futures.is_empty() => {
                        self.record(document, finished, &mut progress);
                    }
                    permit = self.semaphore.clone().acquire_owned() => break permit?,
                }
            };
            let agent = self.agent.clone();
            let settings = self.settings.clone();
            let slot = entry.slot.clone();
            let paper_id = entry.paper_id.clone();
            let span = info_span!("paper", paper_id = %entry.paper_id);

            println!("Processing paper {}", entry.paper_id);

            let handle = tokio::spawn(
                async move {
                    let _permit = permit; // hold until done
                    process_paper(entry, agent.as_ref(), &settings).await
                }
                .instrument(span),
            );
            futures.push(Box::pin(async move { (slot, paper_id, handle.await) }));
        }

        while let Some(finished) = futures.next().await {
            self.record(document, finished, &mut progress);
        }

        Ok(RunReport {
            paper_results: progress.results,
            total_duration: start.elapsed(),
        })
    }

    fn record(&self, document: &mut PaperDocument, finished: Finished, progress: &mut Progress) {
        let (slot, paper_id, joined) = finished;
        progress.done += 1;

        let mut result = match joined {
            Ok(result) => result,
            Err(e) => {
                warn!("Task for paper {} panicked: {}", paper_id, e);
                document.set_result(&slot, &self.result_field, Value::Array(Vec::new()));
                return;
            }
        };

        let value = Value::Array(
            result
                .contradictions
                .iter()
                .map(|c| c.to_value())
                .collect(),
        );
        if !document.set_result(&result.slot, &self.result_field, value) {
            warn!("Paper {} vanished from the document", result.paper_id);
        }
        result.finished_at = progress.start.elapsed();

        println!(
            "[{}/{}] Extraction complete for paper {}: {} ({} reviews, {} contradictions, {:.1}s)",
            progress.done,
            progress.total,
            result.paper_id,
            result.status,
            result.review_count,
            result.contradictions.len(),
            result.duration.as_secs_f64()
        );
        progress.results.push(result);
    }
}

type Finished = (PaperSlot, String, Result<PaperResult, JoinError>);

struct Progress {
    start: Instant,
    total: usize,
    done: usize,
    results: Vec<PaperResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::{AgentMessage, AgentResponse};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    const REPLY: &str = r#"[{"contradiction_statement":"x","identified_aspect":"Clarity","evidence":"e","aspect_score":4,"evidence_score":3}]"#;

    struct StubAgent {
        reply: &'static str,
        calls: AtomicU32,
    }

    impl StubAgent {
        fn new(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn name(&self) -> &str {
            "ExtractorAgent"
        }

        async fn run(&self, _task: &str) -> Result<AgentResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AgentResponse {
                messages: vec![AgentMessage {
                    source: "ExtractorAgent".to_string(),
                    content: self.reply.to_string(),
                }],
            })
        }
    }

    struct SlowAgent;

    #[async_trait]
    impl Agent for SlowAgent {
        fn name(&self) -> &str {
            "ExtractorAgent"
        }

        async fn run(&self, _task: &str) -> Result<AgentResponse, ProviderError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(AgentResponse {
                messages: vec![AgentMessage {
                    source: "ExtractorAgent".to_string(),
                    content: "[]".to_string(),
                }],
            })
        }
    }

    fn expected_record() -> Value {
        json!({
            "contradiction_statement": "x",
            "identified_aspect": "Clarity",
            "evidence": "e",
            "aspect_score": 4,
            "evidence_score": 3
        })
    }

    #[tokio::test]
    async fn test_end_to_end_list_document() {
        let agent = StubAgent::new(REPLY);
        let orchestrator =
            Orchestrator::new(&Config::default(), agent.clone(), "Find.".to_string());
        let mut document = PaperDocument::from_value(json!([
            {"paper_id": "p1", "review_1_full": "Clear.", "review_2_full": "Unclear."},
            {"paper_id": "p2", "title": "no reviews"},
            {"title": "no id"}
        ]))
        .unwrap();

        let report = orchestrator.run(&mut document).await.unwrap();

        assert_eq!(agent.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            document.as_value(),
            &json!([
                {
                    "paper_id": "p1",
                    "review_1_full": "Clear.",
                    "review_2_full": "Unclear.",
                    "agent_response": [expected_record()]
                },
                {"paper_id": "p2", "title": "no reviews", "agent_response": []},
                {"title": "no id"}
            ])
        );

        let totals = report.totals();
        assert_eq!(totals.papers, 2);
        assert_eq!(totals.completed, 1);
        assert_eq!(totals.no_reviews, 1);
        assert_eq!(totals.contradictions, 1);
    }

    #[tokio::test]
    async fn test_map_document_and_custom_field() {
        let mut config = Config::default();
        config.result_field = "contradictions".to_string();
        let orchestrator = Orchestrator::new(&config, StubAgent::new("[]"), "Find.".to_string());
        let mut document = PaperDocument::from_value(json!({
            "p1": {"reviews": {"review_1_full": "a", "review_2_full": "b"}}
        }))
        .unwrap();

        orchestrator.run(&mut document).await.unwrap();

        assert_eq!(document.as_value()["p1"]["contradictions"], json!([]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_run_matches_sequential() {
        let source = json!([
            {"paper_id": "a", "review_1_full": "x", "review_2_full": "y"},
            {"paper_id": "b", "review_1_full": "x"},
            {"paper_id": "c"},
            {"paper_id": "d", "app_pairing_content": ["x", "y"]}
        ]);

        let mut sequential = PaperDocument::from_value(source.clone()).unwrap();
        Orchestrator::new(&Config::default(), StubAgent::new(REPLY), "Find.".to_string())
            .run(&mut sequential)
            .await
            .unwrap();

        let mut config = Config::default();
        config.concurrency = 4;
        let mut concurrent = PaperDocument::from_value(source).unwrap();
        Orchestrator::new(&config, StubAgent::new(REPLY), "Find.".to_string())
            .run(&mut concurrent)
            .await
            .unwrap();

        assert_eq!(
            sequential.to_pretty_bytes().unwrap(),
            concurrent.to_pretty_bytes().unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_papers_written_back_as_they_finish() {
        let orchestrator =
            Orchestrator::new(&Config::default(), Arc::new(SlowAgent), "Find.".to_string());
        let mut document = PaperDocument::from_value(json!([
            {"paper_id": "p1", "review_1_full": "a"},
            {"paper_id": "p2", "review_1_full": "b"},
            {"paper_id": "p3", "review_1_full": "c"}
        ]))
        .unwrap();

        let report = orchestrator.run(&mut document).await.unwrap();

        let finished: Vec<_> = report
            .paper_results
            .iter()
            .map(|r| (r.paper_id.as_str(), r.finished_at.as_secs()))
            .collect();
        assert_eq!(finished, vec![("p1", 10), ("p2", 20), ("p3", 30)]);
        assert_eq!(report.total_duration.as_secs(), 30);
    }

    #[tokio::test]
    async fn test_rerun_is_byte_identical() {
        let source = json!({"p1": {"review_1_full": "a", "review_2_full": "b"}, "p2": {}});
        let mut outputs = Vec::new();
        for _ in 0..2 {
            let mut document = PaperDocument::from_value(source.clone()).unwrap();
            Orchestrator::new(&Config::default(), StubAgent::new(REPLY), "Find.".to_string())
                .run(&mut document)
                .await
                .unwrap();
            outputs.push(document.to_pretty_bytes().unwrap());
        }
        assert_eq!(outputs[0], outputs[1]);
    }
}
