//! Parallel batch screening

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::screener::{ScreeningOutcome, Screener};

/// One name/article pair to screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningJob {
    /// Caller-chosen identifier, echoed in the result
    pub id: String,
    pub full_name: String,
    pub article_text: String,
}

impl ScreeningJob {
    pub fn new(id: impl Into<String>, full_name: impl Into<String>, article_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            article_text: article_text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub id: String,
    pub outcome: ScreeningOutcome,
}

/// Screen every job in parallel. Results come back in job order.
pub fn screen_batch(screener: &Screener<'_>, jobs: &[ScreeningJob]) -> Vec<BatchResult> {
    tracing::info!(jobs = jobs.len(), "screening batch");
    jobs.par_iter()
        .map(|job| BatchResult {
            id: job.id.clone(),
            outcome: screener.screen(&job.full_name, &job.article_text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_preserves_order() {
        let jobs: Vec<ScreeningJob> = (0..32)
            .map(|i| {
                let article = if i % 2 == 0 {
                    "John Smith was arrested."
                } else {
                    "Jane Doe was elected."
                };
                ScreeningJob::new(format!("job-{i}"), "John Smith", article)
            })
            .collect();

        let results = screen_batch(&Screener::new(), &jobs);
        assert_eq!(results.len(), 32);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.id, format!("job-{i}"));
            assert_eq!(result.outcome.decision.matched, i % 2 == 0);
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(screen_batch(&Screener::new(), &[]).is_empty());
    }

    #[test]
    fn test_batch_matches_sequential() {
        let screener = Screener::new();
        let jobs = vec![
            ScreeningJob::new("a", "Michael Brown", "Michelle Brown won the award."),
            ScreeningJob::new("b", "William Johnson", "Bill Johnson retired."),
        ];
        let results = screen_batch(&screener, &jobs);
        for (job, result) in jobs.iter().zip(&results) {
            assert_eq!(result.outcome, screener.screen(&job.full_name, &job.article_text));
        }
    }
}
