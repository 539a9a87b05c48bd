use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info};

use super::models::BatchReport;
use super::Pipeline;

impl Pipeline {
    pub async fn batch_enrich<S: AsRef<str>>(&self, keys: &[S]) -> BatchReport {
        let mut report = BatchReport::new();
        report.started_at = Some(Utc::now());

        info!("Starting batch enrichment: {} people", keys.len());

        for (index, key) in keys.iter().enumerate() {
            let key = key.as_ref();
            info!("Enriching {}/{}: {}", index + 1, keys.len(), key);

            match self.collect_and_enrich(key).await {
                Ok(_) => report.record_success(key),
                Err(e) => {
                    error!("Enrichment failed for {} ({}): {}", key, e.kind(), e);
                    report.record_failure(key, e.kind(), e.to_string());
                }
            }

            if index + 1 < keys.len() && !self.batch_delay.is_zero() {
                sleep(self.batch_delay).await;
            }
        }

        report.completed_at = Some(Utc::now());

        info!(
            "Batch complete: {} processed, {} succeeded, {} failed (success rate: {:.1}%)",
            report.total_processed(),
            report.succeeded.len(),
            report.failed.len(),
            report.success_rate() * 100.0
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::core::error::ErrorKind;
    use crate::store::PersonStore;
    use crate::testing::{offline_pipeline, FailingStore, FixedStrategy};

    #[tokio::test]
    async fn test_persistence_failure_does_not_stop_batch() {
        let store = Arc::new(FailingStore::rejecting(&["twitter:p3"]));
        let pipeline = offline_pipeline(
            vec![Box::new(FixedStrategy::snippets("scrape:profile", &["shipping rust code"]))],
            store.clone(),
        );
        let keys = ["twitter:p1", "twitter:p2", "twitter:p3", "twitter:p4", "twitter:p5"];

        let report = pipeline.batch_enrich(&keys[..]).await;

        assert_eq!(report.total_processed(), 5);
        assert_eq!(report.succeeded, vec!["twitter:p1", "twitter:p2", "twitter:p4", "twitter:p5"]);
        assert_eq!(report.failed_keys(), vec!["twitter:p3"]);
        assert_eq!(report.failed[0].kind, ErrorKind::Persistence);
        assert_eq!(report.success_rate(), 0.8);
        assert!(report.completed_at >= report.started_at);

        assert!(store.get("twitter:p5").await.unwrap().unwrap().profile.is_some());
    }

    #[tokio::test]
    async fn test_mixed_failure_kinds() {
        let pipeline = offline_pipeline(
            vec![Box::new(FixedStrategy::empty("scrape:profile"))],
            Arc::new(crate::store::MemoryStore::new()),
        );
        let keys = vec!["twitter:nobody".to_string(), "not a key".to_string()];

        let report = pipeline.batch_enrich(&keys[..]).await;
        assert!(report.succeeded.is_empty());
        let kinds: Vec<ErrorKind> = report.failed.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![ErrorKind::NoContent, ErrorKind::Validation]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_courtesy_delay_between_items_only() {
        let store = Arc::new(crate::store::MemoryStore::new());
        let pipeline = offline_pipeline(
            vec![Box::new(FixedStrategy::snippets("scrape:profile", &["hello"]))],
            store,
        )
        .with_batch_delay(Duration::from_secs(3));

        let started = tokio::time::Instant::now();
        let keys = ["twitter:a", "twitter:b", "twitter:c"];
        let report = pipeline.batch_enrich(&keys[..]).await;
        assert_eq!(report.succeeded.len(), 3);
        assert!(started.elapsed() >= Duration::from_secs(6));
        assert!(started.elapsed() < Duration::from_secs(9));
    }
}
