use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::ErrorKind;


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub key: String,
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, key: impl Into<String>) {
        self.succeeded.push(key.into());
    }

    pub fn record_failure(&mut self, key: impl Into<String>, kind: ErrorKind, message: impl Into<String>) {
        self.failed.push(BatchFailure {
            key: key.into(),
            kind,
            message: message.into(),
        });
    }

    pub fn total_processed(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn failed_keys(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.key.as_str()).collect()
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_processed() == 0 {
            0.0
        } else {
            self.succeeded.len() as f64 / self.total_processed() as f64
        }
    }
}
