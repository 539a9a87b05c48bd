use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::process::Stdio;
use std::time::Duration;
use strum::{Display, IntoStaticStr};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{CollectStrategy, CollectTarget, ContentProvenance, StrategyError};
use crate::core::config::RolodexConfig;
use crate::models::Platform;

const TEXT_FIELDS: [&str; 4] = ["rawContent", "content", "text", "full_text"];


#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScrapeVariant {
    Profile,
    Search,
    Window,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeCommand {
    pub variant: ScrapeVariant,
    pub program: String,
    pub args: Vec<String>,
}

impl ScrapeCommand {
    pub fn defaults(program: &str) -> Vec<Self> {
        let base = ["--jsonl", "--max-results", "{limit}"];
        let command = |variant, tail: &[&str]| Self {
            variant,
            program: program.to_string(),
            args: base.iter().chain(tail).map(|s| s.to_string()).collect(),
        };
        vec![
            command(ScrapeVariant::Profile, &["twitter-user", "{handle}"]),
            command(ScrapeVariant::Search, &["twitter-search", "from:{handle}"]),
            command(ScrapeVariant::Window, &["twitter-search", "from:{handle} since:{since}"]),
        ]
    }

    pub fn render_args(&self, handle: &str, limit: usize, since: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{handle}", handle)
                    .replace("{limit}", &limit.to_string())
                    .replace("{since}", since)
            })
            .collect()
    }
}


pub struct ScrapeStrategy {
    name: String,
    command: ScrapeCommand,
    timeout: Duration,
    max_output_bytes: usize,
    max_results: usize,
    window_days: i64,
}

impl ScrapeStrategy {
    pub fn new(
        command: ScrapeCommand,
        timeout: Duration,
        max_output_bytes: usize,
        max_results: usize,
        window_days: i64,
    ) -> Self {
        Self {
            name: format!("scrape:{}", command.variant),
            command,
            timeout,
            max_output_bytes,
            max_results,
            window_days,
        }
    }

    pub fn from_config(command: ScrapeCommand, config: &RolodexConfig) -> Self {
        Self::new(
            command,
            config.scrape_timeout(),
            config.scrape_max_output_bytes,
            config.scrape_max_results,
            config.scrape_window_days,
        )
    }

    fn since(&self) -> String {
        (Utc::now() - ChronoDuration::days(self.window_days))
            .format("%Y-%m-%d")
            .to_string()
    }

    async fn run(&self, args: &[String]) -> Result<Vec<u8>, StrategyError> {
        let mut child = Command::new(&self.command.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| StrategyError::Transient(format!("spawn {} failed: {e}", self.command.program)))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| StrategyError::Transient("stdout not captured".to_string()))?;

        let cap = self.max_output_bytes;
        let output = async {
            let mut buf = Vec::new();
            (&mut stdout).take(cap as u64).read_to_end(&mut buf).await?;
            if buf.len() >= cap {
                debug!("{} output reached {} byte cap, stopping process", self.name, cap);
                let _ = child.start_kill();
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, buf))
        };

        let (status, buf) = match tokio::time::timeout(self.timeout, output).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => return Err(StrategyError::Transient(format!("io error: {e}"))),
            Err(_) => {
                return Err(StrategyError::Transient(format!(
                    "timed out after {:?}",
                    self.timeout
                )));
            }
        };

        if !status.success() && buf.len() < cap {
            if buf.is_empty() {
                return Err(StrategyError::Transient(format!("exited with {status}")));
            }
            debug!("{} exited with {} but produced output; keeping partial results", self.name, status);
        }

        Ok(buf)
    }
}

#[async_trait]
impl CollectStrategy for ScrapeStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn provenance(&self) -> ContentProvenance {
        ContentProvenance::Scrape
    }

    async fn attempt(&self, target: &CollectTarget) -> Result<Vec<String>, StrategyError> {
        if target.platform != Platform::Twitter {
            debug!("{} does not support platform {}", self.name, target.platform);
            return Ok(Vec::new());
        }

        let args = self.command.render_args(&target.handle, self.max_results, &self.since());
        debug!("Running {} {}", self.command.program, args.join(" "));

        let output = self.run(&args).await?;
        let snippets = parse_jsonl_snippets(&String::from_utf8_lossy(&output), self.max_results);
        Ok(snippets)
    }
}

pub fn parse_jsonl_snippets(output: &str, limit: usize) -> Vec<String> {
    let mut snippets: Vec<String> = Vec::new();
    let mut skipped = 0usize;

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if snippets.len() >= limit {
            break;
        }
        let record: Value = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        let text = TEXT_FIELDS
            .iter()
            .filter_map(|field| record.get(field).and_then(Value::as_str))
            .map(str::trim)
            .find(|t| !t.is_empty());

        match text {
            Some(text) if !snippets.iter().any(|s| s == text) => snippets.push(text.to_string()),
            Some(_) => {}
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed scrape lines", skipped);
    }
    snippets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_variants_in_priority_order() {
        let commands = ScrapeCommand::defaults("snscrape");
        let variants: Vec<_> = commands.iter().map(|c| c.variant).collect();
        assert_eq!(
            variants,
            vec![ScrapeVariant::Profile, ScrapeVariant::Search, ScrapeVariant::Window]
        );
    }

    #[test]
    fn test_render_args() {
        let window = &ScrapeCommand::defaults("snscrape")[2];
        let args = window.render_args("alice", 25, "2024-01-01");
        assert_eq!(
            args,
            vec![
                "--jsonl",
                "--max-results",
                "25",
                "twitter-search",
                "from:alice since:2024-01-01"
            ]
        );
    }

    #[test]
    fn test_parse_jsonl_skips_bad_lines() {
        let output = r#"{"rawContent": "first post"}
not json
{"content": "second post"}
{"id": 42}
{"text": "first post"}

{"full_text": "  third post  "}
{"rawContent": "#;
        let snippets = parse_jsonl_snippets(output, 10);
        assert_eq!(snippets, vec!["first post", "second post", "third post"]);
    }

    #[test]
    fn test_parse_jsonl_respects_limit() {
        let output = (0..10)
            .map(|i| format!(r#"{{"text": "post {i}"}}"#))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_jsonl_snippets(&output, 3).len(), 3);
    }

    #[tokio::test]
    async fn test_missing_program_is_transient() {
        let command = ScrapeCommand {
            variant: ScrapeVariant::Profile,
            program: "definitely-not-a-real-scraper-binary".to_string(),
            args: vec!["{handle}".to_string()],
        };
        let strategy = ScrapeStrategy::new(command, Duration::from_secs(5), 1024, 10, 30);
        let target = CollectTarget::parse("twitter:alice").unwrap();
        let err = strategy.attempt(&target).await.unwrap_err();
        assert!(matches!(err, StrategyError::Transient(_)));
    }

    #[tokio::test]
    async fn test_other_platforms_yield_nothing() {
        let strategy = ScrapeStrategy::new(
            ScrapeCommand::defaults("snscrape").remove(0),
            Duration::from_secs(5),
            1024,
            10,
            30,
        );
        let target = CollectTarget::parse("bluesky:alice").unwrap();
        assert!(strategy.attempt(&target).await.unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_process_and_parses_output() {
        let command = ScrapeCommand {
            variant: ScrapeVariant::Profile,
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                r#"printf '{"rawContent":"hello from {handle}"}\nbroken\n'"#.to_string(),
            ],
        };
        let strategy = ScrapeStrategy::new(command, Duration::from_secs(5), 4096, 10, 30);
        let target = CollectTarget::parse("twitter:alice").unwrap();
        let snippets = strategy.attempt(&target).await.unwrap();
        assert_eq!(snippets, vec!["hello from alice"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_output_cap_stops_endless_writer() {
        let command = ScrapeCommand {
            variant: ScrapeVariant::Profile,
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                r#"i=0; while true; do i=$((i+1)); echo "{\"text\": \"post $i\"}"; done"#.to_string(),
            ],
        };
        let strategy = ScrapeStrategy::new(command, Duration::from_secs(10), 200, 100, 30);
        let target = CollectTarget::parse("twitter:alice").unwrap();

        let snippets = strategy.attempt(&target).await.unwrap();

        assert!(!snippets.is_empty());
        assert!(snippets.len() <= 200 / 19);
        for (index, snippet) in snippets.iter().enumerate() {
            assert_eq!(snippet, &format!("post {}", index + 1));
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_is_transient() {
        let command = ScrapeCommand {
            variant: ScrapeVariant::Profile,
            program: "sleep".to_string(),
            args: vec!["5".to_string()],
        };
        let strategy = ScrapeStrategy::new(command, Duration::from_millis(100), 1024, 10, 30);
        let target = CollectTarget::parse("twitter:alice").unwrap();
        let err = strategy.attempt(&target).await.unwrap_err();
        assert!(matches!(err, StrategyError::Transient(ref m) if m.contains("timed out")));
    }
}
