//! Subcommand handlers

use crate::provider::OpenAiGenerator;
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use synapsis_core::{generate, GenerateOptions, SynapsisConfig, TextGenerator};
use synapsis_schema::{sanitize, validate_schema};
use synapsis_store::{Cleaner, MapRecord, MapService, MapStore};

/// Arguments of `synapsis generate`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GenerateArgs {
    pub(crate) topic: String,
    pub(crate) output: Option<PathBuf>,
    pub(crate) style: String,
    pub(crate) plan: bool,
    pub(crate) validate: bool,
}

impl GenerateArgs {
    fn options(&self) -> GenerateOptions {
        let mut options = GenerateOptions::new().with_style(self.style.clone());
        if let Some(output) = &self.output {
            options = options.with_output(output.clone());
        }
        if self.plan {
            options = options.with_plan();
        }
        if !self.validate {
            options = options.without_validation();
        }
        options
    }
}

fn generator(config: &SynapsisConfig) -> Result<OpenAiGenerator> {
    let generator =
        OpenAiGenerator::from_config(&config.llm).context("failed to build generation client")?;
    tracing::debug!(
        model = %config.llm.model,
        authenticated = generator.has_api_key(),
        "generation client ready"
    );
    Ok(generator)
}

fn open_store(config: &SynapsisConfig) -> Result<Arc<MapStore>> {
    let data_dir = &config.storage.data_dir;
    let store = MapStore::open(data_dir, config.storage.max_maps)
        .with_context(|| format!("failed to open map store at {}", data_dir.display()))?;
    Ok(Arc::new(store))
}

pub(crate) fn generate_map(config: &SynapsisConfig, args: &GenerateArgs) -> Result<()> {
    let path = run_generate(generator(config)?, args)?;
    println!("{}", path.display());
    Ok(())
}

pub(crate) fn run_generate<G: TextGenerator>(generator: G, args: &GenerateArgs) -> Result<PathBuf> {
    generate(&args.topic, generator, &args.options())
        .with_context(|| format!("failed to generate mind map for '{}'", args.topic))
}

/// File name used for a topic in batch mode
pub(crate) fn batch_file_name(topic: &str) -> String {
    let stem: String = topic
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{stem}_map.html")
}

pub(crate) fn batch(config: &SynapsisConfig, topics: &[String], out_dir: &Path) -> Result<()> {
    let failures = run_batch(&generator(config)?, topics, out_dir);
    if failures > 0 {
        bail!("{failures} of {} topics failed", topics.len());
    }
    Ok(())
}

/// Generate every topic in parallel, printing one line per topic
///
/// Returns the number of failed topics.
pub(crate) fn run_batch<G: TextGenerator + Sync>(
    generator: &G,
    topics: &[String],
    out_dir: &Path,
) -> usize {
    let results: Vec<(String, Result<PathBuf>)> = topics
        .par_iter()
        .map(|topic| {
            let args = GenerateArgs {
                topic: topic.clone(),
                output: Some(out_dir.join(batch_file_name(topic))),
                style: String::new(),
                plan: false,
                validate: true,
            };
            (topic.clone(), run_generate(generator, &args))
        })
        .collect();

    let mut failures = 0;
    for (topic, result) in results {
        match result {
            Ok(path) => println!("ok    {topic}: {}", path.display()),
            Err(e) => {
                failures += 1;
                tracing::error!(topic = %topic, error = %format!("{e:#}"), "batch topic failed");
                println!("error {topic}: {e:#}");
            }
        }
    }
    tracing::info!(total = topics.len(), failures, "batch finished");
    failures
}

pub(crate) fn validate_file(path: &Path) -> Result<()> {
    let raw = read_input(path)?;
    let report = validate_schema(&sanitize(&raw));
    if report.valid {
        println!("valid: {}", path.display());
        return Ok(());
    }
    for error in &report.errors {
        println!("{error}");
    }
    bail!("{} violation(s) in {}", report.errors.len(), path.display());
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub(crate) fn render_file(path: &Path, output: Option<&Path>) -> Result<()> {
    let raw = read_input(path)?;
    let validated = synapsis_schema::clean_and_validate(&raw)
        .with_context(|| format!("{} is not a valid mind map", path.display()))?;
    let written =
        synapsis_render::render_html(&validated, output).context("failed to render mind map")?;
    println!("{}", written.display());
    Ok(())
}

pub(crate) fn maps_create(config: &SynapsisConfig, topic: &str, style: &str) -> Result<()> {
    let service =
        MapService::new(generator(config)?, open_store(config)?, config.limits.max_topic_chars)
            .with_style(style);
    let record = service.create_map(topic)?;
    print_json(&record)
}

pub(crate) fn maps_list(config: &SynapsisConfig, limit: usize) -> Result<()> {
    let records = open_store(config)?.list(limit)?;
    if records.is_empty() {
        println!("no maps stored");
    }
    for record in &records {
        println!("{}", list_line(record));
    }
    Ok(())
}

fn list_line(record: &MapRecord) -> String {
    format!(
        "{}  {}  {:>8}  {}",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M"),
        record.size_bytes,
        record.topic
    )
}

pub(crate) fn maps_show(config: &SynapsisConfig, id: &str) -> Result<()> {
    let record = open_store(config)?
        .get(id)?
        .with_context(|| format!("map not found: {id}"))?;
    print_json(&record)
}

pub(crate) fn maps_delete(config: &SynapsisConfig, id: &str) -> Result<()> {
    if !open_store(config)?.delete(id)? {
        bail!("map not found: {id}");
    }
    println!("deleted {id}");
    Ok(())
}

pub(crate) fn maps_stats(config: &SynapsisConfig) -> Result<()> {
    print_json(&open_store(config)?.stats()?)
}

pub(crate) fn cleanup(config: &SynapsisConfig, once: bool) -> Result<()> {
    let cleaner = Cleaner::new(open_store(config)?, config.storage.retention_days);
    if once {
        for report in cleaner.run_once()? {
            print_json(&report)?;
        }
        return Ok(());
    }

    let interval = Duration::from_secs(config.storage.cleanup_interval_minutes.max(1) * 60);
    let _handle = cleaner.spawn(interval)?;
    tracing::info!(status = ?cleaner.status(), "cleanup running until interrupted");
    loop {
        std::thread::park();
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use synapsis_test_utils::{FailingGenerator, TopicEchoGenerator, VALID_COMPLEX};

    #[test]
    fn batch_names_are_filesystem_safe() {
        assert_eq!(batch_file_name("Machine Learning"), "machine_learning_map.html");
        assert_eq!(batch_file_name(" Rust/Go "), "rust_go_map.html");
        assert_eq!(batch_file_name("C++"), "c___map.html");
    }

    #[test]
    fn batch_generates_every_topic() {
        let dir = tempfile::tempdir().unwrap();
        let topics = vec!["Python".to_string(), "Rust".to_string(), "Go".to_string()];

        let failures = run_batch(&TopicEchoGenerator, &topics, dir.path());

        assert_eq!(failures, 0);
        for name in ["python_map.html", "rust_map.html", "go_map.html"] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
    }

    #[test]
    fn batch_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        let topics = vec!["A".to_string(), "B".to_string()];
        assert_eq!(run_batch(&FailingGenerator::new("offline"), &topics, dir.path()), 2);
    }

    #[test]
    fn generate_args_map_to_options() {
        let args = GenerateArgs {
            topic: "Go".to_string(),
            output: Some(PathBuf::from("go.html")),
            style: "dense".to_string(),
            plan: true,
            validate: false,
        };
        let options = args.options();
        assert_eq!(options.output, Some(PathBuf::from("go.html")));
        assert_eq!(options.style, "dense");
        assert!(options.plan_first);
        assert!(!options.validate);
    }

    #[test]
    fn validate_and_render_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yaml");
        let bad = dir.path().join("bad.yaml");
        fs::write(&good, format!("```yaml\n{VALID_COMPLEX}```\n")).unwrap();
        fs::write(&bad, "children:\n  - 3\n").unwrap();

        assert!(validate_file(&good).is_ok());
        assert!(validate_file(&bad).is_err());

        let output = dir.path().join("good.html");
        render_file(&good, Some(output.as_path())).unwrap();
        assert!(output.exists());
        assert!(render_file(&bad, Some(dir.path().join("bad.html").as_path())).is_err());
    }
}
