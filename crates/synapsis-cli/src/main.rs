//! Synapsis command line
//!
//! Generates mind maps through an OpenAI-compatible backend, validates and
//! renders hand-written map files, and manages the stored map collection.

mod commands;
mod logging;
mod provider;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::GenerateArgs;
use logging::LogFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use synapsis_core::SynapsisConfig;
use synapsis_store::DEFAULT_LIST_LIMIT;

fn build_cli() -> Command {
    Command::new("synapsis")
        .version(synapsis_core::VERSION)
        .about("Turn a topic into a validated, navigable mind map")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML config file"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(value_parser!(LogFormat))
                .help("Log output format: text or json"),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate a mind map for one topic")
                .arg(Arg::new("topic").required(true).help("Topic to map"))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Artifact path (default: ./mindmap.html)"),
                )
                .arg(Arg::new("style").long("style").help("Style hint for the expander"))
                .arg(
                    Arg::new("plan")
                        .long("plan")
                        .action(ArgAction::SetTrue)
                        .help("Run a planning pass before expansion"),
                )
                .arg(
                    Arg::new("no-validate")
                        .long("no-validate")
                        .action(ArgAction::SetTrue)
                        .help("Render the raw expansion without validation"),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("Generate mind maps for several topics in parallel")
                .arg(
                    Arg::new("topics")
                        .required(true)
                        .num_args(1..)
                        .help("Topics to map"),
                )
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .default_value("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory for the artifacts"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a mind-map YAML file against the tree schema")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Validate a mind-map YAML file and render it to HTML")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Artifact path (default: ./mindmap.html)"),
                ),
        )
        .subcommand(
            Command::new("maps")
                .about("Manage stored mind maps")
                .subcommand_required(true)
                .subcommand(
                    Command::new("create")
                        .about("Generate a map into the data directory")
                        .arg(Arg::new("topic").required(true))
                        .arg(Arg::new("style").long("style").help("Style hint for the expander")),
                )
                .subcommand(
                    Command::new("list").about("List stored maps, newest first").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize))
                            .help("Maximum number of records (default 50)"),
                    ),
                )
                .subcommand(
                    Command::new("show")
                        .about("Show one map record")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a map and its artifact")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(Command::new("stats").about("Storage usage summary")),
        )
        .subcommand(
            Command::new("cleanup")
                .about("Purge expired and orphaned maps")
                .arg(
                    Arg::new("once")
                        .long("once")
                        .action(ArgAction::SetTrue)
                        .help("Run one pass and exit instead of running periodically"),
                ),
        )
}

fn generate_args(args: &ArgMatches) -> GenerateArgs {
    GenerateArgs {
        topic: args.get_one::<String>("topic").cloned().unwrap_or_default(),
        output: args.get_one::<PathBuf>("output").cloned(),
        style: args.get_one::<String>("style").cloned().unwrap_or_default(),
        plan: args.get_flag("plan"),
        validate: !args.get_flag("no-validate"),
    }
}

fn string_arg<'a>(args: &'a ArgMatches, id: &str) -> &'a str {
    args.get_one::<String>(id).map_or("", String::as_str)
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let config = SynapsisConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    match matches.subcommand() {
        Some(("generate", args)) => commands::generate_map(&config, &generate_args(args)),
        Some(("batch", args)) => {
            let topics: Vec<String> = args
                .get_many::<String>("topics")
                .unwrap_or_default()
                .cloned()
                .collect();
            let out_dir = args
                .get_one::<PathBuf>("out-dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("output"));
            commands::batch(&config, &topics, &out_dir)
        }
        Some(("validate", args)) => match args.get_one::<PathBuf>("file") {
            Some(file) => commands::validate_file(file),
            None => anyhow::bail!("missing file"),
        },
        Some(("render", args)) => match args.get_one::<PathBuf>("file") {
            Some(file) => {
                let output = args.get_one::<PathBuf>("output").map(PathBuf::as_path);
                commands::render_file(file, output)
            }
            None => anyhow::bail!("missing file"),
        },
        Some(("maps", maps)) => match maps.subcommand() {
            Some(("create", args)) => commands::maps_create(
                &config,
                string_arg(args, "topic"),
                string_arg(args, "style"),
            ),
            Some(("list", args)) => {
                let limit = args.get_one::<usize>("limit").copied().unwrap_or(DEFAULT_LIST_LIMIT);
                commands::maps_list(&config, limit)
            }
            Some(("show", args)) => commands::maps_show(&config, string_arg(args, "id")),
            Some(("delete", args)) => commands::maps_delete(&config, string_arg(args, "id")),
            Some(("stats", _)) => commands::maps_stats(&config),
            _ => anyhow::bail!("unknown maps subcommand"),
        },
        Some(("cleanup", args)) => commands::cleanup(&config, args.get_flag("once")),
        _ => anyhow::bail!("unknown subcommand"),
    }
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    logging::init(matches.get_one::<LogFormat>("log-format").copied().unwrap_or_default());

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> ArgMatches {
        build_cli().try_get_matches_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn parses_generate_flags() {
        let matches = parse(&[
            "synapsis",
            "generate",
            "Machine Learning",
            "-o",
            "ml.html",
            "--style",
            "dense",
            "--plan",
            "--no-validate",
        ]);
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "generate");
        assert_eq!(
            generate_args(args),
            GenerateArgs {
                topic: "Machine Learning".to_string(),
                output: Some(PathBuf::from("ml.html")),
                style: "dense".to_string(),
                plan: true,
                validate: false,
            }
        );
    }

    #[test]
    fn generate_defaults() {
        let matches = parse(&["synapsis", "generate", "Go"]);
        let args = generate_args(matches.subcommand_matches("generate").unwrap());
        assert_eq!(args.output, None);
        assert_eq!(args.style, "");
        assert!(args.validate);
        assert!(!args.plan);
    }

    #[test]
    fn parses_batch_topics() {
        let matches = parse(&["synapsis", "batch", "Python", "Rust", "--out-dir", "maps"]);
        let args = matches.subcommand_matches("batch").unwrap();
        let topics: Vec<&String> = args.get_many::<String>("topics").unwrap().collect();
        assert_eq!(topics, vec!["Python", "Rust"]);
        assert_eq!(args.get_one::<PathBuf>("out-dir"), Some(&PathBuf::from("maps")));
    }

    #[test]
    fn global_options_after_subcommand() {
        let matches = parse(&[
            "synapsis",
            "maps",
            "list",
            "--limit",
            "5",
            "--log-format",
            "json",
            "--config",
            "s.toml",
        ]);
        assert_eq!(matches.get_one::<LogFormat>("log-format"), Some(&LogFormat::Json));
        assert_eq!(matches.get_one::<PathBuf>("config"), Some(&PathBuf::from("s.toml")));
        let list = matches
            .subcommand_matches("maps")
            .unwrap()
            .subcommand_matches("list")
            .unwrap();
        assert_eq!(list.get_one::<usize>("limit"), Some(&5));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(build_cli().try_get_matches_from(["synapsis", "generate"]).is_err());
        assert!(build_cli().try_get_matches_from(["synapsis", "maps"]).is_err());
        assert!(build_cli()
            .try_get_matches_from(["synapsis", "validate", "x.yaml", "--log-format", "xml"])
            .is_err());
    }

    #[test]
    fn cleanup_once_flag() {
        let matches = parse(&["synapsis", "cleanup", "--once"]);
        assert!(matches.subcommand_matches("cleanup").unwrap().get_flag("once"));
    }
}
