//! Command-line interface for stratbook
//! Merges map annotation files and manages the tagged annotation library they come from.
//!
//! Usage:
//!   stratbook merge `<input>` `<input>`... [-o `<output>`]   - Merge annotation files into one
//!   stratbook scan [`<dir>`] [--json | --update-tags]       - List or tag annotation files
//!   stratbook scan [`<dir>`] --fold-drafts `<drafts>`        - Fold saved drafts into the tag file
//!   stratbook select --map `<map>` [--side|--type|--site]  - Print paths of matching nades

mod commands;

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use stratbook_config::{Loader, StratbookConfig, LOCAL_CONFIG_FILE};
use stratbook_tags::{NadeType, Side, Site};

fn main() {
    let matches = build_cli().get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    init_tracing(&matches, &config);

    let result = match matches.subcommand() {
        Some(("merge", sub)) => commands::merge(&config, sub),
        Some(("scan", sub)) => commands::scan(&config, sub),
        Some(("select", sub)) => commands::select(&config, sub),
        _ => unreachable!("clap requires a subcommand"),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build_cli() -> Command {
    Command::new("stratbook")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Merge CS2 map annotation files and organise the nades they describe")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Configuration file layered over ./stratbook.toml and the defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .help("Log progress to stderr (honours RUST_LOG)"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Disable logging"),
        )
        .subcommand(
            Command::new("merge")
                .about("Merge annotation files into one, renumbering their nodes")
                .arg(
                    Arg::new("inputs")
                        .help("Annotation files, merged in the order given")
                        .value_name("INPUT")
                        .required(true)
                        .num_args(2..)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("PATH")
                        .help("Where to write the merged file (default: merged.txt)"),
                )
                .arg(
                    Arg::new("policy")
                        .long("policy")
                        .value_parser(["sequential", "append-after-base"])
                        .help("How new node identifiers are chosen"),
                )
                .arg(
                    Arg::new("boundary")
                        .long("boundary")
                        .value_parser(["lexical", "digit"])
                        .help("Which numbers inside node bodies count as references"),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .action(ArgAction::SetTrue)
                        .help("Print the old -> new identifier of every node"),
                ),
        )
        .subcommand(
            Command::new("scan")
                .about("List annotation files in a library directory")
                .arg(
                    Arg::new("dir")
                        .help("Library directory (default: library.annotation_path)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print draft tags as JSON instead of a file list"),
                )
                .arg(
                    Arg::new("update-tags")
                        .long("update-tags")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("json")
                        .help("Add drafts for untagged nades to the tag file"),
                )
                .arg(
                    Arg::new("fold-drafts")
                        .long("fold-drafts")
                        .value_name("DIR")
                        .value_parser(clap::value_parser!(PathBuf))
                        .conflicts_with_all(["json", "update-tags"])
                        .help("Fold <nade>.json drafts from DIR into the tag file"),
                )
                .arg(tags_arg()),
        )
        .subcommand(
            Command::new("select")
                .about("Print the annotation files of tagged nades matching the filters")
                .arg(tags_arg())
                .arg(
                    Arg::new("map")
                        .long("map")
                        .short('m')
                        .required(true)
                        .help("Map name, e.g. de_mirage"),
                )
                .arg(
                    Arg::new("side")
                        .long("side")
                        .action(ArgAction::Append)
                        .value_parser(|s: &str| s.parse::<Side>())
                        .help("T or CT; repeat to allow several"),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .action(ArgAction::Append)
                        .value_parser(|s: &str| s.parse::<NadeType>())
                        .help("smoke, flash, molotov or he_grenade; repeat to allow several"),
                )
                .arg(
                    Arg::new("site")
                        .long("site")
                        .action(ArgAction::Append)
                        .value_parser(|s: &str| s.parse::<Site>())
                        .help("A, B or Mid; repeat to allow several"),
                ),
        )
}

fn tags_arg() -> Arg {
    Arg::new("tags")
        .long("tags")
        .value_name("PATH")
        .help("Tag file (default: library.tags_path)")
}

/// Defaults, then ./stratbook.toml, then --config, then flags of the chosen subcommand.
fn load_config(matches: &ArgMatches) -> Result<StratbookConfig, stratbook_config::ConfigError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }

    let overrides: &[(&str, &str)] = match matches.subcommand() {
        Some(("merge", _)) => &[
            ("output", "merge.output"),
            ("policy", "merge.policy"),
            ("boundary", "merge.boundary"),
        ],
        Some(("scan", _)) | Some(("select", _)) => &[("tags", "library.tags_path")],
        _ => &[],
    };
    if let Some((_, sub)) = matches.subcommand() {
        for (arg, key) in overrides {
            if let Some(value) = sub.get_one::<String>(arg) {
                loader = loader.set_override(key, value.as_str())?;
            }
        }
    }

    loader.build()
}

fn init_tracing(matches: &ArgMatches, config: &StratbookConfig) {
    let filter = if matches.get_flag("quiet") {
        tracing_subscriber::EnvFilter::new("off")
    } else if matches.get_flag("verbose") {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::try_new(&config.logging.level)
            .unwrap_or_else(|_| "warn".into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
