//! Subcommand handlers

use clap::ArgMatches;
use std::fmt;
use std::path::{Path, PathBuf};
use stratbook_annotation::{merge_files, MergeError, MergeReport};
use stratbook_config::StratbookConfig;
use stratbook_tags::{
    draft_all, find_drafts, move_drafts, scan_annotations, AnnotationFile, FilterOptions,
    NadeType, Side, Site, TagError, TagStore,
};

/// Anything a subcommand can fail with
#[derive(Debug)]
pub enum CliError {
    Merge(MergeError),
    Tags(TagError),
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Merge(err) => write!(f, "{}", err),
            CliError::Tags(err) => write!(f, "{}", err),
            CliError::Json(err) => write!(f, "Failed to format JSON: {}", err),
        }
    }
}

impl std::error::Error for CliError {}

impl From<MergeError> for CliError {
    fn from(err: MergeError) -> Self {
        CliError::Merge(err)
    }
}

impl From<TagError> for CliError {
    fn from(err: TagError) -> Self {
        CliError::Tags(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Json(err)
    }
}

/// `stratbook merge`
pub fn merge(config: &StratbookConfig, matches: &ArgMatches) -> Result<(), CliError> {
    let inputs: Vec<PathBuf> = matches
        .get_many::<PathBuf>("inputs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let report = merge_files(&inputs, &config.merge.output, config.merge.options())?;

    if matches.get_flag("report") {
        print_report(&inputs, &report);
    }
    println!(
        "Merged {} nodes from {} files into {}",
        report.summary.nodes,
        report.summary.inputs,
        report.output.display()
    );
    Ok(())
}

fn print_report(inputs: &[PathBuf], report: &MergeReport) {
    for node in &report.document.nodes {
        let input = inputs
            .get(node.origin)
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        println!("{} {} -> {}", input, node.old_identifier, node.new_identifier);
    }
}

/// `stratbook scan`
pub fn scan(config: &StratbookConfig, matches: &ArgMatches) -> Result<(), CliError> {
    let dir = matches
        .get_one::<PathBuf>("dir")
        .unwrap_or(&config.library.annotation_path);
    if let Some(drafts_dir) = matches.get_one::<PathBuf>("fold-drafts") {
        return fold_drafts(&config.library.tags_path, drafts_dir, dir);
    }

    let files = scan_annotations(dir)?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&draft_all(&files))?);
        return Ok(());
    }

    if matches.get_flag("update-tags") {
        return update_tags(&config.library.tags_path, &files);
    }

    for file in &files {
        match &file.png_path {
            Some(png) => println!(
                "{}\t{}\t{}",
                file.parent_name,
                file.txt_path.display(),
                png.display()
            ),
            None => println!("{}\t{}", file.parent_name, file.txt_path.display()),
        }
    }
    tracing::info!(dir = %dir.display(), files = files.len(), "scan finished");
    Ok(())
}

fn update_tags(tags_path: &Path, files: &[AnnotationFile]) -> Result<(), CliError> {
    let mut store = TagStore::load(tags_path)?;
    let mut added = 0;
    for draft in draft_all(files) {
        if !draft.has_image() {
            tracing::info!(nade = %draft.nade_name, "no screenshot next to annotation file");
        }
        if store.insert(draft) {
            added += 1;
        }
    }
    store.save(tags_path)?;
    println!("Added {} nades to {}", added, tags_path.display());
    Ok(())
}

fn fold_drafts(tags_path: &Path, drafts_dir: &Path, library: &Path) -> Result<(), CliError> {
    let drafts: Vec<PathBuf> = find_drafts(drafts_dir)?
        .into_iter()
        .filter(|path| path.file_name() != tags_path.file_name())
        .collect();

    let mut store = TagStore::load(tags_path)?;
    let added = store.merge_files(drafts.as_slice())?;
    store.save(tags_path)?;
    move_drafts(library, drafts.as_slice())?;

    println!(
        "Folded {} drafts into {} ({} new)",
        drafts.len(),
        tags_path.display(),
        added
    );
    Ok(())
}

/// `stratbook select`
pub fn select(config: &StratbookConfig, matches: &ArgMatches) -> Result<(), CliError> {
    let store = TagStore::load(&config.library.tags_path)?;

    let map = matches
        .get_one::<String>("map")
        .map(String::as_str)
        .unwrap_or_default();
    let mut options = FilterOptions::for_map(map);
    for side in matches.get_many::<Side>("side").into_iter().flatten() {
        options = options.with_side(*side);
    }
    for nade_type in matches.get_many::<NadeType>("type").into_iter().flatten() {
        options = options.with_type(*nade_type);
    }
    for site in matches.get_many::<Site>("site").into_iter().flatten() {
        options = options.with_site(*site);
    }

    let paths = store.paths_for(&options);
    if paths.is_empty() {
        tracing::warn!(map = %map, "no tagged nades match");
    }
    for path in paths {
        println!("{}", path.display());
    }
    Ok(())
}
