//! Command-line parsing and dispatch
//!
//! Order of work within one invocation: validate (if requested), then at most
//! one materialization selection, then export (if requested).

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use lazer_link_core::{
    default_lazer_path, export, materialize_difference, read_replay_md5, BeatmapRef, Catalog,
    CatalogStore, Config, Error, ExportFormat, LinkMode, MaterializeOutcome, ProjectionResult,
    Session, ValidationReport,
};
use tracing::info;

/// Which beatmap sets to materialize
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every set in the catalog
    All,
    /// Sets missing from a reference catalog
    Difference(PathBuf),
    /// The set owning the beatmap with this online ID
    BeatmapId(i64),
    /// The set owning the beatmap with this MD5 hash
    Md5(String),
    /// The set owning the beatmap a replay was played on
    Replay(PathBuf),
}

/// Parsed command-line options
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub lazer_path: Option<PathBuf>,
    pub out_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub selection: Option<Selection>,
    pub copy: bool,
    pub validate: bool,
    pub export: Option<ExportFormat>,
    pub export_out: Option<PathBuf>,
    pub save_config: bool,
    pub quiet: bool,
}

impl CliOptions {
    fn needs_session(&self) -> bool {
        self.validate || self.selection.is_some()
    }

    fn wants_export(&self) -> bool {
        self.export.is_some() || self.export_out.is_some()
    }

    fn needs_catalog(&self) -> bool {
        self.selection.is_some() || self.wants_export()
    }

    /// Export format to use, if any: `--export`, else the configured
    /// default when only `--export-out` was given
    fn export_format(&self, config: &Config) -> Option<ExportFormat> {
        match (self.export, &self.export_out) {
            (Some(format), _) => Some(format),
            (None, Some(_)) => Some(config.export_format),
            (None, None) => None,
        }
    }

    fn link_mode(&self, config: &Config) -> LinkMode {
        if self.copy {
            LinkMode::Copy
        } else {
            config.link_mode
        }
    }

    /// Copy the paths and modes given on the command line into `config`
    fn apply_to(&self, config: &mut Config) {
        if let Some(ref path) = self.lazer_path {
            config.lazer_path = Some(absolute(path));
        }
        if let Some(ref path) = self.out_path {
            config.output_path = Some(absolute(path));
        }
        if self.copy {
            config.link_mode = LinkMode::Copy;
        }
        if let Some(format) = self.export {
            config.export_format = format;
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Parse CLI arguments (without the program name)
pub fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut selections = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-d" | "--dir" => options.lazer_path = Some(path_value(args, &mut i, arg)?),
            "-o" | "--out" => options.out_path = Some(path_value(args, &mut i, arg)?),
            "-k" | "--catalog" => options.catalog_path = Some(path_value(args, &mut i, arg)?),
            "-r" | "--replay" => selections.push(Selection::Replay(path_value(args, &mut i, arg)?)),
            "-m" | "--md5" => {
                let md5 = value(args, &mut i, arg)?;
                selections.push(Selection::Md5(md5.to_string()));
            }
            "-i" | "--id" => {
                let raw = value(args, &mut i, arg)?;
                let id = raw
                    .parse::<i64>()
                    .map_err(|_| format!("Invalid beatmap ID: {}", raw))?;
                selections.push(Selection::BeatmapId(id));
            }
            "--diff" => selections.push(Selection::Difference(path_value(args, &mut i, arg)?)),
            "-a" | "--all" => selections.push(Selection::All),
            "-c" | "--copy" => options.copy = true,
            "-v" | "--validate" => options.validate = true,
            "-q" | "--quiet" => options.quiet = true,
            "--save-config" => options.save_config = true,
            "-e" | "--export" => {
                let raw = value(args, &mut i, arg)?;
                options.export = Some(raw.parse::<ExportFormat>().map_err(|e| e.to_string())?);
            }
            "--export-out" => options.export_out = Some(path_value(args, &mut i, arg)?),
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
        i += 1;
    }

    if selections.len() > 1 {
        return Err("Choose only one of --all, --diff, --id, --md5 or --replay".to_string());
    }
    options.selection = selections.pop();

    if !options.needs_session() && !options.wants_export() && !options.save_config {
        return Err("Nothing to do; see --help".to_string());
    }
    if options.needs_catalog() && options.catalog_path.is_none() {
        return Err("--catalog is required to read beatmap sets".to_string());
    }

    Ok(options)
}

fn path_value(args: &[String], i: &mut usize, flag: &str) -> Result<PathBuf, String> {
    value(args, i, flag).map(PathBuf::from)
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires a value", flag))
}

/// Run the parsed command
pub fn run(options: CliOptions) -> anyhow::Result<()> {
    let mut config = Config::load();

    if options.save_config {
        options.apply_to(&mut config);
        let path = config.save().context("Failed to save configuration")?;
        eprintln!("Saved configuration to {}", path.display());
    }

    let catalog = match options.catalog_path {
        Some(ref path) if options.needs_catalog() => Some(
            Catalog::load(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        ),
        _ => None,
    };

    if options.needs_session() {
        let lazer_path = options
            .lazer_path
            .clone()
            .or_else(|| config.lazer_path.clone())
            .or_else(default_lazer_path)
            .ok_or_else(|| anyhow!("osu!lazer path not configured; pass --dir"))?;
        let out_path = options
            .out_path
            .clone()
            .or_else(|| config.output_path.clone())
            .ok_or_else(|| anyhow!("Output directory not configured; pass --out"))?;

        let session = Session::open(&lazer_path, &out_path)?;

        if options.validate {
            let report = session.validator().validate()?;
            print_validation_report(&report);
        }

        if let (Some(selection), Some(catalog)) = (&options.selection, &catalog) {
            let mode = options.link_mode(&config);
            let result = materialize(&session, mode, catalog, selection)?;
            print_projection_result(&result);
            if !result.is_success() {
                bail!("{} beatmap set(s) failed", result.failed);
            }
        }
    }

    if let (Some(format), Some(catalog)) = (options.export_format(&config), &catalog) {
        export(catalog, format, options.export_out.as_deref())?;
    }

    Ok(())
}

fn materialize(
    session: &Session,
    mode: LinkMode,
    catalog: &Catalog,
    selection: &Selection,
) -> anyhow::Result<ProjectionResult> {
    let projector = session.projector(mode);
    info!("Materializing into {} ({})", projector.output_root().display(), mode);

    let found = match selection {
        Selection::All => return Ok(projector.materialize_all(catalog)),
        Selection::Difference(reference_path) => {
            let reference = Catalog::load(reference_path).with_context(|| {
                format!("Failed to load reference catalog {}", reference_path.display())
            })?;
            return Ok(materialize_difference(&projector, catalog, &reference));
        }
        Selection::BeatmapId(id) => catalog
            .find_by_online_id(*id)
            .ok_or_else(|| Error::BeatmapNotFound(format!("beatmap online ID {}", id)))?,
        Selection::Md5(md5) => find_md5(catalog, md5)?,
        Selection::Replay(path) => {
            let md5 = read_replay_md5(path)?;
            info!("Replay {} was played on {}", path.display(), md5);
            find_md5(catalog, &md5)?
        }
    };

    let mut result = ProjectionResult::default();
    let outcome = projector.materialize(found.set);
    if let Ok(MaterializeOutcome::Skipped) = outcome {
        eprintln!("{} already exists", projector.set_dir(found.set).display());
    }
    result.record(found.set.online_id, outcome);
    Ok(result)
}

fn find_md5<'c>(catalog: &'c Catalog, md5: &str) -> Result<BeatmapRef<'c>, Error> {
    catalog
        .find_by_md5(md5)
        .ok_or_else(|| Error::BeatmapNotFound(format!("beatmap MD5 {}", md5)))
}

fn print_validation_report(report: &ValidationReport) {
    eprintln!("Validation Complete:");
    eprintln!("  Links checked:       {}", report.links_checked);
    eprintln!("  Dangling removed:    {}", report.removed_links.len());
    eprintln!("  Empty dirs removed:  {}", report.removed_dirs.len());
}

fn print_projection_result(result: &ProjectionResult) {
    eprintln!("Projection Complete:");
    eprintln!("  Created: {}", result.created);
    eprintln!("  Skipped: {}", result.skipped);
    eprintln!("  Failed:  {}", result.failed);
    eprintln!("  Files:   {}", result.files);

    if !result.errors.is_empty() {
        eprintln!();
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("  - [{}] {}", error.online_id, error.message);
        }
    }
}

/// Print CLI help
pub fn print_help() {
    println!("lazer-link v{}", env!("CARGO_PKG_VERSION"));
    println!("Symlink or copy osu!lazer beatmap files into one folder per beatmap set");
    println!();
    println!("USAGE:");
    println!("    lazer-link [OPTIONS]");
    println!();
    println!("SOURCES:");
    println!("    -d, --dir <path>            osu!lazer data directory (default: detected)");
    println!("    -k, --catalog <file>        Catalog export (JSON or binary) to read sets from");
    println!("    -o, --out <path>            Output directory");
    println!();
    println!("SELECTION (pick one):");
    println!("    -a, --all                   Link every beatmap set");
    println!("        --diff <file>           Link sets missing from a reference catalog");
    println!("    -i, --id <id>               Link the set of a beatmap online ID (not set ID)");
    println!("    -m, --md5 <hash>            Link the set of a beatmap MD5 hash");
    println!("    -r, --replay <file>         Link the set a replay (.osr) was played on");
    println!();
    println!("OPTIONS:");
    println!("    -c, --copy                  Copy files instead of creating symlinks");
    println!("    -v, --validate              Remove dangling links and empty directories first");
    println!("    -e, --export <format>       Export format: json, json-pretty, binary1, binary2");
    println!("        --export-out <file>     Export target (default: stdout); alone, uses the");
    println!("                                configured format");
    println!("        --save-config           Remember --dir, --out, --copy and --export");
    println!("    -q, --quiet                 Only log warnings (RUST_LOG overrides)");
    println!("    -h, --help                  Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("    lazer-link -k catalog.json -o ~/songs --all");
    println!("    lazer-link -o ~/songs --validate");
    println!("    lazer-link -k catalog.json -o ~/songs -r replay.osr --copy");
    println!("    lazer-link -k catalog.json -e binary2 --export-out catalog.bin");
}
