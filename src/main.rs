//! VaaniMeter: self-introduction scoring CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use vaanimeter::cache::ScoreCache;
use vaanimeter::collaborators::CollaboratorSources;
use vaanimeter::config::{build_ignore_set, is_ignored, load_config, Config, CONFIG_FILENAME};
use vaanimeter::history::{
    append_run, find_project_root, format_delta, load_history, previous_score, save_history,
};
use vaanimeter::reporter::{ConsoleReporter, JsonReporter};
use vaanimeter::rubric::Rubric;
use vaanimeter::{trace_time, RubricEngine, ScoredTranscript};
use walkdir::WalkDir;

/// Virtual path used when the transcript comes from stdin
const STDIN_PATH: &str = "stdin.txt";

/// VaaniMeter: rubric scoring for spoken self-introductions
#[derive(Parser, Debug)]
#[command(name = "vaanimeter")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Transcript file, directory of transcripts, or `-` for stdin
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum overall score (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (one line per transcript)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output and debug diagnostics
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .vaanirc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use this compound sentiment polarity (-1 to 1) instead of an analyzer
    #[arg(long, allow_hyphen_values = true, value_name = "F")]
    polarity: Option<f64>,

    /// Use this grammar issue count instead of a checker
    #[arg(long, value_name = "N")]
    grammar_errors: Option<usize>,

    /// Command that reads a transcript on stdin and prints a grammar issue count
    #[arg(long, value_name = "CMD")]
    grammar_cmd: Option<String>,

    /// Command that reads a transcript on stdin and prints a compound polarity
    #[arg(long, value_name = "CMD")]
    sentiment_cmd: Option<String>,

    /// LanguageTool server for grammar checking (requires the `languagetool` feature)
    #[arg(long, value_name = "URL")]
    languagetool_url: Option<String>,

    /// Disable caching (re-score all files even if unchanged)
    #[arg(long)]
    no_cache: bool,

    /// Clear the score cache before running
    #[arg(long)]
    clear_cache: bool,

    /// Score in parallel (default for directories with many files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,

    /// Log level for diagnostics (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Emit diagnostics as JSON lines on stderr
    #[arg(long)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .vaanirc.json with sensible defaults
    Init {
        /// Minimum overall score (e.g. 60)
        #[arg(long)]
        threshold: Option<u8>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Print the effective rubric tables as JSON
    Rubric {
        /// Path to config file whose rubric override should be applied
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if let Err(e) = vaanimeter::logging::init_tracing(
        args.verbose,
        args.log_level.as_deref(),
        args.log_json,
    ) {
        eprintln!("{}: Failed to initialize logging: {}", "Warning".yellow(), e);
    }

    match &args.command {
        Some(Commands::Init { threshold, dir }) => return run_init(*threshold, dir.as_deref()),
        Some(Commands::Rubric { config }) => return run_rubric(config.as_deref()),
        None => {}
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("a transcript path is required (try `vaanimeter --help`)");
    };
    let from_stdin = path.as_os_str() == "-";

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let work_dir = if from_stdin {
        cwd.clone()
    } else if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone())
    } else {
        path.clone()
    };

    // Load config (CLI flags override config file)
    let config = load_config(&work_dir, args.config.as_deref())?.merge_with_cli(args.threshold);

    let engine = build_engine(&args, &config)?;

    if from_stdin {
        return score_stdin(&args, &config, &engine);
    }

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    let patterns = config.get_transcript_patterns();
    let files = collect_transcript_files(&path, ignore_set.as_ref(), &patterns)?;

    if files.is_empty() {
        eprintln!("{}: No transcripts found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    // Set up cache
    let project_root = find_project_root(&work_dir);
    let mut cache = match (&project_root, args.no_cache) {
        (Some(root), false) => ScoreCache::new(root),
        _ => ScoreCache::disabled(),
    };
    if args.clear_cache {
        cache.clear();
        if !args.quiet {
            eprintln!("{}: Cache cleared", "Info".blue());
        }
    }

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let use_parallel = args.parallel || files.len() > 10;
    let started = Instant::now();
    let (results, had_errors) = if use_parallel {
        score_files_parallel_cached(&engine, &files, &mut cache, args.quiet)
    } else {
        score_files_sequential_cached(&engine, &files, &mut cache, args.quiet)
    };
    trace_time!(started, "scored transcripts", files = files.len(), parallel = use_parallel);

    cache.cleanup();
    if let Err(e) = cache.save() {
        if !args.quiet {
            eprintln!("{}: Failed to save cache: {}", "Warning".yellow(), e);
        }
    }

    if results.is_empty() {
        eprintln!("{}: All transcripts failed to score", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let stats = RubricEngine::aggregate_stats(&results);
    output_results(&args, &results, &stats, project_root.as_deref());

    let score = if results.len() == 1 {
        results[0].report.overall_score
    } else {
        stats.average_score
    };
    if let Some(code) = check_threshold(&args, &config, score) {
        return Ok(code);
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Assemble the engine from CLI flags, config and environment
fn build_engine(args: &Args, config: &Config) -> Result<RubricEngine> {
    let cli = CollaboratorSources {
        grammar_errors: args.grammar_errors,
        polarity: args.polarity,
        grammar_command: args.grammar_cmd.clone(),
        sentiment_command: args.sentiment_cmd.clone(),
        languagetool_url: args.languagetool_url.clone(),
    };
    let sources = config.collaborator_sources(cli);

    let sentiment = sources.sentiment_analyzer().context(
        "no sentiment source; pass --polarity or --sentiment-cmd, \
         set sentimentCommand in the config, or export VAANI_SENTIMENT_CMD",
    )?;

    let engine = RubricEngine::builder()
        .sentiment_analyzer(sentiment)
        .grammar_checker(sources.grammar_checker())
        .rubric(config.rubric.clone())
        .build()?;
    tracing::debug!(fingerprint = %engine.fingerprint(), "engine ready");
    Ok(engine)
}

fn score_stdin(args: &Args, config: &Config, engine: &RubricEngine) -> Result<ExitCode> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read transcript from stdin")?;

    let result = engine.score_source(&text, Path::new(STDIN_PATH))?;
    let results = vec![result];
    let stats = RubricEngine::aggregate_stats(&results);
    // stdin runs are not recorded in history
    output_results(args, &results, &stats, None);

    Ok(check_threshold(args, config, results[0].report.overall_score).unwrap_or(ExitCode::SUCCESS))
}

fn output_results(
    args: &Args,
    results: &[ScoredTranscript],
    stats: &vaanimeter::analyzer::AggregateStats,
    project_root: Option<&Path>,
) {
    let mut history = project_root.map(load_history);

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if results.len() == 1 {
            println!("{}", reporter.report(&results[0]));
        } else {
            println!("{}", reporter.report_with_summary(results, stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for result in results {
            let delta = history
                .as_ref()
                .map(|h| format_delta(previous_score(h, &result.source), result.report.overall_score))
                .unwrap_or_default();
            reporter.report_quiet(result, &delta);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if results.len() == 1 {
            reporter.report(&results[0]);
        } else {
            reporter.report_many(results, stats);
        }
    }

    // Persist trend history
    if let (Some(root), Some(h)) = (project_root, history.as_mut()) {
        append_run(h, results);
        if let Err(e) = save_history(root, h) {
            tracing::warn!(error = %e, "failed to save history");
        }
    }
}

/// Exit 1 when the score falls below the CLI or config threshold
fn check_threshold(args: &Args, config: &Config, score: u8) -> Option<ExitCode> {
    let threshold = args.threshold.or(config.threshold)?;
    if score >= threshold {
        return None;
    }
    if !args.quiet && !args.json {
        eprintln!(
            "\n{}: Score {} is below threshold {}",
            "Failed".red().bold(),
            score,
            threshold
        );
    }
    Some(ExitCode::from(1))
}

fn run_init(threshold: Option<u8>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold_value = threshold.unwrap_or(60);
    let config = Config {
        threshold: Some(threshold_value),
        ignore: vec!["**/drafts/**".to_string()],
        transcript_patterns: vec![".txt".to_string()],
        ..Config::default()
    };
    let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;

    std::fs::write(&config_path, format!("{}\n", json))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value
    );
    println!(
        "   Add \"sentimentCommand\" (or pass --polarity) before scoring transcripts."
    );
    Ok(ExitCode::SUCCESS)
}

fn run_rubric(config_path: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = load_config(&cwd, config_path)?;
    let rubric = match config.rubric {
        Some(rubric) => {
            rubric.validate()?;
            rubric
        }
        None => Rubric::standard().clone(),
    };
    let json = serde_json::to_string_pretty(&rubric).context("Failed to serialize rubric")?;
    println!("{}", json);
    Ok(ExitCode::SUCCESS)
}

fn collect_transcript_files(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
    patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|p| p.is_file() && is_transcript_file(p, patterns))
        .filter(|p| !ignore_set.is_some_and(|set| is_ignored(p, set)))
        .collect();

    // Sort for consistent output
    files.sort();
    Ok(files)
}

fn is_transcript_file(path: &Path, patterns: &[&str]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    // Skip hidden files such as the cache and history
    if name.starts_with('.') {
        return false;
    }
    patterns.iter().any(|p| name.ends_with(p))
}

fn report_failure(file: &Path, error: &anyhow::Error, quiet: bool) {
    tracing::debug!(file = %file.display(), error = %format!("{:#}", error), "scoring failed");
    if !quiet {
        eprintln!(
            "{}: Failed to score {}: {:#}",
            "Error".red(),
            file.display(),
            error
        );
    }
}

/// Score files sequentially with caching
fn score_files_sequential_cached(
    engine: &RubricEngine,
    files: &[PathBuf],
    cache: &mut ScoreCache,
    quiet: bool,
) -> (Vec<ScoredTranscript>, bool) {
    let fingerprint = engine.fingerprint();
    let mut results = Vec::new();
    let mut had_errors = false;
    let mut cache_hits = 0;

    for file in files {
        let text = match std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read transcript: {}", file.display()))
        {
            Ok(text) => text,
            Err(e) => {
                report_failure(file, &e, quiet);
                had_errors = true;
                continue;
            }
        };

        if let Some(cached) = cache.get(file, &text, &fingerprint) {
            results.push(cached);
            cache_hits += 1;
            continue;
        }

        match engine.score_source(&text, file) {
            Ok(result) => {
                cache.set(file, &text, &fingerprint, result.clone());
                results.push(result);
            }
            Err(e) => {
                report_failure(file, &anyhow::Error::from(e), quiet);
                had_errors = true;
            }
        }
    }

    if !quiet && cache_hits > 0 {
        eprintln!(
            "{}: {} transcripts from cache, {} scored",
            "Cache".blue(),
            cache_hits,
            files.len() - cache_hits
        );
    }

    (results, had_errors)
}

/// Score files in parallel; cache lookups run on the workers, inserts happen afterwards
fn score_files_parallel_cached(
    engine: &RubricEngine,
    files: &[PathBuf],
    cache: &mut ScoreCache,
    quiet: bool,
) -> (Vec<ScoredTranscript>, bool) {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    let fingerprint = engine.fingerprint();
    let had_errors = AtomicBool::new(false);
    let cache_hits = AtomicUsize::new(0);
    let shared: &ScoreCache = cache;

    let scored: Vec<(ScoredTranscript, Option<String>)> = files
        .par_iter()
        .filter_map(|file| {
            let text = match std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read transcript: {}", file.display()))
            {
                Ok(text) => text,
                Err(e) => {
                    had_errors.store(true, Ordering::Relaxed);
                    report_failure(file, &e, quiet);
                    return None;
                }
            };

            if let Some(cached) = shared.get(file, &text, &fingerprint) {
                cache_hits.fetch_add(1, Ordering::Relaxed);
                return Some((cached, None));
            }

            match engine.score_source(&text, file) {
                Ok(result) => Some((result, Some(text))),
                Err(e) => {
                    had_errors.store(true, Ordering::Relaxed);
                    report_failure(file, &anyhow::Error::from(e), quiet);
                    None
                }
            }
        })
        .collect();

    let mut results = Vec::with_capacity(scored.len());
    for (result, fresh_text) in scored {
        if let Some(text) = fresh_text {
            cache.set(&result.source, &text, &fingerprint, result.clone());
        }
        results.push(result);
    }

    let hits = cache_hits.load(Ordering::Relaxed);
    if !quiet && hits > 0 {
        eprintln!(
            "{}: {} transcripts from cache, {} scored",
            "Cache".blue(),
            hits,
            files.len() - hits
        );
    }

    (results, had_errors.load(Ordering::Relaxed))
}
