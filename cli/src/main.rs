//! jaclean CLI - Japanese web-corpus filter
//!
//! Reads JSON Lines from stdin and writes JSON Lines to stdout. Diagnostics go
//! to stderr; set `RUST_LOG` to adjust their verbosity.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use jaclean::{
    BlocklistPolicy, DomainBlocklist, DomainBlocklistChecker, Error, Evaluation, LanguageModel,
    NgWordDictionary, Pipeline, PipelineOptions, Record,
};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Records handed to the pipeline at once.
const BATCH_SIZE: usize = 4096;

/// Language label treated as positive by `nanigo`.
const TARGET_LANG: &str = "ja";

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Quality and content-safety filter for Japanese JSON Lines corpora
#[derive(Parser)]
#[command(
    name = "jaclean",
    version,
    about = "Filter Japanese web corpora by quality and content safety",
    long_about = "jaclean - Quality and content-safety filter for Japanese web corpora.\n\n\
                  Every command reads JSON Lines from stdin and writes to stdout.\n\n\
                  Usage:\n  \
                  jaclean annotate -f < in.jsonl > out.jsonl\n  \
                  jaclean modify < in.jsonl > out.jsonl\n  \
                  jaclean nanigo -m model.json.gz -f < in.jsonl > out.jsonl"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Abort on the first malformed input line instead of skipping it
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate records with quality, NG-word, domain and language information
    Annotate {
        /// Compiled NG-word dictionary
        #[arg(long)]
        ngword: Option<PathBuf>,

        /// Domain blocklist (JSON, optionally gzip-compressed)
        #[arg(long)]
        blocklist: Option<PathBuf>,

        /// Language identification model
        #[arg(long)]
        model: Option<PathBuf>,

        /// Pipeline configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output only records that pass every configured gate
        #[arg(short, long)]
        filter: bool,
    },

    /// Normalize punctuation and trim footers in the text field
    Modify {
        /// Pipeline configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Identify whether each text is Japanese
    Nanigo {
        /// Language identification model
        #[arg(short, long)]
        model: PathBuf,

        /// Add the predicted label in a 'nanigo' field
        #[arg(short, long)]
        annotate: bool,

        /// Add the model score in a 'score' field
        #[arg(short, long)]
        score: bool,

        /// Output only records predicted as Japanese
        #[arg(short, long)]
        filter: bool,

        /// Evaluate predictions against the 'lang' field
        #[arg(short, long)]
        evaluate: bool,

        /// Output only misclassified records
        #[arg(short, long)]
        debug: bool,
    },

    /// Check URLs against a domain blocklist
    CheckUrl {
        /// Domain blocklist (JSON, optionally gzip-compressed)
        #[arg(long)]
        blocklist: PathBuf,

        /// Pipeline configuration (JSON); only the blocklist policy is used
        #[arg(long)]
        config: Option<PathBuf>,

        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let strict = cli.strict;

    match cli.command {
        Commands::Annotate {
            ngword,
            blocklist,
            model,
            config,
            filter,
        } => {
            let pb = create_spinner("Loading resources...");
            let mut pipeline = Pipeline::new(load_options(config.as_ref())?);
            if let Some(path) = ngword {
                pipeline = pipeline.with_ngword(NgWordDictionary::load(path)?);
            }
            if let Some(path) = blocklist {
                pipeline = pipeline.with_blocklist(DomainBlocklist::load(path)?);
            }
            if let Some(path) = model {
                pipeline = pipeline.with_language_model(LanguageModel::load(path)?);
            }

            pb.set_message("Annotating...");
            let counts = annotate_stream(
                &pipeline,
                filter,
                strict,
                io::stdin().lock(),
                BufWriter::new(io::stdout().lock()),
                &pb,
            )?;
            pb.finish_and_clear();
            counts.report();
        }

        Commands::Modify { config } => {
            let pipeline = Pipeline::new(load_options(config.as_ref())?);
            let pb = create_spinner("Modifying...");
            let counts = modify_stream(
                &pipeline,
                strict,
                io::stdin().lock(),
                BufWriter::new(io::stdout().lock()),
                &pb,
            )?;
            pb.finish_and_clear();
            counts.report();
        }

        Commands::Nanigo {
            model,
            annotate,
            score,
            filter,
            evaluate,
            debug,
        } => {
            let model = LanguageModel::load(model)?;
            let mode = NanigoMode {
                annotate,
                score,
                filter,
                evaluate,
                debug,
            };
            let counts = nanigo_stream(
                &model,
                mode,
                strict,
                io::stdin().lock(),
                BufWriter::new(io::stdout().lock()),
            )?;
            counts.report();
        }

        Commands::CheckUrl {
            blocklist,
            config,
            urls,
        } => {
            let blocklist = DomainBlocklist::load(blocklist)?;
            let policy: BlocklistPolicy = load_options(config.as_ref())?.blocklist;
            let checker = DomainBlocklistChecker::new(&blocklist, &policy);

            for url in urls {
                let allowed = match checker.check(&url) {
                    Ok(allowed) => allowed,
                    Err(e) if !strict => {
                        tracing::warn!(url = %url, error = %e, "treating malformed URL as blocked");
                        false
                    }
                    Err(e) => return Err(e.into()),
                };
                let label = if allowed {
                    "allowed".green()
                } else {
                    "blocked".red()
                };
                println!("{}\t{}", label, url);
            }
        }
    }

    Ok(())
}

fn annotate_stream<R: BufRead, W: Write>(
    pipeline: &Pipeline,
    filter: bool,
    strict: bool,
    input: R,
    mut out: W,
    pb: &ProgressBar,
) -> CliResult<Counts> {
    let mut input = input.lines();
    let mut counts = Counts::default();
    let mut line_no = 0;

    while let Some(batch) = read_batch(&mut input, &mut line_no)? {
        let results = pipeline.process_lines(batch.lines.as_slice());
        for (number, result) in batch.numbers.iter().zip(results) {
            counts.read += 1;
            match result {
                Ok((record, accepted)) => {
                    if !filter || accepted {
                        writeln!(out, "{}", record.to_json_line()?)?;
                        counts.written += 1;
                    }
                }
                Err(e) => skip_or_fail(strict, *number, e, &mut counts)?,
            }
        }
        pb.set_message(format!("Annotating... {} records", counts.read));
    }

    out.flush()?;
    Ok(counts)
}

fn modify_stream<R: BufRead, W: Write>(
    pipeline: &Pipeline,
    strict: bool,
    input: R,
    mut out: W,
    pb: &ProgressBar,
) -> CliResult<Counts> {
    let mut counts = Counts::default();

    for (i, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        counts.read += 1;
        let mut record = match Record::from_json_line(&line) {
            Ok(record) => record,
            Err(e) => {
                skip_or_fail(strict, i + 1, e, &mut counts)?;
                continue;
            }
        };
        record.text = pipeline.modify(&record.text);
        writeln!(out, "{}", record.to_json_line()?)?;
        counts.written += 1;
        if counts.read % BATCH_SIZE == 0 {
            pb.set_message(format!("Modifying... {} records", counts.read));
        }
    }

    out.flush()?;
    Ok(counts)
}

/// Output switches of the `nanigo` command.
#[derive(Debug, Clone, Copy, Default)]
struct NanigoMode {
    annotate: bool,
    score: bool,
    filter: bool,
    evaluate: bool,
    debug: bool,
}

fn nanigo_stream<R: BufRead, W: Write>(
    model: &LanguageModel,
    mode: NanigoMode,
    strict: bool,
    input: R,
    mut out: W,
) -> CliResult<Counts> {
    let mut evaluation = Evaluation::new();
    let mut counts = Counts::default();
    let start = Instant::now();

    for (i, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        counts.read += 1;
        let mut record = match Record::from_json_line(&line) {
            Ok(record) => record,
            Err(e) => {
                skip_or_fail(strict, i + 1, e, &mut counts)?;
                continue;
            }
        };

        let value = model.score(&record.text);
        let predicted = value > 0.0;
        if mode.annotate {
            let label = if predicted {
                TARGET_LANG.to_string()
            } else {
                format!("non-{TARGET_LANG}")
            };
            record.set_field("nanigo", &label)?;
        }
        if mode.score {
            record.set_field("score", &value)?;
        }

        if mode.evaluate || mode.debug {
            let gold = record.lang.as_deref() == Some(TARGET_LANG);
            let correct = evaluation.record(gold, predicted, record.text.chars().count());
            if mode.debug && !correct {
                writeln!(out, "{}", record.to_json_line()?)?;
                counts.written += 1;
            }
        } else if !mode.filter || predicted {
            writeln!(out, "{}", record.to_json_line()?)?;
            counts.written += 1;
        }
    }

    if mode.evaluate {
        let summary = evaluation.summary(start.elapsed());
        writeln!(out, "{}", serde_json::to_string(&summary)?)?;
    }
    out.flush()?;
    Ok(counts)
}

/// Non-empty input lines with their 1-based line numbers.
struct Batch {
    numbers: Vec<usize>,
    lines: Vec<String>,
}

/// Reads up to [`BATCH_SIZE`] non-empty lines; `None` at end of input.
fn read_batch<R: BufRead>(input: &mut io::Lines<R>, line_no: &mut usize) -> io::Result<Option<Batch>> {
    let mut batch = Batch {
        numbers: Vec::new(),
        lines: Vec::new(),
    };
    while batch.lines.len() < BATCH_SIZE {
        let Some(line) = input.next() else {
            break;
        };
        *line_no += 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        batch.numbers.push(*line_no);
        batch.lines.push(line);
    }
    Ok((!batch.lines.is_empty()).then_some(batch))
}

#[derive(Debug, Default)]
struct Counts {
    read: usize,
    written: usize,
    skipped: usize,
}

impl Counts {
    fn report(&self) {
        let mut summary = format!(
            "{} {} records read, {} written",
            "✓".green().bold(),
            self.read,
            self.written
        );
        if self.skipped > 0 {
            summary.push_str(&format!(", {} skipped", self.skipped).yellow().to_string());
        }
        eprintln!("{}", summary);
    }
}

fn skip_or_fail(strict: bool, line_no: usize, error: Error, counts: &mut Counts) -> CliResult<()> {
    if strict {
        return Err(format!("line {}: {}", line_no, error).into());
    }
    tracing::warn!(line = line_no, error = %error, "skipping malformed record");
    counts.skipped += 1;
    Ok(())
}

fn load_options(path: Option<&PathBuf>) -> jaclean::Result<PipelineOptions> {
    match path {
        Some(p) => PipelineOptions::load(p),
        None => Ok(PipelineOptions::default()),
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
