// ABOUTME: CLI binary for htmlsift.
// ABOUTME: Runs extraction rules over an HTML file or stdin, or over a JSON Lines batch of records.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use htmlsift::document::decode_html;
use htmlsift::{
    parse_records, run_records, ContentMode, ExtractError, ExtractionRule, Extractor,
    FailurePolicy,
};

#[derive(Parser, Debug)]
#[command(name = "htmlsift")]
#[command(about = "Extract structured data from HTML using named CSS selectors")]
struct Args {
    /// HTML file to parse (default: stdin)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// JSON file containing an array of rules
    #[arg(long = "rules")]
    rules: Option<PathBuf>,

    /// Ad-hoc rule in the form NAME=SELECTOR[@ATTRIBUTE]
    #[arg(short = 's', long = "select")]
    select: Vec<String>,

    /// Return only the first value for the named rule
    #[arg(long = "single")]
    single: Vec<String>,

    /// Comma-separated selectors of elements to remove before extracting
    #[arg(short = 'r', long = "remove", default_value = "")]
    remove: String,

    /// Rendering for rules without an attribute: text (default) or html
    #[arg(
        short = 'm',
        long = "mode",
        default_value = "text",
        value_parser = ["text", "txt", "html", "markup"]
    )]
    mode: String,

    /// Trim whitespace around text values
    #[arg(long = "trim")]
    trim: bool,

    /// JSON Lines file of records ({"html", "selectors", "removeElements"})
    #[arg(long = "records")]
    records: Option<PathBuf>,

    /// In records mode, emit {"error": ...} for failing records instead of stopping
    #[arg(long = "continue-on-fail")]
    continue_on_fail: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long = "compact")]
    compact: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn read_html(path: Option<&Path>) -> anyhow::Result<String> {
    let bytes = match path {
        Some(p) => fs::read(p).with_context(|| format!("reading file {:?}", p))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("reading html from stdin")?;
            buf
        }
    };
    Ok(decode_html(&bytes))
}

/// Collects rules from the rules file and the ad-hoc flags, in that order.
fn collect_rules(args: &Args) -> anyhow::Result<Vec<ExtractionRule>> {
    let mut rules: Vec<ExtractionRule> = match &args.rules {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))?;
            serde_json::from_str(&text).with_context(|| format!("parsing rules from {:?}", path))?
        }
        None => Vec::new(),
    };

    for raw in &args.select {
        rules.push(raw.parse::<ExtractionRule>()?);
    }

    for name in &args.single {
        match rules.iter_mut().find(|r| &r.name == name) {
            Some(rule) => rule.single_item = true,
            None => bail!("--single {:?} does not name a rule", name),
        }
    }

    Ok(rules)
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> anyhow::Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

fn run(args: &Args) -> anyhow::Result<String> {
    let extractor = Extractor::builder()
        .content_mode(ContentMode::from(args.mode.as_str()))
        .trim_text(args.trim)
        .build();

    if let Some(path) = &args.records {
        let text = fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))?;
        let records = parse_records(&text)?;
        let policy = if args.continue_on_fail {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Halt
        };
        let outputs = run_records(&extractor, &records, policy)?;
        // One JSON document per line, matching the input records
        let lines = outputs
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(lines.join("\n"));
    }

    let html = read_html(args.html.as_deref())?;
    let rules = collect_rules(args)?;
    let outcome = extractor.extract(&html, &rules, &args.remove)?;
    to_json(&outcome, args.compact)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let start = Instant::now();
    let result = run(&args);
    let elapsed = start.elapsed();

    let mut had_error = false;
    match result {
        Ok(output_str) => {
            if let Some(output_path) = &args.output {
                if let Err(e) = fs::write(output_path, &output_str) {
                    eprintln!("error writing to {:?}: {}", output_path, e);
                    had_error = true;
                }
            } else {
                println!("{}", output_str);
            }
        }
        Err(e) => {
            // ExtractError already renders its source
            match e.downcast_ref::<ExtractError>() {
                Some(extract_err) => eprintln!("error: {}", extract_err),
                None => eprintln!("error: {:#}", e),
            }
            had_error = true;
        }
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
