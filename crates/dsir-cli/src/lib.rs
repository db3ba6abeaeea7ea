//! DSIR command-line front end
//!
//! `dsir simplify` writes the simplified design; `dsir images` prints the
//! image hand-off list. Both read an already fetched JSON response from a
//! file. Logs go to stderr, filtered by `RUST_LOG`.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dsir_core::{convert, Conversion, ConvertOptions, TracingSink};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Output encodings of `simplify`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    PrettyJson,
    /// YAML
    Yaml,
}

fn input_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON file response or node response")
}

fn node_id_arg() -> Arg {
    Arg::new("node-id")
        .long("node-id")
        .help("Start at this node instead of the top-level children")
}

fn depth_arg() -> Arg {
    Arg::new("depth")
        .long("depth")
        .value_parser(value_parser!(usize))
        .help("Maximum depth below each root")
}

fn hidden_arg() -> Arg {
    Arg::new("include-hidden")
        .long("include-hidden")
        .action(ArgAction::SetTrue)
        .help("Keep nodes marked invisible")
}

/// Command-line definition
#[must_use]
pub fn cli() -> Command {
    Command::new("dsir")
        .version(dsir_core::VERSION)
        .about("Simplify design-file node trees into a compact, style-deduplicated form")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Log line format on stderr"),
        )
        .subcommand(
            Command::new("simplify")
                .about("Write the simplified design")
                .arg(input_arg())
                .arg(node_id_arg())
                .arg(depth_arg())
                .arg(hidden_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["json", "pretty", "yaml"])
                        .default_value("json")
                        .help("Output encoding"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Output file (stdout when absent)"),
                ),
        )
        .subcommand(
            Command::new("images")
                .about("Print image references to fetch, as JSON")
                .arg(input_arg())
                .arg(node_id_arg())
                .arg(depth_arg())
                .arg(hidden_arg()),
        )
}

/// Install the stderr subscriber
///
/// Verbosity follows `RUST_LOG`, defaulting to `info`.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    // a subscriber may already be installed (tests)
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Conversion options from subcommand arguments
#[must_use]
pub fn options_from(args: &ArgMatches) -> ConvertOptions {
    let mut options = ConvertOptions::new().with_hidden(args.get_flag("include-hidden"));
    if let Some(id) = args.get_one::<String>("node-id") {
        options = options.with_node_id(id.as_str());
    }
    if let Some(depth) = args.get_one::<usize>("depth") {
        options = options.with_max_depth(*depth);
    }
    options
}

fn format_from(args: &ArgMatches) -> OutputFormat {
    match args.get_one::<String>("format").map(String::as_str) {
        Some("yaml") => OutputFormat::Yaml,
        Some("pretty") => OutputFormat::PrettyJson,
        _ => OutputFormat::Json,
    }
}

/// Read and convert one input file
///
/// # Errors
/// Returns error if the file cannot be read or parsed, or conversion fails
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<Conversion> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let input: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Converting input");
    convert(&input, options, &mut TracingSink)
        .with_context(|| format!("converting {}", path.display()))
}

/// Write a conversion in `format`
///
/// # Errors
/// Returns error if encoding or writing fails
pub fn write_design<W: Write>(
    conversion: &Conversion,
    format: OutputFormat,
    writer: W,
) -> Result<()> {
    let design = &conversion.design;
    match format {
        OutputFormat::Json => design.write_json(writer)?,
        OutputFormat::PrettyJson => design.write_json_pretty(writer)?,
        OutputFormat::Yaml => design.write_yaml(writer)?,
    }
    Ok(())
}

fn simplify(args: &ArgMatches) -> Result<()> {
    let path = args
        .get_one::<PathBuf>("file")
        .context("missing input file")?;
    let conversion = convert_file(path, &options_from(args))?;
    let format = format_from(args);
    tracing::info!(
        nodes = conversion.design.node_count(),
        styles = conversion.design.global_vars.len(),
        "Writing simplified design"
    );

    match args.get_one::<PathBuf>("output") {
        Some(out) => {
            let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
            write_design(&conversion, format, BufWriter::new(file))
                .with_context(|| format!("writing {}", out.display()))?;
            tracing::info!(path = %out.display(), "Wrote simplified design");
        }
        None => {
            let stdout = io::stdout();
            write_design(&conversion, format, BufWriter::new(stdout.lock()))?;
        }
    }
    Ok(())
}

fn images(args: &ArgMatches) -> Result<()> {
    let path = args
        .get_one::<PathBuf>("file")
        .context("missing input file")?;
    let conversion = convert_file(path, &options_from(args))?;
    let mut out = BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut out, &conversion.images)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Dispatch parsed arguments
///
/// # Errors
/// Returns error if the selected subcommand fails
pub fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("simplify", args)) => simplify(args),
        Some(("images", args)) => images(args),
        Some((other, _)) => anyhow::bail!("unknown command: {other}"),
        None => anyhow::bail!("no command given"),
    }
}
