//! Command-line interface for adocstream.
//!
//! Reads an AsciiDoc document from a file or stdin and prints the events a
//! visitor would receive, the header attributes, or one of the intermediate
//! streams.
//!
//! Usage:
//!   adocstream [FILE]                  - Print the event trace
//!   adocstream --format json [FILE]    - Print the events as JSON
//!   adocstream --attributes [FILE]     - Print the document attributes
//!   adocstream --tokens | --codes      - Dump the token or code stream

use std::fmt::Write as _;
use std::io::Read;
use std::path::PathBuf;

use adocstream_config::{Config, OutputFormat};
use adocstream_syntax::{Document, EventRecorder, ParseOptions, process_with};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::{LevelFilter, debug, info};

#[derive(Debug, Parser)]
#[command(
    name = "adocstream",
    version,
    about = "Print the event stream of an AsciiDoc document"
)]
struct Cli {
    /// Document to read; stdin when omitted
    file: Option<PathBuf>,

    /// Configuration file (default: ~/.config/adocstream/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format, overriding the configured one
    #[arg(long, short = 'f', value_enum)]
    format: Option<FormatArg>,

    /// Print the document attributes instead of the events
    #[arg(long, conflicts_with_all = ["tokens", "codes"])]
    attributes: bool,

    /// Dump the token stream
    #[arg(long, conflicts_with = "codes")]
    tokens: bool,

    /// Dump the structural code stream
    #[arg(long)]
    codes: bool,

    /// More logging; repeat for trace output
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Trace,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Trace => OutputFormat::Trace,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// What to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Events,
    Attributes,
    Tokens,
    Codes,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.attributes {
            Mode::Attributes
        } else if self.tokens {
            Mode::Tokens
        } else if self.codes {
            Mode::Codes
        } else {
            Mode::Events
        }
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level())
        .init();

    let config = load_config(&cli)?;
    let format = cli.format.map(OutputFormat::from).unwrap_or(config.format);
    let source = read_source(&cli)?;

    let output = render_output(&source, cli.mode(), format, &config.parse_options())?;
    print!("{output}");
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let explicit = cli.config.as_deref();
    debug!("Config path: {}", Config::resolved_path(explicit).display());
    Ok(Config::resolve(explicit)?)
}

fn read_source(cli: &Cli) -> Result<String> {
    match &cli.file {
        Some(path) => {
            info!("Reading {}", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            Ok(source)
        }
    }
}

/// Run the pipeline over `source` and format what `mode` asks for.
fn render_output(
    source: &str,
    mode: Mode,
    format: OutputFormat,
    options: &ParseOptions,
) -> Result<String> {
    match mode {
        Mode::Events => {
            let mut recorder = EventRecorder::default();
            process_with(source, options, &mut recorder)?;
            match format {
                OutputFormat::Trace => Ok(recorder.to_string()),
                OutputFormat::Json => json(&recorder),
            }
        }
        Mode::Attributes => {
            let document = Document::parse_with(source, options)?;
            let attributes = document.attributes();
            match format {
                OutputFormat::Trace => {
                    let mut out = String::new();
                    for (name, value) in attributes.iter() {
                        writeln!(out, ":{name}: {value}")?;
                    }
                    Ok(out)
                }
                OutputFormat::Json => json(attributes),
            }
        }
        Mode::Tokens => {
            let document = Document::parse_with(source, options)?;
            lines(document.tokens().iter(), format)
        }
        Mode::Codes => {
            let document = Document::parse_with(source, options)?;
            lines(document.codes().iter(), format)
        }
    }
}

/// One item per line, or a JSON array of the same strings.
fn lines<T: std::fmt::Display>(
    items: impl Iterator<Item = T>,
    format: OutputFormat,
) -> Result<String> {
    let items: Vec<String> = items.map(|item| item.to_string()).collect();
    match format {
        OutputFormat::Trace => Ok(items.iter().map(|item| format!("{item}\n")).collect()),
        OutputFormat::Json => json(&items),
    }
}

fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn run(source: &str, mode: Mode, format: OutputFormat) -> String {
        render_output(source, mode, format, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn event_trace() {
        assert_snapshot!(run("= Title\n\nHello *world*.\n", Mode::Events, OutputFormat::Trace), @r#"
        documentStart
          headingStart(1)
            text("Title")
          headingEnd(1)
          paragraphStart
            text("Hello ")
            boldStart
              text("world")
            boldEnd
            text(".")
          paragraphEnd
        documentEnd
        "#);
    }

    #[test]
    fn event_json_is_tagged() {
        let output = run("Hi", Mode::Events, OutputFormat::Json);
        let events: serde_json::Value = serde_json::from_str(&output).unwrap();
        let names: Vec<&str> = events
            .as_array()
            .unwrap()
            .iter()
            .map(|event| event["event"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "document_start",
                "paragraph_start",
                "text",
                "paragraph_end",
                "document_end"
            ]
        );
        assert_eq!(events[2]["text"], "Hi");
    }

    #[test]
    fn attributes_trace() {
        let source = "= Guide\n:author: Ann\n:source-language: rust\n\nBody.\n";
        assert_snapshot!(run(source, Mode::Attributes, OutputFormat::Trace), @r"
        :author: Ann
        :source-language: rust
        ");
    }

    #[test]
    fn attributes_json() {
        let source = "= Guide\n:author: Ann\n\nBody.\n";
        let output = run(source, Mode::Attributes, OutputFormat::Json);
        let attributes: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(attributes["author"], "Ann");
    }

    #[test]
    fn token_dump() {
        assert_snapshot!(run("Hi", Mode::Tokens, OutputFormat::Trace), @r"
        BLOB(0, 2)
        EOF
        ");
    }

    #[test]
    fn code_dump() {
        assert_snapshot!(run("Hi", Mode::Codes, OutputFormat::Trace), @r"
        DOCUMENT_START
        PARAGRAPH_START
        TOKENS(0..1)
        PARAGRAPH_END
        DOCUMENT_END
        ");
    }

    #[test]
    fn configured_schemes_change_links() {
        let options = ParseOptions::default().with_url_schemes(["gopher"]);
        let output = render_output(
            "gopher://host[menu]",
            Mode::Events,
            OutputFormat::Trace,
            &options,
        )
        .unwrap();
        assert!(output.contains(r#"link("gopher://host", text("menu"))"#));
    }

    #[test]
    fn parse_errors_propagate() {
        let result = render_output(
            "----\ncode\n-----\n",
            Mode::Events,
            OutputFormat::Trace,
            &ParseOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let cli = Cli::parse_from(["adocstream", "--config", "/nonexistent/adocstream.toml"]);
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/adocstream.toml"));
    }

    #[test]
    fn cli_flags_select_mode() {
        let cli = Cli::parse_from(["adocstream", "--codes", "doc.adoc"]);
        assert_eq!(cli.mode(), Mode::Codes);
        assert_eq!(cli.file, Some(PathBuf::from("doc.adoc")));

        let cli = Cli::parse_from(["adocstream", "-vv"]);
        assert_eq!(cli.mode(), Mode::Events);
        assert_eq!(cli.log_level(), LevelFilter::Trace);
    }
}
