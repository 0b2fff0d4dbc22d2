//! Bookmark Icons main entry point
//!
//! This is the command-line interface for resolving site icons and embedding
//! them into Netscape bookmark files.

use anyhow::Context;
use bookmark_icons::bookmarks::{
    export_bookmarks_base64, export_bookmarks_html, parse_bookmarks_base64, parse_bookmarks_html,
    ExportOptions,
};
use bookmark_icons::config::{load_config_with_hash, validate, Config};
use bookmark_icons::{FaviconResolver, IconTarget};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Bookmark Icons: favicon resolution for bookmark collections
///
/// Resolves the icon of any website to an embeddable data URI, using known
/// service icons, standard icon paths and page metadata, and fills those
/// icons into exported bookmark files.
#[derive(Parser, Debug)]
#[command(name = "bookmark-icons")]
#[command(version = "1.0.0")]
#[command(about = "Favicon resolution for bookmark collections", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve icons for one or more URLs and print them as data URIs
    Resolve {
        /// Site URLs; the scheme may be omitted
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,
    },

    /// Fill in the icons of a Netscape bookmark file
    Import {
        /// Bookmark file exported from a browser
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// The input file is base64 encoded
        #[arg(long)]
        base64: bool,

        /// Write the result here instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        /// Base64 encode the written file
        #[arg(long)]
        encode_output: bool,

        /// Leave bookmarks that already embed an icon untouched
        #[arg(long)]
        keep_existing_icons: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_or_default(cli.config.as_deref())?;
    let resolver = FaviconResolver::from_config(&config).context("Failed to build resolver")?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    match cli.command {
        Command::Resolve { urls } => handle_resolve(&resolver, urls, &cancel).await,
        Command::Import {
            file,
            base64,
            output,
            encode_output,
            keep_existing_icons,
        } => {
            let options = ImportOptions {
                base64,
                encode_output,
                keep_existing_icons,
            };
            handle_import(&resolver, &config, &file, output.as_deref(), options, &cancel).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bookmark_icons=info,warn"),
            1 => EnvFilter::new("bookmark_icons=debug,info"),
            2 => EnvFilter::new("bookmark_icons=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load_or_default(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        let config = Config::default();
        validate(&config)?;
        return Ok(config);
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Cancels the token on the first Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling outstanding resolutions");
            cancel.cancel();
        }
    });
}

/// One `resolve` argument and its outcome, `None` until it settles
#[derive(Debug)]
struct ResolveLine {
    url: String,
    icon: Option<String>,
}

impl IconTarget for ResolveLine {
    fn url(&self) -> &str {
        &self.url
    }

    fn set_icon(&mut self, icon: String) {
        self.icon = Some(icon);
    }
}

impl ResolveLine {
    fn render(&self) -> String {
        match self.icon.as_deref() {
            Some("") => format!("{}\tnot found", self.url),
            None if self.url.trim().is_empty() => format!("{}\tnot found", self.url),
            Some(icon) => format!("{}\t{}", self.url, icon),
            None => format!("{}\tcancelled", self.url),
        }
    }
}

/// Handles `resolve`: one line per URL, in argument order
async fn handle_resolve(
    resolver: &FaviconResolver,
    urls: Vec<String>,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let mut lines: Vec<ResolveLine> = urls
        .into_iter()
        .map(|url| ResolveLine { url, icon: None })
        .collect();

    let report = resolver.resolve_batch_until(lines.iter_mut(), cancel).await;

    for line in &lines {
        println!("{}", line.render());
    }

    if report.cancelled {
        anyhow::bail!("Resolution cancelled");
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct ImportOptions {
    base64: bool,
    encode_output: bool,
    keep_existing_icons: bool,
}

/// Handles `import`: parse, resolve, and write the enriched export
async fn handle_import(
    resolver: &FaviconResolver,
    config: &Config,
    file: &Path,
    output: Option<&Path>,
    options: ImportOptions,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut bookmarks = if options.base64 {
        parse_bookmarks_base64(&content)
            .with_context(|| format!("Failed to decode {}", file.display()))?
    } else {
        parse_bookmarks_html(&content)
    };
    tracing::info!("Loaded {} bookmarks from {}", bookmarks.len(), file.display());

    let keep_existing = options.keep_existing_icons;
    let targets = bookmarks
        .iter_mut()
        .filter(|bookmark| !(keep_existing && bookmark.has_embedded_icon()));
    let report = resolver.resolve_batch_until(targets, cancel).await;

    if report.cancelled {
        anyhow::bail!("Import cancelled, nothing written");
    }

    let export_options = ExportOptions::from(&config.export);
    let now = chrono::Utc::now();
    let rendered = if options.encode_output {
        export_bookmarks_base64(&bookmarks, &export_options, now)
    } else {
        export_bookmarks_html(&bookmarks, &export_options, now)
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "✓ Wrote {} bookmarks to {} ({} icons resolved, {} failed)",
                bookmarks.len(),
                path.display(),
                report.resolved,
                report.failed
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(url: &str, icon: Option<&str>) -> ResolveLine {
        ResolveLine {
            url: url.to_string(),
            icon: icon.map(str::to_string),
        }
    }

    #[test]
    fn test_render_resolved() {
        assert_eq!(
            line("example.com", Some("data:image/png;base64,AA==")).render(),
            "example.com\tdata:image/png;base64,AA=="
        );
    }

    #[test]
    fn test_render_failed() {
        assert_eq!(line("example.com", Some("")).render(), "example.com\tnot found");
    }

    #[test]
    fn test_render_unsettled_after_cancel() {
        assert_eq!(line("example.com", None).render(), "example.com\tcancelled");
    }

    #[test]
    fn test_render_blank_url() {
        assert_eq!(line(" ", None).render(), " \tnot found");
    }

    #[tokio::test]
    async fn test_cancelled_resolve_marks_unattempted_urls() {
        let resolver = FaviconResolver::from_config(&Config::default()).unwrap();
        let mut lines = vec![line("example.com", None)];
        let token = CancellationToken::new();
        token.cancel();

        let report = resolver.resolve_batch_until(lines.iter_mut(), &token).await;

        assert!(report.cancelled);
        assert_eq!(lines[0].render(), "example.com\tcancelled");
    }
}
