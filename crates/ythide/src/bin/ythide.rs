// ABOUTME: CLI binary that scans a saved YouTube page for watched videos.
// ABOUTME: Lists them as text or JSON, or writes the page back with the watched videos hidden.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dom_query::Document;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use url::Url;
use ythide_core::options::check_threshold;
use ythide_core::{Extractor, HideSession, HtmlElement, Settings};

const WATCH_URL: &str = "https://www.youtube.com/watch";

#[derive(Parser, Debug)]
#[command(name = "ythide")]
#[command(about = "Find watched videos in a saved YouTube page and hide them")]
struct Args {
    /// Saved page HTML to scan
    #[arg()]
    html: PathBuf,

    /// Minimum watched percentage (0-100); overrides the settings file
    #[arg(short = 't', long = "threshold")]
    threshold: Option<i64>,

    /// Settings JSON file ({"enabled", "threshold", "layouts"})
    #[arg(short = 's', long = "settings")]
    settings: Option<PathBuf>,

    /// Output the watched videos as JSON
    #[arg(long = "json")]
    json_output: bool,

    /// Output the page HTML with the watched videos hidden
    #[arg(long = "hide", conflicts_with = "json_output")]
    hide: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct WatchedVideo {
    id: Option<String>,
    video_id: Option<String>,
    title: Option<String>,
    progress: Option<i64>,
    url: Option<String>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading settings {:?}", path))?;
            Settings::from_json(&json).with_context(|| format!("loading settings {:?}", path))?
        }
        None => Settings::default(),
    };
    if let Some(threshold) = args.threshold {
        settings.threshold = check_threshold(threshold)?;
    }
    Ok(settings)
}

fn watch_url(video_id: &str) -> Result<String> {
    let mut url = Url::parse(WATCH_URL)?;
    url.query_pairs_mut().append_pair("v", video_id);
    Ok(url.into())
}

fn list_watched(doc: &Document, settings: &Settings) -> Result<Vec<WatchedVideo>> {
    let root = HtmlElement::root(doc);
    let extractor = Extractor::from_settings(settings)?;

    extractor
        .extract(&root, settings.threshold)
        .into_iter()
        .map(|mut video| -> Result<WatchedVideo> {
            let id = video.get_id().map(str::to_string);
            let video_id = video.video_id().map(str::to_string);
            let url = video_id.as_deref().map(watch_url).transpose()?;
            Ok(WatchedVideo {
                id,
                video_id,
                title: video.get_title().map(str::to_string),
                progress: video.progress(),
                url,
            })
        })
        .collect()
}

fn format_text(videos: &[WatchedVideo]) -> String {
    videos
        .iter()
        .map(|v| {
            format!(
                "{}\t{}%\t{}",
                v.id.as_deref().unwrap_or("-"),
                v.progress.unwrap_or_default(),
                v.title.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn hide_watched(doc: &Document, settings: Settings) -> Result<String> {
    let root = HtmlElement::root(doc);
    let mut session = HideSession::from_settings(settings)?;
    let report = session.scan(&root);
    tracing::info!(hidden = report.newly_hidden + report.untracked, "hid watched videos");
    Ok(doc.html().to_string())
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("writing to {:?}", path))?;
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let settings = load_settings(args)?;
    let html = fs::read_to_string(&args.html)
        .with_context(|| format!("reading file {:?}", args.html))?;
    let doc = Document::from(html.as_str());

    let content = if args.hide {
        hide_watched(&doc, settings)?
    } else {
        let videos = list_watched(&doc, &settings)?;
        if args.json_output {
            serde_json::to_string_pretty(&videos)?
        } else {
            format_text(&videos)
        }
    };

    write_output(args.output.as_deref(), &content)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
