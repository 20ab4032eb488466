//! Continuous file-level localization.
//!
//! Watches one HTML file and keeps a localized copy up to date. The output
//! must differ from the input: writing the watched file back would be seen
//! as another change and loop.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use crossbeam::channel::{self, Receiver};
use notify::{RecursiveMode, Watcher};

use pseudoloc::config::{FileConfig, LocalizeConfig};
use pseudoloc::dom::Document;
use pseudoloc::log;
use pseudoloc::logger::WatchStatus;
use pseudoloc::pipeline::{LocalizeStats, localize_document};

use super::WatchArgs;

/// Quiet window after the last event before relocalizing. Editors emit
/// several events per save (create, data, rename).
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Run the `watch` command.
pub fn run_watch(args: &WatchArgs, config: &FileConfig) -> Result<()> {
    if !args.input.is_file() {
        bail!("not a file: {}", args.input.display());
    }
    if resolve(&args.input) == resolve(&args.output) {
        bail!(
            "output must differ from the watched input: {}",
            args.input.display()
        );
    }

    let config = LocalizeConfig::new(config.clone().into_options());

    // Watcher first: events arriving during the initial pass are buffered,
    // not lost.
    let (event_tx, event_rx) = channel::unbounded();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = event_tx.send(res);
    })?;

    // Watch the parent directory. Editors that replace the file on save
    // would otherwise drop the watch with it.
    let watch_root = parent_dir(&args.input);
    watcher
        .watch(watch_root, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", watch_root.display()))?;

    let shutdown = shutdown_channel()?;

    log!(
        "watch";
        "watching {} -> {} (Ctrl+C to stop)",
        args.input.display(),
        args.output.display()
    );
    let mut status = WatchStatus::new();
    let mut last_output = None;
    rebuild(args, &config, &mut status, &mut last_output);

    loop {
        crossbeam::select! {
            recv(shutdown) -> _ => {
                log!("watch"; "stopping");
                return Ok(());
            }
            recv(event_rx) -> event => {
                let Ok(event) = event else { return Ok(()) };
                if !touches_input(&event, &args.input, &mut status) {
                    continue;
                }
                drain_quiet_period(&event_rx, &args.input, &mut status);
                rebuild(args, &config, &mut status, &mut last_output);
            }
        }
    }
}

/// Ctrl+C notification as a channel, so the event loop can select on it.
fn shutdown_channel() -> Result<Receiver<()>> {
    let (tx, rx) = channel::bounded(1);
    ctrlc::set_handler(move || {
        let _ = tx.try_send(());
    })?;
    Ok(rx)
}

/// Whether an event concerns the watched file. Watch errors surface as
/// warnings but never stop the loop.
fn touches_input(
    event: &notify::Result<notify::Event>,
    input: &Path,
    status: &mut WatchStatus,
) -> bool {
    match event {
        Ok(event) => {
            let name = input.file_name();
            event.paths.iter().any(|p| p.file_name() == name)
        }
        Err(e) => {
            status.warning(&format!("watch error: {e}"));
            false
        }
    }
}

/// Swallow the rest of an event burst; returns once the channel stays
/// quiet for [`DEBOUNCE`].
fn drain_quiet_period(
    events: &Receiver<notify::Result<notify::Event>>,
    input: &Path,
    status: &mut WatchStatus,
) {
    while let Ok(event) = events.recv_timeout(DEBOUNCE) {
        let _ = touches_input(&event, input, status);
    }
}

/// One watch iteration: relocalize the input and report on the status line.
fn rebuild(
    args: &WatchArgs,
    config: &LocalizeConfig,
    status: &mut WatchStatus,
    last_output: &mut Option<String>,
) {
    match localize_once(&args.input, &args.output, config, last_output) {
        Ok(Some(stats)) => status.success(&format!(
            "localized {} ({} text nodes, {} attributes)",
            args.output.display(),
            stats.text_nodes,
            stats.attributes
        )),
        Ok(None) => status.unchanged(&format!("{} unchanged", args.output.display())),
        Err(e) => status.error(
            &format!("failed to localize {}", args.input.display()),
            &format!("{e:#}"),
        ),
    }
}

/// Localize `input` into `output`. Returns `None` without writing when the
/// rendered result matches the previous iteration, so saves that change
/// nothing keep the output's mtime alone.
fn localize_once(
    input: &Path,
    output: &Path,
    config: &LocalizeConfig,
    last_output: &mut Option<String>,
) -> Result<Option<LocalizeStats>> {
    let html = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let mut doc = Document::parse(&html)?;
    let stats = localize_document(&mut doc, config);
    let rendered = doc.to_html();

    if last_output.as_deref() == Some(rendered.as_str()) {
        return Ok(None);
    }

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(output, &rendered)
        .with_context(|| format!("failed to write {}", output.display()))?;
    *last_output = Some(rendered);
    Ok(Some(stats))
}

/// The directory whose events cover `path`.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Best-effort canonical form; nonexistent paths compare as given.
fn resolve(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
