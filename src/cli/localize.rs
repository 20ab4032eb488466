//! One-shot localization of HTML files.
//!
//! Directories are walked for `*.html` / `*.htm`, files are processed in
//! parallel, and each result lands in one of three places: a mirror of the
//! input layout under `--output`, the input itself with `--in-place`, or a
//! `<name>.pseudo.html` sibling by default.

use std::ffi::OsStr;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, anyhow, bail};
use jwalk::WalkDir;
use parking_lot::Mutex;
use rayon::prelude::*;

use pseudoloc::config::{FileConfig, LocalizeConfig};
use pseudoloc::dom::Document;
use pseudoloc::log;
use pseudoloc::logger::ProgressLine;
use pseudoloc::pipeline::{LocalizeStats, localize_document};

use super::LocalizeArgs;

/// Run the `localize` command.
pub fn run_localize(args: &LocalizeArgs, config: &FileConfig) -> Result<()> {
    if args.in_place && args.output.is_some() {
        bail!("--in-place cannot be combined with --output");
    }

    let files = collect_html_files(&args.paths)?;
    if files.is_empty() {
        log!("localize"; "no HTML files found");
        return Ok(());
    }

    let progress = (files.len() > 1).then(|| ProgressLine::new(&[("files", files.len())]));

    let has_error = AtomicBool::new(false);
    let totals = Mutex::new(LocalizeStats::default());

    files.par_iter().try_for_each(|(source, relative)| {
        if has_error.load(Ordering::Relaxed) {
            return Err(anyhow!("aborted"));
        }
        let target = output_path(source, relative, args);
        match localize_file(source, &target, config) {
            Ok(stats) => {
                totals.lock().merge(stats);
                if let Some(p) = progress.as_ref() {
                    p.inc("files");
                }
                Ok(())
            }
            Err(e) => {
                if !has_error.swap(true, Ordering::Relaxed) {
                    log!("error"; "{}: {:#}", source.display(), e);
                }
                Err(anyhow!("localization failed"))
            }
        }
    })?;

    if let Some(p) = progress {
        p.finish();
    }

    let totals = totals.into_inner();
    log!(
        "localize";
        "{} file{} done, {} text node{} and {} attribute{} rewritten",
        files.len(), plural(files.len()),
        totals.text_nodes, plural(totals.text_nodes),
        totals.attributes, plural(totals.attributes)
    );
    Ok(())
}

/// Localize one document from `source` into `target`.
///
/// Parent directories of `target` are created on demand so `--output`
/// mirrors can materialize nested layouts.
pub fn localize_file(source: &Path, target: &Path, config: &FileConfig) -> Result<LocalizeStats> {
    let html = fs::read_to_string(source)
        .with_context(|| format!("failed to read {}", source.display()))?;
    let mut doc = Document::parse(&html)?;

    let config = LocalizeConfig::new(config.clone().into_options());
    let stats = localize_document(&mut doc, &config);

    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(target, doc.to_html())
        .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(stats)
}

/// Where the localized copy of `source` goes.
fn output_path(source: &Path, relative: &Path, args: &LocalizeArgs) -> PathBuf {
    if args.in_place {
        return source.to_path_buf();
    }
    if let Some(dir) = &args.output {
        return dir.join(relative);
    }
    sibling_path(source)
}

/// `dir/index.html` -> `dir/index.pseudo.html`, keeping the extension.
fn sibling_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(OsStr::to_string_lossy)
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(OsStr::to_string_lossy)
        .unwrap_or_default();
    source.with_file_name(format!("{stem}.pseudo.{ext}"))
}

/// Collect `(source, relative)` pairs from the CLI paths. The relative part
/// preserves directory layout for `--output` mirroring; plain file arguments
/// contribute just their file name.
fn collect_html_files(paths: &[PathBuf]) -> Result<Vec<(PathBuf, PathBuf)>> {
    // Handle stdin case: read paths from stdin when `-` is passed
    let paths: Vec<PathBuf> = if paths.len() == 1 && paths[0].as_os_str() == "-" {
        read_paths_from_stdin()?
    } else {
        paths.to_vec()
    };

    let mut files = Vec::new();
    for path in &paths {
        if path.is_file() {
            if !is_html_file(path) {
                bail!("not an HTML file: {}", path.display());
            }
            let name = path.file_name().map(PathBuf::from).unwrap_or_default();
            files.push((path.clone(), name));
        } else if path.is_dir() {
            for file in walk_html_files(path) {
                let relative = file.strip_prefix(path).unwrap_or(&file).to_path_buf();
                files.push((file, relative));
            }
        } else {
            bail!("path not found: {}", path.display());
        }
    }
    Ok(files)
}

/// Read file paths from stdin, one per line
fn read_paths_from_stdin() -> Result<Vec<PathBuf>> {
    let stdin = io::stdin();
    let mut paths = Vec::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }

    Ok(paths)
}

/// Walk a directory for HTML files, sorted for deterministic processing.
fn walk_html_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| is_html_file(p))
        .collect();
    files.sort();
    files
}

fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localize_file_transforms_content_but_not_style() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("page.html");
        let target = dir.path().join("page.pseudo.html");
        fs::write(
            &source,
            "<html><body><p>Hello</p><style>.a { color: red; }</style></body></html>",
        )
        .unwrap();

        let stats = localize_file(&source, &target, &FileConfig::default()).unwrap();
        assert_eq!(stats.text_nodes, 1);

        let out = fs::read_to_string(&target).unwrap();
        assert!(out.contains("Ħḗŀŀǿ"));
        assert!(out.contains(".a { color: red; }"));
    }

    #[test]
    fn test_localize_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("page.html");
        fs::write(&source, "<p>Hi</p><input placeholder=\"Search\">").unwrap();

        let stats = localize_file(&source, &source, &FileConfig::default()).unwrap();
        assert_eq!(stats.text_nodes, 1);
        assert_eq!(stats.attributes, 1);

        let out = fs::read_to_string(&source).unwrap();
        assert!(out.contains("Ħī"));
        assert!(out.contains("Şḗȧřƈħ"));
    }

    #[test]
    fn test_collect_walks_directories_and_keeps_layout() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.html"), "<p>a</p>").unwrap();
        fs::write(dir.path().join("sub/b.htm"), "<p>b</p>").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let files = collect_html_files(&[dir.path().to_path_buf()]).unwrap();
        let relatives: Vec<_> = files.iter().map(|(_, r)| r.clone()).collect();
        assert_eq!(relatives, vec![PathBuf::from("a.html"), PathBuf::from("sub/b.htm")]);
    }

    #[test]
    fn test_collect_rejects_missing_and_non_html_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "text").unwrap();

        assert!(collect_html_files(&[dir.path().join("gone.html")]).is_err());
        assert!(collect_html_files(&[dir.path().join("notes.txt")]).is_err());
    }

    #[test]
    fn test_sibling_path_keeps_extension() {
        assert_eq!(
            sibling_path(Path::new("dir/index.html")),
            PathBuf::from("dir/index.pseudo.html")
        );
        assert_eq!(
            sibling_path(Path::new("legacy.htm")),
            PathBuf::from("legacy.pseudo.htm")
        );
    }
}
