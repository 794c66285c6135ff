//! Stock-sheet picker used when `stock tui` runs without `-f`.
//!
//! Lists `*.csv` and `*.xlsx` files under the working directory and reads the
//! user's choice from stdin.

use std::ffi::OsStr;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::domain::FileFormat;
use crate::error::AppError;

/// Default directory recursion depth for finding stock sheets.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Prompt the user to select a stock sheet from the current directory tree.
///
/// The answer is a list number or a path typed by hand; `q` cancels.
pub fn prompt_for_stock_path() -> Result<PathBuf, AppError> {
    let files = discover_stock_files();
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv or .xlsx files found. Provide one with `stock tui -f <file>`.",
        ));
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    choose_from(&files, stdin.lock(), &mut stdout)
}

/// Prompt loop over an arbitrary reader/writer pair.
fn choose_from<R: BufRead, W: Write>(files: &[PathBuf], mut input: R, out: &mut W) -> Result<PathBuf, AppError> {
    let write_err = |e: io::Error| AppError::new(2, format!("Failed to write prompt: {e}"));

    writeln!(out, "Found {} stock sheet(s):", files.len()).map_err(write_err)?;
    for (idx, path) in files.iter().enumerate() {
        let shown = path.strip_prefix(".").unwrap_or(path);
        writeln!(out, "{:>3}) {}", idx + 1, shown.display()).map_err(write_err)?;
    }

    loop {
        write!(out, "Select a file by number (1-{}) or type a path (q to quit): ", files.len()).map_err(write_err)?;
        out.flush().map_err(write_err)?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::new(
                2,
                "No input received. Provide a stock sheet with `stock tui -f <file>`.",
            ));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = line.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_stock_path(&files[choice - 1]);
            }
            writeln!(out, "Invalid choice: {choice}. Enter a number between 1 and {}.", files.len())
                .map_err(write_err)?;
            continue;
        }

        match validate_stock_path(Path::new(line)) {
            Ok(path) => return Ok(path),
            Err(err) => {
                writeln!(out, "{err}").map_err(write_err)?;
                continue;
            }
        }
    }
}

/// Validate the provided path points to a `.csv` or `.xlsx` file.
pub fn validate_stock_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(
            2,
            format!("Stock sheet not found: {}", path.display()),
        ));
    }
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if FileFormat::from_path(path).is_none() {
        return Err(AppError::new(
            2,
            format!(
                "Expected a .csv or .xlsx file (got: {}). Use -f to pass a stock sheet.",
                path.display()
            ),
        ));
    }

    Ok(path.to_path_buf())
}

/// Discover stock sheets under the current directory (deterministic order).
pub fn discover_stock_files() -> Vec<PathBuf> {
    find_stock_files(Path::new("."), DEFAULT_SEARCH_DEPTH)
}

/// Depth-limited walk from `root`; `max_depth` counts directory levels below it.
fn find_stock_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![(root.to_path_buf(), 0)];

    while let Some((dir, depth)) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            match entry.file_type() {
                Ok(kind) if kind.is_dir() => {
                    if depth < max_depth && !is_ignored_dir(&entry.file_name()) {
                        pending.push((path, depth + 1));
                    }
                }
                Ok(kind) if kind.is_file() && FileFormat::from_path(&path).is_some() => found.push(path),
                _ => {}
            }
        }
    }

    found.sort();
    found
}

/// Hidden directories and build output never hold stock sheets.
fn is_ignored_dir(name: &OsStr) -> bool {
    name.to_str()
        .is_some_and(|n| n.starts_with('.') || n == "target" || n == "node_modules")
}
