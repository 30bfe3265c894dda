//! Default input locations in a working directory

use std::path::{Path, PathBuf};
use glob::{glob, Pattern};
use tracing::debug;
use crate::error::{Error, Result};

/// File name of the bol.com order overview export
pub const ORDERS_FILE_NAME: &str = "bol.com - Bestellingen.pdf";

/// Shipping label exports carry a date suffix after this prefix
pub const LABELS_FILE_PATTERN: &str = "verzendzegels*.pdf";

pub const OUTPUT_FILE_NAME: &str = "output.pdf";

/// Inputs found in a directory; `None` when nothing suitable exists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultInputs {
    pub orders: Option<PathBuf>,
    pub labels: Option<PathBuf>,
    pub output: PathBuf,
}

/// Look for the usual export files in `dir`
///
/// When several label files match, the first in sorted order is used.
pub fn find_default_inputs(dir: &Path) -> Result<DefaultInputs> {
    let orders = dir.join(ORDERS_FILE_NAME);
    let orders = orders.is_file().then_some(orders);

    let pattern = format!(
        "{}/{}",
        Pattern::escape(&dir.to_string_lossy()),
        LABELS_FILE_PATTERN
    );
    let mut candidates: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| Error::InvalidGlob(e.to_string()))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    candidates.sort();
    if candidates.len() > 1 {
        debug!("{} label files found, using the first", candidates.len());
    }

    Ok(DefaultInputs {
        orders,
        labels: candidates.into_iter().next(),
        output: dir.join(OUTPUT_FILE_NAME),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_both_inputs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(ORDERS_FILE_NAME), b"%PDF").unwrap();
        fs::write(dir.path().join("verzendzegels-2024-05-02.pdf"), b"%PDF").unwrap();
        fs::write(dir.path().join("verzendzegels-2024-05-01.pdf"), b"%PDF").unwrap();
        fs::write(dir.path().join("notes.pdf"), b"%PDF").unwrap();

        let found = find_default_inputs(dir.path()).unwrap();

        assert_eq!(found.orders, Some(dir.path().join(ORDERS_FILE_NAME)));
        assert_eq!(found.labels, Some(dir.path().join("verzendzegels-2024-05-01.pdf")));
        assert_eq!(found.output, dir.path().join("output.pdf"));
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let found = find_default_inputs(dir.path()).unwrap();
        assert_eq!(found.orders, None);
        assert_eq!(found.labels, None);
    }

    #[test]
    fn test_directory_with_glob_characters() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("export [mei]");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("verzendzegels.pdf"), b"%PDF").unwrap();

        let found = find_default_inputs(&nested).unwrap();
        assert_eq!(found.labels, Some(nested.join("verzendzegels.pdf")));
    }
}
