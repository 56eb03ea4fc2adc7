//! # Font Catalog
//!
//! Enumerates TTF/OTF files under configured directories and resolves
//! family/style names to file paths. The catalog never parses font
//! binaries; family and style come from the file stem
//! (`DejaVuSans-Bold.ttf` is family "DejaVuSans", style "Bold", and a
//! stem without a dash gets style "Regular").

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::EtiquetaError;

/// Style name assigned to fonts whose file stem carries none.
pub const DEFAULT_STYLE: &str = "Regular";

/// Font families found on disk: family name to style name to path.
#[derive(Debug, Default)]
pub struct FontCatalog {
    families: BTreeMap<String, BTreeMap<String, PathBuf>>,
}

impl FontCatalog {
    /// Scan `dirs` recursively for font files. Unreadable directories
    /// are skipped with a warning; a catalog can legitimately be empty
    /// when only image or QR labels are printed.
    pub fn scan(dirs: &[PathBuf]) -> Self {
        let mut catalog = Self::default();
        for dir in dirs {
            let mut stack = vec![dir.clone()];
            while let Some(current) = stack.pop() {
                let entries = match std::fs::read_dir(&current) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!(dir = %current.display(), error = %e, "skipping font directory");
                        continue;
                    }
                };
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.is_dir() {
                        stack.push(path);
                    } else if is_font_file(&path) {
                        catalog.add(path);
                    }
                }
            }
        }
        debug!(families = catalog.families.len(), "font catalog scanned");
        catalog
    }

    fn add(&mut self, path: PathBuf) {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return;
        };
        let (family, style) = split_stem(stem);
        self.families
            .entry(family.to_string())
            .or_default()
            .insert(style.to_string(), path);
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Family names in sorted order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    /// Styles available for a family.
    pub fn styles(
        &self,
        family: &str,
    ) -> Result<&BTreeMap<String, PathBuf>, EtiquetaError> {
        self.families
            .get(family)
            .ok_or_else(|| EtiquetaError::Config(format!("Unknown font family: {}", family)))
    }

    /// Resolve a family/style pair to a font path.
    pub fn lookup(&self, family: &str, style: &str) -> Result<&Path, EtiquetaError> {
        let styles = self.styles(family)?;
        styles.get(style).map(PathBuf::as_path).ok_or_else(|| {
            EtiquetaError::Config(format!(
                "Unknown font style: {} for font {}",
                style, family
            ))
        })
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf"))
}

/// Split a file stem into family and style on the last dash.
fn split_stem(stem: &str) -> (&str, &str) {
    match stem.rsplit_once('-') {
        Some((family, style)) if !family.is_empty() && !style.is_empty() => (family, style),
        _ => (stem, DEFAULT_STYLE),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, b"\x00\x01\x00\x00").unwrap();
    }

    #[test]
    fn test_split_stem() {
        assert_eq!(split_stem("DejaVuSans-Bold"), ("DejaVuSans", "Bold"));
        assert_eq!(split_stem("Arial"), ("Arial", "Regular"));
        assert_eq!(
            split_stem("Fira-Sans-Condensed"),
            ("Fira-Sans", "Condensed")
        );
    }

    #[test]
    fn test_scan_finds_nested_fonts() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("truetype");
        std::fs::create_dir(&nested).unwrap();
        touch(&nested.join("DejaVuSans-Bold.ttf"));
        touch(&dir.path().join("Arial.otf"));
        touch(&dir.path().join("README.txt"));

        let catalog = FontCatalog::scan(&[dir.path().to_path_buf()]);
        assert_eq!(catalog.families().collect::<Vec<_>>(), vec!["Arial", "DejaVuSans"]);
        assert!(catalog.lookup("DejaVuSans", "Bold").is_ok());
        assert!(catalog.lookup("Arial", "Regular").is_ok());
    }

    #[test]
    fn test_unknown_family_and_style_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Arial.ttf"));
        let catalog = FontCatalog::scan(&[dir.path().to_path_buf()]);

        assert!(matches!(
            catalog.lookup("Comic", "Regular"),
            Err(EtiquetaError::Config(_))
        ));
        assert!(matches!(
            catalog.lookup("Arial", "Bold"),
            Err(EtiquetaError::Config(_))
        ));
    }

    #[test]
    fn test_missing_directory_yields_empty_catalog() {
        let catalog = FontCatalog::scan(&[PathBuf::from("/nonexistent/fonts")]);
        assert!(catalog.is_empty());
    }
}
