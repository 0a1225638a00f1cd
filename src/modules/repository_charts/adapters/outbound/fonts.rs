// Font discovery and registration for the plotters renderer.
//
// Every .ttf/.otf file in the font directory is registered under the family
// name stored in its `name` table (`NotoSansJP-Regular.otf` -> `Noto Sans JP`)
// and, when it differs, under the file name without its `-Style` suffix
// (`NotoSansJP`). The default family is also registered as `sans-serif`, which
// plotters falls back to.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use plotters::style::FontStyle;
use thiserror::Error;
use ttf_parser::{Face, name_id};

pub const FALLBACK_FAMILY: &str = "sans-serif";

#[derive(Debug, Error)]
pub enum FontError {
    #[error("cannot read font directory {dir}: {source}")]
    Directory {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no .ttf or .otf files found in {0}")]
    NoFonts(PathBuf),

    #[error("cannot read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid font file {0}")]
    Invalid(PathBuf),

    #[error("default font family {0:?} is not among the loaded fonts")]
    MissingDefault(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFile {
    /// Family derived from the file name.
    pub family: String,
    pub path: PathBuf,
}

/// A font file read into memory with every family name it answers to.
#[derive(Debug, Clone)]
struct LoadedFont {
    families: Vec<String>,
    path: PathBuf,
    bytes: &'static [u8],
}

impl LoadedFont {
    fn answers_to(&self, family: &str) -> bool {
        self.families.iter().any(|f| f == family)
    }
}

#[derive(Debug, Clone)]
pub struct FontRegistry {
    families: BTreeSet<String>,
}

impl FontRegistry {
    /// Discovers and registers the fonts in `dir` with plotters.
    pub fn load_dir(dir: &Path, default_family: &str) -> Result<Self, FontError> {
        let mut fonts = Vec::new();
        for file in discover(dir)? {
            let bytes = read_static(&file.path)?;
            let named = family_from_font(bytes).ok_or_else(|| FontError::Invalid(file.path.clone()))?;
            let mut families = vec![named];
            if !families.contains(&file.family) {
                families.push(file.family);
            }
            fonts.push(LoadedFont {
                families,
                path: file.path,
                bytes,
            });
        }
        let fallback_path = pick_fallback(&fonts, default_family)?.path.clone();

        let mut families = BTreeSet::new();
        for font in &fonts {
            for family in &font.families {
                register(family, font.bytes, &font.path)?;
                families.insert(family.clone());
            }
            if font.path == fallback_path {
                register(FALLBACK_FAMILY, font.bytes, &font.path)?;
            }
        }
        families.insert(FALLBACK_FAMILY.to_string());

        tracing::info!(
            dir = %dir.display(),
            families = ?families,
            default = default_family,
            "registered fonts"
        );
        Ok(Self { families })
    }

    /// A registry that registered nothing; rendering text with it fails.
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            families: BTreeSet::new(),
        }
    }

    pub fn contains(&self, family: &str) -> bool {
        self.families.contains(family)
    }
}

/// Font files in `dir`, sorted by file name.
pub fn discover(dir: &Path) -> Result<Vec<FontFile>, FontError> {
    let entries = fs::read_dir(dir).map_err(|source| FontError::Directory {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<FontFile> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter_map(|path| {
            family_from_file_name(&path).map(|family| FontFile { family, path })
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));

    if files.is_empty() {
        return Err(FontError::NoFonts(dir.to_path_buf()));
    }
    Ok(files)
}

pub fn family_from_file_name(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    if extension != "ttf" && extension != "otf" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let family = stem.split_once('-').map_or(stem, |(family, _)| family);
    (!family.is_empty()).then(|| family.to_string())
}

/// Family name from the font's `name` table; `None` if the bytes are not a font.
pub fn family_from_font(bytes: &[u8]) -> Option<String> {
    let face = Face::parse(bytes, 0).ok()?;
    let names: Vec<(u16, String)> = face
        .names()
        .into_iter()
        .filter(|name| name.is_unicode())
        .filter_map(|name| Some((name.name_id, name.to_string()?)))
        .collect();
    preferred_family(&names)
}

/// The typographic family wins over the legacy one, which carries the style
/// for non-regular weights (`Open Sans Light`).
fn preferred_family(names: &[(u16, String)]) -> Option<String> {
    [name_id::TYPOGRAPHIC_FAMILY, name_id::FAMILY]
        .iter()
        .find_map(|wanted| {
            names
                .iter()
                .find(|(id, value)| id == wanted && !value.trim().is_empty())
                .map(|(_, value)| value.trim().to_string())
        })
}

fn pick_fallback<'a>(fonts: &'a [LoadedFont], default_family: &str) -> Result<&'a LoadedFont, FontError> {
    let found = if default_family == FALLBACK_FAMILY {
        fonts.first()
    } else {
        fonts.iter().find(|f| f.answers_to(default_family))
    };
    found.ok_or_else(|| FontError::MissingDefault(default_family.to_string()))
}

fn read_static(path: &Path) -> Result<&'static [u8], FontError> {
    let bytes = fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    // plotters keeps registered fonts for the life of the process
    Ok(Box::leak(bytes.into_boxed_slice()))
}

fn register(family: &str, bytes: &'static [u8], path: &Path) -> Result<(), FontError> {
    plotters::style::register_font(family, FontStyle::Normal, bytes)
        .map_err(|_| FontError::Invalid(path.to_path_buf()))
}
