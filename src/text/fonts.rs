use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{RiddleError, RiddleResult};
use crate::text::FontRole;

const SANS_FAMILIES: &[&str] = &[
    "Inter",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Helvetica",
    "Arial",
];

// Fonts known to carry the card suit glyphs.
const SYMBOL_FAMILIES: &[&str] = &[
    "DejaVu Serif",
    "DejaVu Sans",
    "Noto Sans Symbols2",
    "Noto Sans Symbols",
    "Liberation Serif",
    "Times New Roman",
];

/// Raw font file bytes plus the face index inside the file.
#[derive(Clone)]
pub struct LoadedFont {
    pub bytes: Arc<Vec<u8>>,
    pub index: u32,
    /// Where the font came from, for diagnostics.
    pub origin: String,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("origin", &self.origin)
            .field("index", &self.index)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl LoadedFont {
    pub fn from_path(path: &Path) -> RiddleResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            RiddleError::validation(format!("read font '{}': {e}", path.display()))
        })?;
        if bytes.is_empty() {
            return Err(RiddleError::validation(format!(
                "font file '{}' is empty",
                path.display()
            )));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            index: 0,
            origin: path.display().to_string(),
        })
    }
}

/// Font sources from configuration. Explicit paths win over system discovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
    pub symbol: Option<PathBuf>,
    /// Search installed system fonts for roles without an explicit path.
    pub system_fonts: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular: None,
            bold: None,
            symbol: None,
            system_fonts: true,
        }
    }
}

/// Fonts per role. Missing roles fall back `Symbol -> Bold -> Regular`.
#[derive(Clone, Debug, Default)]
pub struct FontSet {
    regular: Option<LoadedFont>,
    bold: Option<LoadedFont>,
    symbol: Option<LoadedFont>,
}

impl FontSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(font: LoadedFont) -> Self {
        Self {
            regular: Some(font),
            bold: None,
            symbol: None,
        }
    }

    #[tracing::instrument(skip(cfg))]
    pub fn resolve(cfg: &FontConfig) -> RiddleResult<Self> {
        let load = |p: &Option<PathBuf>| p.as_deref().map(LoadedFont::from_path).transpose();
        let mut set = Self {
            regular: load(&cfg.regular)?,
            bold: load(&cfg.bold)?,
            symbol: load(&cfg.symbol)?,
        };

        let missing = set.regular.is_none() || set.bold.is_none() || set.symbol.is_none();
        if cfg.system_fonts && missing {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system font database");

            if set.regular.is_none() {
                set.regular = query_system(&db, SANS_FAMILIES, usvg::fontdb::Weight::NORMAL);
            }
            if set.bold.is_none() {
                set.bold = query_system(&db, SANS_FAMILIES, usvg::fontdb::Weight::BOLD);
            }
            if set.symbol.is_none() {
                set.symbol = query_system(&db, SYMBOL_FAMILIES, usvg::fontdb::Weight::BOLD);
            }
        }

        for role in FontRole::ALL {
            match set.get(role) {
                Some(f) => tracing::debug!(?role, origin = %f.origin, "font resolved"),
                None => tracing::warn!(?role, "no font available; text in this role is skipped"),
            }
        }
        Ok(set)
    }

    /// Font for `role`, after fallback.
    pub fn get(&self, role: FontRole) -> Option<&LoadedFont> {
        let regular = self.regular.as_ref();
        match role {
            FontRole::Regular => regular,
            FontRole::Bold => self.bold.as_ref().or(regular),
            FontRole::Symbol => self.symbol.as_ref().or(self.bold.as_ref()).or(regular),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.bold.is_none() && self.symbol.is_none()
    }
}

fn query_system(
    db: &usvg::fontdb::Database,
    families: &[&str],
    weight: usvg::fontdb::Weight,
) -> Option<LoadedFont> {
    let mut query_families: Vec<usvg::fontdb::Family<'_>> = families
        .iter()
        .map(|name| usvg::fontdb::Family::Name(*name))
        .collect();
    query_families.push(usvg::fontdb::Family::SansSerif);

    let id = db
        .query(&usvg::fontdb::Query {
            families: &query_families,
            weight,
            ..usvg::fontdb::Query::default()
        })
        .or_else(|| db.faces().next().map(|f| f.id))?;

    let origin = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "system".to_owned());

    db.with_face_data(id, |data, index| LoadedFont {
        bytes: Arc::new(data.to_vec()),
        index,
        origin: format!("system:{origin}"),
    })
}
