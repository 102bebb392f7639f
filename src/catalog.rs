//! Part catalog ingestion.
//!
//! The catalog is a JSON array of part entries:
//!
//! ```json
//! [
//!   {
//!     "id": "l_block",
//!     "name_ru": "Угловой теплообменник",
//!     "power": 4, "control": 1, "malfunction_risk": 2, "price": 120,
//!     "texture": "textures/l_block.png",
//!     "texturePixelsPerCell": 64,
//!     "textureAnchor": { "x": 6, "y": 6 },
//!     "shape": [[1, 0], [1, 0], [1, 1]]
//!   }
//! ]
//! ```
//!
//! Optional texture metadata is resolved to concrete defaults here, once, so
//! the engine never re-defaults it at read sites.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::board::{PaletteItem, PartStats, Point, Shape, ShapeError, StatsLookup, TextureBinding};

/// Errors that can occur when loading a catalog or selecting from it
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse catalog JSON: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("duplicate part id '{id}'")]
    DuplicateId { id: String },
    #[error("invalid shape for part '{id}': {source}")]
    InvalidShape { id: String, source: ShapeError },
    #[error("part '{id}' has non-positive texturePixelsPerCell {value}")]
    InvalidPixelsPerCell { id: String, value: f64 },
    #[error("unknown part '{id}'")]
    UnknownPart { id: String, suggestions: Vec<String> },
}

/// One pickable part
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    /// Display name
    pub name: String,
    /// Occupancy at rotation 0, unmirrored
    pub shape: Shape,
    pub texture: Option<String>,
    pub binding: TextureBinding,
    pub stats: PartStats,
}

impl CatalogEntry {
    /// The palette payload handed to the drag controller on pick-up
    pub fn palette_item(&self) -> PaletteItem {
        PaletteItem {
            catalog_id: self.id.clone(),
            shape: self.shape.clone(),
            binding: self.binding,
        }
    }
}

/// JSON structure for deserializing catalog entries
#[derive(Deserialize)]
struct JsonPart {
    id: String,
    #[serde(default, alias = "name_ru")]
    name: Option<String>,
    #[serde(default)]
    power: f64,
    #[serde(default)]
    control: f64,
    #[serde(default)]
    malfunction_risk: f64,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    texture: Option<String>,
    #[serde(default, rename = "texturePixelsPerCell")]
    texture_pixels_per_cell: Option<f64>,
    #[serde(default, rename = "textureAnchor")]
    texture_anchor: Option<Point>,
    shape: Vec<Vec<i64>>,
}

impl JsonPart {
    fn into_entry(self) -> Result<CatalogEntry, CatalogError> {
        let rows = self
            .shape
            .iter()
            .map(|row| row.iter().map(|&c| c != 0).collect())
            .collect();
        let shape = Shape::new(rows).map_err(|source| CatalogError::InvalidShape {
            id: self.id.clone(),
            source,
        })?;

        let pixels_per_cell = self
            .texture_pixels_per_cell
            .unwrap_or(TextureBinding::DEFAULT_PIXELS_PER_CELL);
        if pixels_per_cell <= 0.0 {
            return Err(CatalogError::InvalidPixelsPerCell {
                id: self.id,
                value: pixels_per_cell,
            });
        }
        let anchor = self.texture_anchor.unwrap_or_default();

        Ok(CatalogEntry {
            name: self.name.unwrap_or_else(|| self.id.clone()),
            binding: TextureBinding::capture(&shape, pixels_per_cell, anchor),
            shape,
            texture: self.texture,
            stats: PartStats {
                power: self.power,
                control: self.control,
                malfunction_risk: self.malfunction_risk,
                price: self.price,
            },
            id: self.id,
        })
    }
}

/// An ordered, id-indexed set of parts
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from already-resolved entries
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId {
                    id: entry.id.clone(),
                });
            }
        }
        Ok(Self { entries, index })
    }

    /// Load a catalog from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load a catalog from a JSON string
    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let parts: Vec<JsonPart> = serde_json::from_str(content)?;
        let entries = parts
            .into_iter()
            .map(JsonPart::into_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Entries that can be offered for dragging (non-empty shapes)
    pub fn palette(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| !e.shape.is_empty())
    }

    /// Keep only the parts named in `ids`, preserving catalog order
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<Catalog, CatalogError> {
        let mut wanted = HashSet::new();
        for id in ids {
            let id = id.as_ref();
            if self.get(id).is_none() {
                return Err(CatalogError::UnknownPart {
                    id: id.to_string(),
                    suggestions: self.suggest(id),
                });
            }
            wanted.insert(id);
        }
        let entries = self
            .entries
            .iter()
            .filter(|e| wanted.contains(e.id.as_str()))
            .cloned()
            .collect();
        Catalog::new(entries)
    }

    /// Part ids within a small edit distance of `name`, closest first
    pub fn suggest(&self, name: &str) -> Vec<String> {
        let mut candidates: Vec<(String, usize)> = self
            .entries
            .iter()
            .filter_map(|e| {
                let dist = levenshtein_distance(&e.id, name);
                (dist <= 2 && dist > 0).then(|| (e.id.clone(), dist))
            })
            .collect();
        candidates.sort_by_key(|(_, d)| *d);
        candidates.into_iter().map(|(id, _)| id).take(3).collect()
    }
}

impl StatsLookup for Catalog {
    fn stats_for(&self, catalog_id: &str) -> Option<&PartStats> {
        self.get(catalog_id).map(|e| &e.stats)
    }
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];
    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"[
        {
            "id": "l_block",
            "name_ru": "Уголок",
            "power": 4, "control": 1, "malfunction_risk": 2, "price": 120,
            "texture": "textures/l_block.png",
            "texturePixelsPerCell": 64,
            "textureAnchor": { "x": 6, "y": 6 },
            "shape": [[1, 0], [1, 0], [1, 1]]
        },
        {
            "id": "bar",
            "power": 1, "control": 0, "malfunction_risk": 0, "price": 10,
            "texture": null,
            "shape": [[1, 1]]
        },
        {
            "id": "ghost",
            "shape": []
        }
    ]"#;

    #[test]
    fn test_load_resolves_defaults() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);

        let l_block = catalog.get("l_block").unwrap();
        assert_eq!(l_block.name, "Уголок");
        assert_eq!(l_block.binding.pixels_per_cell, 64.0);
        assert_eq!(l_block.binding.anchor, Point::new(6.0, 6.0));
        assert_eq!((l_block.binding.base_width, l_block.binding.base_height), (2, 3));
        assert_eq!(l_block.stats.price, 120.0);

        let bar = catalog.get("bar").unwrap();
        assert_eq!(bar.name, "bar");
        assert_eq!(bar.texture, None);
        assert_eq!(bar.binding.pixels_per_cell, 60.0);
        assert_eq!(bar.binding.anchor, Point::origin());
    }

    #[test]
    fn test_palette_skips_empty_shapes() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let ids: Vec<&str> = catalog.palette().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["l_block", "bar"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = Catalog::from_json(r#"[{"id": "a", "shape": [[1]]}, {"id": "a", "shape": [[1]]}]"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { id } if id == "a"));
    }

    #[test]
    fn test_ragged_shape_rejected() {
        let err = Catalog::from_json(r#"[{"id": "bad", "shape": [[1, 1], [1]]}]"#).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_non_positive_pixels_per_cell_rejected() {
        let err = Catalog::from_json(r#"[{"id": "p", "texturePixelsPerCell": 0, "shape": [[1]]}]"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPixelsPerCell { .. }));
    }

    #[test]
    fn test_select_keeps_catalog_order() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let selected = catalog.select(&["bar", "l_block"]).unwrap();
        let ids: Vec<&str> = selected.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["l_block", "bar"]);
    }

    #[test]
    fn test_select_unknown_suggests() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let err = catalog.select(&["l_blok"]).unwrap_err();
        match err {
            CatalogError::UnknownPart { id, suggestions } => {
                assert_eq!(id, "l_blok");
                assert_eq!(suggestions, vec!["l_block".to_string()]);
            }
            other => panic!("Expected UnknownPart, got {:?}", other),
        }
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("valve", "valve"), 0);
        assert_eq!(levenshtein_distance("valve", "valv"), 1);
        assert_eq!(levenshtein_distance("cat", "dog"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }
}
