//! Item type catalog
//!
//! Maps each item type to its ordered animation frames. The catalog is fixed
//! once a session boots; catalog order is the order types unlock in.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Index of an item type in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u16);

/// One item type and its frame keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub frames: Vec<String>,
}

/// Immutable mapping from type id to renderable frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureCatalog {
    entries: Vec<CatalogEntry>,
}

/// Built-in item set (two-frame idle animation each)
const BUILTIN_TYPES: [&str; 6] = ["cherry", "clover", "bell", "gem", "moon", "heart"];

impl TextureCatalog {
    /// Build a catalog, rejecting empty, frameless or duplicated types
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        if entries.len() > u16::MAX as usize {
            return Err(CatalogError::TooManyTypes {
                count: entries.len(),
                max: u16::MAX as usize,
            });
        }
        for (i, entry) in entries.iter().enumerate() {
            if entry.frames.is_empty() {
                return Err(CatalogError::NoFrames {
                    name: entry.name.clone(),
                });
            }
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(CatalogError::DuplicateType {
                    name: entry.name.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Convenience constructor from `(name, frames)` pairs
    pub fn from_names<N, F>(types: impl IntoIterator<Item = (N, Vec<F>)>) -> Result<Self, CatalogError>
    where
        N: Into<String>,
        F: Into<String>,
    {
        let entries = types
            .into_iter()
            .map(|(name, frames)| CatalogEntry {
                name: name.into(),
                frames: frames.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self::new(entries)
    }

    /// The shipped six-type catalog
    pub fn builtin() -> Self {
        let entries = BUILTIN_TYPES
            .iter()
            .map(|name| CatalogEntry {
                name: (*name).to_string(),
                frames: vec![format!("item-{name}-0"), format!("item-{name}-1")],
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Type ids in unlock order
    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        (0..self.entries.len()).map(|i| TypeId(i as u16))
    }

    /// Frames for a type (`None` if the id is not in the catalog)
    pub fn frames(&self, id: TypeId) -> Option<&[String]> {
        self.entries.get(id.0 as usize).map(|e| e.frames.as_slice())
    }

    pub fn name(&self, id: TypeId) -> Option<&str> {
        self.entries.get(id.0 as usize).map(|e| e.name.as_str())
    }

    pub fn id_of(&self, name: &str) -> Option<TypeId> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .map(|i| TypeId(i as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = TextureCatalog::builtin();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.name(TypeId(0)), Some("cherry"));
        assert_eq!(catalog.id_of("heart"), Some(TypeId(5)));
        assert_eq!(catalog.frames(TypeId(2)).map(|f| f.len()), Some(2));
        assert_eq!(catalog.frames(TypeId(6)), None);
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let entries: Vec<(&str, Vec<&str>)> = Vec::new();
        assert_eq!(TextureCatalog::from_names(entries), Err(CatalogError::Empty));
    }

    #[test]
    fn test_rejects_frameless_type() {
        let result = TextureCatalog::from_names([("A", vec!["a0"]), ("B", Vec::<&str>::new())]);
        assert_eq!(
            result,
            Err(CatalogError::NoFrames {
                name: "B".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_duplicate_type() {
        let result = TextureCatalog::from_names([("A", vec!["a0"]), ("A", vec!["a1"])]);
        assert_eq!(
            result,
            Err(CatalogError::DuplicateType {
                name: "A".to_string()
            })
        );
    }

    #[test]
    fn test_type_ids_follow_catalog_order() {
        let catalog =
            TextureCatalog::from_names([("A", vec!["a"]), ("B", vec!["b"]), ("C", vec!["c"])])
                .unwrap();
        let ids: Vec<_> = catalog.type_ids().collect();
        assert_eq!(ids, vec![TypeId(0), TypeId(1), TypeId(2)]);
    }
}
