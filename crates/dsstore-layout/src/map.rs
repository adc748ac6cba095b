use std::collections::BTreeMap;

use dsstore_types::{FilePosition, Point};
use serde::{Deserialize, Serialize};

/// Filename to icon position lookup table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionMap(BTreeMap<String, Point>);

impl PositionMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold positions into a map. A repeated filename keeps its last position.
    pub fn from_positions(positions: impl IntoIterator<Item = FilePosition>) -> Self {
        let mut map = Self::new();
        for p in positions {
            let point = p.point();
            map.insert(p.filename, point);
        }
        map
    }

    /// Set a position, returning the previous one.
    pub fn insert(&mut self, filename: String, point: Point) -> Option<Point> {
        self.0.insert(filename, point)
    }

    /// Position by exact filename.
    pub fn get(&self, filename: &str) -> Option<Point> {
        self.0.get(filename).copied()
    }

    /// Look up a model by path, e.g. `/assets/goldens/chair.glb`.
    pub fn lookup_model(&self, model_path: &str) -> Option<Point> {
        self.get(extract_filename(model_path))
    }

    /// Number of filenames.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no positions are mapped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in filename order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Point)> {
        self.0.iter()
    }
}

/// Last `/`-separated component of a path. A trailing slash yields the
/// whole input.
pub fn extract_filename(path: &str) -> &str {
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(name: &str, x: u32, y: u32) -> FilePosition {
        FilePosition::new(name, Point { x, y })
    }

    #[test]
    fn last_write_wins() {
        let map = PositionMap::from_positions(vec![
            pos("a.glb", 1, 2),
            pos("b.glb", 3, 4),
            pos("a.glb", 5, 6),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a.glb"), Some(Point { x: 5, y: 6 }));
    }

    #[test]
    fn lookup_by_model_path() {
        let map = PositionMap::from_positions(vec![pos("mymodel.glb", 7, 8)]);
        assert_eq!(
            map.lookup_model("/assets/goldens/mymodel.glb"),
            Some(Point { x: 7, y: 8 })
        );
        assert_eq!(map.lookup_model("mymodel.glb"), Some(Point { x: 7, y: 8 }));
        assert!(map.lookup_model("/assets/other.glb").is_none());
    }

    #[test]
    fn filename_extraction() {
        assert_eq!(extract_filename("/assets/goldens/mymodel.glb"), "mymodel.glb");
        assert_eq!(extract_filename("plain.glb"), "plain.glb");
        assert_eq!(extract_filename("dir/"), "dir/");
        assert_eq!(extract_filename(""), "");
    }

    #[test]
    fn serializes_as_object() {
        let map = PositionMap::from_positions(vec![pos("a.glb", 1, 2)]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"a.glb":{"x":1,"y":2}}"#);
    }
}
