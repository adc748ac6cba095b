//! Icon layout extraction from `.DS_Store` records.
//!
//! Finder stores each icon's grid position in a 16-byte `Iloc` field. This
//! crate turns parsed records into positions, bounding boxes, and a
//! filename lookup table, and loads that table from an [`AssetSource`]
//! (disk, memory, or HTTP).
//!
//! Loading is advisory: [`load_position_map`] never fails, it returns an
//! empty map and logs the cause.

pub mod config;
pub mod error;
pub mod loader;
pub mod map;
pub mod positions;
pub mod source;
#[cfg(test)]
mod testing;

pub use config::LayoutConfig;
pub use error::{LayoutError, LayoutResult};
pub use loader::{load_position_map, try_load_position_map};
pub use map::{extract_filename, PositionMap};
pub use positions::{
    calculate_bounds, extract_file_positions, filter_by_extension, filter_glb_positions,
    GLB_EXTENSION,
};
pub use source::{AssetSource, FileAssetSource, HttpAssetSource, InMemoryAssetSource};

#[cfg(test)]
mod tests {
    use super::*;
    use dsstore_format::fixture::{FixtureBuilder, FixtureEntry, FixtureNode};
    use dsstore_format::DsStoreParser;
    use dsstore_types::{Bounds, FieldValue, Point};

    #[test]
    fn records_to_bounds() {
        let data = FixtureBuilder::tree(FixtureNode::Internal {
            children: vec![
                FixtureNode::Leaf(vec![
                    FixtureEntry::icon_location("a.glb", 10, 20),
                    FixtureEntry::new("a.glb", "cmmt", &FieldValue::Text("x".into())),
                ]),
                FixtureNode::Leaf(vec![FixtureEntry::icon_location("z.txt", 999, 999)]),
            ],
            entries: vec![FixtureEntry::icon_location("m.glb", 110, 60)],
        })
        .build();

        let records = DsStoreParser::new(&data).parse().unwrap();
        let glb = filter_glb_positions(extract_file_positions(&records));
        assert_eq!(glb.len(), 2);
        assert_eq!(
            calculate_bounds(&glb),
            Bounds {
                min_x: 10,
                max_x: 110,
                min_y: 20,
                max_y: 60,
                width: 100,
                height: 40,
            }
        );
    }

    #[test]
    fn repeated_iloc_keeps_last() {
        let data = FixtureBuilder::leaf(vec![
            FixtureEntry::icon_location("model.glb", 1, 1),
            FixtureEntry::icon_location("model.glb", 10, 20),
        ])
        .build();
        let records = DsStoreParser::new(&data).parse().unwrap();
        let map = PositionMap::from_positions(extract_file_positions(&records));
        assert_eq!(map.get("model.glb"), Some(Point { x: 10, y: 20 }));
    }
}
