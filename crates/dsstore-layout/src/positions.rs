use dsstore_types::{Bounds, FilePosition, Record};

/// Suffix of the model files the scene lays out.
pub const GLB_EXTENSION: &str = ".glb";

/// Icon positions of every record with a well-formed `Iloc` field.
///
/// Records without one, with a payload that is not exactly 16 bytes, or with
/// an empty filename are skipped.
pub fn extract_file_positions(records: &[Record]) -> Vec<FilePosition> {
    records
        .iter()
        .filter(|r| !r.name.is_empty())
        .filter_map(|r| r.icon_location().map(|p| FilePosition::new(r.name.clone(), p)))
        .collect()
}

/// Keep positions whose filename ends with `extension`, ignoring case.
pub fn filter_by_extension(positions: Vec<FilePosition>, extension: &str) -> Vec<FilePosition> {
    let extension = extension.to_lowercase();
    positions
        .into_iter()
        .filter(|p| p.filename.to_lowercase().ends_with(&extension))
        .collect()
}

/// Keep `.glb` files only.
pub fn filter_glb_positions(positions: Vec<FilePosition>) -> Vec<FilePosition> {
    filter_by_extension(positions, GLB_EXTENSION)
}

/// Bounding box of `positions`. Empty input yields all zeros.
pub fn calculate_bounds(positions: &[FilePosition]) -> Bounds {
    let Some(first) = positions.first() else {
        return Bounds::default();
    };
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    for p in &positions[1..] {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    Bounds {
        min_x,
        max_x,
        min_y,
        max_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsstore_types::{FieldValue, FourCc, Point};
    use proptest::prelude::*;

    fn iloc_blob(x: u32, y: u32, len: usize) -> FieldValue {
        let mut blob = Vec::new();
        blob.extend_from_slice(&x.to_be_bytes());
        blob.extend_from_slice(&y.to_be_bytes());
        blob.resize(len, 0);
        FieldValue::Blob(blob)
    }

    fn record(name: &str, value: FieldValue) -> Record {
        let mut r = Record::new(name);
        r.insert(FourCc::ICON_LOCATION, value);
        r
    }

    fn pos(name: &str, x: u32, y: u32) -> FilePosition {
        FilePosition::new(name, Point { x, y })
    }

    #[test]
    fn extracts_sixteen_byte_locations() {
        let records = vec![
            record("a.glb", iloc_blob(10, 20, 16)),
            record("b.glb", iloc_blob(1, 1, 15)),
            record("c.glb", iloc_blob(1, 1, 17)),
            record("d.glb", FieldValue::UInt32(3)),
            record("", iloc_blob(5, 5, 16)),
            Record::new("e.glb"),
        ];
        let positions = extract_file_positions(&records);
        assert_eq!(positions, vec![pos("a.glb", 10, 20)]);
    }

    #[test]
    fn glb_filter_ignores_case() {
        let positions = vec![
            pos("a.glb", 0, 0),
            pos("B.GLB", 0, 0),
            pos("c.gltf", 0, 0),
            pos("glb", 0, 0),
            pos("notes.txt", 0, 0),
        ];
        let names: Vec<String> = filter_glb_positions(positions)
            .into_iter()
            .map(|p| p.filename)
            .collect();
        assert_eq!(names, vec!["a.glb", "B.GLB"]);
    }

    #[test]
    fn custom_extension() {
        let positions = vec![pos("a.usdz", 0, 0), pos("b.glb", 0, 0)];
        let kept = filter_by_extension(positions, ".USDZ");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].filename, "a.usdz");
    }

    #[test]
    fn empty_bounds() {
        assert_eq!(calculate_bounds(&[]), Bounds::default());
    }

    #[test]
    fn bounds_of_points() {
        let bounds = calculate_bounds(&[pos("a", 10, 200), pos("b", 50, 20), pos("c", 30, 80)]);
        assert_eq!(
            bounds,
            Bounds {
                min_x: 10,
                max_x: 50,
                min_y: 20,
                max_y: 200,
                width: 40,
                height: 180,
            }
        );
    }

    fn arb_positions() -> impl Strategy<Value = Vec<FilePosition>> {
        prop::collection::vec(
            ("[a-z]{1,6}(\\.glb|\\.GLB|\\.txt|\\.gltf)?", any::<u32>(), any::<u32>())
                .prop_map(|(name, x, y)| pos(&name, x, y)),
            0..24,
        )
    }

    proptest! {
        #[test]
        fn bounds_contain_every_point(positions in arb_positions()) {
            prop_assume!(!positions.is_empty());
            let b = calculate_bounds(&positions);
            for p in &positions {
                prop_assert!(b.min_x <= p.x && p.x <= b.max_x);
                prop_assert!(b.min_y <= p.y && p.y <= b.max_y);
            }
            prop_assert_eq!(b.width, b.max_x - b.min_x);
            prop_assert_eq!(b.height, b.max_y - b.min_y);
        }

        #[test]
        fn bounds_ignore_order(positions in arb_positions()) {
            let mut reversed = positions.clone();
            reversed.reverse();
            prop_assert_eq!(calculate_bounds(&positions), calculate_bounds(&reversed));
        }

        #[test]
        fn glb_filter_is_idempotent_subset(positions in arb_positions()) {
            let once = filter_glb_positions(positions.clone());
            let twice = filter_glb_positions(once.clone());
            prop_assert_eq!(&once, &twice);
            for p in &once {
                prop_assert!(p.filename.to_lowercase().ends_with(".glb"));
                prop_assert!(positions.contains(p));
            }
        }
    }
}
