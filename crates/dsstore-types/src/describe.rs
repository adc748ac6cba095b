//! Human-readable rendering of field codes and values.

use crate::value::FieldValue;

/// Blobs up to this many bytes are printed as hex.
const HEX_BLOB_LIMIT: usize = 32;

const BINARY_PLIST_MAGIC: &[u8] = b"bplist";

/// Codes that carry a byte count without saying "Size".
const SIZE_CODE_FRAGMENTS: [&str; 5] = ["logS", "log1", "phyS", "phy1", "ph1S"];

const FIELD_NAMES: &[(&str, &str)] = &[
    ("BKGD", "Background"),
    ("Iloc", "Icon Location"),
    ("bwsp", "Browser Window Settings (plist)"),
    ("cmmt", "Comments"),
    ("dilc", "Desktop Icon Location"),
    ("dscl", "Disclosure Column"),
    ("extn", "Extension"),
    ("fwi0", "Finder Window Info"),
    ("fwsw", "Finder Window Sidebar Width"),
    ("fwvh", "Finder Window Vertical Height"),
    ("icgo", "Icon Grid Offset"),
    ("icsp", "Icon Spacing"),
    ("icvo", "Icon View Options"),
    ("icvp", "Icon View Properties (plist)"),
    ("logS", "Logical Size"),
    ("lg1S", "Logical Size (alt)"),
    ("lssp", "List View Scroll Position"),
    ("lsvC", "List View Config (plist)"),
    ("lsvP", "List View Properties (alt plist)"),
    ("lsvo", "List View Options"),
    ("lsvp", "List View Properties (plist)"),
    ("lsvt", "List View Text Size"),
    ("moDD", "Modification Date"),
    ("modD", "Modification Date (alt)"),
    ("phyS", "Physical Size"),
    ("ph1S", "Physical Size (alt)"),
    ("pict", "Picture"),
    ("vstl", "View Style"),
    ("vSrn", "Version"),
];

/// Display name for a field code. Unknown codes are returned unchanged.
pub fn field_name(code: &str) -> &str {
    FIELD_NAMES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// Returns `true` if integer values under this code count bytes.
pub fn is_size_field(code: &str) -> bool {
    code.contains("Size") || SIZE_CODE_FRAGMENTS.iter().any(|f| code.contains(f))
}

/// Render a value for display.
pub fn format_value(code: &str, value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::UInt32(_) | FieldValue::UInt64(_) => {
            let n = value.as_u64().unwrap_or_default();
            if is_size_field(code) {
                format!("{n} bytes")
            } else {
                n.to_string()
            }
        }
        FieldValue::TypeCode(tag) => tag.to_string(),
        FieldValue::Text(text) => text.clone(),
        FieldValue::Blob(bytes) => format_blob(bytes),
    }
}

fn format_blob(bytes: &[u8]) -> String {
    if bytes.starts_with(BINARY_PLIST_MAGIC) {
        format!("<binary plist, {} bytes>", bytes.len())
    } else if bytes.len() <= HEX_BLOB_LIMIT {
        format!("0x{}", hex::encode(bytes))
    } else {
        format!("<blob, {} bytes>", bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::FourCc;
    use proptest::prelude::*;

    #[test]
    fn booleans() {
        assert_eq!(format_value("test", &FieldValue::Bool(true)), "true");
        assert_eq!(format_value("test", &FieldValue::Bool(false)), "false");
    }

    #[test]
    fn plain_numbers() {
        assert_eq!(format_value("test", &FieldValue::UInt32(123)), "123");
        assert_eq!(format_value("fwsw", &FieldValue::UInt64(9)), "9");
    }

    #[test]
    fn size_numbers() {
        assert_eq!(format_value("logS", &FieldValue::UInt64(1024)), "1024 bytes");
        assert_eq!(format_value("phyS", &FieldValue::UInt64(2048)), "2048 bytes");
        assert_eq!(format_value("ph1S", &FieldValue::UInt32(1)), "1 bytes");
        assert_eq!(format_value("iconSize", &FieldValue::UInt32(64)), "64 bytes");
    }

    #[test]
    fn strings_pass_through() {
        assert_eq!(format_value("test", &FieldValue::Text("hello".into())), "hello");
        assert_eq!(
            format_value("vstl", &FieldValue::TypeCode(FourCc::new(*b"icnv"))),
            "icnv"
        );
    }

    #[test]
    fn small_blob_as_hex() {
        let blob = FieldValue::Blob(vec![0x01, 0x02, 0x03, 0x04]);
        assert_eq!(format_value("test", &blob), "0x01020304");
    }

    #[test]
    fn large_blob_as_size() {
        let blob = FieldValue::Blob(vec![0; 100]);
        assert_eq!(format_value("test", &blob), "<blob, 100 bytes>");
    }

    #[test]
    fn binary_plist_detected() {
        let blob = FieldValue::Blob(b"bplist".to_vec());
        assert_eq!(format_value("bwsp", &blob), "<binary plist, 6 bytes>");
    }

    #[test]
    fn known_field_names() {
        assert_eq!(field_name("Iloc"), "Icon Location");
        assert_eq!(field_name("vstl"), "View Style");
        assert_eq!(field_name("BKGD"), "Background");
        assert_eq!(field_name("logS"), "Logical Size");
    }

    #[test]
    fn unknown_field_names() {
        assert_eq!(field_name("UNKN"), "UNKN");
        assert_eq!(field_name("XYZ1"), "XYZ1");
    }

    proptest! {
        #[test]
        fn unknown_codes_round_trip(code in "[A-Z]{4}") {
            prop_assume!(code != "BKGD");
            prop_assert_eq!(field_name(&code), code.as_str());
        }

        #[test]
        fn booleans_never_get_suffix(code in "[a-zA-Z0-9]{4}", b in any::<bool>()) {
            prop_assert_eq!(format_value(&code, &FieldValue::Bool(b)), b.to_string());
        }
    }
}
