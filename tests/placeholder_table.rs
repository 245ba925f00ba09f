//! Expanding against tables loaded from TOML

use atsign::{expand, PlaceholderKey, PlaceholderStore, PlaceholderTable, TableError};
use pretty_assertions::assert_eq;

const PAGE: &str = r##"
title = "Release notes"
version = "1.4"
header = "# @@title@@ (v@@version@@)"
footer = "Generated for v@@version@@"
page = """
@@header@@

Fixed the \\@@escaped@@ case.
@@footer@@"""
"##;

#[test]
fn test_expand_page_from_toml() {
    let table = PlaceholderTable::from_toml_str(PAGE).unwrap();
    let template = "%% page template\n@@page@@\n%% end\n";

    let out = expand(template, &table).unwrap();
    assert_eq!(
        out,
        "# Release notes (v1.4)\n\nFixed the @@escaped@@ case.\nGenerated for v1.4\n"
    );
}

#[test]
fn test_table_lookup_by_key() {
    let table = PlaceholderTable::from_toml_str(PAGE).unwrap();
    let key = PlaceholderKey::of("version");
    assert!(table.exists(key));
    assert_eq!(table.value_for(key), Some("1.4"));
    assert!(!table.exists(PlaceholderKey::of("missing")));
}

#[test]
fn test_toml_with_invalid_identifier() {
    let err = PlaceholderTable::from_toml_str(r#""not-valid" = "x""#).unwrap_err();
    assert!(matches!(err, TableError::InvalidIdentifier { ref name } if name == "not-valid"));
}

#[test]
fn test_custom_store() {
    /// Store answering every key with the same text
    struct Constant(&'static str);

    impl PlaceholderStore for Constant {
        fn exists(&self, _key: PlaceholderKey) -> bool {
            true
        }

        fn value_for(&self, _key: PlaceholderKey) -> Option<&str> {
            Some(self.0)
        }
    }

    assert_eq!(expand("<@@a@@|@@b@@>", &Constant("c")).unwrap(), "<c|c>");
}
