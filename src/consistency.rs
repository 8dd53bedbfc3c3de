use serde::{Deserialize, Serialize};

/// Midjourney works best with at most 4 reference images.
pub const MAX_REF_IMAGES: usize = 4;

/// One character as returned by the describe endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub appearance: Appearance,

    #[serde(default)]
    pub ref_imgs: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    #[serde(default)]
    pub one_line: Option<String>,
}

/// One line per character, for pasting into a page prompt so the cast
/// looks the same on every illustration.
///
/// Characters without a one-line appearance are skipped entirely. The
/// fallback label for unnamed characters counts position in the full
/// roster, so "Character 3" stays "Character 3" even when earlier
/// entries were skipped.
pub fn build_appearance_block(characters: &[CharacterRecord]) -> String {
    characters
        .iter()
        .enumerate()
        .filter_map(|(idx, character)| {
            let one_line = character
                .appearance
                .one_line
                .as_deref()
                .filter(|s| !s.is_empty())?;
            let label = match character.name.as_deref().filter(|s| !s.is_empty()) {
                Some(name) => name.to_string(),
                None => format!("Character {}", idx + 1),
            };
            Some(format!("{}: {}", label, one_line))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `--cref` directive from every reference image in roster order, capped
/// at [`MAX_REF_IMAGES`]. URLs pass through verbatim: no deduplication,
/// no validation.
pub fn build_cref_directive(characters: &[CharacterRecord]) -> String {
    let urls: Vec<&str> = characters
        .iter()
        .flat_map(|c| c.ref_imgs.iter().map(String::as_str))
        .take(MAX_REF_IMAGES)
        .collect();

    if urls.is_empty() {
        String::new()
    } else {
        format!("--cref {}", urls.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(name: Option<&str>, one_line: Option<&str>, refs: &[&str]) -> CharacterRecord {
        CharacterRecord {
            name: name.map(String::from),
            appearance: Appearance {
                one_line: one_line.map(String::from),
            },
            ref_imgs: refs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_appearance_block_empty_input() {
        assert_eq!(build_appearance_block(&[]), "");
    }

    #[test]
    fn test_appearance_block_skips_undescribed_characters() {
        let characters = vec![
            character(Some("Mira"), Some("a girl with red boots"), &[]),
            character(None, None, &[]),
        ];
        assert_eq!(
            build_appearance_block(&characters),
            "Mira: a girl with red boots"
        );
    }

    #[test]
    fn test_appearance_block_unnamed_gets_positional_label() {
        let characters = vec![character(None, Some("tall fox"), &[])];
        assert_eq!(build_appearance_block(&characters), "Character 1: tall fox");
    }

    #[test]
    fn test_appearance_block_position_counts_full_roster() {
        // Two skipped entries ahead of it must not shift its number.
        let characters = vec![
            character(None, None, &[]),
            character(None, Some(""), &[]),
            character(None, Some("grumpy badger"), &[]),
        ];
        assert_eq!(
            build_appearance_block(&characters),
            "Character 3: grumpy badger"
        );
    }

    #[test]
    fn test_appearance_block_joins_with_newlines() {
        let characters = vec![
            character(Some("Mira"), Some("a girl with red boots"), &[]),
            character(Some("Pip"), Some("a small blue bird"), &[]),
        ];
        assert_eq!(
            build_appearance_block(&characters),
            "Mira: a girl with red boots\nPip: a small blue bird"
        );
    }

    #[test]
    fn test_cref_caps_at_four_urls() {
        let characters = vec![
            character(None, None, &["u1", "u2"]),
            character(None, None, &["u3", "u4", "u5"]),
            character(None, None, &["u6"]),
        ];
        assert_eq!(build_cref_directive(&characters), "--cref u1 u2 u3 u4");
    }

    #[test]
    fn test_cref_empty_without_urls() {
        let characters = vec![character(Some("Mira"), Some("a girl"), &[])];
        assert_eq!(build_cref_directive(&characters), "");
        assert_eq!(build_cref_directive(&[]), "");
    }

    #[test]
    fn test_cref_keeps_duplicates_verbatim() {
        let characters = vec![character(None, None, &["u1", "u1", "not a url"])];
        assert_eq!(build_cref_directive(&characters), "--cref u1 u1 not a url");
    }

    #[test]
    fn test_record_decodes_camel_case_wire_shape() {
        let json = r#"{
            "name": "Mira",
            "appearance": { "oneLine": "a girl with red boots" },
            "refImgs": ["https://img.example.com/mira.png"]
        }"#;

        let record: CharacterRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name.as_deref(), Some("Mira"));
        assert_eq!(
            record.appearance.one_line.as_deref(),
            Some("a girl with red boots")
        );
        assert_eq!(record.ref_imgs, vec!["https://img.example.com/mira.png"]);
    }

    #[test]
    fn test_record_tolerates_missing_optional_fields() {
        let record: CharacterRecord = serde_json::from_str("{}").unwrap();
        assert!(record.name.is_none());
        assert!(record.appearance.one_line.is_none());
        assert!(record.ref_imgs.is_empty());
    }
}
