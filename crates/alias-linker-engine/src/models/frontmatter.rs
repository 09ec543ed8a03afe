use serde_yaml::Value;

const ALIASES_KEY: &str = "aliases";

/// Parsed YAML frontmatter of a note.
///
/// Only mappings are kept; a frontmatter block holding a bare scalar or
/// sequence carries no usable metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    mapping: serde_yaml::Mapping,
}

impl Frontmatter {
    /// Parse the frontmatter block at the start of `content`, if there is one
    pub fn parse(content: &str) -> Option<Self> {
        let yaml = frontmatter_block(content)?;
        match serde_yaml::from_str::<Value>(yaml) {
            Ok(Value::Mapping(mapping)) => Some(Self { mapping }),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.mapping.get(key)
    }

    /// Declared aliases in declaration order.
    ///
    /// A missing `aliases` key, a value that is not a sequence, and entries
    /// that are not strings all contribute nothing.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        let entries: &[Value] = match self.get(ALIASES_KEY) {
            Some(Value::Sequence(seq)) => seq.as_slice(),
            _ => &[],
        };
        entries.iter().filter_map(Value::as_str)
    }

    pub fn declares_alias(&self, alias: &str) -> bool {
        self.aliases().any(|declared| declared == alias)
    }
}

/// Slice out the YAML between the opening `---` line and the closing one
fn frontmatter_block(content: &str) -> Option<&str> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    if rest.starts_with("---") && is_fence_line(&rest[3..]) {
        return Some("");
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if offset > 0 && trimmed == "---" {
            return Some(&rest[..offset - 1]);
        }
        offset += line.len();
    }
    None
}

fn is_fence_line(after_dashes: &str) -> bool {
    after_dashes.is_empty() || after_dashes.starts_with('\n') || after_dashes.starts_with("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn aliases_of(content: &str) -> Vec<String> {
        Frontmatter::parse(content)
            .map(|fm| fm.aliases().map(str::to_string).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_parses_alias_list() {
        let content = "---\naliases:\n  - Apple\n  - Malus\n---\n# Apple\n";
        assert_eq!(aliases_of(content), vec!["Apple", "Malus"]);
    }

    #[test]
    fn test_parses_flow_sequence() {
        let content = "---\ntitle: Rome\naliases: [Roma, \"Eternal City\"]\n---\nbody";
        assert_eq!(aliases_of(content), vec!["Roma", "Eternal City"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\naliases:\r\n  - Apple\r\n---\r\nbody";
        assert_eq!(aliases_of(content), vec!["Apple"]);
    }

    #[rstest]
    #[case::no_frontmatter("# Just a heading\n[[Apple]]")]
    #[case::unterminated("---\naliases: [Apple]\nno closing fence")]
    #[case::not_at_start("\n---\naliases: [Apple]\n---\n")]
    #[case::scalar_aliases("---\naliases: Apple\n---\n")]
    #[case::missing_key("---\ntags: [fruit]\n---\n")]
    #[case::invalid_yaml("---\naliases: [Apple\n---\n")]
    #[case::non_mapping("---\n- Apple\n---\n")]
    #[case::empty_block("---\n---\nbody")]
    fn test_no_usable_aliases(#[case] content: &str) {
        assert!(aliases_of(content).is_empty());
    }

    #[test]
    fn test_non_string_entries_are_skipped() {
        let content = "---\naliases:\n  - 2024\n  - Apple\n  - {nested: true}\n---\n";
        assert_eq!(aliases_of(content), vec!["Apple"]);
    }

    #[test]
    fn test_closing_fence_at_end_of_file() {
        let content = "---\naliases: [Apple]\n---";
        assert_eq!(aliases_of(content), vec!["Apple"]);
    }

    #[test]
    fn test_dashes_inside_values_do_not_close_block() {
        let content = "---\ntitle: a --- b\naliases: [Apple]\n---\n";
        assert_eq!(aliases_of(content), vec!["Apple"]);
    }

    #[test]
    fn test_declares_alias_is_exact() {
        let fm = Frontmatter::parse("---\naliases: [Rome]\n---\n").unwrap();
        assert!(fm.declares_alias("Rome"));
        assert!(!fm.declares_alias("rome"));
        assert!(!fm.declares_alias("Rome "));
        assert!(!fm.declares_alias("Roman"));
    }
}
