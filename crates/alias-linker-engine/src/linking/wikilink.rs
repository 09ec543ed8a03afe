use regex::Regex;
use std::sync::LazyLock;

pub struct WikiLink;

impl WikiLink {
    pub const OPEN: &'static str = "[[";
    pub const CLOSE: &'static str = "]]";
    pub const ALIAS: char = '|';

    /// `[[text]]`
    pub fn bare(text: &str) -> String {
        format!("{}{text}{}", Self::OPEN, Self::CLOSE)
    }

    /// `[[target|display]]`
    pub fn qualified(target: &str, display: &str) -> String {
        format!("{}{target}{}{display}{}", Self::OPEN, Self::ALIAS, Self::CLOSE)
    }

    /// Whether `text` can sit between `[[` and `]]` as a complete bare link.
    ///
    /// Text holding a separator or a bracket pair would either be read as a
    /// qualified link or split into a different link.
    pub fn is_linkable(text: &str) -> bool {
        !text.is_empty()
            && !text.contains(Self::ALIAS)
            && !text.contains(Self::OPEN)
            && !text.contains(Self::CLOSE)
            && !text.contains('\n')
    }
}

// Shortest `[[...]]` on a single line, leftmost first.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[.*?\]\]").expect("Invalid wikilink regex"));

/// Inner text of every bare link in `body`, left to right.
///
/// Qualified links and empty `[[]]` are skipped. The same text is yielded
/// once per occurrence.
pub fn bare_links(body: &str) -> impl Iterator<Item = &str> {
    LINK_RE
        .find_iter(body)
        .map(|m| innermost(m.as_str()))
        .filter(|text| !text.is_empty() && !text.contains(WikiLink::ALIAS))
}

/// Text after the last `[[` of a match, so an unclosed `[[` earlier on the
/// line does not swallow the link that closes.
fn innermost(matched: &str) -> &str {
    let open = &matched[..matched.len() - WikiLink::CLOSE.len()];
    open.rfind(WikiLink::OPEN)
        .map_or(open, |i| &open[i + WikiLink::OPEN.len()..])
}

/// Replace every literal `[[alias]]` with `[[target|alias]]`.
///
/// The alias is matched as plain text, so characters such as `(`, `*` or `$`
/// in it carry no special meaning. `None` when nothing matched.
pub fn qualify_bare_links(body: &str, alias: &str, target: &str) -> Option<String> {
    let needle = WikiLink::bare(alias);
    body.contains(&needle)
        .then(|| body.replace(&needle, &WikiLink::qualified(target, alias)))
}
