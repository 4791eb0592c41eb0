//! Lightweight HTML element lookup for catalog pages.
//!
//! The catalog pages are only ever queried for a handful of elements
//! identified by tag name and class token, so instead of building a DOM this
//! module tokenizes tags with a regex and balances open/close pairs on demand.
//! Offsets of an [`Element`] are relative to the scope it was found in.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Elements that never have a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
    })
}

fn attr_regex() -> &'static Regex {
    static ATTR: OnceLock<Regex> = OnceLock::new();
    ATTR.get_or_init(|| {
        Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .unwrap()
    })
}

fn strip_regex() -> &'static Regex {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    STRIP.get_or_init(|| {
        Regex::new(r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
            .unwrap()
    })
}

fn entity_regex() -> &'static Regex {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    ENTITY.get_or_init(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap())
}

fn markup_regex() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Removes comments, scripts and styles so their contents cannot unbalance
/// the element scan.
pub fn sanitize(html: &str) -> String {
    strip_regex().replace_all(html, "").into_owned()
}

/// Decodes character references in catalog text.
///
/// Numeric references cover every code point. Named references are limited
/// to a fixed table of markup, typography and Czech/German letters; unknown
/// names are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    entity_regex()
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(entity)
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "hellip" => '\u{2026}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "sbquo" => '\u{201a}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "bdquo" => '\u{201e}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "middot" => '\u{b7}',
        "bull" => '\u{2022}',
        "times" => '\u{d7}',
        "deg" => '\u{b0}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "euro" => '\u{20ac}',
        "aacute" => 'á',
        "Aacute" => 'Á',
        "eacute" => 'é',
        "Eacute" => 'É',
        "iacute" => 'í',
        "Iacute" => 'Í',
        "oacute" => 'ó',
        "Oacute" => 'Ó',
        "uacute" => 'ú',
        "Uacute" => 'Ú',
        "yacute" => 'ý',
        "Yacute" => 'Ý',
        "ccaron" => 'č',
        "Ccaron" => 'Č',
        "dcaron" => 'ď',
        "Dcaron" => 'Ď',
        "ecaron" => 'ě',
        "Ecaron" => 'Ě',
        "ncaron" => 'ň',
        "Ncaron" => 'Ň',
        "rcaron" => 'ř',
        "Rcaron" => 'Ř',
        "scaron" => 'š',
        "Scaron" => 'Š',
        "tcaron" => 'ť',
        "Tcaron" => 'Ť',
        "zcaron" => 'ž',
        "Zcaron" => 'Ž',
        "uring" => 'ů',
        "Uring" => 'Ů',
        "auml" => 'ä',
        "Auml" => 'Ä',
        "ouml" => 'ö',
        "Ouml" => 'Ö',
        "uuml" => 'ü',
        "Uuml" => 'Ü',
        "szlig" => 'ß',
        _ => return None,
    };
    Some(decoded)
}

/// Concatenated text content of a markup fragment, tags dropped.
pub fn text_content(fragment: &str) -> String {
    decode_entities(&markup_regex().replace_all(fragment, ""))
}

#[derive(Debug, Clone, Copy)]
struct Tag<'a> {
    closing: bool,
    self_closing: bool,
    name: &'a str,
    attrs: &'a str,
    start: usize,
    end: usize,
}

fn tokenize(scope: &str) -> Vec<Tag<'_>> {
    tag_regex()
        .captures_iter(scope)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let attrs = caps.get(3).map_or("", |m| m.as_str());
            Some(Tag {
                closing: !caps[1].is_empty(),
                self_closing: attrs.trim_end().ends_with('/'),
                name: caps.get(2)?.as_str(),
                attrs,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

/// A located element: its opening tag attributes and inner markup.
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    name: &'a str,
    attrs: &'a str,
    inner: &'a str,
    start: usize,
    end: usize,
}

impl<'a> Element<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Inner markup between the opening and closing tag.
    pub fn inner_html(&self) -> &'a str {
        self.inner
    }

    /// Byte offset of the opening `<` within the searched scope.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset just past the closing tag within the searched scope.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        attr_regex()
            .captures_iter(self.attrs)
            .find(|caps| caps[1].eq_ignore_ascii_case(name))
            .map(|caps| {
                let raw = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map_or("", |m| m.as_str());
                decode_entities(raw)
            })
    }

    /// True when every whitespace separated token of `class` is present in
    /// the element's class attribute.
    pub fn has_class(&self, class: &str) -> bool {
        let Some(value) = self.attr("class") else {
            return false;
        };
        let tokens: Vec<&str> = value.split_whitespace().collect();
        class
            .split_whitespace()
            .all(|wanted| tokens.contains(&wanted))
    }

    pub fn text(&self) -> String {
        text_content(self.inner)
    }

    pub fn find_all(&self, tag: &str, class: Option<&str>) -> Vec<Element<'a>> {
        find_all(self.inner, tag, class)
    }

    pub fn find_first(&self, tag: &str, class: Option<&str>) -> Option<Element<'a>> {
        find_first(self.inner, tag, class)
    }

    /// Innermost element of this element's subtree that encloses `child`,
    /// where `child` was located inside this element.
    pub fn parent_of(&self, child: &Element<'_>) -> Option<Element<'a>> {
        parent_of(self.inner, child)
    }
}

fn close_element<'a>(scope: &'a str, tags: &[Tag<'a>], open_index: usize) -> Element<'a> {
    let open = tags[open_index];
    if open.self_closing || is_void(open.name) {
        return Element {
            name: open.name,
            attrs: open.attrs,
            inner: "",
            start: open.start,
            end: open.end,
        };
    }

    let mut depth = 0usize;
    for tag in &tags[open_index + 1..] {
        if !tag.name.eq_ignore_ascii_case(open.name) {
            continue;
        }
        if tag.closing {
            if depth == 0 {
                return Element {
                    name: open.name,
                    attrs: open.attrs,
                    inner: &scope[open.end..tag.start],
                    start: open.start,
                    end: tag.end,
                };
            }
            depth -= 1;
        } else if !tag.self_closing {
            depth += 1;
        }
    }

    // Unclosed elements run to the end of the scope.
    Element {
        name: open.name,
        attrs: open.attrs,
        inner: &scope[open.end..],
        start: open.start,
        end: scope.len(),
    }
}

/// All elements named `tag` (optionally carrying `class`) in document order,
/// including nested ones.
pub fn find_all<'a>(scope: &'a str, tag: &str, class: Option<&str>) -> Vec<Element<'a>> {
    let tags = tokenize(scope);
    tags.iter()
        .enumerate()
        .filter(|(_, t)| !t.closing && t.name.eq_ignore_ascii_case(tag))
        .map(|(index, _)| close_element(scope, &tags, index))
        .filter(|element| class.map_or(true, |class| element.has_class(class)))
        .collect()
}

pub fn find_first<'a>(scope: &'a str, tag: &str, class: Option<&str>) -> Option<Element<'a>> {
    find_all(scope, tag, class).into_iter().next()
}

/// Innermost non-void element in `scope` that is still open at `child`'s
/// opening tag.
pub fn parent_of<'a>(scope: &'a str, child: &Element<'_>) -> Option<Element<'a>> {
    let tags = tokenize(scope);
    let mut open_stack: Vec<usize> = Vec::new();

    for (index, tag) in tags.iter().enumerate() {
        if tag.start >= child.start {
            break;
        }
        if tag.closing {
            if let Some(pos) = open_stack
                .iter()
                .rposition(|&i| tags[i].name.eq_ignore_ascii_case(tag.name))
            {
                open_stack.truncate(pos);
            }
        } else if !tag.self_closing && !is_void(tag.name) {
            open_stack.push(index);
        }
    }

    open_stack
        .last()
        .map(|&index| close_element(scope, &tags, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r#"
        <div class="outer box">
            <div class="inner">first</div>
            <div class="inner second">second <b>bold</b></div>
        </div>
        <p class="note">tail</p>
    "#;

    #[test]
    fn test_find_all_balances_nested_elements() {
        let outer = find_first(NESTED, "div", Some("outer")).unwrap();
        assert!(outer.inner_html().contains("second"));
        assert!(!outer.inner_html().contains("tail"));

        let inners = outer.find_all("div", Some("inner"));
        assert_eq!(inners.len(), 2);
        assert_eq!(inners[1].text(), "second bold");
    }

    #[test]
    fn test_class_matching_requires_every_token() {
        assert!(find_first(NESTED, "div", Some("box outer")).is_some());
        assert!(find_first(NESTED, "div", Some("outer missing")).is_none());
        assert!(find_first(NESTED, "div", Some("out")).is_none());
    }

    #[test]
    fn test_attr_reads_quoted_and_bare_values() {
        let html = r#"<a href="/film/1-x/?a=1&amp;b=2" data-id=42 title='t'>x</a>"#;
        let link = find_first(html, "a", None).unwrap();
        assert_eq!(link.attr("href").as_deref(), Some("/film/1-x/?a=1&b=2"));
        assert_eq!(link.attr("data-id").as_deref(), Some("42"));
        assert_eq!(link.attr("title").as_deref(), Some("t"));
        assert_eq!(link.attr("rel"), None);
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(
            decode_entities("Winter&#039;s War &amp; more &#x2013; x &bogus;"),
            "Winter's War & more – x &bogus;"
        );
    }

    #[test]
    fn test_decode_named_letters_and_typography() {
        assert_eq!(
            decode_entities("&Scaron;ediv&aacute; &bdquo;Pr&aacute;ce&ldquo; &hellip;"),
            "Šedivá „Práce“ …"
        );
        assert_eq!(decode_entities("M&uuml;ller &amp; &Rcaron;eh&aring;k"), "Müller & Řeh&aring;k");
        // Case matters for named references
        assert_eq!(decode_entities("&AMP;"), "&AMP;");
    }

    #[test]
    fn test_sanitize_drops_scripts_and_comments() {
        let html = "<div class=\"a\"><script>var s = '</div>';</script><!-- </div> -->ok</div>";
        let clean = sanitize(html);
        let div = find_first(&clean, "div", Some("a")).unwrap();
        assert_eq!(div.text(), "ok");
    }

    #[test]
    fn test_parent_of_skips_void_and_closed_siblings() {
        let html = r#"<div class="creators"><div><img src="x"><h4>Hrají: </h4><span><a href="/a">A</a></span></div><div><h4>Režie:</h4></div></div>"#;
        let root = find_first(html, "div", Some("creators")).unwrap();
        let heading = root
            .find_all("h4", None)
            .into_iter()
            .find(|h| h.text().trim() == "Hrají:")
            .unwrap();
        let parent = root.parent_of(&heading).unwrap();
        assert_eq!(parent.name(), "div");
        assert_eq!(parent.find_all("a", None).len(), 1);
        assert!(!parent.inner_html().contains("Režie"));
    }

    #[test]
    fn test_unclosed_element_runs_to_scope_end() {
        let html = "<p class=\"x\">open <b>text</b>";
        let p = find_first(html, "p", Some("x")).unwrap();
        assert_eq!(p.text(), "open text");
    }
}
