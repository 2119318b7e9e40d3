//! Minimal XML element writer for request documents.
//!
//! Request documents are tiny and fixed in shape, so a full XML library is
//! unnecessary. Elements keep attributes in insertion order and render as
//! self-closing tags when they have no children.

use serde::{Deserialize, Serialize};

/// How attribute values are written into a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeEscaping {
    /// Insert values exactly as supplied. The runtime's own tooling does
    /// this, so callers must pre-sanitise untrusted input.
    #[default]
    Verbatim,
    /// Replace `&`, `<`, `>` and `"` with entity references.
    Escape,
}

impl AttributeEscaping {
    fn push_value(self, out: &mut String, value: &str) {
        match self {
            Self::Verbatim => out.push_str(value),
            Self::Escape => {
                for ch in value.chars() {
                    match ch {
                        '&' => out.push_str("&amp;"),
                        '<' => out.push_str("&lt;"),
                        '>' => out.push_str("&gt;"),
                        '"' => out.push_str("&quot;"),
                        other => out.push(other),
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Element>,
}

impl Element {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }

    pub(crate) fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn render(&self, escaping: AttributeEscaping) -> String {
        let mut out = String::new();
        self.render_into(&mut out, escaping);
        out
    }

    fn render_into(&self, out: &mut String, escaping: AttributeEscaping) {
        out.push('<');
        out.push_str(self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            escaping.push_value(out, value);
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.render_into(out, escaping);
        }
        out.push_str("</");
        out.push_str(self.name);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn childless_elements_self_close() {
        let el = Element::new("FB").attr("Name", "").attr("Type", "");
        assert_eq!(
            el.render(AttributeEscaping::Verbatim),
            r#"<FB Name="" Type=""/>"#
        );
    }

    #[test]
    fn nested_elements_close_explicitly() {
        let el = Element::new("FB")
            .attr("Name", "T")
            .child(Element::new("Parameter").attr("Name", "DT"));
        assert_eq!(
            el.render(AttributeEscaping::Verbatim),
            r#"<FB Name="T"><Parameter Name="DT"/></FB>"#
        );
    }

    #[rstest]
    #[case(AttributeEscaping::Verbatim, r#"<X V="a<b & "c""/>"#)]
    #[case(
        AttributeEscaping::Escape,
        r#"<X V="a&lt;b &amp; &quot;c&quot;"/>"#
    )]
    fn escaping_modes(#[case] escaping: AttributeEscaping, #[case] expected: &str) {
        let el = Element::new("X").attr("V", r#"a<b & "c""#);
        assert_eq!(el.render(escaping), expected);
    }
}
