//! Helpers for attribute values that the XML derive can't express directly.

use std::{borrow::Cow, fmt::Display, str::FromStr};

/// A whitespace separated list attribute, such as `dependencies="1 2 5"`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AttrList<T>(pub Vec<T>);

impl<T: FromStr> FromStr for AttrList<T>
where
    T::Err: Display,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .map(|item| {
                item.parse::<T>()
                    .map_err(|e| format!("Invalid list item '{item}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(AttrList)
    }
}

impl<T: Display> Display for AttrList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", itertools::join(&self.0, " "))
    }
}

/// Drop the whitespace around `=` inside tags, so `startTime = "0.2"` reads as
/// `startTime="0.2"`.
///
/// The XML reader takes the attribute name from the raw `name="value"` span, so a spaced
/// attribute would otherwise not match its field and be treated as absent. Quoted values,
/// comments, CDATA and processing instructions are left untouched.
pub(crate) fn tighten_attributes(xml: &str) -> Cow<'_, str> {
    enum State {
        Text,
        Tag,
        Quoted(char),
        Verbatim(&'static str),
    }

    let mut out = String::with_capacity(xml.len());
    let mut changed = false;
    let mut state = State::Text;
    let mut chars = xml.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match state {
            State::Text => {
                if c == '<' {
                    let rest = &xml[i..];
                    state = if rest.starts_with("<!--") {
                        State::Verbatim("-->")
                    } else if rest.starts_with("<![CDATA[") {
                        State::Verbatim("]]>")
                    } else if rest.starts_with("<?") {
                        State::Verbatim("?>")
                    } else {
                        State::Tag
                    };
                }
                out.push(c);
            }
            State::Verbatim(end) => {
                out.push(c);
                if out.ends_with(end) {
                    state = State::Text;
                }
            }
            State::Tag => match c {
                '"' | '\'' => {
                    state = State::Quoted(c);
                    out.push(c);
                }
                '>' => {
                    state = State::Text;
                    out.push(c);
                }
                '=' => {
                    out.push(c);
                    while chars.next_if(|(_, next)| next.is_whitespace()).is_some() {
                        changed = true;
                    }
                }
                c if c.is_whitespace() && xml[i..].trim_start().starts_with('=') => {
                    changed = true;
                }
                c => out.push(c),
            },
            State::Quoted(quote) => {
                out.push(c);
                if c == quote {
                    state = State::Tag;
                }
            }
        }
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_list() {
        let list: AttrList<u32> = "1 2  5".parse().unwrap();
        assert_eq!(list.0, vec![1, 2, 5]);
        assert_eq!(list.to_string(), "1 2 5");

        let empty: AttrList<u32> = "".parse().unwrap();
        assert!(empty.0.is_empty());

        assert!("1 x".parse::<AttrList<u32>>().is_err());
    }

    #[test]
    fn test_tighten_attributes() {
        let xml = r#"<A x = "1 = 2" y=	'3'><!-- a = b --><B z
            ="4"/>text = kept</A>"#;
        assert_eq!(
            tighten_attributes(xml),
            r#"<A x="1 = 2" y='3'><!-- a = b --><B z="4"/>text = kept</A>"#
        );

        let tight = r#"<?xml version = "1.0"?><A x="1"/>"#;
        assert!(matches!(tighten_attributes(tight), Cow::Borrowed(_)));
    }
}
