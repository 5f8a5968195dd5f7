// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Escaping HTML builder.
//!
//! [`Html`] is markup that is safe to emit. The only ways to build one are
//! [`Html::escape`], which escapes arbitrary text, and the [`html!`] macro,
//! whose format string is a literal written in this crate and whose
//! arguments go through [`ToHtml`]: plain strings are escaped, `Html`
//! fragments are inserted as-is. Renderers never concatenate raw strings into
//! markup.
//!
//! Do not use inline captured identifiers (`{name}`) in `html!` format
//! strings: they bypass [`ToHtml`].

use std::fmt;

/// Escape `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Safe markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Html(String);

impl Html {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escaped text.
    pub fn escape(text: &str) -> Self {
        Self(escape_html(text))
    }

    /// Wrap markup produced by [`html!`]. Not for arbitrary input.
    #[doc(hidden)]
    pub fn trusted(markup: String) -> Self {
        Self(markup)
    }

    /// Append a fragment; plain text is escaped.
    pub fn push<T: ToHtml + ?Sized>(&mut self, fragment: &T) {
        self.0.push_str(&fragment.to_html().0);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromIterator<Html> for Html {
    fn from_iter<I: IntoIterator<Item = Html>>(iter: I) -> Self {
        let mut out = Html::new();
        for fragment in iter {
            out.0.push_str(&fragment.0);
        }
        out
    }
}

/// Conversion into safe markup.
pub trait ToHtml {
    fn to_html(&self) -> Html;
}

impl ToHtml for Html {
    fn to_html(&self) -> Html {
        self.clone()
    }
}

impl ToHtml for str {
    fn to_html(&self) -> Html {
        Html::escape(self)
    }
}

impl ToHtml for String {
    fn to_html(&self) -> Html {
        Html::escape(self)
    }
}

impl<T: ToHtml + ?Sized> ToHtml for &T {
    fn to_html(&self) -> Html {
        (**self).to_html()
    }
}

macro_rules! numeric_to_html {
    ($($t:ty),*) => {
        $(impl ToHtml for $t {
            fn to_html(&self) -> Html {
                Html(self.to_string())
            }
        })*
    };
}

numeric_to_html!(u16, u32, u64, usize, i64);

/// Format markup from a literal template; every argument goes through [`ToHtml`].
macro_rules! html {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::html::Html::trusted(format!($fmt $(, $crate::html::ToHtml::to_html(&$arg))*))
    };
}

pub(crate) use html;
