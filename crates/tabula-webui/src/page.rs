// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Page shell and path registry.

use crate::html::{html, Html};

/// A registered web UI path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathHandler {
    pub path: &'static str,
    /// Nav bar title.
    pub title: &'static str,
    /// Wrapped in the styled page shell.
    pub styled: bool,
    pub on_nav_bar: bool,
}

pub const TABLET_SERVERS_PATH: &str = "/tablet-servers";
pub const TABLES_PATH: &str = "/tables";
pub const TABLE_PATH: &str = "/table";
pub const MASTERS_PATH: &str = "/masters";
pub const DUMP_ENTITIES_PATH: &str = "/dump-entities";

/// All master web UI paths, in nav bar order.
pub const PATH_HANDLERS: &[PathHandler] = &[
    PathHandler {
        path: TABLET_SERVERS_PATH,
        title: "Tablet Servers",
        styled: true,
        on_nav_bar: true,
    },
    PathHandler {
        path: TABLES_PATH,
        title: "Tables",
        styled: true,
        on_nav_bar: true,
    },
    PathHandler {
        path: TABLE_PATH,
        title: "",
        styled: true,
        on_nav_bar: false,
    },
    PathHandler {
        path: MASTERS_PATH,
        title: "Masters",
        styled: true,
        on_nav_bar: true,
    },
    PathHandler {
        path: DUMP_ENTITIES_PATH,
        title: "Dump Entities",
        styled: false,
        on_nav_bar: false,
    },
];

pub fn nav_entries() -> impl Iterator<Item = &'static PathHandler> {
    PATH_HANDLERS.iter().filter(|h| h.on_nav_bar)
}

const STYLE: &str = "\
body { font-family: sans-serif; margin: 0; color: #222; }
.navbar { background: #2c3e50; padding: 8px 16px; }
.navbar a { color: #ecf0f1; margin-right: 16px; text-decoration: none; }
.navbar a.brand { font-weight: bold; }
.content { padding: 16px; }
table { border-collapse: collapse; margin-bottom: 16px; }
th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; vertical-align: top; }
th { background: #f4f4f4; }
tr.error td { color: #c0392b; }
pre { background: #f8f8f8; padding: 8px; }
.error-msg { color: #c0392b; }
";

/// Full HTML document with stylesheet and nav bar around `body`.
pub fn styled_page(title: &str, body: &Html) -> Html {
    let nav: Html = nav_entries()
        .map(|h| html!("<a href=\"{}\">{}</a>", h.path, h.title))
        .collect();
    html!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>\n{}</style>\n</head>\n<body>\n\
         <div class=\"navbar\"><a class=\"brand\" href=\"/\">Tabula</a>{}</div>\n\
         <div class=\"content\">\n{}</div>\n</body>\n</html>\n",
        title,
        Html::trusted(STYLE.to_string()),
        nav,
        body
    )
}

/// Body of the `/` page.
pub fn landing_body() -> Html {
    let mut out = html!("<h1>Tabula Master</h1>\n<ul>\n");
    for handler in nav_entries() {
        out.push(&html!(
            "<li><a href=\"{}\">{}</a></li>\n",
            handler.path,
            handler.title
        ));
    }
    out.push(&html!("</ul>\n"));
    out
}

/// Inline error message in place of a page section.
pub fn error_message(message: &str) -> Html {
    html!("<p class=\"error-msg\">{}</p>\n", message)
}
