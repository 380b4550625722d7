//! HTML presentation: the submission form, the entry list, and an optional
//! one-shot notice banner.

use guestbook_core::entries::UserEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient status message rendered on the next page only.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

const PAGE_HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Guestbook</title>
<style>
body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }
form { margin-bottom: 1.5rem; }
input[type=text] { margin: 0.2rem 0; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }
.notice { padding: 0.6rem; border-radius: 4px; }
.notice.success { background: #e6f4e6; color: #1e5c1e; }
.notice.error { background: #f8e1e1; color: #7a1f1f; }
</style>
</head>
<body>
<h1>Guestbook</h1>
"#;

const FORM: &str = r#"<form method="post" action="/">
<label>Username <input type="text" name="username"></label><br>
<label>Phone <input type="text" name="phone"></label><br>
<label>Place <input type="text" name="place"></label><br>
<button type="submit">Sign</button>
</form>
"#;

/// Render the full page. `rows` are emitted in the order given (newest
/// first); `notice` is rendered once and never persisted.
pub fn page(rows: &[UserEntry], notice: Option<&Notice>) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str(PAGE_HEAD);

    if let Some(notice) = notice {
        let class = match notice.kind {
            NoticeKind::Success => "notice success",
            NoticeKind::Error => "notice error",
        };
        html.push_str(&format!(
            "<p class=\"{class}\">{}</p>\n",
            escape(&notice.text)
        ));
    }

    html.push_str(FORM);

    if rows.is_empty() {
        html.push_str("<p class=\"empty\">No entries yet.</p>\n");
    } else {
        html.push_str("<table>\n<tr><th>Username</th><th>Phone</th><th>Place</th><th>Signed</th></tr>\n");
        for row in rows {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&row.username),
                escape(row.phone.as_deref().unwrap_or("")),
                escape(row.place.as_deref().unwrap_or("")),
                row.created_at.format("%Y-%m-%d %H:%M UTC"),
            ));
        }
        html.push_str("</table>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
