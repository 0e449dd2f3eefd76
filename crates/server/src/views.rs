//! Server-rendered admin pages. Plain `format!` with every interpolated value
//! escaped.

use axum::response::Html;

/// Outcome shown on the dashboard after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Added,
    Exists,
    Removed,
    Absent,
}

impl Notice {
    pub fn as_str(self) -> &'static str {
        match self {
            Notice::Added => "added",
            Notice::Exists => "exists",
            Notice::Removed => "removed",
            Notice::Absent => "absent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "added" => Some(Notice::Added),
            "exists" => Some(Notice::Exists),
            "removed" => Some(Notice::Removed),
            "absent" => Some(Notice::Absent),
            _ => None,
        }
    }

    pub fn redirect_target(self) -> String {
        format!("/admin?notice={}", self.as_str())
    }

    fn message(self) -> &'static str {
        match self {
            Notice::Added => "Key added.",
            Notice::Exists => "Key already exists.",
            Notice::Removed => "Key removed.",
            Notice::Absent => "Key was not present.",
        }
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    ))
}

pub fn login_page(error: Option<&str>) -> Html<String> {
    let error = error
        .map(|e| format!("<p class=\"error\">{}</p>\n", escape_html(e)))
        .unwrap_or_default();
    let body = format!(
        "<h1>Admin login</h1>\n{error}<form method=\"post\" action=\"/admin/login\">\n\
         <label>Username <input name=\"username\" autocomplete=\"username\"></label>\n\
         <label>Password <input name=\"password\" type=\"password\" autocomplete=\"current-password\"></label>\n\
         <button type=\"submit\">Log in</button>\n</form>"
    );
    page("Admin login", &body)
}

pub fn dashboard(username: &str, keys: &[String], notice: Option<Notice>) -> Html<String> {
    let notice = notice
        .map(|n| format!("<p class=\"notice\">{}</p>\n", n.message()))
        .unwrap_or_default();
    let items: String = keys
        .iter()
        .map(|k| format!("<li>{}</li>\n", escape_html(k)))
        .collect();
    let options: String = keys
        .iter()
        .map(|k| {
            let k = escape_html(k);
            format!("<option value=\"{k}\">{k}</option>\n")
        })
        .collect();
    let body = format!(
        "<h1>API keys</h1>\n<p>Logged in as <strong>{user}</strong> (<a href=\"/admin/logout\">log out</a>)</p>\n\
         {notice}<ul>\n{items}</ul>\n\
         <form method=\"post\" action=\"/admin/add_key\">\n\
         <input name=\"key\" maxlength=\"100\" required>\n<button type=\"submit\">Add key</button>\n</form>\n\
         <form method=\"post\" action=\"/admin/remove_key\">\n\
         <select name=\"key\">\n{options}</select>\n<button type=\"submit\">Remove key</button>\n</form>",
        user = escape_html(username),
    );
    page("API keys", &body)
}
