use axum::{debug_handler, http::{header, StatusCode}, response::{Html, IntoResponse, Response}};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

#[debug_handler]
pub async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        include_res!(str, "/style.css"),
    )
}

pub fn sorry(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            include_res!(str, "/pages/sorry.html").replace("{what}", what),
        ),
    )
        .into_response()
}

/// Minimal escaping for user text dropped into template placeholders.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
