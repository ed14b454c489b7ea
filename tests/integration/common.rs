//! Shared helpers for building mock portal pages

use themis_crawler::session::{Session, SessionConfig};
use url::Url;
use wiremock::MockServer;

/// A fresh session pointed at the mock server
pub fn session_for(server: &MockServer) -> Session {
    let base = Url::parse(&server.uri()).expect("Failed to parse mock server URI");
    Session::new(&SessionConfig::new(base)).expect("Failed to build session")
}

/// Absolute URL of a route on the mock server
pub fn url_for(server: &MockServer, route: &str) -> Url {
    Url::parse(&server.uri())
        .expect("Failed to parse mock server URI")
        .join(route)
        .expect("Failed to join route")
}

/// A login page carrying the given CSRF token
pub fn login_page(token: &str) -> String {
    format!(
        r#"<html><body><form method="post" action="/log/in">
        <input type="hidden" name="_csrf" value="{}">
        <input type="text" name="user"><input type="password" name="password">
        </form></body></html>"#,
        token
    )
}

/// A listing page; rows with `None` as href carry no link
pub fn listing_page(rows: &[(&str, Option<&str>)]) -> String {
    let items: String = rows
        .iter()
        .map(|(name, href)| match href {
            Some(href) => format!(
                r#"<li><span class="ass-link"><a href="{}">{}</a></span></li>"#,
                href, name
            ),
            None => format!(r#"<li><span class="ass-link"><a>{}</a></span></li>"#, name),
        })
        .collect();

    format!(
        r#"<html><body><div class="subsec round shade ass-children"><ul class="round">{}</ul></div></body></html>"#,
        items
    )
}

/// An assignment page with start/deadline/end tooltips
pub fn dated_page(start: &str, deadline: &str, end: &str) -> String {
    let line = |label: &str, value: &str| {
        format!(
            r#"<div class="cfg-line"><span class="cfg-key">{}</span><span class="cfg-val"><span class="tip" data-title="{}">short</span></span></div>"#,
            label, value
        )
    };
    format!(
        r#"<html><body><div class="cfg-container">{}{}{}</div></body></html>"#,
        line("Start:", start),
        line("Deadline:", deadline),
        line("End:", end)
    )
}
