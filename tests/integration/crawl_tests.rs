//! Tree crawls against a mock portal

use crate::common::{dated_page, listing_page, session_for, url_for};
use themis_crawler::extract::calendar_date;
use themis_crawler::session::fetch_profile;
use themis_crawler::tree::{attach_dates, AssignmentTree, FailurePolicy, TreeBuilder};
use themis_crawler::{ErrorKind, ListingPattern, ThemisError};
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a GET route answering 200 with `body`, expected `times` times
async fn mount_page(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Portal layout used by most tests:
///
/// ```text
/// /course
/// ├── A  (/a)
/// │   ├── A1 (/a/1)
/// │   │   └── A1x (/a/1/x)
/// │   └── A2 (/a/2)
/// ├── B  (/b)
/// └── C  (no link)
/// ```
async fn mount_portal(server: &MockServer, fetches: [u64; 5]) {
    mount_page(
        server,
        "/course",
        listing_page(&[("A", Some("/a")), ("B", Some("/b")), ("C", None)]),
        fetches[0],
    )
    .await;
    mount_page(
        server,
        "/a",
        listing_page(&[("A1", Some("/a/1")), ("A2", Some("/a/2"))]),
        fetches[1],
    )
    .await;
    mount_page(server, "/b", listing_page(&[]), fetches[2]).await;
    mount_page(
        server,
        "/a/1",
        listing_page(&[("A1x", Some("/a/1/x"))]),
        fetches[3],
    )
    .await;
    mount_page(server, "/a/2", "<html><body>Activity</body></html>".to_string(), fetches[4]).await;
}

fn names_in_pre_order(tree: &AssignmentTree) -> Vec<String> {
    tree.pre_order()
        .into_iter()
        .map(|id| tree.get(id).unwrap().name.clone())
        .collect()
}

#[tokio::test]
async fn test_depth_zero_lists_only_root_children() {
    let server = MockServer::start().await;
    mount_portal(&server, [1, 0, 0, 0, 0]).await;
    let session = session_for(&server);

    let tree = TreeBuilder::new(&session)
        .max_depth(0)
        .build("Courses", url_for(&server, "/course"))
        .await
        .expect("Build failed");

    assert_eq!(names_in_pre_order(&tree), vec!["Courses", "A", "B"]);
    assert_eq!(tree.height(), 1);
}

#[tokio::test]
async fn test_depth_one_expands_one_level() {
    let server = MockServer::start().await;
    mount_portal(&server, [1, 1, 1, 0, 0]).await;
    let session = session_for(&server);

    let tree = TreeBuilder::new(&session)
        .max_depth(1)
        .build("Courses", url_for(&server, "/course"))
        .await
        .expect("Build failed");

    assert_eq!(names_in_pre_order(&tree), vec!["Courses", "A", "A1", "A2", "B"]);
    assert!(tree.height() <= 2);
}

#[tokio::test]
async fn test_full_crawl_shape_and_linkage() {
    let server = MockServer::start().await;
    // /a/1/x is a leaf page too
    mount_page(&server, "/a/1/x", listing_page(&[]), 1).await;
    mount_portal(&server, [1, 1, 1, 1, 1]).await;
    let session = session_for(&server);

    let tree = TreeBuilder::new(&session)
        .max_depth(5)
        .build("Courses", url_for(&server, "/course"))
        .await
        .expect("Build failed");

    assert_eq!(
        names_in_pre_order(&tree),
        vec!["Courses", "A", "A1", "A1x", "A2", "B"]
    );

    // Every non-root node hangs under the page whose listing produced it
    for (id, node) in tree.iter() {
        match node.parent() {
            None => assert_eq!(id, tree.root()),
            Some(parent) => {
                let parent_node = tree.get(parent).unwrap();
                assert_eq!(
                    parent_node.children().iter().filter(|c| **c == id).count(),
                    1
                );
                assert_eq!(node.depth(), parent_node.depth() + 1);
            }
        }
    }

    let a1x = tree
        .iter()
        .find(|(_, n)| n.name == "A1x")
        .map(|(id, _)| id)
        .unwrap();
    assert_eq!(tree.path(a1x), vec!["Courses", "A", "A1", "A1x"]);
    assert_eq!(tree.get(a1x).unwrap().url, url_for(&server, "/a/1/x"));
    assert!(tree.failures().is_empty());
}

#[tokio::test]
async fn test_events_follow_link_order() {
    let server = MockServer::start().await;
    mount_page(&server, "/a/1/x", listing_page(&[]), 1).await;
    mount_portal(&server, [1, 1, 1, 1, 1]).await;
    let session = session_for(&server);

    let (sender, mut receiver) = mpsc::unbounded_channel();
    let tree = TreeBuilder::new(&session)
        .max_depth(3)
        .events(sender)
        .build("Courses", url_for(&server, "/course"))
        .await
        .expect("Build failed");

    let mut events = Vec::new();
    while let Some(event) = receiver.recv().await {
        events.push(event);
    }

    let names: Vec<_> = events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "A1", "A2", "A1x"]);
    assert_eq!(events.len(), tree.len() - 1);
    assert_eq!(events[4].depth, 3);
    assert!(events.windows(2).all(|w| w[0].elapsed <= w[1].elapsed));
}

#[tokio::test]
async fn test_missing_child_page_aborts_build() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/course",
        listing_page(&[("A", Some("/a")), ("Gone", Some("/gone"))]),
        1,
    )
    .await;
    mount_page(&server, "/a", listing_page(&[]), 1).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let session = session_for(&server);

    let err = TreeBuilder::new(&session)
        .max_depth(2)
        .build("Courses", url_for(&server, "/course"))
        .await
        .unwrap_err();

    assert!(matches!(err, ThemisError::Status { status: 404, .. }));
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.url().unwrap().ends_with("/gone"));
}

#[tokio::test]
async fn test_skip_branch_keeps_going() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/course",
        listing_page(&[("Gone", Some("/gone")), ("A", Some("/a"))]),
        1,
    )
    .await;
    mount_page(&server, "/a", listing_page(&[("A1", Some("/a/1"))]), 1).await;
    mount_page(&server, "/a/1", listing_page(&[]), 1).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let session = session_for(&server);

    let tree = TreeBuilder::new(&session)
        .max_depth(2)
        .on_error(FailurePolicy::SkipBranch)
        .build("Courses", url_for(&server, "/course"))
        .await
        .expect("Build failed");

    assert_eq!(names_in_pre_order(&tree), vec!["Courses", "Gone", "A", "A1"]);
    assert_eq!(tree.failures().len(), 1);

    let failure = &tree.failures()[0];
    assert_eq!(failure.status, Some(404));
    assert!(failure.url.ends_with("/gone"));
    assert!(tree.get(failure.node).unwrap().is_leaf());
}

#[tokio::test]
async fn test_root_failure_is_fatal_even_when_skipping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/course"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let session = session_for(&server);

    let result = TreeBuilder::new(&session)
        .on_error(FailurePolicy::SkipBranch)
        .build("Courses", url_for(&server, "/course"))
        .await;

    assert!(matches!(result, Err(ThemisError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_empty_start_page_is_a_leaf() {
    let server = MockServer::start().await;
    mount_page(&server, "/course", "<html><body>No courses</body></html>".to_string(), 1).await;
    let session = session_for(&server);

    let tree = TreeBuilder::new(&session)
        .max_depth(3)
        .build("Courses", url_for(&server, "/course"))
        .await
        .expect("Build failed");

    assert_eq!(tree.len(), 1);
    assert!(tree.get(tree.root()).unwrap().is_leaf());
}

#[tokio::test]
async fn test_navigation_root_pattern() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<html><body><ul class="nav-list">
            <li><span class="ass-link"><a href="/course/ads">ADS</a></span></li>
            <li><span class="ass-link"><a href="/course/os">OS</a></span></li>
        </ul></body></html>"#
            .to_string(),
        1,
    )
    .await;
    mount_page(&server, "/course/ads", listing_page(&[("Week 1", Some("/course/ads/w1"))]), 1).await;
    mount_page(&server, "/course/os", listing_page(&[]), 1).await;
    let session = session_for(&server);

    let tree = TreeBuilder::new(&session)
        .max_depth(1)
        .root_pattern(ListingPattern::Navigation)
        .build("Themis", url_for(&server, "/"))
        .await
        .expect("Build failed");

    assert_eq!(names_in_pre_order(&tree), vec!["Themis", "ADS", "Week 1", "OS"]);
}

#[tokio::test]
async fn test_attach_dates() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/course",
        listing_page(&[("Lab", Some("/lab")), ("Folder", Some("/folder"))]),
        1,
    )
    .await;
    // Each page is fetched once by the crawl and once by the date pass
    mount_page(
        &server,
        "/lab",
        dated_page(
            "Mon Nov 13 2023 09:00:00 GMT+0100 (Central European Standard Time)",
            "Sat Nov 18 2023 11:54:03 GMT+0100 (Central European Standard Time)",
            "Fri Dec 01 2023 23:59:59 GMT+0100 (Central European Standard Time)",
        ),
        2,
    )
    .await;
    mount_page(&server, "/folder", listing_page(&[]), 2).await;
    let session = session_for(&server);

    let mut tree = TreeBuilder::new(&session)
        .max_depth(1)
        .build("Courses", url_for(&server, "/course"))
        .await
        .expect("Build failed");

    let attached = attach_dates(&session, &mut tree).await.expect("Date pass failed");
    assert_eq!(attached, 1);

    let lab = tree.iter().find(|(_, n)| n.name == "Lab").unwrap().1;
    let dates = lab.dates.as_ref().expect("Lab has no dates");
    assert_eq!(calendar_date(&dates.due), "Sat Nov 18 2023");

    let folder = tree.iter().find(|(_, n)| n.name == "Folder").unwrap().1;
    assert!(folder.dates.is_none());
}

#[tokio::test]
async fn test_malformed_date_stops_date_pass() {
    let server = MockServer::start().await;
    mount_page(&server, "/course", listing_page(&[("Lab", Some("/lab"))]), 1).await;
    mount_page(&server, "/lab", dated_page("soon", "later", "never"), 2).await;
    let session = session_for(&server);

    let mut tree = TreeBuilder::new(&session)
        .max_depth(1)
        .build("Courses", url_for(&server, "/course"))
        .await
        .expect("Build failed");

    let err = attach_dates(&session, &mut tree).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

/// An assignment page carrying only the given (label, tooltip) date lines
fn partially_dated_page(lines: &[(&str, &str)]) -> String {
    let body: String = lines
        .iter()
        .map(|(label, title)| {
            format!(
                r#"<div class="cfg-line"><span class="cfg-key">{}</span><span class="cfg-val"><span class="tip" data-title="{}">short</span></span></div>"#,
                label, title
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="cfg-container">{}</div></body></html>"#,
        body
    )
}

#[tokio::test]
async fn test_malformed_date_not_masked_by_missing_start() {
    let server = MockServer::start().await;
    mount_page(&server, "/course", listing_page(&[("Lab", Some("/lab"))]), 1).await;
    mount_page(
        &server,
        "/lab",
        partially_dated_page(&[
            ("Deadline:", "soon"),
            ("End:", "Fri Dec 01 2023 23:59:59 GMT+0100 (CET)"),
        ]),
        2,
    )
    .await;
    let session = session_for(&server);

    let mut tree = TreeBuilder::new(&session)
        .max_depth(1)
        .build("Courses", url_for(&server, "/course"))
        .await
        .expect("Build failed");

    let err = attach_dates(&session, &mut tree).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.url().unwrap().ends_with("/lab"));
}

#[tokio::test]
async fn test_incomplete_dates_leave_node_undated() {
    let server = MockServer::start().await;
    mount_page(&server, "/course", listing_page(&[("Lab", Some("/lab"))]), 1).await;
    mount_page(
        &server,
        "/lab",
        partially_dated_page(&[
            ("Start:", "Mon Nov 13 2023 09:00:00 GMT+0100 (CET)"),
            ("Deadline:", "Sat Nov 18 2023 11:54:03 GMT+0100 (CET)"),
        ]),
        2,
    )
    .await;
    let session = session_for(&server);

    let mut tree = TreeBuilder::new(&session)
        .max_depth(1)
        .build("Courses", url_for(&server, "/course"))
        .await
        .expect("Build failed");

    let attached = attach_dates(&session, &mut tree).await.expect("Date pass failed");
    assert_eq!(attached, 0);
    assert!(tree.iter().all(|(_, node)| node.dates.is_none()));
}

#[tokio::test]
async fn test_fetch_profile() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/user",
        r#"<html><body><section class="border accent"><div class="cfg-container">
            <div class="cfg-line"><span class="cfg-key">Full name:</span><span class="cfg-val">Ada Lovelace</span></div>
            <div class="cfg-line"><span class="cfg-key">Last name:</span><span class="cfg-val">Lovelace</span></div>
            <div class="cfg-line"><span class="cfg-key">Initials:</span><span class="cfg-val">A.</span></div>
            <div class="cfg-line"><span class="cfg-key">Email:</span><span class="cfg-val">a.lovelace@student.rug.nl</span></div>
            <div class="cfg-line"><span class="cfg-key">First login:</span><span class="cfg-val">Sat Nov 18 2023 11:54:03 GMT+0100 (CET)</span></div>
            <div class="cfg-line"><span class="cfg-key">Last login:</span><span class="cfg-val">Mon Jan 08 2024 09:00:00 GMT+0100 (CET)</span></div>
        </div></section></body></html>"#
            .to_string(),
        1,
    )
    .await;
    let session = session_for(&server);

    let profile = fetch_profile(&session, &url_for(&server, "/user"))
        .await
        .expect("Profile fetch failed");

    assert_eq!(profile.full_name, "Ada Lovelace");
    assert_eq!(profile.email, "a.lovelace@student.rug.nl");
    assert_eq!(calendar_date(&profile.first_login_at), "Sat Nov 18 2023");
}

#[tokio::test]
async fn test_profile_page_without_fields_is_protocol_error() {
    let server = MockServer::start().await;
    mount_page(&server, "/user", "<html><body>Log in first</body></html>".to_string(), 1).await;
    let session = session_for(&server);

    let err = fetch_profile(&session, &url_for(&server, "/user"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}
