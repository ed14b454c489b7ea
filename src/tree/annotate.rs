//! Date pass over a crawled tree

use crate::session::{fetch_assignment_dates, Session};
use crate::tree::AssignmentTree;
use crate::{ErrorKind, ThemisError};

/// Fetches every non-root node's page and attaches its tooltip dates
///
/// Pages without date tooltips (courses, plain folders) are left with
/// `dates = None`, and so are pages missing some of them. Transport and
/// parse errors stop the pass, even when another tooltip on the same page
/// is missing.
///
/// # Returns
///
/// * `Ok(usize)` - Number of nodes that received dates
/// * `Err(ThemisError)` - A page could not be fetched or had malformed dates
pub async fn attach_dates(
    session: &Session,
    tree: &mut AssignmentTree,
) -> Result<usize, ThemisError> {
    let mut attached = 0;

    for id in tree.pre_order() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        if node.is_root() {
            continue;
        }
        let url = node.url.clone();

        let dates = match fetch_assignment_dates(session, &url).await {
            Ok(dates) => Some(dates),
            Err(e) if e.kind() == ErrorKind::Protocol => {
                tracing::debug!("No dates on {}: {}", url, e);
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(node) = tree.get_mut(id) {
            if dates.is_some() {
                attached += 1;
            }
            node.dates = dates;
        }
    }

    tracing::info!("Attached dates to {} of {} nodes", attached, tree.len() - 1);
    Ok(attached)
}
