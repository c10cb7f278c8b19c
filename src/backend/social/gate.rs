/**
 * Messaging Gate
 *
 * Two users may exchange messages only while they mutually follow each
 * other. This is the single place that predicate lives: message send and
 * history read both call `ensure_can_message`, so the two endpoints can
 * never drift apart on what "allowed to chat" means.
 *
 * The predicate is evaluated against the current following sets on every
 * call. It is never cached; an unfollow takes effect on the very next
 * check.
 */

use std::sync::Arc;
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::social::store::GraphStore;

/// Whether messaging is permitted between the two identities.
///
/// Symmetric by construction: mutual follow reads both directions.
pub async fn can_message(
    graph: &Arc<dyn GraphStore>,
    a: Uuid,
    b: Uuid,
) -> Result<bool, ApiError> {
    Ok(graph.is_mutual_follow(a, b).await?)
}

/// Gate check that fails with the permission error the boundary expects.
pub async fn ensure_can_message(
    graph: &Arc<dyn GraphStore>,
    a: Uuid,
    b: Uuid,
) -> Result<(), ApiError> {
    if can_message(graph, a, b).await? {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "Both users must follow each other to chat",
        ))
    }
}
