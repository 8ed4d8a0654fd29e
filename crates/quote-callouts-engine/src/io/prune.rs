use super::{BlockTreeApi, HostError};
use crate::dom::attrs;
use crate::parsing::clean_title;

/// Deletes the quote block `block_id` when nothing is left inside it: no
/// children at all, or only empty paragraphs.
///
/// Returns whether the block was deleted.
pub async fn prune_empty_quote<T: BlockTreeApi + ?Sized>(
    tree: &T,
    block_id: &str,
) -> Result<bool, HostError> {
    let children = tree.child_blocks(block_id).await?;
    let empty = children
        .iter()
        .all(|c| c.node_type == attrs::PARAGRAPH_NODE_TYPE && clean_title(&c.text).is_empty());
    if !empty {
        return Ok(false);
    }

    log::debug!("deleting empty quote block {block_id}");
    tree.delete_block(block_id).await?;
    Ok(true)
}
