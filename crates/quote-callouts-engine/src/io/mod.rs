//! Host block APIs the core consumes, and the storage adapters built on them.

pub mod memory;
pub mod prune;
pub mod store;

use std::collections::BTreeMap;

use async_trait::async_trait;

pub use memory::MemoryHost;
pub use prune::prune_empty_quote;
pub use store::{AttributeStateStore, CalloutStateStore, StoredCallout, TextStateStore};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Block not found: {0}")]
    NotFound(String),
    #[error("Host rejected request for block {block_id}: {message}")]
    Rejected { block_id: String, message: String },
    #[error("Edit surface failed: {0}")]
    Surface(String),
}

/// Block attributes as the host stores them. An empty value removes the key.
pub type Attributes = BTreeMap<String, String>;

/// Durable read/write of a block's source text.
#[async_trait(?Send)]
pub trait BlockTextApi {
    async fn read_block_text(&self, block_id: &str) -> Result<String, HostError>;
    async fn write_block_text(&self, block_id: &str, text: &str) -> Result<(), HostError>;
}

/// Key-value attributes attached to a block.
#[async_trait(?Send)]
pub trait BlockAttributeApi {
    async fn read_block_attributes(&self, block_id: &str) -> Result<Attributes, HostError>;
    async fn write_block_attributes(
        &self,
        block_id: &str,
        attributes: &Attributes,
    ) -> Result<(), HostError>;
}

/// A child block as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRef {
    pub id: String,
    pub node_type: String,
    pub text: String,
}

#[async_trait(?Send)]
pub trait BlockTreeApi {
    async fn child_blocks(&self, block_id: &str) -> Result<Vec<BlockRef>, HostError>;
    async fn delete_block(&self, block_id: &str) -> Result<(), HostError>;
}
