use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;

use super::{Attributes, BlockAttributeApi, BlockRef, BlockTextApi, BlockTreeApi, HostError};

/// In-memory host implementing every block API, with per-block failure
/// injection.
#[derive(Debug, Default)]
pub struct MemoryHost {
    texts: RefCell<BTreeMap<String, String>>,
    attributes: RefCell<BTreeMap<String, Attributes>>,
    children: RefCell<BTreeMap<String, Vec<BlockRef>>>,
    deleted: RefCell<Vec<String>>,
    failing: RefCell<BTreeSet<String>>,
    text_writes: Cell<usize>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_text(&self, block_id: &str, text: &str) {
        self.texts
            .borrow_mut()
            .insert(block_id.to_string(), text.to_string());
    }

    pub fn text(&self, block_id: &str) -> Option<String> {
        self.texts.borrow().get(block_id).cloned()
    }

    pub fn text_writes(&self) -> usize {
        self.text_writes.get()
    }

    pub fn put_attribute(&self, block_id: &str, key: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .entry(block_id.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn attributes(&self, block_id: &str) -> Attributes {
        self.attributes
            .borrow()
            .get(block_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn put_children(&self, block_id: &str, children: Vec<BlockRef>) {
        self.children
            .borrow_mut()
            .insert(block_id.to_string(), children);
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.borrow().clone()
    }

    /// Every later call touching `block_id` is rejected.
    pub fn fail_block(&self, block_id: &str) {
        self.failing.borrow_mut().insert(block_id.to_string());
    }

    fn check(&self, block_id: &str) -> Result<(), HostError> {
        if self.failing.borrow().contains(block_id) {
            return Err(HostError::Rejected {
                block_id: block_id.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl BlockTextApi for MemoryHost {
    async fn read_block_text(&self, block_id: &str) -> Result<String, HostError> {
        self.check(block_id)?;
        self.text(block_id)
            .ok_or_else(|| HostError::NotFound(block_id.to_string()))
    }

    async fn write_block_text(&self, block_id: &str, text: &str) -> Result<(), HostError> {
        self.check(block_id)?;
        self.put_text(block_id, text);
        self.text_writes.set(self.text_writes.get() + 1);
        Ok(())
    }
}

#[async_trait(?Send)]
impl BlockAttributeApi for MemoryHost {
    async fn read_block_attributes(&self, block_id: &str) -> Result<Attributes, HostError> {
        self.check(block_id)?;
        Ok(self.attributes(block_id))
    }

    async fn write_block_attributes(
        &self,
        block_id: &str,
        attributes: &Attributes,
    ) -> Result<(), HostError> {
        self.check(block_id)?;
        let mut all = self.attributes.borrow_mut();
        let stored = all.entry(block_id.to_string()).or_default();
        for (key, value) in attributes {
            if value.is_empty() {
                stored.remove(key);
            } else {
                stored.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl BlockTreeApi for MemoryHost {
    async fn child_blocks(&self, block_id: &str) -> Result<Vec<BlockRef>, HostError> {
        self.check(block_id)?;
        Ok(self
            .children
            .borrow()
            .get(block_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_block(&self, block_id: &str) -> Result<(), HostError> {
        self.check(block_id)?;
        self.children.borrow_mut().remove(block_id);
        self.texts.borrow_mut().remove(block_id);
        self.deleted.borrow_mut().push(block_id.to_string());
        Ok(())
    }
}
