use async_trait::async_trait;
use serde::Serialize;

use super::{Attributes, BlockAttributeApi, BlockTextApi, HostError};
use crate::dom::attrs::{format_bool, parse_bool};
use crate::models::{ParsedCommand, TypeRegistry};
use crate::parsing::{clean_title, recognize};

pub const TYPE_KEY: &str = "custom-callout-type";
pub const TITLE_KEY: &str = "custom-callout-title";
pub const COLLAPSED_KEY: &str = "custom-callout-collapsed";

/// Durable per-block callout state.
///
/// Sizes are only carried by the text store; the attribute store has no
/// keys for them and ignores them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoredCallout {
    pub type_id: String,
    pub title: Option<String>,
    pub collapsed: Option<bool>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub spacing: Option<String>,
}

impl StoredCallout {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            ..Self::default()
        }
    }

    /// Builds the directive this state describes, merging sizes into
    /// `baseline` without dropping ones the state leaves unset.
    pub fn to_command(
        &self,
        registry: &TypeRegistry,
        baseline: Option<&ParsedCommand>,
    ) -> Option<ParsedCommand> {
        let descriptor = registry.get(&self.type_id)?;
        let mut command = match baseline {
            Some(base) if base.type_id == descriptor.id => base.clone(),
            Some(base) => base.with_type(descriptor),
            None => ParsedCommand::new(descriptor),
        };
        if self.width.is_some() {
            command.width = self.width.clone();
        }
        if self.height.is_some() {
            command.height = self.height.clone();
        }
        if self.spacing.is_some() {
            command.spacing = self.spacing.clone();
        }
        command.collapsed = self.collapsed;
        command.title = self.title.clone();
        Some(command)
    }
}

impl From<&ParsedCommand> for StoredCallout {
    fn from(parsed: &ParsedCommand) -> Self {
        Self {
            type_id: parsed.type_id.clone(),
            title: parsed.title.clone(),
            collapsed: parsed.collapsed,
            width: parsed.width.clone(),
            height: parsed.height.clone(),
            spacing: parsed.spacing.clone(),
        }
    }
}

/// Where a block's callout state lives. `write(id, None)` removes it.
#[async_trait(?Send)]
pub trait CalloutStateStore {
    async fn read(&self, block_id: &str) -> Result<Option<StoredCallout>, HostError>;
    async fn write(&self, block_id: &str, state: Option<&StoredCallout>) -> Result<(), HostError>;
}

/// Stores state inline as the directive on the first line of the quote.
///
/// Blocks whose first line carries no `>` marker are not quotes: they read
/// as `None`, clearing them is a no-op and writing state is rejected.
pub struct TextStateStore<'a, H: BlockTextApi + ?Sized> {
    host: &'a H,
    registry: &'a TypeRegistry,
}

impl<'a, H: BlockTextApi + ?Sized> TextStateStore<'a, H> {
    pub fn new(host: &'a H, registry: &'a TypeRegistry) -> Self {
        Self { host, registry }
    }
}

/// Splits block source into its first line and the remainder (with the
/// separating newline).
fn split_first_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(index) => (&text[..index], &text[index..]),
        None => (text, ""),
    }
}

/// Splits a title line into its `>` markers (spacing included) and the
/// content after them. `None` when the line is not quoted.
fn split_quote_markers(line: &str) -> Option<(&str, &str)> {
    let content = line.trim_start_matches(['>', ' ']);
    let markers = &line[..line.len() - content.len()];
    markers.contains('>').then_some((markers, content))
}

#[async_trait(?Send)]
impl<H: BlockTextApi + ?Sized> CalloutStateStore for TextStateStore<'_, H> {
    async fn read(&self, block_id: &str) -> Result<Option<StoredCallout>, HostError> {
        let text = self.host.read_block_text(block_id).await?;
        let (first, _) = split_first_line(&text);
        let Some((_, content)) = split_quote_markers(first) else {
            return Ok(None);
        };
        Ok(recognize(content, self.registry).map(|p| StoredCallout::from(&p)))
    }

    async fn write(&self, block_id: &str, state: Option<&StoredCallout>) -> Result<(), HostError> {
        let text = self.host.read_block_text(block_id).await?;
        let (first, rest) = split_first_line(&text);
        let Some((prefix, content)) = split_quote_markers(first) else {
            return match state {
                Some(_) => Err(HostError::Rejected {
                    block_id: block_id.to_string(),
                    message: "block is not a quote".to_string(),
                }),
                None => Ok(()),
            };
        };
        let baseline = recognize(content, self.registry);

        let new_content = match state {
            Some(state) => state
                .to_command(self.registry, baseline.as_ref())
                .ok_or_else(|| HostError::Rejected {
                    block_id: block_id.to_string(),
                    message: format!("unknown callout type {}", state.type_id),
                })?
                .to_command_string(),
            None => match &baseline {
                Some(parsed) => parsed.title.clone().unwrap_or_default(),
                None => clean_title(content).to_string(),
            },
        };

        let updated = format!("{prefix}{new_content}{rest}");
        if updated == text {
            return Ok(());
        }
        self.host.write_block_text(block_id, &updated).await
    }
}

/// Stores state in host block attributes under the `custom-callout-*` keys.
pub struct AttributeStateStore<'a, H: BlockAttributeApi + ?Sized> {
    host: &'a H,
}

impl<'a, H: BlockAttributeApi + ?Sized> AttributeStateStore<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }
}

#[async_trait(?Send)]
impl<H: BlockAttributeApi + ?Sized> CalloutStateStore for AttributeStateStore<'_, H> {
    async fn read(&self, block_id: &str) -> Result<Option<StoredCallout>, HostError> {
        let attributes = self.host.read_block_attributes(block_id).await?;
        let non_empty = |key: &str| attributes.get(key).filter(|v| !v.is_empty()).cloned();

        Ok(non_empty(TYPE_KEY).map(|type_id| StoredCallout {
            type_id,
            title: non_empty(TITLE_KEY),
            collapsed: non_empty(COLLAPSED_KEY).and_then(|c| parse_bool(&c)),
            ..StoredCallout::default()
        }))
    }

    async fn write(&self, block_id: &str, state: Option<&StoredCallout>) -> Result<(), HostError> {
        let mut attributes = Attributes::new();
        attributes.insert(
            TYPE_KEY.to_string(),
            state.map(|s| s.type_id.clone()).unwrap_or_default(),
        );
        attributes.insert(
            TITLE_KEY.to_string(),
            state.and_then(|s| s.title.clone()).unwrap_or_default(),
        );
        attributes.insert(
            COLLAPSED_KEY.to_string(),
            state
                .and_then(|s| s.collapsed)
                .map(|c| format_bool(c).to_string())
                .unwrap_or_default(),
        );
        self.host.write_block_attributes(block_id, &attributes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::memory::MemoryHost;
    use crate::tests::registry;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn text_store_reads_first_quote_line() {
        let host = MemoryHost::new();
        host.put_text("b1", "> [!warning|25%|200px]- Careful\n> body text");
        let registry = registry();
        let store = TextStateStore::new(&host, &registry);

        let state = store.read("b1").await.unwrap().unwrap();
        assert_eq!(state.type_id, "warning");
        assert_eq!(state.title.as_deref(), Some("Careful"));
        assert_eq!(state.collapsed, Some(true));
        assert_eq!(state.width.as_deref(), Some("25%"));
        assert_eq!(state.height.as_deref(), Some("200px"));
    }

    #[tokio::test]
    async fn text_store_ignores_non_quote_blocks() {
        let host = MemoryHost::new();
        host.put_text("p1", "[!info] not inside a quote");
        let registry = registry();
        let store = TextStateStore::new(&host, &registry);

        assert_eq!(store.read("p1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn text_store_write_merges_into_existing_directive() {
        let host = MemoryHost::new();
        host.put_text("b1", "> [!info|30%]\n> body");
        let registry = registry();
        let store = TextStateStore::new(&host, &registry);

        let mut state = StoredCallout::new("tip");
        state.collapsed = Some(true);
        store.write("b1", Some(&state)).await.unwrap();

        assert_eq!(host.text("b1").unwrap(), "> [!tip|30%]-\n> body");
    }

    #[tokio::test]
    async fn text_store_leaves_plain_paragraphs_alone() {
        let host = MemoryHost::new();
        host.put_text("p1", "plain paragraph\nmore");
        let registry = registry();
        let store = TextStateStore::new(&host, &registry);

        store.write("p1", None).await.unwrap();
        let result = store.write("p1", Some(&StoredCallout::new("info"))).await;

        assert!(matches!(result, Err(HostError::Rejected { .. })));
        assert_eq!(store.read("p1").await.unwrap(), None);
        assert_eq!(host.text("p1").unwrap(), "plain paragraph\nmore");
        assert_eq!(host.text_writes(), 0);
    }

    #[test]
    fn quote_markers_split_from_content() {
        assert_eq!(split_quote_markers("[!info]"), None);
        assert_eq!(split_quote_markers("  indented"), None);
        assert_eq!(split_quote_markers("> [!info]"), Some(("> ", "[!info]")));
        assert_eq!(split_quote_markers(">> [!tip]"), Some((">> ", "[!tip]")));
        assert_eq!(split_quote_markers("> > x"), Some(("> > ", "x")));
        assert_eq!(split_quote_markers(">"), Some((">", "")));
    }

    #[tokio::test]
    async fn text_store_clear_keeps_title() {
        let host = MemoryHost::new();
        host.put_text("b1", "> [!info]- Agenda\n> body");
        let registry = registry();
        let store = TextStateStore::new(&host, &registry);

        store.write("b1", None).await.unwrap();
        assert_eq!(host.text("b1").unwrap(), "> Agenda\n> body");
    }

    #[tokio::test]
    async fn text_store_rejects_unknown_type() {
        let host = MemoryHost::new();
        host.put_text("b1", "> [!info]");
        let registry = registry();
        let store = TextStateStore::new(&host, &registry);

        let result = store.write("b1", Some(&StoredCallout::new("nope"))).await;
        assert!(matches!(result, Err(HostError::Rejected { .. })));
        assert_eq!(host.text("b1").unwrap(), "> [!info]");
    }

    #[tokio::test]
    async fn text_store_unchanged_text_skips_write() {
        let host = MemoryHost::new();
        host.put_text("b1", "> [!info]");
        let registry = registry();
        let store = TextStateStore::new(&host, &registry);

        store.write("b1", Some(&StoredCallout::new("info"))).await.unwrap();
        assert_eq!(host.text_writes(), 0);
    }

    #[tokio::test]
    async fn attribute_store_roundtrip() {
        let host = MemoryHost::new();
        let store = AttributeStateStore::new(&host);
        let state = StoredCallout {
            title: Some("Heads up".to_string()),
            collapsed: Some(false),
            ..StoredCallout::new("info")
        };

        store.write("b1", Some(&state)).await.unwrap();
        assert_eq!(
            host.attributes("b1").get(COLLAPSED_KEY).map(String::as_str),
            Some("false")
        );
        assert_eq!(store.read("b1").await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn attribute_store_clear_blanks_keys() {
        let host = MemoryHost::new();
        let store = AttributeStateStore::new(&host);
        store
            .write("b1", Some(&StoredCallout::new("tip")))
            .await
            .unwrap();
        store.write("b1", None).await.unwrap();

        assert_eq!(store.read("b1").await.unwrap(), None);
        assert!(host.attributes("b1").is_empty());
    }

    #[tokio::test]
    async fn attribute_store_propagates_host_failure() {
        let host = MemoryHost::new();
        host.fail_block("b1");
        let store = AttributeStateStore::new(&host);
        assert!(store.read("b1").await.is_err());
    }
}
