//! Event-driven front of the engine.
//!
//! A host adapter (a mutation observer in a browser, a synthetic driver in
//! tests) reports structural insertions and text edits through
//! [`ElementEvents`], forwards clicks and pointer events, and calls
//! [`CalloutProcessor::flush`] / [`CalloutProcessor::poll_clicks`] when the
//! next deadline passes. Anything that must reach durable text comes back
//! as a [`PersistOutcome`] for the host to send through its commit port.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use anyhow::Context;
use quote_callouts_config::{ConfigStorage, PluginConfig};

use crate::dom::{CalloutElement, ElementLookup, attrs};
use crate::interaction::{
    ClickAction, ClickDisambiguator, DOUBLE_CLICK_WINDOW, Debouncer, DragAbort, KEYSTROKE_DEBOUNCE,
    PASTE_DEBOUNCE, ResizeDrag, TextChange,
};
use crate::io::{BlockTreeApi, CalloutStateStore, HostError, prune_empty_quote};
use crate::logging;
use crate::menu::{MenuAction, MenuOutcome, plan_menu_action};
use crate::models::{CalloutElementState, TypeRegistry};
use crate::parsing::{clean_title, recognize};
use crate::persistence::{CommandUpdate, PendingCommit, PersistOutcome, prepare};
use crate::reconcile::{Transition, reconcile, reconcile_title};
use crate::style::theme_css;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub keystroke: Duration,
    pub paste: Duration,
    pub double_click: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            keystroke: KEYSTROKE_DEBOUNCE,
            paste: PASTE_DEBOUNCE,
            double_click: DOUBLE_CLICK_WINDOW,
        }
    }
}

/// Everything one plugin instance tracks. Nothing here is global, so two
/// processors never see each other's state.
#[derive(Debug)]
pub struct CalloutContext {
    registry: TypeRegistry,
    timings: Timings,
    debouncer: Debouncer,
    clicks: BTreeMap<String, ClickDisambiguator>,
    drags: BTreeMap<String, ResizeDrag>,
    /// Quote blocks this plugin inserted itself and may delete again if
    /// they are left empty.
    recently_created: BTreeSet<String>,
}

impl CalloutContext {
    pub fn new(registry: TypeRegistry, timings: Timings) -> Self {
        Self {
            registry,
            timings,
            debouncer: Debouncer::new(timings.keystroke, timings.paste),
            clicks: BTreeMap::new(),
            drags: BTreeMap::new(),
            recently_created: BTreeSet::new(),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn pending_text_changes(&self) -> usize {
        self.debouncer.pending_count()
    }

    pub fn is_dragging(&self, node_id: &str) -> bool {
        self.drags.get(node_id).is_some_and(ResizeDrag::is_dragging)
    }

    pub fn is_recently_created(&self, node_id: &str) -> bool {
        self.recently_created.contains(node_id)
    }
}

/// Notifications from the host's document.
pub trait ElementEvents {
    /// A block was inserted or re-rendered. Reconciled immediately.
    fn on_element_added(&mut self, element: &mut dyn CalloutElement) -> Transition;
    /// The text of `node_id` changed. Reconciled by a later flush.
    fn on_text_changed(&mut self, node_id: &str, change: TextChange, now: Instant);
}

pub struct CalloutProcessor {
    config: PluginConfig,
    context: CalloutContext,
}

impl CalloutProcessor {
    pub fn new(registry: TypeRegistry) -> Self {
        Self::with_timings(registry, Timings::default())
    }

    pub fn with_timings(registry: TypeRegistry, timings: Timings) -> Self {
        Self {
            config: PluginConfig::default(),
            context: CalloutContext::new(registry, timings),
        }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        Self {
            config: config.clone(),
            context: CalloutContext::new(TypeRegistry::from_config(config), Timings::default()),
        }
    }

    /// Loads the stored configuration, applies its logging switch and
    /// builds a processor for it.
    pub fn load(storage: &dyn ConfigStorage) -> anyhow::Result<Self> {
        let config = PluginConfig::load(storage).context("Failed to load callout configuration")?;
        logging::apply(&config);
        Ok(Self::from_config(&config))
    }

    pub fn context(&self) -> &CalloutContext {
        &self.context
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.context.registry
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn stylesheet(&self) -> String {
        theme_css(&self.context.registry, &self.config)
    }

    /// Earliest time a [`flush`](Self::flush) could do anything.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.context.debouncer.next_deadline()
    }

    /// Reconciles every element whose debounce window has passed. Elements
    /// that disappeared in the meantime are skipped.
    pub fn flush(
        &mut self,
        now: Instant,
        doc: &mut dyn ElementLookup,
    ) -> Vec<(String, Transition)> {
        let registry = &self.context.registry;
        self.context
            .debouncer
            .due(now)
            .into_iter()
            .filter_map(|id| {
                let Some(element) = doc.element_mut(&id) else {
                    log::debug!("element {id} gone before its debounced reconcile");
                    return None;
                };
                let transition = reconcile_title(element, registry);
                Some((id, transition))
            })
            .collect()
    }

    /// Drops all timers and drags held for `node_id`.
    pub fn forget(&mut self, node_id: &str) {
        self.context.debouncer.cancel(node_id);
        self.context.clicks.remove(node_id);
        self.context.drags.remove(node_id);
        self.context.recently_created.remove(node_id);
    }

    /// Records a click on the title of `node_id`.
    ///
    /// Clicks on elements without a collapse toggle are ignored. The result
    /// is `EnterEdit` on a double click, and `ToggleCollapse` only when an
    /// earlier single click expired unpolled; the caller then calls
    /// [`toggle_collapse`](Self::toggle_collapse).
    pub fn click_title(
        &mut self,
        node_id: &str,
        now: Instant,
        doc: &dyn ElementLookup,
    ) -> Option<ClickAction> {
        let has_toggle = doc
            .element(node_id)
            .is_some_and(|element| element.has_collapse_toggle());
        if !has_toggle {
            return None;
        }
        let window = self.context.timings.double_click;
        self.context
            .clicks
            .entry(node_id.to_string())
            .or_insert_with(|| ClickDisambiguator::new(window))
            .click(now)
    }

    /// Fires every single click whose double-click window has passed.
    pub fn poll_clicks(
        &mut self,
        now: Instant,
        doc: &mut dyn ElementLookup,
    ) -> Vec<PersistOutcome> {
        let fired: Vec<String> = self
            .context
            .clicks
            .iter_mut()
            .filter_map(|(id, clicks)| {
                (clicks.poll(now) == Some(ClickAction::ToggleCollapse)).then(|| id.clone())
            })
            .collect();
        self.context.clicks.retain(|_, clicks| clicks.is_pending());

        fired
            .iter()
            .filter_map(|id| self.toggle_collapse(id, doc))
            .collect()
    }

    /// Flips the collapsed attribute now and prepares the matching title
    /// text. `None` if the element is gone or not a callout.
    pub fn toggle_collapse(
        &self,
        node_id: &str,
        doc: &mut dyn ElementLookup,
    ) -> Option<PersistOutcome> {
        let element = doc.element_mut(node_id)?;
        let state = CalloutElementState::read(element);
        if !state.is_callout() {
            return None;
        }
        let collapsed = !state.collapsed.unwrap_or(false);
        element.set_attr(attrs::COLLAPSED, attrs::format_bool(collapsed));
        log::debug!("callout {node_id} collapsed={collapsed}");
        Some(prepare(
            &self.context.registry,
            element,
            &CommandUpdate::collapsed(collapsed),
        ))
    }

    pub fn begin_resize(
        &mut self,
        node_id: &str,
        pointer_x: f64,
        container_width: f64,
        doc: &dyn ElementLookup,
    ) -> Result<(), DragAbort> {
        let element = doc
            .element(node_id)
            .ok_or_else(|| DragAbort::MissingElement(node_id.to_string()))?;
        let mut drag = ResizeDrag::default();
        if let Err(abort) = drag.begin(element, pointer_x, container_width) {
            log::debug!("resize of {node_id} aborted: {abort}");
            return Err(abort);
        }
        self.context.drags.insert(node_id.to_string(), drag);
        Ok(())
    }

    pub fn resize_to(
        &mut self,
        node_id: &str,
        pointer_x: f64,
        doc: &mut dyn ElementLookup,
    ) -> Option<f64> {
        let drag = self.context.drags.get_mut(node_id)?;
        let element = doc.element_mut(node_id)?;
        drag.drag_to(element, pointer_x)
    }

    /// Pointer up: the single durable write of a drag.
    pub fn end_resize(
        &mut self,
        node_id: &str,
        doc: &mut dyn ElementLookup,
    ) -> Option<PersistOutcome> {
        let mut drag = self.context.drags.remove(node_id)?;
        let element = doc.element_mut(node_id)?;
        let update = drag.finish(element)?;
        Some(prepare(&self.context.registry, element, &update))
    }

    /// Applies a menu choice to `node_id`.
    ///
    /// Attributes change immediately; the returned outcome carries the title
    /// text to commit. `None` when the element is gone or the action does
    /// not apply.
    pub fn apply_menu(
        &mut self,
        node_id: &str,
        action: &MenuAction,
        doc: &mut dyn ElementLookup,
    ) -> Option<PersistOutcome> {
        let registry = &self.context.registry;
        let element = doc.element_mut(node_id)?;
        let current = element.title_text();

        let text = match plan_menu_action(registry, element, action) {
            MenuOutcome::Retitle(text) => {
                reconcile(element, recognize(&text, registry).as_ref());
                text
            }
            MenuOutcome::Cleared { title_blanked: true } => String::new(),
            MenuOutcome::Cleared {
                title_blanked: false,
            } => return Some(PersistOutcome::Unchanged),
            MenuOutcome::Ignored => return None,
        };

        let unchanged = current.as_deref().map(clean_title) == Some(text.as_str());
        Some(if unchanged {
            PersistOutcome::Unchanged
        } else {
            PersistOutcome::Commit(PendingCommit {
                node_id: node_id.to_string(),
                text,
            })
        })
    }

    /// Pulls the stored state of `node_id` into its element.
    ///
    /// A store failure is logged and leaves the element as it was.
    pub async fn sync_from_store(
        &self,
        store: &dyn CalloutStateStore,
        node_id: &str,
        doc: &mut dyn ElementLookup,
    ) -> Option<Transition> {
        let stored = match store.read(node_id).await {
            Ok(stored) => stored,
            Err(err) => {
                log::warn!("reading callout state of {node_id} failed: {err}");
                return None;
            }
        };
        let registry = &self.context.registry;
        let element = doc.element_mut(node_id)?;
        let baseline = element
            .title_text()
            .and_then(|text| recognize(&text, registry));
        let parsed = stored.and_then(|s| s.to_command(registry, baseline.as_ref()));
        Some(reconcile(element, parsed.as_ref()))
    }

    /// Marks `node_id` as a quote this plugin inserted.
    pub fn mark_created(&mut self, node_id: &str) {
        self.context.recently_created.insert(node_id.to_string());
    }

    /// Deletes `node_id` if this plugin created it and it was left empty.
    /// Quotes the user made are never touched.
    pub async fn prune_if_abandoned<T: BlockTreeApi + ?Sized>(
        &mut self,
        tree: &T,
        node_id: &str,
    ) -> Result<bool, HostError> {
        if !self.context.recently_created.remove(node_id) {
            return Ok(false);
        }
        let deleted = prune_empty_quote(tree, node_id).await?;
        if deleted {
            self.forget(node_id);
        }
        Ok(deleted)
    }
}

impl ElementEvents for CalloutProcessor {
    fn on_element_added(&mut self, element: &mut dyn CalloutElement) -> Transition {
        if !element.is_quote() {
            return Transition::Unchanged;
        }
        reconcile_title(element, &self.context.registry)
    }

    fn on_text_changed(&mut self, node_id: &str, change: TextChange, now: Instant) {
        self.context.debouncer.schedule(node_id, change, now);
    }
}
