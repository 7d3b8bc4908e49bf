//! Editor context: the single writer for pages, layers and selection.
//!
//! DESIGN
//! ======
//! `Editor` replaces a global reactive store. It is created once by the host,
//! passed by `&mut` to every controller, and owns the design, the selection,
//! the control-state token and the injected collaborators. Mutations are
//! synchronous and never re-entered; the host's event loop is the only
//! scheduler.
//!
//! Invalid addresses (a stale page or layer index) are logged and ignored
//! rather than surfaced as errors, because they only arise from an
//! interaction racing a structural change and there is nothing useful the
//! caller could do with an error.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::camera::PageViewport;
use crate::collab::{BusEvent, Caret, Collaborators, TextTarget};
use crate::config::EngineConfig;
use crate::doc::{
    Design, GroupLayer, ImageFormat, Layer, LayerFlags, LayerId, LayerKind, Page, StylePatch, TextFormat,
};
use crate::geometry::Point;
use crate::hit;
use crate::zindex;

// =============================================================================
// TYPES
// =============================================================================

/// Address of a layer: a page-level layer, or a child of a group / frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerPath {
    pub page: usize,
    pub layer: usize,
    pub sub: Option<usize>,
}

impl LayerPath {
    #[must_use]
    pub fn new(page: usize, layer: usize) -> Self {
        Self { page, layer, sub: None }
    }

    #[must_use]
    pub fn child(page: usize, layer: usize, sub: usize) -> Self {
        Self { page, layer, sub: Some(sub) }
    }

    /// The page-level layer that owns this path.
    #[must_use]
    pub fn primary(self) -> Self {
        Self { sub: None, ..self }
    }
}

/// The current primary selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedInfo {
    pub page_index: usize,
    /// Index of the selected layer (a `Tmp` for multi-selection).
    pub index: Option<usize>,
    /// Kinds of the selected layers; a `Tmp` reports its children's kinds.
    pub types: BTreeSet<LayerKind>,
}

/// The active child inside the selected group or frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubSelectedInfo {
    pub index: Option<usize>,
    pub kind: Option<LayerKind>,
}

/// What the current owner of the pointer lifecycle is doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControlKind {
    #[default]
    None,
    Move,
    Scale,
    Rotate,
    LineMove,
    Pinch,
}

/// Identifier handed out to each controller instance.
pub type ControllerId = u64;

/// Process-wide token naming the controller that owns the current gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub kind: ControlKind,
    pub id: Option<ControllerId>,
    pub layer: Option<LayerPath>,
}

/// A one-shot formatting clipboard applied on the next layer interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum CopiedFormat {
    Text(TextFormat),
    Image(ImageFormat),
}

// =============================================================================
// EDITOR
// =============================================================================

#[derive(Debug)]
pub struct Editor {
    design: Design,
    viewports: Vec<PageViewport>,
    selected: SelectedInfo,
    sub_selected: SubSelectedInfo,
    control: ControlState,
    is_moving: bool,
    copied_format: Option<CopiedFormat>,
    next_controller: ControllerId,
    pub config: EngineConfig,
    pub collab: Collaborators,
}

impl Editor {
    #[must_use]
    pub fn new(design: Design) -> Self {
        Self::with_config(design, EngineConfig::default(), Collaborators::default())
    }

    #[must_use]
    pub fn with_config(mut design: Design, config: EngineConfig, collab: Collaborators) -> Self {
        for page in &mut design.pages {
            zindex::reassign_zindex(page);
        }
        Self {
            design,
            viewports: Vec::new(),
            selected: SelectedInfo::default(),
            sub_selected: SubSelectedInfo::default(),
            control: ControlState::default(),
            is_moving: false,
            copied_format: None,
            next_controller: 1,
            config,
            collab,
        }
    }

    // --- Reads ---

    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.design.pages
    }

    #[must_use]
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.design.pages.get(index)
    }

    pub(crate) fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.design.pages.get_mut(index)
    }

    #[must_use]
    pub fn layer(&self, path: LayerPath) -> Option<&Layer> {
        let layer = self.page(path.page)?.layers.get(path.layer)?;
        match path.sub {
            Some(sub) => layer.children().get(sub),
            None => Some(layer),
        }
    }

    pub(crate) fn layer_mut(&mut self, path: LayerPath) -> Option<&mut Layer> {
        let layer = self.page_mut(path.page)?.layers.get_mut(path.layer)?;
        match path.sub {
            Some(sub) => layer.children_mut()?.get_mut(sub),
            None => Some(layer),
        }
    }

    #[must_use]
    pub fn selected(&self) -> &SelectedInfo {
        &self.selected
    }

    #[must_use]
    pub fn sub_selected(&self) -> SubSelectedInfo {
        self.sub_selected
    }

    /// Path of the primary selection, if any.
    #[must_use]
    pub fn selected_path(&self) -> Option<LayerPath> {
        self.selected.index.map(|i| LayerPath::new(self.selected.page_index, i))
    }

    #[must_use]
    pub fn selected_layer(&self) -> Option<&Layer> {
        self.layer(self.selected_path()?)
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    #[must_use]
    pub fn control_state(&self) -> ControlState {
        self.control
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.control.kind == ControlKind::Pinch
    }

    #[must_use]
    pub fn viewport(&self, page: usize) -> PageViewport {
        self.viewports.get(page).copied().unwrap_or_default()
    }

    /// Page whose on-screen rectangle contains `screen`, if any.
    #[must_use]
    pub fn page_at(&self, screen: Point) -> Option<usize> {
        self.design.pages.iter().enumerate().find_map(|(i, page)| {
            self.viewport(i)
                .screen_rect(page.width, page.height)
                .contains(screen)
                .then_some(i)
        })
    }

    /// Snapshot of the design with any multi-selection wrapper dissolved.
    #[must_use]
    pub fn export_design(&self) -> Design {
        let mut design = self.design.clone();
        for page in &mut design.pages {
            dissolve_all_tmp(page);
        }
        design
    }

    // --- Viewport ---

    pub fn set_viewport(&mut self, page: usize, viewport: PageViewport) {
        if self.viewports.len() <= page {
            self.viewports.resize(page + 1, PageViewport::default());
        }
        self.viewports[page] = viewport;
    }

    // --- Layer mutations ---

    /// Patch a layer's styles, producing a new style record.
    pub fn update_layer_styles(&mut self, path: LayerPath, patch: &StylePatch) -> bool {
        let Some(layer) = self.layer_mut(path) else {
            warn!(?path, "update_layer_styles: no such layer");
            return false;
        };
        layer.patch_styles(patch);
        true
    }

    /// Edit the interaction flags of a layer.
    pub fn update_layer_flags<F>(&mut self, path: LayerPath, edit: F) -> bool
    where
        F: FnOnce(&mut LayerFlags),
    {
        let Some(layer) = self.layer_mut(path) else {
            warn!(?path, "update_layer_flags: no such layer");
            return false;
        };
        edit(layer.flags_mut());
        true
    }

    /// Replace a layer wholesale (used by resize policies that touch
    /// kind-specific fields).
    pub fn replace_layer(&mut self, path: LayerPath, layer: Layer) -> bool {
        let Some(slot) = self.layer_mut(path) else {
            warn!(?path, "replace_layer: no such layer");
            return false;
        };
        *slot = layer;
        true
    }

    /// Append a layer on top of the page. Returns its index.
    pub fn add_layer(&mut self, page: usize, layer: Layer) -> Option<usize> {
        let len = self.page(page)?.layers.len();
        self.insert_layer(page, len, layer)
    }

    /// Insert a layer at `index` (clamped to the page's layer count).
    pub fn insert_layer(&mut self, page_index: usize, index: usize, layer: Layer) -> Option<usize> {
        let Some(page) = self.page_mut(page_index) else {
            warn!(page = page_index, "insert_layer: no such page");
            return None;
        };
        let index = index.min(page.layers.len());
        page.layers.insert(index, layer);
        zindex::reassign_zindex(page);
        if self.selected.page_index == page_index {
            if let Some(sel) = self.selected.index {
                if sel >= index {
                    self.selected.index = Some(sel + 1);
                }
            }
        }
        Some(index)
    }

    /// Remove a page-level layer. Selection is cleared or shifted to follow.
    pub fn delete_layer(&mut self, page_index: usize, index: usize) -> Option<Layer> {
        let page = self.page_mut(page_index)?;
        if index >= page.layers.len() {
            warn!(page = page_index, index, "delete_layer: index out of range");
            return None;
        }
        let removed = page.layers.remove(index);
        zindex::reassign_zindex(page);
        if self.selected.page_index == page_index {
            match self.selected.index {
                Some(sel) if sel == index => {
                    self.selected.index = None;
                    self.selected.types.clear();
                    self.sub_selected = SubSelectedInfo::default();
                }
                Some(sel) if sel > index => self.selected.index = Some(sel - 1),
                _ => {}
            }
        }
        debug!(page = page_index, index, id = %removed.id(), "layer deleted");
        Some(removed)
    }

    /// Move a page-level layer to another page at `position` (destination page
    /// coordinates). The layer lands on top of the destination. Returns its
    /// new index.
    pub fn move_layer_to_page(&mut self, from: usize, index: usize, to: usize, position: Point) -> Option<usize> {
        if self.page(to).is_none() {
            warn!(from, to, "move_layer_to_page: no such destination page");
            return None;
        }
        let was_selected = self.selected.page_index == from && self.selected.index == Some(index);
        let mut layer = self.delete_layer(from, index)?;
        layer.patch_styles(&StylePatch::position(position.x, position.y));
        let new_index = self.add_layer(to, layer)?;
        if was_selected {
            self.selected.page_index = to;
            self.selected.index = Some(new_index);
            let types = self.kinds_of(LayerPath::new(to, new_index));
            self.selected.types = types;
        }
        Some(new_index)
    }

    /// Reorder the page's layers and keep the selection pointing at the same
    /// layer.
    pub fn update_layer_order(&mut self, page_index: usize, index: usize, order: zindex::LayerOrder) -> Option<usize> {
        let page = self.page_mut(page_index)?;
        let new_index = zindex::update_layer_order(page, index, order)?;
        if self.selected.page_index == page_index && self.selected.index == Some(index) {
            self.selected.index = Some(new_index);
        }
        Some(new_index)
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.is_moving = moving;
    }

    // --- Selection ---

    /// Make a page-level layer the primary selection.
    pub fn select_layer(&mut self, page: usize, index: usize) {
        if self.selected.page_index == page && self.selected.index == Some(index) {
            return;
        }
        let Some(id) = self.layer(LayerPath::new(page, index)).map(Layer::id) else {
            warn!(page, index, "select_layer: no such layer");
            return;
        };
        self.deselect();
        // Dissolving a previous Tmp can shift the target's index.
        let Some(index) = self.page(page).and_then(|p| p.index_of(id)) else {
            return;
        };
        let path = LayerPath::new(page, index);
        let types = self.kinds_of(path);
        self.update_layer_flags(path, |f| f.active = true);
        self.selected = SelectedInfo { page_index: page, index: Some(index), types };
        debug!(page, index, %id, "layer selected");
    }

    /// Clear the primary and sub selection. A `Tmp` wrapper is dissolved.
    pub fn deselect(&mut self) {
        self.clear_sub_selection();
        let Some(path) = self.selected_path() else {
            return;
        };
        if let Some(Layer::Tmp(_)) = self.layer(path) {
            self.dissolve_tmp(path.page, path.layer);
        } else {
            self.update_layer_flags(path, |f| {
                f.active = false;
                f.shown = false;
                f.editing = false;
            });
        }
        self.selected.index = None;
        self.selected.types.clear();
    }

    /// Shift/Ctrl/Meta-click: toggle a layer in or out of the multi-selection.
    pub fn toggle_multi_select(&mut self, page: usize, index: usize) {
        let Some(current) = self.selected_path() else {
            self.select_layer(page, index);
            return;
        };
        if current.page != page {
            self.select_layer(page, index);
            return;
        }
        if current.layer == index {
            if self.layer(current).is_some_and(|l| l.kind() != LayerKind::Tmp) {
                self.deselect();
            }
            return;
        }
        if self.layer(LayerPath::new(page, index)).is_some_and(Layer::is_locked) {
            debug!(page, index, "locked layer skipped in multi-select");
            return;
        }
        let Some(target_id) = self.layer(LayerPath::new(page, index)).map(Layer::id) else {
            return;
        };
        let mut ids = Vec::new();
        match self.layer(current) {
            Some(Layer::Tmp(tmp)) => ids.extend(tmp.layers.iter().map(Layer::id)),
            Some(layer) => ids.push(layer.id()),
            None => {}
        }
        ids.push(target_id);
        self.select_ids(page, &ids);
    }

    /// Shift-click on a member of the multi-selection: drop it and keep the
    /// rest selected.
    pub fn drop_from_multi_select(&mut self, sub: usize) {
        let Some(path) = self.selected_path() else {
            return;
        };
        let Some(Layer::Tmp(tmp)) = self.layer(path) else {
            return;
        };
        let ids: Vec<LayerId> = tmp
            .layers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != sub)
            .map(|(_, l)| l.id())
            .collect();
        debug!(page = path.page, sub, remaining = ids.len(), "member left multi-selection");
        self.select_ids(path.page, &ids);
    }

    /// Select layers by id on one page. Ids not found directly on the page
    /// are skipped.
    pub fn select_ids(&mut self, page_index: usize, ids: &[LayerId]) {
        self.deselect();
        let Some(page) = self.page(page_index) else {
            return;
        };
        let indices: Vec<usize> = ids.iter().filter_map(|id| page.index_of(*id)).collect();
        self.select_many(page_index, &indices);
    }

    /// Select several page-level layers, wrapping them in a `Tmp` when there
    /// are at least two.
    pub fn select_many(&mut self, page_index: usize, indices: &[usize]) {
        let mut indices: Vec<usize> = indices.to_vec();
        indices.sort_unstable();
        indices.dedup();
        match indices.as_slice() {
            [] => self.deselect(),
            [single] => self.select_layer(page_index, *single),
            _ => {
                let Some(page) = self.page(page_index) else {
                    return;
                };
                if indices.iter().any(|&i| i >= page.layers.len()) {
                    warn!(page = page_index, ?indices, "select_many: index out of range");
                    return;
                }
                if self.selected_path().is_some() {
                    let ids: Vec<_> = indices.iter().map(|&i| page.layers[i].id()).collect();
                    self.select_ids(page_index, &ids);
                    return;
                }
                let Some(page) = self.page_mut(page_index) else {
                    return;
                };
                let insert_at = indices[0];
                let mut wrapped = Vec::with_capacity(indices.len());
                for &i in indices.iter().rev() {
                    wrapped.push(page.layers.remove(i));
                }
                wrapped.reverse();
                let mut tmp = GroupLayer::wrap(wrapped);
                tmp.flags.active = true;
                page.layers.insert(insert_at, Layer::Tmp(tmp));
                zindex::reassign_zindex(page);
                let types = self.kinds_of(LayerPath::new(page_index, insert_at));
                self.selected = SelectedInfo { page_index, index: Some(insert_at), types };
                debug!(page = page_index, count = indices.len(), "multi-selection wrapped");
            }
        }
    }

    /// Activate a child of the selected group or frame.
    pub fn sub_select(&mut self, sub: usize) {
        let Some(path) = self.selected_path() else {
            warn!(sub, "sub_select without a primary selection");
            return;
        };
        let child_path = LayerPath { sub: Some(sub), ..path };
        let Some(kind) = self.layer(child_path).map(Layer::kind) else {
            warn!(?child_path, "sub_select: no such child");
            return;
        };
        self.clear_sub_selection();
        self.update_layer_flags(child_path, |f| f.active = true);
        self.sub_selected = SubSelectedInfo { index: Some(sub), kind: Some(kind) };
    }

    pub fn clear_sub_selection(&mut self) {
        if let (Some(path), Some(sub)) = (self.selected_path(), self.sub_selected.index) {
            self.update_layer_flags(LayerPath { sub: Some(sub), ..path }, |f| {
                f.active = false;
                f.shown = false;
                f.editing = false;
            });
        }
        self.sub_selected = SubSelectedInfo::default();
    }

    /// Turn the multi-selection into a persisted group.
    pub fn group_selection(&mut self) -> bool {
        let Some(path) = self.selected_path() else {
            return false;
        };
        let Some(Layer::Tmp(tmp)) = self.layer(path).cloned() else {
            debug!("group_selection: selection is not a multi-selection");
            return false;
        };
        self.replace_layer(path, Layer::Group(tmp));
        self.selected.types = BTreeSet::from([LayerKind::Group]);
        if let Some(page) = self.page_mut(path.page) {
            zindex::reassign_zindex(page);
        }
        self.collab.steps.record();
        true
    }

    /// Turn the selected group into a multi-selection of its children.
    pub fn ungroup(&mut self) -> bool {
        let Some(path) = self.selected_path() else {
            return false;
        };
        let Some(Layer::Group(group)) = self.layer(path).cloned() else {
            debug!("ungroup: selection is not a group");
            return false;
        };
        self.clear_sub_selection();
        self.replace_layer(path, Layer::Tmp(group));
        self.selected.types = self.kinds_of(path);
        if let Some(page) = self.page_mut(path.page) {
            zindex::reassign_zindex(page);
        }
        self.collab.steps.record();
        true
    }

    /// Replace a `Tmp` with its children at the same stacking position.
    pub fn dissolve_tmp(&mut self, page_index: usize, index: usize) -> usize {
        let Some(page) = self.page_mut(page_index) else {
            return 0;
        };
        if !matches!(page.layers.get(index), Some(Layer::Tmp(_))) {
            return 0;
        }
        let Layer::Tmp(tmp) = page.layers.remove(index) else {
            return 0;
        };
        let children = tmp.unwrap_children();
        let count = children.len();
        for (offset, mut child) in children.into_iter().enumerate() {
            let flags = child.flags_mut();
            flags.active = false;
            flags.shown = false;
            page.layers.insert(index + offset, child);
        }
        zindex::reassign_zindex(page);
        if self.selected.page_index == page_index && self.selected.index == Some(index) {
            self.selected.index = None;
            self.selected.types.clear();
        }
        count
    }

    // --- Control-state token ---

    #[must_use]
    pub fn next_controller_id(&mut self) -> ControllerId {
        let id = self.next_controller;
        self.next_controller += 1;
        id
    }

    /// Claim the pointer lifecycle for controller `id`. Fails while another
    /// controller (or a pinch) owns it.
    pub fn claim_control(&mut self, kind: ControlKind, id: ControllerId, layer: LayerPath) -> bool {
        match self.control.kind {
            ControlKind::None => {
                self.control = ControlState { kind, id: Some(id), layer: Some(layer) };
                true
            }
            _ if self.control.id == Some(id) => {
                self.control.kind = kind;
                self.control.layer = Some(layer);
                true
            }
            _ => {
                debug!(owner = ?self.control.id, requested = id, "control already owned");
                false
            }
        }
    }

    /// Release the token if `id` holds it.
    pub fn release_control(&mut self, id: ControllerId) {
        if self.control.id == Some(id) {
            self.control = ControlState::default();
        }
    }

    /// A pinch gesture takes the token from whoever holds it.
    pub fn begin_pinch(&mut self) {
        debug!(owner = ?self.control.id, "pinch started");
        self.control = ControlState { kind: ControlKind::Pinch, id: None, layer: None };
    }

    pub fn end_pinch(&mut self) {
        if self.is_pinching() {
            self.control = ControlState::default();
        }
    }

    // --- Copied format ---

    pub fn set_copied_format(&mut self, format: CopiedFormat) {
        self.copied_format = Some(format);
    }

    #[must_use]
    pub fn copied_format(&self) -> Option<&CopiedFormat> {
        self.copied_format.as_ref()
    }

    /// Paste the pending copied format onto `path` and clear it. The clipboard
    /// is consumed even when the format does not fit the layer kind.
    pub fn apply_copied_format(&mut self, path: LayerPath) -> bool {
        let Some(format) = self.copied_format.take() else {
            return false;
        };
        let applied = match (self.layer_mut(path), format) {
            (Some(Layer::Text(text)), CopiedFormat::Text(f)) => {
                text.format = f;
                true
            }
            (Some(Layer::Image(image)), CopiedFormat::Image(f)) => {
                image.format = f;
                true
            }
            _ => false,
        };
        if applied {
            debug!(?path, "copied format applied");
            self.collab.steps.record();
        }
        applied
    }

    // --- Text editing ---

    /// Caret for a click at `screen` on the layer (or child) at `path`.
    #[must_use]
    pub fn caret_at(&self, path: LayerPath, screen: Point) -> Caret {
        let page_pt = self.viewport(path.page).screen_to_page(screen);
        let parent_pt = match path.sub {
            Some(_) => match self.layer(path.primary()) {
                Some(parent) => hit::to_local(parent.styles(), page_pt),
                None => return Caret::End,
            },
            None => page_pt,
        };
        match self.layer(path) {
            Some(layer) => Caret::At(hit::to_local(layer.styles(), parent_pt)),
            None => Caret::End,
        }
    }

    /// Put a text layer (or text child) into edit mode and hand it to the
    /// text editor.
    pub fn begin_text_edit(&mut self, path: LayerPath, caret: Caret) -> bool {
        if !matches!(self.layer(path), Some(Layer::Text(_))) {
            return false;
        }
        self.update_layer_flags(path, |f| f.editing = true);
        let target = TextTarget { page_index: path.page, layer_index: path.layer, sub_index: path.sub };
        self.collab.text.focus(target, caret);
        debug!(?path, "text edit started");
        true
    }

    /// Enter edit mode with the whole text selected.
    pub fn select_all_text(&mut self, path: LayerPath) -> bool {
        if !matches!(self.layer(path), Some(Layer::Text(_))) {
            return false;
        }
        self.update_layer_flags(path, |f| f.editing = true);
        let target = TextTarget { page_index: path.page, layer_index: path.layer, sub_index: path.sub };
        self.collab.text.select_all(target);
        debug!(?path, "text edit started with full selection");
        true
    }

    // --- Collaborators ---

    pub fn emit(&mut self, event: BusEvent) {
        self.collab.bus.emit(event);
    }

    pub fn record_step(&mut self) {
        self.collab.steps.record();
    }

    fn kinds_of(&self, path: LayerPath) -> BTreeSet<LayerKind> {
        match self.layer(path) {
            Some(Layer::Tmp(tmp)) => tmp.layers.iter().map(Layer::kind).collect(),
            Some(layer) => BTreeSet::from([layer.kind()]),
            None => BTreeSet::new(),
        }
    }
}

fn dissolve_all_tmp(page: &mut Page) {
    let mut i = 0;
    while i < page.layers.len() {
        if matches!(page.layers[i], Layer::Tmp(_)) {
            if let Layer::Tmp(tmp) = page.layers.remove(i) {
                for (offset, child) in tmp.unwrap_children().into_iter().enumerate() {
                    page.layers.insert(i + offset, child);
                }
            }
        } else {
            i += 1;
        }
    }
    zindex::reassign_zindex(page);
}
