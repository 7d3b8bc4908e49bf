//! Selection of children inside the active group or frame.
//!
//! A press on a child of the selected group is owned by the parent's
//! [`crate::moving::MoveController`]: dragging moves the whole group, and only
//! a click lands here to activate the child.

#[cfg(test)]
#[path = "sub_controller_test.rs"]
mod sub_controller_test;

use tracing::{debug, warn};

use crate::collab::{BusEvent, Caret, PanelTab};
use crate::doc::{Layer, LayerKind};
use crate::store::{Editor, LayerPath};

/// What a click on a child resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubClick {
    /// Path of the child after any selection change.
    pub path: LayerPath,
    /// The child entered text edit mode.
    pub editing: bool,
}

/// Click on a child of a group or frame.
///
/// Selects the parent if needed and activates the child. A second click on a
/// text child that already showed its controller enters edit mode; on an
/// image child it opens the crop panel. `caret` places the cursor when text
/// editing starts.
pub fn click_sub_layer(editor: &mut Editor, path: LayerPath, caret: Caret) -> Option<SubClick> {
    let sub = path.sub?;
    let Some(parent_id) = editor.layer(path.primary()).map(Layer::id) else {
        warn!(?path, "click_sub_layer: no such parent");
        return None;
    };
    let Some(child) = editor.layer(path) else {
        warn!(?path, "click_sub_layer: no such child");
        return None;
    };
    let kind = child.kind();
    let already_shown = editor.sub_selected().index == Some(sub) && child.flags().shown;

    if editor.selected_path() != Some(path.primary()) {
        editor.select_layer(path.page, path.layer);
    }
    let layer = editor.page(path.page)?.index_of(parent_id)?;
    let path = LayerPath { layer, ..path };
    if editor.sub_selected().index != Some(sub) {
        editor.sub_select(sub);
    }

    let mut editing = false;
    match (kind, already_shown) {
        (LayerKind::Text, true) => editing = editor.begin_text_edit(path, caret),
        (LayerKind::Image, true) => editor.emit(BusEvent::SwitchPanel { tab: PanelTab::Crop }),
        _ => {
            if let Some(tab) = PanelTab::for_kind(kind) {
                editor.emit(BusEvent::SwitchPanel { tab });
            }
        }
    }
    editor.update_layer_flags(path, |f| f.shown = true);
    debug!(?path, ?kind, editing, "sub-layer clicked");
    Some(SubClick { path, editing })
}

/// Leave the current sub-selection, keeping the parent selected.
pub fn exit_sub_selection(editor: &mut Editor) {
    if editor.sub_selected().index.is_some() {
        editor.clear_sub_selection();
        debug!("sub-selection cleared");
    }
}
