//! Document model: pages, layers, styles, and copy-on-write style patches.
//!
//! A `Design` owns `Page`s, a page owns its `Layer`s, and a `Group`, `Frame`
//! or `Tmp` layer owns its children. Children of a group are positioned in the
//! group's local, unscaled space with the origin at the group's top-left; the
//! group's own `width`/`height` is that local extent times its `scale`.
//!
//! Styles are never mutated through shared references. Every change goes
//! through [`Styles::patched`], which returns a fresh record, so a `Tmp`
//! wrapper and the layers it wraps can never alias the same style object.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{self, Point, Rect};

/// Unique identifier for a layer.
pub type LayerId = Uuid;

/// Discriminant of a [`Layer`], used for selection type sets and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Shape,
    Text,
    Image,
    Group,
    Frame,
    Tmp,
}

// =============================================================================
// STYLES
// =============================================================================

/// Geometry and appearance shared by every layer kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styles {
    /// Left edge of the unrotated box in parent coordinates.
    pub x: f64,
    /// Top edge of the unrotated box in parent coordinates.
    pub y: f64,
    /// Rendered width.
    pub width: f64,
    /// Rendered height.
    pub height: f64,
    /// Width at `scale == 1`.
    pub init_width: f64,
    /// Height at `scale == 1`.
    pub init_height: f64,
    pub scale: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Clockwise rotation in degrees around the box center.
    pub rotate: f64,
    /// Opacity in percent.
    pub opacity: f64,
    /// Render order, 1-based. Mirrors the layer's array position.
    pub zindex: i64,
    pub horizontal_flip: bool,
    pub vertical_flip: bool,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            init_width: 0.0,
            init_height: 0.0,
            scale: 1.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotate: 0.0,
            opacity: 100.0,
            zindex: 0,
            horizontal_flip: false,
            vertical_flip: false,
        }
    }
}

impl Styles {
    /// Build styles for an unrotated box whose init size equals its size.
    #[must_use]
    pub fn with_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, init_width: width, init_height: height, ..Self::default() }
    }

    /// The unrotated box.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Where the layer visually occupies space: the axis-aligned envelope of
    /// the rotated box.
    #[must_use]
    pub fn bounding(&self) -> Rect {
        geometry::bounding(&self.rect(), self.rotate)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        geometry::center(&self.rect())
    }

    /// Return a copy with every field present in `patch` overwritten.
    #[must_use]
    pub fn patched(&self, patch: &StylePatch) -> Styles {
        Styles {
            x: patch.x.unwrap_or(self.x),
            y: patch.y.unwrap_or(self.y),
            width: patch.width.unwrap_or(self.width),
            height: patch.height.unwrap_or(self.height),
            init_width: patch.init_width.unwrap_or(self.init_width),
            init_height: patch.init_height.unwrap_or(self.init_height),
            scale: patch.scale.unwrap_or(self.scale),
            scale_x: patch.scale_x.unwrap_or(self.scale_x),
            scale_y: patch.scale_y.unwrap_or(self.scale_y),
            rotate: patch.rotate.unwrap_or(self.rotate),
            opacity: patch.opacity.unwrap_or(self.opacity),
            zindex: patch.zindex.unwrap_or(self.zindex),
            horizontal_flip: patch.horizontal_flip.unwrap_or(self.horizontal_flip),
            vertical_flip: patch.vertical_flip.unwrap_or(self.vertical_flip),
        }
    }
}

/// Sparse update for [`Styles`]. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zindex: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_flip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_flip: Option<bool>,
}

impl StylePatch {
    /// Patch that only moves the layer.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    /// Patch that only resizes the layer.
    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Self::default() }
    }

    /// Patch that only rotates the layer.
    #[must_use]
    pub fn rotation(rotate: f64) -> Self {
        Self { rotate: Some(rotate), ..Self::default() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Interaction flags. Only `locked` survives serialization.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerFlags {
    #[serde(skip)]
    pub active: bool,
    #[serde(default)]
    pub locked: bool,
    /// Set while a drag is in progress; disables transitions in the renderer.
    #[serde(skip)]
    pub dragging: bool,
    /// Set once the current drag has actually moved the layer.
    #[serde(skip)]
    pub moved: bool,
    /// The layer's controller has been shown since it became active.
    #[serde(skip)]
    pub shown: bool,
    /// Text layer is in content-edit mode.
    #[serde(skip)]
    pub editing: bool,
}

// =============================================================================
// LAYER VARIANTS
// =============================================================================

/// Resize policy family of a vector shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeCategory {
    /// Fixed artwork; not resizable.
    A,
    /// Independent x/y stretch.
    B,
    /// Patch-diff shape: borders and caps keep their size while the body grows.
    C,
    /// Two-point line; sized by its endpoints.
    D,
    /// Basic geometric shape with independent x/y stretch.
    E,
    /// Patch-diff shape variant with its own artwork set.
    G,
}

/// Which axes of a patch-diff shape are adjustable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ScaleType {
    #[default]
    Both,
    WidthOnly,
    HeightOnly,
}

impl ScaleType {
    #[must_use]
    pub fn width_adjustable(self) -> bool {
        matches!(self, Self::Both | Self::WidthOnly)
    }

    #[must_use]
    pub fn height_adjustable(self) -> bool {
        matches!(self, Self::Both | Self::HeightOnly)
    }
}

impl TryFrom<u8> for ScaleType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Both),
            2 => Ok(Self::WidthOnly),
            3 => Ok(Self::HeightOnly),
            other => Err(format!("unknown scale type {other}")),
        }
    }
}

impl From<ScaleType> for u8 {
    fn from(value: ScaleType) -> Self {
        match value {
            ScaleType::Both => 1,
            ScaleType::WidthOnly => 2,
            ScaleType::HeightOnly => 3,
        }
    }
}

fn default_ratio() -> f64 {
    1.0
}

fn default_stroke() -> f64 {
    4.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeLayer {
    #[serde(default = "Uuid::new_v4")]
    pub id: LayerId,
    #[serde(default)]
    pub styles: Styles,
    #[serde(default)]
    pub flags: LayerFlags,
    pub category: ShapeCategory,
    /// Authored vector size.
    #[serde(default)]
    pub v_size: [f64; 2],
    /// Patch diff added to `v_size` on each axis.
    #[serde(default)]
    pub p_diff: [f64; 2],
    #[serde(default)]
    pub scale_type: ScaleType,
    /// Vector units per page unit.
    #[serde(default = "default_ratio")]
    pub ratio: f64,
    /// Line endpoints `[x1, y1, x2, y2]` in local unscaled units (category D).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<[f64; 4]>,
    /// Line thickness in local unscaled units.
    #[serde(default = "default_stroke")]
    pub stroke: f64,
    #[serde(default)]
    pub color: Vec<String>,
}

impl ShapeLayer {
    #[must_use]
    pub fn is_line(&self) -> bool {
        self.category == ShapeCategory::D && self.point.is_some()
    }
}

fn default_font() -> String {
    "sans-serif".to_owned()
}

fn default_font_size() -> f64 {
    24.0
}

fn default_text_color() -> String {
    "#000000".to_owned()
}

/// Character-level formatting that can be copied between text layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFormat {
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self {
            font: default_font(),
            font_size: default_font_size(),
            color: default_text_color(),
            bold: false,
            italic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    #[serde(default = "Uuid::new_v4")]
    pub id: LayerId,
    #[serde(default)]
    pub styles: Styles,
    #[serde(default)]
    pub flags: LayerFlags,
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub format: TextFormat,
}

/// Photo adjustments in percent, 0 is neutral.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageAdjust {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub blur: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: String,
    pub distance: f64,
    pub angle: f64,
    pub radius: f64,
}

/// Photo styling that can be copied between image layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageFormat {
    #[serde(default)]
    pub adjust: ImageAdjust,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLayer {
    #[serde(default = "Uuid::new_v4")]
    pub id: LayerId,
    #[serde(default)]
    pub styles: Styles,
    #[serde(default)]
    pub flags: LayerFlags,
    #[serde(default)]
    pub src: String,
    #[serde(flatten)]
    pub format: ImageFormat,
}

/// A persisted group, and also the shape of the ephemeral `Tmp` wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLayer {
    #[serde(default = "Uuid::new_v4")]
    pub id: LayerId,
    #[serde(default)]
    pub styles: Styles,
    #[serde(default)]
    pub flags: LayerFlags,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameLayer {
    #[serde(default = "Uuid::new_v4")]
    pub id: LayerId,
    #[serde(default)]
    pub styles: Styles,
    #[serde(default)]
    pub flags: LayerFlags,
    /// Image slots clipped by the frame; always `Layer::Image`.
    #[serde(default)]
    pub clips: Vec<Layer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoration: Option<ShapeLayer>,
}

/// A single visual element on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    Shape(ShapeLayer),
    Text(TextLayer),
    Image(ImageLayer),
    Group(GroupLayer),
    Frame(FrameLayer),
    Tmp(GroupLayer),
}

impl Layer {
    #[must_use]
    pub fn id(&self) -> LayerId {
        match self {
            Self::Shape(l) => l.id,
            Self::Text(l) => l.id,
            Self::Image(l) => l.id,
            Self::Group(l) | Self::Tmp(l) => l.id,
            Self::Frame(l) => l.id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Shape(_) => LayerKind::Shape,
            Self::Text(_) => LayerKind::Text,
            Self::Image(_) => LayerKind::Image,
            Self::Group(_) => LayerKind::Group,
            Self::Frame(_) => LayerKind::Frame,
            Self::Tmp(_) => LayerKind::Tmp,
        }
    }

    #[must_use]
    pub fn styles(&self) -> &Styles {
        match self {
            Self::Shape(l) => &l.styles,
            Self::Text(l) => &l.styles,
            Self::Image(l) => &l.styles,
            Self::Group(l) | Self::Tmp(l) => &l.styles,
            Self::Frame(l) => &l.styles,
        }
    }

    /// Replace the whole style record.
    pub fn set_styles(&mut self, styles: Styles) {
        match self {
            Self::Shape(l) => l.styles = styles,
            Self::Text(l) => l.styles = styles,
            Self::Image(l) => l.styles = styles,
            Self::Group(l) | Self::Tmp(l) => l.styles = styles,
            Self::Frame(l) => l.styles = styles,
        }
    }

    /// Apply a sparse patch, producing a new style record.
    pub fn patch_styles(&mut self, patch: &StylePatch) {
        let next = self.styles().patched(patch);
        self.set_styles(next);
    }

    #[must_use]
    pub fn flags(&self) -> &LayerFlags {
        match self {
            Self::Shape(l) => &l.flags,
            Self::Text(l) => &l.flags,
            Self::Image(l) => &l.flags,
            Self::Group(l) | Self::Tmp(l) => &l.flags,
            Self::Frame(l) => &l.flags,
        }
    }

    pub fn flags_mut(&mut self) -> &mut LayerFlags {
        match self {
            Self::Shape(l) => &mut l.flags,
            Self::Text(l) => &mut l.flags,
            Self::Image(l) => &mut l.flags,
            Self::Group(l) | Self::Tmp(l) => &mut l.flags,
            Self::Frame(l) => &mut l.flags,
        }
    }

    /// Sub-layers addressable by a sub-selection: group children or frame clips.
    #[must_use]
    pub fn children(&self) -> &[Layer] {
        match self {
            Self::Group(l) | Self::Tmp(l) => &l.layers,
            Self::Frame(l) => &l.clips,
            Self::Shape(_) | Self::Text(_) | Self::Image(_) => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Layer>> {
        match self {
            Self::Group(l) | Self::Tmp(l) => Some(&mut l.layers),
            Self::Frame(l) => Some(&mut l.clips),
            Self::Shape(_) | Self::Text(_) | Self::Image(_) => None,
        }
    }

    /// Rotated bounding box in parent coordinates.
    #[must_use]
    pub fn bounding(&self) -> Rect {
        self.styles().bounding()
    }

    #[must_use]
    pub fn is_line(&self) -> bool {
        matches!(self, Self::Shape(s) if s.is_line())
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.flags().locked
    }

    /// Deep copy with fresh ids on the layer and every descendant.
    #[must_use]
    pub fn duplicate(&self) -> Layer {
        let mut copy = self.clone();
        copy.renew_ids();
        *copy.flags_mut() = LayerFlags { locked: self.is_locked(), ..LayerFlags::default() };
        copy
    }

    fn renew_ids(&mut self) {
        match self {
            Self::Shape(l) => l.id = Uuid::new_v4(),
            Self::Text(l) => l.id = Uuid::new_v4(),
            Self::Image(l) => l.id = Uuid::new_v4(),
            Self::Group(l) | Self::Tmp(l) => l.id = Uuid::new_v4(),
            Self::Frame(l) => {
                l.id = Uuid::new_v4();
                if let Some(deco) = l.decoration.as_mut() {
                    deco.id = Uuid::new_v4();
                }
            }
        }
        if let Some(children) = self.children_mut() {
            for child in children {
                child.renew_ids();
            }
        }
    }
}

// =============================================================================
// GROUP BOUNDS
// =============================================================================

impl GroupLayer {
    /// Wrap page-level layers into a group whose box is the union of their
    /// rotated bounding boxes. Children are rebased to the group's origin.
    #[must_use]
    pub fn wrap(layers: Vec<Layer>) -> GroupLayer {
        let bounds = union_bounding(&layers).unwrap_or_default();
        let layers = layers
            .into_iter()
            .map(|mut layer| {
                let s = layer.styles();
                let patch = StylePatch::position(s.x - bounds.x, s.y - bounds.y);
                layer.patch_styles(&patch);
                layer
            })
            .collect();
        GroupLayer {
            id: Uuid::new_v4(),
            styles: Styles::with_rect(bounds.x, bounds.y, bounds.width, bounds.height),
            flags: LayerFlags::default(),
            layers,
        }
    }

    /// Dissolve the group, returning its children in the parent's space with
    /// the group's scale and rotation baked in.
    #[must_use]
    pub fn unwrap_children(self) -> Vec<Layer> {
        let group = self.styles;
        let origin = group.center();
        let s = group.scale;
        self.layers
            .into_iter()
            .map(|mut child| {
                let c = child.styles().clone();
                let local_center = c.center();
                let unrotated = Point::new(group.x + local_center.x * s, group.y + local_center.y * s);
                let page_center = geometry::rotated_point(group.rotate, origin, unrotated);
                let width = c.width * s;
                let height = c.height * s;
                let patch = StylePatch {
                    x: Some(page_center.x - width / 2.0),
                    y: Some(page_center.y - height / 2.0),
                    width: Some(width),
                    height: Some(height),
                    scale: Some(c.scale * s),
                    rotate: Some(geometry::normalize_degrees(c.rotate + group.rotate)),
                    ..StylePatch::default()
                };
                child.patch_styles(&patch);
                child
            })
            .collect()
    }

    /// Refit the group box to its children after they moved inside it.
    ///
    /// Children are shifted so their union starts at the local origin and the
    /// group is moved so nothing changes position on the page.
    pub fn recalc_bounds(&mut self) {
        let Some(u) = union_bounding(&self.layers) else {
            return;
        };
        let group = self.styles.clone();
        let s = group.scale;
        let local_center = Point::new((u.x + u.width / 2.0) * s, (u.y + u.height / 2.0) * s);
        let page_center = geometry::rotated_point(
            group.rotate,
            group.center(),
            Point::new(group.x + local_center.x, group.y + local_center.y),
        );
        let width = u.width * s;
        let height = u.height * s;
        for child in &mut self.layers {
            let c = child.styles();
            let patch = StylePatch::position(c.x - u.x, c.y - u.y);
            child.patch_styles(&patch);
        }
        self.styles = group.patched(&StylePatch {
            x: Some(page_center.x - width / 2.0),
            y: Some(page_center.y - height / 2.0),
            width: Some(width),
            height: Some(height),
            init_width: Some(u.width),
            init_height: Some(u.height),
            ..StylePatch::default()
        });
    }
}

/// Union of the rotated bounding boxes of `layers`, `None` when empty.
#[must_use]
pub fn union_bounding(layers: &[Layer]) -> Option<Rect> {
    layers
        .iter()
        .map(Layer::bounding)
        .reduce(|acc, r| acc.union(&r))
}

// =============================================================================
// PAGE / DESIGN
// =============================================================================

fn default_background_color() -> String {
    "#ffffff".to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub src: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    #[serde(default = "default_background_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<BackgroundImage>,
}

impl Default for Background {
    fn default() -> Self {
        Self { color: default_background_color(), image: None }
    }
}

/// User-placed guide positions in page units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Guidelines {
    #[serde(default)]
    pub v: Vec<f64>,
    #[serde(default)]
    pub h: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub guidelines: Guidelines,
}

impl Page {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            width,
            height,
            background: Background::default(),
            layers: Vec::new(),
            guidelines: Guidelines::default(),
        }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Index of the layer with `id`, if it sits directly on this page.
    #[must_use]
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id() == id)
    }
}

/// A whole design: an ordered list of pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Design {
    #[serde(default)]
    pub pages: Vec<Page>,
}
