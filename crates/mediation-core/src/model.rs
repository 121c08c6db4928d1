//! Document model for mediation pages.
//!
//! A [`Page`] is an immutable tree: one root [`Layout`], composables below
//! it, and on every node an ordered list of [`Modifier`]s. Ownership is
//! strictly hierarchical, so the tree is finite and acyclic by construction.
//! A reload builds a new `Page`; nothing here is mutated in place.

use crate::value::{Color, Length, Shape, TextSize};
use serde::Serialize;
use smallvec::SmallVec;

/// Modifiers in application order. Later entries wrap earlier ones.
pub type Modifiers = SmallVec<[Modifier; 2]>;

/// Prefix of tags generated for Text nodes that declare none.
pub const GENERATED_TAG_PREFIX: &str = "TextComposable_";

// ─── Modifier payloads ───────────────────────────────────────────────────

/// Scale factors. Missing components default to 1 (identity).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
}

impl Scale {
    pub const IDENTITY: Self = Self::uniform(1.0);

    pub const fn uniform(v: f32) -> Self {
        Self { x: v, y: v }
    }
}

/// Per-side padding. Missing sides default to `0.dp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Padding {
    pub left: Length,
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
}

impl Padding {
    pub const ZERO: Self = Self::uniform(Length::ZERO);

    pub const fn uniform(v: Length) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }
}

/// Explicit dimensions. Missing dimensions stay unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: Length,
    pub height: Length,
}

impl Size {
    pub const UNSPECIFIED: Self = Self::uniform(Length::UNSPECIFIED);

    pub const fn uniform(v: Length) -> Self {
        Self {
            width: v,
            height: v,
        }
    }
}

// ─── Modifier ────────────────────────────────────────────────────────────

/// A visual transformation attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Modifier {
    FillMaxWidth { fraction: f32 },
    FillMaxHeight { fraction: f32 },
    FillMaxSize { fraction: f32 },
    Rotate { degrees: f32 },
    Scale(Scale),
    /// Opacity. Not clamped: values outside [0, 1] pass through.
    Alpha { value: f32 },
    Padding(Padding),
    Size(Size),
    Background { color: Color, shape: Shape },
    Clip { shape: Shape },
    Border { color: Color, width: Length, shape: Shape },
    DropShadow {
        radius: Length,
        spread: Length,
        opacity: f32,
        color: Color,
    },
}

impl Modifier {
    /// The source key that selects this variant.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FillMaxWidth { .. } => "fill-max-width",
            Self::FillMaxHeight { .. } => "fill-max-height",
            Self::FillMaxSize { .. } => "fill-max-size",
            Self::Rotate { .. } => "rotate",
            Self::Scale(_) => "scale",
            Self::Alpha { .. } => "alpha",
            Self::Padding(_) => "padding",
            Self::Size(_) => "size",
            Self::Background { .. } => "background",
            Self::Clip { .. } => "clip",
            Self::Border { .. } => "border",
            Self::DropShadow { .. } => "drop-shadow",
        }
    }
}

/// Apply `modifiers` left-to-right, threading the accumulated result through
/// `apply`. Render collaborators use this to wrap a node the same way the
/// source lists it.
pub fn fold_modifiers<B>(modifiers: &[Modifier], init: B, apply: impl FnMut(B, &Modifier) -> B) -> B {
    modifiers.iter().fold(init, apply)
}

// ─── Layout attributes ───────────────────────────────────────────────────

/// Position of children inside a Box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ContentAlignment {
    #[default]
    TopStart,
    TopCenter,
    CenterStart,
    Center,
    CenterEnd,
    BottomStart,
    BottomCenter,
    BottomEnd,
}

impl ContentAlignment {
    pub const NAMES: &'static [&'static str] = &[
        "TopStart",
        "TopCenter",
        "CenterStart",
        "Center",
        "CenterEnd",
        "BottomStart",
        "BottomCenter",
        "BottomEnd",
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "TopStart" => Self::TopStart,
            "TopCenter" => Self::TopCenter,
            "CenterStart" => Self::CenterStart,
            "Center" => Self::Center,
            "CenterEnd" => Self::CenterEnd,
            "BottomStart" => Self::BottomStart,
            "BottomCenter" => Self::BottomCenter,
            "BottomEnd" => Self::BottomEnd,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HorizontalAlignment {
    #[default]
    Start,
    Center,
    End,
}

impl HorizontalAlignment {
    pub const NAMES: &'static [&'static str] = &["Start", "Center", "End"];

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Start" => Self::Start,
            "Center" => Self::Center,
            "End" => Self::End,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
}

impl VerticalAlignment {
    pub const NAMES: &'static [&'static str] = &["Top", "Center", "Bottom"];

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Top" => Self::Top,
            "Center" => Self::Center,
            "Bottom" => Self::Bottom,
            _ => return None,
        })
    }
}

/// Spacing and alignment of a Column's children along its main axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VerticalArrangement {
    pub space: Length,
    pub align: VerticalAlignment,
}

impl Default for VerticalArrangement {
    fn default() -> Self {
        Self {
            space: Length::ZERO,
            align: VerticalAlignment::Top,
        }
    }
}

/// Spacing and alignment of a Row's children along its main axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizontalArrangement {
    pub space: Length,
    pub align: HorizontalAlignment,
}

impl Default for HorizontalArrangement {
    fn default() -> Self {
        Self {
            space: Length::ZERO,
            align: HorizontalAlignment::Start,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    Justify,
    End,
}

impl TextAlign {
    pub const NAMES: &'static [&'static str] = &["Start", "Center", "Justify", "End"];

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Start" => Self::Start,
            "Center" => Self::Center,
            "Justify" => Self::Justify,
            "End" => Self::End,
            _ => return None,
        })
    }
}

// ─── Fillable capability ─────────────────────────────────────────────────

/// What kind of value an editing widget stores under a fillable tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentKind {
    /// Plain string.
    PlainText,
    /// HTML markup rendered as rich text.
    Html,
    /// An image record (or a legacy bare path).
    Image,
}

/// A node whose displayed value comes from the content store.
///
/// Several nodes may share a tag; they then alias the same content entry.
pub trait Fillable: std::fmt::Debug {
    /// Stable key into the content store.
    fn tag(&self) -> &str;

    fn content_kind(&self) -> ContentKind;
}

// ─── Composables ─────────────────────────────────────────────────────────

/// Literal text. `text` is shown until the content store supplies a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextNode {
    pub tag: String,
    pub text: String,
    pub color: Color,
    pub font_size: TextSize,
    pub modifiers: Modifiers,
}

/// Rich text; its HTML comes from the content store at render time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichTextNode {
    pub tag: String,
    pub max_lines: u32,
    pub text_align: TextAlign,
    pub line_height: TextSize,
    pub soft_wrap: bool,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageNode {
    pub tag: String,
    /// Prefer the embedded base64 payload over the file path.
    pub use_base64: bool,
    pub modifiers: Modifiers,
}

impl Fillable for TextNode {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn content_kind(&self) -> ContentKind {
        ContentKind::PlainText
    }
}

impl Fillable for RichTextNode {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn content_kind(&self) -> ContentKind {
        ContentKind::Html
    }
}

impl Fillable for ImageNode {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn content_kind(&self) -> ContentKind {
        ContentKind::Image
    }
}

// ─── Layouts ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BoxLayout {
    pub content_alignment: ContentAlignment,
    pub modifiers: Modifiers,
    pub children: Vec<Composable>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ColumnLayout {
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_arrangement: VerticalArrangement,
    pub modifiers: Modifiers,
    pub children: Vec<Composable>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RowLayout {
    pub vertical_alignment: VerticalAlignment,
    pub horizontal_arrangement: HorizontalArrangement,
    pub modifiers: Modifiers,
    pub children: Vec<Composable>,
}

/// A container. A layout is itself a composable and owns its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Layout {
    Box(BoxLayout),
    Column(ColumnLayout),
    Row(RowLayout),
}

impl Layout {
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Box(_) => "Box",
            Self::Column(_) => "Column",
            Self::Row(_) => "Row",
        }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            Self::Box(l) => &l.modifiers,
            Self::Column(l) => &l.modifiers,
            Self::Row(l) => &l.modifiers,
        }
    }

    /// Children in document order.
    pub fn children(&self) -> &[Composable] {
        match self {
            Self::Box(l) => &l.children,
            Self::Column(l) => &l.children,
            Self::Row(l) => &l.children,
        }
    }
}

/// Anything that can appear in a `child` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Composable {
    Text(TextNode),
    RichText(RichTextNode),
    Image(ImageNode),
    Layout(Layout),
}

impl Composable {
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::RichText(_) => "RichText",
            Self::Image(_) => "Image",
            Self::Layout(layout) => layout.variant_name(),
        }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            Self::Text(n) => &n.modifiers,
            Self::RichText(n) => &n.modifiers,
            Self::Image(n) => &n.modifiers,
            Self::Layout(layout) => layout.modifiers(),
        }
    }

    /// The fillable view of this node, if it binds to the content store.
    pub fn as_fillable(&self) -> Option<&dyn Fillable> {
        match self {
            Self::Text(n) => Some(n),
            Self::RichText(n) => Some(n),
            Self::Image(n) => Some(n),
            Self::Layout(_) => None,
        }
    }

    pub fn children(&self) -> &[Composable] {
        match self {
            Self::Layout(layout) => layout.children(),
            _ => &[],
        }
    }
}

// ─── Page ────────────────────────────────────────────────────────────────

/// A decoded document. Replaced wholesale on reload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub root: Layout,
}

impl Page {
    pub fn new(root: Layout) -> Self {
        Self { root }
    }

    /// Visit every composable below the root in pre-order, with its depth
    /// (direct children of the root are at depth 1).
    pub fn walk(&self, mut visit: impl FnMut(&Composable, usize)) {
        fn walk_children(
            children: &[Composable],
            depth: usize,
            visit: &mut dyn FnMut(&Composable, usize),
        ) {
            for child in children {
                visit(child, depth);
                walk_children(child.children(), depth + 1, visit);
            }
        }
        walk_children(self.root.children(), 1, &mut visit);
    }

    /// Every fillable node in document order.
    pub fn fillable_nodes(&self) -> Vec<&dyn Fillable> {
        gather_fillable_nodes(self)
    }

    /// Fillable nodes bound to `tag` (several when the tag is shared).
    pub fn fillables_with_tag<'a>(&'a self, tag: &str) -> Vec<&'a dyn Fillable> {
        let mut found = gather_fillable_nodes(self);
        found.retain(|node| node.tag() == tag);
        found
    }
}

/// Collect the fillable nodes of `page` in pre-order, for building an edit
/// panel.
pub fn gather_fillable_nodes(page: &Page) -> Vec<&dyn Fillable> {
    fn collect<'a>(children: &'a [Composable], out: &mut Vec<&'a dyn Fillable>) {
        for child in children {
            if let Some(fillable) = child.as_fillable() {
                out.push(fillable);
            }
            collect(child.children(), out);
        }
    }

    let mut out = Vec::new();
    collect(page.root.children(), &mut out);
    out
}
