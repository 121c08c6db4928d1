//! The seam between a live page and whatever draws it.

use mediation_core::{Composable, Density, Layout, Modifier, Page, fold_modifiers};
use mediation_fill::{ContentValue, FillableState};
use std::io::{self, Write};

/// Draws a page with the content store's current values.
///
/// Called once after the initial load and again after every successful
/// reload or content change.
pub trait Renderer {
    fn render(&mut self, page: &Page, density: Density, content: &FillableState);
}

/// Writes an indented text outline of the page, one node per line, with the
/// content each fillable node would show.
///
/// ```text
/// Column [padding background]
///   Text title = "Bonjour"
///   Image hero -> /assets/hero.png
/// ```
#[derive(Debug)]
pub struct OutlineRenderer<W: Write> {
    out: W,
}

impl<W: Write> OutlineRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_page(&mut self, page: &Page, density: Density, content: &FillableState) -> io::Result<()> {
        writeln!(
            self.out,
            "{}{}",
            page.root.variant_name(),
            modifier_summary(page.root.modifiers(), density)
        )?;
        let mut lines = Vec::new();
        page.walk(|node, depth| lines.push(outline_line(node, depth, density, content)));
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

impl<W: Write> Renderer for OutlineRenderer<W> {
    fn render(&mut self, page: &Page, density: Density, content: &FillableState) {
        if let Err(e) = self.write_page(page, density, content) {
            log::warn!("outline render failed: {e}");
        }
    }
}

fn outline_line(node: &Composable, depth: usize, density: Density, content: &FillableState) -> String {
    let indent = "  ".repeat(depth);
    let mods = modifier_summary(node.modifiers(), density);
    match node {
        Composable::Text(text) => {
            let shown = content
                .value(&text.tag)
                .filter(|value| **value != ContentValue::Null)
                .map_or_else(|| text.text.clone(), ToString::to_string);
            format!("{indent}Text {}{mods} = {shown:?}", text.tag)
        }
        Composable::RichText(rich) => {
            let html = content.get_str(&rich.tag).unwrap_or_default();
            format!("{indent}RichText {}{mods} = {html:?}", rich.tag)
        }
        Composable::Image(image) => {
            let source = match content.get_image(&image.tag) {
                Some(export) if image.use_base64 && export.has_payload() => "<base64>",
                _ => content.image_path(&image.tag).unwrap_or("<none>"),
            };
            format!("{indent}Image {}{mods} -> {source}", image.tag)
        }
        Composable::Layout(layout) => format!("{indent}{}{mods}", layout_label(layout)),
    }
}

fn layout_label(layout: &Layout) -> String {
    match layout {
        Layout::Box(b) => format!("Box({:?})", b.content_alignment),
        Layout::Column(c) => format!("Column({:?})", c.horizontal_alignment),
        Layout::Row(r) => format!("Row({:?})", r.vertical_alignment),
    }
}

/// `[key key ...]` plus the combined opacity and final size when the
/// modifiers set them.
fn modifier_summary(modifiers: &[Modifier], density: Density) -> String {
    if modifiers.is_empty() {
        return String::new();
    }
    let keys: Vec<&str> = modifiers.iter().map(Modifier::key).collect();
    let mut summary = format!(" [{}]", keys.join(" "));

    let alpha = fold_modifiers(modifiers, 1.0_f32, |acc, m| match m {
        Modifier::Alpha { value } => acc * value,
        _ => acc,
    });
    if alpha != 1.0 {
        summary.push_str(&format!(" alpha={alpha}"));
    }

    let size = fold_modifiers(modifiers, None, |acc, m| match m {
        Modifier::Size(size) => Some(*size),
        _ => acc,
    });
    if let Some(size) = size {
        let dim = |l: mediation_core::Length| {
            l.to_units(density).map_or_else(|| "?".to_string(), |v| v.to_string())
        };
        summary.push_str(&format!(" size={}x{}", dim(size.width), dim(size.height)));
    }
    summary
}
