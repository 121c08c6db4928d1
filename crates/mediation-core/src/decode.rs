//! YAML → [`Page`] decoder.
//!
//! The source text is first parsed into a generic `serde_yaml::Value` tree and
//! then walked by a recursive-descent pass that builds the model. Composables
//! and layouts pick their variant from the YAML tag (`!Column`) or a `type`
//! key. Modifiers carry no discriminator: their variant is found by sniffing
//! the keys of the node against [`MODIFIER_RULES`], first match wins.
//!
//! Any failure aborts the whole document with a [`DecodeError`] carrying the
//! path of the offending node. No partial page is ever returned.

use crate::error::{DecodeError, DecodeErrorKind, NodePath};
use crate::model::*;
use crate::value::{Color, CornerRadii, Length, Shape, TextSize};
use serde_yaml::{Mapping, Value};

/// Decoder options, built once and handed to [`Decoder::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Reject unknown keys on page, layout and composable maps.
    pub strict_fields: bool,
    /// Apply YAML `<<` merge keys before decoding.
    pub merge_keys: bool,
}

impl Default for DecodeConfig {
    /// Lenient: unknown keys are ignored, merge keys are honoured.
    fn default() -> Self {
        Self {
            strict_fields: false,
            merge_keys: true,
        }
    }
}

/// Turns source documents into [`Page`]s.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecodeConfig,
}

impl Decoder {
    pub fn new(config: DecodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Parse YAML text and decode it.
    #[must_use = "decoding result should be used"]
    pub fn decode_str(&self, input: &str) -> Result<Page, DecodeError> {
        let mut value: Value = serde_yaml::from_str(input)?;
        if self.config.merge_keys {
            value.apply_merge()?;
        }
        self.decode_value(&value)
    }

    /// Decode an already-parsed YAML tree.
    pub fn decode_value(&self, value: &Value) -> Result<Page, DecodeError> {
        let mut cx = DecodeContext {
            config: &self.config,
            text_tags: 0,
        };
        cx.page(value, &NodePath::root())
    }
}

/// Decode `input` with the default configuration.
#[must_use = "decoding result should be used"]
pub fn decode_page(input: &str) -> Result<Page, DecodeError> {
    Decoder::default().decode_str(input)
}

// ─── Generic node helpers ────────────────────────────────────────────────

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "map",
        Value::Tagged(_) => "tagged value",
    }
}

/// Strip YAML tags that carry no meaning at this position.
fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// Text of a scalar node. Numbers and booleans are rendered back to text so
/// that `padding: 8` and `padding: "8"` read the same.
fn scalar_text(value: &Value) -> Option<String> {
    match untag(value) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn expect_map<'a>(value: &'a Value, path: &NodePath) -> Result<&'a Mapping, DecodeError> {
    match untag(value) {
        Value::Mapping(map) => Ok(map),
        other => Err(DecodeError::at(
            path,
            DecodeErrorKind::ExpectedMap {
                found: kind_name(other),
            },
        )),
    }
}

fn expect_scalar(value: &Value, path: &NodePath) -> Result<String, DecodeError> {
    scalar_text(value).ok_or_else(|| {
        DecodeError::at(
            path,
            DecodeErrorKind::ExpectedScalar {
                found: kind_name(untag(value)),
            },
        )
    })
}

/// Read-only view of a map node with its location.
struct Fields<'a> {
    map: Option<&'a Mapping>,
    path: NodePath,
}

impl<'a> Fields<'a> {
    /// A map node, or `null` standing for an empty map.
    fn of(value: &'a Value, path: &NodePath) -> Result<Self, DecodeError> {
        let map = match untag(value) {
            Value::Null => None,
            _ => Some(expect_map(value, path)?),
        };
        Ok(Self {
            map,
            path: path.clone(),
        })
    }

    /// Value under `key`. An explicit `null` counts as absent.
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map?
            .get(key)
            .filter(|value| !matches!(untag(value), Value::Null))
    }

    fn contains(&self, key: &str) -> bool {
        self.map.is_some_and(|map| map.contains_key(key))
    }

    fn at(&self, key: &str) -> NodePath {
        self.path.key(key)
    }

    fn keys(&self) -> Vec<String> {
        let Some(map) = self.map else {
            return Vec::new();
        };
        map.keys()
            .map(|key| scalar_text(key).unwrap_or_else(|| kind_name(key).to_string()))
            .collect()
    }

    /// With `strict`, fail on the first key outside `known` (`type` is always
    /// allowed since it may carry the variant name).
    fn check_known(&self, known: &[&str], strict: bool) -> Result<(), DecodeError> {
        if !strict {
            return Ok(());
        }
        for key in self.keys() {
            if key != "type" && !known.contains(&key.as_str()) {
                return Err(DecodeError::at(
                    &self.path,
                    DecodeErrorKind::UnknownField(key),
                ));
            }
        }
        Ok(())
    }
}

// ─── Leaf readers ────────────────────────────────────────────────────────

fn read_f32(value: &Value, path: &NodePath) -> Result<f32, DecodeError> {
    match untag(value) {
        Value::Number(n) => n
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| DecodeError::at(path, DecodeErrorKind::InvalidNumber(n.to_string()))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| DecodeError::at(path, DecodeErrorKind::InvalidNumber(s.clone()))),
        other => Err(DecodeError::at(
            path,
            DecodeErrorKind::ExpectedScalar {
                found: kind_name(other),
            },
        )),
    }
}

fn read_u8(value: &Value, path: &NodePath) -> Result<u8, DecodeError> {
    let text = expect_scalar(value, path)?;
    text.trim()
        .parse()
        .map_err(|_| DecodeError::at(path, DecodeErrorKind::InvalidNumber(text)))
}

fn read_u32(value: &Value, path: &NodePath) -> Result<u32, DecodeError> {
    let text = expect_scalar(value, path)?;
    text.trim()
        .parse()
        .map_err(|_| DecodeError::at(path, DecodeErrorKind::InvalidNumber(text)))
}

fn read_bool(value: &Value, path: &NodePath) -> Result<bool, DecodeError> {
    match untag(value) {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(DecodeError::at(
            path,
            DecodeErrorKind::InvalidBoolean(
                scalar_text(other).unwrap_or_else(|| kind_name(other).to_string()),
            ),
        )),
    }
}

fn read_length(value: &Value, path: &NodePath) -> Result<Length, DecodeError> {
    let text = expect_scalar(value, path)?;
    Length::parse(&text).map_err(|e| DecodeError::at(path, e))
}

fn read_text_size(value: &Value, path: &NodePath) -> Result<TextSize, DecodeError> {
    let text = expect_scalar(value, path)?;
    TextSize::parse(&text).map_err(|e| DecodeError::at(path, e))
}

fn read_string(value: &Value, path: &NodePath) -> Result<String, DecodeError> {
    expect_scalar(value, path)
}

fn read_enum<T>(
    value: &Value,
    path: &NodePath,
    family: &'static str,
    expected: &'static [&'static str],
    from_name: fn(&str) -> Option<T>,
) -> Result<T, DecodeError> {
    let text = expect_scalar(value, path)?;
    from_name(text.trim()).ok_or_else(|| {
        DecodeError::at(
            path,
            DecodeErrorKind::UnknownEnumValue {
                family,
                value: text,
                expected,
            },
        )
    })
}

/// Optional field with a default.
fn field_or<T>(
    fields: &Fields<'_>,
    key: &str,
    default: T,
    read: impl FnOnce(&Value, &NodePath) -> Result<T, DecodeError>,
) -> Result<T, DecodeError> {
    match fields.get(key) {
        Some(value) => read(value, &fields.at(key)),
        None => Ok(default),
    }
}

/// Scalar color literal, or a map of integer `r`, `g`, `b` (default 0) and
/// `a` (default 255).
fn read_color(value: &Value, path: &NodePath) -> Result<Color, DecodeError> {
    match untag(value) {
        Value::Mapping(_) => {
            let fields = Fields::of(value, path)?;
            Ok(Color::rgba(
                field_or(&fields, "r", 0, read_u8)?,
                field_or(&fields, "g", 0, read_u8)?,
                field_or(&fields, "b", 0, read_u8)?,
                field_or(&fields, "a", 255, read_u8)?,
            ))
        }
        other => match scalar_text(other) {
            Some(text) => Color::parse(&text).map_err(|e| DecodeError::at(path, e)),
            None => Err(DecodeError::at(
                path,
                DecodeErrorKind::ExpectedScalarOrMap {
                    found: kind_name(other),
                },
            )),
        },
    }
}

/// Scalar shape literal, or a map dispatching on `type`. A map without a
/// recognised `type` is a rounded rectangle.
fn read_shape(value: &Value, path: &NodePath) -> Result<Shape, DecodeError> {
    let fields = match untag(value) {
        Value::Mapping(_) => Fields::of(value, path)?,
        other => {
            return match scalar_text(other) {
                Some(text) => Shape::parse(&text).map_err(|e| DecodeError::at(path, e)),
                None => Err(DecodeError::at(
                    path,
                    DecodeErrorKind::ExpectedScalarOrMap {
                        found: kind_name(other),
                    },
                )),
            };
        }
    };

    let kind = fields.get("type").and_then(scalar_text).map(|t| t.to_ascii_lowercase());
    match kind.as_deref() {
        Some("rectangle") => Ok(Shape::Rectangle),
        Some("circle") => Ok(Shape::Circle),
        _ => read_rounded_corners(&fields).map(Shape::RoundedCorner),
    }
}

fn read_rounded_corners(fields: &Fields<'_>) -> Result<CornerRadii, DecodeError> {
    for key in ["radius", "r"] {
        if let Some(value) = fields.get(key) {
            return read_length(value, &fields.at(key)).map(CornerRadii::uniform);
        }
    }
    let zero = CornerRadii::ZERO;
    Ok(CornerRadii {
        top_left: field_or(fields, "topLeft", zero.top_left, read_length)?,
        top_right: field_or(fields, "topRight", zero.top_right, read_length)?,
        bottom_right: field_or(fields, "botRight", zero.bottom_right, read_length)?,
        bottom_left: field_or(fields, "botLeft", zero.bottom_left, read_length)?,
    })
}

// ─── Complex leaves ──────────────────────────────────────────────────────

/// The three literal shapes of padding, scale and size: a bare scalar, a map
/// with a uniform `v`, or a map of per-component keys.
enum Uniformity<'a> {
    Uniform(&'a Value, NodePath),
    PerComponent(Fields<'a>),
}

fn uniformity<'a>(value: &'a Value, path: &NodePath) -> Result<Uniformity<'a>, DecodeError> {
    if scalar_text(value).is_some() {
        return Ok(Uniformity::Uniform(value, path.clone()));
    }
    let fields = Fields::of(value, path)?;
    match fields.get("v") {
        Some(v) => Ok(Uniformity::Uniform(v, fields.at("v"))),
        None => Ok(Uniformity::PerComponent(fields)),
    }
}

fn read_padding(value: &Value, path: &NodePath) -> Result<Padding, DecodeError> {
    match uniformity(value, path)? {
        Uniformity::Uniform(v, at) => read_length(v, &at).map(Padding::uniform),
        Uniformity::PerComponent(fields) => Ok(Padding {
            left: field_or(&fields, "l", Padding::ZERO.left, read_length)?,
            top: field_or(&fields, "t", Padding::ZERO.top, read_length)?,
            right: field_or(&fields, "r", Padding::ZERO.right, read_length)?,
            bottom: field_or(&fields, "b", Padding::ZERO.bottom, read_length)?,
        }),
    }
}

fn read_scale(value: &Value, path: &NodePath) -> Result<Scale, DecodeError> {
    match uniformity(value, path)? {
        Uniformity::Uniform(v, at) => read_f32(v, &at).map(Scale::uniform),
        Uniformity::PerComponent(fields) => Ok(Scale {
            x: field_or(&fields, "x", Scale::IDENTITY.x, read_f32)?,
            y: field_or(&fields, "y", Scale::IDENTITY.y, read_f32)?,
        }),
    }
}

fn read_size(value: &Value, path: &NodePath) -> Result<Size, DecodeError> {
    match uniformity(value, path)? {
        Uniformity::Uniform(v, at) => read_length(v, &at).map(Size::uniform),
        Uniformity::PerComponent(fields) => Ok(Size {
            width: field_or(&fields, "w", Size::UNSPECIFIED.width, read_length)?,
            height: field_or(&fields, "h", Size::UNSPECIFIED.height, read_length)?,
        }),
    }
}

fn read_vertical_alignment(value: &Value, path: &NodePath) -> Result<VerticalAlignment, DecodeError> {
    read_enum(
        value,
        path,
        "vertical alignment",
        VerticalAlignment::NAMES,
        VerticalAlignment::from_name,
    )
}

fn read_horizontal_alignment(
    value: &Value,
    path: &NodePath,
) -> Result<HorizontalAlignment, DecodeError> {
    read_enum(
        value,
        path,
        "horizontal alignment",
        HorizontalAlignment::NAMES,
        HorizontalAlignment::from_name,
    )
}

fn read_arrangement_vertical(
    value: &Value,
    path: &NodePath,
) -> Result<VerticalArrangement, DecodeError> {
    let fields = Fields::of(value, path)?;
    Ok(VerticalArrangement {
        space: field_or(&fields, "space", Length::ZERO, read_length)?,
        align: field_or(&fields, "align", VerticalAlignment::Top, read_vertical_alignment)?,
    })
}

fn read_arrangement_horizontal(
    value: &Value,
    path: &NodePath,
) -> Result<HorizontalArrangement, DecodeError> {
    let fields = Fields::of(value, path)?;
    Ok(HorizontalArrangement {
        space: field_or(&fields, "space", Length::ZERO, read_length)?,
        align: field_or(&fields, "align", HorizontalAlignment::Start, read_horizontal_alignment)?,
    })
}

// ─── Modifiers ───────────────────────────────────────────────────────────

/// A modifier map once its variant key is known.
///
/// Attributes may sit next to the variant key (`- background:` followed by
/// `color: red` at the same level) or inside the map it points to; the nested
/// form wins when both are present.
struct ModifierNode<'a> {
    fields: Fields<'a>,
    key: &'static str,
}

impl<'a> ModifierNode<'a> {
    /// The value under the variant key itself.
    fn marker(&self) -> Option<&'a Value> {
        self.fields.get(self.key)
    }

    fn marker_path(&self) -> NodePath {
        self.fields.at(self.key)
    }

    fn nested(&self) -> Result<Option<Fields<'a>>, DecodeError> {
        match self.marker() {
            Some(value) if matches!(untag(value), Value::Mapping(_)) => {
                Fields::of(value, &self.marker_path()).map(Some)
            }
            Some(value) => Err(DecodeError::at(
                &self.marker_path(),
                DecodeErrorKind::ExpectedMap {
                    found: kind_name(untag(value)),
                },
            )),
            None => Ok(None),
        }
    }

    fn attr<T>(
        &self,
        key: &str,
        default: T,
        read: impl FnOnce(&Value, &NodePath) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        if let Some(nested) = self.nested()?
            && let Some(value) = nested.get(key)
        {
            return read(value, &nested.at(key));
        }
        field_or(&self.fields, key, default, read)
    }

    /// The value under the variant key, which must be present.
    fn required_marker(&self) -> Result<&'a Value, DecodeError> {
        self.marker()
            .ok_or_else(|| DecodeError::at(&self.fields.path, DecodeErrorKind::MissingField(self.key)))
    }

    /// Fraction of the `fill-max-*` family: the scalar under the key, else a
    /// `fraction` attribute, else 1.
    fn fraction(&self) -> Result<f32, DecodeError> {
        match self.marker() {
            Some(value) if scalar_text(value).is_some() => read_f32(value, &self.marker_path()),
            _ => self.attr("fraction", 1.0, read_f32),
        }
    }
}

type ModifierRule = (&'static str, fn(&ModifierNode<'_>) -> Result<Modifier, DecodeError>);

/// Variant keys in match priority. The first key present in a modifier map
/// decides its variant; the order is part of the document format.
const MODIFIER_RULES: [ModifierRule; 12] = [
    ("fill-max-width", |node| {
        Ok(Modifier::FillMaxWidth {
            fraction: node.fraction()?,
        })
    }),
    ("fill-max-height", |node| {
        Ok(Modifier::FillMaxHeight {
            fraction: node.fraction()?,
        })
    }),
    ("fill-max-size", |node| {
        Ok(Modifier::FillMaxSize {
            fraction: node.fraction()?,
        })
    }),
    ("drop-shadow", |node| {
        Ok(Modifier::DropShadow {
            radius: node.attr("radius", Length::units(4.0), read_length)?,
            spread: node.attr("spread", Length::units(4.0), read_length)?,
            opacity: node.attr("opacity", 0.5, read_f32)?,
            color: node.attr("color", Color::BLACK, read_color)?,
        })
    }),
    ("rotate", |node| {
        Ok(Modifier::Rotate {
            degrees: read_f32(node.required_marker()?, &node.marker_path())?,
        })
    }),
    ("scale", |node| {
        read_scale(node.required_marker()?, &node.marker_path()).map(Modifier::Scale)
    }),
    ("alpha", |node| {
        Ok(Modifier::Alpha {
            value: read_f32(node.required_marker()?, &node.marker_path())?,
        })
    }),
    ("padding", |node| {
        read_padding(node.required_marker()?, &node.marker_path()).map(Modifier::Padding)
    }),
    ("size", |node| {
        read_size(node.required_marker()?, &node.marker_path()).map(Modifier::Size)
    }),
    ("background", |node| {
        Ok(Modifier::Background {
            color: node.attr("color", Color::UNSPECIFIED, read_color)?,
            shape: node.attr("shape", Shape::Rectangle, read_shape)?,
        })
    }),
    ("clip", |node| {
        // `clip: circle`, `clip: {r: 4.dp}`, or a sibling `shape:` attribute.
        let shape = match node.marker() {
            Some(value) => read_shape(value, &node.marker_path())?,
            None => match node.fields.get("shape") {
                Some(value) => read_shape(value, &node.fields.at("shape"))?,
                None => {
                    return Err(DecodeError::at(
                        &node.fields.path,
                        DecodeErrorKind::MissingField("clip"),
                    ));
                }
            },
        };
        Ok(Modifier::Clip { shape })
    }),
    ("border", |node| {
        Ok(Modifier::Border {
            color: node.attr("color", Color::UNSPECIFIED, read_color)?,
            width: node.attr("width", Length::units(1.0), read_length)?,
            shape: node.attr("shape", Shape::Rectangle, read_shape)?,
        })
    }),
];

fn read_modifier(value: &Value, path: &NodePath) -> Result<Modifier, DecodeError> {
    let fields = Fields::of(value, path)?;
    for (key, decode) in MODIFIER_RULES {
        if fields.contains(key) {
            log::trace!("{path}: modifier resolved by key `{key}`");
            return decode(&ModifierNode { fields, key });
        }
    }
    Err(DecodeError::at(
        path,
        DecodeErrorKind::UnknownModifier {
            keys: fields.keys(),
        },
    ))
}

fn read_modifiers(fields: &Fields<'_>) -> Result<Modifiers, DecodeError> {
    let Some(value) = fields.get("modifier") else {
        return Ok(Modifiers::new());
    };
    let path = fields.at("modifier");
    let Value::Sequence(items) = untag(value) else {
        return Err(DecodeError::at(
            &path,
            DecodeErrorKind::ExpectedList {
                found: kind_name(untag(value)),
            },
        ));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| read_modifier(item, &path.index(i)))
        .collect()
}

// ─── Composables and layouts ─────────────────────────────────────────────

const BOX_FIELDS: &[&str] = &["modifier", "child", "content-alignment"];
const COLUMN_FIELDS: &[&str] = &["modifier", "child", "horizontal-alignment", "vertical-arrangement"];
const ROW_FIELDS: &[&str] = &["modifier", "child", "vertical-alignment", "horizontal-arrangement"];
const TEXT_FIELDS: &[&str] = &["tag", "text", "color", "font-size", "modifier"];
const RICH_TEXT_FIELDS: &[&str] = &["tag", "modifier", "max-lines", "text-align", "line-height", "soft-wrap"];
const IMAGE_FIELDS: &[&str] = &["tag", "modifier", "useBase64"];

/// Per-call decoding state.
struct DecodeContext<'c> {
    config: &'c DecodeConfig,
    /// Next number for generated Text tags. Reset for every document so a
    /// reload produces the same tags.
    text_tags: u64,
}

impl DecodeContext<'_> {
    fn page(&mut self, value: &Value, path: &NodePath) -> Result<Page, DecodeError> {
        let fields = Fields::of(value, path)?;
        fields.check_known(&["root"], self.config.strict_fields)?;
        let root = fields
            .get("root")
            .ok_or_else(|| DecodeError::at(path, DecodeErrorKind::MissingField("root")))?;
        let root = self.layout(root, &fields.at("root"))?;
        Ok(Page::new(root))
    }

    /// Variant name and body of a composable node.
    fn variant<'v>(
        &self,
        value: &'v Value,
        path: &NodePath,
        family: &'static str,
    ) -> Result<(String, Fields<'v>), DecodeError> {
        if let Value::Tagged(tagged) = value {
            let name = tagged.tag.to_string().trim_start_matches('!').to_string();
            return Ok((name, Fields::of(&tagged.value, path)?));
        }
        let fields = Fields::of(value, path)?;
        match fields.get("type") {
            Some(name) => Ok((read_string(name, &fields.at("type"))?, fields)),
            None => Err(DecodeError::at(path, DecodeErrorKind::MissingVariant { family })),
        }
    }

    fn layout(&mut self, value: &Value, path: &NodePath) -> Result<Layout, DecodeError> {
        let (name, fields) = self.variant(value, path, "layout")?;
        match name.as_str() {
            "Box" | "Column" | "Row" => self.layout_body(&name, &fields),
            _ => Err(DecodeError::at(
                path,
                DecodeErrorKind::UnknownVariant {
                    family: "layout",
                    name,
                },
            )),
        }
    }

    fn composable(&mut self, value: &Value, path: &NodePath) -> Result<Composable, DecodeError> {
        let (name, fields) = self.variant(value, path, "composable")?;
        match name.as_str() {
            "Text" => self.text(&fields).map(Composable::Text),
            "RichText" => self.rich_text(&fields).map(Composable::RichText),
            "Image" => self.image(&fields).map(Composable::Image),
            "Box" | "Column" | "Row" => self.layout_body(&name, &fields).map(Composable::Layout),
            _ => Err(DecodeError::at(
                path,
                DecodeErrorKind::UnknownVariant {
                    family: "composable",
                    name,
                },
            )),
        }
    }

    fn children(&mut self, fields: &Fields<'_>) -> Result<Vec<Composable>, DecodeError> {
        let Some(value) = fields.get("child") else {
            return Ok(Vec::new());
        };
        let path = fields.at("child");
        let Value::Sequence(items) = untag(value) else {
            return Err(DecodeError::at(
                &path,
                DecodeErrorKind::ExpectedList {
                    found: kind_name(untag(value)),
                },
            ));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.composable(item, &path.index(i)))
            .collect()
    }

    fn layout_body(&mut self, name: &str, fields: &Fields<'_>) -> Result<Layout, DecodeError> {
        let strict = self.config.strict_fields;
        match name {
            "Box" => {
                fields.check_known(BOX_FIELDS, strict)?;
                Ok(Layout::Box(BoxLayout {
                    content_alignment: field_or(
                        fields,
                        "content-alignment",
                        ContentAlignment::default(),
                        |v, p| {
                            read_enum(
                                v,
                                p,
                                "content alignment",
                                ContentAlignment::NAMES,
                                ContentAlignment::from_name,
                            )
                        },
                    )?,
                    modifiers: read_modifiers(fields)?,
                    children: self.children(fields)?,
                }))
            }
            "Column" => {
                fields.check_known(COLUMN_FIELDS, strict)?;
                Ok(Layout::Column(ColumnLayout {
                    horizontal_alignment: field_or(
                        fields,
                        "horizontal-alignment",
                        HorizontalAlignment::default(),
                        read_horizontal_alignment,
                    )?,
                    vertical_arrangement: field_or(
                        fields,
                        "vertical-arrangement",
                        VerticalArrangement::default(),
                        read_arrangement_vertical,
                    )?,
                    modifiers: read_modifiers(fields)?,
                    children: self.children(fields)?,
                }))
            }
            _ => {
                fields.check_known(ROW_FIELDS, strict)?;
                Ok(Layout::Row(RowLayout {
                    vertical_alignment: field_or(
                        fields,
                        "vertical-alignment",
                        VerticalAlignment::default(),
                        read_vertical_alignment,
                    )?,
                    horizontal_arrangement: field_or(
                        fields,
                        "horizontal-arrangement",
                        HorizontalArrangement::default(),
                        read_arrangement_horizontal,
                    )?,
                    modifiers: read_modifiers(fields)?,
                    children: self.children(fields)?,
                }))
            }
        }
    }

    fn required_tag(&self, fields: &Fields<'_>) -> Result<String, DecodeError> {
        let value = fields
            .get("tag")
            .ok_or_else(|| DecodeError::at(&fields.path, DecodeErrorKind::MissingField("tag")))?;
        read_tag(value, &fields.at("tag"))
    }

    fn text(&mut self, fields: &Fields<'_>) -> Result<TextNode, DecodeError> {
        fields.check_known(TEXT_FIELDS, self.config.strict_fields)?;
        let tag = match fields.get("tag") {
            Some(value) => read_tag(value, &fields.at("tag"))?,
            None => {
                let tag = format!("{GENERATED_TAG_PREFIX}{}", self.text_tags);
                self.text_tags += 1;
                tag
            }
        };
        Ok(TextNode {
            tag,
            text: field_or(fields, "text", String::new(), read_string)?,
            color: field_or(fields, "color", Color::UNSPECIFIED, read_color)?,
            font_size: field_or(fields, "font-size", TextSize::default(), read_text_size)?,
            modifiers: read_modifiers(fields)?,
        })
    }

    fn rich_text(&mut self, fields: &Fields<'_>) -> Result<RichTextNode, DecodeError> {
        fields.check_known(RICH_TEXT_FIELDS, self.config.strict_fields)?;
        Ok(RichTextNode {
            tag: self.required_tag(fields)?,
            max_lines: field_or(fields, "max-lines", u32::MAX, read_u32)?,
            text_align: field_or(fields, "text-align", TextAlign::default(), |v, p| {
                read_enum(v, p, "text alignment", TextAlign::NAMES, TextAlign::from_name)
            })?,
            line_height: field_or(fields, "line-height", TextSize::UNSPECIFIED, read_text_size)?,
            soft_wrap: field_or(fields, "soft-wrap", true, read_bool)?,
            modifiers: read_modifiers(fields)?,
        })
    }

    fn image(&mut self, fields: &Fields<'_>) -> Result<ImageNode, DecodeError> {
        fields.check_known(IMAGE_FIELDS, self.config.strict_fields)?;
        Ok(ImageNode {
            tag: self.required_tag(fields)?,
            use_base64: field_or(fields, "useBase64", false, read_bool)?,
            modifiers: read_modifiers(fields)?,
        })
    }
}

fn read_tag(value: &Value, path: &NodePath) -> Result<String, DecodeError> {
    let tag = read_string(value, path)?;
    if tag.trim().is_empty() {
        return Err(DecodeError::at(path, DecodeErrorKind::EmptyTag));
    }
    Ok(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueParseError;
    use pretty_assertions::assert_eq;

    // ─── Helpers ─────────────────────────────────────────────────────────

    fn modifier(yaml: &str) -> Result<Modifier, DecodeError> {
        let value: Value = serde_yaml::from_str(yaml).expect("test yaml");
        read_modifier(&value, &NodePath::root().key("m"))
    }

    fn shape(yaml: &str) -> Shape {
        let value: Value = serde_yaml::from_str(yaml).expect("test yaml");
        read_shape(&value, &NodePath::root()).expect("shape")
    }

    fn column_of(children: &str) -> String {
        format!("root: !Column\n  child:\n{children}")
    }

    // ─── Modifiers ───────────────────────────────────────────────────────

    #[test]
    fn padding_wins_over_unrelated_keys() {
        let m = modifier("padding: 8.dp\nnote: ignored").expect("padding");
        assert_eq!(m, Modifier::Padding(Padding::uniform(Length::units(8.0))));
    }

    #[test]
    fn unknown_modifier_reports_keys() {
        let err = modifier("wobble: 3\nspeed: fast").unwrap_err();
        assert_eq!(
            err.kind(),
            Some(&DecodeErrorKind::UnknownModifier {
                keys: vec!["wobble".into(), "speed".into()]
            })
        );
        assert!(err.to_string().contains("unknown modifier: keys="));
    }

    #[test]
    fn priority_order_decides_overlaps() {
        // `drop-shadow` outranks `alpha`, `fill-max-size` outranks `size`.
        let m = modifier("alpha: 0.3\ndrop-shadow:").expect("shadow");
        assert!(matches!(m, Modifier::DropShadow { .. }), "got {m:?}");
        let m = modifier("size: 10\nfill-max-size: 0.5").expect("fill");
        assert_eq!(m, Modifier::FillMaxSize { fraction: 0.5 });
    }

    #[test]
    fn padding_three_shapes() {
        assert_eq!(
            modifier("padding: 4").unwrap(),
            Modifier::Padding(Padding::uniform(Length::units(4.0)))
        );
        assert_eq!(
            modifier("padding: {v: 2.px}").unwrap(),
            Modifier::Padding(Padding::uniform(Length::pixels(2.0)))
        );
        assert_eq!(
            modifier("padding: {l: 1.dp, b: 3.dp}").unwrap(),
            Modifier::Padding(Padding {
                left: Length::units(1.0),
                top: Length::ZERO,
                right: Length::ZERO,
                bottom: Length::units(3.0),
            })
        );
    }

    #[test]
    fn empty_component_maps_take_defaults() {
        assert_eq!(modifier("padding: {}").unwrap(), Modifier::Padding(Padding::ZERO));
        assert_eq!(modifier("scale: {}").unwrap(), Modifier::Scale(Scale::IDENTITY));
        assert_eq!(modifier("size: {}").unwrap(), Modifier::Size(Size::UNSPECIFIED));
        assert_eq!(shape("{}"), Shape::RoundedCorner(CornerRadii::ZERO));
    }

    #[test]
    fn scale_and_size_defaults() {
        assert_eq!(
            modifier("scale: {x: 2}").unwrap(),
            Modifier::Scale(Scale { x: 2.0, y: 1.0 })
        );
        assert_eq!(
            modifier("size: {w: 100.dp}").unwrap(),
            Modifier::Size(Size {
                width: Length::units(100.0),
                height: Length::UNSPECIFIED,
            })
        );
    }

    #[test]
    fn sibling_and_nested_attributes() {
        let sibling = modifier("background:\ncolor: red\nshape: circle").unwrap();
        let nested = modifier("background: {color: red, shape: circle}").unwrap();
        let expected = Modifier::Background {
            color: Color::RED,
            shape: Shape::Circle,
        };
        assert_eq!(sibling, expected);
        assert_eq!(nested, expected);
    }

    #[test]
    fn modifier_defaults() {
        assert_eq!(
            modifier("border:").unwrap(),
            Modifier::Border {
                color: Color::UNSPECIFIED,
                width: Length::units(1.0),
                shape: Shape::Rectangle,
            }
        );
        assert_eq!(
            modifier("drop-shadow:").unwrap(),
            Modifier::DropShadow {
                radius: Length::units(4.0),
                spread: Length::units(4.0),
                opacity: 0.5,
                color: Color::BLACK,
            }
        );
        assert_eq!(
            modifier("fill-max-width:").unwrap(),
            Modifier::FillMaxWidth { fraction: 1.0 }
        );
        assert_eq!(
            modifier("fill-max-height:\nfraction: 0.25").unwrap(),
            Modifier::FillMaxHeight { fraction: 0.25 }
        );
    }

    #[test]
    fn rotate_needs_a_value() {
        let err = modifier("rotate:").unwrap_err();
        assert_eq!(err.kind(), Some(&DecodeErrorKind::MissingField("rotate")));
        assert_eq!(
            modifier("rotate: 45").unwrap(),
            Modifier::Rotate { degrees: 45.0 }
        );
    }

    #[test]
    fn alpha_is_not_clamped() {
        assert_eq!(modifier("alpha: 1.5").unwrap(), Modifier::Alpha { value: 1.5 });
    }

    #[test]
    fn clip_decodes_shapes() {
        assert_eq!(
            modifier("clip: circle").unwrap(),
            Modifier::Clip {
                shape: Shape::Circle
            }
        );
        assert_eq!(
            modifier("clip:\n  r: 6.dp").unwrap(),
            Modifier::Clip {
                shape: Shape::RoundedCorner(CornerRadii::uniform(Length::units(6.0)))
            }
        );
    }

    #[test]
    fn bad_literal_carries_path() {
        let err = modifier("padding: {l: abc}").unwrap_err();
        assert_eq!(err.path().map(ToString::to_string).as_deref(), Some("m.padding.l"));
        assert_eq!(
            err.kind(),
            Some(&DecodeErrorKind::Value(ValueParseError::InvalidLength {
                literal: "abc".into()
            }))
        );
    }

    // ─── Shapes and colors ───────────────────────────────────────────────

    #[test]
    fn shape_maps() {
        assert_eq!(
            shape("{r: 4.dp}"),
            Shape::RoundedCorner(CornerRadii::uniform(Length::units(4.0)))
        );
        assert_eq!(
            shape("{topLeft: 2.dp, botRight: 3.dp}"),
            Shape::RoundedCorner(CornerRadii {
                top_left: Length::units(2.0),
                top_right: Length::ZERO,
                bottom_right: Length::units(3.0),
                bottom_left: Length::ZERO,
            })
        );
        assert_eq!(shape("{type: Circle}"), Shape::Circle);
        assert_eq!(
            shape("{type: rounded, radius: 1.dp}"),
            Shape::RoundedCorner(CornerRadii::uniform(Length::units(1.0)))
        );
    }

    #[test]
    fn color_maps() {
        let value: Value = serde_yaml::from_str("{r: 255, b: 10}").unwrap();
        assert_eq!(
            read_color(&value, &NodePath::root()).unwrap(),
            Color::rgba(255, 0, 10, 255)
        );
        let value: Value = serde_yaml::from_str("{r: 300}").unwrap();
        assert!(read_color(&value, &NodePath::root()).is_err());
    }

    // ─── Documents ───────────────────────────────────────────────────────

    #[test]
    fn text_tags_are_generated_per_document() {
        let input = column_of("    - !Text\n      text: a\n    - !Text\n      tag: named\n    - !Text {}\n");
        let decoder = Decoder::default();
        let first = decoder.decode_str(&input).expect("decode");
        let second = decoder.decode_str(&input).expect("decode");
        let tags: Vec<&str> = first.fillable_nodes().iter().map(|f| f.tag()).collect();
        assert_eq!(tags, ["TextComposable_0", "named", "TextComposable_1"]);
        assert_eq!(first, second, "reload must reproduce the same tags");
    }

    #[test]
    fn type_key_selects_variant() {
        let page = decode_page("root:\n  type: Row\n  child:\n    - type: Image\n      tag: hero\n")
            .expect("decode");
        let Layout::Row(row) = &page.root else {
            panic!("expected Row, got {:?}", page.root);
        };
        assert_eq!(row.children[0].variant_name(), "Image");
    }

    #[test]
    fn root_must_be_a_layout() {
        let err = decode_page("root: !Text\n  text: hi\n").unwrap_err();
        assert_eq!(
            err.kind(),
            Some(&DecodeErrorKind::UnknownVariant {
                family: "layout",
                name: "Text".into()
            })
        );
    }

    #[test]
    fn missing_variant() {
        let err = decode_page("root:\n  child: []\n").unwrap_err();
        assert_eq!(
            err.kind(),
            Some(&DecodeErrorKind::MissingVariant { family: "layout" })
        );
    }

    #[test]
    fn rich_text_requires_tag() {
        let err = decode_page(&column_of("    - !RichText\n      max-lines: 2\n")).unwrap_err();
        assert_eq!(err.kind(), Some(&DecodeErrorKind::MissingField("tag")));
        assert_eq!(err.path().map(ToString::to_string).as_deref(), Some("root.child[0]"));
    }

    #[test]
    fn empty_tag_is_rejected() {
        let err = decode_page(&column_of("    - !Image\n      tag: ''\n")).unwrap_err();
        assert_eq!(err.kind(), Some(&DecodeErrorKind::EmptyTag));
    }

    #[test]
    fn strict_fields_rejects_unknown_keys() {
        let input = column_of("    - !Text\n      colour: red\n");
        assert!(decode_page(&input).is_ok(), "lenient by default");

        let strict = Decoder::new(DecodeConfig {
            strict_fields: true,
            ..DecodeConfig::default()
        });
        let err = strict.decode_str(&input).unwrap_err();
        assert_eq!(err.kind(), Some(&DecodeErrorKind::UnknownField("colour".into())));
    }

    #[test]
    fn merge_keys_are_applied() {
        let input = "\
base: &base
  font-size: 20.sp
root: !Column
  child:
    - !Text
      <<: *base
      text: merged
";
        let page = decode_page(input).expect("decode");
        let Composable::Text(text) = &page.root.children()[0] else {
            panic!("expected Text");
        };
        assert_eq!(text.font_size, TextSize::sp(20.0));
    }

    #[test]
    fn unknown_enum_value() {
        let err = decode_page("root: !Box\n  content-alignment: Middle\n").unwrap_err();
        assert!(
            matches!(err.kind(), Some(DecodeErrorKind::UnknownEnumValue { value, .. }) if value == "Middle"),
            "got {err}"
        );
    }

    #[test]
    fn malformed_yaml_is_a_syntax_error() {
        let err = decode_page("root: [unclosed").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax(_)));
        assert!(err.path().is_none());
    }
}
