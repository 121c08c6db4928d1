//! Per-language content store.
//!
//! `FillableState` maps `(language, tag)` to a [`ContentValue`]. One language
//! is active at a time; untargeted reads and writes go to it. Languages are
//! created lazily the first time they are referenced.
//!
//! The store is owned by one session and mutated through `&mut self`, so a
//! reader can never observe a half-applied update or import.

use crate::error::ContentError;
use crate::image::{ImageExport, extension_for_mime};
use crate::value::{ContentValue, FromContent};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Tag → value entries of one language.
pub type Slice = BTreeMap<String, ContentValue>;

/// Language codes offered by the edit panel.
pub const KNOWN_LANGUAGES: [&str; 2] = ["fr", "en"];

/// Active language of a fresh store.
pub const DEFAULT_LANGUAGE: &str = "fr";

/// Directory used by [`FillableState::restore_images_from_json`] callers
/// that have no better place.
pub const DEFAULT_RESTORE_DIR: &str = "restored_images";

#[derive(Debug, Clone, PartialEq)]
pub struct FillableState {
    current: String,
    langs: BTreeMap<String, Slice>,
}

impl Default for FillableState {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl FillableState {
    /// Empty store with `initial_lang` active.
    pub fn new(initial_lang: impl Into<String>) -> Self {
        let mut state = Self {
            current: initial_lang.into(),
            langs: BTreeMap::new(),
        };
        state.prepare_lang(&state.current.clone());
        state
    }

    // ─── Languages ───────────────────────────────────────────────────────

    /// Ensure a slice exists for `lang`. Idempotent.
    pub fn prepare_lang(&mut self, lang: &str) -> &mut Slice {
        self.langs.entry(lang.to_string()).or_default()
    }

    /// Make `lang` the active language, creating its slice if needed.
    pub fn switch_lang(&mut self, lang: &str) {
        self.set_current_lang(lang);
    }

    /// Same as [`switch_lang`](Self::switch_lang).
    pub fn set_current_lang(&mut self, lang: &str) {
        self.prepare_lang(lang);
        if self.current != lang {
            log::debug!("content language: {} -> {lang}", self.current);
            self.current = lang.to_string();
        }
    }

    pub fn current_lang(&self) -> &str {
        &self.current
    }

    /// Languages that have a slice, in code order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.langs.keys().map(String::as_str)
    }

    pub fn slice(&self, lang: &str) -> Option<&Slice> {
        self.langs.get(lang)
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    /// Raw entry in the active language.
    pub fn value(&self, tag: &str) -> Option<&ContentValue> {
        self.value_in(&self.current, tag)
    }

    pub fn value_in(&self, lang: &str, tag: &str) -> Option<&ContentValue> {
        self.langs.get(lang)?.get(tag)
    }

    /// Typed entry in the active language. `None` when absent or when the
    /// stored value has another type.
    pub fn get<T: FromContent>(&self, tag: &str) -> Option<T> {
        self.get_in(&self.current, tag)
    }

    pub fn get_in<T: FromContent>(&self, lang: &str, tag: &str) -> Option<T> {
        self.value_in(lang, tag).and_then(T::from_content)
    }

    /// Borrowed string entry in the active language.
    pub fn get_str(&self, tag: &str) -> Option<&str> {
        self.value(tag).and_then(ContentValue::as_str)
    }

    pub fn get_image(&self, tag: &str) -> Option<&ImageExport> {
        self.value(tag).and_then(ContentValue::as_image)
    }

    /// Path of the image bound to `tag`: an image record's path or a legacy
    /// bare path string.
    pub fn image_path(&self, tag: &str) -> Option<&str> {
        self.image_path_in(&self.current, tag)
    }

    pub fn image_path_in(&self, lang: &str, tag: &str) -> Option<&str> {
        match self.value_in(lang, tag)? {
            ContentValue::Image(image) => Some(&image.path),
            ContentValue::Str(path) => Some(path),
            _ => None,
        }
    }

    // ─── Writes ──────────────────────────────────────────────────────────

    /// Upsert `tag` in the active language.
    pub fn update_state(&mut self, tag: &str, value: impl Into<ContentValue>) {
        let lang = self.current.clone();
        self.update_state_in(&lang, tag, value);
    }

    /// Upsert `tag` in `lang`, creating the language if needed.
    pub fn update_state_in(&mut self, lang: &str, tag: &str, value: impl Into<ContentValue>) {
        let value = value.into();
        log::trace!("content[{lang}][{tag}] = {}", value.kind_name());
        self.prepare_lang(lang).insert(tag.to_string(), value);
    }

    /// Delete `tag` from the active language. No-op when absent.
    pub fn remove_state(&mut self, tag: &str) -> Option<ContentValue> {
        let lang = self.current.clone();
        self.remove_state_in(&lang, tag)
    }

    pub fn remove_state_in(&mut self, lang: &str, tag: &str) -> Option<ContentValue> {
        let removed = self.langs.get_mut(lang)?.remove(tag);
        if removed.is_some() {
            log::trace!("content[{lang}][{tag}] removed");
        }
        removed
    }

    /// Embed the image at `path` under `tag` in the active language.
    ///
    /// Returns `Ok(false)` without touching the store when the file does not
    /// exist.
    pub fn update_image_from_path(&mut self, tag: &str, path: &Path) -> Result<bool, ContentError> {
        let lang = self.current.clone();
        self.update_image_from_path_in(&lang, tag, path)
    }

    pub fn update_image_from_path_in(
        &mut self,
        lang: &str,
        tag: &str,
        path: &Path,
    ) -> Result<bool, ContentError> {
        if !path.is_file() {
            log::debug!("image for `{tag}` not found at {}", path.display());
            return Ok(false);
        }
        let image = ImageExport::from_file(path)?;
        self.update_state_in(lang, tag, image);
        Ok(true)
    }

    // ─── JSON export ─────────────────────────────────────────────────────

    /// All languages: `{"<lang>": {"<tag>": value, ...}, ...}`.
    pub fn export_json(&self) -> String {
        let languages: Map<String, JsonValue> = self
            .langs
            .iter()
            .map(|(lang, slice)| (lang.clone(), slice_to_json(slice)))
            .collect();
        log::debug!("exported content for {} language(s)", languages.len());
        JsonValue::Object(languages).to_string()
    }

    /// One language as a flat object, or `{}` when the language is unknown.
    pub fn export_json_lang(&self, lang: &str) -> String {
        match self.langs.get(lang) {
            Some(slice) => slice_to_json(slice).to_string(),
            None => "{}".to_string(),
        }
    }

    // ─── JSON import ─────────────────────────────────────────────────────

    /// Replace content from JSON, detecting its shape.
    ///
    /// When any top-level value is an object other than an image record the
    /// document is multi-language: the whole store is replaced and every
    /// top-level key is a language. Otherwise the document is a flat slice
    /// for the active language, and only that slice is replaced.
    ///
    /// On error nothing is modified.
    pub fn load_json(&mut self, text: &str) -> Result<(), ContentError> {
        let object = parse_object(text)?;
        let multi_language = object
            .values()
            .any(|value| value.is_object() && !ImageExport::is_record(value));

        if multi_language {
            let mut langs = BTreeMap::new();
            for (lang, value) in object {
                match value {
                    JsonValue::Object(entries) => {
                        langs.insert(lang, slice_from_json(entries)?);
                    }
                    other => log::warn!(
                        "content import: skipping `{lang}`, expected an object of tags, found {}",
                        json_kind(&other)
                    ),
                }
            }
            log::debug!("imported content for {} language(s)", langs.len());
            self.langs = langs;
            let current = self.current.clone();
            self.prepare_lang(&current);
        } else {
            let slice = slice_from_json(object)?;
            log::debug!("imported {} tag(s) into `{}`", slice.len(), self.current);
            self.langs.insert(self.current.clone(), slice);
        }
        Ok(())
    }

    /// Replace the slice of `lang` with a flat JSON object.
    pub fn load_json_lang(&mut self, text: &str, lang: &str) -> Result<(), ContentError> {
        let slice = slice_from_json(parse_object(text)?)?;
        log::debug!("imported {} tag(s) into `{lang}`", slice.len());
        self.langs.insert(lang.to_string(), slice);
        Ok(())
    }

    // ─── Images ──────────────────────────────────────────────────────────

    /// Write every embedded image payload, across all languages, under
    /// `output_dir`.
    ///
    /// Files keep the base name of their original path, or `<tag>.<ext>`
    /// when it has none. Returns tag → absolute output path. Failures are
    /// logged and skipped.
    pub fn restore_images_from_json(&self, output_dir: &Path) -> BTreeMap<String, PathBuf> {
        let mut restored = BTreeMap::new();
        for slice in self.langs.values() {
            for (tag, value) in slice {
                let ContentValue::Image(image) = value else {
                    continue;
                };
                if !image.has_payload() {
                    continue;
                }
                let file_name = Path::new(&image.path)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| {
                        format!("{tag}.{}", extension_for_mime(image.mime_type.as_deref()))
                    });
                let output = output_dir.join(file_name);

                match image
                    .save_to_file(&output)
                    .and_then(|path| std::path::absolute(&path).map_err(ContentError::io(&path)))
                {
                    Ok(path) => {
                        log::info!("restored image for `{tag}` to {}", path.display());
                        restored.insert(tag.clone(), path);
                    }
                    Err(e) => log::warn!("could not restore image for `{tag}`: {e}"),
                }
            }
        }
        restored
    }
}

// ─── JSON helpers ────────────────────────────────────────────────────────

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn parse_object(text: &str) -> Result<Map<String, JsonValue>, ContentError> {
    match serde_json::from_str::<JsonValue>(text)? {
        JsonValue::Object(object) => Ok(object),
        other => Err(ContentError::NotAnObject {
            found: json_kind(&other),
        }),
    }
}

fn slice_to_json(slice: &Slice) -> JsonValue {
    JsonValue::Object(
        slice
            .iter()
            .map(|(tag, value)| (tag.clone(), value.to_json()))
            .collect(),
    )
}

fn slice_from_json(entries: Map<String, JsonValue>) -> Result<Slice, ContentError> {
    entries
        .into_iter()
        .map(|(tag, value)| Ok((tag, content_from_json(value)?)))
        .collect()
}

/// Imported value for one JSON entry.
///
/// Strings stay strings, even `"true"` or `"1.5"`. Numbers are read from
/// their literal text: with a `.` they become `Float`, otherwise `Int` when
/// they fit `i64`; anything else (`1e5`, huge integers) keeps its text.
/// Image records are rebuilt; any other object or array is kept as its JSON
/// text.
fn content_from_json(value: JsonValue) -> Result<ContentValue, ContentError> {
    Ok(match value {
        JsonValue::Null => ContentValue::Null,
        JsonValue::Bool(b) => ContentValue::Bool(b),
        JsonValue::String(s) => ContentValue::Str(s),
        JsonValue::Number(n) => number_from_literal(n.to_string()),
        record if ImageExport::is_record(&record) => {
            ContentValue::Image(serde_json::from_value(record)?)
        }
        other => ContentValue::Str(other.to_string()),
    })
}

fn number_from_literal(text: String) -> ContentValue {
    let parsed = if text.contains('.') {
        text.parse::<f64>().ok().filter(|f| f.is_finite()).map(ContentValue::Float)
    } else {
        text.parse::<i64>().ok().map(ContentValue::Int)
    };
    parsed.unwrap_or(ContentValue::Str(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_with_one_language() {
        let state = FillableState::default();
        assert_eq!(state.current_lang(), "fr");
        assert_eq!(state.languages().collect::<Vec<_>>(), ["fr"]);
    }

    #[test]
    fn switch_and_set_are_equivalent() {
        let mut a = FillableState::default();
        let mut b = FillableState::default();
        a.switch_lang("en");
        b.set_current_lang("en");
        assert_eq!(a, b);
        assert_eq!(a.current_lang(), "en");
        assert!(a.slice("en").is_some());
    }

    #[test]
    fn prepare_lang_is_idempotent() {
        let mut state = FillableState::default();
        state.update_state_in("en", "title", "Hello");
        state.prepare_lang("en");
        assert_eq!(state.get_in::<String>("en", "title").as_deref(), Some("Hello"));
    }

    #[test]
    fn writes_target_active_language() {
        let mut state = FillableState::default();
        state.update_state("title", "Bonjour");
        state.switch_lang("en");
        assert_eq!(state.get_str("title"), None);
        state.update_state("title", "Hello");
        assert_eq!(state.get_str("title"), Some("Hello"));
        assert_eq!(state.get_in::<String>("fr", "title").as_deref(), Some("Bonjour"));
    }

    #[test]
    fn typed_getters() {
        let mut state = FillableState::default();
        state.update_state("count", 3);
        state.update_state("ratio", 0.5_f64);
        state.update_state("visible", true);
        assert_eq!(state.get::<i32>("count"), Some(3));
        assert_eq!(state.get::<i64>("count"), Some(3));
        assert_eq!(state.get::<f32>("ratio"), Some(0.5));
        assert_eq!(state.get::<bool>("visible"), Some(true));
        assert_eq!(state.get::<String>("count"), None, "type mismatch is silent");
        assert_eq!(state.get::<bool>("missing"), None);
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let mut state = FillableState::default();
        assert_eq!(state.remove_state("nothing"), None);
        assert_eq!(state.remove_state_in("de", "nothing"), None);
        state.update_state("x", 1);
        assert_eq!(state.remove_state("x"), Some(ContentValue::Int(1)));
        assert_eq!(state.value("x"), None);
    }

    #[test]
    fn export_single_language() {
        let mut state = FillableState::default();
        state.update_state("b", 2);
        state.update_state("a", "x");
        assert_eq!(state.export_json_lang("fr"), r#"{"a":"x","b":2}"#);
        assert_eq!(state.export_json_lang("de"), "{}");
    }

    #[test]
    fn import_keeps_string_literals() {
        let mut state = FillableState::default();
        state
            .load_json(r#"{"flag": "true", "decimal": "1.5", "real": true, "n": 7, "x": 1.25}"#)
            .expect("load");
        assert_eq!(state.value("flag"), Some(&ContentValue::Str("true".into())));
        assert_eq!(state.value("decimal"), Some(&ContentValue::Str("1.5".into())));
        assert_eq!(state.value("real"), Some(&ContentValue::Bool(true)));
        assert_eq!(state.value("n"), Some(&ContentValue::Int(7)));
        assert_eq!(state.value("x"), Some(&ContentValue::Float(1.25)));
    }

    #[test]
    fn import_keeps_foreign_objects_as_text() {
        let mut state = FillableState::default();
        state
            .load_json_lang(r#"{"list": [1, 2], "huge": 18446744073709551615}"#, "fr")
            .expect("load");
        assert_eq!(state.get_str("list"), Some("[1,2]"));
        assert_eq!(state.get_str("huge"), Some("18446744073709551615"));
    }

    #[test]
    fn image_path_reads_records_and_legacy_paths() {
        let mut state = FillableState::default();
        state.update_state("hero", ImageExport::from_path("/img/hero.png"));
        state.update_state("logo", "/img/logo.png");
        state.update_state("count", 1);
        assert_eq!(state.image_path("hero"), Some("/img/hero.png"));
        assert_eq!(state.image_path("logo"), Some("/img/logo.png"));
        assert_eq!(state.image_path("count"), None);
    }

    #[test]
    fn failed_import_leaves_state_untouched() {
        let mut state = FillableState::default();
        state.update_state("title", "kept");
        let before = state.clone();

        assert!(matches!(state.load_json("{not json"), Err(ContentError::Json(_))));
        assert!(matches!(
            state.load_json("[1, 2]"),
            Err(ContentError::NotAnObject { found: "array" })
        ));
        let bad_image = r#"{"en": {"hero": {"type": "ImageExport", "path": 3}}}"#;
        assert!(state.load_json(bad_image).is_err());
        assert_eq!(state, before);
    }
}
