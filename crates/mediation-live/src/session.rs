//! A preview session: one page file, its live snapshot, the content store and
//! a renderer.
//!
//! The session is the only writer of the page and the content. The watcher
//! never touches either; it only hands over [`FileChange`] notifications,
//! which [`Session::run`] turns into reloads.

use crate::config::SessionConfig;
use crate::error::LiveError;
use crate::live::LivePage;
use crate::render::Renderer;
use crate::watcher::{ChangeKind, FileChange, ReloadWatcher};
use mediation_core::{Decoder, LintDiagnostic, Page, lint_page};
use mediation_fill::FillableState;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct Session<R: Renderer> {
    config: SessionConfig,
    decoder: Decoder,
    path: PathBuf,
    page: LivePage,
    content: FillableState,
    renderer: R,
}

impl<R: Renderer> Session<R> {
    /// Load and render `path`. Fails when the first load fails, since there
    /// is no earlier page to fall back to.
    pub fn open(path: impl Into<PathBuf>, config: SessionConfig, renderer: R) -> Result<Self, LiveError> {
        let content = FillableState::new(config.initial_lang.clone());
        Self::open_with_content(path, config, content, renderer)
    }

    /// Like [`open`](Self::open), with an already filled content store.
    pub fn open_with_content(
        path: impl Into<PathBuf>,
        config: SessionConfig,
        content: FillableState,
        renderer: R,
    ) -> Result<Self, LiveError> {
        let path = path.into();
        let decoder = Decoder::new(config.decode);
        let page = load_page(&decoder, &path)?;
        log::info!("loaded {}", path.display());

        let mut session = Self {
            config,
            decoder,
            path,
            page: LivePage::new(page),
            content,
            renderer,
        };
        session.render();
        Ok(session)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Snapshot of the page currently shown.
    pub fn page(&self) -> Arc<Page> {
        self.page.current()
    }

    pub fn content(&self) -> &FillableState {
        &self.content
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Diagnostics for the page currently shown.
    pub fn lint(&self) -> Vec<LintDiagnostic> {
        lint_page(&self.page.current())
    }

    /// Re-read and decode the page file. The new page replaces the old one
    /// only when decoding succeeds; on error the shown page is unchanged.
    pub fn reload(&mut self) -> Result<(), LiveError> {
        let page = load_page(&self.decoder, &self.path)?;
        self.page.replace(page);
        log::info!("reloaded {}", self.path.display());
        Ok(())
    }

    pub fn render(&mut self) {
        let page = self.page.current();
        self.renderer.render(&page, self.config.density, &self.content);
    }

    /// Mutate the content store, then re-render.
    pub fn edit<T>(&mut self, f: impl FnOnce(&mut FillableState) -> T) -> T {
        let out = f(&mut self.content);
        self.render();
        out
    }

    pub fn switch_lang(&mut self, lang: &str) {
        self.edit(|content| content.switch_lang(lang));
    }

    /// Import a content JSON file. The store is unchanged when the file
    /// cannot be read or parsed.
    pub fn import_content(&mut self, path: &Path) -> Result<(), LiveError> {
        let text = fs::read_to_string(path).map_err(|source| LiveError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.content.load_json(&text)?;
        log::debug!("imported content from {}", path.display());
        self.render();
        Ok(())
    }

    /// Write the content store as JSON: every language, or only `lang`.
    pub fn export_content(&self, path: &Path, lang: Option<&str>) -> Result<(), LiveError> {
        let json = match lang {
            Some(lang) => self.content.export_json_lang(lang),
            None => self.content.export_json(),
        };
        fs::write(path, json).map_err(|source| LiveError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("exported content to {}", path.display());
        Ok(())
    }

    /// Write embedded image payloads under `dir`.
    pub fn restore_images(&self, dir: &Path) -> BTreeMap<String, PathBuf> {
        self.content.restore_images_from_json(dir)
    }

    /// Start a watcher on the page file. Needs a tokio runtime.
    pub fn watch(&self) -> Result<(ReloadWatcher, mpsc::Receiver<FileChange>), LiveError> {
        ReloadWatcher::spawn(&self.path, &self.config.watch)
    }

    /// Reload and re-render on every notification until the channel closes.
    /// A failed reload is logged and the previous page stays on screen.
    pub async fn run(&mut self, changes: &mut mpsc::Receiver<FileChange>) {
        while let Some(change) = changes.recv().await {
            self.apply_change(&change);
        }
        log::debug!("change stream closed for {}", self.path.display());
    }

    /// Handle one notification. Returns whether the page was replaced.
    pub fn apply_change(&mut self, change: &FileChange) -> bool {
        if change.kind == ChangeKind::Removed {
            log::warn!("{} was removed; keeping the current page", change.path.display());
            return false;
        }
        match self.reload() {
            Ok(()) => {
                self.render();
                true
            }
            Err(e) => {
                log::error!("reload failed, keeping the previous page: {e}");
                false
            }
        }
    }
}

fn load_page(decoder: &Decoder, path: &Path) -> Result<Page, LiveError> {
    let text = fs::read_to_string(path).map_err(|source| LiveError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decoder.decode_str(&text)?)
}
