use arc_swap::ArcSwap;
use mediation_core::Page;
use std::sync::Arc;

/// The page currently shown. Readers get a whole snapshot; a reload swaps the
/// snapshot in one step, so nobody observes a half-built tree.
#[derive(Debug)]
pub struct LivePage {
    inner: ArcSwap<Page>,
}

impl LivePage {
    pub fn new(page: Page) -> Self {
        Self {
            inner: ArcSwap::from_pointee(page),
        }
    }

    pub fn current(&self) -> Arc<Page> {
        self.inner.load_full()
    }

    /// Swap in `page`, returning the previous snapshot.
    pub fn replace(&self, page: Page) -> Arc<Page> {
        self.inner.swap(Arc::new(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediation_core::{BoxLayout, ColumnLayout, Layout};
    use pretty_assertions::assert_eq;

    #[test]
    fn old_snapshots_survive_a_swap() {
        let live = LivePage::new(Page::new(Layout::Box(BoxLayout::default())));
        let before = live.current();

        let previous = live.replace(Page::new(Layout::Column(ColumnLayout::default())));

        assert_eq!(before.root.variant_name(), "Box");
        assert_eq!(previous.root.variant_name(), "Box");
        assert_eq!(live.current().root.variant_name(), "Column");
    }
}
