//! Interactive catalog browsing with search-as-you-type.
//!
//! [`CatalogBrowser`] owns a [`CatalogView`] and applies category changes
//! immediately, while search input goes through a [`Debouncer`] so only the
//! text present after a quiet period filters the grid.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use bazaar_core::{CatalogView, Product};

use crate::debounce::Debouncer;

/// A catalog view with debounced search.
#[derive(Debug)]
pub struct CatalogBrowser {
    view: Arc<RwLock<CatalogView>>,
    search: Debouncer<String>,
}

impl CatalogBrowser {
    /// Wrap `view`, applying search text after `quiet` without input.
    ///
    /// Must be called inside a Tokio runtime.
    #[must_use]
    pub fn new(view: CatalogView, quiet: Duration) -> Self {
        let view = Arc::new(RwLock::new(view));
        let target = Arc::clone(&view);
        let search = Debouncer::new(quiet, move |query: String| {
            let mut view = target.write().unwrap_or_else(PoisonError::into_inner);
            view.set_search_query(&query);
            tracing::debug!(query = %query, "search applied");
        });

        Self { view, search }
    }

    /// Select a category. Takes effect immediately.
    pub fn select_category(&self, category: &str) {
        self.write().set_category(category);
    }

    /// Record search input. Takes effect once input has been quiet.
    pub fn search_input(&self, text: impl Into<String>) {
        self.search.arm(text.into());
    }

    /// Drop any waiting search input and clear the applied search.
    pub fn clear_search(&self) {
        self.search.cancel();
        self.write().set_search_query("");
    }

    /// Whether search input is waiting to be applied.
    #[must_use]
    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    /// Search text currently applied to the grid.
    #[must_use]
    pub fn applied_query(&self) -> String {
        self.read(|view| view.search_query().to_string())
    }

    /// Products currently visible, in catalog order.
    #[must_use]
    pub fn visible(&self) -> Vec<Product> {
        self.read(|view| view.filtered().cloned().collect())
    }

    /// Run `f` against the current view.
    pub fn read<R>(&self, f: impl FnOnce(&CatalogView) -> R) -> R {
        let view = self.view.read().unwrap_or_else(PoisonError::into_inner);
        f(&view)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, CatalogView> {
        self.view.write().unwrap_or_else(PoisonError::into_inner)
    }
}
