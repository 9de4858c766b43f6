//! Host integration point
//!
//! A host routes every translation lookup of a unit of work through one
//! [`Translations`] registry. Loading a namespace with a readable catalog
//! installs a [`TranslationMemoizer`] for it; whatever translator the
//! namespace had before becomes that memoizer's override.

use crate::cache::{CacheContext, CacheStore, FinalizeOutcome};
use crate::translate::{select_form, CatalogLoader, TranslationMemoizer, Translator};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

enum Domain {
    Cached(TranslationMemoizer),
    Plain(Box<dyn Translator>),
}

impl Domain {
    fn translator(&self) -> &dyn Translator {
        match self {
            Self::Cached(memo) => memo,
            Self::Plain(translator) => translator.as_ref(),
        }
    }

    fn into_translator(self) -> Box<dyn Translator> {
        match self {
            Self::Cached(memo) => Box::new(memo),
            Self::Plain(translator) => translator,
        }
    }
}

/// Namespace -> translator table for one unit of work
pub struct Translations {
    ctx: CacheContext,
    domains: HashMap<String, Domain>,
}

impl Translations {
    pub fn new(ctx: CacheContext) -> Self {
        Self {
            ctx,
            domains: HashMap::new(),
        }
    }

    /// Register a translator that is not cached
    ///
    /// A later [`load`](Self::load) of the same namespace uses it as override.
    pub fn register(&mut self, namespace: &str, translator: Box<dyn Translator>) {
        self.domains
            .insert(namespace.to_string(), Domain::Plain(translator));
    }

    /// Install a cached translator for `namespace` backed by `catalog`
    ///
    /// Returns `false` when the catalog cannot be read; the namespace keeps
    /// whatever translator it had and the host should fall back to its
    /// default loading.
    pub fn load(&mut self, namespace: &str, catalog: &Path, loader: Box<dyn CatalogLoader>) -> bool {
        let store = match CacheStore::open(&self.ctx, catalog, namespace) {
            Ok(store) => store,
            Err(e) => {
                debug!("Not caching {}: {}", namespace, e);
                return false;
            }
        };

        let upstream = self
            .domains
            .remove(namespace)
            .map(Domain::into_translator);
        let memo = TranslationMemoizer::new(store, catalog, upstream, loader);
        self.domains
            .insert(namespace.to_string(), Domain::Cached(memo));
        true
    }

    /// Whether `namespace` has a translator
    pub fn is_loaded(&self, namespace: &str) -> bool {
        self.domains.contains_key(namespace)
    }

    /// Translate through the namespace's translator; unknown namespaces echo `text`
    pub fn translate(&self, namespace: &str, text: &str, context: Option<&str>) -> String {
        match self.domains.get(namespace) {
            Some(domain) => domain.translator().translate(text, context),
            None => text.to_string(),
        }
    }

    pub fn translate_plural(
        &self,
        namespace: &str,
        singular: &str,
        plural: &str,
        count: i64,
        context: Option<&str>,
    ) -> String {
        match self.domains.get(namespace) {
            Some(domain) => domain
                .translator()
                .translate_plural(singular, plural, count, context),
            None => select_form(singular, plural, count).to_string(),
        }
    }

    /// Drop a namespace; a cached one is finalized
    pub fn unload(&mut self, namespace: &str) -> Option<FinalizeOutcome> {
        match self.domains.remove(namespace)? {
            Domain::Cached(memo) => Some(memo.finalize()),
            Domain::Plain(_) => Some(FinalizeOutcome::Unchanged),
        }
    }

    /// End the unit of work, finalizing every cached namespace
    pub fn finish(self) -> Vec<(String, FinalizeOutcome)> {
        let mut outcomes: Vec<_> = self
            .domains
            .into_iter()
            .filter_map(|(namespace, domain)| match domain {
                Domain::Cached(memo) => Some((namespace, memo.finalize())),
                Domain::Plain(_) => None,
            })
            .collect();
        outcomes.sort_by(|a, b| a.0.cmp(&b.0));
        outcomes
    }
}
