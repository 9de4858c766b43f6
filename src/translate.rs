//! Memoized translation lookups
//!
//! [`TranslationMemoizer`] sits in front of whichever translator serves a
//! namespace. Hits are answered from the [`CacheStore`]; misses go to the
//! override translator registered for the namespace, or else to a catalog
//! imported lazily from the source file on the first miss.

use crate::cache::{CacheContext, CacheKey, CacheStore, FinalizeOutcome};
use crate::error::PomodoroResult;
use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Something that can translate singular and plural messages
pub trait Translator {
    fn translate(&self, text: &str, context: Option<&str>) -> String;

    fn translate_plural(
        &self,
        singular: &str,
        plural: &str,
        count: i64,
        context: Option<&str>,
    ) -> String;
}

/// Parses a message catalog file into a [`Translator`]
pub trait CatalogLoader {
    fn import_from_file(&self, path: &Path) -> PomodoroResult<Box<dyn Translator>>;
}

/// Pick the plural form for `count`
///
/// Only an absolute count of one selects the singular form.
pub fn select_form<'a>(singular: &'a str, plural: &'a str, count: i64) -> &'a str {
    if count.unsigned_abs() == 1 {
        singular
    } else {
        plural
    }
}

/// Arguments of one lookup call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Singular {
        text: &'a str,
        context: Option<&'a str>,
    },
    Plural {
        singular: &'a str,
        plural: &'a str,
        count: i64,
        context: Option<&'a str>,
    },
}

impl<'a> Lookup<'a> {
    pub fn singular(text: &'a str, context: Option<&'a str>) -> Self {
        Self::Singular { text, context }
    }

    pub fn plural(singular: &'a str, plural: &'a str, count: i64, context: Option<&'a str>) -> Self {
        Self::Plural {
            singular,
            plural,
            count,
            context,
        }
    }

    /// Source text this lookup resolves, after plural form selection
    pub fn selected(&self) -> &'a str {
        match *self {
            Self::Singular { text, .. } => text,
            Self::Plural {
                singular,
                plural,
                count,
                ..
            } => select_form(singular, plural, count),
        }
    }

    /// Cache key of this lookup within `namespace`
    ///
    /// Plural keys cover the selected form and the count, not both forms.
    pub fn key(&self, namespace: &str) -> CacheKey {
        match *self {
            Self::Singular { text, context } => CacheKey::compute(&(text, context), namespace),
            Self::Plural { count, context, .. } => {
                CacheKey::compute(&(self.selected(), count, context), namespace)
            }
        }
    }

    fn resolve_with(&self, translator: &dyn Translator) -> String {
        match *self {
            Self::Singular { text, context } => translator.translate(text, context),
            Self::Plural {
                singular,
                plural,
                count,
                context,
            } => translator.translate_plural(singular, plural, count, context),
        }
    }
}

enum Delegate {
    Override(Box<dyn Translator>),
    Catalog {
        loader: Box<dyn CatalogLoader>,
        source: PathBuf,
        catalog: OnceCell<Option<Box<dyn Translator>>>,
    },
}

impl Delegate {
    /// Translate a miss. `None` means no translator was available.
    fn resolve(&self, lookup: &Lookup<'_>, namespace: &str) -> Option<String> {
        match self {
            Self::Override(translator) => Some(lookup.resolve_with(translator.as_ref())),
            Self::Catalog {
                loader,
                source,
                catalog,
            } => {
                let catalog = catalog.get_or_init(|| {
                    debug!("Importing catalog {} for {}", source.display(), namespace);
                    match loader.import_from_file(source) {
                        Ok(catalog) => Some(catalog),
                        Err(e) => {
                            warn!("Catalog for {} unavailable: {}", namespace, e);
                            None
                        }
                    }
                });
                catalog
                    .as_deref()
                    .map(|translator| lookup.resolve_with(translator))
            }
        }
    }
}

/// Cached translator for one namespace and one unit of work
pub struct TranslationMemoizer {
    namespace: String,
    store: RefCell<CacheStore>,
    delegate: Delegate,
}

impl TranslationMemoizer {
    /// Open the cache for `namespace` and choose the miss delegate
    ///
    /// With an override translator the catalog at `source` is never imported.
    pub fn open(
        ctx: &CacheContext,
        source: &Path,
        namespace: &str,
        override_translator: Option<Box<dyn Translator>>,
        loader: Box<dyn CatalogLoader>,
    ) -> PomodoroResult<Self> {
        let store = CacheStore::open(ctx, source, namespace)?;
        Ok(Self::new(store, source, override_translator, loader))
    }

    /// Wrap an already opened store
    pub fn new(
        store: CacheStore,
        source: &Path,
        override_translator: Option<Box<dyn Translator>>,
        loader: Box<dyn CatalogLoader>,
    ) -> Self {
        let delegate = match override_translator {
            Some(translator) => Delegate::Override(translator),
            None => Delegate::Catalog {
                loader,
                source: source.to_path_buf(),
                catalog: OnceCell::new(),
            },
        };

        Self {
            namespace: store.namespace().to_string(),
            store: RefCell::new(store),
            delegate,
        }
    }

    /// Resolve a lookup, from cache when possible
    pub fn lookup(&self, lookup: &Lookup<'_>) -> String {
        let key = lookup.key(&self.namespace);

        if let Some(hit) = self.store.borrow().lookup(&key) {
            return hit.to_owned();
        }

        match self.delegate.resolve(lookup, &self.namespace) {
            Some(value) => {
                self.store.borrow_mut().store(key, value.clone());
                value
            }
            // Untranslated text is returned but not cached
            None => lookup.selected().to_owned(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether misses go to an override translator
    pub fn has_override(&self) -> bool {
        matches!(self.delegate, Delegate::Override(_))
    }

    /// Number of cached entries
    pub fn cached(&self) -> usize {
        self.store.borrow().len()
    }

    /// Persist the cache if needed
    pub fn finalize(self) -> FinalizeOutcome {
        self.store.into_inner().finalize()
    }
}

impl Translator for TranslationMemoizer {
    fn translate(&self, text: &str, context: Option<&str>) -> String {
        self.lookup(&Lookup::singular(text, context))
    }

    fn translate_plural(
        &self,
        singular: &str,
        plural: &str,
        count: i64,
        context: Option<&str>,
    ) -> String {
        self.lookup(&Lookup::plural(singular, plural, count, context))
    }
}

impl fmt::Debug for TranslationMemoizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationMemoizer")
            .field("namespace", &self.namespace)
            .field("store", &self.store)
            .field("override", &self.has_override())
            .finish()
    }
}
