//! Inspection and pruning of the cache directory

use crate::cache::identity::{namespace_prefix, CACHE_EXTENSION, CANDIDATE_SUFFIX};
use crate::cache::{codec, CacheContext};
use crate::error::{PomodoroError, PomodoroResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Aggregate view of the cache directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub dir: PathBuf,
    pub files: usize,
    pub total_bytes: u64,
}

/// One published cache file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheFileInfo {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// A cache file that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFinding {
    pub name: String,
    pub line: Option<usize>,
    pub message: String,
}

/// Result of linting every cache file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintReport {
    pub checked: usize,
    pub findings: Vec<LintFinding>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Result of a prune
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub removed: Vec<String>,
    /// (file name, reason)
    pub failed: Vec<(String, String)>,
}

impl PruneReport {
    pub fn attempted(&self) -> usize {
        self.removed.len() + self.failed.len()
    }

    /// Turn per-file failures into an error for the caller
    pub fn into_result(self) -> PomodoroResult<Self> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(PomodoroError::PruneFailed {
                failed: self.failed.len(),
                total: self.attempted(),
            })
        }
    }
}

/// Count and size of published cache files
pub async fn stats(ctx: &CacheContext) -> PomodoroResult<CacheStats> {
    let files = list(ctx).await?;
    Ok(CacheStats {
        dir: ctx.dir().to_path_buf(),
        files: files.len(),
        total_bytes: files.iter().map(|f| f.size).sum(),
    })
}

/// Published cache files, sorted by name
pub async fn list(ctx: &CacheContext) -> PomodoroResult<Vec<CacheFileInfo>> {
    let mut out = Vec::new();

    for (name, path) in read_names(ctx.dir()).await? {
        if !is_cache_file(&name) {
            continue;
        }
        let meta = match fs::metadata(&path).await {
            Ok(meta) => meta,
            // Raced with a prune or a publish
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(PomodoroError::io(
                    format!("reading metadata of {}", path.display()),
                    e,
                ))
            }
        };
        let modified = meta
            .modified()
            .map_err(|e| PomodoroError::io(format!("reading mtime of {}", path.display()), e))?;

        out.push(CacheFileInfo {
            name,
            size: meta.len(),
            modified: DateTime::<Utc>::from(modified),
        });
    }

    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}

/// Decode every cache file and report the ones that fail
pub async fn lint(ctx: &CacheContext) -> PomodoroResult<LintReport> {
    let mut report = LintReport::default();

    for (name, path) in read_names(ctx.dir()).await? {
        if !is_cache_file(&name) {
            continue;
        }
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => {
                report.checked += 1;
                report.findings.push(LintFinding {
                    name,
                    line: None,
                    message: e.to_string(),
                });
                continue;
            }
        };
        report.checked += 1;

        match codec::decode(&bytes) {
            Ok(record) if !name.starts_with(&namespace_prefix(&record.namespace)) => {
                report.findings.push(LintFinding {
                    name,
                    line: None,
                    message: format!(
                        "namespace \"{}\" does not match file name",
                        record.namespace
                    ),
                });
            }
            Ok(_) => debug!("{} ok", name),
            Err(e) => report.findings.push(LintFinding {
                line: e.line(),
                message: e.to_string(),
                name,
            }),
        }
    }

    report.findings.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(report)
}

/// Delete cache files, optionally only those of one namespace
///
/// Cache writes are suppressed for the rest of the run so stores finalized
/// afterwards do not recreate the pruned files. Leftover `.test` candidates
/// are removed as well. A failed removal is recorded and the rest continue.
pub async fn prune(ctx: &CacheContext, namespace: Option<&str>) -> PomodoroResult<PruneReport> {
    ctx.suppression().suppress();

    let prefix = namespace.map(namespace_prefix);
    let mut report = PruneReport::default();

    for (name, path) in read_names(ctx.dir()).await? {
        if !is_cache_file(&name) && !is_candidate_file(&name) {
            continue;
        }
        if let (Some(prefix), Some(namespace)) = (&prefix, namespace) {
            if !name.starts_with(prefix.as_str()) || !records_namespace(&path, namespace).await {
                continue;
            }
        }

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed {}", path.display());
                report.removed.push(name);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!("Failed to remove {}: {}", path.display(), e);
                report.failed.push((name, e.to_string()));
            }
        }
    }

    report.removed.sort();
    info!(
        "Pruned {} cache file(s), {} failure(s)",
        report.removed.len(),
        report.failed.len()
    );
    Ok(report)
}

/// Whether the file at `path` belongs to `namespace`
///
/// Sanitized file name prefixes can collide, so the recorded namespace
/// decides. Files that cannot be read or decoded go by their prefix.
async fn records_namespace(path: &Path, namespace: &str) -> bool {
    match fs::read(path).await {
        Ok(bytes) => match codec::decode(&bytes) {
            Ok(record) => record.namespace == namespace,
            Err(_) => true,
        },
        Err(_) => true,
    }
}

fn is_cache_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == CACHE_EXTENSION)
}

fn is_candidate_file(name: &str) -> bool {
    name.strip_suffix(CANDIDATE_SUFFIX)
        .is_some_and(is_cache_file)
}

/// File names in `dir`; a missing directory has none
async fn read_names(dir: &Path) -> PomodoroResult<Vec<(String, PathBuf)>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(PomodoroError::io(
                format!("reading cache directory {}", dir.display()),
                e,
            ))
        }
    };

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| PomodoroError::io("reading cache entry", e))?
    {
        if let Some(name) = entry.file_name().to_str() {
            names.push((name.to_string(), entry.path()));
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, CacheStore};
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    async fn populated() -> (TempDir, CacheContext) {
        let temp = TempDir::new().unwrap();
        let cache_dir = temp.path().join("cache");
        std::fs::create_dir_all(&cache_dir).unwrap();
        let source = temp.path().join("fr.mo");
        std::fs::write(&source, b"catalog").unwrap();
        std::fs::File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(UNIX_EPOCH + Duration::from_secs(1000))
            .unwrap();

        let ctx = CacheContext::new(cache_dir, "site");
        for namespace in ["shop", "blog"] {
            let mut store = CacheStore::open(&ctx, &source, namespace).unwrap();
            store.store(
                CacheKey::compute(&("Hello", None::<&str>), namespace),
                "Bonjour".to_string(),
            );
            store.finalize();
        }
        (temp, ctx)
    }

    #[tokio::test]
    async fn stats_and_list() {
        let (_temp, ctx) = populated().await;
        std::fs::write(ctx.dir().join("unrelated.txt"), b"x").unwrap();

        let files = list(&ctx).await.unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].name.starts_with("blog--"));
        assert!(files[1].name.starts_with("shop--"));

        let stats = stats(&ctx).await.unwrap();
        assert_eq!(stats.files, 2);
        assert_eq!(stats.dir, ctx.dir());
        assert_eq!(stats.total_bytes, files.iter().map(|f| f.size).sum::<u64>());
    }

    #[tokio::test]
    async fn missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let ctx = CacheContext::new(temp.path().join("absent"), "site");
        assert!(list(&ctx).await.unwrap().is_empty());
        assert_eq!(stats(&ctx).await.unwrap().total_bytes, 0);
        assert!(prune(&ctx, None).await.unwrap().removed.is_empty());
    }

    #[tokio::test]
    async fn lint_reports_broken_files() {
        let (_temp, ctx) = populated().await;
        let text = format!("mtime = 1\nnamespace = \"x\"\n[entries]\n@@@ = 1\n# {}", codec::SENTINEL);
        std::fs::write(ctx.dir().join("x--broken.mocache"), text).unwrap();
        std::fs::write(ctx.dir().join("y--trunc.mocache"), b"mtime = 1\n").unwrap();

        let report = lint(&ctx).await.unwrap();
        assert_eq!(report.checked, 4);
        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.findings[0].name, "x--broken.mocache");
        assert_eq!(report.findings[0].line, Some(4));
        assert_eq!(report.findings[1].name, "y--trunc.mocache");
        assert_eq!(report.findings[1].line, None);
    }

    #[tokio::test]
    async fn lint_flags_misplaced_namespace() {
        let (_temp, ctx) = populated().await;
        let bytes = codec::encode(&codec::CacheRecord::new(1, "shop")).unwrap();
        std::fs::write(ctx.dir().join("blog--copied.mocache"), bytes).unwrap();

        let report = lint(&ctx).await.unwrap();
        assert_eq!(report.findings.len(), 1);
        assert!(report.findings[0].message.contains("does not match"));
    }

    #[tokio::test]
    async fn prune_by_namespace() {
        let (_temp, ctx) = populated().await;
        std::fs::write(ctx.dir().join("shop--leftover.mocache.test"), b"partial").unwrap();

        let report = prune(&ctx, Some("shop")).await.unwrap();
        assert_eq!(report.removed.len(), 2);
        assert!(report.failed.is_empty());

        let remaining = list(&ctx).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].name.starts_with("blog--"));
    }

    #[tokio::test]
    async fn prune_keeps_namespaces_with_same_prefix() {
        let (temp, ctx) = populated().await;
        let source = temp.path().join("fr.mo");
        for namespace in ["my shop", "my_shop"] {
            let mut store = CacheStore::open(&ctx, &source, namespace).unwrap();
            store.store(CacheKey::compute(&("Hi", None::<&str>), namespace), "Salut".into());
            store.finalize();
        }
        std::fs::write(ctx.dir().join("my_shop--partial.mocache.test"), b"partial").unwrap();

        let report = prune(&ctx, Some("my shop")).await.unwrap();
        assert_eq!(report.removed.len(), 2);
        assert!(report.removed.iter().any(|n| n == "my_shop--partial.mocache.test"));

        let left: Vec<_> = list(&ctx).await.unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(left.len(), 3);
        let survivor = left.iter().find(|n| n.starts_with("my_shop--")).unwrap();
        let record = codec::decode(&std::fs::read(ctx.dir().join(survivor)).unwrap()).unwrap();
        assert_eq!(record.namespace, "my_shop");
    }

    #[tokio::test]
    async fn prune_suppresses_later_writes() {
        let (temp, ctx) = populated().await;
        let source = temp.path().join("fr.mo");
        let mut store = CacheStore::open(&ctx, &source, "shop").unwrap();
        store.store(CacheKey::compute(&("Bye", None::<&str>), "shop"), "Salut".into());

        prune(&ctx, None).await.unwrap();
        store.finalize();

        assert!(list(&ctx).await.unwrap().is_empty());
    }

    #[test]
    fn prune_report_failures_become_error() {
        let report = PruneReport {
            removed: vec!["a--1.mocache".into()],
            failed: vec![("b--2.mocache".into(), "permission denied".into())],
        };
        match report.into_result() {
            Err(PomodoroError::PruneFailed { failed, total }) => {
                assert_eq!(failed, 1);
                assert_eq!(total, 2);
            }
            other => panic!("expected PruneFailed, got {other:?}"),
        }
    }

    #[test]
    fn file_classification() {
        assert!(is_cache_file("a--b.mocache"));
        assert!(!is_cache_file("a--b.mocache.test"));
        assert!(is_candidate_file("a--b.mocache.test"));
        assert!(!is_candidate_file("notes.test"));
    }
}
