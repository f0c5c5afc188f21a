// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Loads the ANAD corpus from a three-level directory tree:
//
//   root/
//     └── platform/          (e.g. a news outlet)
//           └── topic/       (e.g. الرياضة)
//                 └── *.txt  (one UTF-8 article per file)
//
// Every .txt file becomes one Article record tagged with the
// platform and topic directories it was found under. Directory
// listings are sorted by name before traversal so the corpus is
// identical on every platform — the prefix cap below depends on
// discovery order being stable.
//
// After the walk the table is truncated to `max_articles` rows.
// This is a hard cap, not a sample: whichever records were
// discovered first are the ones kept.
//
// Reference: Rust Book §8 (Collections)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::article::Article;
use crate::domain::traits::ArticleSource;

/// Walks the corpus tree and materialises the article table.
/// Implements the ArticleSource trait from Layer 3.
pub struct CorpusLoader {
    /// Path to the corpus root directory
    root: PathBuf,

    /// Maximum number of articles kept (prefix cap)
    max_articles: usize,
}

impl CorpusLoader {
    /// Create a new CorpusLoader pointed at a corpus root.
    pub fn new(root: impl Into<PathBuf>, max_articles: usize) -> Self {
        Self { root: root.into(), max_articles }
    }
}

impl ArticleSource for CorpusLoader {
    fn load_all(&self) -> Result<Vec<Article>> {
        // A missing corpus root is a configuration error, not an
        // empty corpus — fail loudly instead of training on nothing.
        let mut articles = Vec::new();

        for platform_dir in sorted_entries(&self.root)? {
            if !platform_dir.is_dir() {
                continue;
            }
            let platform = dir_name(&platform_dir);

            for topic_dir in sorted_entries(&platform_dir)? {
                if !topic_dir.is_dir() {
                    continue;
                }
                let topic = dir_name(&topic_dir);

                for file in sorted_entries(&topic_dir)? {
                    if file.extension().and_then(|e| e.to_str()) != Some("txt") {
                        continue;
                    }
                    // Unreadable or non-UTF-8 files are skipped with a
                    // warning rather than aborting the whole run.
                    match fs::read_to_string(&file) {
                        Ok(content) => {
                            articles.push(Article::new(
                                platform.clone(),
                                topic.clone(),
                                content,
                            ));
                        }
                        Err(e) => {
                            tracing::warn!("Skipping '{}': {}", file.display(), e);
                        }
                    }
                }
            }
        }

        tracing::info!("Discovered {} articles", articles.len());

        // Prefix cap: keep the first `max_articles` in discovery order.
        if articles.len() > self.max_articles {
            articles.truncate(self.max_articles);
            tracing::info!("Corpus capped at {} articles", self.max_articles);
        }

        Ok(articles)
    }
}

/// List a directory's entries sorted by file name.
/// Sorting makes traversal order, and therefore the prefix cap,
/// deterministic across file systems.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|e| e.path())
        .collect();
    entries.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(entries)
}

/// Final path component as an owned String (lossy for non-UTF-8 names).
fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Build root/platform/topic/name.txt with the given content.
    fn write_article(root: &Path, platform: &str, topic: &str, name: &str, content: &str) {
        let dir = root.join(platform).join(topic);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_loads_all_fields() {
        let tmp = TempDir::new().unwrap();
        write_article(tmp.path(), "الشرق", "الرياضة", "a.txt", "محتوى المقال الأول");

        let loader = CorpusLoader::new(tmp.path(), 49_000);
        let articles = loader.load_all().unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].platform, "الشرق");
        assert_eq!(articles[0].topic, "الرياضة");
        // Full file content, no implicit truncation at load time
        assert_eq!(articles[0].content, "محتوى المقال الأول");
    }

    #[test]
    fn test_ignores_non_txt_files() {
        let tmp = TempDir::new().unwrap();
        write_article(tmp.path(), "p", "t", "a.txt", "kept");
        write_article(tmp.path(), "p", "t", "b.csv", "ignored");
        write_article(tmp.path(), "p", "t", "c.md", "ignored");

        let loader = CorpusLoader::new(tmp.path(), 49_000);
        assert_eq!(loader.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_prefix_cap_keeps_first_in_sorted_order() {
        let tmp = TempDir::new().unwrap();
        for i in 0..6 {
            write_article(tmp.path(), "p", "t", &format!("{i}.txt"), &format!("article {i}"));
        }

        let loader = CorpusLoader::new(tmp.path(), 4);
        let articles = loader.load_all().unwrap();

        assert_eq!(articles.len(), 4);
        // Listings are sorted, so the cap keeps 0.txt through 3.txt
        assert_eq!(articles[0].content, "article 0");
        assert_eq!(articles[3].content, "article 3");
    }

    #[test]
    fn test_walks_multiple_platforms_and_topics() {
        let tmp = TempDir::new().unwrap();
        write_article(tmp.path(), "alpha", "sports", "a.txt", "1");
        write_article(tmp.path(), "alpha", "tech", "b.txt", "2");
        write_article(tmp.path(), "beta", "sports", "c.txt", "3");

        let loader = CorpusLoader::new(tmp.path(), 49_000);
        let articles = loader.load_all().unwrap();

        assert_eq!(articles.len(), 3);
        // Sorted platform order: alpha before beta
        assert_eq!(articles[0].platform, "alpha");
        assert_eq!(articles[2].platform, "beta");
    }

    #[test]
    fn test_skips_undecodable_file() {
        let tmp = TempDir::new().unwrap();
        write_article(tmp.path(), "p", "t", "good.txt", "ok");
        let bad = tmp.path().join("p").join("t").join("bad.txt");
        fs::write(&bad, [0xff, 0xfe, 0xfd]).unwrap();

        let loader = CorpusLoader::new(tmp.path(), 49_000);
        let articles = loader.load_all().unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].content, "ok");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let loader = CorpusLoader::new("/definitely/not/a/real/corpus", 49_000);
        assert!(loader.load_all().is_err());
    }
}
