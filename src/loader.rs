use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;
use walkdir::WalkDir;

use crate::config::CorpusConfig;
use crate::error::{Error, Result};
use crate::models::RawDocument;

/// Read every eligible file under the corpus directory.
///
/// Files are matched against `include_globs` on their path relative to the
/// corpus dir and returned sorted by path, so downstream indexing sees a
/// deterministic order. A missing or unscannable directory is fatal; an
/// unreadable individual file is skipped with a warning when
/// `skip_unreadable` is set, and fatal otherwise.
pub fn load_corpus(config: &CorpusConfig) -> Result<Vec<RawDocument>> {
    let dir = &config.dir;
    if !dir.is_dir() {
        return Err(Error::Load(format!(
            "corpus directory does not exist: {}",
            dir.display()
        )));
    }

    let include_set = build_globset(&config.include_globs)?;

    let mut walker = WalkDir::new(dir);
    if !config.recursive {
        walker = walker.max_depth(1);
    }

    let mut documents = Vec::new();

    for entry in walker {
        let entry = entry.map_err(|e| {
            Error::Load(format!("failed to scan {}: {}", dir.display(), e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(dir).unwrap_or(path);
        if !include_set.is_match(relative) {
            continue;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => documents.push(RawDocument {
                source_path: path.to_path_buf(),
                content,
            }),
            Err(e) if config.skip_unreadable => {
                warn!(path = %path.display(), error = %e, "skipping unreadable corpus file");
            }
            Err(e) => {
                return Err(Error::Load(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        }
    }

    documents.sort_by(|a, b| a.source_path.cmp(&b.source_path));

    Ok(documents)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::Config(format!("invalid include glob '{}': {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::Config(format!("invalid include globs: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn corpus_config(dir: &std::path::Path) -> CorpusConfig {
        CorpusConfig {
            dir: dir.to_path_buf(),
            ..CorpusConfig::default()
        }
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let config = corpus_config(&tmp.path().join("nope"));
        let err = load_corpus(&config).unwrap_err();
        assert!(matches!(err, Error::Load(_)));
        assert!(err.to_string().contains("corpus directory"));
    }

    #[test]
    fn test_loads_only_matching_files_sorted() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("beta.md"), "beta body").unwrap();
        fs::write(tmp.path().join("alpha.md"), "alpha body").unwrap();
        fs::write(tmp.path().join("notes.txt"), "not markdown").unwrap();

        let docs = load_corpus(&corpus_config(tmp.path())).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].source_path.ends_with("alpha.md"));
        assert!(docs[1].source_path.ends_with("beta.md"));
        assert_eq!(docs[0].content, "alpha body");
    }

    #[test]
    fn test_empty_directory_yields_no_documents() {
        let tmp = TempDir::new().unwrap();
        let docs = load_corpus(&corpus_config(tmp.path())).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_subdirectories_ignored_by_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("top.md"), "top").unwrap();
        let sub = tmp.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("deep.md"), "deep").unwrap();

        let docs = load_corpus(&corpus_config(tmp.path())).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].source_path.ends_with("top.md"));
    }

    #[test]
    fn test_recursive_descends_into_subdirectories() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("top.md"), "top").unwrap();
        let sub = tmp.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("deep.md"), "deep").unwrap();

        let config = CorpusConfig {
            recursive: true,
            ..corpus_config(tmp.path())
        };
        let docs = load_corpus(&config).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_invalid_utf8_skipped_when_configured() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("good.md"), "fine").unwrap();
        fs::write(tmp.path().join("bad.md"), [0xff, 0xfe, 0x42]).unwrap();

        let docs = load_corpus(&corpus_config(tmp.path())).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].source_path.ends_with("good.md"));
    }

    #[test]
    fn test_invalid_utf8_fatal_in_strict_mode() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.md"), [0xff, 0xfe, 0x42]).unwrap();

        let config = CorpusConfig {
            skip_unreadable: false,
            ..corpus_config(tmp.path())
        };
        let err = load_corpus(&config).unwrap_err();
        assert!(matches!(err, Error::Load(_)));
    }
}
