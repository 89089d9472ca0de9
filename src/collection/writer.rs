use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::request::ExecutedRequest;

use super::{group::group_by_status, model::Collection};

pub const MANIFEST_FILE: &str = ".dex-collections.json";

const FILE_PREFIX: &str = "collection_status_";
const FILE_SUFFIX: &str = ".json";

pub fn collection_file_name(status: u16) -> String {
    format!("{FILE_PREFIX}{status}{FILE_SUFFIX}")
}

/// Status code of a bare `collection_status_<code>.json` name. Anything with a
/// directory component or another shape is rejected.
fn status_of_file_name(name: &str) -> Option<u16> {
    if Path::new(name).file_name() != Some(OsStr::new(name)) {
        return None;
    }
    let status: u16 = name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)?
        .parse()
        .ok()?;
    (collection_file_name(status) == name).then_some(status)
}

/// File names written by the previous export, relative to the output directory.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    files: Vec<String>,
}

/// Writes one collection file per status code and tracks what it wrote so the
/// next export can remove it.
#[derive(Debug, Clone)]
pub struct CollectionExporter {
    output_dir: PathBuf,
}

impl CollectionExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILE)
    }

    /// Deletes every collection file listed in the manifest, then the manifest
    /// itself. Entries that are not collection file names are skipped, and an
    /// unreadable manifest is treated as empty.
    pub fn remove_previous(&self) -> Result<Vec<PathBuf>> {
        let manifest_path = self.manifest_path();
        let contents = match fs::read_to_string(&manifest_path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading manifest {}", manifest_path.display()))
            }
        };
        let manifest: Manifest = serde_json::from_str(&contents).unwrap_or_else(|err| {
            warn!(path = %manifest_path.display(), "ignoring corrupt manifest: {err}");
            Manifest::default()
        });

        let mut removed = Vec::new();
        for name in manifest.files {
            if status_of_file_name(&name).is_none() {
                warn!(entry = %name, "skipping manifest entry that is not a collection file");
                continue;
            }
            let path = self.output_dir.join(&name);
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "removed stale collection");
                    removed.push(path);
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(err).with_context(|| format!("removing {}", path.display()))
                }
            }
        }

        fs::remove_file(&manifest_path)
            .with_context(|| format!("removing manifest {}", manifest_path.display()))?;
        Ok(removed)
    }

    /// Replaces the previous snapshot with one collection per status code.
    ///
    /// The manifest naming every target is written before any collection, so
    /// an export that fails halfway is still cleaned up by the next one.
    pub fn export(&self, requests: &[ExecutedRequest]) -> Result<Vec<PathBuf>> {
        let groups = group_by_status(requests).context("grouping requests by status code")?;

        self.remove_previous()?;
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("creating output directory {}", self.output_dir.display())
        })?;

        let manifest = Manifest {
            files: groups
                .iter()
                .map(|group| collection_file_name(group.status))
                .collect(),
        };
        write_pretty_json(&self.manifest_path(), &manifest)?;

        let mut written = Vec::with_capacity(groups.len());
        for (group, name) in groups.iter().zip(&manifest.files) {
            let collection = Collection::new(
                Collection::for_status(group.status),
                group.requests.iter().map(|request| request.descriptor()),
            );
            let path = self.output_dir.join(name);
            write_pretty_json(&path, &collection)?;
            debug!(path = %path.display(), items = collection.item.len(), "wrote collection");
            written.push(path);
        }

        Ok(written)
    }
}

fn write_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .with_context(|| format!("serializing {}", path.display()))?;
    fs::write(path, buffer).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::fixtures;
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn read_collection(path: &Path) -> Result<Collection> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    #[test]
    fn writes_one_file_per_status() -> Result<()> {
        let temp = tempdir()?;
        let exporter = CollectionExporter::new(temp.path());
        let requests = vec![
            fixtures::executed("/a", 200, 5),
            fixtures::executed("/missing", 404, 5),
            fixtures::executed("/api/v1/b/", 200, 5),
        ];

        let written = exporter.export(&requests)?;
        assert_eq!(
            written,
            vec![
                temp.path().join("collection_status_200.json"),
                temp.path().join("collection_status_404.json"),
            ]
        );

        let ok = read_collection(&written[0])?;
        assert_eq!(ok.info.name, "Status Code 200 Collection");
        assert_eq!(ok.item.len(), 2);
        assert_eq!(ok.item[0].request.url.path, vec!["a"]);
        assert_eq!(ok.item[1].request.url.path, vec!["api", "v1", "b"]);

        let missing = read_collection(&written[1])?;
        assert_eq!(missing.item.len(), 1);
        Ok(())
    }

    #[test]
    fn uses_four_space_indentation() -> Result<()> {
        let temp = tempdir()?;
        let exporter = CollectionExporter::new(temp.path());
        let written = exporter.export(&[fixtures::executed("/a", 201, 5)])?;
        let contents = fs::read_to_string(&written[0])?;
        assert!(contents.starts_with("{\n    \"info\": {\n        \"name\""));
        Ok(())
    }

    #[test]
    fn export_replaces_previous_snapshot() -> Result<()> {
        let temp = tempdir()?;
        let exporter = CollectionExporter::new(temp.path());

        exporter.export(&[
            fixtures::executed("/a", 200, 5),
            fixtures::executed("/b", 500, 5),
        ])?;
        assert!(temp.path().join("collection_status_500.json").exists());

        let unrelated = temp.path().join("collection_status_999.json");
        fs::write(&unrelated, "{}")?;

        let written = exporter.export(&[fixtures::executed("/c", 404, 5)])?;
        assert_eq!(written, vec![temp.path().join("collection_status_404.json")]);
        assert!(!temp.path().join("collection_status_200.json").exists());
        assert!(!temp.path().join("collection_status_500.json").exists());
        assert!(unrelated.exists(), "files outside the manifest are left alone");
        Ok(())
    }

    #[test]
    fn remove_previous_without_manifest_is_noop() -> Result<()> {
        let temp = tempdir()?;
        let exporter = CollectionExporter::new(temp.path());
        assert!(exporter.remove_previous()?.is_empty());
        Ok(())
    }

    #[test]
    fn remove_previous_tolerates_missing_files() -> Result<()> {
        let temp = tempdir()?;
        let exporter = CollectionExporter::new(temp.path());
        let written = exporter.export(&[
            fixtures::executed("/a", 200, 5),
            fixtures::executed("/b", 302, 5),
        ])?;
        fs::remove_file(&written[0])?;

        let removed = exporter.remove_previous()?;
        assert_eq!(removed, vec![written[1].clone()]);
        assert!(!temp.path().join(MANIFEST_FILE).exists());
        Ok(())
    }

    #[test]
    fn remove_previous_ignores_entries_outside_output_dir() -> Result<()> {
        let temp = tempdir()?;
        let out = temp.path().join("out");
        fs::create_dir_all(&out)?;
        let outside = temp.path().join("keep.txt");
        fs::write(&outside, "keep")?;
        let absolute = temp.path().join("collection_status_200.json");
        fs::write(&absolute, "{}")?;
        let listed = out.join("collection_status_201.json");
        fs::write(&listed, "{}")?;
        let unrelated = out.join("notes.json");
        fs::write(&unrelated, "{}")?;

        let manifest = serde_json::json!({
            "files": [
                "../keep.txt",
                absolute.display().to_string(),
                "sub/collection_status_200.json",
                "notes.json",
                "collection_status_99999.json",
                "collection_status_201.json",
            ]
        });
        fs::write(out.join(MANIFEST_FILE), manifest.to_string())?;

        let removed = CollectionExporter::new(&out).remove_previous()?;
        assert_eq!(removed, vec![listed]);
        assert!(outside.exists());
        assert!(absolute.exists());
        assert!(unrelated.exists());
        Ok(())
    }

    #[test]
    fn corrupt_manifest_is_treated_as_empty() -> Result<()> {
        let temp = tempdir()?;
        let exporter = CollectionExporter::new(temp.path());
        fs::write(temp.path().join(MANIFEST_FILE), "{not json")?;

        assert!(exporter.remove_previous()?.is_empty());
        assert!(!temp.path().join(MANIFEST_FILE).exists());

        let written = exporter.export(&[fixtures::executed("/a", 200, 5)])?;
        assert_eq!(written.len(), 1);
        Ok(())
    }

    #[test]
    fn failed_export_is_cleaned_up_by_next_export() -> Result<()> {
        let temp = tempdir()?;
        let exporter = CollectionExporter::new(temp.path());
        let blocker = temp.path().join("collection_status_404.json");
        fs::create_dir(&blocker)?;

        let result = exporter.export(&[
            fixtures::executed("/a", 200, 5),
            fixtures::executed("/b", 404, 5),
        ]);
        assert!(result.is_err());
        assert!(temp.path().join("collection_status_200.json").exists());

        fs::remove_dir(&blocker)?;
        let written = exporter.export(&[fixtures::executed("/c", 500, 5)])?;
        assert_eq!(written, vec![temp.path().join("collection_status_500.json")]);
        assert!(!temp.path().join("collection_status_200.json").exists());
        Ok(())
    }

    #[test]
    fn only_bare_collection_names_carry_a_status() {
        assert_eq!(status_of_file_name("collection_status_404.json"), Some(404));
        assert_eq!(status_of_file_name("../collection_status_404.json"), None);
        assert_eq!(status_of_file_name("collection_status_+404.json"), None);
        assert_eq!(status_of_file_name("collection_status_.json"), None);
        assert_eq!(status_of_file_name("requests.log"), None);
    }
}
