use async_trait::async_trait;
use depot_core::{
    files::{FolderLister, NetworkError},
    FileManager, FileManagerConfig, RemoteFetcher,
};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tempfile::TempDir;

struct NoNetwork;

#[async_trait]
impl RemoteFetcher for NoNetwork {
    async fn fetch(&self, url: &str) -> Result<String, NetworkError> {
        Err(NetworkError::Request {
            url: url.to_string(),
            reason: "network disabled in tests".to_string(),
        })
    }
}

fn create_manager(dir: &TempDir) -> FileManager {
    let config = FileManagerConfig {
        upload_folder: dir.path().join("uploads"),
        ..FileManagerConfig::default()
    };
    FileManager::new(config, Arc::new(NoNetwork))
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "x").unwrap();
}

#[tokio::test]
async fn test_later_root_used_when_first_has_no_match() {
    let dir = TempDir::new().unwrap();
    let root1 = dir.path().join("root1");
    let root2 = dir.path().join("root2");
    touch(&root1.join("other.txt"));
    touch(&root2.join("sub/foo.txt"));

    let manager = create_manager(&dir);
    let found = manager.search_file(&[&root1, &root2], "foo.txt").await.unwrap();

    assert_eq!(found, Some(root2.join("sub/foo.txt")));
}

#[tokio::test]
async fn test_no_match_is_none() {
    let dir = TempDir::new().unwrap();
    let root1 = dir.path().join("root1");
    let root2 = dir.path().join("root2");
    touch(&root1.join("barfoo.txt"));
    touch(&root2.join("foo.txt.bak/readme"));

    let manager = create_manager(&dir);
    let found = manager
        .search_file(&[&root1, &root2, &dir.path().join("absent")], "nothing.txt")
        .await
        .unwrap();

    assert_eq!(found, None);
}

#[tokio::test]
async fn test_match_requires_separator_before_name() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    touch(&root.join("a/barfoo.txt"));
    touch(&root.join("b/foo.txt"));

    let manager = create_manager(&dir);

    for query in ["foo.txt", "/foo.txt", "///foo.txt"] {
        let found = manager.search_file(&[&root], query).await.unwrap();
        assert_eq!(found, Some(root.join("b/foo.txt")), "query {:?}", query);
    }
}

#[tokio::test]
async fn test_substring_match_and_directories_skipped() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    fs::create_dir_all(root.join("a/foo.txt.d")).unwrap();
    touch(&root.join("b/foo.txt.bak"));

    let manager = create_manager(&dir);
    let found = manager.search_file(&[&root], "foo.txt").await.unwrap();

    assert_eq!(found, Some(root.join("b/foo.txt.bak")));
}

#[tokio::test]
async fn test_first_root_wins_over_later_exact_match() {
    let dir = TempDir::new().unwrap();
    let root1 = dir.path().join("root1");
    let root2 = dir.path().join("root2");
    touch(&root1.join("deep/nested/report.csv.old"));
    touch(&root2.join("report.csv"));

    let manager = create_manager(&dir);
    let found = manager.search_file(&[&root1, &root2], "report.csv").await.unwrap();

    assert_eq!(found, Some(root1.join("deep/nested/report.csv.old")));
}

struct RecordingLister {
    entries: Vec<PathBuf>,
    calls: Mutex<Vec<(PathBuf, Option<usize>, bool)>>,
}

impl FolderLister for RecordingLister {
    fn list_contents(
        &self,
        root: &Path,
        depth: Option<usize>,
        name_filter: Option<&str>,
        ext_filter: Option<&str>,
        include_dirs: bool,
    ) -> Vec<PathBuf> {
        assert!(name_filter.is_none());
        assert!(ext_filter.is_none());
        self.calls
            .lock()
            .unwrap()
            .push((root.to_path_buf(), depth, include_dirs));
        self.entries.clone()
    }
}

#[tokio::test]
async fn test_lister_called_unbounded_with_directories() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    touch(&root.join("first/data.txt"));
    touch(&root.join("second/data.txt"));

    let lister = Arc::new(RecordingLister {
        entries: vec![
            root.join("second"),
            root.join("second/data.txt"),
            root.join("first/data.txt"),
        ],
        calls: Mutex::new(Vec::new()),
    });

    let manager = create_manager(&dir).with_lister(lister.clone());
    let found = manager.search_file(&[&root], "data.txt").await.unwrap();

    assert_eq!(found, Some(root.join("second/data.txt")));
    assert_eq!(*lister.calls.lock().unwrap(), vec![(root.clone(), None, true)]);
}
