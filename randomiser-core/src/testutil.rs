use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::materialize::Materializer;

pub(crate) struct Fixture {
    _temp: TempDir,
    pub io: Materializer,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let io = Materializer::new(temp.path().join("in"), temp.path().join("out"));
        fs::create_dir_all(io.input_root()).unwrap();
        Self { _temp: temp, io }
    }

    pub fn put(&self, rel: &str, contents: impl AsRef<[u8]>) {
        let path = self.io.input_path(Path::new(rel));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn put_json(&self, rel: &str, doc: &Value) {
        self.put(rel, serde_json::to_vec(doc).unwrap());
    }

    pub fn mkdir(&self, rel: &str) {
        fs::create_dir_all(self.io.input_path(Path::new(rel))).unwrap();
    }

    /// Every file under the output root, relative to it, sorted.
    pub fn output_files(&self) -> Vec<PathBuf> {
        let root = self.io.output_root();
        if !root.exists() {
            return Vec::new();
        }
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
            .collect();
        files.sort();
        files
    }

    pub fn output_bytes(&self, rel: impl AsRef<Path>) -> Vec<u8> {
        fs::read(self.io.output_path(rel.as_ref())).unwrap()
    }

    pub fn output_json(&self, rel: impl AsRef<Path>) -> Value {
        serde_json::from_slice(&self.output_bytes(rel)).unwrap()
    }
}
