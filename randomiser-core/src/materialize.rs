use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{RandomiserError, Result};

/// Reads from the input tree and writes to the output tree. Every path
/// handed to it is relative; reads resolve against `input_root` and writes
/// against `output_root`.
#[derive(Debug, Clone)]
pub struct Materializer {
    input_root: PathBuf,
    output_root: PathBuf,
}

impl Materializer {
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
        }
    }

    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn input_path(&self, rel: &Path) -> PathBuf {
        self.input_root.join(rel)
    }

    pub fn output_path(&self, rel: &Path) -> PathBuf {
        self.output_root.join(rel)
    }

    pub fn read_bytes(&self, rel: &Path) -> Result<Vec<u8>> {
        Ok(fs::read(self.input_path(rel))?)
    }

    pub fn read_json(&self, rel: &Path) -> Result<Value> {
        let bytes = self.read_bytes(rel)?;
        serde_json::from_slice(&bytes).map_err(|source| RandomiserError::Json {
            path: rel.to_path_buf(),
            source,
        })
    }

    pub fn write_json(&self, rel: &Path, doc: &Value) -> Result<()> {
        let data = serde_json::to_vec(doc).map_err(|source| RandomiserError::Json {
            path: rel.to_path_buf(),
            source,
        })?;
        let dest = self.prepare_output(rel)?;
        fs::write(dest, data)?;
        Ok(())
    }

    pub fn copy_bytes(&self, src_rel: &Path, dest_rel: &Path) -> Result<()> {
        let dest = self.prepare_output(dest_rel)?;
        fs::copy(self.input_path(src_rel), dest)?;
        tracing::debug!(src = %src_rel.display(), dest = %dest_rel.display(), "copied");
        Ok(())
    }

    pub(crate) fn prepare_output(&self, rel: &Path) -> Result<PathBuf> {
        let dest = self.output_path(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Materializer) {
        let temp = TempDir::new().unwrap();
        let io = Materializer::new(temp.path().join("in"), temp.path().join("out"));
        fs::create_dir_all(io.input_root()).unwrap();
        (temp, io)
    }

    #[test]
    fn writes_json_into_fresh_directories() {
        let (_temp, io) = setup();
        let rel = Path::new("a/b/c.json");
        io.write_json(rel, &json!({"k": [1, 2]})).unwrap();
        // Writing again into the now-existing directory is fine.
        io.write_json(rel, &json!({"k": [3]})).unwrap();

        let written: Value = serde_json::from_slice(&fs::read(io.output_path(rel)).unwrap()).unwrap();
        assert_eq!(written, json!({"k": [3]}));
    }

    #[test]
    fn copies_bytes_verbatim() {
        let (_temp, io) = setup();
        fs::write(io.input_path(Path::new("x.bin")), [0u8, 159, 146, 150]).unwrap();
        io.copy_bytes(Path::new("x.bin"), Path::new("deep/y.bin")).unwrap();
        assert_eq!(
            fs::read(io.output_path(Path::new("deep/y.bin"))).unwrap(),
            vec![0u8, 159, 146, 150]
        );
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let (_temp, io) = setup();
        fs::write(io.input_path(Path::new("bad.json")), "{not json").unwrap();
        let err = io.read_json(Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, RandomiserError::Json { .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let (_temp, io) = setup();
        match io.read_json(Path::new("missing.json")).unwrap_err() {
            RandomiserError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }
}
