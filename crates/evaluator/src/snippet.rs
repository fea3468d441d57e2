use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const SNIPPET_FILE_NAME: &str = "snippet.py";

/// Submitted code written to `snippet.py` inside a private temporary directory.
///
/// The directory doubles as the working directory of every process that runs
/// the snippet, and is removed when the `Snippet` is dropped.
#[derive(Debug)]
pub struct Snippet {
    dir: TempDir,
    path: PathBuf,
}

impl Snippet {
    pub async fn write(code: &str) -> std::io::Result<Self> {
        let dir = tokio::task::spawn_blocking(|| tempfile::Builder::new().prefix("snippet-").tempdir())
            .await
            .map_err(std::io::Error::other)??;
        let path = dir.path().join(SNIPPET_FILE_NAME);
        tokio::fs::write(&path, code.as_bytes()).await?;

        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Reads the snippet back from disk.
    pub async fn read_source(&self) -> std::io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }

    /// Writes an extra file next to the snippet and returns its path.
    pub async fn write_companion(&self, file_name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(file_name);
        tokio::fs::write(&path, contents.as_bytes()).await?;
        Ok(path)
    }
}

/// Decodes uploaded source as UTF-8, dropping any invalid byte sequences.
pub fn decode_source(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_read_back() {
        let snippet = Snippet::write("print('hi')\n").await.unwrap();
        assert!(snippet.path().ends_with(SNIPPET_FILE_NAME));
        assert_eq!(snippet.read_source().await.unwrap(), "print('hi')\n");
    }

    #[tokio::test]
    async fn test_directory_removed_on_drop() {
        let snippet = Snippet::write("x = 1").await.unwrap();
        let dir = snippet.dir().to_path_buf();
        let companion = snippet.write_companion("harness.py", "pass").await.unwrap();
        assert!(companion.starts_with(&dir));
        assert_eq!(tokio::fs::read_to_string(&companion).await.unwrap(), "pass");

        drop(snippet);
        assert!(!dir.exists());
    }

    #[test]
    fn test_decode_source_drops_invalid_bytes() {
        assert_eq!(decode_source(b"print('a\xffb')\n"), "print('ab')\n");
        assert_eq!(decode_source("caf\u{e9} = 1".as_bytes()), "caf\u{e9} = 1");
        // Truncated multi-byte sequence at the end
        assert_eq!(decode_source(b"x = 1\n\xe2\x82"), "x = 1\n");
        assert!(!decode_source(b"\xfe\xff").contains('\u{fffd}'));
    }
}
