use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory holding captured terminal output for a test
pub struct TestFixtures {
    dir: TempDir,
}

impl TestFixtures {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create fixture directory")?;
        Ok(Self { dir })
    }

    /// Write `content` to `name` inside the fixture directory
    pub fn create_test_file(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write fixture: {}", path.display()))?;
        Ok(path)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Terminal output samples
pub mod data {
    pub const HELLO_WORLD: &str = "Hello, World!\n";

    pub const UNICODE_TEST: &str = "🦀 Rust 日本語 العربية\n";

    pub const ANSI_COLORS: &str = "\x1b[31mRed\x1b[0m \x1b[32mGreen\x1b[0m \x1b[34mBlue\x1b[0m\n";

    /// Progress output that redraws its line with carriage returns
    pub const PROGRESS: &str = "Downloading  10%\rDownloading  50%\rDownloading 100%\x1b[K\nDone\n";

    /// OSC link element terminated by BEL
    pub fn link_sequence(url: &str, content: &str) -> String {
        format!("\x1b]1339;url={url};content={content}\x07")
    }

    /// OSC external image element terminated by BEL
    pub fn external_image_sequence(url: &str, alt: &str) -> String {
        format!("\x1b]1338;url={url};alt={alt}\x07")
    }

    /// OSC inline image element; `name` and `content` must already be base64
    pub fn inline_image_sequence(name: &str, content: &str) -> String {
        format!("\x1b]1337;File=name={name};inline=1:{content}\x07")
    }

    /// `count` numbered lines joined by `\n`, without a trailing newline
    pub fn generate_text_lines(count: usize) -> String {
        (0..count)
            .map(|i| format!("Line {i}: The quick brown fox jumps over the lazy dog"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
