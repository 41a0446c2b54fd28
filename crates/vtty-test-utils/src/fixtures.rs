use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestFixtures {
    temp_dir: TempDir,
}

impl TestFixtures {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn create_test_file(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(name);
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    /// Write an executable shell script
    pub fn create_test_script(&self, name: &str, content: &str) -> Result<PathBuf> {
        let script_path = self.create_test_file(name, content.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&script_path)?.permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&script_path, perms)?;
        }

        Ok(script_path)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

// Common test data
pub mod data {
    pub const HELLO_WORLD: &str = "Hello, World!\n";

    pub const UNICODE_TEST: &str = "Rust 日本語 ñandú\n";

    pub const ANSI_COLORS: &str = "\x1b[31mRed\x1b[0m \x1b[32mGreen\x1b[0m \x1b[34mBlue\x1b[0m\n";

    /// Clear screen, home, then draw a status line on the bottom row
    pub const STATUS_LINE: &str = "\x1b[2J\x1b[H\x1b[99;1H\x1b[2K-- status --\x1b[H";

    pub fn generate_text_lines(count: usize) -> String {
        (1..=count)
            .map(|i| format!("Line {i:3}: The quick brown fox jumps over the lazy dog"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn generate_numbered_lines(count: usize) -> String {
        (1..=count).map(|i| format!("{i}\n")).collect()
    }
}
