//! Shared test utilities for the CLI end-to-end tests.
//!
//! The fixture lays out four sibling projects that share `src/events.js`,
//! each with its own source manifest, package manifest, build directory and
//! demo tree, plus a `sibling-build.yaml` tying them together.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::siblings().with_config(configs::BUILDS_OUTPUT);
//!     fixture.command().arg("build").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
    #[allow(unused_imports)]
    pub use super::{set_mtime, PROJECTS};
}

/// Sibling project names in priority order.
pub const PROJECTS: [&str; 4] = ["core", "charts", "grid", "maps"];

/// Configuration YAML snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Sub-builds that succeed without producing anything.
    pub const NO_OUTPUT: &str = r#"
projects:
  - { name: core, root: core }
  - { name: charts, root: charts }
  - { name: grid, root: grid }
  - { name: maps, root: maps }
build:
  command: "true"
bundle:
  name: suite
cleanup: ["stale-*"]
"#;

    /// Sub-builds that write `build/output/<project>.min.js`.
    pub const BUILDS_OUTPUT: &str = r#"
projects:
  - { name: core, root: core }
  - { name: charts, root: charts }
  - { name: grid, root: grid }
  - { name: maps, root: maps }
build:
  command: sh
  args:
    - "-c"
    - 'mkdir -p output && printf built > "output/$(basename "$(dirname "$(pwd)")").min.js"'
bundle:
  name: suite
cleanup: ["stale-*"]
assets:
  - from: shared/fonts
    pattern: "*.woff"
    to: ["*/demo/fonts"]
"#;

    /// The `grid` sub-build exits non-zero.
    pub const GRID_FAILS: &str = r#"
projects:
  - { name: core, root: core }
  - { name: charts, root: charts }
  - { name: grid, root: grid }
  - { name: maps, root: maps }
build:
  command: sh
  args: ["-c", 'case "$(pwd)" in */grid/build) exit 3;; esac']
bundle:
  name: suite
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "projects: [unclosed";

    /// Valid YAML without any projects.
    pub const NO_PROJECTS: &str = "projects: []\n";
}

/// A temporary workspace holding the sibling projects and the coordinator
/// configuration.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Create the four sibling projects.
    ///
    /// Every project declares `src/events.js` first and its own
    /// `src/<name>.js` second. The `events.js` copies all differ, so a sync
    /// has three files to rewrite.
    pub fn siblings() -> Self {
        let mut fixture = Self::new();
        for name in PROJECTS {
            fixture = fixture
                .with_file(&format!("{name}/src/events.js"), &format!("events_{name}();\n"))
                .with_file(&format!("{name}/src/{name}.js"), &format!("{name}();\n"))
                .with_file(
                    &format!("{name}/build/config.json"),
                    &format!(r#"{{ "src": ["../src/events.js", "../src/{name}.js"] }}"#),
                )
                .with_file(
                    &format!("{name}/package.json"),
                    "{\n  \"name\": \"lib\",\n  \"version\": \"1.2.3\"\n}\n",
                )
                .with_dir(&format!("{name}/demo/assets"))
                .with_dir(&format!("{name}/demo/fonts"));
        }
        fixture
            .with_dir("stale-demo/leftover")
            .with_file("shared/fonts/icons.woff", "font")
    }

    /// Write `sibling-build.yaml` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.with_file("sibling-build.yaml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add an empty directory.
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Read a file relative to the fixture root.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Names of the files directly inside `dir`, sorted.
    #[allow(dead_code)]
    pub fn list(&self, dir: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path().join(dir))
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A `sibling-build` command running inside the fixture, with colors
    /// disabled so stdout can be matched literally.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("sibling-build");
        cmd.current_dir(self.path())
            .env_remove("SIBLING_BUILD_CONFIG")
            .env("NO_COLOR", "1")
            .env("RUST_LOG", "info");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Set a file's modification time to a fixed offset from a base instant.
#[allow(dead_code)]
pub fn set_mtime(path: &Path, offset_secs: u64) {
    let time = std::time::SystemTime::UNIX_EPOCH
        + std::time::Duration::from_secs(1_700_000_000 + offset_secs);
    std::fs::File::options()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(time))
        .expect("Failed to set mtime");
}
