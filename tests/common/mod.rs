//! Shared test utilities for integration and E2E tests.
//!
//! The fixture builds a real brain repository and a real consumer
//! repository in temp directories, mirroring how the tool is used: the
//! brain commits shared files, the consumer declares a `.neurons`
//! descriptor pointing at it over a `file://` URL.

use std::path::{Path, PathBuf};
use std::process::Command;

use assert_fs::prelude::*;

/// Run a git command in `dir`, panicking on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initialize a repository on branch `main` with a test identity.
#[allow(dead_code)]
pub fn init_repo(dir: &Path) {
    git(dir, &["init", "-b", "main"]);
    git(dir, &["config", "user.email", "test@test.invalid"]);
    git(dir, &["config", "user.name", "Test"]);
}

/// A brain repository plus a consumer repository wired to it.
pub struct BrainFixture {
    pub temp: assert_fs::TempDir,
    pub brain: PathBuf,
    pub consumer: PathBuf,
}

#[allow(dead_code)]
impl BrainFixture {
    /// Build a brain with the standard test content and an empty consumer.
    ///
    /// Brain contents:
    /// - `utils/common.py` = "v1\n"
    /// - `pkgs/` with `pkgsrequirements.txt` (numpy pin) and a data file
    /// - `.brain` descriptor exporting everything readonly
    pub fn new() -> Self {
        let temp = assert_fs::TempDir::new().expect("temp dir");
        let brain = temp.path().join("brain");
        let consumer = temp.path().join("consumer");
        std::fs::create_dir_all(&brain).unwrap();
        std::fs::create_dir_all(&consumer).unwrap();

        init_repo(&brain);
        temp.child("brain/.brain")
            .write_str("[BRAIN]\nID = our-lib\n\n[EXPORT]\n* = readwrite\n")
            .unwrap();
        temp.child("brain/utils/common.py").write_str("v1\n").unwrap();
        temp.child("brain/pkgs/data.txt").write_str("data\n").unwrap();
        temp.child("brain/pkgs/pkgsrequirements.txt")
            .write_str("numpy==1.22.0\n")
            .unwrap();
        git(&brain, &["add", "."]);
        git(&brain, &["commit", "-m", "brain v1"]);

        init_repo(&consumer);

        Self {
            temp,
            brain,
            consumer,
        }
    }

    /// `file://` URL of the brain repository.
    pub fn brain_url(&self) -> String {
        format!("file://{}", self.brain.display())
    }

    /// Write a `.neurons` file in the consumer with the given policy lines
    /// and mapping lines.
    pub fn write_neurons(&self, policy: &str, mappings: &str) {
        let content = format!(
            "[BRAIN:our-lib]\nREMOTE = {}\nBRANCH = main\n\n[SYNC_POLICY]\n{}\n[MAP]\n{}",
            self.brain_url(),
            policy,
            mappings
        );
        std::fs::write(self.consumer.join(".neurons"), content).unwrap();
    }

    /// Commit everything currently in the consumer tree.
    pub fn commit_consumer(&self, message: &str) {
        git(&self.consumer, &["add", "."]);
        git(&self.consumer, &["commit", "-m", message]);
    }

    /// Update a file in the brain and commit it.
    pub fn update_brain_file(&self, rel: &str, content: &str, message: &str) {
        let path = self.brain.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        git(&self.brain, &["add", "."]);
        git(&self.brain, &["commit", "-m", message]);
    }

    /// Command for the binary, running inside the consumer repo.
    ///
    /// A commit identity is provided through the environment so commits
    /// made inside temp clones work without global git configuration.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("git-brain").expect("binary built");
        cmd.current_dir(&self.consumer)
            .env("GIT_AUTHOR_NAME", "Test")
            .env("GIT_AUTHOR_EMAIL", "test@test.invalid")
            .env("GIT_COMMITTER_NAME", "Test")
            .env("GIT_COMMITTER_EMAIL", "test@test.invalid");
        cmd
    }

    /// Read a consumer file as text.
    pub fn consumer_file(&self, rel: &str) -> String {
        std::fs::read_to_string(self.consumer.join(rel))
            .unwrap_or_else(|e| panic!("reading {}: {}", rel, e))
    }
}

impl Default for BrainFixture {
    fn default() -> Self {
        Self::new()
    }
}
