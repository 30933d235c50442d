//! Subprocess wrapper around the `git` executable.
//!
//! Every git invocation in the crate goes through this module: the sync and
//! export engines never spawn processes or parse porcelain output themselves.
//! Commands run with a timeout (default 60 seconds) and produce typed errors
//! that preserve git's stderr.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use log::debug;
use tempfile::TempDir;

use crate::error::{Error, Result};

/// Default timeout applied to every git invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Hosts for which authentication failures get a hint appended.
const KNOWN_HOSTS: [&str; 3] = ["github.com", "gitlab.com", "bitbucket.org"];

/// Stderr fragments that suggest an authentication problem.
const AUTH_MARKERS: [&str; 6] = [
    "authentication",
    "permission denied",
    "403",
    "could not read",
    "ssh key",
    "publickey",
];

/// Raw outcome of a git invocation: exit code, stdout, stderr.
///
/// Most callers want [`run`], which turns a non-zero exit into an error.
/// `merge-file` and `diff --no-index` encode meaning in the exit code and
/// use this directly.
struct RawOutput {
    code: i32,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// Spawn git with `args`, wait up to `timeout`, and collect its output.
///
/// Stdout and stderr are drained on separate threads so a chatty child can
/// never fill a pipe and deadlock against the wait loop. On timeout the
/// child is killed and reaped.
fn spawn_and_wait(args: &[&str], cwd: Option<&Path>, timeout: Duration) -> Result<RawOutput> {
    let mut cmd = Command::new("git");
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    debug!("git {}", args.join(" "));

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::GitNotFound
        } else {
            Error::GitExecution {
                message: e.to_string(),
            }
        }
    })?;

    let mut stdout_pipe = child.stdout.take().expect("stdout was piped");
    let mut stderr_pipe = child.stderr.take().expect("stderr was piped");
    let stdout_thread = std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stdout_pipe.read_to_end(&mut buf);
        buf
    });
    let stderr_thread = std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stderr_pipe.read_to_end(&mut buf);
        buf
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait().map_err(|e| Error::GitExecution {
            message: e.to_string(),
        })? {
            Some(status) => break status,
            None => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::GitTimeout {
                        command: args.join(" "),
                        seconds: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(25));
            }
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();
    Ok(RawOutput {
        code: status.code().unwrap_or(-1),
        stdout,
        stderr,
    })
}

/// Run a git command and return stdout trimmed of trailing whitespace.
///
/// A non-zero exit becomes [`Error::GitCommand`] carrying the captured
/// stderr.
pub fn run(args: &[&str], cwd: Option<&Path>, timeout: Duration) -> Result<String> {
    let out = spawn_and_wait(args, cwd, timeout)?;
    if out.code != 0 {
        return Err(Error::GitCommand {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&out.stdout)
        .trim_end()
        .to_string())
}

/// Run a git command in `cwd` with the default timeout.
pub fn run_in(args: &[&str], cwd: &Path) -> Result<String> {
    run(args, Some(cwd), DEFAULT_TIMEOUT)
}

/// True iff `path` is inside a git working tree or a bare repository.
pub fn is_repo(path: &Path) -> bool {
    run_in(&["rev-parse", "--is-inside-work-tree"], path)
        .map(|s| s == "true")
        .unwrap_or(false)
        || is_bare(path).unwrap_or(false)
}

/// True iff `path` is inside a bare repository.
///
/// Returns `Ok(false)` for paths that are not repositories at all; the two
/// cases are distinguished by git's stderr text.
pub fn is_bare(path: &Path) -> Result<bool> {
    match run_in(&["rev-parse", "--is-bare-repository"], path) {
        Ok(s) => Ok(s == "true"),
        Err(Error::GitCommand { stderr, .. }) if stderr.contains("not a git repository") => {
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Absolute path of the repository root containing `path`.
pub fn toplevel(path: &Path) -> Result<PathBuf> {
    run_in(&["rev-parse", "--show-toplevel"], path).map(PathBuf::from)
}

/// True iff `path` is tracked by git in the repository at `cwd`.
pub fn is_tracked(path: &str, cwd: &Path) -> bool {
    run_in(&["ls-files", "--error-unmatch", path], cwd).is_ok()
}

/// True iff `path` has uncommitted changes in the repository at `cwd`.
pub fn is_modified(path: &str, cwd: &Path) -> Result<bool> {
    run_in(&["status", "--porcelain", "--", path], cwd).map(|out| !out.is_empty())
}

/// Hex hash of the blob for `path` at HEAD.
pub fn blob_hash_at_head(path: &str, cwd: &Path) -> Result<String> {
    run_in(&["rev-parse", &format!("HEAD:{}", path)], cwd)
}

/// Name of the branch currently checked out in `cwd`.
pub fn current_branch(cwd: &Path) -> Result<String> {
    run_in(&["rev-parse", "--abbrev-ref", "HEAD"], cwd)
}

/// Repo-relative paths with a non-clean porcelain status.
///
/// Porcelain quotes unusual file names in C style; the quoting is undone
/// here so callers only ever see plain paths.
pub fn changed_files(cwd: &Path) -> Result<Vec<String>> {
    let out = run_in(&["status", "--porcelain"], cwd)?;
    let mut paths = Vec::new();
    for line in out.lines() {
        if line.len() < 4 {
            continue;
        }
        // Two status columns, a space, then the path. Renames carry
        // "old -> new"; the new path is the one that exists on disk.
        let mut path = &line[3..];
        if let Some(idx) = path.find(" -> ") {
            path = &path[idx + 4..];
        }
        paths.push(unquote_porcelain(path));
    }
    Ok(paths)
}

/// Undo git's C-style quoting of a porcelain path.
fn unquote_porcelain(path: &str) -> String {
    let inner = match path.strip_prefix('"').and_then(|p| p.strip_suffix('"')) {
        Some(inner) => inner,
        None => return path.to_string(),
    };
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some(d @ '0'..='7') => {
                // Up to three octal digits encode a raw byte.
                let mut value = d as u32 - '0' as u32;
                let rest = chars.as_str();
                let mut taken = 0;
                for c2 in rest.chars().take(2) {
                    match c2.to_digit(8) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            taken += 1;
                        }
                        None => break,
                    }
                }
                for _ in 0..taken {
                    chars.next();
                }
                result.push(value as u8 as char);
            }
            Some(other) => result.push(other),
            None => break,
        }
    }
    result
}

/// Clone `url` into `target`, passing `extra_args` through to git.
pub fn clone(url: &str, target: &Path, extra_args: &[&str]) -> Result<()> {
    let target_str = target.to_string_lossy().into_owned();
    let mut args = vec!["clone"];
    args.extend_from_slice(extra_args);
    args.push(url);
    args.push(&target_str);
    run(&args, None, DEFAULT_TIMEOUT).map(|_| ())
}

/// A clone that lives in a temp directory and is removed when dropped.
///
/// Removal happens on every exit path, success or failure, because the
/// backing [`TempDir`] cleans up in its destructor.
pub struct TempClone {
    root: PathBuf,
    _dir: TempDir,
}

impl TempClone {
    /// Root of the cloned working tree.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// True when `url` refers to a repository on the local filesystem.
fn is_local_source(url: &str) -> bool {
    if url.starts_with("file://") {
        return true;
    }
    let path = Path::new(url);
    path.is_absolute() && path.is_dir()
}

/// Clone a brain into a fresh temp directory.
///
/// Remote URLs are cloned shallow (`--depth=1 --quiet`); `file://` URLs and
/// absolute local paths get a full quiet clone. The temp directory is
/// removed if the clone fails. Authentication-looking failures against
/// well-known hosts get a hint appended to the error.
pub fn temp_clone(url: &str, branch: Option<&str>) -> Result<TempClone> {
    let dir = tempfile::Builder::new()
        .prefix("git-brain-")
        .tempdir()?;
    let root = dir.path().join("clone");
    let root_str = root.to_string_lossy().into_owned();

    let mut args = vec!["clone"];
    if is_local_source(url) {
        args.push("--quiet");
    } else {
        args.push("--depth=1");
        args.push("--quiet");
    }
    if let Some(b) = branch {
        args.push("--branch");
        args.push(b);
    }
    args.push(url);
    args.push(&root_str);

    match run(&args, None, DEFAULT_TIMEOUT) {
        Ok(_) => Ok(TempClone { root, _dir: dir }),
        // `dir` drops here, removing the partial clone.
        Err(e) => Err(decorate_auth_failure(url, e)),
    }
}

/// Append an authentication hint when the failure looks like one.
fn decorate_auth_failure(url: &str, err: Error) -> Error {
    let Error::GitCommand { command, stderr } = err else {
        return err;
    };
    let host_known = KNOWN_HOSTS.iter().any(|h| url.contains(h));
    let lower = stderr.to_lowercase();
    let looks_auth = AUTH_MARKERS.iter().any(|m| lower.contains(m));
    if host_known && looks_auth {
        Error::GitCommand {
            command,
            stderr: format!(
                "{}\nhint: this looks like an authentication failure; check your \
                 credentials or SSH key for {}",
                stderr, url
            ),
        }
    } else {
        Error::GitCommand { command, stderr }
    }
}

/// Three-way merge of file contents via `git merge-file -p`.
///
/// Returns the merged bytes and whether conflict markers were produced
/// (merge-file exits with the number of conflicts).
pub fn merge_file(local: &[u8], brain: &[u8], base: &[u8]) -> Result<(Vec<u8>, bool)> {
    let dir = tempfile::Builder::new().prefix("git-brain-merge-").tempdir()?;
    let local_path = dir.path().join("local");
    let base_path = dir.path().join("base");
    let brain_path = dir.path().join("brain");
    std::fs::write(&local_path, local)?;
    std::fs::write(&base_path, base)?;
    std::fs::write(&brain_path, brain)?;

    let local_arg = local_path.to_string_lossy().into_owned();
    let base_arg = base_path.to_string_lossy().into_owned();
    let brain_arg = brain_path.to_string_lossy().into_owned();
    let args = [
        "merge-file",
        "-p",
        "-L",
        "local",
        "-L",
        "base",
        "-L",
        "brain",
        &local_arg,
        &base_arg,
        &brain_arg,
    ];
    let out = spawn_and_wait(&args, None, DEFAULT_TIMEOUT)?;
    if out.code < 0 {
        return Err(Error::GitCommand {
            command: "merge-file".to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok((out.stdout, out.code > 0))
}

/// Unified diff between two byte blobs via `git diff --no-index`.
///
/// Used only for display in the interactive conflict prompt; exit code 1
/// just means the contents differ.
pub fn diff_blobs(local: &[u8], brain: &[u8]) -> Result<String> {
    let dir = tempfile::Builder::new().prefix("git-brain-diff-").tempdir()?;
    let local_path = dir.path().join("local");
    let brain_path = dir.path().join("brain");
    std::fs::write(&local_path, local)?;
    std::fs::write(&brain_path, brain)?;

    let local_arg = local_path.to_string_lossy().into_owned();
    let brain_arg = brain_path.to_string_lossy().into_owned();
    let args = ["diff", "--no-index", "--", &local_arg, &brain_arg];
    let out = spawn_and_wait(&args, None, DEFAULT_TIMEOUT)?;
    if out.code != 0 && out.code != 1 {
        return Err(Error::GitCommand {
            command: "diff --no-index".to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

/// Run a git command inheriting the parent's stdio, returning the exit code.
///
/// The pull/push/checkout/clone wrappers use this so git's own progress
/// output and prompts reach the terminal untouched.
pub fn passthrough(args: &[&str], cwd: Option<&Path>) -> Result<i32> {
    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    let status = cmd.status().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::GitNotFound
        } else {
            Error::GitExecution {
                message: e.to_string(),
            }
        }
    })?;
    Ok(status.code().unwrap_or(-1))
}
