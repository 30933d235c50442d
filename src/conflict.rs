//! Conflict detection and resolution between brain and local content.
//!
//! Detection is a byte compare; resolution is a pure function of its inputs
//! for the fixed strategies and an interactive exchange for `prompt`. The
//! interactive branch talks to an explicit reader/writer pair so it can be
//! exercised in tests without a terminal.

use std::io::{BufRead, Write};

use crate::config::{ConflictStrategy, SyncPolicy};
use crate::error::{Error, Result};
use crate::git;

/// How a conflicted file ended up being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The brain's content was taken.
    Brain,
    /// The local content was kept.
    Local,
    /// A clean three-way merge was taken.
    Merged,
    /// The merge produced conflict markers that were kept in the output.
    MergedWithConflicts,
}

/// Outcome of resolving one file: the label and the final content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub resolution: Resolution,
    pub content: Vec<u8>,
}

/// True iff the local and brain contents differ.
///
/// Bytes are compared first; when both sides decode as UTF-8 the decoded
/// strings are compared as well, for parity with text-normalized diffs.
pub fn detect_conflict(local: &[u8], brain: &[u8]) -> bool {
    if local == brain {
        return false;
    }
    match (std::str::from_utf8(local), std::str::from_utf8(brain)) {
        (Ok(l), Ok(b)) => l != b,
        _ => true,
    }
}

/// The strategy actually applied once policy is taken into account.
///
/// `prompt` degrades to `prefer_brain` when local modifications are
/// disallowed: there is nothing for the user to choose, the brain wins.
pub fn effective_strategy(policy: &SyncPolicy, override_strategy: Option<ConflictStrategy>) -> ConflictStrategy {
    let strategy = override_strategy.unwrap_or(policy.conflict_strategy);
    if strategy == ConflictStrategy::Prompt && !policy.allow_local_modifications {
        ConflictStrategy::PreferBrain
    } else {
        strategy
    }
}

/// Resolve a conflict on `destination` using stdin/stdout for any prompt.
pub fn resolve(
    destination: &str,
    local: &[u8],
    brain: &[u8],
    strategy: ConflictStrategy,
    interactive: bool,
) -> Result<Resolved> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    resolve_with_io(
        destination,
        local,
        brain,
        strategy,
        interactive,
        &mut stdin.lock(),
        &mut stdout,
    )
}

/// Resolve a conflict, reading prompt answers from `input` and writing the
/// diff and questions to `output`.
pub fn resolve_with_io(
    destination: &str,
    local: &[u8],
    brain: &[u8],
    strategy: ConflictStrategy,
    interactive: bool,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<Resolved> {
    match strategy {
        ConflictStrategy::PreferBrain => Ok(Resolved {
            resolution: Resolution::Brain,
            content: brain.to_vec(),
        }),
        ConflictStrategy::PreferLocal => Ok(Resolved {
            resolution: Resolution::Local,
            content: local.to_vec(),
        }),
        ConflictStrategy::Prompt => {
            if !interactive {
                // No terminal to ask; the brain wins.
                return Ok(Resolved {
                    resolution: Resolution::Brain,
                    content: brain.to_vec(),
                });
            }
            prompt_user(destination, local, brain, input, output)
        }
    }
}

/// Interactive exchange for one conflicted file.
fn prompt_user(
    destination: &str,
    local: &[u8],
    brain: &[u8],
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<Resolved> {
    let is_text =
        std::str::from_utf8(local).is_ok() && std::str::from_utf8(brain).is_ok();

    writeln!(output, "Conflict in '{}':", destination)?;
    if is_text {
        let diff = git::diff_blobs(local, brain)?;
        writeln!(output, "{}", diff)?;
    } else {
        writeln!(output, "(binary content differs; no diff shown)")?;
    }

    loop {
        if is_text {
            write!(output, "Keep (b)rain, (l)ocal, or (m)erge? ")?;
        } else {
            write!(output, "Keep (b)rain or (l)ocal? ")?;
        }
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            // EOF mid-prompt counts as declining to choose.
            return Err(Error::UserAbort);
        }
        match answer.trim().to_lowercase().as_str() {
            "b" | "brain" => {
                return Ok(Resolved {
                    resolution: Resolution::Brain,
                    content: brain.to_vec(),
                })
            }
            "l" | "local" => {
                return Ok(Resolved {
                    resolution: Resolution::Local,
                    content: local.to_vec(),
                })
            }
            "m" | "merge" if is_text => {
                let (content, had_conflicts) = git::merge_file(local, brain, b"")?;
                let resolution = if had_conflicts {
                    Resolution::MergedWithConflicts
                } else {
                    Resolution::Merged
                };
                return Ok(Resolved {
                    resolution,
                    content,
                });
            }
            _ => {
                writeln!(output, "Unrecognized answer.")?;
            }
        }
    }
}
