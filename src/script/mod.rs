//! Load-script execution.
//!
//! A load script holds one request document per line. Lines are trimmed,
//! blanks are dropped, and each remaining line is classified by substring
//! markers and forwarded to the runtime unchanged. A failing line never stops
//! the run; the caller gets one [`StepOutcome`] per line and decides what
//! overall success means.

pub mod errors;
pub mod examples;

use std::fmt;

use camino::Utf8Path;
pub use errors::ScriptError;
use serde::Serialize;

use crate::session::Session;

/// Kind of request a script line appears to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// Creates a resource.
    CreateResource,
    /// Creates a function block.
    CreateFb,
    /// Creates a connection.
    CreateConnection,
    /// Starts a resource.
    Start,
    /// Anything else; forwarded as-is.
    Unknown,
}

impl Classification {
    /// Upper-case label, e.g. `CREATE_FB`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreateResource => "CREATE_RESOURCE",
            Self::CreateFb => "CREATE_FB",
            Self::CreateConnection => "CREATE_CONNECTION",
            Self::Start => "START",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

const CREATE_MARKER: &str = r#"Action="CREATE""#;
const START_MARKER: &str = r#"Action="START""#;

/// Classify a request line from its substring markers.
///
/// Markers are checked in a fixed priority, so a create line naming both a
/// resource and a function block counts as a resource creation.
#[must_use]
pub fn classify(line: &str) -> Classification {
    if line.contains(CREATE_MARKER) {
        if line.contains("Resource Name=") {
            return Classification::CreateResource;
        }
        if line.contains("FB Name=") {
            return Classification::CreateFb;
        }
        if line.contains("Connection") {
            return Classification::CreateConnection;
        }
    }
    if line.contains(START_MARKER) {
        return Classification::Start;
    }
    Classification::Unknown
}

/// A non-blank script line and its 1-based position in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptLine {
    /// Line number in the source text.
    pub number: usize,
    /// Trimmed line text.
    pub text: String,
}

/// Trim every line and drop the blank ones, keeping source line numbers.
pub fn script_lines<I, S>(lines: I) -> impl Iterator<Item = ScriptLine>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let text = line.as_ref().trim();
            (!text.is_empty()).then(|| ScriptLine {
                number: index + 1,
                text: text.to_owned(),
            })
        })
}

/// How a step ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    /// The line was sent and answered.
    Dispatched {
        /// Session counter value for this exchange. Script lines carry their
        /// own `ID`, so this can differ from the document's.
        request_id: u64,
        /// `ID` echoed by the runtime, which matches the line's own `ID`.
        #[serde(skip_serializing_if = "Option::is_none")]
        reply_id: Option<u64>,
        /// Response text.
        response: String,
    },
    /// Sending or receiving failed.
    Failed {
        /// Rendered error.
        error: String,
    },
    /// No session was available.
    Skipped,
}

/// Result of running one script line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// Source line number.
    pub line: usize,
    /// Inferred kind of request.
    pub classification: Classification,
    /// Request text as sent.
    pub request: String,
    /// What happened.
    #[serde(flatten)]
    pub status: StepStatus,
}

impl StepOutcome {
    /// Returns `true` if the step failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool { matches!(self.status, StepStatus::Failed { .. }) }
}

/// Totals over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Steps answered by the runtime.
    pub dispatched: usize,
    /// Steps that failed.
    pub failed: usize,
    /// Steps not sent.
    pub skipped: usize,
}

impl RunSummary {
    /// Count outcomes by status.
    #[must_use]
    pub fn from_outcomes(outcomes: &[StepOutcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome.status {
                    StepStatus::Dispatched { .. } => summary.dispatched += 1,
                    StepStatus::Failed { .. } => summary.failed += 1,
                    StepStatus::Skipped => summary.skipped += 1,
                }
                summary
            })
    }

    /// Returns `true` when no step failed.
    #[must_use]
    pub const fn is_success(&self) -> bool { self.failed == 0 }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dispatched, {} failed, {} skipped",
            self.dispatched, self.failed, self.skipped
        )
    }
}

/// Run every non-blank line in order.
///
/// With `session` set, each line is sent through [`Session::send_raw`];
/// without one, every step is [`StepStatus::Skipped`].
pub fn run<I, S>(lines: I, session: Option<&mut Session>) -> Vec<StepOutcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    run_with_progress(lines, session, |_| {})
}

/// As [`run`], calling `progress` after each step.
pub fn run_with_progress<I, S, F>(
    lines: I,
    mut session: Option<&mut Session>,
    mut progress: F,
) -> Vec<StepOutcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(&StepOutcome),
{
    script_lines(lines)
        .map(|line| {
            let status = match session.as_deref_mut() {
                Some(live) => match live.send_raw(&line.text) {
                    Ok(response) => StepStatus::Dispatched {
                        request_id: response.request_id(),
                        reply_id: response.reply_id(),
                        response: response.into_text(),
                    },
                    Err(err) => StepStatus::Failed {
                        error: err.to_string(),
                    },
                },
                None => StepStatus::Skipped,
            };
            let outcome = StepOutcome {
                line: line.number,
                classification: classify(&line.text),
                request: line.text,
                status,
            };
            progress(&outcome);
            outcome
        })
        .collect()
}

/// Read a load script from disk.
///
/// # Errors
/// Returns [`ScriptError::Read`] if the file cannot be read as UTF-8.
pub fn load_script(path: &Utf8Path) -> Result<Vec<String>, ScriptError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_owned(),
        source,
    })?;
    Ok(content.lines().map(str::to_owned).collect())
}
