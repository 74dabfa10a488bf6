//! Outcome types for engine runs.
//!
//! Per-location results fold into one [`AggregateResult`], which keeps
//! "no file matched criteria", "all files already correct", and "change
//! detected" as three distinguishable states instead of a pair of
//! booleans.

/// Resolution outcome for one (file x document x path) evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub file: String,
    pub document_index: usize,
    pub found: bool,
    pub old_value: Option<String>,
    pub changed: bool,
}

/// Aggregate verdict of a run across the candidate file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every considered file was excluded (search-pattern miss).
    NoFileMatched,
    /// At least one file was considered and none needed a change.
    AlreadyUpToDate,
    /// At least one location was rewritten (or would be, in dry-run).
    Changed,
}

/// Fold of per-file outcomes into one verdict plus a diff narrative.
#[derive(Debug, Default)]
pub struct AggregateResult {
    pub files_considered: usize,
    pub files_ignored: usize,
    pub files_changed: Vec<String>,
    lines: Vec<String>,
}

impl AggregateResult {
    pub fn new(files_considered: usize) -> Self {
        Self {
            files_considered,
            ..Default::default()
        }
    }

    /// Records one evaluated location in the narrative.
    pub fn record(&mut self, outcome: &MatchOutcome, key: &str, new_value: &str, dry_run: bool) {
        if !outcome.changed {
            self.lines.push(format!(
                "key {:?} already set to {:?}, in file {:?} (document {})",
                key, new_value, outcome.file, outcome.document_index
            ));
            return;
        }
        let verb = if dry_run { "should be updated" } else { "updated" };
        self.lines.push(format!(
            "key {:?} {} from {:?} to {:?}, in file {:?} (document {})",
            key,
            verb,
            outcome.old_value.as_deref().unwrap_or_default(),
            new_value,
            outcome.file,
            outcome.document_index
        ));
    }

    pub fn mark_file_changed(&mut self, path: String) {
        if !self.files_changed.contains(&path) {
            self.files_changed.push(path);
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.files_considered == self.files_ignored {
            Outcome::NoFileMatched
        } else if self.files_changed.is_empty() {
            Outcome::AlreadyUpToDate
        } else {
            Outcome::Changed
        }
    }

    /// The assembled multi-line change narrative.
    pub fn description(&self) -> String {
        match self.outcome() {
            Outcome::NoFileMatched => "no file found matching criteria".to_string(),
            Outcome::AlreadyUpToDate => {
                format!("no change detected:\n\t* {}", self.lines.join("\n\t* "))
            }
            Outcome::Changed => {
                format!("change detected:\n\t* {}", self.lines.join("\n\t* "))
            }
        }
    }
}

/// What a target run reports back to its caller.
#[derive(Debug)]
pub struct TargetResult {
    pub changed: bool,
    pub files: Vec<String>,
    pub description: String,
    pub outcome: Outcome,
}

/// What a condition run reports back to its caller.
#[derive(Debug)]
pub struct ConditionResult {
    pub pass: bool,
    pub description: String,
}
