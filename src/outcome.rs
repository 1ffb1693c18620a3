/// How a workflow step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The step's command ran and succeeded.
    Done,
    /// Nothing to do, e.g. the branch does not exist locally.
    Skipped,
    /// The step stopped before or at its mutating command.
    Aborted(Abort),
}

impl Outcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }
}

/// Why a step stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abort {
    /// Missing repository, remote, branch name or branch.
    Precondition,
    /// The operator declined or mistyped a confirmation.
    Declined,
    /// git reported a failure.
    Failed,
    /// The promote merge stopped with conflicts; the push was skipped.
    MergeConflict,
}

/// Which branch copies a delete targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Scope {
    Local,
    Remote,
    Both,
}

impl Scope {
    pub fn includes_local(self) -> bool {
        matches!(self, Self::Local | Self::Both)
    }

    pub fn includes_remote(self) -> bool {
        matches!(self, Self::Remote | Self::Both)
    }
}

/// Result of a branch delete, one entry per scope that was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteReport {
    pub local: Option<Outcome>,
    pub remote: Option<Outcome>,
}

impl DeleteReport {
    /// Every requested scope ended with the same abort.
    pub fn aborted(scope: Scope, reason: Abort) -> Self {
        let outcome = Some(Outcome::Aborted(reason));
        Self {
            local: outcome.filter(|_| scope.includes_local()),
            remote: outcome.filter(|_| scope.includes_remote()),
        }
    }

    /// Whether any requested scope stopped short.
    pub fn is_aborted(&self) -> bool {
        [self.local, self.remote]
            .iter()
            .flatten()
            .any(Outcome::is_aborted)
    }
}
