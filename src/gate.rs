use std::collections::BTreeSet;

/// Phrase that must be typed to promote staging into the main branch.
pub const PROMOTE_PHRASE: &str = "PUSH STAGING TO MAIN";

/// How much damage an action can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    /// Read-only, nothing to confirm.
    None,
    /// Recoverable or routine; a yes/no answer is enough.
    Low,
    /// Irreversible or touching a protected branch; the operator must type a phrase.
    Elevated,
}

/// Something the operator may be asked to approve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    ReadOnly,
    Pull,
    Merge,
    Push,
    SwitchBranch,
    CreateTrackingBranch,
    ProceedWithDirtyTree,
    CreateBackupTag,
    PublishBackupTag,
    DeleteMergedLocal,
    AttemptMissingRemoteDelete,
    DeleteProtected(&'a str),
    ForceDeleteUnmerged(&'a str),
    DeleteRemote(&'a str),
    Promote,
}

/// The protocol the operator has to follow before an action goes ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    None,
    YesNo,
    ExactText(String),
}

impl Action<'_> {
    pub fn tier(&self) -> RiskTier {
        match self {
            Self::ReadOnly => RiskTier::None,
            Self::DeleteProtected(_)
            | Self::ForceDeleteUnmerged(_)
            | Self::DeleteRemote(_)
            | Self::Promote => RiskTier::Elevated,
            _ => RiskTier::Low,
        }
    }
}

impl Confirmation {
    /// Evaluate a raw operator answer against this protocol.
    pub fn accepts(&self, input: &str) -> bool {
        match self {
            Self::None => true,
            Self::YesNo => is_affirmative(input),
            Self::ExactText(expected) => matches_exact(input, expected),
        }
    }
}

/// Maps actions to confirmation protocols.
#[derive(Debug, Clone)]
pub struct Gate {
    protected: BTreeSet<String>,
}

impl Gate {
    pub fn new(protected: BTreeSet<String>) -> Self {
        Self { protected }
    }

    pub fn is_protected(&self, branch: &str) -> bool {
        self.protected.contains(branch)
    }

    pub fn requirement(&self, action: Action<'_>) -> Confirmation {
        match action {
            Action::DeleteProtected(branch) => Confirmation::ExactText(format!("DELETE {branch}")),
            Action::ForceDeleteUnmerged(branch) | Action::DeleteRemote(branch) => {
                Confirmation::ExactText(branch.to_string())
            }
            Action::Promote => Confirmation::ExactText(PROMOTE_PHRASE.to_string()),
            action if action.tier() == RiskTier::None => Confirmation::None,
            _ => Confirmation::YesNo,
        }
    }
}

/// `y` or `yes`, any case.
pub fn is_affirmative(input: &str) -> bool {
    let input = input.trim();
    input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes")
}

/// Case-sensitive equality once surrounding whitespace is dropped.
pub fn matches_exact(input: &str, expected: &str) -> bool {
    input.trim() == expected
}
