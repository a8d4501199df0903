//! Status enumerations backed by fixed-id lookup tables.
//!
//! Ids are part of the public API (filter endpoints take them) and must match
//! the rows written by [`crate::db::DbPool::seed_status_tables`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// A status enumeration persisted as an `(id, name)` lookup table.
pub trait StatusLookup: Sized + Copy + 'static {
    /// Human-readable kind used in error messages.
    const KIND: &'static str;

    /// Every variant, in id order.
    const ALL: &'static [Self];

    fn id(&self) -> i32;

    fn as_str(&self) -> &'static str;

    fn from_id(id: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.id() == id)
    }

    /// Case-insensitive lookup by name.
    fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
    }

    /// Display name for a stored id, "Unknown" if the id is not ours.
    fn name_of(id: i32) -> &'static str {
        Self::from_id(id).map(|s| s.as_str()).unwrap_or("Unknown")
    }
}

/// Project lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProjectStatus {
    Created,
    Finished,
}

impl StatusLookup for ProjectStatus {
    const KIND: &'static str = "project status";
    const ALL: &'static [Self] = &[Self::Created, Self::Finished];

    fn id(&self) -> i32 {
        match self {
            Self::Created => 1,
            Self::Finished => 2,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Finished => "Finished",
        }
    }
}

/// Status shared by launches, test runs and test suite histories.
///
/// Each of those entities has its own lookup table with identical rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RunStatus {
    Running,
    Successful,
    Failed,
}

impl RunStatus {
    /// Status of a closed parent given how many of its children failed.
    pub fn from_failed_count(failed: u64) -> Self {
        if failed > 0 { Self::Failed } else { Self::Successful }
    }
}

impl StatusLookup for RunStatus {
    const KIND: &'static str = "run status";
    const ALL: &'static [Self] = &[Self::Running, Self::Successful, Self::Failed];

    fn id(&self) -> i32 {
        match self {
            Self::Running => 1,
            Self::Successful => 2,
            Self::Failed => 3,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Successful => "Successful",
            Self::Failed => "Failed",
        }
    }
}

/// Outcome of a single test execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TestStatus {
    Running,
    Passed,
    Failed,
    Skipped,
    Incomplete,
}

impl StatusLookup for TestStatus {
    const KIND: &'static str = "test status";
    const ALL: &'static [Self] = &[
        Self::Running,
        Self::Passed,
        Self::Failed,
        Self::Skipped,
        Self::Incomplete,
    ];

    fn id(&self) -> i32 {
        match self {
            Self::Running => 1,
            Self::Passed => 2,
            Self::Failed => 3,
            Self::Skipped => 4,
            Self::Incomplete => 5,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Skipped => "Skipped",
            Self::Incomplete => "Incomplete",
        }
    }
}

/// Post-hoc classification of a test result, independent of pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TestResolution {
    Unresolved,
    KnownIssue,
    ProductDefect,
    TestDefect,
    FlakyTest,
}

impl StatusLookup for TestResolution {
    const KIND: &'static str = "test resolution";
    const ALL: &'static [Self] = &[
        Self::Unresolved,
        Self::KnownIssue,
        Self::ProductDefect,
        Self::TestDefect,
        Self::FlakyTest,
    ];

    fn id(&self) -> i32 {
        match self {
            Self::Unresolved => 1,
            Self::KnownIssue => 2,
            Self::ProductDefect => 3,
            Self::TestDefect => 4,
            Self::FlakyTest => 5,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Unresolved => "Unresolved",
            Self::KnownIssue => "Known issue",
            Self::ProductDefect => "Product defect",
            Self::TestDefect => "Test defect",
            Self::FlakyTest => "Flaky test",
        }
    }
}

/// Status as supplied by a client: either the lookup id or its name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StatusRef {
    Id(i32),
    Name(String),
}

impl StatusRef {
    /// Resolve against a lookup enumeration, rejecting unknown values.
    pub fn resolve<S: StatusLookup>(&self) -> AppResult<S> {
        let resolved = match self {
            Self::Id(id) => S::from_id(*id),
            Self::Name(name) => S::parse(name),
        };

        resolved.ok_or_else(|| AppError::InvalidInput(format!("Unknown {}: {}", S::KIND, self)))
    }
}

impl std::fmt::Display for StatusRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Name(name) => write!(f, "'{}'", name),
        }
    }
}
