// GitHub Actions API response types.
// Structs and enums mirroring the JSON payloads returned by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a run, job, or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
    #[serde(other)]
    Unknown,
}

/// Conclusion of a completed run, job, or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Neutral,
    Stale,
    StartupFailure,
    #[serde(other)]
    Unknown,
}

/// Workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Active,
    Deleted,
    DisabledFork,
    DisabledInactivity,
    DisabledManually,
    #[serde(other)]
    Unknown,
}

/// Workflow definition attached to a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: u64,
    pub node_id: Option<String>,
    pub name: String,
    pub path: Option<String>,
    pub state: Option<WorkflowState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub url: Option<String>,
    pub html_url: Option<String>,
    pub badge_url: Option<String>,
}

/// Paginated page of workflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflows {
    pub total_count: u64,
    pub workflows: Vec<Workflow>,
}

/// One triggered execution of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    pub node_id: Option<String>,
    pub name: Option<String>,
    pub run_number: u64,
    pub run_attempt: Option<u64>,
    pub event: Option<String>,
    pub status: Status,
    pub conclusion: Option<Conclusion>,
    pub workflow_id: u64,
    pub head_branch: Option<String>,
    pub head_sha: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub url: Option<String>,
    pub html_url: Option<String>,
}

/// Paginated page of workflow runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRuns {
    pub total_count: u64,
    pub workflow_runs: Vec<WorkflowRun>,
}

/// One execution unit of a workflow run.
///
/// A job belongs to exactly one run; instances are read-only snapshots of
/// server state. Timestamps stay `None` until the lifecycle reaches them,
/// and `conclusion` is populated only once the job completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub run_id: u64,
    pub run_url: Option<String>,
    pub node_id: Option<String>,
    pub head_sha: Option<String>,
    pub url: Option<String>,
    pub html_url: Option<String>,
    pub check_run_url: Option<String>,
    pub status: Status,
    pub conclusion: Option<Conclusion>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One task in a job's execution sequence, ordered by `number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub status: Status,
    pub conclusion: Option<Conclusion>,
    /// 1-based position in the job's step sequence.
    pub number: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Paginated page of jobs for a workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jobs {
    pub total_count: u64,
    pub jobs: Vec<Job>,
}
