// GitHub Actions endpoint methods.
// One thin method per API route: interpolate the path, dispatch, decode.

use url::Url;

use crate::client::{Client, ResponseMeta};
use crate::error::Result;
use crate::options::ListOptions;
use crate::types::{Job, Jobs, Workflow, WorkflowRun, WorkflowRuns, Workflows};

impl Client {
    /// List the workflows defined in a repository.
    pub async fn list_workflows(
        &self,
        owner: &str,
        repo: &str,
        opts: ListOptions,
    ) -> Result<(Workflows, ResponseMeta)> {
        self.get_json(
            &format!("/repos/{}/{}/actions/workflows", owner, repo),
            Some(&opts),
        )
        .await
    }

    /// Get a single workflow by ID.
    pub async fn get_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
    ) -> Result<(Workflow, ResponseMeta)> {
        self.get_json(
            &format!("/repos/{}/{}/actions/workflows/{}", owner, repo, workflow_id),
            None,
        )
        .await
    }

    /// List workflow runs across a repository.
    pub async fn list_workflow_runs(
        &self,
        owner: &str,
        repo: &str,
        opts: ListOptions,
    ) -> Result<(WorkflowRuns, ResponseMeta)> {
        self.get_json(&format!("/repos/{}/{}/actions/runs", owner, repo), Some(&opts))
            .await
    }

    /// List runs of a single workflow.
    pub async fn list_runs_for_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
        opts: ListOptions,
    ) -> Result<(WorkflowRuns, ResponseMeta)> {
        self.get_json(
            &format!(
                "/repos/{}/{}/actions/workflows/{}/runs",
                owner, repo, workflow_id
            ),
            Some(&opts),
        )
        .await
    }

    /// Get a single workflow run by ID.
    pub async fn get_workflow_run(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> Result<(WorkflowRun, ResponseMeta)> {
        self.get_json(
            &format!("/repos/{}/{}/actions/runs/{}", owner, repo, run_id),
            None,
        )
        .await
    }

    /// List the jobs of a workflow run.
    pub async fn list_workflow_jobs(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
        opts: ListOptions,
    ) -> Result<(Jobs, ResponseMeta)> {
        self.get_json(
            &format!("/repos/{}/{}/actions/runs/{}/jobs", owner, repo, run_id),
            Some(&opts),
        )
        .await
    }

    /// Get a single job by ID.
    pub async fn get_workflow_job(
        &self,
        owner: &str,
        repo: &str,
        job_id: u64,
    ) -> Result<(Job, ResponseMeta)> {
        self.get_json(
            &format!("/repos/{}/{}/actions/jobs/{}", owner, repo, job_id),
            None,
        )
        .await
    }

    /// Resolve the download URL for a job's plain-text logs.
    ///
    /// The URL is time-limited and fetching it is left to the caller. With
    /// `follow_redirects` set, one permanent-redirect hop from a deprecated
    /// route is tolerated.
    pub async fn job_logs_url(
        &self,
        owner: &str,
        repo: &str,
        job_id: u64,
        follow_redirects: bool,
    ) -> Result<(Url, ResponseMeta)> {
        self.resolve_download_url(
            &format!("/repos/{}/{}/actions/jobs/{}/logs", owner, repo, job_id),
            follow_redirects,
        )
        .await
    }

    /// Resolve the download URL for a run's log archive.
    pub async fn run_logs_url(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
        follow_redirects: bool,
    ) -> Result<(Url, ResponseMeta)> {
        self.resolve_download_url(
            &format!("/repos/{}/{}/actions/runs/{}/logs", owner, repo, run_id),
            follow_redirects,
        )
        .await
    }
}
