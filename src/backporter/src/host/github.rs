//! GitHub implementation of [`CodeHost`].

use super::error::HostError;
use super::models::{
    trim_ref_prefix, BranchRef, CommitFile, CommitRecord, CreatedPullRequest, NewCommit,
    NewPullRequest, PullRequest, Signature,
};
use super::CodeHost;
use crate::rate_limit::ensure_core_rate_limit;
use async_trait::async_trait;
use octocrab::params::repos::Reference;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Results per page for paginated list endpoints.
const PER_PAGE: u64 = 100;

/// [`CodeHost`] backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubHost {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubHost {
    /// Creates a host for `owner/repo` using an existing client.
    pub fn new(octocrab: Octocrab, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            octocrab,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Creates a host for `owner/repo` authenticated with a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn from_token(
        token: &str,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Result<Self, octocrab::Error> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .build()?;
        Ok(Self::new(octocrab, owner, repo))
    }

    /// Returns the `owner/repo` name this host is bound to.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn route(&self, path: &str) -> String {
        format!("/repos/{}/{}/{}", self.owner, self.repo, path)
    }

    async fn ensure_rate_limit(&self, operation: &str) -> Result<(), HostError> {
        ensure_core_rate_limit(&self.octocrab)
            .await
            .map_err(|e| HostError::from_octocrab(operation, e))
    }
}

#[derive(Serialize)]
struct PageQuery {
    per_page: u64,
    page: u64,
}

#[derive(Serialize)]
struct CommitsQuery<'a> {
    sha: &'a str,
    per_page: u64,
    page: u64,
}

#[derive(Serialize)]
struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    reference: String,
    sha: &'a str,
}

#[derive(Serialize)]
struct UpdateRefBody<'a> {
    sha: &'a str,
    force: bool,
}

#[derive(Deserialize)]
struct WireLabel {
    name: String,
}

#[derive(Deserialize)]
struct WirePullRequest {
    number: u64,
    title: Option<String>,
    body: Option<String>,
    #[serde(default)]
    merged: bool,
    merge_commit_sha: Option<String>,
    #[serde(default)]
    commits: u64,
    #[serde(default)]
    changed_files: u64,
    #[serde(default)]
    labels: Vec<WireLabel>,
}

impl From<WirePullRequest> for PullRequest {
    fn from(pr: WirePullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title.unwrap_or_default(),
            body: pr.body.unwrap_or_default(),
            merged: pr.merged,
            merge_commit_sha: pr.merge_commit_sha.filter(|sha| !sha.is_empty()),
            commits: pr.commits,
            changed_files: pr.changed_files,
            labels: pr.labels.into_iter().map(|label| label.name).collect(),
        }
    }
}

#[derive(Deserialize)]
struct WireSha {
    sha: String,
}

#[derive(Deserialize)]
struct WireSignature {
    name: String,
    email: String,
    date: Option<String>,
}

impl From<WireSignature> for Signature {
    fn from(sig: WireSignature) -> Self {
        Self {
            name: sig.name,
            email: sig.email,
            date: sig.date,
        }
    }
}

#[derive(Deserialize)]
struct WireFile {
    filename: String,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    #[serde(default)]
    changes: u64,
    patch: Option<String>,
}

impl From<WireFile> for CommitFile {
    fn from(file: WireFile) -> Self {
        Self {
            filename: file.filename,
            additions: file.additions,
            deletions: file.deletions,
            changes: file.changes,
            patch: file.patch,
        }
    }
}

#[derive(Deserialize)]
struct WireCommitDetail {
    message: String,
    tree: WireSha,
    author: Option<WireSignature>,
    committer: Option<WireSignature>,
}

/// Commit as returned by the repository commits endpoints.
#[derive(Deserialize)]
struct WireRepoCommit {
    sha: String,
    commit: WireCommitDetail,
    #[serde(default)]
    parents: Vec<WireSha>,
    #[serde(default)]
    files: Vec<WireFile>,
}

impl From<WireRepoCommit> for CommitRecord {
    fn from(commit: WireRepoCommit) -> Self {
        Self {
            sha: commit.sha,
            message: commit.commit.message,
            tree_sha: commit.commit.tree.sha,
            author: commit.commit.author.map(Into::into),
            committer: commit.commit.committer.map(Into::into),
            parents: commit.parents.into_iter().map(|p| p.sha).collect(),
            files: commit.files.into_iter().map(Into::into).collect(),
        }
    }
}

/// Commit as returned by the git data endpoint.
#[derive(Deserialize)]
struct WireGitCommit {
    sha: String,
    message: String,
    tree: WireSha,
    author: Option<WireSignature>,
    committer: Option<WireSignature>,
    #[serde(default)]
    parents: Vec<WireSha>,
}

impl From<WireGitCommit> for CommitRecord {
    fn from(commit: WireGitCommit) -> Self {
        Self {
            sha: commit.sha,
            message: commit.message,
            tree_sha: commit.tree.sha,
            author: commit.author.map(Into::into),
            committer: commit.committer.map(Into::into),
            parents: commit.parents.into_iter().map(|p| p.sha).collect(),
            files: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct WireRef {
    #[serde(rename = "ref")]
    reference: String,
    object: WireSha,
}

impl From<WireRef> for BranchRef {
    fn from(reference: WireRef) -> Self {
        Self {
            name: trim_ref_prefix(&reference.reference).to_string(),
            sha: reference.object.sha,
        }
    }
}

#[async_trait]
impl CodeHost for GitHubHost {
    async fn get_pull_request(&self, number: u64) -> Result<PullRequest, HostError> {
        debug!(repo = %self.full_name(), pr = number, "Retrieving pull request");
        let pr: WirePullRequest = self
            .octocrab
            .get(self.route(&format!("pulls/{number}")), None::<&()>)
            .await
            .map_err(|e| HostError::from_octocrab("get pull request", e))?;
        Ok(pr.into())
    }

    async fn list_pull_request_commits(
        &self,
        pr: &PullRequest,
    ) -> Result<Vec<CommitRecord>, HostError> {
        debug!(repo = %self.full_name(), pr = pr.number, "Retrieving pull request commits");
        if pr.commits == 0 {
            return Ok(Vec::new());
        }

        let last_page = pr.commits.div_ceil(PER_PAGE);
        let mut commits = Vec::with_capacity(pr.commits as usize);
        for page in 1..=last_page {
            let batch: Vec<WireRepoCommit> = self
                .octocrab
                .get(
                    self.route(&format!("pulls/{}/commits", pr.number)),
                    Some(&PageQuery {
                        per_page: PER_PAGE,
                        page,
                    }),
                )
                .await
                .map_err(|e| HostError::from_octocrab("list pull request commits", e))?;
            let done = (batch.len() as u64) < PER_PAGE;
            commits.extend(batch.into_iter().map(CommitRecord::from));
            if done {
                break;
            }
        }
        Ok(commits)
    }

    async fn list_pull_request_files(
        &self,
        pr: &PullRequest,
    ) -> Result<Vec<CommitFile>, HostError> {
        debug!(repo = %self.full_name(), pr = pr.number, "Retrieving pull request files");
        if pr.changed_files == 0 {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut page = 1;
        loop {
            let batch: Vec<WireFile> = self
                .octocrab
                .get(
                    self.route(&format!("pulls/{}/files", pr.number)),
                    Some(&PageQuery {
                        per_page: PER_PAGE,
                        page,
                    }),
                )
                .await
                .map_err(|e| HostError::from_octocrab("list pull request files", e))?;
            let done = (batch.len() as u64) < PER_PAGE;
            files.extend(batch.into_iter().map(CommitFile::from));
            if done {
                break;
            }
            page += 1;
        }
        Ok(files)
    }

    async fn list_commits_from(
        &self,
        sha: &str,
        count: usize,
    ) -> Result<Vec<CommitRecord>, HostError> {
        debug!(repo = %self.full_name(), sha, count, "Listing commits");
        let per_page = (count as u64).clamp(1, PER_PAGE);
        let mut commits = Vec::with_capacity(count);
        let mut page = 1;
        while commits.len() < count {
            let batch: Vec<WireRepoCommit> = self
                .octocrab
                .get(
                    self.route("commits"),
                    Some(&CommitsQuery {
                        sha,
                        per_page,
                        page,
                    }),
                )
                .await
                .map_err(|e| HostError::from_octocrab("list commits", e))?;
            let done = (batch.len() as u64) < per_page;
            commits.extend(batch.into_iter().map(CommitRecord::from));
            if done {
                break;
            }
            page += 1;
        }
        commits.truncate(count);
        Ok(commits)
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitRecord, HostError> {
        debug!(repo = %self.full_name(), sha, "Retrieving commit");
        let commit: WireRepoCommit = self
            .octocrab
            .get(self.route(&format!("commits/{sha}")), None::<&()>)
            .await
            .map_err(|e| HostError::from_octocrab("get commit", e))?;
        Ok(commit.into())
    }

    async fn get_branch(&self, name: &str) -> Result<BranchRef, HostError> {
        debug!(repo = %self.full_name(), branch = name, "Retrieving branch");
        let reference: WireRef = self
            .octocrab
            .get(self.route(&format!("git/ref/heads/{name}")), None::<&()>)
            .await
            .map_err(|e| HostError::from_octocrab("get branch", e))?;
        Ok(reference.into())
    }

    async fn create_branch(&self, name: &str, sha: &str) -> Result<BranchRef, HostError> {
        info!(repo = %self.full_name(), branch = name, sha, "Creating branch");
        self.ensure_rate_limit("create branch").await?;
        let reference: WireRef = self
            .octocrab
            .post(
                self.route("git/refs"),
                Some(&CreateRefBody {
                    reference: format!("refs/heads/{name}"),
                    sha,
                }),
            )
            .await
            .map_err(|e| HostError::from_octocrab("create branch", e))?;
        Ok(reference.into())
    }

    async fn update_branch(
        &self,
        name: &str,
        sha: &str,
        force: bool,
    ) -> Result<BranchRef, HostError> {
        info!(repo = %self.full_name(), branch = name, sha, force, "Updating branch");
        let reference: WireRef = self
            .octocrab
            .patch(
                self.route(&format!("git/refs/heads/{name}")),
                Some(&UpdateRefBody { sha, force }),
            )
            .await
            .map_err(|e| HostError::from_octocrab("update branch", e))?;
        Ok(reference.into())
    }

    async fn delete_branch(&self, name: &str) -> Result<(), HostError> {
        info!(repo = %self.full_name(), branch = name, "Deleting branch");
        self.octocrab
            .repos(&self.owner, &self.repo)
            .delete_ref(&Reference::Branch(name.to_string()))
            .await
            .map_err(|e| HostError::from_octocrab("delete branch", e))
    }

    async fn create_commit(&self, commit: &NewCommit) -> Result<CommitRecord, HostError> {
        debug!(
            repo = %self.full_name(),
            parents = ?commit.parents,
            message = %commit.message.lines().next().unwrap_or_default(),
            "Creating commit"
        );
        self.ensure_rate_limit("create commit").await?;
        let created: WireGitCommit = self
            .octocrab
            .post(self.route("git/commits"), Some(commit))
            .await
            .map_err(|e| HostError::from_octocrab("create commit", e))?;
        Ok(created.into())
    }

    async fn create_pull_request(
        &self,
        pr: &NewPullRequest,
    ) -> Result<CreatedPullRequest, HostError> {
        info!(
            repo = %self.full_name(),
            head = %pr.head,
            base = %pr.base,
            draft = pr.draft,
            "Creating pull request"
        );
        self.ensure_rate_limit("create pull request").await?;
        let created = self
            .octocrab
            .pulls(&self.owner, &self.repo)
            .create(&pr.title, &pr.head, &pr.base)
            .body(&pr.body)
            .draft(Some(pr.draft))
            .maintainer_can_modify(Some(pr.maintainer_can_modify))
            .send()
            .await
            .map_err(|e| HostError::from_octocrab("create pull request", e))?;

        Ok(CreatedPullRequest {
            number: created.number,
            head_sha: created.head.sha.clone(),
            draft: created.draft.unwrap_or(pr.draft),
        })
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<(), HostError> {
        if labels.is_empty() {
            return Ok(());
        }
        info!(repo = %self.full_name(), pr = number, ?labels, "Adding labels");
        self.octocrab
            .issues(&self.owner, &self.repo)
            .add_labels(number, labels)
            .await
            .map_err(|e| HostError::from_octocrab("add labels", e))?;
        Ok(())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<(), HostError> {
        info!(repo = %self.full_name(), pr = number, "Creating comment");
        self.octocrab
            .issues(&self.owner, &self.repo)
            .create_comment(number, body)
            .await
            .map_err(|e| HostError::from_octocrab("create comment", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_pull_request_payload() {
        let payload = serde_json::json!({
            "number": 42,
            "title": "Fix crash",
            "body": null,
            "merged": true,
            "merge_commit_sha": "abc123",
            "commits": 1,
            "changed_files": 2,
            "labels": [{ "name": "backport-to-support/2.15" }, { "name": "bug" }]
        });

        let wire: WirePullRequest = serde_json::from_value(payload).unwrap();
        let pr = PullRequest::from(wire);

        assert_eq!(pr.number, 42);
        assert_eq!(pr.body, "");
        assert_eq!(pr.merge_commit_sha.as_deref(), Some("abc123"));
        assert_eq!(pr.labels, vec!["backport-to-support/2.15", "bug"]);
    }

    #[test]
    fn converts_repository_commit_payload() {
        let payload = serde_json::json!({
            "sha": "abc123",
            "commit": {
                "message": "Fix crash",
                "tree": { "sha": "tree1" },
                "author": { "name": "Jane", "email": "jane@example.com", "date": "2024-01-01T00:00:00Z" },
                "committer": { "name": "GitHub", "email": "noreply@github.com", "date": "2024-01-01T00:00:00Z" }
            },
            "parents": [{ "sha": "p1" }],
            "files": [{ "filename": "src/lib.rs", "additions": 1, "deletions": 2, "changes": 3, "patch": "@@" }]
        });

        let wire: WireRepoCommit = serde_json::from_value(payload).unwrap();
        let commit = CommitRecord::from(wire);

        assert_eq!(commit.tree_sha, "tree1");
        assert_eq!(commit.parents, vec!["p1"]);
        assert_eq!(commit.files.len(), 1);
        assert_eq!(commit.files[0].changes, 3);
        assert_eq!(commit.author.unwrap().name, "Jane");
    }

    #[test]
    fn serializes_new_commit_for_git_data_api() {
        let commit = NewCommit {
            message: "Fix crash".to_string(),
            tree_sha: "tree1".to_string(),
            parents: vec!["p1".to_string()],
            author: None,
            committer: Some(Signature::new("backbot", "bot@example.com")),
        };

        let value = serde_json::to_value(&commit).unwrap();
        assert_eq!(value["tree"], "tree1");
        assert_eq!(value["committer"]["name"], "backbot");
        assert!(value.get("author").is_none());
        assert!(value["committer"].get("date").is_none());
    }

    #[test]
    fn strips_ref_prefix_from_wire_ref() {
        let wire: WireRef = serde_json::from_value(serde_json::json!({
            "ref": "refs/heads/support/2.15",
            "object": { "sha": "def456", "type": "commit" }
        }))
        .unwrap();

        let branch = BranchRef::from(wire);
        assert_eq!(branch.name, "support/2.15");
        assert_eq!(branch.sha, "def456");
    }
}
