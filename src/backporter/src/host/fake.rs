//! In-memory [`CodeHost`] for tests and dry experiments.
//!
//! Commits, branches, pull requests and comments live in a `Mutex`-guarded
//! state. Failures can be injected per operation to drive the engine through
//! its error paths.

use super::error::{ErrorKind, HostError};
use super::models::{
    BranchRef, CommitFile, CommitRecord, CreatedPullRequest, NewCommit, NewPullRequest,
    PullRequest,
};
use super::CodeHost;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// A pull request opened through [`FakeHost`].
#[derive(Debug, Clone)]
pub struct FakePullRequest {
    /// The created pull request.
    pub created: CreatedPullRequest,
    /// The request it was created from.
    pub request: NewPullRequest,
}

#[derive(Debug, Default)]
struct FakeState {
    pull_requests: HashMap<u64, PullRequest>,
    pull_request_commits: HashMap<u64, Vec<String>>,
    pull_request_files: HashMap<u64, Vec<CommitFile>>,
    commits: HashMap<String, CommitRecord>,
    branches: BTreeMap<String, String>,
    created_pull_requests: Vec<FakePullRequest>,
    comments: Vec<(u64, String)>,
    labels: Vec<(u64, Vec<String>)>,
    commit_failures: HashMap<String, ErrorKind>,
    branch_failures: HashMap<String, ErrorKind>,
    pull_request_failure: Option<ErrorKind>,
    comment_failure: Option<ErrorKind>,
    next_commit: u64,
    next_pull_request: u64,
    commit_list_calls: usize,
    mutations: usize,
}

/// In-memory code host.
#[derive(Debug)]
pub struct FakeHost {
    state: Mutex<FakeState>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// Creates an empty host. Pull requests it opens are numbered from 1000.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_pull_request: 1000,
                ..FakeState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a pull request.
    pub fn insert_pull_request(&self, pr: PullRequest) {
        self.state().pull_requests.insert(pr.number, pr);
    }

    /// Registers a commit so it can be fetched by SHA.
    pub fn insert_commit(&self, commit: CommitRecord) {
        self.state().commits.insert(commit.sha.clone(), commit);
    }

    /// Registers the commits listed on a pull request, oldest first.
    pub fn insert_pull_request_commits(&self, number: u64, commits: Vec<CommitRecord>) {
        let mut state = self.state();
        let shas = commits.iter().map(|c| c.sha.clone()).collect();
        for commit in commits {
            state.commits.insert(commit.sha.clone(), commit);
        }
        state.pull_request_commits.insert(number, shas);
    }

    /// Registers the files changed by a pull request.
    pub fn insert_pull_request_files(&self, number: u64, files: Vec<CommitFile>) {
        self.state().pull_request_files.insert(number, files);
    }

    /// Creates or moves a branch without counting it as a mutation.
    pub fn insert_branch(&self, name: &str, sha: &str) {
        self.state()
            .branches
            .insert(name.to_string(), sha.to_string());
    }

    /// Makes commit creation fail for commits pointing at `tree_sha`.
    pub fn fail_commit_for_tree(&self, tree_sha: &str, kind: ErrorKind) {
        self.state()
            .commit_failures
            .insert(tree_sha.to_string(), kind);
    }

    /// Makes looking up the branch `name` fail.
    pub fn fail_branch_lookup(&self, name: &str, kind: ErrorKind) {
        self.state()
            .branch_failures
            .insert(name.to_string(), kind);
    }

    /// Makes every pull request creation fail.
    pub fn fail_pull_requests(&self, kind: ErrorKind) {
        self.state().pull_request_failure = Some(kind);
    }

    /// Makes every comment creation fail.
    pub fn fail_comments(&self, kind: ErrorKind) {
        self.state().comment_failure = Some(kind);
    }

    /// Returns the SHA a branch points at.
    pub fn branch(&self, name: &str) -> Option<String> {
        self.state().branches.get(name).cloned()
    }

    /// Returns all branch names.
    pub fn branch_names(&self) -> Vec<String> {
        self.state().branches.keys().cloned().collect()
    }

    /// Returns a commit by SHA.
    pub fn commit(&self, sha: &str) -> Option<CommitRecord> {
        self.state().commits.get(sha).cloned()
    }

    /// Returns the pull requests opened so far.
    pub fn created_pull_requests(&self) -> Vec<FakePullRequest> {
        self.state().created_pull_requests.clone()
    }

    /// Returns `(number, body)` for every comment posted so far.
    pub fn comments(&self) -> Vec<(u64, String)> {
        self.state().comments.clone()
    }

    /// Returns the comments posted on one issue or pull request.
    pub fn comments_on(&self, number: u64) -> Vec<String> {
        self.state()
            .comments
            .iter()
            .filter(|(n, _)| *n == number)
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// Returns `(number, labels)` for every label call so far.
    pub fn added_labels(&self) -> Vec<(u64, Vec<String>)> {
        self.state().labels.clone()
    }

    /// Returns how many times pull request commits were listed.
    pub fn commit_list_calls(&self) -> usize {
        self.state().commit_list_calls
    }

    /// Returns how many branch or pull request mutations were attempted.
    pub fn mutations(&self) -> usize {
        self.state().mutations
    }
}

fn missing(operation: &str, what: &str) -> HostError {
    HostError::not_found(operation, format!("{what} does not exist"))
}

#[async_trait]
impl CodeHost for FakeHost {
    async fn get_pull_request(&self, number: u64) -> Result<PullRequest, HostError> {
        self.state()
            .pull_requests
            .get(&number)
            .cloned()
            .ok_or_else(|| missing("get pull request", &format!("pull request #{number}")))
    }

    async fn list_pull_request_commits(
        &self,
        pr: &PullRequest,
    ) -> Result<Vec<CommitRecord>, HostError> {
        let mut state = self.state();
        state.commit_list_calls += 1;
        let shas = state
            .pull_request_commits
            .get(&pr.number)
            .cloned()
            .unwrap_or_default();
        Ok(shas
            .iter()
            .filter_map(|sha| state.commits.get(sha).cloned())
            .collect())
    }

    async fn list_pull_request_files(
        &self,
        pr: &PullRequest,
    ) -> Result<Vec<CommitFile>, HostError> {
        Ok(self
            .state()
            .pull_request_files
            .get(&pr.number)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_commits_from(
        &self,
        sha: &str,
        count: usize,
    ) -> Result<Vec<CommitRecord>, HostError> {
        let state = self.state();
        let mut commits = Vec::new();
        let mut next = Some(sha.to_string());
        while let Some(current) = next.take() {
            if commits.len() == count {
                break;
            }
            let Some(commit) = state.commits.get(&current) else {
                break;
            };
            next = commit.parents.first().cloned();
            commits.push(commit.clone());
        }
        Ok(commits)
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitRecord, HostError> {
        self.state()
            .commits
            .get(sha)
            .cloned()
            .ok_or_else(|| missing("get commit", &format!("commit {sha}")))
    }

    async fn get_branch(&self, name: &str) -> Result<BranchRef, HostError> {
        let state = self.state();
        if let Some(kind) = state.branch_failures.get(name) {
            return Err(HostError::new(*kind, "get branch", "injected failure"));
        }
        state
            .branches
            .get(name)
            .map(|sha| BranchRef {
                name: name.to_string(),
                sha: sha.clone(),
            })
            .ok_or_else(|| missing("get branch", &format!("branch {name}")))
    }

    async fn create_branch(&self, name: &str, sha: &str) -> Result<BranchRef, HostError> {
        let mut state = self.state();
        state.mutations += 1;
        if state.branches.contains_key(name) {
            return Err(HostError::new(
                ErrorKind::Other,
                "create branch",
                "422: Reference already exists",
            ));
        }
        state.branches.insert(name.to_string(), sha.to_string());
        Ok(BranchRef {
            name: name.to_string(),
            sha: sha.to_string(),
        })
    }

    async fn update_branch(
        &self,
        name: &str,
        sha: &str,
        _force: bool,
    ) -> Result<BranchRef, HostError> {
        let mut state = self.state();
        state.mutations += 1;
        match state.branches.get_mut(name) {
            Some(tip) => {
                *tip = sha.to_string();
                Ok(BranchRef {
                    name: name.to_string(),
                    sha: sha.to_string(),
                })
            }
            None => Err(missing("update branch", &format!("branch {name}"))),
        }
    }

    async fn delete_branch(&self, name: &str) -> Result<(), HostError> {
        let mut state = self.state();
        state.mutations += 1;
        state
            .branches
            .remove(name)
            .map(drop)
            .ok_or_else(|| missing("delete branch", &format!("branch {name}")))
    }

    async fn create_commit(&self, commit: &NewCommit) -> Result<CommitRecord, HostError> {
        let mut state = self.state();
        if let Some(kind) = state.commit_failures.get(&commit.tree_sha) {
            return Err(HostError::new(
                *kind,
                "create commit",
                format!("cannot apply tree {}", commit.tree_sha),
            ));
        }
        state.next_commit += 1;
        let record = CommitRecord {
            sha: format!("replayed-{}", state.next_commit),
            message: commit.message.clone(),
            tree_sha: commit.tree_sha.clone(),
            author: commit.author.clone(),
            committer: commit.committer.clone(),
            parents: commit.parents.clone(),
            files: Vec::new(),
        };
        state.commits.insert(record.sha.clone(), record.clone());
        Ok(record)
    }

    async fn create_pull_request(
        &self,
        pr: &NewPullRequest,
    ) -> Result<CreatedPullRequest, HostError> {
        let mut state = self.state();
        state.mutations += 1;
        if let Some(kind) = state.pull_request_failure {
            return Err(HostError::new(kind, "create pull request", "injected failure"));
        }
        let head_sha = state
            .branches
            .get(&pr.head)
            .cloned()
            .ok_or_else(|| missing("create pull request", &format!("branch {}", pr.head)))?;
        state.next_pull_request += 1;
        let created = CreatedPullRequest {
            number: state.next_pull_request,
            head_sha,
            draft: pr.draft,
        };
        state.created_pull_requests.push(FakePullRequest {
            created: created.clone(),
            request: pr.clone(),
        });
        Ok(created)
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<(), HostError> {
        if !labels.is_empty() {
            self.state().labels.push((number, labels.to_vec()));
        }
        Ok(())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<(), HostError> {
        let mut state = self.state();
        if let Some(kind) = state.comment_failure {
            return Err(HostError::new(kind, "create comment", "injected failure"));
        }
        state.comments.push((number, body.to_string()));
        Ok(())
    }
}
