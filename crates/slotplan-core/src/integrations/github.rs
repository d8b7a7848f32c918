//! GitHub integration -- issue listing, creation, labeling, README sync.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde_json::json;

use crate::contract::Ticket;
use crate::integrations::keyring_store;
use crate::integrations::traits::{Integration, IssueSource};
use crate::scheduler::Issue;

const USER_AGENT: &str = "slotplan";
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Label marking issues that already have a calendar slot.
pub const SCHEDULED_LABEL: &str = "scheduled";

pub struct GitHubClient {
    token: String,
    api_base: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Load the stored token from the OS keyring (empty string if absent).
    pub fn new(owner: &str, repo: &str) -> Self {
        let token = keyring_store::get("github_token")
            .ok()
            .flatten()
            .unwrap_or_default();
        Self {
            token,
            api_base: DEFAULT_API_BASE.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    /// Build a client against a non-default API base, with an explicit token.
    pub fn with_base(api_base: &str, owner: &str, repo: &str, token: &str) -> Self {
        Self {
            token: token.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    /// Persist a user-provided token to the OS keyring and update in-memory state.
    pub fn set_credentials(&mut self, token: &str) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::set("github_token", token)?;
        self.token = token.to_string();
        Ok(())
    }

    fn repo_url(&self, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}/{tail}",
            self.api_base, self.owner, self.repo
        )
    }

    /// Fetch every issue of the repository, open and closed.
    pub fn list_issues(&self) -> Result<Vec<serde_json::Value>, Box<dyn std::error::Error>> {
        let url = self.repo_url("issues?state=all");

        let rt = tokio::runtime::Runtime::new()?;
        let resp = rt.block_on(
            Client::new()
                .get(&url)
                .header("Authorization", format!("token {}", self.token))
                .header("User-Agent", USER_AGENT)
                .header("Accept", "application/vnd.github+json")
                .send(),
        )?;

        if !resp.status().is_success() {
            return Err(format!("GitHub API error: HTTP {}", resp.status()).into());
        }

        let data: serde_json::Value = rt.block_on(resp.json())?;
        Ok(data.as_array().cloned().unwrap_or_default())
    }

    /// Create an issue and return its number.
    pub fn create_issue(
        &self,
        title: &str,
        body: &str,
    ) -> Result<i64, Box<dyn std::error::Error>> {
        let url = self.repo_url("issues");
        let payload = json!({ "title": title, "body": body });

        let rt = tokio::runtime::Runtime::new()?;
        let resp = rt.block_on(
            Client::new()
                .post(&url)
                .header("Authorization", format!("token {}", self.token))
                .header("User-Agent", USER_AGENT)
                .header("Accept", "application/vnd.github+json")
                .json(&payload)
                .send(),
        )?;

        if !resp.status().is_success() {
            return Err(format!("GitHub API error: HTTP {}", resp.status()).into());
        }

        let data: serde_json::Value = rt.block_on(resp.json())?;
        let number = data["number"]
            .as_i64()
            .ok_or("missing issue number in response")?;
        Ok(number)
    }

    /// Attach a label to an issue.
    pub fn add_label(
        &self,
        issue_number: i64,
        label: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let url = self.repo_url(&format!("issues/{issue_number}/labels"));
        let payload = json!({ "labels": [label] });

        let rt = tokio::runtime::Runtime::new()?;
        let resp = rt.block_on(
            Client::new()
                .post(&url)
                .header("Authorization", format!("token {}", self.token))
                .header("User-Agent", USER_AGENT)
                .header("Accept", "application/vnd.github+json")
                .json(&payload)
                .send(),
        )?;

        if !resp.status().is_success() {
            return Err(format!("GitHub API error: HTTP {}", resp.status()).into());
        }
        Ok(())
    }

    /// Create or update the repository README via the contents API.
    pub fn upsert_readme(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let url = self.repo_url("contents/README.md");
        let encoded = BASE64.encode(content.as_bytes());

        let rt = tokio::runtime::Runtime::new()?;

        let existing = rt.block_on(
            Client::new()
                .get(&url)
                .header("Authorization", format!("token {}", self.token))
                .header("User-Agent", USER_AGENT)
                .send(),
        )?;

        let mut payload = json!({ "message": "Sync README", "content": encoded });
        if existing.status().is_success() {
            let data: serde_json::Value = rt.block_on(existing.json())?;
            if let Some(sha) = data["sha"].as_str() {
                payload["sha"] = json!(sha);
            }
        }

        let resp = rt.block_on(
            Client::new()
                .put(&url)
                .header("Authorization", format!("token {}", self.token))
                .header("User-Agent", USER_AGENT)
                .json(&payload)
                .send(),
        )?;

        if !resp.status().is_success() {
            return Err(format!("GitHub API error: HTTP {}", resp.status()).into());
        }
        Ok(())
    }

    /// Create one issue per contract ticket that has no issue with the same
    /// title yet. Returns the number of issues created.
    pub fn sync_tickets(&self, tickets: &[Ticket]) -> Result<usize, Box<dyn std::error::Error>> {
        let existing = self.list_issues()?;
        let existing_titles: std::collections::HashSet<&str> = existing
            .iter()
            .filter_map(|issue| issue["title"].as_str())
            .collect();

        let mut created = 0;
        for ticket in tickets {
            if existing_titles.contains(ticket.name.as_str()) {
                continue;
            }
            self.create_issue(&ticket.name, &ticket.description)?;
            created += 1;
        }

        Ok(created)
    }
}

impl IssueSource for GitHubClient {
    /// Open issues that do not carry the `scheduled` label yet.
    fn open_unscheduled_issues(&self) -> Result<Vec<Issue>, Box<dyn std::error::Error>> {
        let issues = self.list_issues()?;

        Ok(issues
            .iter()
            .filter(|issue| issue["state"].as_str() == Some("open"))
            .filter(|issue| {
                let labels = issue["labels"].as_array();
                !labels
                    .map(|labels| {
                        labels
                            .iter()
                            .any(|l| l["name"].as_str() == Some(SCHEDULED_LABEL))
                    })
                    .unwrap_or(false)
            })
            .map(|issue| Issue {
                number: issue["number"].as_i64().unwrap_or(0),
                title: issue["title"].as_str().unwrap_or("(No title)").to_string(),
            })
            .collect())
    }
}

impl Integration for GitHubClient {
    fn name(&self) -> &str {
        "github"
    }

    fn display_name(&self) -> &str {
        "GitHub"
    }

    fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    fn authenticate(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.token.is_empty() {
            return Err("No GitHub token stored. Call set_credentials first.".into());
        }

        let rt = tokio::runtime::Runtime::new()?;
        let resp = rt.block_on(
            Client::new()
                .get(format!("{}/user", self.api_base))
                .header("Authorization", format!("token {}", self.token))
                .header("User-Agent", USER_AGENT)
                .send(),
        )?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(format!("GitHub auth check failed: HTTP {}", resp.status()).into())
        }
    }

    fn disconnect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::delete("github_token")?;
        self.token.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(name: &str, description: &str) -> Ticket {
        Ticket {
            name: name.to_string(),
            estimate_slots: None,
            description: description.to_string(),
            scope_excluded: Vec::new(),
        }
    }

    #[test]
    fn open_unscheduled_filters_state_and_label() {
        let mut server = mockito::Server::new();
        let body = json!([
            { "number": 1, "title": "open unlabeled", "state": "open", "labels": [] },
            { "number": 2, "title": "already scheduled", "state": "open",
              "labels": [{ "name": "scheduled" }] },
            { "number": 3, "title": "closed", "state": "closed", "labels": [] },
        ]);
        let _m = server
            .mock("GET", "/repos/me/proj/issues?state=all")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create();

        let client = GitHubClient::with_base(&server.url(), "me", "proj", "t0k3n");
        let issues = client.open_unscheduled_issues().unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].number, 1);
        assert_eq!(issues[0].title, "open unlabeled");
    }

    #[test]
    fn sync_tickets_skips_existing_titles() {
        let mut server = mockito::Server::new();
        let listing = json!([
            { "number": 1, "title": "Set up repo", "state": "open", "labels": [] },
        ]);
        let _list = server
            .mock("GET", "/repos/me/proj/issues?state=all")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(listing.to_string())
            .create();
        let create = server
            .mock("POST", "/repos/me/proj/issues")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(json!({ "number": 2 }).to_string())
            .expect(1)
            .create();

        let client = GitHubClient::with_base(&server.url(), "me", "proj", "t0k3n");
        let tickets = vec![
            ticket("Set up repo", "already there"),
            ticket("Build importer", "new work"),
        ];
        let created = client.sync_tickets(&tickets).unwrap();

        assert_eq!(created, 1);
        create.assert();
    }

    #[test]
    fn list_issues_propagates_api_errors() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/repos/me/proj/issues?state=all")
            .with_status(401)
            .create();

        let client = GitHubClient::with_base(&server.url(), "me", "proj", "bad");
        let err = client.list_issues().unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn upsert_readme_carries_sha_when_file_exists() {
        let mut server = mockito::Server::new();
        let _get = server
            .mock("GET", "/repos/me/proj/contents/README.md")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "sha": "abc123" }).to_string())
            .create();
        let put = server
            .mock("PUT", "/repos/me/proj/contents/README.md")
            .match_body(mockito::Matcher::PartialJson(json!({ "sha": "abc123" })))
            .with_status(200)
            .with_body("{}")
            .create();

        let client = GitHubClient::with_base(&server.url(), "me", "proj", "t0k3n");
        client.upsert_readme("# Hello").unwrap();
        put.assert();
    }
}
