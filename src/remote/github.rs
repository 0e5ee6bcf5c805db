//! GitHub implementation of [`IssueApi`].

use std::future::Future;
use std::time::Duration;

use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};

use crate::config::Config;
use crate::error::{HelperError, Result};
use crate::types::{Release, SearchResult};

use super::IssueApi;
use super::error::to_helper_error;

/// GitHub REST client scoped to one owner
pub struct GitHubApi {
    client: Octocrab,
    owner: String,
    release_repository: String,
    search_repository: String,
    search_limit: u8,
    timeout: Duration,
}

impl GitHubApi {
    /// Create a client from configuration. A token is optional.
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.github_token().map(SecretString::from);
        let client = build_client(&config.api_base_url, token.as_ref())?;

        Ok(Self {
            client,
            owner: config.owner.clone(),
            release_repository: config.release_repository.clone(),
            search_repository: config.search_repository.clone(),
            search_limit: config.search.limit,
            timeout: config.remote_timeout(),
        })
    }

    /// The search query sent for a keyword.
    pub fn search_query(&self, keyword: &str) -> String {
        format!(
            "is:issue repo:{}/{} {}",
            self.owner,
            self.search_repository,
            keyword.trim()
        )
    }

    async fn with_timeout<T, F>(&self, request: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, octocrab::Error>>,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result.map_err(|e| to_helper_error(&e)),
            Err(_) => Err(HelperError::Timeout(self.timeout.as_secs())),
        }
    }
}

fn build_client(base_url: &str, token: Option<&SecretString>) -> Result<Octocrab> {
    let builder = Octocrab::builder()
        .base_uri(base_url)
        .map_err(|e| HelperError::Config(format!("invalid api_base_url '{base_url}': {e}")))?;

    let builder = match token {
        Some(token) => builder.personal_token(token.expose_secret().to_string()),
        None => builder,
    };

    builder
        .build()
        .map_err(|e| HelperError::Api(format!("Failed to create GitHub client: {e}")))
}

impl IssueApi for GitHubApi {
    async fn list_releases(&self) -> Result<Vec<Release>> {
        tracing::debug!(
            owner = %self.owner,
            repo = %self.release_repository,
            "fetching releases"
        );

        let repos = self.client.repos(&self.owner, &self.release_repository);
        let page = self.with_timeout(repos.releases().list().send()).await?;

        Ok(page
            .items
            .into_iter()
            .map(|release| Release {
                tag_name: release.tag_name,
            })
            .collect())
    }

    async fn search_issues(&self, keyword: &str) -> Result<Vec<SearchResult>> {
        let query = self.search_query(keyword);
        tracing::debug!(%query, "searching issues");

        let search = self.client.search();
        let page = self
            .with_timeout(
                search
                    .issues_and_pull_requests(&query)
                    .per_page(self.search_limit)
                    .send(),
            )
            .await?;

        Ok(page
            .items
            .into_iter()
            .take(self.search_limit as usize)
            .map(|issue| SearchResult {
                url: issue.html_url.to_string(),
                title: issue.title,
            })
            .collect())
    }
}
