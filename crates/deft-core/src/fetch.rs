//! HTTP fetching of tag listings and dependency files.
//!
//! Everything here is sequential: one dependency at a time, one file at a
//! time. The first failure aborts the install.

use std::path::Path;

use anyhow::Context;
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use url::Url;

use crate::config::Settings;
use crate::descriptor::Dependency;
use crate::plan::{plan_downloads, FileDownload};
use crate::source::GITHUB_API_BASE;
use crate::util::{clip, DISPLAY_NAME_WIDTH};
use crate::version::{resolve_version, TagRecord};

/// Largest page size the GitHub API accepts.
const TAGS_PER_PAGE: &str = "100";

/// Upper bound on followed pages, in case a server keeps linking onwards.
const MAX_TAG_PAGES: usize = 100;

/// Fetches tag listings and files over HTTP.
pub struct Fetcher {
    client: reqwest::Client,
    github_token: Option<String>,
}

impl Fetcher {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            github_token: settings.github_token.clone(),
        })
    }

    /// Fetch the tag listing at `url` (a [`Dependency::tags_url`]).
    ///
    /// Follows the `Link: rel="next"` pagination header until every page
    /// has been read.
    pub async fn fetch_tags(&self, url: &str) -> anyhow::Result<Vec<TagRecord>> {
        let mut tags = Vec::new();
        let mut next = Some(first_page_url(url)?);
        let mut pages = 0;

        while let Some(page_url) = next.take() {
            pages += 1;
            if pages > MAX_TAG_PAGES {
                tracing::warn!(url, pages = MAX_TAG_PAGES, "Tag listing truncated");
                break;
            }

            let (page, next_url) = self.fetch_tag_page(&page_url).await?;
            tags.extend(page);
            next = next_url;
        }

        tracing::debug!(url, count = tags.len(), pages, "Fetched tags");
        Ok(tags)
    }

    async fn fetch_tag_page(
        &self,
        url: &str,
    ) -> anyhow::Result<(Vec<TagRecord>, Option<String>)> {
        tracing::debug!(url, "Fetching tags");

        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = self.token_for(url) {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to fetch tags from {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch tags: HTTP {} from {}",
                response.status(),
                url
            );
        }

        let next_url = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_url);

        let tags: Vec<TagRecord> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse tags response from {}", url))?;

        Ok((tags, next_url))
    }

    /// Settle the version a dependency will be downloaded at.
    ///
    /// Shorthand dependencies with a requested version have it matched
    /// against the published tags; everything else is returned unchanged.
    pub async fn finalize(&self, dep: Dependency) -> anyhow::Result<Dependency> {
        let (Some(requested), Some(tags_url)) = (dep.requested_version(), dep.tags_url()) else {
            return Ok(dep);
        };

        let tags = self.fetch_tags(&tags_url).await?;
        let resolved = resolve_version(&tags, requested);
        if resolved != requested {
            tracing::info!(
                dependency = %dep.name(),
                requested,
                resolved = %resolved,
                "Using newer tag"
            );
        }

        Ok(dep.with_version(resolved))
    }

    /// Download a single planned file, creating parent directories.
    pub async fn download(&self, download: &FileDownload) -> anyhow::Result<()> {
        tracing::debug!(url = %download.url, "Downloading");

        let response = self
            .client
            .get(&download.url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", download.url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to download {}: HTTP {}",
                download.url,
                response.status()
            );
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", download.url))?;

        if let Some(parent) = download.destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        tokio::fs::write(&download.destination, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", download.destination.display()))?;

        tracing::info!(
            file = %clip(&download.file_name(), DISPLAY_NAME_WIDTH),
            bytes = bytes.len(),
            "Downloaded"
        );
        Ok(())
    }

    /// Finalize `dep`, then download all of its files into `destination`.
    pub async fn install(
        &self,
        dep: Dependency,
        destination: &Path,
    ) -> anyhow::Result<Vec<FileDownload>> {
        let name = dep.name();
        let dep = self.finalize(dep).await?;
        let downloads = plan_downloads(&dep, destination)
            .with_context(|| format!("Failed to plan downloads for {}", name))?;

        for download in &downloads {
            self.download(download)
                .await
                .with_context(|| format!("Failed to install {}", name))?;
        }

        Ok(downloads)
    }

    /// The token is only ever sent to the GitHub API.
    fn token_for(&self, url: &str) -> Option<&str> {
        self.github_token
            .as_deref()
            .filter(|_| url.starts_with(GITHUB_API_BASE))
    }
}

/// `url` with the largest page size requested, unless it already sets one.
fn first_page_url(url: &str) -> anyhow::Result<String> {
    let mut parsed = Url::parse(url).with_context(|| format!("Invalid tags URL: {}", url))?;
    if !parsed.query_pairs().any(|(key, _)| key == "per_page") {
        parsed.query_pairs_mut().append_pair("per_page", TAGS_PER_PAGE);
    }
    Ok(parsed.into())
}

/// Target of the `rel="next"` entry of a `Link` header.
fn next_page_url(link: &str) -> Option<String> {
    link.split(',').find_map(|entry| {
        let (target, params) = entry.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|param| matches!(param.trim(), "rel=\"next\"" | "rel=next"));
        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        is_next.then(|| target.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher_with_token(token: Option<&str>) -> Fetcher {
        let settings = Settings {
            github_token: token.map(str::to_string),
            ..Settings::default()
        };
        Fetcher::new(&settings).unwrap()
    }

    #[test]
    fn test_token_only_for_github_api() {
        let fetcher = fetcher_with_token(Some("secret"));
        assert_eq!(
            fetcher.token_for("https://api.github.com/repos/a/b/tags"),
            Some("secret")
        );
        assert_eq!(fetcher.token_for("https://cdn.example.com/x.js"), None);
        assert_eq!(
            fetcher.token_for("https://raw.githubusercontent.com/a/b/master/x.js"),
            None
        );
    }

    #[test]
    fn test_first_page_requests_full_pages() {
        assert_eq!(
            first_page_url("https://api.github.com/repos/a/b/tags").unwrap(),
            "https://api.github.com/repos/a/b/tags?per_page=100"
        );
        assert_eq!(
            first_page_url("https://api.github.com/repos/a/b/tags?per_page=10").unwrap(),
            "https://api.github.com/repos/a/b/tags?per_page=10"
        );
        assert!(first_page_url("not a url").is_err());
    }

    #[test]
    fn test_next_page_from_link_header() {
        let link = concat!(
            "<https://api.github.com/repositories/1/tags?per_page=100&page=2>; rel=\"next\", ",
            "<https://api.github.com/repositories/1/tags?per_page=100&page=5>; rel=\"last\""
        );
        assert_eq!(
            next_page_url(link).as_deref(),
            Some("https://api.github.com/repositories/1/tags?per_page=100&page=2")
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let link = concat!(
            "<https://api.github.com/repositories/1/tags?page=1>; rel=\"prev\", ",
            "<https://api.github.com/repositories/1/tags?page=1>; rel=\"first\""
        );
        assert_eq!(next_page_url(link), None);
        assert_eq!(next_page_url(""), None);
    }

    #[test]
    fn test_no_token_configured() {
        let fetcher = fetcher_with_token(None);
        assert_eq!(fetcher.token_for("https://api.github.com/repos/a/b/tags"), None);
    }

    #[tokio::test]
    async fn test_finalize_without_version_is_offline() {
        let fetcher = fetcher_with_token(None);
        let dep = Dependency::parse_json(r#"["lodash/lodash", "lodash.js"]"#).unwrap();
        let finalized = fetcher.finalize(dep.clone()).await.unwrap();
        assert_eq!(finalized, dep);
    }

    #[tokio::test]
    async fn test_finalize_absolute_source_is_offline() {
        let fetcher = fetcher_with_token(None);
        let dep =
            Dependency::parse_json(r#"["https://cdn.example.com/lib", "1.0.0", "a.js"]"#).unwrap();
        let finalized = fetcher.finalize(dep.clone()).await.unwrap();
        assert_eq!(finalized, dep);
    }
}
