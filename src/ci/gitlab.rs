//! GitLab pipelines API implementation

use crate::ci::CiService;
use crate::error::{Error, Result};
use crate::types::Pipeline;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

/// GitLab CI client using reqwest
pub struct GitLabCi {
    client: Client,
    token: Option<String>,
    api_url: String,
    project: String,
}

/// Pipeline as returned by `/projects/:id/pipelines`
#[derive(Deserialize)]
struct GitLabPipeline {
    id: u64,
    status: String,
    #[serde(default)]
    web_url: Option<String>,
}

impl From<GitLabPipeline> for Pipeline {
    fn from(p: GitLabPipeline) -> Self {
        Self {
            id: p.id,
            status: p.status,
            web_url: p.web_url,
        }
    }
}

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl GitLabCi {
    /// Create a client for `project` (numeric ID or `group/name` path)
    ///
    /// `api_url` is the API root, e.g. `https://gitlab.freedesktop.org/api/v4`.
    pub fn new(api_url: &str, project: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitLabApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            api_url: api_url.trim_end_matches('/').to_string(),
            project: project.to_string(),
        })
    }

    fn pipelines_url(&self) -> String {
        format!(
            "{}/projects/{}/pipelines",
            self.api_url,
            urlencoding::encode(&self.project)
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header("PRIVATE-TOKEN", token),
            None => request,
        }
    }
}

#[async_trait]
impl CiService for GitLabCi {
    async fn latest_pipeline(&self, git_ref: &str) -> Result<Option<Pipeline>> {
        debug!(git_ref, "finding latest pipeline");
        let url = self.pipelines_url();

        let pipelines: Vec<GitLabPipeline> = self
            .authorized(self.client.get(&url))
            .query(&[("ref", git_ref), ("per_page", "1")])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        let result: Option<Pipeline> = pipelines.into_iter().next().map(Into::into);
        if let Some(ref p) = result {
            debug!(pipeline_id = p.id, status = %p.status, "found pipeline");
        } else {
            debug!(git_ref, "no pipeline found");
        }
        Ok(result)
    }

    async fn pipeline(&self, id: u64) -> Result<Pipeline> {
        let url = format!("{}/{id}", self.pipelines_url());

        let pipeline: GitLabPipeline = self
            .authorized(self.client.get(&url))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        debug!(pipeline_id = id, status = %pipeline.status, "got pipeline status");
        Ok(pipeline.into())
    }
}
