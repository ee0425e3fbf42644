//! GeoServer REST implementation of [`StyleCatalog`].

use std::time::Duration;

use async_trait::async_trait;
use quick_xml::escape::escape;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use sld_protocol::SLD_CONTENT_TYPE;
use tracing::{debug, info, instrument};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::StyleCatalog;

const XML_CONTENT_TYPE: &str = "text/xml";

/// Body registering a style name before its SLD is uploaded.
pub fn style_registration_xml(name: &str) -> String {
    let name = escape(name);
    format!(
        "<style><name>{}</name><filename>{}.sld</filename></style>",
        name, name
    )
}

/// Body setting a layer's default style to `workspace:style`.
pub fn default_style_xml(workspace: &str, style: &str) -> String {
    format!(
        "<layer><defaultStyle><name>{}:{}</name></defaultStyle></layer>",
        escape(workspace),
        escape(style)
    )
}

/// Client for the GeoServer REST API, authenticating with basic credentials.
#[derive(Debug, Clone)]
pub struct GeoServerClient {
    client: Client,
    config: CatalogConfig,
}

impl GeoServerClient {
    pub fn new(config: CatalogConfig) -> CatalogResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// `/rest/styles` or `/rest/workspaces/{ws}/styles`.
    pub fn styles_url(&self, workspace: Option<&str>) -> CatalogResult<Url> {
        match workspace {
            Some(ws) => self.rest_url(&["workspaces", ws, "styles"]),
            None => self.rest_url(&["styles"]),
        }
    }

    pub fn style_url(&self, workspace: Option<&str>, name: &str) -> CatalogResult<Url> {
        match workspace {
            Some(ws) => self.rest_url(&["workspaces", ws, "styles", name]),
            None => self.rest_url(&["styles", name]),
        }
    }

    /// `/rest/layers/{ws}:{layer}`.
    pub fn layer_url(&self, workspace: &str, layer: &str) -> CatalogResult<Url> {
        self.rest_url(&["layers", &format!("{}:{}", workspace, layer)])
    }

    fn rest_url(&self, segments: &[&str]) -> CatalogResult<Url> {
        let base = format!("{}/", self.config.base_url());
        let mut url =
            Url::parse(&base).map_err(|e| CatalogError::Config(format!("{}: {}", base, e)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| CatalogError::Config(format!("{} cannot be a base URL", base)))?;
            path.pop_if_empty().push("rest").extend(segments);
        }
        Ok(url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.config.username, Some(&self.config.password))
    }
}

/// Pass successful responses through; turn anything else into
/// `CatalogError::Status` carrying the response body.
async fn check_status(response: Response) -> CatalogResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(status_error(response).await)
}

async fn status_error(response: Response) -> CatalogError {
    let code = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    CatalogError::Status { code, body }
}

#[async_trait]
impl StyleCatalog for GeoServerClient {
    #[instrument(skip(self, sld), fields(sld_bytes = sld.len()))]
    async fn publish_style(
        &self,
        workspace: Option<&str>,
        name: &str,
        sld: &str,
    ) -> CatalogResult<()> {
        let register = self
            .authed(self.client.post(self.styles_url(workspace)?))
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(style_registration_xml(name))
            .send()
            .await?;

        match register.status() {
            status if status.is_success() => debug!(style = %name, "Registered style"),
            StatusCode::FORBIDDEN | StatusCode::CONFLICT => {
                debug!(style = %name, status = register.status().as_u16(), "Style already registered")
            }
            _ => return Err(status_error(register).await),
        }

        let upload = self
            .authed(self.client.put(self.style_url(workspace, name)?))
            .header(CONTENT_TYPE, SLD_CONTENT_TYPE)
            .body(sld.to_string())
            .send()
            .await?;
        check_status(upload).await?;

        info!(style = %name, workspace = ?workspace, "Published style");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn assign_style(&self, workspace: &str, layer: &str, style: &str) -> CatalogResult<()> {
        let response = self
            .authed(self.client.put(self.layer_url(workspace, layer)?))
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(default_style_xml(workspace, style))
            .send()
            .await?;
        check_status(response).await?;

        info!(layer = %layer, style = %style, "Assigned default style");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_style(
        &self,
        workspace: Option<&str>,
        name: &str,
        purge: bool,
    ) -> CatalogResult<()> {
        let mut url = self.style_url(workspace, name)?;
        url.query_pairs_mut()
            .append_pair("purge", if purge { "true" } else { "false" });

        let response = self.authed(self.client.delete(url)).send().await?;
        check_status(response).await?;

        info!(style = %name, purge, "Deleted style");
        Ok(())
    }
}
