//! Publishing generated styles to a map server catalog.
//!
//! The style engine only produces documents; this crate uploads them and
//! binds them to layers. Create-or-overwrite semantics live here: publishing
//! a style that already exists replaces its SLD body.

pub mod client;
pub mod config;
pub mod error;

pub use client::{default_style_xml, style_registration_xml, GeoServerClient};
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};

use async_trait::async_trait;
use sld_protocol::{to_sld, StyleDocument};

/// Style operations of a catalog.
#[async_trait]
pub trait StyleCatalog: Send + Sync {
    /// Create or overwrite style `name` with an SLD body.
    async fn publish_style(
        &self,
        workspace: Option<&str>,
        name: &str,
        sld: &str,
    ) -> CatalogResult<()>;

    /// Make `style` the default style of `workspace:layer`.
    async fn assign_style(&self, workspace: &str, layer: &str, style: &str) -> CatalogResult<()>;

    /// Remove a style; `purge` also deletes its file on the server.
    async fn delete_style(
        &self,
        workspace: Option<&str>,
        name: &str,
        purge: bool,
    ) -> CatalogResult<()>;

    /// Serialize `doc` and publish it under its own name.
    async fn publish_document(
        &self,
        workspace: Option<&str>,
        doc: &StyleDocument,
    ) -> CatalogResult<()> {
        let sld = to_sld(doc)?;
        self.publish_style(workspace, &doc.name, &sld).await
    }
}
