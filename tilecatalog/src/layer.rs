//! Layer clients, the public entry point for catalog reads.
//!
//! A [`LayerClient`] is bound to one catalog layer and hides the routing,
//! version and cache machinery behind three read operations: partition
//! metadata by id or flat listing, partition metadata by quad key, and
//! blob payloads by data handle.

use crate::error::{ClientError, ClientResult};
use crate::hrn::CatalogHrn;
use crate::lookup::ApiName;
use crate::model::{Partitions, QuadTreeIndex};
use crate::query::QueryClient;
use crate::request::{DataRequest, PartitionsRequest, QuadKeyPartitionsRequest};
use crate::settings::ClientSettings;
use crate::transport::query_string;

/// How a layer versions its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerType {
    /// Contents are immutable per catalog version; reads resolve a version
    /// first and address metadata by it.
    Versioned,
    /// Contents mutate in place; reads never resolve a catalog version.
    Volatile,
}

impl LayerType {
    /// The blob API serving this layer type.
    fn blob_api(self) -> ApiName {
        match self {
            LayerType::Versioned => ApiName::Blob,
            LayerType::Volatile => ApiName::VolatileBlob,
        }
    }
}

/// Read client for a single catalog layer.
pub struct LayerClient {
    hrn: CatalogHrn,
    layer_id: String,
    layer_type: LayerType,
    query: QueryClient,
}

impl LayerClient {
    /// Binds a client to `layer_id` of the catalog `hrn`.
    pub fn new(
        settings: &ClientSettings,
        hrn: CatalogHrn,
        layer_id: impl Into<String>,
        layer_type: LayerType,
    ) -> ClientResult<Self> {
        let layer_id = layer_id.into();
        if layer_id.is_empty() {
            return Err(ClientError::Validation(
                "Please provide correct Id of the Layer".to_string(),
            ));
        }
        Ok(Self {
            hrn,
            layer_id,
            layer_type,
            query: QueryClient::new(settings),
        })
    }

    pub fn hrn(&self) -> &CatalogHrn {
        &self.hrn
    }

    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    pub fn layer_type(&self) -> LayerType {
        self.layer_type
    }

    /// Fetches partition metadata by explicit ids, or the first page of the
    /// whole layer when the request carries no ids.
    pub async fn get_partitions(&self, request: &PartitionsRequest) -> ClientResult<Partitions> {
        self.query
            .get_partitions(request, &self.hrn, &self.layer_id, self.layer_type)
            .await
    }

    /// Fetches the quad-tree index for the request's quad key.
    pub async fn get_partitions_by_quad_key(
        &self,
        request: &QuadKeyPartitionsRequest,
    ) -> ClientResult<QuadTreeIndex> {
        self.query
            .fetch_quad_tree_index(request, &self.hrn, &self.layer_id, self.layer_type)
            .await
    }

    /// Fetches a partition's blob payload.
    ///
    /// A data handle on the request is used directly; otherwise the handle
    /// is resolved first, through the query API, from the partition id or
    /// the quad key.
    pub async fn get_data(&self, request: &DataRequest) -> ClientResult<Vec<u8>> {
        let data_handle = match request.data_handle() {
            Some(handle) => handle.to_string(),
            None => self.resolve_data_handle(request).await?,
        };

        let builder = self
            .query
            .lookup()
            .request_builder(&self.hrn, self.layer_type.blob_api())
            .await?;

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(tag) = request.billing_tag() {
            params.push(("billingTag", tag.to_string()));
        }
        let path = format!(
            "layers/{}/data/{}{}",
            self.layer_id,
            data_handle,
            query_string(&params)
        );
        builder
            .get_bytes(&path)
            .await
            .map_err(|e| ClientError::NetworkFetch(e.to_string()))
    }

    async fn resolve_data_handle(&self, request: &DataRequest) -> ClientResult<String> {
        if let Some(partition_id) = request.partition_id() {
            let mut partitions_request =
                PartitionsRequest::new().with_partition_ids(vec![partition_id.to_string()]);
            if let Some(version) = request.version() {
                partitions_request = partitions_request.with_version(version);
            }
            if let Some(tag) = request.billing_tag() {
                partitions_request = partitions_request.with_billing_tag(tag);
            }
            let partitions = self.get_partitions(&partitions_request).await?;
            return partitions
                .partitions
                .into_iter()
                .next()
                .map(|metadata| metadata.data_handle)
                .ok_or_else(|| ClientError::DataHandleNotFound(partition_id.to_string()));
        }

        if let Some(quad_key) = request.quad_key() {
            let mut quad_request = QuadKeyPartitionsRequest::new().with_quad_key(*quad_key);
            if let Some(version) = request.version() {
                quad_request = quad_request.with_version(version);
            }
            if let Some(tag) = request.billing_tag() {
                quad_request = quad_request.with_billing_tag(tag);
            }
            let index = self.get_partitions_by_quad_key(&quad_request).await?;
            if let Some(sub_quad) = index.sub_quads.first() {
                return Ok(sub_quad.data_handle.clone());
            }
            if let Some(parent_quad) = index.parent_quads.first() {
                return Ok(parent_quad.data_handle.clone());
            }
            return Err(ClientError::DataHandleNotFound(quad_key.to_string()));
        }

        Err(ClientError::Validation(
            "No data handle, partition id or quad key provided in the data request".to_string(),
        ))
    }
}
