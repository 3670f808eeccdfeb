//! Layer statistics and coverage reads.
//!
//! The statistics API reports what a versioned layer actually contains: a
//! per-level summary with sizes and partition counts, and coverage maps
//! rendered server-side. Coverage fetches dispatch on a closed
//! [`CoverageDataType`]; the rendered map comes back as raw bytes and is
//! not decoded here.

use std::sync::Arc;

use crate::error::{ClientError, ClientResult};
use crate::hrn::CatalogHrn;
use crate::lookup::{ApiLookupClient, ApiName};
use crate::model::LayerSummary;
use crate::request::StatisticsRequest;
use crate::settings::ClientSettings;
use crate::transport::query_string;

/// The closed set of coverage maps the statistics API can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageDataType {
    /// Presence map: which tiles hold data.
    Bitmap,
    /// Heat map of stored bytes per tile.
    Sizemap,
    /// Heat map of data age per tile.
    Timemap,
}

impl CoverageDataType {
    /// The path segment serving this map.
    fn path(self) -> &'static str {
        match self {
            CoverageDataType::Bitmap => "tilemap",
            CoverageDataType::Sizemap => "heatmap/size",
            CoverageDataType::Timemap => "heatmap/age",
        }
    }
}

/// Read client for layer summaries and coverage maps.
pub struct StatisticsClient {
    lookup: Arc<ApiLookupClient>,
}

impl StatisticsClient {
    pub fn new(settings: &ClientSettings) -> Self {
        Self {
            lookup: Arc::new(ApiLookupClient::new(settings)),
        }
    }

    /// Fetches the per-level summary of a layer.
    pub async fn get_summary(
        &self,
        hrn: &CatalogHrn,
        layer_id: &str,
    ) -> ClientResult<LayerSummary> {
        if layer_id.is_empty() {
            return Err(ClientError::Validation(
                "Please provide correct Id of the Layer".to_string(),
            ));
        }
        let builder = self.lookup.request_builder(hrn, ApiName::Statistics).await?;
        builder
            .get_json(&format!("layers/{}/summary", layer_id))
            .await
            .map_err(|e| ClientError::StatisticsService(e.to_string()))
    }

    /// Fetches a rendered coverage map for a layer.
    ///
    /// The request must carry a data type and a data level; both are
    /// rejected before any network access when absent.
    pub async fn get_statistics(
        &self,
        request: &StatisticsRequest,
        hrn: &CatalogHrn,
        layer_id: &str,
    ) -> ClientResult<Vec<u8>> {
        if layer_id.is_empty() {
            return Err(ClientError::Validation(
                "Please provide correct Id of the Layer".to_string(),
            ));
        }
        let data_type = request
            .data_type()
            .ok_or_else(|| ClientError::Validation("No typemap provided".to_string()))?;
        let data_level = request
            .data_level()
            .ok_or_else(|| ClientError::Validation("No dataLevel provided".to_string()))?;

        let mut params: Vec<(&str, String)> = vec![
            ("datalevel", data_level.to_string()),
            ("catalogHRN", hrn.to_string()),
        ];
        if let Some(tag) = request.billing_tag() {
            params.push(("billingTag", tag.to_string()));
        }

        let builder = self.lookup.request_builder(hrn, ApiName::Statistics).await?;
        let path = format!(
            "layers/{}/{}{}",
            layer_id,
            data_type.path(),
            query_string(&params)
        );
        builder
            .get_bytes(&path)
            .await
            .map_err(|e| ClientError::StatisticsService(e.to_string()))
    }
}
