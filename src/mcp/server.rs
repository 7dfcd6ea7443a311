//! UNC MCP Server Implementation
//!
//! Exposes the reconciled nutrition feed as MCP tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::feed::FeedStatus;
use crate::fetch::SourceFetcher;
use crate::tools::entries;
use crate::tools::status::StatusTracker;

/// UNC MCP Service
#[derive(Clone)]
pub struct UncService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    fetcher: Arc<dyn SourceFetcher>,
    tool_router: ToolRouter<UncService>,
}

impl UncService {
    pub fn new(fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(fetcher.describe()))),
            fetcher,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetEntriesParams {
    /// Source keys to load: any of "a", "b", "c", "d" (default: all)
    pub sources: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NormalizeRecordsParams {
    /// Source key: "a", "b", "c", or "d"
    pub source: String,
    /// Raw JSON array of records in that source's format
    pub records: serde_json::Value,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckCaloriesParams {
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrate in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
    /// Reported calories (kcal)
    pub calories: f64,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl UncService {
    #[tool(description = "Get the current status of the UNC service including build info, source configuration, last feed status, and process information")]
    async fn unc_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Explain confidence levels, data-quality issues, and feed status. Call this before interpreting entries.")]
    fn reconciliation_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::RECONCILIATION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(RECONCILIATION_INSTRUCTIONS)]))
    }

    #[tool(description = "Fetch entries from all (or selected) sources, validate and normalize them, and return one feed sorted newest first with per-source status")]
    async fn get_entries(&self, Parameters(p): Parameters<GetEntriesParams>) -> Result<CallToolResult, McpError> {
        self.status_tracker.lock().await.record_feed(FeedStatus::Loading);

        let feed = entries::get_entries(Arc::clone(&self.fetcher), p.sources.as_deref())
            .await
            .map_err(|e| McpError::invalid_params(e, None))?;

        self.status_tracker.lock().await.record_feed(feed.status);
        to_json(&feed)
    }

    #[tool(description = "Validate and normalize a raw JSON array of records for one source without fetching")]
    fn normalize_records(&self, Parameters(p): Parameters<NormalizeRecordsParams>) -> Result<CallToolResult, McpError> {
        let result = entries::normalize_records(&p.source, &p.records)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Check whether reported calories agree with protein, carbs, and fat (4/4/9 kcal per gram, 10 kcal tolerance)")]
    fn check_calories(&self, Parameters(p): Parameters<CheckCaloriesParams>) -> Result<CallToolResult, McpError> {
        to_json(&entries::check_calories(p.protein, p.carbs, p.fat, p.calories))
    }
}

#[tool_handler]
impl ServerHandler for UncService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "unc".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Unreliable Nutrition Contract".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Unreliable Nutrition Contract (UNC) - Reconciles nutrition logs from four sources \
                 into one feed with confidence levels and data-quality issues. \
                 Call reconciliation_instructions before interpreting entries. \
                 Feed: get_entries. Ad-hoc: normalize_records, check_calories. Status: unc_status."
                    .into(),
            ),
        }
    }
}
