//! Request pipeline
//!
//! raw text -> QueryPreparer -> PredictionClient -> EntityResolutionEngine
//!          -> IntentReclassifier -> IntentFlattener -> NormalizedIntent

use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::intent::{IntentFlattener, IntentReclassifier, NormalizedIntent, ResolvedIntent};
use crate::prediction::{PredictionClient, PredictionDocument};
use crate::query::{Prepared, PreparedQuery, QueryPreparer};
use crate::resolve::EntityResolutionEngine;

/// Result of handling one request
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// Nothing to predict; the client was not called
    EmptyInput,
    Resolved {
        resolved: ResolvedIntent,
        normalized: NormalizedIntent,
    },
}

/// Turns user text into normalized intents
///
/// Holds no per-request state, so one pipeline can serve concurrent requests.
pub struct IntentPipeline<C: PredictionClient> {
    client: C,
    engine: EntityResolutionEngine,
}

impl<C: PredictionClient> IntentPipeline<C> {
    pub fn new(client: C, config: EngineConfig) -> Self {
        Self {
            client,
            engine: EntityResolutionEngine::new(&config),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Handle one raw query
    pub async fn handle(&self, raw: &str) -> Result<PipelineOutcome> {
        let query = match QueryPreparer::prepare(raw) {
            Prepared::Empty => {
                tracing::debug!("empty input, skipping prediction");
                return Ok(PipelineOutcome::EmptyInput);
            }
            Prepared::Query(query) => query,
        };

        let document = self.client.predict(&query.text).await?;
        self.normalize_document(&document, &query)
    }

    /// Run resolution, reclassification and flattening on a prediction
    pub fn normalize_document(
        &self,
        document: &PredictionDocument,
        query: &PreparedQuery,
    ) -> Result<PipelineOutcome> {
        let resolution = self.engine.resolve(document, &query.original);
        let resolved = IntentReclassifier::apply(resolution);
        let normalized = IntentFlattener::flatten(&resolved)?;

        tracing::debug!(
            top_intent = %normalized.top_intent,
            entities = normalized.entities.len(),
            "normalized intent"
        );

        Ok(PipelineOutcome::Resolved {
            resolved,
            normalized,
        })
    }
}
