use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Result of running one gate against a request
pub enum GateOutcome {
    /// Let the request through; the headers are added to the final response
    Continue(HeaderMap),
    /// Stop here and answer with this response
    Reject(Response),
}

impl GateOutcome {
    pub fn pass() -> Self {
        GateOutcome::Continue(HeaderMap::new())
    }
}

/// One stage of request admission
#[async_trait]
pub trait Gate: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Inspect (and possibly annotate) the request before it reaches a handler
    async fn admit(&self, request: &mut Request) -> GateOutcome;
}

/// Ordered chain of gates a request must pass before reaching business logic
#[derive(Clone, Default)]
pub struct AdmissionPipeline {
    gates: Vec<Arc<dyn Gate>>,
}

impl AdmissionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a gate; gates run in insertion order
    pub fn with_gate(mut self, gate: Arc<dyn Gate>) -> Self {
        self.gates.push(gate);
        self
    }

    /// Run every gate in order. Returns the headers collected from passing
    /// gates, or the response of the first gate that rejected. Headers from
    /// gates that already passed are kept on the rejection too.
    pub async fn run(&self, request: &mut Request) -> Result<HeaderMap, Response> {
        let mut collected = HeaderMap::new();

        for gate in &self.gates {
            match gate.admit(request).await {
                GateOutcome::Continue(headers) => collected.extend(headers),
                GateOutcome::Reject(mut response) => {
                    tracing::debug!(
                        gate = gate.name(),
                        status = %response.status(),
                        path = %request.uri().path(),
                        "Request rejected during admission"
                    );
                    response.headers_mut().extend(collected);
                    return Err(response);
                }
            }
        }

        Ok(collected)
    }
}

/// Axum middleware driving an [`AdmissionPipeline`]
pub async fn admission_middleware(
    State(pipeline): State<Arc<AdmissionPipeline>>,
    mut request: Request,
    next: Next,
) -> Response {
    match pipeline.run(&mut request).await {
        Ok(headers) => {
            let mut response = next.run(request).await;
            response.headers_mut().extend(headers);
            response
        }
        Err(rejection) => rejection,
    }
}
