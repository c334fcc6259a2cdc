//! Action pipeline state machine.
//!
//! ```text
//! RECEIVED -> VERIFIED -> DECODED -> TARGET_RESOLVED -> ISOLATED
//!          -> ACKNOWLEDGED (optional) -> DONE
//! ```
//!
//! Any stage may exit with an [`ActionError`]; each kind maps to one response
//! status. The pipeline holds only immutable configuration and injected
//! collaborators, so a single instance serves concurrent requests.

use guardwire_types::action::{ActionResponse, IsolationOutcome};
use guardwire_types::delivery::Delivery;
use guardwire_types::error::ActionError;
use guardwire_types::webhook::InboundRequest;

use crate::webhook::{
    SignatureVerifier, decode_payload, decode_transport_body, extract_action, resolve_target,
};

use super::executor::{AcknowledgmentSender, IsolationExecutor};

/// Upper bound on collaborator error text echoed in a 500 response.
const MAX_ERROR_DETAIL_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStage {
    Received,
    Verified,
    Decoded,
    TargetResolved,
    Isolated,
    Acknowledged,
    Done,
}

impl ActionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStage::Received => "RECEIVED",
            ActionStage::Verified => "VERIFIED",
            ActionStage::Decoded => "DECODED",
            ActionStage::TargetResolved => "TARGET_RESOLVED",
            ActionStage::Isolated => "ISOLATED",
            ActionStage::Acknowledged => "ACKNOWLEDGED",
            ActionStage::Done => "DONE",
        }
    }
}

fn enter(stage: ActionStage) {
    tracing::debug!(stage = stage.as_str(), "action pipeline transition");
}

/// Confirmation text posted to the interaction's callback address.
pub fn acknowledgment_text(resource_id: &str) -> String {
    format!(":lock: Instance {resource_id} has been quarantined.")
}

/// Verifies, decodes and executes quarantine requests.
pub struct ActionPipeline<E, A> {
    verifier: SignatureVerifier,
    executor: E,
    acknowledger: A,
    policy_id: String,
}

impl<E, A> ActionPipeline<E, A>
where
    E: IsolationExecutor,
    A: AcknowledgmentSender,
{
    pub fn new(
        verifier: SignatureVerifier,
        executor: E,
        acknowledger: A,
        policy_id: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            executor,
            acknowledger,
            policy_id: policy_id.into(),
        }
    }

    pub fn verifier(&self) -> &SignatureVerifier {
        &self.verifier
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn acknowledger(&self) -> &A {
        &self.acknowledger
    }

    /// Handle a request against the current wall clock.
    pub async fn handle(&self, request: &InboundRequest) -> ActionResponse {
        self.handle_at(request, chrono::Utc::now().timestamp()).await
    }

    /// Handle a request as if received at `now` (seconds since the epoch).
    pub async fn handle_at(&self, request: &InboundRequest, now: i64) -> ActionResponse {
        match self.process(request, now).await {
            Ok(outcome) => ActionResponse::new(
                200,
                format!(
                    "EC2 instance {} quarantined successfully",
                    outcome.resource_id
                ),
            ),
            Err(err) => {
                tracing::warn!(
                    error_kind = err.kind(),
                    status = err.status(),
                    "action request rejected"
                );
                ActionResponse::new(err.status(), err.response_body())
            }
        }
    }

    /// Run the state machine, returning the isolation outcome or the terminal error.
    pub async fn process(
        &self,
        request: &InboundRequest,
        now: i64,
    ) -> Result<IsolationOutcome, ActionError> {
        enter(ActionStage::Received);

        let body = decode_transport_body(request)?;
        self.verifier.verify(request, &body, now)?;
        enter(ActionStage::Verified);

        let payload = decode_payload(&body)?;
        let action = extract_action(&payload)?;
        enter(ActionStage::Decoded);

        let resource_id = resolve_target(&action)?;
        enter(ActionStage::TargetResolved);
        tracing::info!(
            resource_id = %resource_id,
            action_id = action.action_id.as_deref().unwrap_or("unknown"),
            user = action.user.as_deref().unwrap_or("unknown"),
            "quarantine requested"
        );

        let outcome = self.isolate(&resource_id).await;
        if !outcome.success {
            return Err(ActionError::ExecutionFailed {
                resource_id: outcome.resource_id,
                detail: outcome.error_detail.unwrap_or_default(),
            });
        }
        enter(ActionStage::Isolated);

        if let Some(callback_url) = action.response_url.as_deref() {
            if self.acknowledge(callback_url, &resource_id).await.is_delivered() {
                enter(ActionStage::Acknowledged);
            }
        }

        enter(ActionStage::Done);
        Ok(outcome)
    }

    /// Single isolation attempt. Collaborator errors are captured, never retried.
    async fn isolate(&self, resource_id: &str) -> IsolationOutcome {
        match self.executor.isolate(resource_id, &self.policy_id).await {
            Ok(()) => {
                tracing::info!(resource_id, policy_id = %self.policy_id, "instance quarantined");
                IsolationOutcome::succeeded(resource_id)
            }
            Err(e) => {
                let detail = self.redact_detail(&e.to_string());
                tracing::error!(resource_id, error = %detail, "isolation failed");
                IsolationOutcome::failed(resource_id, detail)
            }
        }
    }

    /// Best-effort acknowledgment. The returned [`Delivery`] is informational;
    /// a failed post is logged and otherwise ignored.
    pub async fn acknowledge(&self, callback_url: &str, resource_id: &str) -> Delivery {
        let text = acknowledgment_text(resource_id);
        match self
            .acknowledger
            .post_acknowledgment(callback_url, &text)
            .await
        {
            Ok(()) => Delivery::Delivered,
            Err(e) => {
                tracing::warn!(resource_id, error = %e, "acknowledgment delivery failed");
                Delivery::Failed(e.to_string())
            }
        }
    }

    /// First line only, secret removed, bounded length.
    fn redact_detail(&self, raw: &str) -> String {
        let first_line = raw.lines().next().unwrap_or_default();
        self.verifier
            .redact(first_line)
            .chars()
            .take(MAX_ERROR_DETAIL_CHARS)
            .collect()
    }
}
