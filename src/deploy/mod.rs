//! Ordered deployment plans.
//!
//! A [`DeployPlan`] is a named list of logical steps. It can be rendered
//! offline, showing the exact documents a session would send, or executed
//! step by step against a live session. Execution carries on past failed
//! steps so the caller sees every result.

use crate::{
    command::{self, Action, ConfigError, Params},
    session::{Response, SendError, Session},
};

/// One logical step of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployStep {
    /// Human-readable description.
    pub label: String,
    /// Requested action.
    pub action: Action,
    /// Action parameters.
    pub params: Params,
}

/// A step rendered to its request document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedStep {
    /// Step description.
    pub label: String,
    /// Request ID the document carries.
    pub request_id: u64,
    /// Request document.
    pub document: String,
}

/// Named, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPlan {
    /// Plan name.
    pub name: String,
    /// Steps in execution order.
    pub steps: Vec<DeployStep>,
}

impl DeployPlan {
    /// Create an empty plan.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, label: impl Into<String>, action: Action, params: Params) -> Self {
        self.steps.push(DeployStep {
            label: label.into(),
            action,
            params,
        });
        self
    }

    /// Cyclic timer driving an up-counter inside `resource`.
    ///
    /// The timer fires every 100 ms and each tick increments the counter.
    #[must_use]
    pub fn timer_counter(resource: &str) -> Self {
        Self::new("timer -> counter")
            .step(
                format!("create resource {resource}"),
                Action::CreateResource,
                Params::new().with("name", resource),
            )
            .step(
                "create timer TIMER1 (E_CYCLE)",
                Action::CreateFb,
                Params::new()
                    .with("name", "TIMER1")
                    .with("type", "E_CYCLE")
                    .with("resource", resource),
            )
            .step(
                "set timer interval to 100 ms",
                Action::WriteParam,
                Params::new()
                    .with("fb_name", "TIMER1")
                    .with("param_name", "DT")
                    .with("param_value", "T#100ms")
                    .with("resource", resource),
            )
            .step(
                "create counter COUNTER1 (E_CTU)",
                Action::CreateFb,
                Params::new()
                    .with("name", "COUNTER1")
                    .with("type", "E_CTU")
                    .with("resource", resource),
            )
            .step(
                "connect TIMER1.CHO -> COUNTER1.CU",
                Action::CreateConnection,
                Params::new()
                    .with("source", "TIMER1.CHO")
                    .with("destination", "COUNTER1.CU")
                    .with("resource", resource),
            )
            .step(
                format!("start {resource}"),
                Action::Start,
                Params::new().with("name", resource),
            )
    }

    /// Render every step with consecutive IDs starting at the session's next
    /// request ID. The session is not touched.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingParam`] for the first step lacking a
    /// required parameter.
    pub fn render(&self, session: &Session) -> Result<Vec<RenderedStep>, ConfigError> {
        let escaping = session.config().escaping;
        (session.next_request_id()..)
            .zip(&self.steps)
            .map(|(request_id, step)| {
                command::build_with(&step.action, &step.params, request_id, escaping).map(
                    |document| RenderedStep {
                        label: step.label.clone(),
                        request_id,
                        document,
                    },
                )
            })
            .collect()
    }

    /// Send every step in order, collecting each result.
    pub fn execute(&self, session: &mut Session) -> Vec<Result<Response, SendError>> {
        self.execute_with(session, |_, _| {})
    }

    /// As [`DeployPlan::execute`], calling `progress` after each step.
    pub fn execute_with<F>(
        &self,
        session: &mut Session,
        mut progress: F,
    ) -> Vec<Result<Response, SendError>>
    where
        F: FnMut(&DeployStep, &Result<Response, SendError>),
    {
        self.steps
            .iter()
            .map(|step| {
                let result = session.send(&step.action, &step.params);
                progress(step, &result);
                result
            })
            .collect()
    }
}
