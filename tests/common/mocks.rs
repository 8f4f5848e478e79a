use async_trait::async_trait;
use sentiment_relay::{
    Error, Result,
    inference::{InferenceEndpoint, InferenceOutcome},
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the mock endpoint does when invoked.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Reply(InferenceOutcome),
    TransportFailure(String),
    Hang(Duration),
}

/// Recording inference endpoint for handler tests
#[derive(Debug, Clone)]
pub struct MockInferenceEndpoint {
    pub behavior: MockBehavior,
    pub requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockInferenceEndpoint {
    pub fn replying(body: &str) -> Self {
        Self::with_behavior(MockBehavior::Reply(InferenceOutcome::success(body)))
    }

    pub fn replying_status(status: u16, body: &str) -> Self {
        Self::with_behavior(MockBehavior::Reply(InferenceOutcome::new(status, body)))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_behavior(MockBehavior::TransportFailure(message.to_string()))
    }

    pub fn hanging(delay: Duration) -> Self {
        Self::with_behavior(MockBehavior::Hang(delay))
    }

    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceEndpoint for MockInferenceEndpoint {
    async fn invoke(&self, payload: &str, content_type: &str) -> Result<InferenceOutcome> {
        self.requests
            .lock()
            .unwrap()
            .push((payload.to_string(), content_type.to_string()));

        match &self.behavior {
            MockBehavior::Reply(outcome) => Ok(outcome.clone()),
            MockBehavior::TransportFailure(message) => Err(Error::internal(message.clone())),
            MockBehavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(InferenceOutcome::success("1"))
            }
        }
    }
}
