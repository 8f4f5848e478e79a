/// Raw reply from the inference endpoint, as received.
///
/// The body is expected to be a decimal score such as `"0"` or `"0.87"`, but
/// nothing here checks that; callers forward it untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceOutcome {
    pub body: String,
    pub status: u16,
}

impl InferenceOutcome {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status,
        }
    }

    pub fn success(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
