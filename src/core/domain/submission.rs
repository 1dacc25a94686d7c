//! Outcome of a single transaction-executor submission.

/// `(confirmed, signature, error)`. `confirmed = true` iff the underlying network reported
/// inclusion without error.
#[derive(Debug, Clone)]
pub struct SubmissionResult {
    pub confirmed: bool,
    pub signature: Option<String>,
    pub error: Option<String>,
}

impl SubmissionResult {
    #[must_use]
    pub fn confirmed(signature: impl Into<String>) -> Self {
        Self {
            confirmed: true,
            signature: Some(signature.into()),
            error: None,
        }
    }

    #[must_use]
    pub fn unconfirmed(error: impl Into<String>) -> Self {
        Self {
            confirmed: false,
            signature: None,
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub fn sent_unconfirmed(signature: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            confirmed: false,
            signature: Some(signature.into()),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_result_carries_signature_and_no_error() {
        let result = SubmissionResult::confirmed("sig123");
        assert!(result.confirmed);
        assert_eq!(result.signature.as_deref(), Some("sig123"));
        assert!(result.error.is_none());
    }

    #[test]
    fn unconfirmed_result_has_no_signature() {
        let result = SubmissionResult::unconfirmed("blockhash expired");
        assert!(!result.confirmed);
        assert!(result.signature.is_none());
    }
}
