//! Output sanitation hook between raw completion text and the caller.
//!
//! The default is a pass-through. Callers swap in stricter filtering (PII
//! redaction, profanity) without touching the generator interface: the
//! generator holds an `Arc<dyn OutputSanitizer>`, same seam pattern as any
//! other pluggable backend in this codebase.

pub trait OutputSanitizer: Send + Sync {
    fn sanitize(&self, text: &str) -> String;
}

/// Default sanitizer: returns the text unchanged.
pub struct IdentitySanitizer;

impl OutputSanitizer for IdentitySanitizer {
    fn sanitize(&self, text: &str) -> String {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct RedactingSanitizer;

    impl OutputSanitizer for RedactingSanitizer {
        fn sanitize(&self, text: &str) -> String {
            text.replace("Jane Doe", "[REDACTED]")
        }
    }

    #[test]
    fn test_identity_sanitizer_is_passthrough() {
        let text = "Discharge summary for Jane Doe.";
        assert_eq!(IdentitySanitizer.sanitize(text), text);
    }

    #[test]
    fn test_sanitizer_is_swappable_behind_trait_object() {
        let sanitizer: Arc<dyn OutputSanitizer> = Arc::new(RedactingSanitizer);
        assert_eq!(
            sanitizer.sanitize("Discharge summary for Jane Doe."),
            "Discharge summary for [REDACTED]."
        );
    }
}
