use async_trait::async_trait;

/// A text-generation capability: one prompt in, optionally some text out.
///
/// Every provider attempt shares this signature so callers can compose them
/// as an ordered list instead of branching on provider identity. Failure is
/// soft by contract: transport errors, non-2xx statuses and empty payloads
/// all come back as `None` (implementations log them); the normalizer treats
/// total provider failure as the common case, not the exception.
///
/// An implementation may also return human-readable diagnostic text instead
/// of `None`. The normalizer classifies such text as unusable the same way
/// it classifies any answer without structured content.
#[async_trait]
pub trait TextGen: Send + Sync {
    /// Short provider label used in logs.
    fn name(&self) -> &'static str;

    /// Send one prompt, return the provider's text if any was produced.
    async fn generate(&self, prompt: &str) -> Option<String>;
}
