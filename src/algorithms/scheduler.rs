/// Suspension point the trainer calls between updates.
///
/// The trainer never yields inside a single update, so a host that drops the
/// training future at a yield point never observes a half-applied step.
#[async_trait::async_trait]
pub trait Yielder: Send {
    async fn yield_now(&mut self);
}

/// Hands control back to the tokio scheduler.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioYielder;

/// Returns immediately; for synchronous callers and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopYielder;

/// Counts suspensions without yielding.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingYielder {
    pub count: usize,
}

#[async_trait::async_trait]
impl Yielder for TokioYielder {
    async fn yield_now(&mut self) {
        tokio::task::yield_now().await;
    }
}

#[async_trait::async_trait]
impl Yielder for NoopYielder {
    async fn yield_now(&mut self) {}
}

#[async_trait::async_trait]
impl Yielder for CountingYielder {
    async fn yield_now(&mut self) {
        self.count += 1;
    }
}
