use crate::error::Result;
use crate::events::ActivationEvent;
use std::sync::Arc;

/// Trait for action dispatchers that deliver activation side effects
#[async_trait::async_trait]
pub trait ActionDispatcherTrait: Send + Sync {
    /// Deliver the side effects for one activation event
    async fn dispatch(&self, event: &ActivationEvent) -> Result<()>;
}

/// Factory function to create an appropriate dispatcher based on the dry_run flag
pub fn create_dispatcher(dry_run: bool) -> Result<Arc<dyn ActionDispatcherTrait>> {
    if dry_run {
        Ok(Arc::new(super::dry_run::DryRunDispatcher::new()))
    } else {
        Ok(Arc::new(super::notify::NotifyDispatcher::new()))
    }
}
