use crate::error::Result;
use crate::events::{ActivationEvent, RequestKind};
use crate::services::request_profiles::RequestProfiles;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::info;

use super::r#trait::ActionDispatcherTrait;

/// Диспетчер для dry-run режима: только логирует, что было бы отправлено
pub struct DryRunDispatcher {
    recording: AtomicBool,
    dispatched: AtomicUsize,
}

impl DryRunDispatcher {
    pub fn new() -> Self {
        info!("Инициализация DryRunDispatcher");
        Self {
            recording: AtomicBool::new(false),
            dispatched: AtomicUsize::new(0),
        }
    }

    pub fn dispatched_count(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }
}

impl Default for DryRunDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ActionDispatcherTrait for DryRunDispatcher {
    async fn dispatch(&self, event: &ActivationEvent) -> Result<()> {
        let count = self.dispatched.fetch_add(1, Ordering::SeqCst) + 1;
        let profile = RequestProfiles::get(event.kind);

        match event.kind {
            RequestKind::Message => {
                let started = !self.recording.fetch_xor(true, Ordering::SeqCst);
                info!(
                    "[DRY RUN] #{} {}: запись сообщения {}",
                    count,
                    event,
                    if started { "началась бы" } else { "остановилась бы" }
                );
            }
            _ => {
                info!(
                    "[DRY RUN] #{} {}: уведомление \"{}: {}\"{}",
                    count,
                    event,
                    profile.staff_title,
                    profile.staff_body,
                    if profile.urgent { " (срочное)" } else { "" }
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TargetId;

    #[tokio::test]
    async fn test_dry_run_counts_dispatches() {
        let dispatcher = DryRunDispatcher::new();
        let event = ActivationEvent::new(TargetId(1), "Water".to_string(), RequestKind::Water, 4000);

        dispatcher.dispatch(&event).await.unwrap();
        dispatcher.dispatch(&event).await.unwrap();

        assert_eq!(dispatcher.dispatched_count(), 2);
    }
}
