//! ActionDispatcher service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for delivering the
//! side effects of an activation event (notifications, recording toggle,
//! call escalation). It MUST NOT contain any dwell or bounds logic; when and
//! whether a target fires is decided exclusively by DwellDetector.

mod dry_run;
mod notify;
mod r#trait;

pub use self::r#trait::{create_dispatcher, ActionDispatcherTrait};
