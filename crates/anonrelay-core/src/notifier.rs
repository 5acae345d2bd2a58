//! Best-effort admin notification fan-out
//!
//! Operational failures (mirror or relay delivery errors) are reported to a
//! configured set of administrators. Each delivery attempt is independent and
//! failures are never surfaced to end users.

use smallvec::SmallVec;
use tracing::debug;

use crate::transport::ChatTransport;
use crate::types::UserId;

// ----------------------------------------------------------------------------
// Admin Notifier
// ----------------------------------------------------------------------------

/// Fan-out of operational-failure notices to administrators
#[derive(Debug, Clone, Default)]
pub struct AdminNotifier {
    admins: SmallVec<[UserId; 4]>,
}

impl AdminNotifier {
    /// Create a notifier for the given administrator set.
    ///
    /// An empty set disables notifications entirely.
    pub fn new<I: IntoIterator<Item = UserId>>(admins: I) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }

    /// Whether any administrators are configured
    pub fn is_enabled(&self) -> bool {
        !self.admins.is_empty()
    }

    /// Send a notice to every configured administrator.
    ///
    /// A failure to reach one administrator does not prevent attempts to the
    /// others; failures are only logged.
    pub async fn notify<T: ChatTransport>(&self, transport: &mut T, text: &str) {
        if self.admins.is_empty() {
            return;
        }
        let notice = format!("[admin] {}", text);
        for &admin in &self.admins {
            if let Err(e) = transport.send_text(admin, &notice).await {
                debug!(%admin, error = %e, "admin notification failed");
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
