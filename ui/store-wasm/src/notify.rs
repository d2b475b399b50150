use dgn_store_core::{Notice, Notifier};
use tracing::warn;

/// Shows every notice as a blocking `window.alert`.
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, notice: &Notice) {
        if let Err(err) = gloo_utils::window().alert_with_message(notice.message()) {
            warn!("alert failed: {:?}", err);
        }
    }
}
