//! Lock/unlock feedback.

use tracing::info;

/// Signals the new lock state to the user.
///
/// `enabled` is the state the touch devices were just put in: `false` when the
/// lock engaged, `true` when it was released.
pub trait Notifier {
    fn notify(&mut self, enabled: bool);
}

/// Log-only feedback. Used when sounds are disabled or unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, enabled: bool) {
        if enabled {
            info!("touch input unlocked");
        } else {
            info!("touch input locked");
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, enabled: bool) {
        (**self).notify(enabled)
    }
}
