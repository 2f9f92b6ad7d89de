use daybook_core::reminder::{NotificationIntent, Notifier, NotifyError};
use notify_rust::Notification;

/// Shows reminders as desktop notifications.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, intent: &NotificationIntent) -> Result<(), NotifyError> {
        Notification::new()
            .appname("daybook")
            .summary(&intent.title)
            .body(&intent.body)
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::from(format!("{} ({})", e, intent.tag)))
    }
}
