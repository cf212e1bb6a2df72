/// Shows short lived, non blocking messages to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Sends the notices to the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        log::info!("[Notice] {}", message);
    }
}
