//! User-facing notifications raised by the credential store

use tracing::error;

/// Title used when the native keychain cannot be reached
pub const UNAVAILABLE_TITLE: &str = "Cannot Access Native Keychain";

/// Receives user-facing alerts. Implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Notifier that writes alerts to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        error!("{}: {}", title, message);
    }
}

/// Message shown when the store falls back to memory
pub fn unavailable_message(product_name: &str, detail: &str) -> String {
    let mut message = format!("Credentials are remembered until {} is closed.", product_name);
    if cfg!(target_os = "linux") {
        message.push_str(
            "\nPlease install required package libsecret-1-0: sudo apt-get install libsecret-1-0 gnome-keyring",
        );
    }
    if !detail.is_empty() {
        message.push('\n');
        message.push_str(detail);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message() {
        let message = unavailable_message("Acme IDE", "libsecret-1.so.0: not found");
        assert!(message.starts_with("Credentials are remembered until Acme IDE is closed."));
        assert!(message.ends_with("libsecret-1.so.0: not found"));

        if cfg!(target_os = "linux") {
            assert!(message.contains("libsecret-1-0"));
        }
    }
}
