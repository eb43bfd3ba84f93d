//! Operating-system color scheme detection.
//!
//! [`SchemeMonitor`] publishes the OS scheme on a `watch` channel. The probe
//! task only shells out while at least one receiver is subscribed, so a
//! theme pinned to light or dark costs nothing.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::watch;
use tracing::debug;

use crate::theme::Resolved;

pub const PROBE_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct SchemeMonitor {
    tx: Arc<watch::Sender<Resolved>>,
}

impl SchemeMonitor {
    /// A monitor fed only through [`SchemeMonitor::publish`].
    pub fn manual(initial: Resolved) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Probes once, then keeps probing in the background. Must be called
    /// inside a tokio runtime. The task ends once every clone of the monitor
    /// is dropped.
    pub async fn spawn(interval: Duration) -> Self {
        let monitor = Self::manual(initial_scheme(probe().await));
        let weak = Arc::downgrade(&monitor.tx);
        tokio::spawn(probe_loop(weak, interval));
        monitor
    }

    pub fn current(&self) -> Resolved {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Resolved> {
        self.tx.subscribe()
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }

    #[cfg(test)]
    pub fn publish(&self, scheme: Resolved) {
        publish(&self.tx, scheme);
    }
}

/// Light unless the desktop or terminal says otherwise.
fn initial_scheme(probed: Option<Resolved>) -> Resolved {
    probed.unwrap_or(Resolved::Light)
}

fn publish(tx: &watch::Sender<Resolved>, scheme: Resolved) -> bool {
    tx.send_if_modified(|current| {
        let changed = *current != scheme;
        *current = scheme;
        changed
    })
}

async fn probe_loop(weak: Weak<watch::Sender<Resolved>>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // the first tick is immediate and `spawn` has just probed
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let Some(tx) = weak.upgrade() else { break };
        if tx.receiver_count() == 0 {
            continue;
        }
        if let Some(scheme) = probe().await {
            if publish(&tx, scheme) {
                debug!(?scheme, "OS color scheme changed");
            }
        }
    }
}

/// Asks the desktop for its scheme, falling back to the terminal's colors.
pub async fn probe() -> Option<Resolved> {
    if cfg!(target_os = "macos") {
        // the key is absent in light mode, which makes `defaults` fail
        let output = Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .await
            .ok()?;
        return Some(parse_apple_interface_style(
            output.status.success(),
            &String::from_utf8_lossy(&output.stdout),
        ));
    }

    let gsettings = Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
        .await;
    if let Ok(output) = gsettings {
        if output.status.success() {
            if let Some(scheme) = parse_gsettings(&String::from_utf8_lossy(&output.stdout)) {
                return Some(scheme);
            }
        }
    }
    scheme_from_env()
}

pub fn scheme_from_env() -> Option<Resolved> {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| parse_colorfgbg(&value))
}

pub fn parse_gsettings(output: &str) -> Option<Resolved> {
    match output.trim().trim_matches('\'') {
        "prefer-dark" => Some(Resolved::Dark),
        "prefer-light" | "default" => Some(Resolved::Light),
        _ => None,
    }
}

pub fn parse_apple_interface_style(success: bool, stdout: &str) -> Resolved {
    if success && stdout.trim().eq_ignore_ascii_case("dark") {
        Resolved::Dark
    } else {
        Resolved::Light
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); a background in the
/// 0-6 or 8 range means a dark terminal.
pub fn parse_colorfgbg(value: &str) -> Option<Resolved> {
    let bg = value.rsplit(';').next()?.trim().parse::<u8>().ok()?;
    Some(match bg {
        0..=6 | 8 => Resolved::Dark,
        _ => Resolved::Light,
    })
}
