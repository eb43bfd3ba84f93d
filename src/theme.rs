//! Light/dark/system theme preference and the palettes it resolves to.
//!
//! [`ThemeController`] is the single source of truth for the resolved theme.
//! Views either read [`ThemeController::palette`] or hold a receiver from
//! [`ThemeController::subscribe`]. While the preference is `system` the
//! controller keeps a subscription to the OS scheme monitor; it drops that
//! subscription when the preference changes away or the controller goes.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use ratatui::style::{Color, Modifier, Style};
use tokio::sync::watch;
use tracing::info;

use crate::scheme::SchemeMonitor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    /// `light → dark → system → light`
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }

    pub fn resolve(self, os: Resolved) -> Resolved {
        match self {
            Theme::Light => Resolved::Light,
            Theme::Dark => Resolved::Dark,
            Theme::System => os,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(anyhow!("Unknown theme '{}'. Use light, dark or system", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Light,
    Dark,
}

pub struct ThemeController {
    theme: Theme,
    monitor: SchemeMonitor,
    os: Option<watch::Receiver<Resolved>>,
    resolved: watch::Sender<Resolved>,
}

impl ThemeController {
    pub fn new(theme: Theme, monitor: SchemeMonitor) -> Self {
        let os = (theme == Theme::System).then(|| monitor.subscribe());
        let resolved = theme.resolve(monitor.current());
        let (tx, _rx) = watch::channel(resolved);
        Self {
            theme,
            monitor,
            os,
            resolved: tx,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn resolved(&self) -> Resolved {
        *self.resolved.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Resolved> {
        self.resolved.subscribe()
    }

    #[cfg(test)]
    pub fn is_following_system(&self) -> bool {
        self.os.is_some()
    }

    pub fn cycle(&mut self) -> Theme {
        self.set_theme(self.theme.next());
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.os = match (theme, self.os.take()) {
            (Theme::System, Some(rx)) => Some(rx),
            (Theme::System, None) => Some(self.monitor.subscribe()),
            (_, _) => None,
        };
        let os = match &mut self.os {
            Some(rx) => *rx.borrow_and_update(),
            None => self.monitor.current(),
        };
        self.publish(theme.resolve(os));
        info!(theme = %theme, resolved = ?self.resolved(), "theme changed");
    }

    /// Re-resolves if the OS scheme changed. Returns `true` when the resolved
    /// theme flipped.
    pub fn poll_system(&mut self) -> bool {
        let Some(rx) = &mut self.os else {
            return false;
        };
        if !rx.has_changed().unwrap_or(false) {
            return false;
        }
        let os = *rx.borrow_and_update();
        self.publish(self.theme.resolve(os))
    }

    fn publish(&self, resolved: Resolved) -> bool {
        self.resolved.send_if_modified(|current| {
            let changed = *current != resolved;
            *current = resolved;
            changed
        })
    }
}

// ── Palettes ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub secondary: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub selection_bg: Color,
    pub favorite: Color,
    pub tag: Color,
    pub error: Color,
}

pub const DARK: Palette = Palette {
    bg: Color::Rgb(18, 18, 24),
    fg: Color::Rgb(210, 210, 225),
    secondary: Color::Rgb(130, 130, 155),
    muted: Color::Rgb(80, 80, 98),
    accent: Color::Rgb(96, 140, 255),
    border: Color::Rgb(48, 48, 62),
    border_focused: Color::Rgb(120, 100, 200),
    selection_bg: Color::Rgb(34, 38, 60),
    favorite: Color::Rgb(255, 95, 95),
    tag: Color::Rgb(100, 160, 130),
    error: Color::Rgb(255, 80, 80),
};

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(249, 250, 251),
    fg: Color::Rgb(31, 41, 55),
    secondary: Color::Rgb(75, 85, 99),
    muted: Color::Rgb(156, 163, 175),
    accent: Color::Rgb(37, 99, 235),
    border: Color::Rgb(209, 213, 219),
    border_focused: Color::Rgb(79, 70, 229),
    selection_bg: Color::Rgb(219, 234, 254),
    favorite: Color::Rgb(220, 38, 38),
    tag: Color::Rgb(21, 128, 61),
    error: Color::Rgb(185, 28, 28),
};

impl Palette {
    pub fn for_resolved(resolved: Resolved) -> Self {
        match resolved {
            Resolved::Light => LIGHT,
            Resolved::Dark => DARK,
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn heading(&self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .fg(self.fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_cycles_return_to_start() {
        for start in [Theme::Light, Theme::Dark, Theme::System] {
            assert_eq!(start.next().next().next(), start);
        }
        assert_eq!(Theme::Light.next(), Theme::Dark);
        assert_eq!(Theme::Dark.next(), Theme::System);
    }

    #[test]
    fn parses_stored_names() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" System ".parse::<Theme>().unwrap(), Theme::System);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn system_follows_os() {
        assert_eq!(Theme::System.resolve(Resolved::Dark), Resolved::Dark);
        assert_eq!(Theme::System.resolve(Resolved::Light), Resolved::Light);
        assert_eq!(Theme::Light.resolve(Resolved::Dark), Resolved::Light);
        assert_eq!(Theme::Dark.resolve(Resolved::Light), Resolved::Dark);
    }

    #[test]
    fn controller_cycles_and_publishes() {
        let monitor = SchemeMonitor::manual(Resolved::Light);
        let mut controller = ThemeController::new(Theme::Light, monitor);
        let mut view = controller.subscribe();

        assert_eq!(controller.cycle(), Theme::Dark);
        assert!(view.has_changed().unwrap());
        assert_eq!(*view.borrow_and_update(), Resolved::Dark);
        assert_eq!(Palette::for_resolved(controller.resolved()), DARK);

        assert_eq!(controller.cycle(), Theme::System);
        assert_eq!(controller.resolved(), Resolved::Light);
        assert_eq!(controller.cycle(), Theme::Light);
    }

    #[test]
    fn os_listener_only_while_system() {
        let monitor = SchemeMonitor::manual(Resolved::Dark);
        let mut controller = ThemeController::new(Theme::Dark, monitor.clone());
        assert!(!controller.is_following_system());
        assert_eq!(monitor.listener_count(), 0);

        controller.set_theme(Theme::System);
        assert!(controller.is_following_system());
        assert_eq!(monitor.listener_count(), 1);

        controller.set_theme(Theme::Light);
        assert_eq!(monitor.listener_count(), 0);

        controller.set_theme(Theme::System);
        drop(controller);
        assert_eq!(monitor.listener_count(), 0);
    }

    #[test]
    fn os_change_re_resolves_in_system_mode() {
        let monitor = SchemeMonitor::manual(Resolved::Light);
        let mut controller = ThemeController::new(Theme::System, monitor.clone());
        assert_eq!(controller.resolved(), Resolved::Light);
        assert!(!controller.poll_system());

        monitor.publish(Resolved::Dark);
        assert!(controller.poll_system());
        assert_eq!(controller.resolved(), Resolved::Dark);
    }

    #[test]
    fn os_change_ignored_when_pinned() {
        let monitor = SchemeMonitor::manual(Resolved::Light);
        let mut controller = ThemeController::new(Theme::Light, monitor.clone());
        monitor.publish(Resolved::Dark);
        assert!(!controller.poll_system());
        assert_eq!(controller.resolved(), Resolved::Light);
    }
}
