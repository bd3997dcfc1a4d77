//! Input bindings of the gallery, for help output.

use std::fmt::Write as _;

/// Where a binding is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Grid,
    Viewer,
}

impl Scope {
    fn label(self) -> &'static str {
        match self {
            Scope::Grid => "grid",
            Scope::Viewer => "viewer",
        }
    }
}

/// A single input binding.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub input: &'static str,
    /// Needs Ctrl (or Cmd on macOS).
    pub ctrl: bool,
    pub scope: Scope,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        input: &'static str,
        ctrl: bool,
        scope: Scope,
        description: &'static str,
    ) -> Self {
        Self {
            input,
            ctrl,
            scope,
            description,
        }
    }

    /// Format the binding for display (e.g., "Ctrl/Cmd+Wheel").
    pub fn format(&self) -> String {
        if self.ctrl {
            format!("Ctrl/Cmd+{}", self.input)
        } else {
            self.input.to_string()
        }
    }
}

/// Registry of every gallery binding.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Wheel", true, Scope::Grid, "Zoom the grid"),
            Shortcut::new("Pinch", false, Scope::Grid, "Zoom the grid"),
            Shortcut::new("+ / -", false, Scope::Grid, "Step zoom by 25px"),
            Shortcut::new("Slider", false, Scope::Grid, "Set cell size"),
            Shortcut::new("Click", false, Scope::Grid, "Open photo"),
            Shortcut::new("Escape", false, Scope::Viewer, "Close viewer"),
            Shortcut::new("ArrowLeft", false, Scope::Viewer, "Previous photo"),
            Shortcut::new("ArrowRight", false, Scope::Viewer, "Next photo"),
            Shortcut::new("Swipe", false, Scope::Viewer, "Previous or next photo"),
            Shortcut::new("Drag down/up", false, Scope::Viewer, "Dismiss viewer"),
            Shortcut::new("Click backdrop", false, Scope::Viewer, "Close viewer"),
        ]
    }

    /// Render all bindings as an aligned table.
    pub fn render() -> String {
        let mut out = String::from("=== Gallery Controls ===\n");
        for shortcut in Self::all() {
            let _ = writeln!(
                out,
                "  {:20} {:7} {}",
                shortcut.format(),
                shortcut.scope.label(),
                shortcut.description
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_modifier() {
        let wheel = Shortcut::new("Wheel", true, Scope::Grid, "Zoom");
        assert_eq!(wheel.format(), "Ctrl/Cmd+Wheel");
        let esc = Shortcut::new("Escape", false, Scope::Viewer, "Close");
        assert_eq!(esc.format(), "Escape");
    }

    #[test]
    fn test_viewer_keys_are_registered() {
        let keys: Vec<_> = ShortcutRegistry::all()
            .into_iter()
            .filter(|s| s.scope == Scope::Viewer)
            .map(|s| s.input)
            .collect();
        for key in ["Escape", "ArrowLeft", "ArrowRight"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn test_render_lists_every_binding() {
        let text = ShortcutRegistry::render();
        assert_eq!(text.lines().count(), ShortcutRegistry::all().len() + 1);
        assert!(text.contains("Ctrl/Cmd+Wheel"));
    }
}
