//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:   green   (valid graphs, safe edges)
//!   - Warning:   yellow  (dangling references, cycle headers)
//!   - Error:     red     (defects, cycles, failures)
//!   - Info:      cyan    (node ids)
//!   - Muted:     dimmed  (cycle paths, depth markers)
//!   - Emphasis:  bold    (section headers)

use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Bold text for section headers.
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Dimmed text for secondary details.
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_colors() -> OutputConfig {
        OutputConfig::new(false)
    }

    #[test]
    fn helpers_pass_text_through_without_colors() {
        let config = no_colors();
        assert_eq!(success("ok", &config), "ok");
        assert_eq!(error("bad", &config), "bad");
        assert_eq!(warning("hmm", &config), "hmm");
        assert_eq!(info("id", &config), "id");
        assert_eq!(bold("head", &config), "head");
        assert_eq!(dimmed("a -> b", &config), "a -> b");
    }

    #[test]
    fn helpers_keep_text_with_colors() {
        colored::control::set_override(true);
        let config = OutputConfig::new(true);
        let styled = error("bad", &config);
        assert!(styled.contains("bad"));
        assert_ne!(styled, "bad");
        colored::control::unset_override();
    }
}
