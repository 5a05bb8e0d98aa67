//! Tray context menu commands
//!
//! Menu items carry a stable string id; clicks are resolved back to a
//! `MenuCommand` and handed to the controller, so building the menu never
//! captures controller state.

use crate::config::{AppConfig, BlurPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuCommand {
    Toggle,
    AlternateCalculator,
    HideOnBlur,
    StartAtLogin,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItemKind {
    Plain,
    Checkbox,
}

impl MenuCommand {
    /// Menu order
    pub const ALL: [MenuCommand; 5] = [
        MenuCommand::Toggle,
        MenuCommand::AlternateCalculator,
        MenuCommand::HideOnBlur,
        MenuCommand::StartAtLogin,
        MenuCommand::Quit,
    ];

    pub fn id(self) -> &'static str {
        match self {
            MenuCommand::Toggle => "toggle",
            MenuCommand::AlternateCalculator => "alternate",
            MenuCommand::HideOnBlur => "hide_on_blur",
            MenuCommand::StartAtLogin => "start_at_login",
            MenuCommand::Quit => "quit",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.id() == id)
    }

    pub fn kind(self) -> MenuItemKind {
        match self {
            MenuCommand::Toggle | MenuCommand::Quit => MenuItemKind::Plain,
            MenuCommand::AlternateCalculator
            | MenuCommand::HideOnBlur
            | MenuCommand::StartAtLogin => MenuItemKind::Checkbox,
        }
    }

    pub fn label(self, config: &AppConfig) -> String {
        match self {
            MenuCommand::Toggle => "Show/Hide".to_string(),
            MenuCommand::AlternateCalculator => {
                format!("Use {} Calculator", config.content.alternate().label())
            }
            MenuCommand::HideOnBlur => "Hide When Unfocused".to_string(),
            MenuCommand::StartAtLogin => "Start at Login".to_string(),
            MenuCommand::Quit => "Quit".to_string(),
        }
    }

    /// The blur toggle only means something when the policy defers to it
    pub fn is_available(self, config: &AppConfig) -> bool {
        match self {
            MenuCommand::HideOnBlur => config.blur_policy == BlurPolicy::SettingGated,
            _ => true,
        }
    }
}

/// Checkbox marks, read back from the controller after each command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    pub alternate_calculator: bool,
    pub hide_on_blur: bool,
    pub start_at_login: bool,
}

impl MenuState {
    pub fn is_checked(&self, command: MenuCommand) -> Option<bool> {
        match command {
            MenuCommand::AlternateCalculator => Some(self.alternate_calculator),
            MenuCommand::HideOnBlur => Some(self.hide_on_blur),
            MenuCommand::StartAtLogin => Some(self.start_at_login),
            MenuCommand::Toggle | MenuCommand::Quit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MenuCommand, MenuItemKind, MenuState};
    use crate::config::{AppConfig, BlurPolicy, ContentVariant};

    #[test]
    fn ids_resolve_back_to_commands() {
        for command in MenuCommand::ALL {
            assert_eq!(MenuCommand::from_id(command.id()), Some(command));
        }
        assert_eq!(MenuCommand::from_id("preferences"), None);
    }

    #[test]
    fn checkbox_items_report_state() {
        let state = MenuState {
            alternate_calculator: true,
            hide_on_blur: false,
            start_at_login: true,
        };
        for command in MenuCommand::ALL {
            let checked = state.is_checked(command);
            match command.kind() {
                MenuItemKind::Checkbox => assert!(checked.is_some()),
                MenuItemKind::Plain => assert!(checked.is_none()),
            }
        }
        assert_eq!(state.is_checked(MenuCommand::StartAtLogin), Some(true));
    }

    #[test]
    fn alternate_label_names_the_other_variant() {
        let mut config = AppConfig::default();
        assert_eq!(
            MenuCommand::AlternateCalculator.label(&config),
            "Use Graphing Calculator"
        );
        config.content = ContentVariant::Graphing;
        assert_eq!(
            MenuCommand::AlternateCalculator.label(&config),
            "Use Scientific Calculator"
        );
    }

    #[test]
    fn blur_toggle_needs_setting_gated_policy() {
        let mut config = AppConfig::default();
        assert!(!MenuCommand::HideOnBlur.is_available(&config));
        config.blur_policy = BlurPolicy::SettingGated;
        assert!(MenuCommand::HideOnBlur.is_available(&config));
        assert!(MenuCommand::Quit.is_available(&config));
    }
}
