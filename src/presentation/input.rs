use crate::application::{App, AppMode, Focus};
use crate::presentation::ui::help_line_count;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::EditingQuantity => Self::handle_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::Submitted => {}
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return;
        }

        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_up(),
            KeyCode::Down | KeyCode::Char('j') => app.move_down(),
            KeyCode::Home => app.move_to_top(),
            KeyCode::End => app.move_to_bottom(),
            KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_selected(),
            KeyCode::Char('+') | KeyCode::Char('=') => app.increase_selected(),
            KeyCode::Char('-') => app.decrease_selected(),
            KeyCode::Enter if app.focus == Focus::PlaceOrder => app.submit(),
            KeyCode::Enter | KeyCode::Char('e') => app.start_editing_quantity(),
            KeyCode::Tab => app.toggle_focus(),
            KeyCode::Char('o') | KeyCode::Char('O') => app.focus_place_order(),
            KeyCode::Char('p') => app.submit(),
            KeyCode::Esc => {
                if app.notification.is_some() {
                    app.dismiss_notification();
                } else {
                    app.focus = Focus::Menu;
                }
            }
            KeyCode::F(1) | KeyCode::Char('?') => app.open_help(),
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc => app.finish_editing(),
            KeyCode::Backspace => app.pop_quantity_char(),
            KeyCode::Char(c) => app.push_quantity_char(c),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        let max_scroll = help_line_count().saturating_sub(1);
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => app.close_help(),
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll = (app.help_scroll + 1).min(max_scroll);
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll = (app.help_scroll + 5).min(max_scroll);
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    #[test]
    fn test_space_toggles_checkbox() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.form.is_checked(ItemId(1)));
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.form.is_checked(ItemId(1)));
    }

    #[test]
    fn test_plus_minus_keys_change_quantity() {
        let mut app = App::default();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('='));
        assert_eq!(app.summary.lines[0].quantity.get(), 3);

        for _ in 0..4 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.summary.lines[0].quantity.get(), 1);
    }

    #[test]
    fn test_typing_quantity() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, AppMode::EditingQuantity);

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.summary.total.to_string(), "$75.96");

        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode, AppMode::EditingQuantity);
        assert_eq!(app.input, "4q");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_edit_without_selection_shows_hint() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.is_some());

        press(&mut app, KeyCode::Down);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_enter_on_place_order_submits() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.focus, Focus::PlaceOrder);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Submitted);
        assert!(app.submission.is_some());

        press(&mut app, KeyCode::Char(' '));
        assert!(app.form.is_checked(ItemId(1)));
    }

    #[test]
    fn test_empty_submit_and_escape_dismisses() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('p'));
        assert!(app.notification.is_some());
        assert_eq!(app.mode, AppMode::Normal);

        press(&mut app, KeyCode::Esc);
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_control_modified_keys_are_ignored() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert!(!app.form.is_checked(ItemId(1)));
    }

    #[test]
    fn test_help_navigation() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);

        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.help_scroll, 5);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.help_scroll, 4);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.help_scroll, 0);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.help_scroll, 0);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }
}
