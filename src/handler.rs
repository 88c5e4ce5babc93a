use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        // Enter sends; nothing else is triggered by it
        KeyCode::Enter => app.submit(),
        KeyCode::Esc => app.should_quit = true,

        // Input editing
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) => app.insert_char(c),

        // Chat panel scrolling
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::PageUp => app.scroll_half_page_up(),
        KeyCode::PageDown => app.scroll_half_page_down(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatClient;

    fn test_app() -> App {
        App::new(ChatClient::new("http://localhost:9/chat"))
    }

    #[test]
    fn typed_characters_land_in_the_input() {
        let mut app = test_app();
        for c in "hi".chars() {
            handle_key(&mut app, KeyEvent::from(KeyCode::Char(c)));
        }

        assert_eq!(app.input, "hi");
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn enter_with_empty_input_does_nothing() {
        let mut app = test_app();
        handle_key(&mut app, KeyEvent::from(KeyCode::Enter));

        assert!(app.messages.is_empty());
        assert!(app.pending.is_none());
    }

    #[test]
    fn ctrl_c_and_esc_quit() {
        let mut app = test_app();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        let mut app = test_app();
        handle_key(&mut app, KeyEvent::from(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn unhandled_keys_are_ignored() {
        let mut app = test_app();
        handle_key(&mut app, KeyEvent::from(KeyCode::Tab));
        handle_key(&mut app, KeyEvent::from(KeyCode::F(1)));

        assert!(app.input.is_empty());
        assert!(app.messages.is_empty());
        assert!(!app.should_quit);
    }
}
