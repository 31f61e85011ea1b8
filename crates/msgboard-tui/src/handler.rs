use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use msgboard_core::Notice;
use tracing::debug;

use crate::app::{App, Focus};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.expire_notice(Instant::now()),
        AppEvent::Board(event) => app.apply_board_event(event),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.focus.is_form() {
        handle_form_key(app, key);
    } else {
        handle_messages_key(app, key);
    }
}

fn handle_messages_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Message list
        KeyCode::Char('j') | KeyCode::Down => app.select_next_message(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev_message(),
        KeyCode::Char('g') => app.select_first_message(),
        KeyCode::Char('G') => app.select_last_message(),

        // Reaction grid
        KeyCode::Char('h') | KeyCode::Left => app.reaction_left(),
        KeyCode::Char('l') | KeyCode::Right => app.reaction_right(),
        KeyCode::Char('J') => app.reaction_down(),
        KeyCode::Char('K') => app.reaction_up(),
        KeyCode::Enter | KeyCode::Char(' ') => react(app),

        KeyCode::Char('r') => refresh(app),

        // Jump into the form
        KeyCode::Char('i') | KeyCode::Char('n') | KeyCode::Tab => app.focus_form(Focus::Message),
        KeyCode::BackTab => app.focus_form(Focus::Repository),

        _ => {}
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.focus = Focus::Messages,
        KeyCode::Tab => {
            let next = app.focus.next();
            app.focus_form(next);
        }
        KeyCode::BackTab => {
            let prev = app.focus.prev();
            app.focus_form(prev);
        }
        KeyCode::Enter => submit(app),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

fn refresh(app: &App) {
    let board = app.board.clone();
    let sink = app.sink.clone();
    tokio::spawn(async move {
        board.refresh(&sink).await;
    });
}

fn react(app: &App) {
    let Some((message_id, reaction)) = app.selected_reaction() else {
        return;
    };
    debug!(%message_id, reaction, "reaction activated");

    let board = app.board.clone();
    let sink = app.sink.clone();
    tokio::spawn(async move {
        board.react(&message_id, reaction, &sink).await;
    });
}

fn submit(app: &mut App) {
    // Submit control is disabled while a post is in flight
    if app.submitting {
        return;
    }

    // Reject locally so a blank draft never flips the busy state
    if let Err(err) = app.draft.prepare() {
        app.show_notice(Notice::transient(err.to_string()));
        return;
    }

    app.submitting = true;
    let draft = app.draft.clone();
    let board = app.board.clone();
    let sink = app.sink.clone();
    tokio::spawn(async move {
        board.submit(&draft, &sink).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{message, test_app};
    use crossterm::event::{KeyEventKind, KeyEventState};
    use msgboard_core::{BoardEvent, Draft};

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_blank_submit_shows_error_without_busy_state() {
        let (mut app, _rx) = test_app();
        handle_event(&mut app, key(KeyCode::Char('i')));
        type_text(&mut app, "   ");
        handle_event(&mut app, key(KeyCode::Enter));

        assert!(!app.submitting);
        assert_eq!(
            app.notice.as_ref().map(|n| n.notice.text.as_str()),
            Some("Message cannot be empty")
        );
        assert_eq!(app.draft.message, "   ");
    }

    #[test]
    fn test_submit_ignored_while_busy() {
        let (mut app, _rx) = test_app();
        app.focus_form(Focus::Message);
        app.submitting = true;
        app.draft = Draft::new("", "", "");

        handle_event(&mut app, key(KeyCode::Enter));

        // A blank draft would normally raise a notice; the disabled control wins
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_form_typing_and_tab_cycle() {
        let (mut app, _rx) = test_app();
        handle_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Message);
        type_text(&mut app, "hello q");
        handle_event(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "ana");
        handle_event(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "octo/repo");

        assert_eq!(app.draft, Draft::new("hello q", "ana", "octo/repo"));
        assert!(!app.should_quit);

        handle_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.focus, Focus::Messages);
        handle_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_board_events_route_to_app() {
        let (mut app, _rx) = test_app();
        handle_event(
            &mut app,
            AppEvent::Board(BoardEvent::MessagesLoaded(vec![message("a", 1), message("b", 0)])),
        );
        handle_event(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.selected_message().map(|m| m.id.as_str()), Some("b"));
    }

    #[test]
    fn test_ctrl_c_quits_from_form() {
        let (mut app, _rx) = test_app();
        app.focus_form(Focus::Author);
        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        );
        assert!(app.should_quit);
        assert_eq!(app.draft.author, "");
    }
}
