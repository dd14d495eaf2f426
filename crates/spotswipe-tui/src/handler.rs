use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use spotswipe_core::{View, Vote};

use crate::app::{App, Popup};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key).await,
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick(),
    }
    Ok(())
}

async fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    app.status = None;

    match app.popup {
        Popup::Login => return handle_login_popup(app, key).await,
        Popup::CreatePlace => return handle_create_popup(app, key).await,
        Popup::None => {}
    }

    if app.session.is_place_detail_open() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.session.close_place_detail();
        }
        return;
    }

    match app.session.current_view() {
        View::Landing => handle_landing(app, key),
        View::Home => handle_home(app, key),
        View::Likes => handle_likes(app, key),
        View::Stats => handle_stats(app, key),
    }
}

fn handle_landing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('g') => app.session.enter_guest_mode(),
        KeyCode::Char('l') | KeyCode::Enter => app.open_login(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('r') => app.session.load_places(),
        _ => {}
    }
}

fn handle_home(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.swipe_top(Vote::Dislike),
        KeyCode::Char('l') | KeyCode::Right => app.swipe_top(Vote::Like),
        KeyCode::Char('i') | KeyCode::Enter => app.open_top_detail(),
        _ => handle_feed_common(app, key),
    }
}

fn handle_likes(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.likes_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.likes_nav_up(),
        KeyCode::Enter => app.open_selected_like(),
        _ => handle_feed_common(app, key),
    }
}

fn handle_stats(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.stats_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.stats_nav_up(),
        KeyCode::Enter => app.open_selected_ranked(),
        _ => handle_feed_common(app, key),
    }
}

/// Keys shared by every screen behind the landing page.
fn handle_feed_common(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('1') => app.switch_view(View::Home),
        KeyCode::Char('2') => app.switch_view(View::Likes),
        KeyCode::Char('3') => app.switch_view(View::Stats),
        KeyCode::Tab => app.next_view(),
        KeyCode::Char('r') => app.session.load_places(),
        KeyCode::Char('c') => app.open_create_place(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('o') => app.logout(),
        KeyCode::Char('a') if !app.session.auth().is_authenticated() => app.open_login(),
        _ => {}
    }
}

async fn handle_login_popup(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_popup(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login_form.next_field()
        }
        KeyCode::Enter => {
            if app.login_form.password.is_empty() && !app.login_form.username.is_empty() {
                app.login_form.next_field();
            } else {
                app.submit_login().await;
            }
        }
        KeyCode::Backspace => {
            app.login_form.active_input().pop();
        }
        KeyCode::Char(c) => app.login_form.active_input().push(c),
        _ => {}
    }
}

async fn handle_create_popup(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_popup(),
        KeyCode::Tab | KeyCode::Down => app.create_form.next_field(),
        KeyCode::Enter => app.submit_create_place().await,
        KeyCode::Backspace => {
            app.create_form.active_input().pop();
        }
        KeyCode::Char(c) => app.create_form.active_input().push(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotswipe_core::{
        BackendError, Config, LoginResponse, MemoryCredentialStore, NewPlace, Place, PlacesApi,
        SessionController,
    };
    use std::sync::Arc;

    struct StubApi;

    #[async_trait::async_trait]
    impl PlacesApi for StubApi {
        async fn fetch_places(&self) -> Result<Vec<Place>, BackendError> {
            Ok(vec![
                Place::new(1, "Test Place 1").with_counts(5, 2),
                Place::new(2, "Test Place 2").with_counts(3, 1),
            ])
        }

        async fn login(
            &self,
            username: &str,
            password: &str,
        ) -> Result<LoginResponse, BackendError> {
            if password != "secret" {
                return Err(BackendError::Server {
                    status: 401,
                    message: "invalid credentials".to_string(),
                });
            }
            Ok(LoginResponse {
                token: "t".to_string(),
                username: username.to_string(),
            })
        }

        async fn vote(
            &self,
            _token: &str,
            _place_id: u64,
            _vote: Vote,
        ) -> Result<(), BackendError> {
            Ok(())
        }

        async fn create_place(
            &self,
            _token: &str,
            place: &NewPlace,
        ) -> Result<Place, BackendError> {
            Ok(Place::new(3, place.name.clone()))
        }
    }

    async fn test_app() -> App {
        let mut session =
            SessionController::new(Arc::new(StubApi), Arc::new(MemoryCredentialStore::new()));
        session.load_places();
        session.settle().await;
        App::ephemeral(session, Config::new())
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_guest_key_leaves_landing() {
        let mut app = test_app().await;
        assert_eq!(app.session.current_view(), View::Landing);

        handle_event(&mut app, key(KeyCode::Char('g'))).await.unwrap();

        assert!(app.session.is_guest_mode());
        assert_eq!(app.session.current_view(), View::Home);
    }

    #[tokio::test]
    async fn test_swipe_keys_advance_deck() {
        let mut app = test_app().await;
        app.session.enter_guest_mode();

        handle_event(&mut app, key(KeyCode::Right)).await.unwrap();
        assert_eq!(app.session.liked_places().len(), 1);
        assert_eq!(app.session.top_card().map(|p| p.id), Some(2));

        handle_event(&mut app, key(KeyCode::Left)).await.unwrap();
        assert!(app.session.swipe_stack().is_empty());
        assert_eq!(app.session.liked_places().len(), 1);
    }

    #[tokio::test]
    async fn test_detail_opens_and_closes() {
        let mut app = test_app().await;
        app.session.enter_guest_mode();

        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert!(app.session.is_place_detail_open());
        assert_eq!(app.session.selected_place().map(|p| p.id), Some(1));

        // Swipe keys are swallowed while the detail is open.
        handle_event(&mut app, key(KeyCode::Right)).await.unwrap();
        assert!(app.session.liked_places().is_empty());

        handle_event(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert!(!app.session.is_place_detail_open());
    }

    #[tokio::test]
    async fn test_login_popup_flow() {
        let mut app = test_app().await;

        handle_event(&mut app, key(KeyCode::Char('l'))).await.unwrap();
        assert_eq!(app.popup, Popup::Login);

        type_text(&mut app, "sam").await;
        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();
        type_text(&mut app, "wrong").await;
        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.popup, Popup::Login);
        assert!(app.login_form.error.is_some());
        assert!(app.login_form.password.is_empty());

        type_text(&mut app, "secret").await;
        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.session.auth().username(), Some("sam"));
        assert_eq!(app.session.current_view(), View::Home);
    }

    #[tokio::test]
    async fn test_guest_cannot_open_create_place() {
        let mut app = test_app().await;
        app.session.enter_guest_mode();

        handle_event(&mut app, key(KeyCode::Char('c'))).await.unwrap();

        assert_eq!(app.popup, Popup::None);
        assert!(app.status.is_some());
    }

    #[tokio::test]
    async fn test_logout_key_returns_to_landing() {
        let mut app = test_app().await;
        app.session.enter_guest_mode();
        handle_event(&mut app, key(KeyCode::Char('3'))).await.unwrap();
        assert_eq!(app.session.current_view(), View::Stats);

        handle_event(&mut app, key(KeyCode::Char('o'))).await.unwrap();

        assert_eq!(app.session.current_view(), View::Landing);
        assert!(!app.session.is_guest_mode());
    }

    #[tokio::test]
    async fn test_theme_toggle_is_not_persisted_for_ephemeral_app() {
        let mut app = test_app().await;
        let before = app.theme;
        handle_event(&mut app, key(KeyCode::Char('t'))).await.unwrap();
        assert_ne!(app.theme, before);
        assert_eq!(app.config.theme.as_deref(), Some(app.theme.as_str()));
    }

    #[tokio::test]
    async fn test_stats_ranking() {
        let mut app = test_app().await;
        app.session.enter_guest_mode();
        app.switch_view(View::Stats);

        let ranked: Vec<u64> = app.ranked_places().iter().map(|p| p.id).collect();
        assert_eq!(ranked, vec![1, 2]);

        handle_event(&mut app, key(KeyCode::Down)).await.unwrap();
        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.session.selected_place().map(|p| p.id), Some(1));
    }
}
