use ratatui::widgets::ListState;
use spotswipe_core::{Config, NewPlace, Place, SessionController, Theme, View, Vote};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Login,
    CreatePlace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub field: LoginField,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn active_input(&mut self) -> &mut String {
        match self.field {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateField {
    #[default]
    Name,
    Description,
    Address,
}

#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    pub name: String,
    pub description: String,
    pub address: String,
    pub field: CreateField,
    pub error: Option<String>,
}

impl CreateForm {
    pub fn active_input(&mut self) -> &mut String {
        match self.field {
            CreateField::Name => &mut self.name,
            CreateField::Description => &mut self.description,
            CreateField::Address => &mut self.address,
        }
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            CreateField::Name => CreateField::Description,
            CreateField::Description => CreateField::Address,
            CreateField::Address => CreateField::Name,
        };
    }

    fn to_new_place(&self) -> NewPlace {
        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        NewPlace {
            name: self.name.clone(),
            description: optional(&self.description),
            address: optional(&self.address),
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub session: SessionController,
    pub config: Config,
    pub theme: Theme,
    persist_config: bool,

    pub popup: Popup,
    pub login_form: LoginForm,
    pub create_form: CreateForm,

    pub likes_state: ListState,
    pub stats_state: ListState,

    /// One-line message shown in the footer until the next key press.
    pub status: Option<String>,

    // Animation state
    pub animation_frame: u8,
}

impl App {
    pub fn new(session: SessionController, config: Config) -> Self {
        Self::build(session, config, true)
    }

    /// App that never writes the config file.
    #[cfg(test)]
    pub fn ephemeral(session: SessionController, config: Config) -> Self {
        Self::build(session, config, false)
    }

    fn build(session: SessionController, config: Config, persist_config: bool) -> Self {
        let theme = config.theme();
        Self {
            should_quit: false,
            session,
            config,
            theme,
            persist_config,
            popup: Popup::None,
            login_form: LoginForm::default(),
            create_form: CreateForm::default(),
            likes_state: ListState::default(),
            stats_state: ListState::default(),
            status: None,
            animation_frame: 0,
        }
    }

    pub fn tick(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % 3;
        self.session.poll();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.config.theme = Some(self.theme.as_str().to_string());
        if self.persist_config {
            if let Err(e) = self.config.save() {
                warn!("could not save theme: {}", e);
            }
        }
    }

    // Navigation

    pub fn switch_view(&mut self, view: View) {
        if !self.session.set_view(view) {
            self.status = Some("Log in or continue as guest first".to_string());
        }
    }

    pub fn next_view(&mut self) {
        let views = View::navigable();
        let current = views
            .iter()
            .position(|v| *v == self.session.current_view())
            .unwrap_or(0);
        self.switch_view(views[(current + 1) % views.len()]);
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.likes_state.select(None);
        self.status = Some("Logged out".to_string());
    }

    // Swiping

    pub fn swipe_top(&mut self, vote: Vote) {
        if let Some(id) = self.session.top_card().map(|p| p.id) {
            self.session.swipe(id, vote);
        }
    }

    pub fn open_top_detail(&mut self) {
        if let Some(place) = self.session.top_card().cloned() {
            self.session.open_place_detail(place);
        }
    }

    // Lists

    pub fn likes_nav_down(&mut self) {
        list_down(&mut self.likes_state, self.session.liked_places().len());
    }

    pub fn likes_nav_up(&mut self) {
        list_up(&mut self.likes_state);
    }

    pub fn open_selected_like(&mut self) {
        let place = self
            .likes_state
            .selected()
            .and_then(|i| self.session.liked_places().get(i))
            .cloned();
        if let Some(place) = place {
            self.session.open_place_detail(place);
        }
    }

    pub fn stats_nav_down(&mut self) {
        list_down(&mut self.stats_state, self.session.places().len());
    }

    pub fn stats_nav_up(&mut self) {
        list_up(&mut self.stats_state);
    }

    pub fn open_selected_ranked(&mut self) {
        let place = self
            .stats_state
            .selected()
            .and_then(|i| self.ranked_places().get(i).map(|p| (*p).clone()));
        if let Some(place) = place {
            self.session.open_place_detail(place);
        }
    }

    /// Catalog ordered by likes, then by fewer dislikes.
    pub fn ranked_places(&self) -> Vec<&Place> {
        let mut ranked: Vec<&Place> = self.session.places().iter().collect();
        ranked.sort_by(|a, b| {
            b.like_count
                .cmp(&a.like_count)
                .then(a.dislike_count.cmp(&b.dislike_count))
        });
        ranked
    }

    // Popups

    pub fn open_login(&mut self) {
        self.login_form = LoginForm::default();
        self.popup = Popup::Login;
    }

    pub fn open_create_place(&mut self) {
        if !self.session.auth().is_authenticated() {
            self.status = Some("Log in to add a place".to_string());
            return;
        }
        self.create_form = CreateForm::default();
        self.popup = Popup::CreatePlace;
    }

    pub fn close_popup(&mut self) {
        self.popup = Popup::None;
    }

    pub async fn submit_login(&mut self) {
        let username = self.login_form.username.clone();
        let password = self.login_form.password.clone();
        match self.session.login(&username, &password).await {
            Ok(()) => {
                self.popup = Popup::None;
                self.login_form = LoginForm::default();
                self.status = Some(format!("Welcome, {}", username.trim()));
            }
            Err(e) => {
                self.login_form.password.clear();
                self.login_form.error = Some(e.to_string());
            }
        }
    }

    pub async fn submit_create_place(&mut self) {
        let new_place = self.create_form.to_new_place();
        match self.session.create_place(new_place).await {
            Ok(place) => {
                self.popup = Popup::None;
                self.status = Some(format!("Added {}", place.name));
            }
            Err(e) => self.create_form.error = Some(e.to_string()),
        }
    }

    pub fn loading_dots(&self) -> &'static str {
        match self.animation_frame {
            0 => ".",
            1 => "..",
            _ => "...",
        }
    }
}

fn list_down(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let next = state.selected().map(|i| (i + 1).min(len - 1)).unwrap_or(0);
    state.select(Some(next));
}

fn list_up(state: &mut ListState) {
    let i = state.selected().unwrap_or(0);
    state.select(Some(i.saturating_sub(1)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_down_clamps() {
        let mut state = ListState::default();
        list_down(&mut state, 2);
        assert_eq!(state.selected(), Some(0));
        list_down(&mut state, 2);
        list_down(&mut state, 2);
        assert_eq!(state.selected(), Some(1));
        list_down(&mut state, 0);
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn test_create_form_drops_blank_optionals() {
        let form = CreateForm {
            name: "Harbor".to_string(),
            description: "  ".to_string(),
            address: " Pier 3 ".to_string(),
            ..CreateForm::default()
        };
        let new_place = form.to_new_place();
        assert_eq!(new_place.description, None);
        assert_eq!(new_place.address.as_deref(), Some("Pier 3"));
    }

    #[test]
    fn test_login_form_cycles_fields() {
        let mut form = LoginForm::default();
        form.active_input().push_str("sam");
        form.next_field();
        form.active_input().push_str("pw");
        assert_eq!(form.username, "sam");
        assert_eq!(form.password, "pw");
        form.next_field();
        assert_eq!(form.field, LoginField::Username);
    }
}
