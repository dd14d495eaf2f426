//! Session & feed controller.
//!
//! Owns authentication, the place catalog, swipe progress and detail
//! selection. Front ends read state through the accessors and change it only
//! through the operations below. Network work runs on tokio tasks; results
//! are applied on the caller's thread by [`SessionController::poll`] or
//! [`SessionController::settle`].

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::auth::{AuthState, AUTH_TOKEN_KEY, AUTH_USERNAME_KEY};
use crate::backend::PlacesApi;
use crate::error::{BackendError, SessionError};
use crate::place::{NewPlace, Place, Vote};
use crate::state::View;
use crate::store::CredentialStore;

type PlacesTask = JoinHandle<Result<Vec<Place>, BackendError>>;

pub struct SessionController {
    api: Arc<dyn PlacesApi>,
    store: Arc<dyn CredentialStore>,

    // Session
    auth: AuthState,
    is_guest_mode: bool,
    current_view: View,

    // Catalog
    places: Vec<Place>,
    last_error: Option<String>,
    pending_load: Option<PlacesTask>,

    // Swipe progress
    swiped_ids: HashSet<u64>,
    liked_places: Vec<Place>,
    pending_votes: Vec<JoinHandle<()>>,

    // Detail selection
    is_place_detail_open: bool,
    selected_place: Option<Place>,
}

impl SessionController {
    /// Build a controller and restore any session left in `store`.
    pub fn new(api: Arc<dyn PlacesApi>, store: Arc<dyn CredentialStore>) -> Self {
        let mut session = Self {
            api,
            store,
            auth: AuthState::signed_out(),
            is_guest_mode: false,
            current_view: View::Landing,
            places: Vec::new(),
            last_error: None,
            pending_load: None,
            swiped_ids: HashSet::new(),
            liked_places: Vec::new(),
            pending_votes: Vec::new(),
            is_place_detail_open: false,
            selected_place: None,
        };
        session.restore_session();
        session
    }

    // Read access

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn is_guest_mode(&self) -> bool {
        self.is_guest_mode
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn swiped_ids(&self) -> &HashSet<u64> {
        &self.swiped_ids
    }

    pub fn liked_places(&self) -> &[Place] {
        &self.liked_places
    }

    pub fn is_place_detail_open(&self) -> bool {
        self.is_place_detail_open
    }

    pub fn selected_place(&self) -> Option<&Place> {
        self.selected_place.as_ref()
    }

    /// Most recent catalog failure, kept until the next successful load.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Authenticated users and guests may use the feed.
    pub fn has_feed_access(&self) -> bool {
        self.auth.is_authenticated() || self.is_guest_mode
    }

    // Derived values

    pub fn total_likes(&self) -> u64 {
        self.places.iter().map(|p| p.like_count).sum()
    }

    pub fn total_dislikes(&self) -> u64 {
        self.places.iter().map(|p| p.dislike_count).sum()
    }

    /// Places not yet swiped, in catalog order.
    pub fn swipe_stack(&self) -> Vec<&Place> {
        self.places
            .iter()
            .filter(|p| !self.swiped_ids.contains(&p.id))
            .collect()
    }

    /// The card currently on top of the deck.
    pub fn top_card(&self) -> Option<&Place> {
        self.places.iter().find(|p| !self.swiped_ids.contains(&p.id))
    }

    // Catalog

    /// Start fetching the catalog and return immediately.
    ///
    /// An in-flight load is aborted, so only the newest request can land.
    pub fn load_places(&mut self) {
        if let Some(previous) = self.pending_load.take() {
            debug!("superseding in-flight places request");
            previous.abort();
        }

        let api = Arc::clone(&self.api);
        self.pending_load = Some(tokio::spawn(async move { api.fetch_places().await }));
    }

    /// Apply finished background work without blocking. Returns true when the
    /// catalog request settled.
    pub fn poll(&mut self) -> bool {
        self.pending_votes.retain(|task| !task.is_finished());

        let Some(task) = self.pending_load.as_mut() else {
            return false;
        };
        match task.now_or_never() {
            Some(joined) => {
                self.pending_load = None;
                self.apply_load(joined);
                true
            }
            None => false,
        }
    }

    /// Wait for all in-flight requests and apply their results.
    pub async fn settle(&mut self) {
        if let Some(task) = self.pending_load.take() {
            let joined = task.await;
            self.apply_load(joined);
        }
        for task in self.pending_votes.drain(..) {
            if let Err(e) = task.await {
                warn!("vote task failed: {}", e);
            }
        }
    }

    fn apply_load(&mut self, joined: Result<Result<Vec<Place>, BackendError>, JoinError>) {
        match joined {
            Ok(Ok(places)) => {
                info!(count = places.len(), "loaded places");
                self.places = places;
                self.last_error = None;
            }
            Ok(Err(e)) => {
                warn!("failed to load places: {}", e);
                self.last_error = Some(format!("Could not load places: {}", e));
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                warn!("places task failed: {}", e);
                self.last_error = Some("Could not load places".to_string());
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // Session lifecycle

    pub fn enter_guest_mode(&mut self) {
        if !self.is_guest_mode {
            info!("entering guest mode");
        }
        self.is_guest_mode = true;
        self.current_view = View::Home;
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(SessionError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(SessionError::MissingField("password"));
        }

        let response = match self.api.login(username, password).await {
            Ok(response) => response,
            Err(e) => {
                warn!(username, "login failed: {}", e);
                return Err(e.into());
            }
        };

        if response.token.is_empty() {
            warn!(username, "login response carried no token");
            let missing = BackendError::Decode("login response has an empty token".to_string());
            return Err(missing.into());
        }

        let username = if response.username.is_empty() {
            username.to_string()
        } else {
            response.username
        };

        self.auth = AuthState::signed_in(username.clone(), response.token.clone());
        self.is_guest_mode = false;
        self.swiped_ids.clear();
        self.liked_places.clear();
        self.current_view = View::Home;
        self.persist_credentials(&username, &response.token);

        info!(username = %username, "logged in");
        Ok(())
    }

    /// End any authenticated or guest session and forget stored credentials.
    pub fn logout(&mut self) {
        info!(username = ?self.auth.username(), guest = self.is_guest_mode, "logging out");

        self.auth = AuthState::signed_out();
        self.is_guest_mode = false;
        self.liked_places.clear();
        self.swiped_ids.clear();
        self.close_place_detail();
        self.current_view = View::Landing;
        self.forget_credentials();
    }

    fn restore_session(&mut self) {
        let token = self.read_credential(AUTH_TOKEN_KEY);
        let username = self.read_credential(AUTH_USERNAME_KEY);

        match (username, token) {
            (Some(username), Some(token)) => {
                info!(username = %username, "restored session");
                self.auth = AuthState::signed_in(username, token);
                self.current_view = View::Home;
            }
            (None, None) => {}
            _ => {
                warn!("discarding incomplete stored credentials");
                self.forget_credentials();
            }
        }
    }

    fn read_credential(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, "credential store unavailable: {}", e);
                None
            }
        }
    }

    fn persist_credentials(&self, username: &str, token: &str) {
        let result = self
            .store
            .set(AUTH_TOKEN_KEY, token)
            .and_then(|_| self.store.set(AUTH_USERNAME_KEY, username));
        if let Err(e) = result {
            warn!("could not persist credentials: {}", e);
        }
    }

    fn forget_credentials(&self) {
        for key in [AUTH_TOKEN_KEY, AUTH_USERNAME_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!(key, "could not remove stored credential: {}", e);
            }
        }
    }

    // Navigation

    /// Switch screens. Feed screens need an authenticated or guest session.
    pub fn set_view(&mut self, view: View) -> bool {
        if view != View::Landing && !self.has_feed_access() {
            return false;
        }
        self.current_view = view;
        true
    }

    // Swiping

    #[cfg(test)]
    fn mark_swiped(&mut self, place_id: u64) -> bool {
        self.swiped_ids.insert(place_id)
    }

    /// Swipe the given place. Ignored unless it is still in the stack.
    pub fn swipe(&mut self, place_id: u64, vote: Vote) -> bool {
        let Some(place) = self.unswiped_place(place_id).cloned() else {
            return false;
        };

        self.swiped_ids.insert(place_id);
        if vote == Vote::Like {
            self.liked_places.push(place);
        }

        // Guest swipes stay local.
        if let Some(token) = self.auth.token() {
            let token = token.to_string();
            let api = Arc::clone(&self.api);
            self.pending_votes.push(tokio::spawn(async move {
                if let Err(e) = api.vote(&token, place_id, vote).await {
                    warn!(place_id, vote = vote.as_str(), "vote not recorded: {}", e);
                }
            }));
        }
        true
    }

    fn unswiped_place(&self, place_id: u64) -> Option<&Place> {
        self.places
            .iter()
            .find(|p| p.id == place_id && !self.swiped_ids.contains(&p.id))
    }

    // Places

    pub async fn create_place(&mut self, place: NewPlace) -> Result<Place, SessionError> {
        let token = self
            .auth
            .token()
            .ok_or(SessionError::NotAuthenticated)?
            .to_string();

        let mut place = place;
        place.name = place.name.trim().to_string();
        if place.name.is_empty() {
            return Err(SessionError::MissingField("name"));
        }

        let created = self.api.create_place(&token, &place).await?;
        info!(id = created.id, name = %created.name, "created place");
        self.load_places();
        Ok(created)
    }

    // Detail view

    pub fn open_place_detail(&mut self, place: Place) {
        self.selected_place = Some(place);
        self.is_place_detail_open = true;
    }

    pub fn close_place_detail(&mut self) {
        self.is_place_detail_open = false;
        self.selected_place = None;
    }
}
