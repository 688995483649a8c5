//! Application state machine.
//!
//! This module defines the [`App`] state machine, which holds everything the
//! chat screen shows and decides which API calls to make, completely decoupled
//! from I/O and timers.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Tracks the online user list, the highlight cursor, and the selected peer.
//! - Applies conversation fetches, discarding stale ones when the guard is on.
//! - Owns the compose box, the send busy flag, and the blocking alert.
//! - Emits typing `start`/`stop` signals and tracks the peer's typing line.
//! - Feeds read receipts one at a time through a [`ReceiptQueue`].

use chatsync_client::ApiError;
use chatsync_proto::{Message, TypingAction, User, Username};
use tracing::{debug, warn};

use crate::{
    ApiReply, ApiRequest, AppAction, AppEvent, ComposeState, ConversationState, DisplayZone,
    Focus, KeyInput, LoadToken, ReceiptQueue,
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Local user, normalized.
    identity: Username,
    /// Zone timestamps are rendered in.
    zone: DisplayZone,
    /// Drop out-of-order conversation responses.
    discard_stale: bool,
    /// Users from the last successful presence poll.
    users: Vec<User>,
    /// Highlight cursor into `users`.
    highlighted: usize,
    /// Active peer. `None` until the user picks one.
    selected: Option<User>,
    /// Conversation currently on screen.
    conversation: ConversationState,
    /// Token for the next conversation load.
    next_token: u64,
    /// First token issued for the current selection. Older loads belong to
    /// an earlier selection, even one of the same peer.
    selection_floor: LoadToken,
    /// `"<name> is typing..."` while the selected peer types.
    typing_indicator: Option<String>,
    /// Peer that received the last typing `start`, until `stop` is sent.
    typing_peer: Option<String>,
    /// Message input.
    compose: ComposeState,
    /// Pane receiving keys.
    focus: Focus,
    /// Read receipts awaiting dispatch.
    receipts: ReceiptQueue,
    /// Blocking alert. `None` if nothing to show.
    alert: Option<String>,
    /// Transient status line. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create an App for the local user `identity`.
    ///
    /// The identity is trimmed and lowercased.
    pub fn new(identity: &str) -> Self {
        Self {
            identity: Username::new(identity),
            zone: DisplayZone::default(),
            discard_stale: true,
            users: Vec::new(),
            highlighted: 0,
            selected: None,
            conversation: ConversationState::default(),
            next_token: 0,
            selection_floor: LoadToken(0),
            typing_indicator: None,
            typing_peer: None,
            compose: ComposeState::default(),
            focus: Focus::Users,
            receipts: ReceiptQueue::default(),
            alert: None,
            status_message: None,
        }
    }

    /// Render timestamps in `zone`.
    #[must_use]
    pub fn with_display_zone(mut self, zone: DisplayZone) -> Self {
        self.zone = zone;
        self
    }

    /// Enable or disable the stale conversation response guard.
    #[must_use]
    pub fn with_stale_guard(mut self, enabled: bool) -> Self {
        self.discard_stale = enabled;
        self
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::PresenceDue => vec![AppAction::Request(ApiRequest::ListUsers)],
            AppEvent::ConversationDue => match self.selected.as_ref().map(|u| u.username.clone()) {
                Some(peer) => {
                    vec![self.load_conversation(peer), AppAction::Request(ApiRequest::GetTyping)]
                },
                None => vec![],
            },
            AppEvent::TypingIdle => match self.typing_peer.take() {
                Some(recipient) => vec![AppAction::Request(ApiRequest::SetTyping {
                    recipient,
                    action: TypingAction::Stop,
                })],
                None => vec![],
            },
            AppEvent::Response { request, result } => self.handle_response(request, result),
        }
    }

    /// Process a key press.
    pub fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if self.alert.take().is_some() {
            return vec![AppAction::Render];
        }

        match (key, self.focus) {
            (KeyInput::Esc, _) => vec![AppAction::Quit],
            (KeyInput::Tab, Focus::Users) if self.selected.is_some() => {
                self.focus = Focus::Compose;
                vec![AppAction::Render]
            },
            (KeyInput::Tab, Focus::Compose) => {
                self.focus = Focus::Users;
                vec![AppAction::Render]
            },
            (KeyInput::Up, Focus::Users) => {
                self.highlighted = self.highlighted.saturating_sub(1);
                vec![AppAction::Render]
            },
            (KeyInput::Down, Focus::Users) => {
                if self.highlighted + 1 < self.users.len() {
                    self.highlighted += 1;
                }
                vec![AppAction::Render]
            },
            (KeyInput::Enter, Focus::Users) => self.select_highlighted(),
            (KeyInput::Enter, Focus::Compose) => self.send_message(),
            (KeyInput::Char(c), Focus::Compose) => {
                self.compose.insert(c);
                self.input_changed()
            },
            (KeyInput::Backspace, Focus::Compose) => {
                if self.compose.backspace() { self.input_changed() } else { vec![] }
            },
            (KeyInput::Delete, Focus::Compose) => {
                if self.compose.delete() { self.input_changed() } else { vec![] }
            },
            (KeyInput::Left, Focus::Compose) => {
                self.compose.left();
                vec![AppAction::Render]
            },
            (KeyInput::Right, Focus::Compose) => {
                self.compose.right();
                vec![AppAction::Render]
            },
            (KeyInput::Home, Focus::Compose) => {
                self.compose.home();
                vec![AppAction::Render]
            },
            (KeyInput::End, Focus::Compose) => {
                self.compose.end();
                vec![AppAction::Render]
            },
            _ => vec![],
        }
    }

    /// Select the highlighted user, if any.
    pub fn select_highlighted(&mut self) -> Vec<AppAction> {
        match self.users.get(self.highlighted).cloned() {
            Some(user) => self.select(user),
            None => vec![],
        }
    }

    /// Make `user` the active peer and load the conversation.
    ///
    /// Switching to a different peer clears the conversation and the typing
    /// line. Reselecting the same peer just reloads.
    pub fn select(&mut self, user: User) -> Vec<AppAction> {
        let identity = user.identity();
        let switching = self.selected.as_ref().is_none_or(|u| u.identity() != identity);
        if switching {
            self.conversation = ConversationState::default();
            self.typing_indicator = None;
        }
        if let Some(index) = self.users.iter().position(|u| u.identity() == identity) {
            self.highlighted = index;
        }

        let load = self.load_conversation(user.username.clone());
        if switching {
            self.selection_floor = LoadToken(self.next_token);
        }
        self.selected = Some(user);
        self.focus = Focus::Compose;
        vec![load, AppAction::Render]
    }

    /// Send the compose text to the selected peer.
    ///
    /// No-op when the trimmed text is empty, no peer is selected, or a send is
    /// already in flight.
    pub fn send_message(&mut self) -> Vec<AppAction> {
        let message = self.compose.text().trim();
        if message.is_empty() || self.compose.is_sending() {
            return vec![];
        }
        let Some(peer) = &self.selected else {
            return vec![];
        };

        let request = ApiRequest::SendMessage {
            recipient: peer.username.clone(),
            message: message.to_string(),
        };
        self.compose.set_sending(true);
        self.status_message = Some("Sending...".to_string());
        vec![AppAction::Request(request), AppAction::Render]
    }

    fn input_changed(&mut self) -> Vec<AppAction> {
        let Some(peer) = self.selected.as_ref().map(|u| u.username.clone()) else {
            return vec![AppAction::Render];
        };

        let mut actions = Vec::with_capacity(4);
        if let Some(previous) = self.typing_peer.take()
            && !Username::new(&previous).matches(&peer)
        {
            actions.push(AppAction::Request(ApiRequest::SetTyping {
                recipient: previous,
                action: TypingAction::Stop,
            }));
        }
        actions.push(AppAction::Request(ApiRequest::SetTyping {
            recipient: peer.clone(),
            action: TypingAction::Start,
        }));
        actions.push(AppAction::RestartTypingTimer);
        actions.push(AppAction::Render);
        self.typing_peer = Some(peer);
        actions
    }

    fn load_conversation(&mut self, with: String) -> AppAction {
        self.next_token += 1;
        AppAction::Request(ApiRequest::LoadConversation { with, token: LoadToken(self.next_token) })
    }

    fn handle_response(
        &mut self,
        request: ApiRequest,
        result: Result<ApiReply, ApiError>,
    ) -> Vec<AppAction> {
        match (request, result) {
            (ApiRequest::ListUsers, Ok(ApiReply::Users(users))) => self.apply_users(users),
            (ApiRequest::LoadConversation { with, token }, Ok(ApiReply::Messages(messages))) => {
                self.apply_conversation(&with, token, messages)
            },
            (ApiRequest::SendMessage { .. }, result) => self.send_finished(result),
            (ApiRequest::GetTyping, Ok(ApiReply::Typing(names))) => self.apply_typing(&names),
            (ApiRequest::MarkRead { message_id }, result) => {
                if let Err(err) = result {
                    warn!(%message_id, %err, "read receipt failed");
                }
                self.receipts.complete(message_id);
                self.receipts.next_request().map(AppAction::Request).into_iter().collect()
            },
            (ApiRequest::SetTyping { .. }, Ok(_)) => vec![],
            (request, Err(err)) => {
                warn!(endpoint = request.endpoint().path(), %err, "request failed");
                vec![]
            },
            (request, Ok(reply)) => {
                warn!(endpoint = request.endpoint().path(), ?reply, "unexpected reply");
                vec![]
            },
        }
    }

    fn apply_users(&mut self, users: Vec<User>) -> Vec<AppAction> {
        self.users = users;
        self.highlighted = self.highlighted.min(self.users.len().saturating_sub(1));
        vec![AppAction::Render]
    }

    fn apply_conversation(
        &mut self,
        with: &str,
        token: LoadToken,
        messages: Vec<Message>,
    ) -> Vec<AppAction> {
        let peer = Username::new(with);
        if self.discard_stale {
            if self.selected.as_ref().is_none_or(|u| u.identity() != peer) {
                debug!(%peer, %token, "discarding conversation for deselected peer");
                return vec![];
            }
            if token < self.selection_floor {
                debug!(
                    %peer,
                    %token,
                    floor = %self.selection_floor,
                    "discarding load from earlier selection"
                );
                return vec![];
            }
            if self.conversation.applied.is_some_and(|applied| applied > token) {
                debug!(%peer, %token, "discarding stale conversation");
                return vec![];
            }
        }

        let queued = self.receipts.enqueue_unread(&messages, &self.identity);
        debug!(%peer, %token, count = messages.len(), queued, "conversation applied");
        self.conversation = ConversationState { peer: Some(peer), messages, applied: Some(token) };

        let mut actions: Vec<_> =
            self.receipts.next_request().map(AppAction::Request).into_iter().collect();
        actions.push(AppAction::Render);
        actions
    }

    fn send_finished(&mut self, result: Result<ApiReply, ApiError>) -> Vec<AppAction> {
        self.compose.set_sending(false);
        self.status_message = None;
        self.focus = Focus::Compose;

        match result {
            Ok(_) => {
                self.compose.clear();
                let mut actions = Vec::with_capacity(2);
                if let Some(peer) = self.selected.as_ref().map(|u| u.username.clone()) {
                    actions.push(self.load_conversation(peer));
                }
                actions.push(AppAction::Render);
                actions
            },
            Err(err) => {
                warn!(%err, "send failed");
                self.alert = Some(match (err.server_message(), &err) {
                    (Some(message), _) => format!("Failed: {message}"),
                    (None, ApiError::Status { .. }) => "Failed: Unknown error".to_string(),
                    (None, _) => "Network error".to_string(),
                });
                vec![AppAction::Render]
            },
        }
    }

    fn apply_typing(&mut self, names: &[String]) -> Vec<AppAction> {
        let indicator = self
            .selected
            .as_ref()
            .filter(|peer| names.iter().any(|name| peer.identity().matches(name)))
            .map(|peer| format!("{} is typing...", peer.username));

        if indicator == self.typing_indicator {
            return vec![];
        }
        self.typing_indicator = indicator;
        vec![AppAction::Render]
    }

    /// Local user.
    pub fn identity(&self) -> &Username {
        &self.identity
    }

    /// Zone timestamps are rendered in.
    pub fn display_zone(&self) -> &DisplayZone {
        &self.zone
    }

    /// Users from the last successful presence poll.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Index of the highlighted user.
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Active peer.
    pub fn selected(&self) -> Option<&User> {
        self.selected.as_ref()
    }

    /// Conversation currently on screen.
    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    /// Peer typing line.
    pub fn typing_indicator(&self) -> Option<&str> {
        self.typing_indicator.as_deref()
    }

    /// Peer awaiting a typing `stop`.
    pub fn typing_peer(&self) -> Option<&str> {
        self.typing_peer.as_deref()
    }

    /// Message input.
    pub fn compose(&self) -> &ComposeState {
        &self.compose
    }

    /// Pane receiving keys.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Read receipt queue.
    pub fn receipts(&self) -> &ReceiptQueue {
        &self.receipts
    }

    /// Blocking alert text.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Current status message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use chatsync_proto::{MessageId, MessageStatus, Timestamp};

    use super::*;

    fn msg(id: u64, sender: &str, recipient: &str, status: MessageStatus) -> Message {
        Message {
            id: MessageId(id),
            sender: sender.into(),
            recipient: recipient.into(),
            message: "hi".into(),
            timestamp: Timestamp::new("2024-01-01T10:00:00Z"),
            status,
        }
    }

    fn requests(actions: &[AppAction]) -> Vec<&ApiRequest> {
        actions
            .iter()
            .filter_map(|a| match a {
                AppAction::Request(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    fn respond(app: &mut App, request: ApiRequest, result: Result<ApiReply, ApiError>) -> Vec<AppAction> {
        app.handle(AppEvent::Response { request, result })
    }

    fn with_bob_selected() -> (App, LoadToken) {
        let mut app = App::new("alice");
        respond(&mut app, ApiRequest::ListUsers, Ok(ApiReply::Users(vec![User::new("bob")])));
        let actions = app.handle_key(KeyInput::Enter);
        let token = match requests(&actions).as_slice() {
            [ApiRequest::LoadConversation { token, .. }] => *token,
            other => panic!("expected one load, got {other:?}"),
        };
        (app, token)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyInput::Char(c));
        }
    }

    #[test]
    fn presence_due_requests_users() {
        let mut app = App::new("alice");
        assert_eq!(app.handle(AppEvent::PresenceDue), vec![AppAction::Request(ApiRequest::ListUsers)]);
    }

    #[test]
    fn conversation_due_without_selection_is_idle() {
        let mut app = App::new("alice");
        assert!(app.handle(AppEvent::ConversationDue).is_empty());
    }

    #[test]
    fn selecting_loads_and_focuses_compose() {
        let (app, token) = with_bob_selected();

        assert_eq!(token, LoadToken(1));
        assert_eq!(app.focus(), Focus::Compose);
        assert_eq!(app.selected().map(|u| u.username.as_str()), Some("bob"));
    }

    #[test]
    fn conversation_due_loads_and_polls_typing() {
        let (mut app, _) = with_bob_selected();
        let actions = app.handle(AppEvent::ConversationDue);

        assert_eq!(
            requests(&actions),
            vec![
                &ApiRequest::LoadConversation { with: "bob".into(), token: LoadToken(2) },
                &ApiRequest::GetTyping
            ]
        );
    }

    #[test]
    fn applied_conversation_queues_receipts_sequentially() {
        let (mut app, token) = with_bob_selected();
        let messages = vec![
            msg(1, "bob", "alice", MessageStatus::Delivered),
            msg(2, "alice", "bob", MessageStatus::Sent),
            msg(3, "Bob", "Alice", MessageStatus::Sent),
        ];

        let actions = respond(
            &mut app,
            ApiRequest::LoadConversation { with: "bob".into(), token },
            Ok(ApiReply::Messages(messages)),
        );
        assert_eq!(requests(&actions), vec![&ApiRequest::MarkRead { message_id: MessageId(1) }]);

        let actions = respond(
            &mut app,
            ApiRequest::MarkRead { message_id: MessageId(1) },
            Err(ApiError::Network("reset".into())),
        );
        assert_eq!(requests(&actions), vec![&ApiRequest::MarkRead { message_id: MessageId(3) }]);
    }

    #[test]
    fn stale_conversation_is_discarded() {
        let (mut app, first) = with_bob_selected();
        let second = match requests(&app.handle(AppEvent::ConversationDue)).first() {
            Some(ApiRequest::LoadConversation { token, .. }) => *token,
            other => panic!("expected load, got {other:?}"),
        };

        let newer = vec![msg(2, "alice", "bob", MessageStatus::Sent)];
        respond(
            &mut app,
            ApiRequest::LoadConversation { with: "bob".into(), token: second },
            Ok(ApiReply::Messages(newer.clone())),
        );
        let actions = respond(
            &mut app,
            ApiRequest::LoadConversation { with: "bob".into(), token: first },
            Ok(ApiReply::Messages(vec![])),
        );

        assert!(actions.is_empty());
        assert_eq!(app.conversation().messages, newer);
    }

    #[test]
    fn load_from_earlier_selection_of_same_peer_is_discarded() {
        let mut app = App::new("alice");
        respond(
            &mut app,
            ApiRequest::ListUsers,
            Ok(ApiReply::Users(vec![User::new("bob"), User::new("carol")])),
        );
        app.select(User::new("bob"));
        app.select(User::new("carol"));
        let actions = app.select(User::new("bob"));
        let current = match requests(&actions).as_slice() {
            [ApiRequest::LoadConversation { token, .. }] => *token,
            other => panic!("expected one load, got {other:?}"),
        };
        assert_eq!(current, LoadToken(3));

        let late = respond(
            &mut app,
            ApiRequest::LoadConversation { with: "bob".into(), token: LoadToken(1) },
            Ok(ApiReply::Messages(vec![msg(1, "bob", "alice", MessageStatus::Delivered)])),
        );
        assert!(late.is_empty());
        assert!(!app.conversation().is_loaded());
        assert_eq!(app.receipts().in_flight(), None);

        respond(
            &mut app,
            ApiRequest::LoadConversation { with: "bob".into(), token: current },
            Ok(ApiReply::Messages(vec![])),
        );
        assert_eq!(app.conversation().applied, Some(current));
    }

    #[test]
    fn reselecting_same_peer_keeps_floor() {
        let (mut app, first) = with_bob_selected();
        app.select(User::new("bob"));

        let actions = respond(
            &mut app,
            ApiRequest::LoadConversation { with: "bob".into(), token: first },
            Ok(ApiReply::Messages(vec![])),
        );
        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.conversation().applied, Some(first));
    }

    #[test]
    fn last_response_wins_without_guard() {
        let mut app = App::new("alice").with_stale_guard(false);
        respond(&mut app, ApiRequest::ListUsers, Ok(ApiReply::Users(vec![User::new("bob")])));
        app.handle_key(KeyInput::Enter);

        respond(
            &mut app,
            ApiRequest::LoadConversation { with: "carol".into(), token: LoadToken(9) },
            Ok(ApiReply::Messages(vec![msg(7, "carol", "dave", MessageStatus::Read)])),
        );
        assert_eq!(app.conversation().messages.len(), 1);
    }

    #[test]
    fn typing_burst_sends_start_per_change() {
        let (mut app, _) = with_bob_selected();
        let actions = app.handle_key(KeyInput::Char('h'));

        assert_eq!(
            actions,
            vec![
                AppAction::Request(ApiRequest::SetTyping {
                    recipient: "bob".into(),
                    action: TypingAction::Start
                }),
                AppAction::RestartTypingTimer,
                AppAction::Render,
            ]
        );
        assert_eq!(app.typing_peer(), Some("bob"));

        let idle = app.handle(AppEvent::TypingIdle);
        assert_eq!(
            requests(&idle),
            vec![&ApiRequest::SetTyping { recipient: "bob".into(), action: TypingAction::Stop }]
        );
        assert!(app.handle(AppEvent::TypingIdle).is_empty());
    }

    #[test]
    fn switching_peer_stops_previous_typing() {
        let mut app = App::new("alice");
        respond(
            &mut app,
            ApiRequest::ListUsers,
            Ok(ApiReply::Users(vec![User::new("bob"), User::new("carol")])),
        );
        app.handle_key(KeyInput::Enter);
        type_text(&mut app, "x");
        app.select(User::new("carol"));

        let actions = app.handle_key(KeyInput::Char('y'));
        assert_eq!(
            requests(&actions),
            vec![
                &ApiRequest::SetTyping { recipient: "bob".into(), action: TypingAction::Stop },
                &ApiRequest::SetTyping { recipient: "carol".into(), action: TypingAction::Start },
            ]
        );
    }

    #[test]
    fn cursor_moves_do_not_signal_typing() {
        let (mut app, _) = with_bob_selected();
        assert_eq!(app.handle_key(KeyInput::Left), vec![AppAction::Render]);
        assert!(app.handle_key(KeyInput::Backspace).is_empty());
    }

    #[test]
    fn empty_compose_sends_nothing() {
        let (mut app, _) = with_bob_selected();
        type_text(&mut app, "   ");
        assert!(app.handle_key(KeyInput::Enter).is_empty());
    }

    #[test]
    fn send_is_trimmed_and_busy_until_complete() {
        let (mut app, _) = with_bob_selected();
        type_text(&mut app, "  hello ");

        let actions = app.handle_key(KeyInput::Enter);
        assert_eq!(
            requests(&actions),
            vec![&ApiRequest::SendMessage { recipient: "bob".into(), message: "hello".into() }]
        );
        assert!(app.compose().is_sending());
        assert!(app.handle_key(KeyInput::Enter).is_empty());

        let request = ApiRequest::SendMessage { recipient: "bob".into(), message: "hello".into() };
        let actions = respond(&mut app, request, Ok(ApiReply::Sent { message_id: Some(MessageId(4)) }));
        assert_eq!(app.compose().text(), "");
        assert!(!app.compose().is_sending());
        assert!(matches!(requests(&actions).as_slice(), [ApiRequest::LoadConversation { .. }]));
    }

    #[test]
    fn send_failures_map_to_alerts() {
        let cases = [
            (ApiError::Rejected { status: 403, message: "blocked".into() }, "Failed: blocked"),
            (ApiError::Status { status: 500 }, "Failed: Unknown error"),
            (ApiError::Network("refused".into()), "Network error"),
            (ApiError::Decode("eof".into()), "Network error"),
        ];

        for (err, expected) in cases {
            let (mut app, _) = with_bob_selected();
            type_text(&mut app, "hi");
            app.handle_key(KeyInput::Enter);

            let request = ApiRequest::SendMessage { recipient: "bob".into(), message: "hi".into() };
            respond(&mut app, request, Err(err));

            assert_eq!(app.alert(), Some(expected));
            assert_eq!(app.compose().text(), "hi");
            assert!(!app.compose().is_sending());
        }
    }

    #[test]
    fn alert_swallows_next_key() {
        let (mut app, _) = with_bob_selected();
        type_text(&mut app, "hi");
        app.handle_key(KeyInput::Enter);
        let request = ApiRequest::SendMessage { recipient: "bob".into(), message: "hi".into() };
        respond(&mut app, request, Err(ApiError::Status { status: 500 }));

        assert_eq!(app.handle_key(KeyInput::Esc), vec![AppAction::Render]);
        assert_eq!(app.alert(), None);
        assert_eq!(app.handle_key(KeyInput::Esc), vec![AppAction::Quit]);
    }

    #[test]
    fn typing_line_tracks_selected_peer() {
        let (mut app, _) = with_bob_selected();

        let actions = respond(&mut app, ApiRequest::GetTyping, Ok(ApiReply::Typing(vec!["BOB".into()])));
        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.typing_indicator(), Some("bob is typing..."));

        let actions = respond(&mut app, ApiRequest::GetTyping, Ok(ApiReply::Typing(vec!["BOB".into()])));
        assert!(actions.is_empty());

        respond(&mut app, ApiRequest::GetTyping, Ok(ApiReply::Typing(vec!["carol".into()])));
        assert_eq!(app.typing_indicator(), None);
    }

    #[test]
    fn presence_failure_keeps_list() {
        let mut app = App::new("alice");
        respond(&mut app, ApiRequest::ListUsers, Ok(ApiReply::Users(vec![User::new("bob")])));
        respond(&mut app, ApiRequest::ListUsers, Err(ApiError::Status { status: 401 }));

        assert_eq!(app.users(), &[User::new("bob")]);
    }

    #[test]
    fn shrinking_list_clamps_highlight() {
        let mut app = App::new("alice");
        let users = vec![User::new("a"), User::new("b"), User::new("c")];
        respond(&mut app, ApiRequest::ListUsers, Ok(ApiReply::Users(users)));
        app.handle_key(KeyInput::Down);
        app.handle_key(KeyInput::Down);
        app.handle_key(KeyInput::Down);
        assert_eq!(app.highlighted(), 2);

        respond(&mut app, ApiRequest::ListUsers, Ok(ApiReply::Users(vec![User::new("a")])));
        assert_eq!(app.highlighted(), 0);
    }

    #[test]
    fn tab_needs_selection() {
        let mut app = App::new("alice");
        assert!(app.handle_key(KeyInput::Tab).is_empty());
        assert_eq!(app.focus(), Focus::Users);
    }
}
