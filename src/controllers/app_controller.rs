use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;

use crate::controllers::post_controller;
use crate::error::FeedtuiError;
use crate::models::post::sort_newest_first;
use crate::models::{FeedClient, Post};
use crate::views::{tui, StatefulList};

/// How long a status message stays on screen before it clears itself.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Content,
    ImageUrl,
    Author,
}

impl Field {
    // The author field only exists while creating; editing cycles over
    // content and image URL.
    fn next(self, mode: EditorMode) -> Field {
        match (self, mode) {
            (Field::Content, _) => Field::ImageUrl,
            (Field::ImageUrl, EditorMode::Create) => Field::Author,
            (Field::ImageUrl, EditorMode::Edit) => Field::Content,
            (Field::Author, _) => Field::Content,
        }
    }

    fn previous(self, mode: EditorMode) -> Field {
        match (self, mode) {
            (Field::Content, EditorMode::Create) => Field::Author,
            (Field::Content, EditorMode::Edit) => Field::ImageUrl,
            (Field::ImageUrl, _) => Field::Content,
            (Field::Author, _) => Field::ImageUrl,
        }
    }
}

pub struct EditorState {
    pub mode: EditorMode,
    pub draft: Post,
    pub field: Field,
}

impl EditorState {
    fn focused_value_mut(&mut self) -> &mut String {
        match self.field {
            Field::Content => &mut self.draft.content,
            Field::ImageUrl => &mut self.draft.image_url,
            Field::Author => &mut self.draft.author,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
    pub shown_at: Instant,
}

/// A store call the event loop should start.
#[derive(Debug, PartialEq)]
pub enum Action {
    Reload,
    Create(Post),
    Update(u64, Post),
    Delete(u64),
    Quit,
}

/// Completion of a spawned store call, delivered over the channel.
pub enum AppMessage {
    PostsLoaded(Result<Vec<Post>, FeedtuiError>),
    PostCreated(Result<Post, FeedtuiError>),
    PostUpdated(Result<Post, FeedtuiError>),
    PostDeleted {
        id: u64,
        result: Result<(), FeedtuiError>,
    },
}

/// All client-side state: the cached feed, the editor dialog, the transient
/// status message, and one in-flight flag per store action so a repeated
/// keypress cannot fire a duplicate request.
pub struct App {
    pub feed: StatefulList<Post>,
    pub editor: Option<EditorState>,
    pub status: Option<StatusMessage>,
    pub loading: bool,
    pub submitting: bool,
    pub deleting: bool,
}

impl App {
    pub fn new() -> Self {
        App {
            feed: StatefulList::with_items(Vec::new()),
            editor: None,
            status: None,
            loading: false,
            submitting: false,
            deleting: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.editor.is_some() {
            return self.handle_editor_key(key);
        }

        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Esc => {
                // Esc dismisses a visible status message first, quits otherwise
                if self.status.is_some() {
                    self.status = None;
                    None
                } else {
                    Some(Action::Quit)
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.feed.next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.feed.previous();
                None
            }
            KeyCode::Char('r') => self.request_reload(),
            KeyCode::Char('n') => {
                self.open_create();
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                self.open_edit();
                None
            }
            KeyCode::Char('d') => self.request_delete(),
            _ => None,
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Option<Action> {
        let editor = self.editor.as_mut()?;

        match key.code {
            KeyCode::Esc => {
                // Cancel discards the draft without any store call
                self.editor = None;
                None
            }
            KeyCode::Tab => {
                editor.field = editor.field.next(editor.mode);
                None
            }
            KeyCode::BackTab => {
                editor.field = editor.field.previous(editor.mode);
                None
            }
            KeyCode::Enter => self.submit_editor(),
            KeyCode::Backspace => {
                editor.focused_value_mut().pop();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                editor.focused_value_mut().push(c);
                None
            }
            _ => None,
        }
    }

    pub fn open_create(&mut self) {
        // Always a fresh empty draft, whatever was open before
        self.editor = Some(EditorState {
            mode: EditorMode::Create,
            draft: Post::default(),
            field: Field::Content,
        });
    }

    pub fn open_edit(&mut self) {
        let Some(post) = self.feed.selected_item() else {
            return;
        };
        self.editor = Some(EditorState {
            mode: EditorMode::Edit,
            draft: post.clone(),
            field: Field::Content,
        });
    }

    pub fn request_reload(&mut self) -> Option<Action> {
        if self.loading {
            return None;
        }
        self.loading = true;
        Some(Action::Reload)
    }

    fn request_delete(&mut self) -> Option<Action> {
        if self.deleting {
            return None;
        }
        let id = match self.feed.selected_item().and_then(|post| post.id) {
            Some(id) => id,
            None => {
                log::warn!("selected post has no id, cannot delete");
                return None;
            }
        };
        self.deleting = true;
        Some(Action::Delete(id))
    }

    fn submit_editor(&mut self) -> Option<Action> {
        if self.submitting {
            return None;
        }
        let editor = self.editor.as_ref()?;

        let action = match editor.mode {
            EditorMode::Create => Action::Create(editor.draft.clone()),
            EditorMode::Edit => match editor.draft.id {
                Some(id) => Action::Update(id, editor.draft.clone()),
                None => {
                    log::warn!("edit draft has no id, cannot update");
                    return None;
                }
            },
        };
        self.submitting = true;
        Some(action)
    }

    /// Fold a completed store call back into the state. Mutation successes
    /// close the dialog and ask for a reload; failures leave everything as
    /// it was apart from the status message.
    pub fn apply(&mut self, message: AppMessage) -> Option<Action> {
        match message {
            AppMessage::PostsLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(mut posts) => {
                        sort_newest_first(&mut posts);
                        self.feed.replace_items(posts);
                    }
                    Err(e) => {
                        log::error!("Error fetching posts: {e}");
                        self.set_status("Failed to load posts.", Severity::Error);
                    }
                }
                None
            }
            AppMessage::PostCreated(result) => {
                self.submitting = false;
                match result {
                    // The created record itself is discarded, the reload
                    // brings back the canonical list
                    Ok(_) => {
                        self.editor = None;
                        self.set_status("Post created successfully!", Severity::Success);
                        self.request_reload()
                    }
                    Err(e) => {
                        log::error!("Error creating post: {e}");
                        self.set_status("Failed to create post.", Severity::Error);
                        None
                    }
                }
            }
            AppMessage::PostUpdated(result) => {
                self.submitting = false;
                match result {
                    Ok(_) => {
                        self.editor = None;
                        self.set_status("Post updated successfully!", Severity::Success);
                        self.request_reload()
                    }
                    Err(e) => {
                        log::error!("Error updating post: {e}");
                        self.set_status("Failed to update post.", Severity::Error);
                        None
                    }
                }
            }
            AppMessage::PostDeleted { id, result } => {
                self.deleting = false;
                match result {
                    Ok(()) => {
                        self.set_status("Post deleted successfully!", Severity::Success);
                        self.request_reload()
                    }
                    Err(e) => {
                        log::error!("Error deleting post {id}: {e}");
                        self.set_status("Failed to delete post.", Severity::Error);
                        None
                    }
                }
            }
        }
    }

    /// Clear the status message once it has been on screen long enough.
    pub fn tick(&mut self, now: Instant) {
        if let Some(status) = &self.status {
            if now.duration_since(status.shown_at) >= STATUS_TIMEOUT {
                self.status = None;
            }
        }
    }

    fn set_status(&mut self, text: &str, severity: Severity) {
        self.status = Some(StatusMessage {
            text: text.to_string(),
            severity,
            shown_at: Instant::now(),
        });
    }
}

pub async fn start_app(client: FeedClient) -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    let mut terminal = tui::setup_terminal()?;

    let res = run_app(&mut terminal, Arc::new(client)).await;

    // Restore terminal
    tui::restore_terminal(&mut terminal)?;

    if let Err(err) = res {
        eprintln!("{:?}", err);
    }

    Ok(())
}

pub async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    client: Arc<FeedClient>,
) -> Result<(), FeedtuiError> {
    let (tx, rx) = mpsc::channel();
    let mut app = App::new();

    // Initial fetch
    if let Some(action) = app.request_reload() {
        dispatch(action, &client, &tx);
    }

    loop {
        terminal.draw(|f| tui::render_ui(f, &mut app))?;

        // Drain completed store calls before handling input
        while let Ok(message) = rx.try_recv() {
            if let Some(action) = app.apply(message) {
                dispatch(action, &client, &tx);
            }
        }

        app.tick(Instant::now());

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    match app.handle_key(key) {
                        Some(Action::Quit) => return Ok(()),
                        Some(action) => dispatch(action, &client, &tx),
                        None => {}
                    }
                }
            }
        }
    }
}

// Start the store call for an action on its own task; the completion comes
// back through the channel.
fn dispatch(action: Action, client: &Arc<FeedClient>, tx: &Sender<AppMessage>) {
    let client = Arc::clone(client);
    let tx = tx.clone();

    match action {
        Action::Reload => {
            tokio::spawn(async move {
                let result = post_controller::fetch_posts(&client).await;
                if tx.send(AppMessage::PostsLoaded(result)).is_err() {
                    log::error!("failed to send PostsLoaded message");
                }
            });
        }
        Action::Create(draft) => {
            tokio::spawn(async move {
                let result = post_controller::create_post(&client, &draft).await;
                if tx.send(AppMessage::PostCreated(result)).is_err() {
                    log::error!("failed to send PostCreated message");
                }
            });
        }
        Action::Update(id, post) => {
            tokio::spawn(async move {
                let result = post_controller::update_post(&client, id, &post).await;
                if tx.send(AppMessage::PostUpdated(result)).is_err() {
                    log::error!("failed to send PostUpdated message");
                }
            });
        }
        Action::Delete(id) => {
            tokio::spawn(async move {
                let result = post_controller::delete_post(&client, id).await;
                if tx.send(AppMessage::PostDeleted { id, result }).is_err() {
                    log::error!("failed to send PostDeleted message");
                }
            });
        }
        Action::Quit => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn ch(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    fn stored_post(id: u64, content: &str, created_at: &str) -> Post {
        Post {
            id: Some(id),
            content: content.to_string(),
            author: "ann".to_string(),
            created_at: Some(created_at.to_string()),
            updated_at: Some(created_at.to_string()),
            ..Post::default()
        }
    }

    fn app_with_posts(posts: Vec<Post>) -> App {
        let mut app = App::new();
        app.feed = StatefulList::with_items(posts);
        app
    }

    #[test]
    fn loaded_posts_are_sorted_newest_first() {
        let mut app = App::new();
        app.loading = true;

        let posts = vec![
            stored_post(1, "first", "2024-01-01T00:00:00Z"),
            stored_post(2, "second", "2024-02-01T00:00:00Z"),
        ];
        let action = app.apply(AppMessage::PostsLoaded(Ok(posts)));

        assert_eq!(action, None);
        assert!(!app.loading);
        let ids: Vec<_> = app.feed.items.iter().filter_map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn failed_load_keeps_the_current_list() {
        let mut app = app_with_posts(vec![stored_post(1, "kept", "2024-01-01T00:00:00Z")]);
        app.loading = true;

        let action = app.apply(AppMessage::PostsLoaded(Err(FeedtuiError::Network(
            "down".into(),
        ))));

        assert_eq!(action, None);
        assert_eq!(app.feed.items.len(), 1);
        assert_eq!(app.status.as_ref().unwrap().severity, Severity::Error);
    }

    #[test]
    fn create_dialog_always_opens_with_an_empty_draft() {
        let mut app = app_with_posts(vec![stored_post(7, "hello", "2024-01-01T00:00:00Z")]);

        // Dirty an edit draft first, then cancel out of it
        app.handle_key(ch('e'));
        app.handle_key(ch('x'));
        app.handle_key(key(KeyCode::Esc));

        app.handle_key(ch('n'));
        let editor = app.editor.as_ref().unwrap();
        assert_eq!(editor.mode, EditorMode::Create);
        assert_eq!(editor.draft, Post::default());
        assert_eq!(editor.field, Field::Content);
    }

    #[test]
    fn edit_draft_is_a_copy_independent_of_the_list() {
        let mut app = app_with_posts(vec![stored_post(7, "hello", "2024-01-01T00:00:00Z")]);

        app.handle_key(ch('e'));
        app.handle_key(ch('!'));

        assert_eq!(app.editor.as_ref().unwrap().draft.content, "hello!");
        assert_eq!(app.feed.items[0].content, "hello");
    }

    #[test]
    fn cancel_closes_the_dialog_without_an_action() {
        let mut app = app_with_posts(vec![stored_post(7, "hello", "2024-01-01T00:00:00Z")]);

        app.handle_key(ch('n'));
        assert_eq!(app.handle_key(key(KeyCode::Esc)), None);
        assert!(app.editor.is_none());

        app.handle_key(ch('e'));
        assert_eq!(app.handle_key(key(KeyCode::Esc)), None);
        assert!(app.editor.is_none());
    }

    #[test]
    fn create_submit_emits_one_action_and_success_reloads() {
        let mut app = App::new();

        app.handle_key(ch('n'));
        app.handle_key(ch('h'));
        app.handle_key(ch('i'));

        let action = app.handle_key(key(KeyCode::Enter));
        match action {
            Some(Action::Create(draft)) => {
                assert_eq!(draft.content, "hi");
                assert_eq!(draft.id, None);
            }
            other => panic!("expected create action, got {:?}", other),
        }
        assert!(app.submitting);

        // A second submit while the first is in flight is dropped
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);

        let action = app.apply(AppMessage::PostCreated(Ok(stored_post(
            9,
            "hi",
            "2024-03-01T00:00:00Z",
        ))));
        assert_eq!(action, Some(Action::Reload));
        assert!(app.editor.is_none());
        assert!(app.loading);
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.severity, Severity::Success);
        assert_eq!(status.text, "Post created successfully!");
    }

    #[test]
    fn failed_create_keeps_dialog_draft_and_list() {
        let mut app = app_with_posts(vec![stored_post(1, "kept", "2024-01-01T00:00:00Z")]);

        app.handle_key(ch('n'));
        app.handle_key(ch('h'));
        app.handle_key(ch('i'));
        app.handle_key(key(KeyCode::Enter));

        let action = app.apply(AppMessage::PostCreated(Err(FeedtuiError::Network(
            "boom".into(),
        ))));

        assert_eq!(action, None);
        assert!(!app.submitting);
        let editor = app.editor.as_ref().unwrap();
        assert_eq!(editor.mode, EditorMode::Create);
        assert_eq!(editor.draft.content, "hi");
        assert_eq!(app.feed.items.len(), 1);
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.severity, Severity::Error);
        assert_eq!(status.text, "Failed to create post.");
    }

    #[test]
    fn edit_submit_targets_the_post_id() {
        let mut app = app_with_posts(vec![stored_post(7, "hello", "2024-01-01T00:00:00Z")]);

        app.handle_key(ch('e'));
        app.handle_key(ch('!'));
        let action = app.handle_key(key(KeyCode::Enter));

        match action {
            Some(Action::Update(7, draft)) => assert_eq!(draft.content, "hello!"),
            other => panic!("expected update action, got {:?}", other),
        }
    }

    #[test]
    fn delete_targets_the_selected_post_and_reloads_on_success() {
        let mut app = app_with_posts(vec![
            stored_post(7, "bye", "2024-02-01T00:00:00Z"),
            stored_post(3, "stay", "2024-01-01T00:00:00Z"),
        ]);

        let action = app.handle_key(ch('d'));
        assert_eq!(action, Some(Action::Delete(7)));
        assert!(app.deleting);

        // Repeated press while the delete is in flight is dropped
        assert_eq!(app.handle_key(ch('d')), None);

        let action = app.apply(AppMessage::PostDeleted {
            id: 7,
            result: Ok(()),
        });
        assert_eq!(action, Some(Action::Reload));
        assert_eq!(app.status.as_ref().unwrap().severity, Severity::Success);
    }

    #[test]
    fn delete_failure_does_not_reload() {
        let mut app = app_with_posts(vec![stored_post(7, "bye", "2024-02-01T00:00:00Z")]);

        app.handle_key(ch('d'));
        let action = app.apply(AppMessage::PostDeleted {
            id: 7,
            result: Err(FeedtuiError::Network("boom".into())),
        });

        assert_eq!(action, None);
        assert!(!app.deleting);
        assert_eq!(app.feed.items.len(), 1);
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.severity, Severity::Error);
        assert_eq!(status.text, "Failed to delete post.");
    }

    #[test]
    fn reload_requests_are_not_reentrant() {
        let mut app = App::new();
        assert_eq!(app.request_reload(), Some(Action::Reload));
        assert_eq!(app.request_reload(), None);
    }

    #[test]
    fn status_clears_after_the_display_timeout() {
        let mut app = App::new();
        let t0 = Instant::now();
        app.status = Some(StatusMessage {
            text: "Post created successfully!".into(),
            severity: Severity::Success,
            shown_at: t0,
        });

        app.tick(t0 + Duration::from_secs(2));
        assert!(app.status.is_some());

        app.tick(t0 + STATUS_TIMEOUT);
        assert!(app.status.is_none());
    }

    #[test]
    fn esc_dismisses_a_visible_status_before_quitting() {
        let mut app = App::new();
        app.status = Some(StatusMessage {
            text: "Failed to delete post.".into(),
            severity: Severity::Error,
            shown_at: Instant::now(),
        });

        assert_eq!(app.handle_key(key(KeyCode::Esc)), None);
        assert!(app.status.is_none());
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Some(Action::Quit));
    }

    #[test]
    fn field_focus_cycles_per_mode() {
        let mut app = App::new();
        app.handle_key(ch('n'));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.editor.as_ref().unwrap().field, Field::ImageUrl);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.editor.as_ref().unwrap().field, Field::Author);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.editor.as_ref().unwrap().field, Field::Content);

        let mut app = app_with_posts(vec![stored_post(7, "hello", "2024-01-01T00:00:00Z")]);
        app.handle_key(ch('e'));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.editor.as_ref().unwrap().field, Field::ImageUrl);
        // no author field while editing
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.editor.as_ref().unwrap().field, Field::Content);
    }
}
