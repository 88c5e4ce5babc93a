use tokio::task::JoinHandle;

use crate::client::{ChatClient, ChatError};

/// Shown in place of the assistant reply for any failed exchange.
pub const FALLBACK_MESSAGE: &str = "Sorry, there was an error. Please try again later.";

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    pub should_quit: bool,

    // Input state
    pub input: String,
    pub cursor: usize, // char position in input

    // Chat panel state
    pub messages: Vec<ChatMessage>,
    pub chat_scroll: u16,
    pub chat_height: u16, // inner panel size, updated during render
    pub chat_width: u16,
    pub loading: bool,
    pub animation_frame: u8, // 0-2 for the ellipsis animation

    // In-flight exchange, at most one
    pub pending: Option<JoinHandle<Result<String, ChatError>>>,

    pub client: ChatClient,
}

impl App {
    pub fn new(client: ChatClient) -> Self {
        Self {
            should_quit: false,

            input: String::new(),
            cursor: 0,

            messages: Vec::new(),
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            loading: false,
            animation_frame: 0,

            pending: None,

            client,
        }
    }

    /// Appends a message to the chat panel and scrolls it into view.
    pub fn push_message(&mut self, content: String, role: ChatRole) {
        self.messages.push(ChatMessage { role, content });
        self.scroll_to_bottom();
    }

    /// Sends the current input to the chat endpoint.
    ///
    /// Whitespace-only input is ignored. While an exchange is in flight
    /// further submits are ignored too, so replies render in send order.
    pub fn submit(&mut self) {
        if self.pending.is_some() {
            return;
        }

        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }

        self.input.clear();
        self.cursor = 0;
        self.loading = true;
        self.push_message(text.clone(), ChatRole::User);

        log::debug!("submitting message ({} chars)", text.len());

        let client = self.client.clone();
        self.pending = Some(tokio::spawn(async move { client.send(&text).await }));
    }

    /// Drains the in-flight exchange once its task has finished.
    ///
    /// Any failure collapses to the fixed fallback message; the underlying
    /// detail goes to the log and is never rendered.
    pub async fn poll_response(&mut self) {
        let finished = self
            .pending
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(task) = self.pending.take() {
            let content = match task.await {
                Ok(Ok(reply)) => reply,
                Ok(Err(err)) => {
                    log::error!("chat request failed: {err}");
                    FALLBACK_MESSAGE.to_string()
                }
                Err(err) => {
                    log::error!("chat task aborted: {err}");
                    FALLBACK_MESSAGE.to_string()
                }
            };
            self.loading = false;
            self.push_message(content, ChatRole::Assistant);
        }
    }

    // Input editing

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        let char_count = self.input.chars().count();
        if self.cursor < char_count {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    // Chat panel scrolling

    /// Scrolls the chat panel so the newest message is fully visible.
    pub fn scroll_to_bottom(&mut self) {
        self.chat_scroll = self
            .total_chat_lines()
            .saturating_sub(self.visible_chat_height());
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max_scroll = self
            .total_chat_lines()
            .saturating_sub(self.visible_chat_height());
        if self.chat_scroll < max_scroll {
            self.chat_scroll += 1;
        }
    }

    pub fn scroll_half_page_up(&mut self) {
        let half_page = self.visible_chat_height() / 2;
        self.chat_scroll = self.chat_scroll.saturating_sub(half_page);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half_page = self.visible_chat_height() / 2;
        let max_scroll = self
            .total_chat_lines()
            .saturating_sub(self.visible_chat_height());
        self.chat_scroll = (self.chat_scroll + half_page).min(max_scroll);
    }

    /// Rendered line count of the chat panel, wrap-aware.
    ///
    /// Must mirror the layout in ui::render_chat: role label, wrapped
    /// content lines, blank separator, plus the loading indicator.
    fn total_chat_lines(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total: u16 = 0;
        for msg in &self.messages {
            total += 1; // role line ("You:" or "AI:")
            for line in msg.content.lines() {
                // Character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total += 1;
                } else {
                    total += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total += 1; // blank line after message
        }

        if self.loading {
            total += 2; // "AI:" + "Thinking..."
        }

        total
    }

    fn visible_chat_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        }
    }

    /// Tick the ellipsis animation while a request is in flight.
    pub fn tick_animation(&mut self) {
        if self.loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}
