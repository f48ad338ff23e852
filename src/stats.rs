use std::collections::HashSet;

use serde::Serialize;

use crate::client::ApiClient;
use crate::models::{ChatMessage, ChatSession, Role};

/// Collection-size snapshot for the dashboard landing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_files: usize,
    pub total_chat_sessions: usize,
    pub total_chat_messages: usize,
}

impl ApiClient {
    /// Fetch all four collections concurrently and reduce each to its
    /// length. If any fetch fails the whole snapshot degrades to zeros:
    /// the dashboard must always render, and a partial summary would look
    /// authoritative while being wrong.
    pub async fn stats(&self) -> DashboardStats {
        let (users, files, sessions, messages) = tokio::join!(
            self.users(),
            self.files(),
            self.chat_sessions(),
            self.chat_messages(),
        );

        match (users, files, sessions, messages) {
            (Ok(users), Ok(files), Ok(sessions), Ok(messages)) => DashboardStats {
                total_users: users.len(),
                total_files: files.len(),
                total_chat_sessions: sessions.len(),
                total_chat_messages: messages.len(),
            },
            (users, files, sessions, messages) => {
                for (resource, failed) in [
                    ("users", users.is_err()),
                    ("files", files.is_err()),
                    ("chat-sessions", sessions.is_err()),
                    ("chat-messages", messages.is_err()),
                ] {
                    if failed {
                        tracing::warn!(resource, "stats fetch failed, reporting zeros");
                    }
                }
                DashboardStats::default()
            }
        }
    }
}

/// Per-role and token breakdown of a message collection, as shown on the
/// chat-messages page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageStats {
    pub total: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub total_tokens: i64,
}

pub fn message_stats(messages: &[ChatMessage]) -> MessageStats {
    let mut stats = MessageStats {
        total: messages.len(),
        ..Default::default()
    };

    for message in messages {
        match message.role {
            Role::User => stats.user_messages += 1,
            Role::Assistant => stats.assistant_messages += 1,
        }
        stats.total_tokens += message.total_tokens();
    }

    stats
}

/// Breakdown of a session collection, as shown on the chat-sessions page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total: usize,
    pub total_messages: usize,
    pub unique_users: usize,
}

pub fn session_stats(sessions: &[ChatSession]) -> SessionStats {
    let unique_users: HashSet<i64> = sessions.iter().map(|s| s.user).collect();

    SessionStats {
        total: sessions.len(),
        total_messages: sessions.iter().map(|s| s.messages.len()).sum(),
        unique_users: unique_users.len(),
    }
}
