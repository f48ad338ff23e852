use crate::models::{ChatMessage, ChatSession, Role, StoredFile, User};

/// Case-insensitive substring match against the fields shown in the
/// corresponding dashboard table.
pub trait Matches {
    fn matches(&self, term: &str) -> bool;
}

impl Matches for User {
    fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.username.to_lowercase().contains(&term) || self.email.to_lowercase().contains(&term)
    }
}

impl Matches for StoredFile {
    fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }
}

impl Matches for ChatSession {
    // The search box takes ids: session id or owning user id.
    fn matches(&self, term: &str) -> bool {
        self.id.to_string().contains(term) || self.user.to_string().contains(term)
    }
}

impl Matches for ChatMessage {
    fn matches(&self, term: &str) -> bool {
        self.content.to_lowercase().contains(&term.to_lowercase())
            || self.session.to_string().contains(term)
    }
}

/// Filter a fetched collection by a search term. An empty term matches
/// everything, so an untouched search box shows the full table.
pub fn search<'a, T: Matches>(records: &'a [T], term: &str) -> Vec<&'a T> {
    if term.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|r| r.matches(term)).collect()
}

/// Role dropdown on the chat-messages page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoleFilter {
    #[default]
    All,
    User,
    Assistant,
}

impl RoleFilter {
    pub fn accepts(self, role: Role) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::User => role == Role::User,
            RoleFilter::Assistant => role == Role::Assistant,
        }
    }
}

/// Combined search-and-role filter for the chat-messages page.
pub fn filter_messages<'a>(
    messages: &'a [ChatMessage],
    term: &str,
    role: RoleFilter,
) -> Vec<&'a ChatMessage> {
    messages
        .iter()
        .filter(|m| role.accepts(m.role) && (term.is_empty() || m.matches(term)))
        .collect()
}
