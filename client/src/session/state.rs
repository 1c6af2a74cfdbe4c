use sg_shared::UserDto;

/// Whether there is a logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Startup check has not finished
    #[default]
    Unknown,
    LoggedOut,
    LoggedIn(UserDto),
}

impl SessionState {
    pub fn user(&self) -> Option<&UserDto> {
        match self {
            SessionState::LoggedIn(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Unknown)
    }
}
