#[derive(Debug, Clone, Default)]
pub struct FilterTicket {
    creator_name: Option<String>,
}

impl FilterTicket {
    /// Keep tickets whose creator name contains the value. Matching is case
    /// sensitive.
    pub fn with_creator_name(mut self, creator_name: impl Into<String>) -> Self {
        self.creator_name = Some(creator_name.into());
        self
    }

    pub fn creator_name(&self) -> Option<&str> {
        self.creator_name.as_deref()
    }
}

impl From<Option<String>> for FilterTicket {
    /// Blank filters are treated as no filter.
    fn from(creator_name: Option<String>) -> Self {
        match creator_name {
            Some(name) if !name.is_empty() => Self::default().with_creator_name(name),
            _ => Self::default(),
        }
    }
}
