#[cfg(test)]
#[path = "template_test.rs"]
mod tests;

use eyre::{Result, bail};

/// Named insertion points of a transcript page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ShortId,
    Topic,
    Creator,
    Closer,
    CreatedAt,
    ClosedAt,
    Messages,
}

impl Field {
    const ALL: [Field; 7] = [
        Field::ShortId,
        Field::Topic,
        Field::Creator,
        Field::Closer,
        Field::CreatedAt,
        Field::ClosedAt,
        Field::Messages,
    ];

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::ShortId => "%%TICKET_ID%%",
            Field::Topic => "%%TICKET_TOPIC%%",
            Field::Creator => "%%TICKET_CREATOR%%",
            Field::Closer => "%%TICKET_CLOSER%%",
            Field::CreatedAt => "%%TICKET_CREATED_AT%%",
            Field::ClosedAt => "%%TICKET_CLOSED_AT%%",
            Field::Messages => "%%TICKET_MESSAGES%%",
        }
    }
}

/// Values substituted into a [`Template`].
#[derive(Debug, Default)]
pub struct Fields<'a> {
    pub short_id: &'a str,
    pub topic: &'a str,
    pub creator: &'a str,
    pub closer: &'a str,
    pub created_at: &'a str,
    pub closed_at: &'a str,
    pub messages: &'a str,
}

impl Fields<'_> {
    fn get(&self, field: Field) -> &str {
        match field {
            Field::ShortId => self.short_id,
            Field::Topic => self.topic,
            Field::Creator => self.creator,
            Field::Closer => self.closer,
            Field::CreatedAt => self.created_at,
            Field::ClosedAt => self.closed_at,
            Field::Messages => self.messages,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Field(Field),
}

/// A page template split into literal text and insertion points.
///
/// Every occurrence of a ticket placeholder is substituted. The message list
/// is inserted at the first `%%TICKET_MESSAGES%%` only, later occurrences are
/// kept as literal text. Substituted values are written out as is and never
/// scanned for placeholders again.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = vec![];
        let mut has_messages = false;
        let mut rest = source;

        while let Some((idx, field)) = next_placeholder(rest) {
            let placeholder = field.placeholder();
            if idx > 0 {
                push_text(&mut segments, &rest[..idx]);
            }
            if field == Field::Messages && has_messages {
                push_text(&mut segments, placeholder);
            } else {
                has_messages |= field == Field::Messages;
                segments.push(Segment::Field(field));
            }
            rest = &rest[idx + placeholder.len()..];
        }
        if !rest.is_empty() {
            push_text(&mut segments, rest);
        }

        if !has_messages {
            bail!(
                "template has no {} insertion point",
                Field::Messages.placeholder()
            );
        }
        Ok(Self { segments })
    }

    pub fn render(&self, fields: &Fields) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(field) => out.push_str(fields.get(*field)),
            }
        }
        out
    }
}

fn next_placeholder(text: &str) -> Option<(usize, Field)> {
    Field::ALL
        .iter()
        .filter_map(|field| text.find(field.placeholder()).map(|idx| (idx, *field)))
        .min_by_key(|(idx, _)| *idx)
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if let Some(Segment::Text(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Text(text.to_string()));
    }
}
