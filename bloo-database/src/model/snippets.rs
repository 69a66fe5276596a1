use serde::{Deserialize, Serialize};

/// Guild collections of named text responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnippetKind {
    Tag,
    Meme,
}

impl SnippetKind {
    pub(crate) fn table(self) -> &'static str {
        match self {
            Self::Tag => "tags",
            Self::Meme => "memes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Meme => "meme",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snippet {
    pub name: String,
    pub content: String,
    pub added_by: u64,
    pub use_count: u64,
}
