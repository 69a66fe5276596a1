use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x13_85_FF;
pub const SUCCESS_EMBED_COLOR: u32 = 0x2E_CC_71;
pub const WARNING_EMBED_COLOR: u32 = 0xE6_7E_22;
pub const ERROR_EMBED_COLOR: u32 = 0xE7_4C_3C;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
    Error,
}

impl Status {
    pub fn color(self) -> u32 {
        match self {
            Self::Success => SUCCESS_EMBED_COLOR,
            Self::Warning => WARNING_EMBED_COLOR,
            Self::Error => ERROR_EMBED_COLOR,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Success => "Done!",
            Self::Warning => "Warning",
            Self::Error => "An error occurred!",
        }
    }
}

/// Small colored embed used for replies that only carry a status line.
pub fn status_embed(status: Status, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(status.title())
        .color(status.color())
        .description(description)
}

/// Escape mentions in user-supplied text shown inside embeds.
pub fn sanitize_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}
