pub mod ban;
pub mod isbanned;
pub mod liftwarn;
pub mod refreshcaches;
pub mod unban;
pub mod unfilter;
pub mod warn;

use poise::serenity_prelude as serenity;

use bloo_database::model::cases::Case;
use bloo_utils::embed::{Status, sanitize_mentions};

pub(crate) const NO_REASON: &str = "No reason provided";

pub(crate) fn reason_or_default(reason: Option<&str>) -> &str {
    reason
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .unwrap_or(NO_REASON)
}

/// Embed confirming a recorded case.
pub(crate) fn case_embed(user: &serenity::User, action: &str, case: &Case) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("Case #{}", case.case_id))
        .color(Status::Success.color())
        .description(format!("<@{}> was {}.", user.id, action))
        .field("Reason", sanitize_mentions(&case.reason), false)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "{} | {}",
            user.name, case.case_type
        )))
}

#[cfg(test)]
mod tests {
    use super::{NO_REASON, reason_or_default};

    #[test]
    fn blank_reasons_fall_back() {
        assert_eq!(reason_or_default(None), NO_REASON);
        assert_eq!(reason_or_default(Some("   ")), NO_REASON);
        assert_eq!(reason_or_default(Some(" spam ")), "spam");
    }
}
