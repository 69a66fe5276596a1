use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use bloo_utils::suggest::title_suggestions;

/// Footer prefix the bot writes on submitted common-issue embeds.
pub const ISSUE_FOOTER_MARKER: &str = "Submitted by";

const HISTORY_PAGE_SIZE: u8 = 100;

/// A common issue posted by the bot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssueEntry {
    pub title: String,
    pub description: Option<String>,
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub message_id: u64,
}

impl IssueEntry {
    pub fn jump_url(&self) -> String {
        let guild = self
            .guild_id
            .map_or_else(|| "@me".to_owned(), |id| id.to_string());
        format!(
            "https://discord.com/channels/{}/{}/{}",
            guild, self.channel_id, self.message_id
        )
    }
}

/// The parts of a history message the index looks at.
#[derive(Clone, Debug, Default)]
pub struct ScannedMessage {
    pub author_id: u64,
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub message_id: u64,
    pub first_embed: Option<ScannedEmbed>,
}

#[derive(Clone, Debug, Default)]
pub struct ScannedEmbed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub footer_text: Option<String>,
}

impl From<&serenity::Message> for ScannedMessage {
    fn from(message: &serenity::Message) -> Self {
        Self {
            author_id: message.author.id.get(),
            guild_id: message.guild_id.map(|id| id.get()),
            channel_id: message.channel_id.get(),
            message_id: message.id.get(),
            first_embed: message.embeds.first().map(|embed| ScannedEmbed {
                title: embed.title.clone(),
                description: embed.description.clone(),
                footer_text: embed.footer.as_ref().map(|footer| footer.text.clone()),
            }),
        }
    }
}

/// The index entry for `message`, if it is a bot-authored issue post.
pub fn issue_entry(message: &ScannedMessage, bot_user_id: u64) -> Option<IssueEntry> {
    if message.author_id != bot_user_id {
        return None;
    }

    let embed = message.first_embed.as_ref()?;
    let footer = embed.footer_text.as_deref().filter(|text| !text.is_empty())?;
    if !footer.starts_with(ISSUE_FOOTER_MARKER) {
        return None;
    }

    Some(IssueEntry {
        title: embed.title.clone().unwrap_or_default(),
        description: embed.description.clone(),
        guild_id: message.guild_id,
        channel_id: message.channel_id,
        message_id: message.message_id,
    })
}

/// Index messages given oldest first; a later post with the same title
/// replaces the earlier one.
pub fn index_messages<I>(messages: I, bot_user_id: u64) -> HashMap<String, IssueEntry>
where
    I: IntoIterator<Item = ScannedMessage>,
{
    let mut index = HashMap::new();
    for message in messages {
        if let Some(entry) = issue_entry(&message, bot_user_id) {
            index.insert(entry.title.clone(), entry);
        }
    }
    index
}

/// Title-keyed index of the common-issues channel.
#[derive(Clone, Debug, Default)]
pub struct IssueCache {
    issues: Arc<RwLock<HashMap<String, IssueEntry>>>,
}

impl IssueCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, title: &str) -> Option<IssueEntry> {
        self.issues.read().await.get(title).cloned()
    }

    pub async fn len(&self) -> usize {
        self.issues.read().await.len()
    }

    /// Titles containing `partial`, sorted case-insensitively.
    pub async fn titles_matching(&self, partial: &str) -> Vec<String> {
        let issues = self.issues.read().await;
        title_suggestions(issues.keys(), partial)
    }

    pub async fn replace(&self, issues: HashMap<String, IssueEntry>) {
        *self.issues.write().await = issues;
    }

    /// Scan the whole channel history and replace the index with the result.
    pub async fn rebuild(
        &self,
        http: &serenity::Http,
        bot_user_id: serenity::UserId,
        channel_id: serenity::ChannelId,
    ) -> anyhow::Result<usize> {
        let history = fetch_history_oldest_first(http, channel_id).await?;
        let index = index_messages(history, bot_user_id.get());
        let count = index.len();
        self.replace(index).await;
        Ok(count)
    }

    pub fn spawn_rebuild(
        &self,
        http: Arc<serenity::Http>,
        bot_user_id: serenity::UserId,
        channel_id: serenity::ChannelId,
    ) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            match cache.rebuild(&http, bot_user_id, channel_id).await {
                Ok(count) => info!(count, channel_id = %channel_id, "issue cache loaded"),
                Err(err) => warn!(?err, channel_id = %channel_id, "failed to rebuild issue cache"),
            }
        })
    }
}

async fn fetch_history_oldest_first(
    http: &serenity::Http,
    channel_id: serenity::ChannelId,
) -> anyhow::Result<Vec<ScannedMessage>> {
    let mut scanned = Vec::new();
    let mut cursor = serenity::MessageId::new(1);

    loop {
        let mut page = channel_id
            .messages(
                http,
                serenity::GetMessages::new()
                    .after(cursor)
                    .limit(HISTORY_PAGE_SIZE),
            )
            .await
            .with_context(|| format!("failed to read history of channel {channel_id}"))?;

        page.sort_by_key(|message| message.id);
        let Some(last) = page.last() else {
            break;
        };
        cursor = last.id;

        let full_page = page.len() >= usize::from(HISTORY_PAGE_SIZE);
        scanned.extend(page.iter().map(ScannedMessage::from));

        if !full_page {
            break;
        }
    }

    Ok(scanned)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{IssueCache, IssueEntry, ScannedEmbed, ScannedMessage, index_messages, issue_entry};

    const BOT: u64 = 1000;

    fn post(message_id: u64, author_id: u64, title: Option<&str>, footer: Option<&str>) -> ScannedMessage {
        ScannedMessage {
            author_id,
            guild_id: Some(1),
            channel_id: 2,
            message_id,
            first_embed: Some(ScannedEmbed {
                title: title.map(str::to_owned),
                description: None,
                footer_text: footer.map(str::to_owned),
            }),
        }
    }

    #[test]
    fn only_marked_bot_embeds_are_indexed() {
        let history = vec![
            post(1, BOT, Some("Crash on launch"), Some("Submitted by someone")),
            post(2, BOT, Some("Crash on launch"), Some("Posted automatically")),
        ];

        let index = index_messages(history, BOT);
        assert_eq!(index.len(), 1);
        assert_eq!(index["Crash on launch"].message_id, 1);
    }

    #[test]
    fn rejects_non_issue_messages() {
        assert!(issue_entry(&post(1, 5, Some("x"), Some("Submitted by a")), BOT).is_none());
        assert!(issue_entry(&post(1, BOT, Some("x"), Some("")), BOT).is_none());
        assert!(issue_entry(&post(1, BOT, Some("x"), None), BOT).is_none());

        let plain = ScannedMessage {
            author_id: BOT,
            ..ScannedMessage::default()
        };
        assert!(issue_entry(&plain, BOT).is_none());
    }

    #[test]
    fn later_posts_overwrite_and_missing_titles_are_empty() {
        let history = vec![
            post(1, BOT, Some("Bootloop"), Some("Submitted by a")),
            post(2, BOT, None, Some("Submitted by b")),
            post(3, BOT, Some("Bootloop"), Some("Submitted by c")),
        ];

        let index = index_messages(history, BOT);
        assert_eq!(index["Bootloop"].message_id, 3);
        assert_eq!(index[""].message_id, 2);
    }

    #[test]
    fn jump_url_points_at_message() {
        let entry = IssueEntry {
            title: "x".to_owned(),
            description: None,
            guild_id: Some(1),
            channel_id: 2,
            message_id: 3,
        };
        assert_eq!(entry.jump_url(), "https://discord.com/channels/1/2/3");
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive_and_sorted() {
        let cache = IssueCache::new();
        let history = vec![
            post(1, BOT, Some("crash on launch"), Some("Submitted by a")),
            post(2, BOT, Some("Battery drain"), Some("Submitted by b")),
            post(3, BOT, Some("App Crashes"), Some("Submitted by c")),
        ];
        cache.replace(index_messages(history, BOT)).await;

        assert_eq!(
            cache.titles_matching("CRASH").await,
            vec!["App Crashes", "crash on launch"]
        );
        assert_eq!(cache.titles_matching("").await.len(), 3);
        assert_eq!(cache.get("Battery drain").await.map(|e| e.message_id), Some(2));
    }

    #[tokio::test]
    async fn replace_is_wholesale() {
        let cache = IssueCache::new();
        cache
            .replace(index_messages(vec![post(1, BOT, Some("old"), Some("Submitted by a"))], BOT))
            .await;
        cache.replace(HashMap::new()).await;
        assert_eq!(cache.len().await, 0);
    }
}
