use poise::serenity_prelude as serenity;

use crate::checks::invoker_level;
use crate::{COMMANDS, CommandMeta};
use bloo_core::{Context, Error};
use bloo_utils::embed::DEFAULT_EMBED_COLOR;
use bloo_utils::permissions::PermissionLevel;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists the commands you can use.",
    category: "utility",
    usage: "/help [category]",
    permission: PermissionLevel::Everyone,
};

#[poise::command(slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Only show this category"] category: Option<String>,
) -> Result<(), Error> {
    let level = invoker_level(ctx).await?;
    let category = category.as_deref().map(str::trim).map(str::to_lowercase);

    if let Some(wanted) = category.as_deref()
        && !COMMANDS.iter().any(|cmd| cmd.category == wanted)
    {
        ctx.send(
            poise::CreateReply::default()
                .ephemeral(true)
                .content(unknown_category_message(wanted)),
        )
        .await?;
        return Ok(());
    }

    let commands = visible_commands(level, category.as_deref());
    let embed = serenity::CreateEmbed::new()
        .title("Available Commands")
        .color(DEFAULT_EMBED_COLOR)
        .description(grouped_help_description(&commands));

    ctx.send(poise::CreateReply::default().ephemeral(true).embed(embed))
        .await?;
    Ok(())
}

fn visible_commands(level: PermissionLevel, category: Option<&str>) -> Vec<&'static CommandMeta> {
    let mut visible: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|cmd| cmd.permission <= level)
        .filter(|cmd| category.is_none_or(|wanted| cmd.category == wanted))
        .collect();

    visible.sort_unstable_by(|left, right| {
        left.category
            .cmp(right.category)
            .then_with(|| left.name.cmp(right.name))
    });
    visible
}

fn grouped_help_description(commands: &[&CommandMeta]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", display_category(command.category)));
            current_category = Some(command.category);
        }

        out.push_str(&format!("`{}`: {}", command.usage, command.desc));
        if command.permission != PermissionLevel::Everyone {
            out.push_str(&format!(" ({})", command.permission.label()));
        }
        out.push('\n');
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    out.trim_end().to_owned()
}

fn unknown_category_message(wanted: &str) -> String {
    let mut categories: Vec<&str> = COMMANDS.iter().map(|cmd| cmd.category).collect();
    categories.sort_unstable();
    categories.dedup();

    let valid = categories
        .iter()
        .map(|category| display_category(category))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Unknown category: {}\nValid categories: {}",
        display_category(wanted),
        valid
    )
}

fn display_category(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use bloo_utils::permissions::PermissionLevel;

    use super::{grouped_help_description, visible_commands};

    #[test]
    fn members_do_not_see_staff_commands() {
        let names: Vec<&str> = visible_commands(PermissionLevel::Everyone, None)
            .iter()
            .map(|cmd| cmd.name)
            .collect();
        assert!(names.contains(&"ping"));
        assert!(!names.contains(&"subnews"));
        assert!(!names.contains(&"ban"));
    }

    #[test]
    fn administrators_see_everything() {
        assert_eq!(
            visible_commands(PermissionLevel::Administrator, None).len(),
            crate::COMMANDS.len()
        );
    }

    #[test]
    fn description_is_grouped_by_category() {
        let commands = visible_commands(PermissionLevel::Everyone, Some("utility"));
        let text = grouped_help_description(&commands);
        assert!(text.starts_with("**Utility**\n"));
        assert!(text.contains("`/ping`"));
        assert!(!text.contains("**Info**"));
    }
}
