pub mod autocomplete;
pub mod checks;
pub mod info;
pub mod issues;
pub mod misc;
pub mod moderation;
pub mod snippets;
pub mod utility;

use bloo_core::{Data, Error};
use bloo_utils::permissions::PermissionLevel;

/// One row of the command table. The `permission` level is enforced through
/// the matching poise check on the command itself.
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
    pub permission: PermissionLevel,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    info::jailbreak::META,
    info::firmware::META,
    info::firmware::BETA_META,
    info::device::META,
    info::device::FIRMWARE_META,
    info::repo::META,
    snippets::TAG_META,
    snippets::MEME_META,
    issues::issue::META,
    misc::subnews::META,
    moderation::ban::META,
    moderation::unban::META,
    moderation::isbanned::META,
    moderation::warn::META,
    moderation::liftwarn::META,
    moderation::unfilter::META,
    moderation::refreshcaches::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        info::jailbreak::jailbreak(),
        info::firmware::firmware(),
        info::firmware::betafirmware(),
        info::device::deviceinfo(),
        info::device::devicefirmware(),
        info::repo::repo(),
        snippets::tag(),
        snippets::meme(),
        issues::issue::issue(),
        misc::subnews::subnews(),
        moderation::ban::ban(),
        moderation::unban::unban(),
        moderation::isbanned::isbanned(),
        moderation::warn::warn(),
        moderation::liftwarn::liftwarn(),
        moderation::unfilter::unfilter(),
        moderation::refreshcaches::refreshcaches(),
    ]
}

pub fn find_meta(name: &str) -> Option<&'static CommandMeta> {
    COMMANDS.iter().find(|meta| meta.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use bloo_utils::permissions::PermissionLevel;

    use super::{COMMANDS, commands, find_meta};

    #[test]
    fn table_and_registered_commands_match() {
        let registered: HashSet<String> = commands().into_iter().map(|cmd| cmd.name).collect();
        let described: HashSet<String> = COMMANDS.iter().map(|meta| meta.name.to_owned()).collect();
        assert_eq!(registered, described);
        assert_eq!(described.len(), COMMANDS.len());
    }

    #[test]
    fn staff_commands_carry_a_check() {
        for command in commands() {
            let meta = find_meta(&command.name).unwrap();
            assert_eq!(
                meta.permission != PermissionLevel::Everyone,
                !command.checks.is_empty(),
                "{}",
                meta.name
            );
        }
    }

    #[test]
    fn subnews_requires_sub_moderator() {
        assert_eq!(
            find_meta("subnews").map(|meta| meta.permission),
            Some(PermissionLevel::SubModerator)
        );
    }
}
