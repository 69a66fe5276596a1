use poise::serenity_prelude as serenity;

/// Staff tiers, lowest first. A member holds every tier at or below their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PermissionLevel {
    Everyone,
    SubModerator,
    Moderator,
    Administrator,
}

impl PermissionLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Everyone => "everyone",
            Self::SubModerator => "sub-moderator",
            Self::Moderator => "moderator",
            Self::Administrator => "administrator",
        }
    }
}

/// Role ids that grant staff tiers in a guild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaffRoles {
    pub sub_moderator: Option<u64>,
    pub moderator: Option<u64>,
    pub administrator: Option<u64>,
}

/// A member's roles and effective guild-wide permissions.
#[derive(Clone, Debug)]
pub struct MemberAccess {
    pub role_ids: Vec<u64>,
    pub permissions: serenity::Permissions,
}

/// Highest tier granted by a member's roles. Discord administrators always
/// rank as [`PermissionLevel::Administrator`].
pub fn resolve_level(access: &MemberAccess, staff: &StaffRoles) -> PermissionLevel {
    let holds = |role: Option<u64>| role.is_some_and(|id| access.role_ids.contains(&id));

    if access
        .permissions
        .contains(serenity::Permissions::ADMINISTRATOR)
        || holds(staff.administrator)
    {
        PermissionLevel::Administrator
    } else if holds(staff.moderator) {
        PermissionLevel::Moderator
    } else if holds(staff.sub_moderator) {
        PermissionLevel::SubModerator
    } else {
        PermissionLevel::Everyone
    }
}

/// Resolve a member's roles and effective guild permissions.
///
/// The guild owner is granted every permission.
pub async fn resolve_member_access(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<MemberAccess> {
    let guild = guild_id.to_partial_guild(http).await?;
    let member = guild_id.member(http, user_id).await?;
    let role_ids = member.roles.iter().map(|role| role.get()).collect();

    if guild.owner_id == user_id {
        return Ok(MemberAccess {
            role_ids,
            permissions: serenity::Permissions::all(),
        });
    }

    let roles = guild_id.roles(http).await?;
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    let mut permissions = serenity::Permissions::empty();
    for role in roles.values() {
        if role.id == everyone_role_id || member.roles.contains(&role.id) {
            permissions |= role.permissions;
        }
    }

    Ok(MemberAccess {
        role_ids,
        permissions,
    })
}

pub async fn member_level(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    staff: &StaffRoles,
) -> anyhow::Result<PermissionLevel> {
    let access = resolve_member_access(http, guild_id, user_id).await?;
    Ok(resolve_level(&access, staff))
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::{MemberAccess, PermissionLevel, StaffRoles, resolve_level};

    const STAFF: StaffRoles = StaffRoles {
        sub_moderator: Some(10),
        moderator: Some(20),
        administrator: Some(30),
    };

    fn access(role_ids: &[u64], permissions: serenity::Permissions) -> MemberAccess {
        MemberAccess {
            role_ids: role_ids.to_vec(),
            permissions,
        }
    }

    #[test]
    fn highest_staff_role_wins() {
        let perms = serenity::Permissions::empty();
        assert_eq!(resolve_level(&access(&[], perms), &STAFF), PermissionLevel::Everyone);
        assert_eq!(resolve_level(&access(&[10], perms), &STAFF), PermissionLevel::SubModerator);
        assert_eq!(resolve_level(&access(&[10, 20], perms), &STAFF), PermissionLevel::Moderator);
        assert_eq!(resolve_level(&access(&[30], perms), &STAFF), PermissionLevel::Administrator);
    }

    #[test]
    fn discord_administrators_outrank_roles() {
        let level = resolve_level(
            &access(&[], serenity::Permissions::ADMINISTRATOR),
            &StaffRoles::default(),
        );
        assert_eq!(level, PermissionLevel::Administrator);
    }

    #[test]
    fn unconfigured_roles_grant_nothing() {
        let level = resolve_level(
            &access(&[10, 20, 30], serenity::Permissions::BAN_MEMBERS),
            &StaffRoles::default(),
        );
        assert_eq!(level, PermissionLevel::Everyone);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(PermissionLevel::Administrator > PermissionLevel::Moderator);
        assert!(PermissionLevel::Moderator > PermissionLevel::SubModerator);
        assert!(PermissionLevel::SubModerator >= PermissionLevel::SubModerator);
    }
}
