use thiserror::Error;

/// Problems the invoker can fix themselves. These are shown back to the user
/// and are not logged as failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("{0}")]
    BadArgument(String),
    #[error("{0}")]
    MissingConfig(String),
    #[error("You do not have permission to use this command.")]
    PermissionDenied,
    #[error("This command only works in servers.")]
    GuildOnly,
    #[error("{0}")]
    Unavailable(String),
}

impl UserError {
    pub fn bad_argument(message: impl Into<String>) -> Self {
        Self::BadArgument(message.into())
    }

    pub fn missing_config(message: impl Into<String>) -> Self {
        Self::MissingConfig(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Find a [`UserError`] anywhere in an error chain.
pub fn as_user_error(error: &anyhow::Error) -> Option<&UserError> {
    error.chain().find_map(|cause| cause.downcast_ref::<UserError>())
}

/// Generic reply for failures the invoker cannot do anything about.
pub fn fatal_error_message(maintainer_id: Option<u64>) -> String {
    match maintainer_id {
        Some(id) => format!("A fatal error occured. Tell <@{id}> about this."),
        None => "A fatal error occured. Tell the bot maintainers about this.".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context as _;

    use super::{UserError, as_user_error, fatal_error_message};

    #[test]
    fn user_errors_survive_context() {
        let error: anyhow::Error =
            Err::<(), _>(UserError::bad_argument("Attached file was not an image."))
                .context("subnews failed")
                .unwrap_err();

        assert_eq!(
            as_user_error(&error),
            Some(&UserError::BadArgument("Attached file was not an image.".to_owned()))
        );
    }

    #[test]
    fn other_errors_are_not_user_errors() {
        let error = anyhow::anyhow!("connection reset");
        assert!(as_user_error(&error).is_none());
    }

    #[test]
    fn fatal_message_mentions_maintainer() {
        assert_eq!(
            fatal_error_message(Some(109705860275539968)),
            "A fatal error occured. Tell <@109705860275539968> about this."
        );
        assert!(fatal_error_message(None).contains("maintainers"));
    }
}
