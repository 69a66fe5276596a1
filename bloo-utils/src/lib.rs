/// Attachment validation helpers.
pub mod attachments;
/// Generic embed builders shared across commands.
pub mod embed;
/// User-facing error types.
pub mod error;
/// Staff tiers and permission resolution.
pub mod permissions;
/// Interactive prompt helpers.
pub mod prompt;
/// Pure autocomplete filters.
pub mod suggest;
