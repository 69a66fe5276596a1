pub mod bans;
