use serde::{Deserialize, Serialize};

pub const CASE_TYPE_WARN: &str = "WARN";
pub const CASE_TYPE_BAN: &str = "BAN";
pub const CASE_TYPE_UNBAN: &str = "UNBAN";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Case {
    pub case_id: u64,
    pub user_id: u64,
    pub moderator_id: u64,
    pub case_type: String,
    pub reason: String,
    pub lifted: bool,
    pub lifted_reason: Option<String>,
    pub created_at: u64,
}
