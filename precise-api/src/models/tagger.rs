use serde::{Deserialize, Serialize};

pub const ENTITY_TYPE_ACCOUNT: &str = "account";

/// Identity under which tagging activity is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tagger {
    pub entity_type: String,
    pub entity_id: String,
}

impl Tagger {
    pub fn for_account(account_id: &str) -> Self {
        Tagger {
            entity_type: ENTITY_TYPE_ACCOUNT.to_string(),
            entity_id: account_id.to_string(),
        }
    }
}
