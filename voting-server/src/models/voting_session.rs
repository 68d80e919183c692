use serde::{Deserialize, Serialize};

/// A yes/no poll. The same JSON form is stored, returned over HTTP and pushed
/// to subscribers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VotingSession {
    pub name: String,
    pub id: String,
    #[serde(rename = "yesCount", default)]
    pub yes_voters: Vec<String>,
    #[serde(rename = "noCount", default)]
    pub no_voters: Vec<String>,
}

impl VotingSession {
    pub fn new(id: String, name: String) -> Self {
        VotingSession {
            name,
            id,
            yes_voters: Vec::new(),
            no_voters: Vec::new(),
        }
    }

    pub fn has_voted(&self, username: &str) -> bool {
        self.yes_voters.iter().any(|voter| voter == username)
            || self.no_voters.iter().any(|voter| voter == username)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
