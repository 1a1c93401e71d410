/// Vote domain types
use crate::error::Top100Error;
use crate::types::{PlaylistId, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Voter key recorded for anonymous votes that carry no visitor id
pub const ANONYMOUS_VOTER: &str = "anonymous";

const USER_PREFIX: &str = "user:";
const VISITOR_PREFIX: &str = "visitor:";

/// A visitor's opinion on one track of a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Agree,
    Disagree,
}

impl VoteValue {
    /// Convert vote to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Agree => "agree",
            VoteValue::Disagree => "disagree",
        }
    }
}

impl FromStr for VoteValue {
    type Err = Top100Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agree" => Ok(VoteValue::Agree),
            "disagree" => Ok(VoteValue::Disagree),
            other => Err(Top100Error::invalid_input(format!(
                "Unknown vote value: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who cast a vote
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Voter {
    /// Signed-in user
    User(UserId),
    /// Anonymous visitor with a stable per-browser id
    Visitor(String),
    /// Anonymous visitor without an id; all such votes share one key
    Anonymous,
}

impl Voter {
    /// Key used for the (playlist, track, voter) uniqueness constraint
    pub fn key(&self) -> String {
        match self {
            Voter::User(id) => format!("{}{}", USER_PREFIX, id),
            Voter::Visitor(id) => format!("{}{}", VISITOR_PREFIX, id),
            Voter::Anonymous => ANONYMOUS_VOTER.to_string(),
        }
    }

    /// Parse a stored voter key
    pub fn from_key(key: &str) -> Option<Self> {
        if key == ANONYMOUS_VOTER {
            return Some(Voter::Anonymous);
        }
        if let Some(id) = key.strip_prefix(USER_PREFIX) {
            return Some(Voter::User(UserId::new(id)));
        }
        key.strip_prefix(VISITOR_PREFIX)
            .map(|id| Voter::Visitor(id.to_string()))
    }

    /// Authenticated user behind this vote, if any
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Voter::User(id) => Some(id),
            _ => None,
        }
    }
}

/// Stored vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub playlist_id: PlaylistId,
    pub track_id: TrackId,
    pub voter: Voter,
    pub value: VoteValue,
    pub updated_at: DateTime<Utc>,
}

/// Data for recording a vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastVote {
    pub playlist_id: PlaylistId,
    pub track_id: TrackId,
    pub voter: Voter,
    pub value: VoteValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_value_string_conversion() {
        assert_eq!(VoteValue::Agree.as_str(), "agree");
        assert_eq!(VoteValue::Disagree.as_str(), "disagree");

        assert_eq!("agree".parse::<VoteValue>().unwrap(), VoteValue::Agree);
        assert_eq!("disagree".parse::<VoteValue>().unwrap(), VoteValue::Disagree);
        assert!("meh".parse::<VoteValue>().is_err());
    }

    #[test]
    fn voter_keys_parse_back() {
        let voters = [
            Voter::User(UserId::new("alice")),
            Voter::Visitor("9b2f".to_string()),
            Voter::Anonymous,
        ];

        for voter in voters {
            assert_eq!(Voter::from_key(&voter.key()), Some(voter.clone()));
        }
        assert_eq!(Voter::from_key("garbage"), None);
    }

    #[test]
    fn only_users_have_a_user_id() {
        assert_eq!(
            Voter::User(UserId::new("alice")).user_id(),
            Some(&UserId::new("alice"))
        );
        assert_eq!(Voter::Anonymous.user_id(), None);
    }
}
