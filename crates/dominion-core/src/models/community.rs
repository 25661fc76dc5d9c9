use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timestamp;

/// A community grouping (by city, university, or general interest).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Community {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl Community {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// A chat message in a community channel. Transport for live chat is
/// WebSocket-based and out of scope; the client only reads the stored
/// history via REST.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub community_id: String,
    pub username: String,
    pub content: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
}

/// One row of the points leaderboard. Point computation is server-side;
/// the client renders the returned values verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub points: i64,
    #[serde(default)]
    pub university: String,
    #[serde(default)]
    pub city: String,
}

/// A time-boxed challenge (weekly/monthly) users can join.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Challenge {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub goal_type: String,
    pub goal_value: i64,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub rewards: Vec<String>,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaderboard_entry_parses_api_response() {
        let json = r#"{
            "rank": 1,
            "username": "arjun_warrior",
            "points": 2850,
            "university": "IIT Delhi",
            "city": "New Delhi"
        }"#;

        let entry: LeaderboardEntry = serde_json::from_str(json).expect("should parse");
        assert_eq!(entry.rank, 1);
        assert_eq!(entry.points, 2850);
    }

    #[test]
    fn test_community_kind_wire_name() {
        let json = r#"{
            "id": "c1",
            "name": "Delhi Calisthenics",
            "type": "city",
            "description": "Street workout crews in Delhi",
            "members": ["u1", "u2"]
        }"#;

        let community: Community = serde_json::from_str(json).expect("should parse");
        assert_eq!(community.kind, "city");
        assert_eq!(community.member_count(), 2);
    }

    #[test]
    fn test_message_parses_naive_timestamp() {
        let json = r#"{
            "id": "msg1",
            "user_id": "u9",
            "community_id": "c1",
            "username": "arjun_warrior",
            "content": "Lodhi Garden, 7am",
            "timestamp": "2026-07-30T18:04:00.951203"
        }"#;

        let message: Message = serde_json::from_str(json).expect("should parse");
        assert_eq!(message.username, "arjun_warrior");
    }
}
