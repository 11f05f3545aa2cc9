//! Room configuration: capacity and the match policies a deployment can
//! choose between.

use serde::{Deserialize, Serialize};

/// Number of participant slots in a room.
pub const ROOM_CAPACITY: usize = 2;

/// What happens to a running match when a participant disconnects.
///
/// Either way the room drops back to `Unready`; the policy only decides
/// how the abandoned match is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectPolicy {
    /// The participant who stayed wins. The final board and winner are
    /// broadcast before the room resets to the lobby.
    #[default]
    Forfeit,
    /// The match is left as it was, with no result recorded.
    Abandon,
}

/// Who may reset a live match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Any participant.
    #[default]
    Anyone,
    /// Only the room owner.
    OwnerOnly,
}

/// Configuration applied to every room a registry creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomConfig {
    pub disconnect_policy: DisconnectPolicy,
    pub reset_policy: ResetPolicy,
}

impl std::str::FromStr for DisconnectPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forfeit" => Ok(Self::Forfeit),
            "abandon" => Ok(Self::Abandon),
            other => Err(format!("unknown disconnect policy: {other}")),
        }
    }
}

impl std::str::FromStr for ResetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anyone" => Ok(Self::Anyone),
            "owner" | "owner_only" => Ok(Self::OwnerOnly),
            other => Err(format!("unknown reset policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.disconnect_policy, DisconnectPolicy::Forfeit);
        assert_eq!(config.reset_policy, ResetPolicy::Anyone);
    }

    #[test]
    fn test_policies_parse_from_env_strings() {
        assert_eq!("forfeit".parse(), Ok(DisconnectPolicy::Forfeit));
        assert_eq!(" Abandon ".parse(), Ok(DisconnectPolicy::Abandon));
        assert!("kick".parse::<DisconnectPolicy>().is_err());
        assert_eq!("owner".parse(), Ok(ResetPolicy::OwnerOnly));
        assert_eq!("anyone".parse(), Ok(ResetPolicy::Anyone));
    }
}
