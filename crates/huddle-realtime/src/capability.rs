use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use huddle_types::models::TeamView;

/// Operations a client may perform on a topic pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Subscribe,
    Publish,
    Presence,
    History,
}

/// Topic-pattern → permitted-operations map embedded in a token request.
pub type Capability = BTreeMap<String, Vec<Op>>;

/// Derive a user's capability map from their current team memberships.
///
/// Computed fresh on every token request and never cached, so realtime
/// permissions always reflect membership at the moment of (re)authorization:
/// the user's own notification topic is subscribe-only, each team's
/// top-level topic is subscribe-only, and the team's sub-topics carry the
/// full operation set.
pub fn derive(client_id: Uuid, teams: &[TeamView]) -> Capability {
    let mut capability = Capability::new();

    capability.insert(format!("{}:*", client_id), vec![Op::Subscribe]);

    for team in teams {
        capability.insert(format!("teams:{}", team.id), vec![Op::Subscribe]);
        capability.insert(
            format!("teams:{}:*", team.id),
            vec![Op::Subscribe, Op::Publish, Op::Presence, Op::History],
        );
    }

    capability
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: Uuid) -> TeamView {
        TeamView {
            id,
            name: "apollo".into(),
            members: vec![],
            admin: vec![],
            channels: vec![],
        }
    }

    #[test]
    fn own_topic_is_subscribe_only() {
        let user = Uuid::new_v4();
        let capability = derive(user, &[]);

        assert_eq!(capability.len(), 1);
        assert_eq!(
            capability.get(&format!("{}:*", user)),
            Some(&vec![Op::Subscribe])
        );
    }

    #[test]
    fn team_topics_follow_membership() {
        let user = Uuid::new_v4();
        let team_id = Uuid::new_v4();
        let capability = derive(user, &[team(team_id)]);

        assert_eq!(
            capability.get(&format!("teams:{}", team_id)),
            Some(&vec![Op::Subscribe])
        );
        assert_eq!(
            capability.get(&format!("teams:{}:*", team_id)),
            Some(&vec![Op::Subscribe, Op::Publish, Op::Presence, Op::History])
        );
    }

    #[test]
    fn capability_tracks_current_membership() {
        let user = Uuid::new_v4();
        let team_id = Uuid::new_v4();

        let before = derive(user, &[team(team_id)]);
        let after = derive(user, &[]);

        assert!(before.contains_key(&format!("teams:{}", team_id)));
        assert!(!after.contains_key(&format!("teams:{}", team_id)));
    }
}
