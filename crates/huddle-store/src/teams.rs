use anyhow::Result;
use uuid::Uuid;

use huddle_types::models::{Channel, Identity, Team, TeamView};

use crate::{Store, Tables};

impl Tables {
    /// Populate member ids with usernames for API responses.
    fn view(&self, team: &Team) -> TeamView {
        let members = team
            .members
            .iter()
            .map(|id| match self.users.get(id) {
                Some(user) => user.identity(),
                None => Identity {
                    id: *id,
                    username: "unknown".to_string(),
                },
            })
            .collect();

        TeamView {
            id: team.id,
            name: team.name.clone(),
            members,
            admin: team.admin.clone(),
            channels: team.channels.clone(),
        }
    }
}

impl Store {
    /// Create a team with the creator as sole member and admin, plus the
    /// default "general" channel. When no name is given, a short one is
    /// derived from the team id.
    pub fn create_team(&self, creator: Uuid, name: Option<String>) -> Result<TeamView> {
        let id = Uuid::new_v4();
        let name = name.unwrap_or_else(|| format!("team-{}", &id.simple().to_string()[..8]));

        let team = Team {
            id,
            name,
            members: vec![creator],
            admin: vec![creator],
            channels: vec![Channel {
                id: Uuid::new_v4(),
                name: "general".to_string(),
            }],
        };

        self.with_write(|tables| {
            let view = tables.view(&team);
            tables.teams.insert(team.id, team);
            Ok(view)
        })
    }

    /// All teams the user belongs to, members populated.
    pub fn teams_for(&self, user_id: Uuid) -> Result<Vec<TeamView>> {
        self.with_read(|tables| {
            Ok(tables
                .teams
                .values()
                .filter(|team| team.is_member(user_id))
                .map(|team| tables.view(team))
                .collect())
        })
    }

    pub fn team_by_id(&self, team_id: Uuid) -> Result<Option<Team>> {
        self.with_read(|tables| Ok(tables.teams.get(&team_id).cloned()))
    }

    /// Membership-scoped lookup: a team the user does not belong to is
    /// indistinguishable from one that does not exist.
    pub fn team_view_for(&self, user_id: Uuid, team_id: Uuid) -> Result<Option<TeamView>> {
        self.with_read(|tables| {
            Ok(tables
                .teams
                .get(&team_id)
                .filter(|team| team.is_member(user_id))
                .map(|team| tables.view(team)))
        })
    }

    /// Returns true if the team existed.
    pub fn delete_team(&self, team_id: Uuid) -> Result<bool> {
        self.with_write(|tables| Ok(tables.teams.remove(&team_id).is_some()))
    }

    /// Add users to a team. Ids that do not exist in the users table or are
    /// already members are silently filtered out (idempotent add). Returns
    /// the updated team and the ids that were actually added.
    pub fn add_members(
        &self,
        team_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<Option<(TeamView, Vec<Uuid>)>> {
        self.with_write(|tables| {
            let users = &tables.users;
            let Some(team) = tables.teams.get_mut(&team_id) else {
                return Ok(None);
            };

            let added: Vec<Uuid> = user_ids
                .iter()
                .filter(|id| users.contains_key(id) && !team.members.contains(id))
                .copied()
                .collect();
            team.members.extend(&added);

            let team = team.clone();
            Ok(Some((tables.view(&team), added)))
        })
    }

    /// Remove a member from a team. Also drops the id from the admin list
    /// so admins stay a subset of members.
    pub fn remove_member(&self, team_id: Uuid, member_id: Uuid) -> Result<Option<TeamView>> {
        self.with_write(|tables| {
            let Some(team) = tables.teams.get_mut(&team_id) else {
                return Ok(None);
            };

            team.members.retain(|id| *id != member_id);
            team.admin.retain(|id| *id != member_id);

            let team = team.clone();
            Ok(Some(tables.view(&team)))
        })
    }

    pub fn add_channel(&self, team_id: Uuid, name: &str) -> Result<Option<TeamView>> {
        self.with_write(|tables| {
            let Some(team) = tables.teams.get_mut(&team_id) else {
                return Ok(None);
            };

            team.channels.push(Channel {
                id: Uuid::new_v4(),
                name: name.to_string(),
            });

            let team = team.clone();
            Ok(Some(tables.view(&team)))
        })
    }

    /// Remove a channel. An unknown channel id is a silent no-op.
    pub fn remove_channel(&self, team_id: Uuid, channel_id: Uuid) -> Result<Option<TeamView>> {
        self.with_write(|tables| {
            let Some(team) = tables.teams.get_mut(&team_id) else {
                return Ok(None);
            };

            team.channels.retain(|channel| channel.id != channel_id);

            let team = team.clone();
            Ok(Some(tables.view(&team)))
        })
    }
}
