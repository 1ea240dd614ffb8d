//! Team selection shared by the operations that create issues.

use super::{MirrorError, MirrorResult};
use crate::mirror::{
    domain::{Team, TeamId},
    ports::IssueTracker,
};
use tracing::info;

/// Picks the preferred team, or the first listed team when none is set.
///
/// # Errors
///
/// Returns [`MirrorError::NoTeams`] when the tracker lists no teams,
/// [`MirrorError::UnknownTeam`] when the preferred team is missing, or
/// [`MirrorError::Remote`] when the listing fails.
pub async fn select_team<T>(tracker: &T, preferred: Option<&TeamId>) -> MirrorResult<Team>
where
    T: IssueTracker + ?Sized,
{
    let teams = tracker.list_teams().await?;
    let team = match preferred {
        Some(id) => teams
            .into_iter()
            .find(|team| team.id() == id)
            .ok_or_else(|| MirrorError::UnknownTeam(id.clone()))?,
        None => teams.into_iter().next().ok_or(MirrorError::NoTeams)?,
    };
    info!(team = team.name(), team_id = %team.id(), "using issue tracker team");
    Ok(team)
}
