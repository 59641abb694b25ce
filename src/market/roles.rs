//! Selection-to-outcome role resolution
//!
//! A 1X2 market carries exactly three selections. The mapping onto
//! {Home, Draw, Away} is established once per match: team names parsed
//! from the event name are matched against selection names and the
//! unmatched selection is Draw, with Betfair sort priority as a fallback
//! when names are inconclusive. The result is always a complete
//! bijective mapping or an explicit failure, never a partial mapping.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feed::RunnerDefinition;

/// Betfair runner (selection) identifier
pub type SelectionId = u64;

/// Market resolution errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// The market does not resolve to a three-way outcome mapping
    #[error("market does not resolve to a three-way outcome mapping: {0}")]
    MalformedMarket(String),
}

/// One of the three outcomes of a 1X2 market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeRole {
    Home,
    Draw,
    Away,
}

impl OutcomeRole {
    /// All roles in priority order (Home > Draw > Away)
    pub const ALL: [OutcomeRole; 3] = [OutcomeRole::Home, OutcomeRole::Draw, OutcomeRole::Away];

    /// Stable index of this role, following priority order
    pub fn index(self) -> usize {
        match self {
            OutcomeRole::Home => 0,
            OutcomeRole::Draw => 1,
            OutcomeRole::Away => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeRole::Home => "home",
            OutcomeRole::Draw => "draw",
            OutcomeRole::Away => "away",
        }
    }
}

impl std::fmt::Display for OutcomeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Home and away team names parsed from the event name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teams {
    pub home: String,
    pub away: String,
}

impl Teams {
    /// Parse from a Betfair event name, typically `"Home v Away"`
    pub fn from_event_name(event_name: &str) -> Option<Self> {
        let (home, away) = event_name.split_once(" v ")?;
        let home = home.trim();
        let away = away.trim();
        if home.is_empty() || away.is_empty() {
            return None;
        }
        Some(Self {
            home: home.to_string(),
            away: away.to_string(),
        })
    }
}

/// Bijective mapping from the market's three selections onto outcome roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMapping {
    home: SelectionId,
    draw: SelectionId,
    away: SelectionId,
}

impl RoleMapping {
    /// Create a mapping from three distinct selection ids
    pub fn new(
        home: SelectionId,
        draw: SelectionId,
        away: SelectionId,
    ) -> Result<Self, MarketError> {
        if home == draw || home == away || draw == away {
            return Err(MarketError::MalformedMarket(format!(
                "duplicate selection ids in mapping: {home}, {draw}, {away}"
            )));
        }
        Ok(Self { home, draw, away })
    }

    /// Role of a selection id, if it belongs to this market
    pub fn role_of(&self, id: SelectionId) -> Option<OutcomeRole> {
        if id == self.home {
            Some(OutcomeRole::Home)
        } else if id == self.draw {
            Some(OutcomeRole::Draw)
        } else if id == self.away {
            Some(OutcomeRole::Away)
        } else {
            None
        }
    }

    /// Selection id carrying the given role
    pub fn selection(&self, role: OutcomeRole) -> SelectionId {
        match role {
            OutcomeRole::Home => self.home,
            OutcomeRole::Draw => self.draw,
            OutcomeRole::Away => self.away,
        }
    }

    /// Resolve the mapping for a market's runner definitions.
    ///
    /// Primary rule: the selections named after the home and away teams
    /// take those roles and the remaining selection is Draw. Fallback when
    /// names are inconclusive: Betfair sort priority (1=Home, 2=Draw,
    /// 3=Away), valid only when all three priorities are present and
    /// distinct.
    pub fn resolve(
        teams: Option<&Teams>,
        runners: &[RunnerDefinition],
    ) -> Result<Self, MarketError> {
        if runners.len() != 3 {
            return Err(MarketError::MalformedMarket(format!(
                "expected 3 selections, found {}",
                runners.len()
            )));
        }

        if let Some(teams) = teams {
            if let Some(mapping) = Self::resolve_by_names(teams, runners) {
                return Ok(mapping);
            }
        }

        Self::resolve_by_priority(runners).ok_or_else(|| {
            MarketError::MalformedMarket(
                "selection names match neither team and sort priorities are ambiguous".to_string(),
            )
        })
    }

    fn resolve_by_names(teams: &Teams, runners: &[RunnerDefinition]) -> Option<Self> {
        let named = |team: &str| {
            let mut found = None;
            for runner in runners {
                let Some(name) = runner.name.as_deref() else {
                    continue;
                };
                if name.trim().eq_ignore_ascii_case(team) {
                    if found.is_some() {
                        // ambiguous: two selections share the team name
                        return None;
                    }
                    found = Some(runner.id);
                }
            }
            found
        };

        let home = named(&teams.home)?;
        let away = named(&teams.away)?;
        let draw = runners
            .iter()
            .map(|r| r.id)
            .find(|id| *id != home && *id != away)?;
        Self::new(home, draw, away).ok()
    }

    fn resolve_by_priority(runners: &[RunnerDefinition]) -> Option<Self> {
        let mut ordered: Vec<(u32, SelectionId)> = runners
            .iter()
            .map(|r| r.sort_priority.map(|p| (p, r.id)))
            .collect::<Option<Vec<_>>>()?;
        ordered.sort();
        if ordered[0].0 == ordered[1].0 || ordered[1].0 == ordered[2].0 {
            return None;
        }
        Self::new(ordered[0].1, ordered[1].1, ordered[2].1).ok()
    }
}
