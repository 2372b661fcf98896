//! Participant model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::team::Team;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub year: Option<String>,
    pub course: Option<String>,
    pub event_id: i64,
    /// Null for individual events
    pub team_id: Option<i64>,
    pub is_leader: bool,
    pub is_paid: bool,
    /// Per-head fee copied from the event at registration time.
    /// Later fee edits do not change the amount owed.
    pub registration_fee: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submitted details for one person on a registration form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub year: Option<String>,
    pub course: Option<String>,
}

/// Participant with their team loaded, when they belong to one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantWithTeam {
    pub participant: Participant,
    pub team: Option<Team>,
}

impl ParticipantWithTeam {
    /// Amount still owed by this payer: the team total for team members,
    /// the participant's own snapshot otherwise.
    pub fn amount_owed(&self) -> i64 {
        match &self.team {
            Some(team) => team.registration_fee,
            None => self.participant.registration_fee,
        }
    }

    /// Paid state of this payer. Team payment is all-or-nothing, so team
    /// members report the team's flag, never their own.
    pub fn is_paid(&self) -> bool {
        match &self.team {
            Some(team) => team.is_paid,
            None => self.participant.is_paid,
        }
    }
}

/// Per-user answer for "am I registered and paid up?"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationStatus {
    pub is_registered: bool,
    pub is_paid: bool,
    pub is_team_leader: bool,
    pub participant: Option<Participant>,
    pub team: Option<Team>,
}

impl RegistrationStatus {
    pub fn not_registered() -> Self {
        Self {
            is_registered: false,
            is_paid: false,
            is_team_leader: false,
            participant: None,
            team: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn participant(fee: i64, paid: bool) -> Participant {
        Participant {
            id: 1,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+911234567890".to_string(),
            year: None,
            course: None,
            event_id: 7,
            team_id: None,
            is_leader: true,
            is_paid: paid,
            registration_fee: fee,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn team(fee: i64, paid: bool) -> Team {
        Team {
            id: 3,
            name: "Night Owls".to_string(),
            description: None,
            event_id: 7,
            leader_email: "asha@example.com".to_string(),
            registration_fee: fee,
            is_paid: paid,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_individual_owes_own_snapshot() {
        let p = ParticipantWithTeam {
            participant: participant(500, false),
            team: None,
        };
        assert_eq!(p.amount_owed(), 500);
        assert!(!p.is_paid());
    }

    #[test]
    fn test_team_member_owes_team_total_and_reports_team_flag() {
        let mut member = participant(100, true);
        member.team_id = Some(3);
        let p = ParticipantWithTeam {
            participant: member,
            team: Some(team(300, false)),
        };
        // the member's own flag is irrelevant for team events
        assert_eq!(p.amount_owed(), 300);
        assert!(!p.is_paid());
    }
}
