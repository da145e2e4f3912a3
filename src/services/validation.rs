//! Validation gate every proposed ledger event passes through.

use thiserror::Error;

use crate::{
    dao::models::{EventRecord, EventType, GameRecord, Outcome, RosterEntry},
    state::lifecycle::GameStatus,
};

/// Rejection of a proposed event, carrying the human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct EventRejection(pub String);

impl EventRejection {
    fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// A candidate event exactly as the client proposed it.
///
/// `event_type` and `outcome` are raw strings so the gate, not the
/// deserializer, decides how unknown spellings are reported.
#[derive(Debug, Clone)]
pub struct ProposedEvent {
    /// Acting player, if stated.
    pub user_id: Option<i64>,
    /// Team the event is attributed to.
    pub team_id: i64,
    /// Raw event type spelling.
    pub event_type: String,
    /// Period of play.
    pub period: u8,
    /// Seconds elapsed on the game clock.
    pub timestamp: i64,
    /// Raw shot outcome spelling.
    pub outcome: Option<String>,
}

/// Maximum period number; 5 is overtime.
const MAX_PERIOD: u8 = 5;
/// A player with this many fouls is disqualified from further events.
const FOUL_LIMIT: u32 = 6;

/// Run the full admission check for a proposed event.
///
/// Checks run in a fixed order so clients see the most fundamental failure
/// first: game liveness, period bounds, team membership, actor requirements,
/// foul disqualification, then vocabulary. Returns the classified type on
/// success.
pub fn validate_event(
    game: &GameRecord,
    roster: &[RosterEntry],
    events: &[EventRecord],
    proposed: &ProposedEvent,
) -> Result<EventType, EventRejection> {
    if game.status != GameStatus::InProgress {
        return Err(EventRejection::new(format!(
            "game is {}, events can only be recorded while in progress",
            game.status
        )));
    }

    if proposed.period < 1 || proposed.period > MAX_PERIOD {
        return Err(EventRejection::new(format!(
            "period must be between 1 and {MAX_PERIOD}, got {}",
            proposed.period
        )));
    }

    if proposed.team_id != game.home_team_id && proposed.team_id != game.away_team_id {
        return Err(EventRejection::new(format!(
            "team {} is not playing in this game",
            proposed.team_id
        )));
    }

    let parsed = EventType::from_wire(&proposed.event_type);

    if let Some(event_type) = parsed
        && event_type.requires_actor()
    {
        let Some(user_id) = proposed.user_id else {
            return Err(EventRejection::new(format!(
                "event type {} requires a player",
                proposed.event_type
            )));
        };
        let Some(entry) = roster.iter().find(|entry| entry.user_id == user_id) else {
            return Err(EventRejection::new(format!(
                "player {user_id} is not on this game's roster"
            )));
        };
        if entry.team_id != proposed.team_id {
            return Err(EventRejection::new(format!(
                "player {user_id} does not play for team {}",
                proposed.team_id
            )));
        }
    }

    if let Some(event_type) = parsed
        && event_type.is_foul()
        && let Some(user_id) = proposed.user_id
    {
        let fouls = events
            .iter()
            .filter(|event| event.user_id == Some(user_id) && event.event_type.is_foul())
            .count() as u32;
        if fouls >= FOUL_LIMIT {
            return Err(EventRejection::new(format!(
                "player {user_id} has {fouls} fouls and is disqualified"
            )));
        }
    }

    let event_type = parsed.ok_or_else(|| {
        EventRejection::new(format!("unknown event type: {}", proposed.event_type))
    })?;

    validate_shot_outcome(event_type, proposed.outcome.as_deref())?;

    Ok(event_type)
}

/// Check that shot events carry a valid outcome and others carry none that
/// would be misread. Non-shot outcomes are ignored rather than rejected.
pub fn validate_shot_outcome(
    event_type: EventType,
    outcome: Option<&str>,
) -> Result<Option<Outcome>, EventRejection> {
    if !event_type.is_shot() {
        return Ok(None);
    }
    let Some(raw) = outcome else {
        return Err(EventRejection::new(format!(
            "shot event {} requires an outcome of made or miss",
            event_type.as_wire()
        )));
    };
    Outcome::from_wire(raw).map(Some).ok_or_else(|| {
        EventRejection::new(format!("invalid shot outcome: {raw}, expected made or miss"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn game(status: GameStatus) -> GameRecord {
        let now = OffsetDateTime::now_utc();
        GameRecord {
            id: 1,
            title: "Test".into(),
            location: None,
            home_team_id: 10,
            away_team_id: 20,
            home_score: 0,
            away_score: 0,
            status,
            timeout_active: false,
            timeout_started_at: None,
            created_by: 1,
            tournament_id: None,
            started_at: None,
            ended_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn roster() -> Vec<RosterEntry> {
        vec![
            RosterEntry {
                game_id: 1,
                user_id: 100,
                team_id: 10,
                jersey_number: Some(23),
                position: None,
                is_starter: true,
            },
            RosterEntry {
                game_id: 1,
                user_id: 200,
                team_id: 20,
                jersey_number: Some(7),
                position: None,
                is_starter: true,
            },
        ]
    }

    fn proposed(event_type: &str) -> ProposedEvent {
        ProposedEvent {
            user_id: Some(100),
            team_id: 10,
            event_type: event_type.into(),
            period: 1,
            timestamp: 30,
            outcome: None,
        }
    }

    fn foul_events(user_id: i64, count: usize) -> Vec<EventRecord> {
        (0..count)
            .map(|i| EventRecord {
                id: i as i64 + 1,
                game_id: 1,
                user_id: Some(user_id),
                team_id: 10,
                event_type: EventType::Foul,
                period: 1,
                timestamp: i as i64 * 10,
                outcome: None,
                created_at: OffsetDateTime::now_utc(),
            })
            .collect()
    }

    #[test]
    fn rejects_events_outside_live_play() {
        for status in [
            GameStatus::Scheduled,
            GameStatus::Completed,
            GameStatus::Cancelled,
        ] {
            let err = validate_event(&game(status), &roster(), &[], &proposed("AST")).unwrap_err();
            assert!(err.0.contains("in progress"), "{err}");
        }
    }

    #[test]
    fn rejects_out_of_range_periods() {
        for period in [0u8, 6] {
            let mut event = proposed("AST");
            event.period = period;
            let err =
                validate_event(&game(GameStatus::InProgress), &roster(), &[], &event).unwrap_err();
            assert!(err.0.contains("period"), "{err}");
        }
        // Period 5 is overtime and admitted.
        let mut overtime = proposed("AST");
        overtime.period = 5;
        validate_event(&game(GameStatus::InProgress), &roster(), &[], &overtime).unwrap();
    }

    #[test]
    fn rejects_foreign_teams() {
        let mut event = proposed("AST");
        event.team_id = 99;
        let err =
            validate_event(&game(GameStatus::InProgress), &roster(), &[], &event).unwrap_err();
        assert!(err.0.contains("not playing"), "{err}");
    }

    #[test]
    fn actor_events_need_a_rostered_player_on_the_stated_team() {
        let live = game(GameStatus::InProgress);

        let mut missing = proposed("REB");
        missing.user_id = None;
        assert!(validate_event(&live, &roster(), &[], &missing)
            .unwrap_err()
            .0
            .contains("requires a player"));

        let mut stranger = proposed("REB");
        stranger.user_id = Some(555);
        assert!(validate_event(&live, &roster(), &[], &stranger)
            .unwrap_err()
            .0
            .contains("roster"));

        let mut wrong_team = proposed("REB");
        wrong_team.user_id = Some(200);
        assert!(validate_event(&live, &roster(), &[], &wrong_team)
            .unwrap_err()
            .0
            .contains("does not play for"));
    }

    #[test]
    fn team_events_need_no_actor() {
        let live = game(GameStatus::InProgress);
        let mut timeout = proposed("TO");
        timeout.user_id = None;
        assert_eq!(
            validate_event(&live, &roster(), &[], &timeout).unwrap(),
            EventType::Timeout
        );
    }

    #[test]
    fn sixth_foul_disqualifies() {
        let live = game(GameStatus::InProgress);
        let five = foul_events(100, 5);
        assert_eq!(
            validate_event(&live, &roster(), &five, &proposed("FLS")).unwrap(),
            EventType::Foul
        );

        let six = foul_events(100, 6);
        let err = validate_event(&live, &roster(), &six, &proposed("FOUL_PUSHING")).unwrap_err();
        assert!(err.0.contains("disqualified"), "{err}");

        // A different player is unaffected.
        let mut other = proposed("FLS");
        other.user_id = Some(200);
        other.team_id = 20;
        validate_event(&live, &roster(), &six, &other).unwrap();
    }

    #[test]
    fn unknown_vocabulary_is_rejected_last() {
        let err = validate_event(
            &game(GameStatus::InProgress),
            &roster(),
            &[],
            &proposed("DUNK"),
        )
        .unwrap_err();
        assert!(err.0.contains("unknown event type"), "{err}");
    }

    #[test]
    fn shots_require_a_made_or_miss_outcome() {
        let live = game(GameStatus::InProgress);

        let bare = proposed("2PT");
        assert!(validate_event(&live, &roster(), &[], &bare)
            .unwrap_err()
            .0
            .contains("outcome"));

        let mut junk = proposed("3PT");
        junk.outcome = Some("swish".into());
        assert!(validate_event(&live, &roster(), &[], &junk)
            .unwrap_err()
            .0
            .contains("invalid shot outcome"));

        let mut made = proposed("FT");
        made.outcome = Some("made".into());
        assert_eq!(
            validate_event(&live, &roster(), &[], &made).unwrap(),
            EventType::FreeThrow
        );
    }

    #[test]
    fn non_shot_outcome_is_ignored() {
        assert_eq!(
            validate_shot_outcome(EventType::Assist, Some("made")).unwrap(),
            None
        );
        assert_eq!(
            validate_shot_outcome(EventType::TwoPoint, Some("miss")).unwrap(),
            Some(Outcome::Miss)
        );
    }
}
