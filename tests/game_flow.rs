//! End-to-end flows over the service layer with the in-memory store.

use std::sync::Arc;

use courtside_back::{
    auth::TokenRegistry,
    config::AppConfig,
    dao::memory::MemoryStore,
    dto::game::{
        CreateGameRequest, CreateTeamRequest, CreateUserRequest, RosterPlayerInput,
        ScoreUpdateRequest, TimeoutAction,
    },
    error::ServiceError,
    services::{game_service, ledger, stats, validation::ProposedEvent},
    state::{AppState, SharedState, lifecycle::GameStatus},
};

struct Fixture {
    state: SharedState,
    admin: i64,
    home_team: i64,
    away_team: i64,
    home_players: Vec<i64>,
    away_players: Vec<i64>,
    game: i64,
}

async fn new_user(state: &AppState, username: &str) -> i64 {
    game_service::create_user(
        state,
        CreateUserRequest {
            username: username.into(),
        },
    )
    .await
    .unwrap()
    .id
}

fn roster_input(user_id: i64) -> RosterPlayerInput {
    RosterPlayerInput {
        user_id,
        jersey_number: None,
        position: None,
        is_starter: true,
    }
}

async fn fixture() -> Fixture {
    let state: SharedState = Arc::new(AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(TokenRegistry::new()),
        AppConfig::default(),
    ));

    let admin = new_user(&state, "admin").await;
    let mut home_players = Vec::new();
    for name in ["hawk-1", "hawk-2"] {
        home_players.push(new_user(&state, name).await);
    }
    let mut away_players = Vec::new();
    for name in ["wolf-1", "wolf-2"] {
        away_players.push(new_user(&state, name).await);
    }

    let home_team = game_service::create_team(
        &state,
        admin,
        CreateTeamRequest {
            name: "Hawks".into(),
            city: None,
        },
    )
    .await
    .unwrap()
    .id;
    let away_team = game_service::create_team(
        &state,
        admin,
        CreateTeamRequest {
            name: "Wolves".into(),
            city: None,
        },
    )
    .await
    .unwrap()
    .id;

    let game = game_service::create_game(
        &state,
        admin,
        CreateGameRequest {
            title: "Season Opener".into(),
            location: Some("Main Court".into()),
            home_team_id: home_team,
            away_team_id: away_team,
            tournament_id: None,
            home_players: home_players.iter().copied().map(roster_input).collect(),
            away_players: away_players.iter().copied().map(roster_input).collect(),
        },
    )
    .await
    .unwrap()
    .id;

    Fixture {
        state,
        admin,
        home_team,
        away_team,
        home_players,
        away_players,
        game,
    }
}

fn shot(user_id: i64, team_id: i64, event_type: &str, outcome: &str) -> ProposedEvent {
    ProposedEvent {
        user_id: Some(user_id),
        team_id,
        event_type: event_type.into(),
        period: 1,
        timestamp: 60,
        outcome: Some(outcome.into()),
    }
}

fn foul(user_id: i64, team_id: i64) -> ProposedEvent {
    ProposedEvent {
        user_id: Some(user_id),
        team_id,
        event_type: "FLS".into(),
        period: 1,
        timestamp: 60,
        outcome: None,
    }
}

#[tokio::test]
async fn scheduled_games_reject_events() {
    let f = fixture().await;
    let err = ledger::append_event(
        &f.state,
        f.game,
        shot(f.home_players[0], f.home_team, "2PT", "made"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Rejected(_)));
}

#[tokio::test]
async fn starting_requires_players_on_both_teams() {
    let f = fixture().await;
    let empty = game_service::create_game(
        &f.state,
        f.admin,
        CreateGameRequest {
            title: "Forfeit".into(),
            location: None,
            home_team_id: f.home_team,
            away_team_id: f.away_team,
            tournament_id: None,
            home_players: vec![roster_input(f.home_players[0])],
            away_players: Vec::new(),
        },
    )
    .await
    .unwrap()
    .id;

    let err = game_service::start_game(&f.state, f.admin, empty)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn only_admins_control_the_lifecycle() {
    let f = fixture().await;
    let stranger = new_user(&f.state, "stranger").await;
    let err = game_service::start_game(&f.state, stranger, f.game)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn shots_accumulate_points_and_finalize_sets_the_score() {
    let f = fixture().await;
    game_service::start_game(&f.state, f.admin, f.game)
        .await
        .unwrap();

    let scorer = f.home_players[0];
    ledger::append_event(&f.state, f.game, shot(scorer, f.home_team, "2PT", "made"))
        .await
        .unwrap();
    ledger::append_event(&f.state, f.game, shot(scorer, f.home_team, "2PT", "miss"))
        .await
        .unwrap();
    ledger::append_event(&f.state, f.game, shot(scorer, f.home_team, "3PT", "made"))
        .await
        .unwrap();
    ledger::append_event(
        &f.state,
        f.game,
        shot(f.away_players[0], f.away_team, "FT", "made"),
    )
    .await
    .unwrap();

    let board = game_service::scoreboard(&f.state, f.game).await.unwrap();
    assert_eq!(board.home_team.points, 5);
    assert_eq!(board.away_team.points, 1);

    let line = stats::live_player_stats(&f.state, f.game, scorer)
        .await
        .unwrap();
    assert_eq!(line.points, 5);
    assert_eq!((line.fgm, line.fga), (2, 3));
    assert_eq!(line.fg_pct, 66.7);

    let game = game_service::finalize_game(&f.state, f.admin, f.game)
        .await
        .unwrap();
    assert_eq!(game.status, GameStatus::Completed);
    assert_eq!(game.home_score, 5);
    assert_eq!(game.away_score, 1);

    let snapshots = stats::player_game_stats(&f.state, scorer).await.unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].points, 5);
    assert_eq!(snapshots[0].shots_attempted, 3);
    assert_eq!(snapshots[0].shots_made, 2);

    // The free-throw scorer's field-goal buckets stay empty, so the career
    // shooting percentage is untouched by trips to the line.
    let ft_snapshots = stats::player_game_stats(&f.state, f.away_players[0])
        .await
        .unwrap();
    assert_eq!(ft_snapshots[0].points, 1);
    assert_eq!(ft_snapshots[0].free_throws_made, 1);
    assert_eq!(ft_snapshots[0].free_throws_attempted, 1);
    assert_eq!(ft_snapshots[0].shots_attempted, 0);
    let career = stats::career(&f.state, f.away_players[0]).await.unwrap();
    assert_eq!(career.career_shooting_percentage, 0.0);
}

#[tokio::test]
async fn seventh_foul_is_rejected() {
    let f = fixture().await;
    game_service::start_game(&f.state, f.admin, f.game)
        .await
        .unwrap();

    let offender = f.home_players[1];
    for _ in 0..6 {
        ledger::append_event(&f.state, f.game, foul(offender, f.home_team))
            .await
            .unwrap();
    }

    let err = ledger::append_event(&f.state, f.game, foul(offender, f.home_team))
        .await
        .unwrap_err();
    match err {
        ServiceError::Rejected(rejection) => {
            assert!(rejection.to_string().contains("disqualified"))
        }
        other => panic!("expected a rejection, got {other:?}"),
    }

    // Teammates are unaffected.
    ledger::append_event(&f.state, f.game, foul(f.home_players[0], f.home_team))
        .await
        .unwrap();
}

#[tokio::test]
async fn deleting_a_foul_reopens_the_allowance() {
    let f = fixture().await;
    game_service::start_game(&f.state, f.admin, f.game)
        .await
        .unwrap();

    let offender = f.home_players[0];
    let mut last_foul = 0;
    for _ in 0..6 {
        last_foul = ledger::append_event(&f.state, f.game, foul(offender, f.home_team))
            .await
            .unwrap()
            .id;
    }
    assert!(ledger::append_event(&f.state, f.game, foul(offender, f.home_team))
        .await
        .is_err());

    ledger::delete_event(&f.state, f.admin, f.game, last_foul)
        .await
        .unwrap();

    // Back to five fouls, so one more is admitted.
    ledger::append_event(&f.state, f.game, foul(offender, f.home_team))
        .await
        .unwrap();

    let events = ledger::list_events(&f.state, f.game).await.unwrap();
    assert_eq!(events.len(), 6);
}

#[tokio::test]
async fn deleting_events_requires_admin_rights() {
    let f = fixture().await;
    game_service::start_game(&f.state, f.admin, f.game)
        .await
        .unwrap();
    let event = ledger::append_event(&f.state, f.game, foul(f.home_players[0], f.home_team))
        .await
        .unwrap();

    let stranger = new_user(&f.state, "stranger").await;
    let err = ledger::delete_event(&f.state, stranger, f.game, event.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn timeout_hard_gates_score_updates() {
    let f = fixture().await;
    game_service::start_game(&f.state, f.admin, f.game)
        .await
        .unwrap();

    game_service::set_timeout(&f.state, f.admin, f.game, TimeoutAction::Start)
        .await
        .unwrap();
    let err = game_service::update_score(
        &f.state,
        f.admin,
        f.game,
        ScoreUpdateRequest {
            home_score: 10,
            away_score: 8,
        },
    )
    .await
    .unwrap_err();
    match err {
        ServiceError::InvalidState(message) => {
            assert!(message.contains("disabled during timeout"))
        }
        other => panic!("expected invalid state, got {other:?}"),
    }

    game_service::set_timeout(&f.state, f.admin, f.game, TimeoutAction::Revoke)
        .await
        .unwrap();
    let game = game_service::update_score(
        &f.state,
        f.admin,
        f.game,
        ScoreUpdateRequest {
            home_score: 10,
            away_score: 8,
        },
    )
    .await
    .unwrap();
    assert_eq!((game.home_score, game.away_score), (10, 8));
}

#[tokio::test]
async fn refinalizing_without_changes_reproduces_the_snapshots() {
    let f = fixture().await;
    game_service::start_game(&f.state, f.admin, f.game)
        .await
        .unwrap();

    let scorer = f.home_players[0];
    ledger::append_event(&f.state, f.game, shot(scorer, f.home_team, "2PT", "made"))
        .await
        .unwrap();
    ledger::append_event(&f.state, f.game, shot(scorer, f.home_team, "FT", "miss"))
        .await
        .unwrap();
    ledger::append_event(&f.state, f.game, foul(f.away_players[0], f.away_team))
        .await
        .unwrap();

    let first = game_service::finalize_game(&f.state, f.admin, f.game)
        .await
        .unwrap();
    let scorer_before = f
        .state
        .store()
        .find_player_game_stats(scorer, f.game)
        .await
        .unwrap()
        .unwrap();
    let offender_before = f
        .state
        .store()
        .find_player_game_stats(f.away_players[0], f.game)
        .await
        .unwrap()
        .unwrap();

    let second = game_service::finalize_game(&f.state, f.admin, f.game)
        .await
        .unwrap();
    assert_eq!(second.status, GameStatus::Completed);
    assert_eq!(second.home_score, first.home_score);
    assert_eq!(second.away_score, first.away_score);

    let scorer_after = f
        .state
        .store()
        .find_player_game_stats(scorer, f.game)
        .await
        .unwrap()
        .unwrap();
    let offender_after = f
        .state
        .store()
        .find_player_game_stats(f.away_players[0], f.game)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(scorer_after.totals, scorer_before.totals);
    assert_eq!(offender_after.totals, offender_before.totals);
}

#[tokio::test]
async fn refinalizing_folds_in_ledger_corrections() {
    let f = fixture().await;
    game_service::start_game(&f.state, f.admin, f.game)
        .await
        .unwrap();

    let scorer = f.home_players[0];
    ledger::append_event(&f.state, f.game, shot(scorer, f.home_team, "2PT", "made"))
        .await
        .unwrap();
    let stray = ledger::append_event(&f.state, f.game, shot(scorer, f.home_team, "3PT", "made"))
        .await
        .unwrap()
        .id;

    let first = game_service::finalize_game(&f.state, f.admin, f.game)
        .await
        .unwrap();
    assert_eq!(first.home_score, 5);

    // A post-hoc correction: the three never happened.
    f.state
        .store()
        .delete_event(f.game, stray)
        .await
        .unwrap();
    let second = game_service::finalize_game(&f.state, f.admin, f.game)
        .await
        .unwrap();
    assert_eq!(second.status, GameStatus::Completed);
    assert_eq!(second.home_score, 2);

    let career = stats::career(&f.state, scorer).await.unwrap();
    assert_eq!(career.total_points, 2);
    assert_eq!(career.total_games, 1);
}

#[tokio::test]
async fn career_with_no_attempts_reports_zero_percentages() {
    let f = fixture().await;
    let bench = new_user(&f.state, "bench").await;
    let career = stats::career(&f.state, bench).await.unwrap();
    assert_eq!(career.total_games, 0);
    assert_eq!(career.average_points_per_game, 0.0);
    assert_eq!(career.career_shooting_percentage, 0.0);
}

#[tokio::test]
async fn cancelled_games_are_terminal() {
    let f = fixture().await;
    game_service::cancel_game(&f.state, f.admin, f.game)
        .await
        .unwrap();

    let err = game_service::start_game(&f.state, f.admin, f.game)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));

    let err = ledger::append_event(
        &f.state,
        f.game,
        shot(f.home_players[0], f.home_team, "2PT", "made"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Rejected(_)));
}

#[tokio::test]
async fn listing_filters_by_lifecycle_status() {
    let f = fixture().await;
    game_service::start_game(&f.state, f.admin, f.game)
        .await
        .unwrap();

    let live = game_service::list_games(&f.state, Some(GameStatus::InProgress))
        .await
        .unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, f.game);

    let scheduled = game_service::list_games(&f.state, Some(GameStatus::Scheduled))
        .await
        .unwrap();
    assert!(scheduled.is_empty());
}
