use super::*;
use crate::frame::Outbound;
use crate::game::{Board, Coord, ErrorKind, Player};
use tokio::sync::mpsc;

fn game(rows: usize, cols: usize, players: usize) -> GameState {
    GameState::new(Board::new(rows, cols), players)
}

fn session() -> (Session, mpsc::Receiver<Outbound>) {
    let (tx, rx) = mpsc::channel(8);
    (Session::new("test-peer", tx), rx)
}

fn join(game: &mut GameState) -> (Session, mpsc::Receiver<Outbound>, Outcome) {
    let (mut session, rx) = session();
    let outcome = Controller.handle(game, &mut session, Inbound::Action(ClientAction::NewClient {}));
    (session, rx, outcome)
}

fn square(action: fn(SquareAction) -> ClientAction, x: i64, y: i64, player: u32) -> Inbound {
    Inbound::Action(action(SquareAction::new(Coord::new(x, y), Player::with_id(player))))
}

fn error_code(outcome: &Outcome) -> &str {
    match &outcome.reply {
        ServerMessage::Error { code: Some(code), .. } => code.as_str(),
        other => panic!("expected error reply, got {other:?}"),
    }
}

#[test]
fn new_client_replies_with_player() {
    let mut game = game(10, 10, 2);
    let (session, _rx, outcome) = join(&mut game);

    let ServerMessage::Success { player: Some(player), .. } = &outcome.reply else {
        panic!("expected success with player, got {:?}", outcome.reply);
    };
    assert_eq!(player.id, 0);
    assert_eq!(player.color, "red");
    assert_eq!(session.player(), Some(player));
    assert!(outcome.broadcasts.is_empty());
}

#[test]
fn last_expected_player_triggers_game_start() {
    let mut game = game(10, 10, 2);
    let (_a, _rx_a, first) = join(&mut game);
    let (_b, _rx_b, second) = join(&mut game);

    assert!(first.broadcasts.is_empty());
    assert_eq!(second.broadcasts, vec![Event::GameStart]);
}

#[test]
fn overshooting_player_count_does_not_restart_game() {
    let mut game = game(10, 10, 1);
    let (_a, _rx_a, first) = join(&mut game);
    let (_b, _rx_b, second) = join(&mut game);

    assert_eq!(first.broadcasts, vec![Event::GameStart]);
    assert!(second.reply.is_success());
    assert!(second.broadcasts.is_empty());
}

#[test]
fn claim_broadcasts_update_with_registered_color() {
    let mut game = game(10, 10, 2);
    let (mut s, _rx, _) = join(&mut game);

    let outcome = Controller.handle(&mut game, &mut s, square(ClientAction::ClaimSquare, 0, 0, 0));

    assert_eq!(outcome.reply, ServerMessage::success("Square successfully claimed"));
    let [Event::ClaimSquare(update)] = outcome.broadcasts.as_slice() else {
        panic!("expected one claim update, got {:?}", outcome.broadcasts);
    };
    assert_eq!(update.coord(), Coord::new(0, 0));
    assert_eq!(update.player.color, "red");
}

#[test]
fn second_claim_on_same_square_errors_without_broadcast() {
    let mut game = game(10, 10, 2);
    let (mut a, _rx_a, _) = join(&mut game);
    let (mut b, _rx_b, _) = join(&mut game);

    let first = Controller.handle(&mut game, &mut a, square(ClientAction::ClaimSquare, 0, 0, 0));
    assert!(first.reply.is_success());

    let second = Controller.handle(&mut game, &mut b, square(ClientAction::ClaimSquare, 0, 0, 1));
    assert_eq!(error_code(&second), "E_ALREADY_CLAIMED");
    assert!(second.broadcasts.is_empty());
    assert_eq!(game.board().square(Coord::new(0, 0)).unwrap().claimant().map(|p| p.id), Some(0));
}

#[test]
fn final_claim_broadcasts_game_end_with_scores() {
    let mut game = game(1, 3, 2);
    let (mut a, _rx_a, _) = join(&mut game);
    let (mut b, _rx_b, _) = join(&mut game);

    Controller.handle(&mut game, &mut a, square(ClientAction::ClaimSquare, 0, 0, 0));
    Controller.handle(&mut game, &mut b, square(ClientAction::ClaimSquare, 1, 0, 1));
    let last = Controller.handle(&mut game, &mut b, square(ClientAction::ClaimSquare, 2, 0, 1));

    assert_eq!(last.broadcasts.len(), 2);
    assert!(matches!(last.broadcasts[0], Event::ClaimSquare(_)));
    let Event::GameEnd { scores } = &last.broadcasts[1] else {
        panic!("expected game-end, got {:?}", last.broadcasts[1]);
    };
    let summary: Vec<(u32, usize)> = scores.iter().map(|(p, n)| (p.id, *n)).collect();
    assert_eq!(summary, vec![(1, 2), (0, 1)]);
}

#[test]
fn lock_and_unlock_broadcast_updates() {
    let mut game = game(10, 10, 2);
    let (mut s, _rx, _) = join(&mut game);

    let lock = Controller.handle(&mut game, &mut s, square(ClientAction::LockSquare, 5, 5, 0));
    assert_eq!(lock.reply, ServerMessage::success("Square successfully locked"));
    assert!(matches!(lock.broadcasts.as_slice(), [Event::LockSquare(_)]));

    let unlock = Controller.handle(&mut game, &mut s, square(ClientAction::UnlockSquare, 5, 5, 0));
    assert_eq!(unlock.reply, ServerMessage::success("Square successfully unlocked"));
    assert!(matches!(unlock.broadcasts.as_slice(), [Event::UnlockSquare(_)]));
}

#[test]
fn lock_conflicts_are_errors() {
    let mut game = game(10, 10, 2);
    let (mut a, _rx_a, _) = join(&mut game);
    let (mut b, _rx_b, _) = join(&mut game);

    Controller.handle(&mut game, &mut a, square(ClientAction::LockSquare, 1, 1, 0));

    let steal = Controller.handle(&mut game, &mut b, square(ClientAction::LockSquare, 1, 1, 1));
    assert_eq!(error_code(&steal), "E_LOCKED");
    assert!(steal.broadcasts.is_empty());

    let release = Controller.handle(&mut game, &mut b, square(ClientAction::UnlockSquare, 1, 1, 1));
    assert_eq!(error_code(&release), "E_NOT_LOCK_HOLDER");

    let claim = Controller.handle(&mut game, &mut b, square(ClientAction::ClaimSquare, 1, 1, 1));
    assert_eq!(error_code(&claim), "E_LOCKED");
}

#[test]
fn out_of_bounds_is_an_error() {
    let mut game = game(10, 10, 1);
    let (mut s, _rx, _) = join(&mut game);

    let outcome = Controller.handle(&mut game, &mut s, square(ClientAction::ClaimSquare, 10, 0, 0));
    assert_eq!(error_code(&outcome), "E_OUT_OF_BOUNDS");
    assert!(outcome.broadcasts.is_empty());
}

#[test]
fn unknown_player_is_an_error() {
    let mut game = game(10, 10, 1);
    let (mut s, _rx) = session();

    let outcome = Controller.handle(&mut game, &mut s, square(ClientAction::LockSquare, 0, 0, 4));
    assert_eq!(error_code(&outcome), "E_UNKNOWN_PLAYER");
    assert!(game.board().square(Coord::new(0, 0)).unwrap().locked_by().is_none());
}

#[test]
fn invalid_action_is_an_error() {
    let mut game = game(10, 10, 1);
    let (mut s, _rx) = session();

    let outcome = Controller.handle(&mut game, &mut s, Inbound::Invalid("unknown variant `dance`".into()));
    assert_eq!(error_code(&outcome), "E_INVALID_ACTION");
    assert!(outcome.broadcasts.is_empty());
    assert_eq!(game.player_count(), 0);
    assert_eq!(GameError::InvalidAction(String::new()).kind(), ErrorKind::InvalidAction);
}

#[test]
fn double_new_client_is_an_error() {
    let mut game = game(10, 10, 2);
    let (mut s, _rx, _) = join(&mut game);

    let again = Controller.handle(&mut game, &mut s, Inbound::Action(ClientAction::NewClient {}));
    assert_eq!(error_code(&again), "E_ALREADY_REGISTERED");
    assert_eq!(game.player_count(), 1);
}
