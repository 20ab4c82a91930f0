use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_claimboard_env() {
    unsafe {
        std::env::remove_var("CLAIMBOARD_HOST");
        std::env::remove_var("CLAIMBOARD_PORT");
        std::env::remove_var("CLAIMBOARD_PLAYERS");
        std::env::remove_var("CLAIMBOARD_ROWS");
        std::env::remove_var("CLAIMBOARD_COLS");
    }
}

#[test]
fn defaults_match_reference_deployment() {
    unsafe { clear_claimboard_env() };

    let cfg = Config::try_parse_from(["claimboard"]).unwrap();
    assert_eq!(cfg.host, DEFAULT_HOST);
    assert_eq!(cfg.port, 3710);
    assert_eq!(cfg.players, DEFAULT_PLAYERS);
    assert_eq!((cfg.rows, cfg.cols), (10, 10));
    assert_eq!(cfg.bind_addr(), "0.0.0.0:3710");
}

#[test]
fn flags_override_defaults() {
    unsafe { clear_claimboard_env() };

    let cfg = Config::try_parse_from([
        "claimboard",
        "--host",
        "127.0.0.1",
        "-p",
        "4000",
        "--players",
        "4",
        "--rows",
        "3",
        "--cols",
        "7",
    ])
    .unwrap();
    assert_eq!(cfg.bind_addr(), "127.0.0.1:4000");
    assert_eq!(cfg.players, 4);
    assert_eq!((cfg.rows, cfg.cols), (3, 7));
}

#[test]
fn player_count_is_capped_by_palette() {
    assert_eq!(parse_player_count("5"), Ok(5));
    assert!(parse_player_count("0").is_err());
    assert!(parse_player_count("6").is_err());
    assert!(parse_player_count("many").is_err());
}

#[test]
fn board_size_must_be_positive_and_bounded() {
    assert_eq!(parse_board_size(" 10 "), Ok(10));
    assert!(parse_board_size("0").is_err());
    assert!(parse_board_size("101").is_err());
    assert!(Config::try_parse_from(["claimboard", "--rows", "0"]).is_err());
}
