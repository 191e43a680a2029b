//! Quarry command-line player
//!
//! Builds a game tree from moves given on the command line and prints the
//! resulting board:
//!
//! ```text
//! quarry [--game go|othello|amazons] [--size N] [MOVE...]
//! ```
//!
//! Set `RUST_LOG=quarry=debug` to trace history and cursor changes.

use quarry::{Board, EngineConfig, Game, GameTree};
use tracing::{info, warn};

struct Args {
    game: Game,
    size: u8,
    moves: Vec<String>,
}

fn parse_args() -> quarry::Result<Args> {
    let mut args = Args { game: Game::Go, size: 0, moves: Vec::new() };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--game" => {
                if let Some(name) = iter.next() {
                    args.game = name.parse()?;
                }
            }
            "--size" => match iter.next().map(|size| size.parse::<u8>()) {
                Some(Ok(size)) => args.size = size,
                _ => warn!("--size expects a number, using the default"),
            },
            _ => args.moves.push(arg),
        }
    }

    if args.size == 0 {
        args.size = match args.game {
            Game::Go => 19,
            Game::Othello => 8,
            Game::Amazons => 10,
        };
    }
    Ok(args)
}

fn main() -> quarry::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quarry=info".into()),
        )
        .init();

    let args = parse_args()?;
    let config = EngineConfig::from_env()?;
    if !Game::is_valid_size(args.size, args.size) {
        warn!(size = args.size, "unsupported board size");
        return Ok(());
    }

    let mut tree = GameTree::new_with_root(args.game, args.size, args.size, true);
    tree.add_undo_history();
    tree.enter_tree(Board::with_config(args.game, args.size, args.size, &config));
    info!(game = %args.game, size = args.size, validation = %config.validation, "new game");

    for text in &args.moves {
        let Some(board) = tree.board() else { break };
        let Some(color) = tree.board_state().color_to_play() else {
            warn!("the game is over");
            break;
        };

        let mv = board.parse_move(text)?;
        if !board.is_legal_move(color, &mv) {
            warn!(%text, ?color, "illegal move skipped");
            continue;
        }
        tree.append_variation(color, mv);
    }

    if let Some(board) = tree.board() {
        println!("{}", board.dump());
        if let Some(color) = tree.board_state().color_to_play() {
            println!("{} to play", color.name());
        }
    }
    info!(
        nodes = tree.count_nodes(),
        depth = tree.current_node_depth(),
        can_undo = tree.can_undo(),
        "done"
    );
    Ok(())
}
