use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use connect_four_ai::ai::{Difficulty, Minimax, TieBreak};
use connect_four_ai::config::{AppConfig, TieBreakPolicy};
use connect_four_ai::game::{GameState, Outcome, Player};
use connect_four_ai::session::{GameMode, Session, SessionConfig};

/// Connect Four engine with a minimax computer opponent.
#[derive(Parser)]
#[command(name = "connect-four", about = "Connect Four engine with a minimax opponent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml", global = true)]
    config: PathBuf,

    /// Override the configured difficulty (easy, medium, hard)
    #[arg(long, global = true)]
    difficulty: Option<Difficulty>,

    /// Seed the random tie-break for reproducible play
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Print a configuration file with every default value and exit
    #[arg(long)]
    print_default_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a move list and print the AI's choice for the side to move
    Suggest {
        /// 0-based columns, Red first: either one digit per move ("3342") or
        /// separated by commas or spaces ("3,3,12,4") for boards wider than 10
        #[arg(long, default_value = "")]
        moves: String,
    },
    /// Play computer-vs-computer games through the session API
    Selfplay {
        #[arg(long, default_value_t = 10)]
        games: usize,
    },
}

#[derive(Serialize)]
struct Suggestion {
    to_move: Player,
    difficulty: Difficulty,
    column: Option<usize>,
    /// Heuristic score; absent when the search proved the result.
    score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    forced: Option<Forced>,
    nodes: u64,
    cutoffs: u64,
}

/// A proven result for the side to move, reported instead of an infinite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Forced {
    Win,
    Loss,
}

/// Split a search score into a finite value or a proven win/loss.
fn classify_score(score: f64) -> (Option<f64>, Option<Forced>) {
    if score == f64::INFINITY {
        (None, Some(Forced::Win))
    } else if score == f64::NEG_INFINITY {
        (None, Some(Forced::Loss))
    } else {
        (Some(score), None)
    }
}

#[derive(Debug, Default, Serialize)]
struct SelfplaySummary {
    games: usize,
    red_wins: usize,
    yellow_wins: usize,
    draws: usize,
    average_moves: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(difficulty) = cli.difficulty {
        config.game.difficulty = difficulty;
    }
    if let Some(seed) = cli.seed {
        config.search.tie_break = TieBreakPolicy::Random;
        config.search.seed = Some(seed);
    }
    config.validate().context("validating configuration")?;

    match cli.command {
        Some(Command::Suggest { moves }) => suggest(&config, &moves, cli.json),
        Some(Command::Selfplay { games }) => selfplay(&config, games, cli.json),
        None => bail!("no command given (try --help)"),
    }
}

/// Digit strings are one column per character; any comma or whitespace
/// switches to separated column numbers so columns 10 and above can be named.
fn parse_moves(moves: &str) -> Result<Vec<usize>> {
    let moves = moves.trim();
    if moves.contains(|c: char| c == ',' || c.is_whitespace()) {
        return moves
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<usize>()
                    .with_context(|| format!("invalid move '{token}' (expected a column number)"))
            })
            .collect();
    }
    moves
        .chars()
        .map(|c| {
            c.to_digit(10)
                .map(|d| d as usize)
                .with_context(|| format!("invalid move '{c}' (expected a column digit)"))
        })
        .collect()
}

fn suggest(config: &AppConfig, moves: &str, json: bool) -> Result<()> {
    let mut state = GameState::with_dimensions(config.game.rows, config.game.cols)?;
    for (ply, column) in parse_moves(moves)?.into_iter().enumerate() {
        state = state
            .apply_move(state.turn(), column)
            .with_context(|| format!("replaying move {} (column {column})", ply + 1))?;
    }
    if state.is_over() {
        bail!("position is already decided: {:?}", state.outcome());
    }

    let difficulty = config.game.difficulty;
    let mut tie_break = config.tie_breaker();
    let result =
        Minimax::new(state.turn()).best_move(state.board(), difficulty.depth(), &mut *tie_break);

    let (score, forced) = classify_score(result.score);
    let suggestion = Suggestion {
        to_move: state.turn(),
        difficulty,
        column: result.column,
        score,
        forced,
        nodes: result.stats.nodes,
        cutoffs: result.stats.cutoffs,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestion)?);
    } else {
        let verdict = match (suggestion.forced, suggestion.score) {
            (Some(Forced::Win), _) => "forced win".to_string(),
            (Some(Forced::Loss), _) => "forced loss".to_string(),
            (None, Some(score)) => format!("score {score}"),
            (None, None) => "no score".to_string(),
        };
        match suggestion.column {
            Some(column) => println!(
                "{} should play column {column} ({verdict}, {} nodes, {} cutoffs)",
                suggestion.to_move, suggestion.nodes, suggestion.cutoffs
            ),
            None => println!("{} has no move", suggestion.to_move),
        }
    }
    Ok(())
}

/// Red is driven by a second engine through the human seat; Yellow is the
/// session's own AI.
fn selfplay(config: &AppConfig, games: usize, json: bool) -> Result<()> {
    if games == 0 {
        bail!("--games must be at least 1");
    }

    let session_config = SessionConfig {
        mode: GameMode::OnePlayer,
        ..config.session_config()
    };
    let mut tie_break: Box<dyn TieBreak> = config.tie_breaker();
    let red = Minimax::new(Player::Red);
    let depth = config.game.difficulty.depth();

    let mut summary = SelfplaySummary {
        games,
        ..Default::default()
    };
    let mut total_moves = 0;

    for game in 1..=games {
        let mut session =
            Session::with_config(config.game.rows, config.game.cols, session_config.clone())
                .context("creating session")?;

        while !session.current_outcome().is_over() {
            session = if session.turn() == Player::Red {
                let result = red.best_move(session.board(), depth, &mut *tie_break);
                let column = match result.column {
                    Some(column) => column,
                    None => tie_break.choose(&session.valid_columns()),
                };
                session.apply_human_move(column)?
            } else {
                session.ai_take_turn(&mut *tie_break)?
            };
        }

        let moves = session.board().piece_count();
        total_moves += moves;
        match session.current_outcome() {
            Outcome::Win(Player::Red) => summary.red_wins += 1,
            Outcome::Win(Player::Yellow) => summary.yellow_wins += 1,
            Outcome::Draw => summary.draws += 1,
            Outcome::InProgress => unreachable!("loop exits only when the game is over"),
        }
        info!(game, outcome = ?session.current_outcome(), moves, "game finished");
    }
    summary.average_moves = total_moves as f64 / games as f64;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} games at {}: Red {} / Yellow {} / draws {} (avg {:.1} moves)",
            summary.games,
            config.game.difficulty,
            summary.red_wins,
            summary.yellow_wins,
            summary.draws,
            summary.average_moves
        );
    }
    Ok(())
}
