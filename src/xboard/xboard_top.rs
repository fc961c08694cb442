//! XBoard (CECP v2) front-end and command loop.
//!
//! Tracks whose turn it is and whether the engine plays a side, translates
//! move text to and from the generic move shape, and asks the engine for a
//! reply when it is on move.

use std::io::{self, BufRead, Write};

use tracing::{debug, info, warn};

use crate::engines::crazyhouse_engine::CrazyhouseEngine;
use crate::engines::engine_trait::{Engine, GoParams};
use crate::game_state::chess_types::Color;
use crate::utils::long_algebraic::{generic_move_to_string, parse_generic_move, RESIGN};

pub const ENGINE_NAME: &str = "zh_chess";

pub fn run_stdio_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut xboard = XboardState::new(CrazyhouseEngine::default());

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = xboard.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

fn features_line() -> String {
    format!(
        "feature done=0 sigint=0 sigterm=0 san=0 reuse=0 usermove=1 analyze=0 ping=0 \
         setboard=0 level=0 variants=\"crazyhouse\" myname=\"{ENGINE_NAME}\" done=1"
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Before the first `new`.
    Idle,
    /// After `new`, no move seen yet. The first move decides the engine's side.
    NewGame,
    Playing,
    /// Record moves for both sides without replying.
    Force,
}

pub struct XboardState<E: Engine> {
    engine: E,
    mode: Mode,
    side_to_move: Color,
    engine_side: Option<Color>,
    /// `st` in milliseconds.
    fixed_move_time_ms: Option<u64>,
    /// `sd`.
    depth_limit: Option<u32>,
    /// Last `time` report, converted to milliseconds.
    time_left_ms: Option<u64>,
}

impl<E: Engine> XboardState<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            mode: Mode::Idle,
            side_to_move: Color::Light,
            engine_side: None,
            fixed_move_time_ms: None,
            depth_limit: None,
            time_left_ms: None,
        }
    }

    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Handle one input line. Returns `true` when the loop should exit.
    pub fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();
        let arg = parts.next();

        match cmd {
            "xboard" => writeln!(out)?,
            "protover" => {
                if arg != Some("2") {
                    warn!(version = ?arg, "unexpected protocol version");
                }
                writeln!(out, "{}", features_line())?;
            }
            "accepted" | "rejected" | "random" | "post" | "nopost" | "hard" | "easy" | "computer"
            | "otim" | "level" => {
                debug!(line = trimmed, "ignored");
            }
            "new" => self.new_game(),
            "variant" => {
                if arg != Some("crazyhouse") {
                    writeln!(out, "Error (unsupported variant): {}", arg.unwrap_or_default())?;
                }
            }
            "force" => self.mode = Mode::Force,
            "go" => {
                self.mode = Mode::Playing;
                if self.engine_side.is_none() {
                    self.engine_side = Some(self.side_to_move);
                }
                self.reply(out)?;
            }
            "usermove" => match arg {
                Some(text) => self.incoming_move(text, out)?,
                None => writeln!(out, "Error (missing move): usermove")?,
            },
            "sd" => match arg.and_then(|x| x.parse::<u32>().ok()) {
                Some(depth) => self.depth_limit = Some(depth),
                None => writeln!(out, "Error (bad depth): {trimmed}")?,
            },
            "st" => match arg.and_then(|x| x.parse::<u64>().ok()) {
                Some(seconds) => self.fixed_move_time_ms = Some(seconds.saturating_mul(1000)),
                None => writeln!(out, "Error (bad time): {trimmed}")?,
            },
            "time" => {
                // Centiseconds.
                self.time_left_ms = arg
                    .and_then(|x| x.parse::<u64>().ok())
                    .map(|cs| cs.saturating_mul(10));
            }
            "option" => self.handle_option(arg, out)?,
            "result" => {
                info!(result = trimmed, "game over");
                self.mode = Mode::Force;
            }
            "quit" => return Ok(true),
            _ => {
                // Bare move text is accepted as a courtesy to older controllers.
                if parse_generic_move(cmd).is_ok() && cmd != RESIGN {
                    self.incoming_move(cmd, out)?;
                } else {
                    warn!(command = trimmed, "unknown command");
                    writeln!(out, "Error (unknown command): {cmd}")?;
                }
            }
        }

        Ok(false)
    }

    fn new_game(&mut self) {
        self.engine.new_game();
        self.mode = Mode::NewGame;
        self.side_to_move = Color::Light;
        self.engine_side = None;
        self.depth_limit = None;
        self.time_left_ms = None;
    }

    fn handle_option(&mut self, arg: Option<&str>, out: &mut impl Write) -> io::Result<()> {
        let Some((name, value)) = arg.and_then(|assignment| assignment.split_once('=')) else {
            return writeln!(out, "Error (bad option): {}", arg.unwrap_or_default());
        };
        if let Err(err) = self.engine.set_option(name, value) {
            warn!(%err, "option rejected");
            writeln!(out, "Error ({err}): option")?;
        }
        Ok(())
    }

    fn incoming_move(&mut self, text: &str, out: &mut impl Write) -> io::Result<()> {
        if self.mode == Mode::Idle {
            warn!(mv = text, "move received before new");
            return Ok(());
        }

        let recorded = parse_generic_move(text)
            .map_err(|err| err.to_string())
            .and_then(|mv| {
                self.engine
                    .record_move(mv, self.side_to_move)
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = recorded {
            warn!(mv = text, %err, "could not record move");
            return writeln!(out, "Illegal move: {text}");
        }
        self.side_to_move = self.side_to_move.opposite();

        match self.mode {
            Mode::NewGame => {
                self.mode = Mode::Playing;
                self.engine_side = Some(self.side_to_move);
                self.reply(out)
            }
            Mode::Playing if self.engine_side == Some(self.side_to_move) => self.reply(out),
            _ => Ok(()),
        }
    }

    fn go_params(&self) -> GoParams {
        GoParams {
            move_time_ms: self.fixed_move_time_ms,
            time_left_ms: self.time_left_ms,
            max_depth: self.depth_limit,
        }
    }

    fn reply(&mut self, out: &mut impl Write) -> io::Result<()> {
        let params = self.go_params();
        let mv = self.engine.do_move(self.side_to_move, &params);

        if mv.is_resign() {
            writeln!(out, "{RESIGN}")?;
            self.mode = Mode::Force;
            return Ok(());
        }

        writeln!(out, "move {}", generic_move_to_string(mv))?;
        self.side_to_move = self.side_to_move.opposite();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Mode, XboardState};
    use crate::engines::crazyhouse_engine::CrazyhouseEngine;
    use crate::engines::engine_config::EngineConfig;
    use crate::engines::engine_trait::Engine;
    use crate::game_state::chess_types::*;

    fn state() -> XboardState<CrazyhouseEngine> {
        let config = EngineConfig {
            forced_search: false,
            tt_buckets: 1 << 10,
            ..EngineConfig::default()
        };
        XboardState::new(CrazyhouseEngine::new(config))
    }

    fn run(state: &mut XboardState<CrazyhouseEngine>, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            state.handle_command(line, &mut out).expect("write to vec");
        }
        String::from_utf8(out).expect("utf8 output")
    }

    #[test]
    fn handshake_advertises_crazyhouse() {
        let mut xboard = state();
        let out = run(&mut xboard, &["xboard", "protover 2"]);
        assert!(out.contains("variants=\"crazyhouse\""));
        assert!(out.contains("usermove=1"));
        assert!(out.trim_end().ends_with("done=1"));
    }

    #[test]
    fn first_user_move_makes_engine_play_dark() {
        let mut xboard = state();
        let out = run(&mut xboard, &["new", "variant crazyhouse", "sd 2", "st 5", "usermove e2e4"]);
        assert!(out.starts_with("move "), "unexpected output: {out}");
        assert_eq!(xboard.engine_side, Some(Color::Dark));
        assert_eq!(xboard.side_to_move, Color::Light);
        assert_eq!(xboard.engine().game_state().side_to_move, Color::Light);
    }

    #[test]
    fn force_mode_records_both_sides_silently() {
        let mut xboard = state();
        let out = run(&mut xboard, &["new", "force", "usermove e2e4", "usermove d7d5", "usermove e4d5"]);
        assert!(out.is_empty());
        assert_eq!(xboard.side_to_move, Color::Dark);
        assert_eq!(
            xboard.engine().game_state().reserve_count(Color::Light, PieceKind::Pawn),
            1
        );
    }

    #[test]
    fn go_in_force_mode_plays_for_side_to_move() {
        let mut xboard = state();
        let out = run(&mut xboard, &["new", "force", "usermove e2e4", "sd 2", "st 5", "go"]);
        assert!(out.starts_with("move "));
        assert_eq!(xboard.engine_side, Some(Color::Dark));
        assert_eq!(xboard.mode, Mode::Playing);
    }

    #[test]
    fn bad_input_is_reported() {
        let mut xboard = state();
        let out = run(&mut xboard, &["new", "force", "usermove e2e9", "frobnicate"]);
        assert!(out.contains("Illegal move: e2e9"));
        assert!(out.contains("Error (unknown command): frobnicate"));
        assert_eq!(xboard.side_to_move, Color::Light);
    }

    #[test]
    fn time_and_option_commands_update_settings() {
        let mut xboard = state();
        let out = run(&mut xboard, &["new", "time 1234", "option MaxDepth=6", "option Nope=1"]);
        assert_eq!(xboard.time_left_ms, Some(12_340));
        assert_eq!(xboard.engine().config().max_depth, 6);
        assert!(out.contains("Error"));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut xboard = state();
        let mut out = Vec::new();
        assert!(xboard.handle_command("quit", &mut out).expect("write"));
    }
}
