//! Table Pong headless host
//!
//! Drives the simulation at a fixed frame rate with a scripted pointer that
//! shadows the ball, logs match events and prints the final state as JSON.
//!
//! Usage: `table-pong [tuning.json] [seconds] [seed]`

use table_pong::Tuning;
use table_pong::sim::{GameEvent, GameState, TickInput, tick};

/// Host frame time (60 Hz)
const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 120.0;
const DEFAULT_SEED: u64 = 0x7ab1e;

/// Pointer that tracks the ball the way a human hand roughly would
fn scripted_pointer(state: &GameState) -> TickInput {
    let t = &state.tuning;
    let x = state.ball.pos.x / t.pointer_x_scale;
    let y = (state.ball.pos.y - t.pointer_y_offset) / t.pointer_y_scale;
    TickInput::pointer(x, y)
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) if path != "-" => Tuning::load(&path),
        _ => Tuning::default(),
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SECONDS);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);

    log::info!("Table Pong (headless) starting: {seconds}s, seed {seed}");

    let mut state = GameState::new(seed, tuning);
    let frames = (seconds / FRAME_DT).ceil() as u64;
    let mut hits = 0u32;
    let mut matches = 0u32;

    for _ in 0..frames {
        let input = scripted_pointer(&state);
        tick(&mut state, &input, FRAME_DT);

        for event in &state.events {
            match event {
                GameEvent::PaddleHit { .. } => hits += 1,
                GameEvent::MatchOver { .. } => matches += 1,
                _ => {}
            }
        }
        if state.match_just_ended() {
            let banner = state.match_state.banner().unwrap_or("Match over");
            println!(
                "{banner} ({} - {})",
                state.match_state.player_score, state.match_state.ai_score
            );
        }
    }

    println!(
        "Simulated {:.1}s: {matches} match(es) finished, {hits} paddle hits, score now {} - {}",
        state.clock, state.match_state.player_score, state.match_state.ai_score
    );
    match serde_json::to_string_pretty(&state) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Cannot serialize final state: {e}"),
    }
}
