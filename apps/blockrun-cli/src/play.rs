//! Interactive runner in the terminal.
//!
//! Space or Up jumps, Left/Right steer, `r` restarts after game over, `q` or
//! Esc quits. Frames are paced by a fixed-step clock; the simulation stops
//! being ticked once the run is over.

use crate::session::RunnerSession;
use anyhow::Result;
use blockrun_common::{GameConfig, PerspectiveCamera, WindowSize};
use blockrun_render::{AsciiRenderer, render_frame, stitch_panes};
use blockrun_runner::{FixedStep, TickInput};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::Print,
    terminal::{self, ClearType},
};
use std::io::{Stdout, Write, stdout};
use std::time::{Duration, Instant};

const FRAME_BUDGET: Duration = Duration::from_millis(16);
const HUD_ROWS: u16 = 2;

/// Restores the terminal even when the game loop bails out with an error.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(out: &mut Stdout) -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub fn run(config: &GameConfig, mut session: RunnerSession) -> Result<()> {
    let mut out = stdout();
    let guard = TerminalGuard::enter(&mut out)?;

    let runner_cfg = &config.runner;
    let mut renderer = AsciiRenderer::new(
        (-runner_cfg.lane_half_width - 0.5, runner_cfg.lane_half_width + 0.5),
        (runner_cfg.spawn_depth, runner_cfg.despawn_depth),
    );
    let mut camera = PerspectiveCamera::default();
    let mut clock = FixedStep::new(config.display.tick_hz, config.display.max_steps_per_frame);
    let mut last = Instant::now();
    let mut pending = TickInput::idle();

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    drop(guard);
                    println!("{}", session.state().summary());
                    return Ok(());
                }
                KeyCode::Char(' ') | KeyCode::Up => pending.jump = true,
                KeyCode::Left => pending.steer = -1.0,
                KeyCode::Right => pending.steer = 1.0,
                KeyCode::Char('r') if session.state().is_game_over() => session.restart(),
                _ => {}
            }
        }

        let now = Instant::now();
        let steps = clock.advance(now.duration_since(last).as_secs_f64());
        last = now;
        for _ in 0..steps {
            if session.state().is_game_over() {
                break;
            }
            session.step(pending);
            pending = TickInput::idle();
        }

        let (cols, rows) = terminal::size()?;
        let window = WindowSize::new(u32::from(cols), u32::from(rows.saturating_sub(HUD_ROWS)));
        let panes = render_frame(
            &mut renderer,
            session.scene().scene(),
            &mut camera,
            config.display.view_mode,
            window,
        );
        draw(&mut out, &stitch_panes(&panes, ""), &session)?;

        if let Some(rest) = FRAME_BUDGET.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}

fn draw(out: &mut Stdout, lines: &[String], session: &RunnerSession) -> Result<()> {
    let state = session.state();
    queue!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    queue!(
        out,
        Print(format!(
            "Score: {}  High: {}  Health: {}",
            state.score(),
            state.high_score(),
            state.health()
        ))
    )?;
    if state.is_game_over() {
        queue!(
            out,
            cursor::MoveTo(0, 1),
            Print("Game Over!  r = restart, q = quit")
        )?;
    }
    for (i, line) in lines.iter().enumerate() {
        queue!(out, cursor::MoveTo(0, HUD_ROWS + i as u16), Print(line))?;
    }
    out.flush()?;
    Ok(())
}
