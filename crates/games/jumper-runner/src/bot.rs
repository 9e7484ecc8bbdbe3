use jumper_core::input::{InputAction, InputSnapshot};

use crate::CyberRunner;
use crate::obstacles::{Obstacle, ObstacleKind};

/// How many ticks of scrolling ahead of the player count as "close enough to
/// jump". Tuned so a full jump arc clears a barrel or a floor beam.
const JUMP_LOOK_AHEAD_TICKS: f32 = 14.0;

/// Generate the autopilot input for the current tick.
///
/// Always runs. Jumps from the ground when the nearest obstacle still ahead
/// is a ground hazard inside the look-ahead window. A ceiling beam as the
/// nearest obstacle suppresses the jump.
pub fn generate_bot_input(game: &CyberRunner) -> InputSnapshot {
    let mut input = InputSnapshot::from_actions(&[InputAction::MoveRight]);

    let player = game.player();
    if !player.is_grounded() {
        return input;
    }
    let body = player.bounds();
    let Some(next) = nearest_ahead(game.obstacles().obstacles(), body.left()) else {
        return input;
    };
    if next.kind == ObstacleKind::CeilingBeam {
        return input;
    }

    let gap = next.bounds.left() - body.right();
    if gap <= game.game_speed() * JUMP_LOOK_AHEAD_TICKS {
        input.press(InputAction::Jump);
    }
    input
}

/// The closest obstacle the player has not yet fully passed.
fn nearest_ahead(obstacles: &[Obstacle], player_left: f32) -> Option<&Obstacle> {
    obstacles
        .iter()
        .filter(|o| o.bounds.right() > player_left)
        .min_by(|a, b| a.bounds.left().total_cmp(&b.bounds.left()))
}
