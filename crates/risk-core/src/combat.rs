//! Dice combat between two adjacent territories.
//!
//! This module contains:
//! - Dice allocation for both sides
//! - Pure roll resolution (which side loses how many troops)
//! - A full attack that rolls, applies losses and moves in on conquest

use crate::board::Board;
use crate::config::ConquestFallback;
use crate::game::GameError;
use crate::player::PlayerId;
use crate::territory::Territory;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Dice thrown by each side, sorted highest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRolls {
    pub attacker: Vec<u8>,
    pub defender: Vec<u8>,
}

/// Troops lost by each side in one resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Losses {
    pub attacker: u32,
    pub defender: u32,
}

/// Everything that happened in one attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub rolls: DiceRolls,
    pub losses: Losses,
    pub conquered: bool,
    /// Troops that moved into the conquered territory (0 if not conquered)
    pub troops_moved: u32,
    pub previous_owner: PlayerId,
}

/// Dice the attacker throws from a territory holding `troops`
pub fn attack_dice(troops: u32) -> usize {
    match troops {
        0..=2 => 1,
        3 => 2,
        _ => 3,
    }
}

/// Dice the defender throws from a territory holding `troops`
pub fn defense_dice(troops: u32) -> usize {
    if troops > 1 {
        2
    } else {
        1
    }
}

/// Roll `n` six-sided dice, sorted highest first
pub fn roll_dice<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<u8> {
    let mut rolls: Vec<u8> = (0..n).map(|_| rng.gen_range(1..=6)).collect();
    rolls.sort_unstable_by(|a, b| b.cmp(a));
    rolls
}

/// Compare dice pairwise, highest against highest.
///
/// Before each comparison the attacker must still have more than one troop.
/// The defender wins ties. Resolution stops as soon as the defender is
/// wiped out.
pub fn resolve_rolls(
    attacker_rolls: &[u8],
    defender_rolls: &[u8],
    attacker_troops: u32,
    defender_troops: u32,
) -> Losses {
    let mut attacker: Vec<u8> = attacker_rolls.to_vec();
    let mut defender: Vec<u8> = defender_rolls.to_vec();
    attacker.sort_unstable_by(|a, b| b.cmp(a));
    defender.sort_unstable_by(|a, b| b.cmp(a));

    let mut losses = Losses::default();
    let mut att_left = attacker_troops;
    let mut def_left = defender_troops;

    for (a, d) in attacker.iter().zip(defender.iter()) {
        if att_left <= 1 || def_left == 0 {
            break;
        }
        if a > d {
            def_left -= 1;
            losses.defender += 1;
        } else {
            att_left -= 1;
            losses.attacker += 1;
        }
    }

    losses
}

/// Check that `player` may attack `to` from `from`
pub fn validate_attack(
    board: &Board,
    player: PlayerId,
    from: Territory,
    to: Territory,
) -> Result<(), GameError> {
    if !board.is_owned_by(from, player) {
        return Err(GameError::IllegalDecision(format!(
            "player {} does not own {}",
            player, from
        )));
    }
    if !board.is_adjacent(from, to) {
        return Err(GameError::IllegalDecision(format!(
            "{} does not border {}",
            from, to
        )));
    }
    match board.owner(to) {
        Some(owner) if owner != player => {}
        _ => {
            return Err(GameError::IllegalDecision(format!(
                "{} is not held by an opponent",
                to
            )))
        }
    }
    if board.troops(from) <= 1 {
        return Err(GameError::IllegalDecision(format!(
            "{} has too few troops to attack",
            from
        )));
    }
    Ok(())
}

/// Roll one attack of `to` from `from` and apply the result to the board.
///
/// The caller must have checked the attack with [`validate_attack`].
/// On conquest every troop but one moves in, except that with more than
/// `fallback.threshold` movable troops one extra troop may stay behind.
pub fn resolve_attack<R: Rng + ?Sized>(
    board: &mut Board,
    from: Territory,
    to: Territory,
    rng: &mut R,
    fallback: &ConquestFallback,
) -> AttackOutcome {
    let attacker_troops = board.troops(from);
    let defender_troops = board.troops(to);
    let (Some(attacker), Some(defender)) = (board.owner(from), board.owner(to)) else {
        panic!("attack between {} and {} involves unclaimed territory", from, to);
    };
    assert_ne!(attacker, defender, "{} cannot attack its own territory", from);
    assert!(attacker_troops > 1, "{} has too few troops to attack", from);

    let rolls = DiceRolls {
        attacker: roll_dice(attack_dice(attacker_troops), rng),
        defender: roll_dice(defense_dice(defender_troops), rng),
    };
    let losses = resolve_rolls(&rolls.attacker, &rolls.defender, attacker_troops, defender_troops);

    trace!(
        ?from,
        ?to,
        attacker_rolls = ?rolls.attacker,
        defender_rolls = ?rolls.defender,
        ?losses,
        "Dice resolved"
    );

    let attacker_left = attacker_troops - losses.attacker;
    let defender_left = defender_troops - losses.defender;

    if defender_left > 0 {
        board.set_territory(from, Some(attacker), attacker_left);
        board.set_territory(to, Some(defender), defender_left);
        return AttackOutcome {
            rolls,
            losses,
            conquered: false,
            troops_moved: 0,
            previous_owner: defender,
        };
    }

    // At least one troop always moves in
    let mut troops_moved = attacker_left - 1;
    if troops_moved > fallback.threshold.max(1)
        && rng.gen_bool(fallback.probability.clamp(0.0, 1.0))
    {
        troops_moved -= 1;
    }

    board.set_territory(from, Some(attacker), attacker_left - troops_moved);
    board.set_territory(to, Some(attacker), troops_moved);

    AttackOutcome {
        rolls,
        losses,
        conquered: true,
        troops_moved,
        previous_owner: defender,
    }
}
