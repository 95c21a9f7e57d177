//! Same-owner reachability and the fortify move built on it.

use crate::board::Board;
use crate::game::GameError;
use crate::player::PlayerId;
use crate::territory::{Territory, TERRITORY_COUNT};
use std::ops::RangeInclusive;

/// Every territory reachable from `origin` through territory held by `owner`,
/// including `origin` itself, in territory order.
pub fn reachable_same_owner(board: &Board, origin: Territory, owner: PlayerId) -> Vec<Territory> {
    let mut visited = [false; TERRITORY_COUNT];
    let mut stack = vec![origin];
    visited[origin.index()] = true;

    while let Some(current) = stack.pop() {
        for &next in current.neighbors() {
            if !visited[next.index()] && board.is_owned_by(next, owner) {
                visited[next.index()] = true;
                stack.push(next);
            }
        }
    }

    Territory::ALL
        .into_iter()
        .filter(|t| visited[t.index()])
        .collect()
}

/// Territories that may receive troops from `origin`
pub fn fortify_destinations(board: &Board, origin: Territory) -> Vec<Territory> {
    let Some(owner) = board.owner(origin) else {
        return Vec::new();
    };
    reachable_same_owner(board, origin, owner)
        .into_iter()
        .filter(|t| *t != origin)
        .collect()
}

/// Frontier destinations when there are any, otherwise every destination
pub fn preferred_destinations(board: &Board, origin: Territory) -> Vec<Territory> {
    let destinations = fortify_destinations(board, origin);
    let frontier: Vec<Territory> = destinations
        .iter()
        .copied()
        .filter(|t| !board.is_interior(*t))
        .collect();

    if frontier.is_empty() {
        destinations
    } else {
        frontier
    }
}

/// How many troops may leave `origin`.
///
/// An interior origin has no use for its troops, so it must send all
/// but one or two of them.
pub fn fortify_amount_range(board: &Board, origin: Territory) -> Option<RangeInclusive<u32>> {
    let troops = board.troops(origin);
    if troops <= 1 {
        return None;
    }
    let max = troops - 1;
    let min = if board.is_interior(origin) {
        troops.saturating_sub(2).max(1)
    } else {
        1
    };
    Some(min..=max)
}

/// Owned territories that can send troops somewhere
pub fn fortify_origins(board: &Board, player: PlayerId) -> Vec<Territory> {
    board
        .territories_of(player)
        .into_iter()
        .filter(|t| board.troops(*t) > 1 && !fortify_destinations(board, *t).is_empty())
        .collect()
}

/// Move `amount` troops from `origin` to a connected `destination`
pub fn fortify(
    board: &mut Board,
    origin: Territory,
    destination: Territory,
    amount: u32,
) -> Result<(), GameError> {
    if !fortify_destinations(board, origin).contains(&destination) {
        return Err(GameError::IllegalDecision(format!(
            "no owned path from {} to {}",
            origin, destination
        )));
    }

    match fortify_amount_range(board, origin) {
        Some(range) if range.contains(&amount) => {}
        _ => {
            return Err(GameError::IllegalDecision(format!(
                "cannot move {} troops out of {}",
                amount, origin
            )))
        }
    }

    board.remove_troops(origin, amount);
    board.add_troops(destination, amount);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::territory::{Continent, Territory as T};
    use pretty_assertions::assert_eq;

    /// Player 1 holds Peru, Brazil and Venezuela, plus all of Australia as
    /// a second disconnected cluster.
    fn two_clusters() -> Board {
        let mut board = Board::new();
        board.set_territory(T::Peru, Some(1), 4);
        board.set_territory(T::Brazil, Some(1), 2);
        board.set_territory(T::Venezuela, Some(1), 1);
        board.set_territory(T::Argentina, Some(2), 3);
        board.set_territory(T::CentralAmerica, Some(2), 1);
        board.set_territory(T::NorthAfrica, Some(2), 1);
        for t in Continent::Australia.territories() {
            board.set_territory(*t, Some(1), 2);
        }
        board.set_territory(T::Siam, Some(2), 1);
        board
    }

    #[test]
    fn test_reachability_respects_clusters() {
        let board = two_clusters();
        assert_eq!(
            reachable_same_owner(&board, T::Peru, 1),
            vec![T::Brazil, T::Peru, T::Venezuela]
        );
        assert_eq!(
            fortify_destinations(&board, T::Indonesia),
            vec![T::EasternAustralia, T::NewGuinea, T::WesternAustralia]
        );
        assert!(!fortify_destinations(&board, T::Peru).contains(&T::Indonesia));
    }

    #[test]
    fn test_preferred_destinations_favor_frontier() {
        let board = two_clusters();
        // only Indonesia borders a foreign territory in Australia
        assert_eq!(preferred_destinations(&board, T::NewGuinea), vec![T::Indonesia]);
        // every other territory in the South American cluster is frontier
        assert_eq!(
            preferred_destinations(&board, T::Peru),
            vec![T::Brazil, T::Venezuela]
        );
    }

    #[test]
    fn test_amount_range() {
        let mut board = two_clusters();
        assert_eq!(fortify_amount_range(&board, T::Peru), Some(1..=3));
        assert_eq!(fortify_amount_range(&board, T::Venezuela), None);

        board.set_territory(T::EasternAustralia, Some(1), 6);
        assert!(board.is_interior(T::EasternAustralia));
        assert_eq!(fortify_amount_range(&board, T::EasternAustralia), Some(4..=5));

        board.set_territory(T::EasternAustralia, Some(1), 2);
        assert_eq!(fortify_amount_range(&board, T::EasternAustralia), Some(1..=1));
    }

    #[test]
    fn test_fortify_moves_troops() {
        let mut board = two_clusters();
        fortify(&mut board, T::Peru, T::Venezuela, 3).unwrap();
        assert_eq!(board.troops(T::Peru), 1);
        assert_eq!(board.troops(T::Venezuela), 4);
    }

    #[test]
    fn test_fortify_rejects_illegal_moves() {
        let mut board = two_clusters();
        assert!(fortify(&mut board, T::Peru, T::Indonesia, 1).is_err());
        assert!(fortify(&mut board, T::Peru, T::Brazil, 4).is_err());
        assert!(fortify(&mut board, T::Peru, T::Brazil, 0).is_err());
        assert!(fortify(&mut board, T::Peru, T::Argentina, 1).is_err());
        assert_eq!(board.troops(T::Peru), 4);
    }

    #[test]
    fn test_fortify_origins() {
        let board = two_clusters();
        let origins = fortify_origins(&board, 1);
        assert!(origins.contains(&T::Peru));
        assert!(origins.contains(&T::Brazil));
        assert!(!origins.contains(&T::Venezuela));
        assert!(origins.contains(&T::NewGuinea));
    }
}
