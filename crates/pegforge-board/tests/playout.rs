//! Plays whole games through the public API and checks the board's
//! invariants after every jump.

use pegforge_board::{Board, BoardConfig, CellState, GameStatus, Move, Shape};

/// Snapshot of every cell, for before/after comparison.
fn states(board: &Board) -> Vec<CellState> {
    board.cells().map(|(_, state)| state).collect()
}

/// Plays until no move remains, picking with `pick`. Returns the
/// number of jumps made.
fn play_out(board: &mut Board, pick: impl Fn(&[Move]) -> usize) -> usize {
    let holes = board.hole_count();
    let mut jumps = 0;

    loop {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        assert_eq!(board.status(), GameStatus::InProgress);

        let mv = moves[pick(&moves)].clone();
        let before = states(board);
        let pegs = board.remaining_pegs();

        board.apply(&mv);
        jumps += 1;

        let after = states(board);
        let changed = before.iter().zip(&after).filter(|(b, a)| b != a).count();
        assert_eq!(changed, 3, "jump {jumps} ({mv:?}) touched {changed} cells");
        assert_eq!(board.remaining_pegs(), pegs - 1);
        assert_eq!(board.hole_count(), holes, "shape must never change");
    }

    jumps
}

#[test]
fn test_first_move_playout_on_english() {
    let mut board = Board::english();
    let jumps = play_out(&mut board, |_| 0);

    assert_eq!(board.remaining_pegs(), 32 - jumps);
    let status = board.status();
    assert!(matches!(status, GameStatus::Stuck | GameStatus::Solved));
    assert!(board.legal_moves().is_empty() || status == GameStatus::Solved);
}

#[test]
fn test_last_move_playout_on_european() {
    let mut board = Board::new(&BoardConfig {
        shape: Shape::European,
        empty: vec![pegforge_board::CellId::from_index(10)],
    })
    .expect("valid config");
    let jumps = play_out(&mut board, |moves| moves.len() - 1);
    assert!(jumps > 0);
    assert_eq!(board.remaining_pegs(), 36 - jumps);
}

#[test]
fn test_absent_cells_never_change() {
    let mut board = Board::english();
    let absent: Vec<_> = board
        .cells()
        .filter(|(_, s)| *s == CellState::Absent)
        .map(|(id, _)| id)
        .collect();
    assert_eq!(absent.len(), 16);

    play_out(&mut board, |moves| moves.len() / 2);

    for id in &absent {
        assert_eq!(board.cell_state(id), Ok(CellState::Absent));
    }
}

#[test]
fn test_identical_boards_suggest_identically() {
    let mut a = Board::english();
    let mut b = Board::english();
    for _ in 0..5 {
        let moves_a = a.legal_moves();
        assert_eq!(moves_a, b.legal_moves());
        let Some(mv) = moves_a.last() else { break };
        a.apply(mv);
        b.apply(mv);
    }
}
