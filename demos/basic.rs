//! Basic example of using the logical solver

use sudoku_logic::{Board, LogicResult, NeverCancel, Solver, SolverConfig};

fn main() {
    // A puzzle that basic techniques alone cannot finish
    let puzzle_string =
        "000000010400000000020000000000050407008000300001090000300400200050100000000806000";

    println!("--- Parsing a puzzle from string ---\n");
    let mut board = match Board::from_string(puzzle_string) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Invalid puzzle: {}", e);
            return;
        }
    };
    println!("Parsed puzzle:");
    println!("{}", board);

    // Solve it step by step, keeping a log
    let mut config = SolverConfig::default();
    config.aic.max_chain_len = Some(12);
    let solver = Solver::with_config(config);
    let mut steps = Vec::new();

    println!("Solving...\n");
    match solver.solve_logically(&mut board, Some(&mut steps), &NeverCancel) {
        Ok(LogicResult::Invalid) => println!("The puzzle has no solution."),
        Ok(_) => {}
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    }

    for (i, step) in steps.iter().enumerate() {
        println!("{:>3}. {}", i + 1, step);
    }

    println!();
    if board.is_solved() {
        println!("Solution:");
    } else {
        println!("Stuck after {} steps:", steps.len());
    }
    println!("{}", board);
}
