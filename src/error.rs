use std::result::Result as StdResult;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        InsufficientPositions(have: usize, need: usize) {
            display("only {} candidate positions for {} components", have, need)
        }
        InvalidDesign(reason: String) {
            display("invalid design: {}", reason)
        }
        EmptyProblem {
            display("design has no components")
        }
        WorkerFailure(reason: String) {
            display("ga worker failed: {}", reason)
        }
    }
}

pub type Result<T> = StdResult<T, Error>;
