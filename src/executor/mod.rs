mod printer;
mod runner;

pub use printer::{print_execution_result, print_failure, print_statistics};
pub use runner::{execute_request, ExecutionOptions};
