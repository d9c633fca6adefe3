mod repl_tests;
mod session_tests;
