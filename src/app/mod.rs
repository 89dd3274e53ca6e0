mod runner;


pub use runner::run_local;
