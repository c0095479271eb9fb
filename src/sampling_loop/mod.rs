pub mod core;
pub mod main;
mod render;
mod run_effect;

#[cfg(test)]
mod tests;
