// Engine modules: frame loop, input

pub mod game_loop;
pub mod input;
