pub mod action;
mod state;
mod state_store;

pub use self::{state::*, state_store::StateStore};
