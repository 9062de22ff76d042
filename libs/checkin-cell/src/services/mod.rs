// libs/checkin-cell/src/services/mod.rs
pub mod token;

pub use token::CheckinTokenService;
