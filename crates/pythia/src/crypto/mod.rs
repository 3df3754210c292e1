pub mod constants;
pub mod hash;
pub mod random;
pub mod secret;
