//! Interactive session state and instruction routing

pub mod session;

pub use session::Session;
