pub mod compare;
pub mod core;
pub mod sequential;

#[cfg(test)]
mod tests;

pub use self::compare::*;
pub use self::core::*;
pub use self::sequential::*;
