mod check;
mod replay;

pub use check::Check;
pub use replay::Replay;
