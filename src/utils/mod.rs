pub mod clock;
pub mod error;

pub use clock::FrameClock;
pub use error::AppError;
