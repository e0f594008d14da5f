pub mod clock;
pub mod mask;
