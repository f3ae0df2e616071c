pub mod nbu;
pub mod util;

pub use nbu::NbuProvider;
