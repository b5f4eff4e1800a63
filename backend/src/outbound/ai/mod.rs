//! Text-analysis collaborators implementing [`ReflectionAnalyst`].
//!
//! [`ReflectionAnalyst`]: crate::domain::ports::ReflectionAnalyst

mod dto;
mod http_analyst;

pub use self::http_analyst::{HttpReflectionAnalyst, HttpReflectionAnalystConfig};
