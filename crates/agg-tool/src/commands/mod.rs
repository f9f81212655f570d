mod config;
mod extract;
mod icn_info;
mod info;
mod spawn_icn;

pub use config::*;
pub use extract::*;
pub use icn_info::*;
pub use info::*;
pub use spawn_icn::*;
