mod inputs;
pub mod logging;
mod run;

pub use run::run;
