mod config;
mod embed;
mod extract;
mod run;

pub use config::ConfigCommand;
pub use embed::{EmbedArgs, EmbedOverrides};
pub use extract::ExtractArgs;
pub use run::RunArgs;

pub use config::handle_config;
pub use embed::handle_embed;
pub use extract::handle_extract;
pub use run::handle_run;
