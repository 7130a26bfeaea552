pub mod session;
pub mod settings;

pub use session::{Session, SessionFile};
pub use settings::{AppConfig, BackendConfig, BackendKind};
