/// Server services
pub mod session;

pub use session::{IssuedSession, Session, SessionService};
