//! Editor-side state: gesture handling and the session that ties a flow to its store.

mod interaction;
mod session;

pub use interaction::{
    ConnectionState, DragState, InteractionController, InteractionOutcome, PointerRegion,
};
pub use session::{EditorSession, ExportedFlow, Notification, NotificationLevel};
