//! Concrete collaborators: upstream HTTP, object store, notifications, control plane

pub mod control_plane;
pub mod fs_object_store;
pub mod notifier;
pub mod upstream_client;

pub use control_plane::{ControlPlaneClient, LogComputeController};
pub use fs_object_store::FsObjectStore;
pub use notifier::{LogNotifier, WebhookNotifier};
pub use upstream_client::UpstreamClient;
