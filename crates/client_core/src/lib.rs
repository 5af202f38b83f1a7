//! Client-side doctor directory: the service seam, the remote transport,
//! the lifecycle controller and the view model built on top of it.

pub mod controller;
pub mod error;
pub mod filter;
pub mod layout;
pub mod service;
pub mod transport;
pub mod view;

pub use controller::{DirectoryController, DirectoryEvent, DirectorySnapshot, UpdateSource};
pub use error::DirectoryError;
pub use filter::filter_doctors;
pub use layout::{DirectoryLayout, LayoutMode, ResponsiveRenderer};
pub use service::{DirectoryService, DoctorSubscription, MissingDirectoryService};
pub use transport::RemoteDirectoryService;
pub use view::{DirectoryPage, DoctorCard, PageView};
