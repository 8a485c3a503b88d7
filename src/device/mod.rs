mod base;
mod web_workflow;

pub use base::Device;
pub use web_workflow::{RemoteEntry, WebWorkflowDevice};
