pub mod client;
pub mod models;
pub mod render;

pub use client::DashboardClient;
pub use models::{ChatSummary, EmailResult, Material, Topic, UpdateDetail, UpdateSummary};
