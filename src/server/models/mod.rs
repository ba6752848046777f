pub mod agent_profile;
pub mod assignment;
pub mod chat;
pub mod goal;
pub mod project;
pub mod task;
