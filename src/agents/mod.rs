pub mod agent;
pub mod factory;


pub use agent::{Agent, AgentDescriptor, AgentRole};
pub use factory::AgentFactory;
