//! These models represent the objects passed around by the agent
//!
//! There are several related formats we need to interact with:
//! - openai messages/tools, sent from the agent to the LLM
//! - tool requests and results, exchanged between the loop and the registry
//!
//! These overlap but do not coincide, so the wire formats are converted to
//! and from the internal structs at the provider boundary. The internal
//! models are not an exact match to any wire format.

pub mod content;
pub mod message;
pub mod role;
pub mod tool;
