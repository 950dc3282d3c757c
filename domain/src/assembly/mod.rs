//! Response assembly domain.
//!
//! - [`entities::Assembly`] - accumulator for one in-flight response
//! - [`entities::AssemblyState`] - its lifecycle
//! - [`policy::FlushPolicy`] - threshold and pacing for surfacing text

pub mod entities;
pub mod policy;
