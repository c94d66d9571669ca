//! `kdom-gate` — authorization & visibility gate for K-Dom content.
//!
//! Pure decision logic: no HTTP, no storage, no ambient "current user". Callers
//! hand in an [`ActingUser`] and a [`ResourceDescriptor`] and get back a
//! [`CapabilityResult`].

pub mod authorize;
pub mod capabilities;
pub mod principal;
pub mod resolve;
pub mod resource;
pub mod roles;

pub use authorize::{
    AccessDenied, Action, GateExplanation, GateView, GatedAction, affordances, authorize, explain,
    view,
};
pub use capabilities::{Capability, CapabilityResult, CapabilitySet};
pub use principal::ActingUser;
pub use resolve::{GatePolicy, Resolver, Rule, resolve};
pub use resource::{
    ContentType, MalformedResourceError, ModerationStatus, ResourceDescriptor, to_descriptor,
};
pub use roles::{ContextRole, GlobalRole, is_privileged_globally, outranks};
