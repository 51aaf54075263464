//! Shared primitive types used across the scheduler.

/// A stable identifier for a representative.
pub type UserId = String;

/// An opaque identifier for an incoming lead.
pub type LeadId = String;

/// Credit weight of a representative for one week.
pub type Credits = u32;
