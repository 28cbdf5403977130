//! Utility Module
//!
//! - [`float`]: tolerant time comparison and periodic wrapping
//!
//! ```rust
//! use skeletal_keyframes::utils::float;
//!
//! assert!(float::equal(0.1 + 0.2, 0.3));
//! assert_eq!(float::wrap_periodic(15.0, 10.0), 5.0);
//! ```

pub mod float;

pub use float::TIME_EPSILON;
