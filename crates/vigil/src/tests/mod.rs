//! Test suites for the supervisory core.

mod support;
