//! Resource and data source behaviour against a mocked controller

#![allow(clippy::disallowed_methods)]

mod data_sources_test;
mod device_switch_test;
mod support;
mod user_test;
mod validation_test;
