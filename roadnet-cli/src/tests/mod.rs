//! Shared test harness modules for the roadnet CLI.

use super::*;

mod helpers;
mod pipeline;
