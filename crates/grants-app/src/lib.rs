// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod browser;
pub mod display;
pub mod filter;
pub mod model;
pub mod sheet;
pub mod state;

pub use browser::*;
pub use display::*;
pub use filter::*;
pub use model::*;
pub use sheet::*;
pub use state::*;
