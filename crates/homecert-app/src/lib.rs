// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod filter;
pub mod ids;
pub mod insights;
pub mod maintenance;
pub mod model;
pub mod report;
pub mod score;
pub mod state;
pub mod timeline;

pub use filter::*;
pub use ids::*;
pub use insights::*;
pub use maintenance::*;
pub use model::*;
pub use report::*;
pub use score::*;
pub use state::*;
pub use timeline::*;
