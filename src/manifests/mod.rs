// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Workload group discovery and lightweight document inspection.

pub mod locator;
pub mod names;

pub use locator::{discover_groups, locate_documents, ResourceDocument, WorkloadGroup};
pub use names::extract_name;
