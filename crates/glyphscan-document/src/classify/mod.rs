// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Classification — template library and the per-row classifier.

pub mod classifier;
pub mod templates;

pub use classifier::{ClassifiedRow, Classifier};
pub use templates::{Template, TemplateLibrary};
