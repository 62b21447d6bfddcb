// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated view composition: layouts, query descriptors, the access
//! token context and the HTML renderer.

pub mod builtin;
pub mod context;
pub mod html;
pub mod layout;
pub mod query;
pub mod render;
