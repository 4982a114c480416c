// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod access;
pub mod aggregate;
pub mod anomaly;
pub mod budget;
pub mod forecast;
pub mod report;
pub mod scope;
