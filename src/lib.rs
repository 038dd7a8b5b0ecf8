/*
 * Copyright 2019 Zejun Li
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! PCB component placement: assign named, fixed-size components to discrete board
//! positions minimizing weighted interconnect length and the longest single
//! interconnect.
//!
//! Two solvers share one cost model ([`objective::evaluate`]): a deterministic greedy
//! [`sequential`] placer and a parallel [`islands`] GA built on a repairable
//! [`chromosome`] encoding. [`solver`] is the facade most callers want.

#[macro_use]
extern crate quick_error;

pub mod chromosome;
pub mod error;
pub mod field;
pub mod ga;
pub mod islands;
pub mod model;
pub mod objective;
pub mod sequential;
pub mod solver;
pub mod weights;

pub use error::{Error, Result};
pub use model::{
    Board, Component, Design, GeometryPrimitive, Link, Net, Placement, Position, PositionField,
};
pub use objective::Metrics;
pub use solver::{solve_ga, solve_sequential, GAOptions, SequentialOptions, SolveResponse};
