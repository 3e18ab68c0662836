// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Pure assembly of named remote program calls.
//!
//! A [`MoveCall`] is a value: the fully qualified entry-point target, its
//! type arguments, and an ordered argument list whose positions are fixed by
//! the remote program's interface. Builders perform no I/O; submission is
//! the transport's concern.

use serde::{Deserialize, Serialize};

use crate::common::{consts::CLOCK_OBJECT_ID, types::ObjectId};

/// A plain (pass-by-value) transaction argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PureArg {
    Bool(bool),
    U8(u8),
    U64(u64),
    U128(u128),
    Address(ObjectId),
    Bytes(Vec<u8>),
    Text(String),
    Addresses(Vec<ObjectId>),
}

/// A positional argument of a remote program call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// A shared or owned object passed by reference.
    Object(ObjectId),
    /// The well-known shared clock object.
    Clock,
    /// A plain value.
    Pure(PureArg),
}

impl CallArg {
    /// The object identifier this argument resolves to on the wire.
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            Self::Clock => Some(ObjectId::new_unchecked(CLOCK_OBJECT_ID)),
            Self::Pure(_) => None,
        }
    }
}

/// A named remote program call with fixed positional arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    /// Fully qualified entry point: `program::module::function`.
    pub target: String,
    /// Type arguments for generic entry points.
    pub type_args: Vec<String>,
    /// Ordered positional arguments.
    pub args: Vec<CallArg>,
}

impl MoveCall {
    /// Starts building a call to `program::module::function`.
    pub fn builder(program: &ObjectId, module: &str, function: &str) -> MoveCallBuilder {
        MoveCallBuilder::new(program, module, function)
    }
}

/// Incrementally assembles a [`MoveCall`].
#[derive(Clone, Debug)]
pub struct MoveCallBuilder {
    target: String,
    type_args: Vec<String>,
    args: Vec<CallArg>,
}

impl MoveCallBuilder {
    /// Creates a builder targeting `program::module::function`.
    pub fn new(program: &ObjectId, module: &str, function: &str) -> Self {
        Self {
            target: format!("{program}::{module}::{function}"),
            type_args: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Appends a type argument.
    pub fn type_arg(mut self, type_tag: impl Into<String>) -> Self {
        self.type_args.push(type_tag.into());
        self
    }

    /// Appends an object argument.
    pub fn object(mut self, id: ObjectId) -> Self {
        self.args.push(CallArg::Object(id));
        self
    }

    /// Appends the shared clock object argument.
    pub fn clock(mut self) -> Self {
        self.args.push(CallArg::Clock);
        self
    }

    /// Appends a plain value argument.
    pub fn pure(mut self, value: impl Into<PureArg>) -> Self {
        self.args.push(CallArg::Pure(value.into()));
        self
    }

    /// Finalizes the call.
    pub fn build(self) -> MoveCall {
        MoveCall {
            target: self.target,
            type_args: self.type_args,
            args: self.args,
        }
    }
}

impl From<bool> for PureArg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u8> for PureArg {
    fn from(value: u8) -> Self {
        Self::U8(value)
    }
}

impl From<u64> for PureArg {
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl From<u128> for PureArg {
    fn from(value: u128) -> Self {
        Self::U128(value)
    }
}

impl From<ObjectId> for PureArg {
    fn from(value: ObjectId) -> Self {
        Self::Address(value)
    }
}

impl From<&str> for PureArg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PureArg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for PureArg {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<ObjectId>> for PureArg {
    fn from(value: Vec<ObjectId>) -> Self {
        Self::Addresses(value)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_builder_preserves_argument_order() {
        let program = ObjectId::new_unchecked("0xprog");
        let feed = ObjectId::new_unchecked("0xfeed");
        let call = MoveCall::builder(&program, "aggregator_add_job_action", "run")
            .object(feed)
            .pure(7u64)
            .clock()
            .type_arg("0x2::sui::SUI")
            .build();

        assert_eq!(call.target, "0xprog::aggregator_add_job_action::run");
        assert_eq!(call.type_args, vec!["0x2::sui::SUI".to_string()]);
        assert_eq!(
            call.args,
            vec![
                CallArg::Object(feed),
                CallArg::Pure(PureArg::U64(7)),
                CallArg::Clock,
            ]
        );
    }

    #[rstest]
    fn test_clock_resolves_to_well_known_object() {
        assert_eq!(
            CallArg::Clock.object_id().unwrap().as_str(),
            CLOCK_OBJECT_ID
        );
        assert_eq!(CallArg::Pure(PureArg::U8(1)).object_id(), None);
    }

    #[rstest]
    fn test_pure_conversions() {
        assert_eq!(PureArg::from(true), PureArg::Bool(true));
        assert_eq!(PureArg::from("name"), PureArg::Text("name".to_string()));
        assert_eq!(
            PureArg::from(vec![1u8, 2, 3]),
            PureArg::Bytes(vec![1, 2, 3])
        );
    }
}
