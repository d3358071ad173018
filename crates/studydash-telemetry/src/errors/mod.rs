// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error standardization.
//!
//! [`ErrorStandardizer`] normalizes every raised error into a
//! [`StandardError`](studydash_core::StandardError) using the rule table in
//! [`rules`], attaches the localized message from [`messages`], and drives
//! bounded automatic recovery through [`RecoveryTracker`].

pub mod messages;
pub mod recovery;
pub mod rules;
mod standardizer;

pub use self::recovery::RecoveryTracker;
pub use self::standardizer::ErrorStandardizer;
