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

//! The standard error taxonomy.
//!
//! Every raised value that reaches application logic is normalized into a
//! [`StandardError`] by the error standardizer in `studydash-telemetry`. This
//! module only defines the shapes; the categorization rule table lives with
//! the standardizer.

pub mod category;
pub mod raised;
pub mod record;
pub mod recovery;

pub use self::category::{ErrorCategory, ErrorSeverity};
pub use self::raised::RaisedError;
pub use self::record::{ErrorContext, ErrorOverrides, ErrorStatistics, StandardError};
pub use self::recovery::{RecoveryAction, RecoveryFuture, RecoveryHandler, RecoveryKind};
