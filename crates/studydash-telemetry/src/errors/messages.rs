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

//! Localized user-facing text.

use studydash_core::ErrorCategory;

/// Label of the retry action.
pub const RETRY_LABEL: &str = "再試行";
/// Label of the logout action.
pub const LOGOUT_LABEL: &str = "ログアウト";
/// Label of the reload action.
pub const REFRESH_LABEL: &str = "ページを再読み込み";
/// Label of the go-home action.
pub const HOME_LABEL: &str = "ホームに戻る";

/// The canned message shown to the user for `category`.
pub fn user_message(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Network => {
            "ネットワークエラーが発生しました。インターネット接続を確認してください。"
        }
        ErrorCategory::Api => "サーバーとの通信中にエラーが発生しました。",
        ErrorCategory::Validation => "入力内容に誤りがあります。確認してください。",
        ErrorCategory::Authentication => "認証が必要です。再度ログインしてください。",
        ErrorCategory::Authorization => "この操作を実行する権限がありません。",
        ErrorCategory::NotFound => "要求されたリソースが見つかりません。",
        ErrorCategory::RateLimit => {
            "リクエストが多すぎます。しばらく待ってから再試行してください。"
        }
        ErrorCategory::Server => {
            "サーバーエラーが発生しました。しばらく時間をおいて再試行してください。"
        }
        ErrorCategory::Client => "リクエストに問題があります。",
        ErrorCategory::Unknown => "予期しないエラーが発生しました。",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_a_message() {
        for category in ErrorCategory::ALL {
            assert!(!user_message(category).is_empty(), "{category}");
        }
    }
}
